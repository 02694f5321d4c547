//! Key Management
//!
//! Handles BIP39 mnemonic generation and SLIP-0010 ed25519 key derivation.
//!
//! Wallet `i` lives at `m/44'/501'/i'/0'`. Derivation is a pure function of
//! the seed bytes and the index, so any wallet can be re-derived on its own
//! without replaying the ones before it.
//!
//! Security: Mnemonic phrases and seed bytes are stored in `Zeroizing`
//! wrappers that overwrite memory with zeros when dropped.

use bip39::{Language, Mnemonic, MnemonicType, Seed};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};

/// Number of words in a freshly generated mnemonic phrase
pub const MNEMONIC_WORDS: usize = 12;

/// Word counts accepted when recovering from an existing phrase
const ACCEPTED_WORD_COUNTS: &[usize] = &[12, 24];

/// BIP44 purpose
const PURPOSE: u32 = 44;

/// SLIP-0044 coin type registered for Solana
pub const COIN_TYPE: u32 = 501;

/// Length of a base58-decoded wallet secret (secret key || public key)
pub const KEYPAIR_LENGTH: usize = 64;

/// A mnemonic phrase together with the seed bytes it produces.
///
/// The seed is computed with an empty BIP39 passphrase.
#[derive(Clone)]
pub struct MnemonicSeed {
    phrase: Zeroizing<String>,
    seed: Zeroizing<Vec<u8>>,
}

impl MnemonicSeed {
    /// Generate a new 12-word phrase and its seed
    pub fn generate() -> Self {
        let mnemonic = Mnemonic::new(MnemonicType::Words12, Language::English);
        Self::from_mnemonic(&mnemonic)
    }

    /// Restore from an existing phrase
    pub fn from_phrase(phrase: &str) -> Result<Self> {
        validate_mnemonic(phrase)?;
        let normalized = normalize_phrase(phrase);
        let mnemonic = Mnemonic::from_phrase(&normalized, Language::English)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        Ok(Self::from_mnemonic(&mnemonic))
    }

    /// Rebuild from a stored phrase and seed without recomputing the seed.
    ///
    /// Stored blobs are trusted as-is; use `matches_phrase` to check them.
    pub fn from_parts(phrase: String, seed: Vec<u8>) -> Self {
        Self {
            phrase: Zeroizing::new(phrase),
            seed: Zeroizing::new(seed),
        }
    }

    fn from_mnemonic(mnemonic: &Mnemonic) -> Self {
        let seed = Seed::new(mnemonic, "");
        Self {
            phrase: Zeroizing::new(mnemonic.phrase().to_string()),
            seed: Zeroizing::new(seed.as_bytes().to_vec()),
        }
    }

    /// Get the mnemonic phrase as a string
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Get the mnemonic words as a vector
    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Get the BIP39 seed bytes
    pub fn seed_bytes(&self) -> &[u8] {
        &self.seed
    }

    /// Returns true if the seed bytes are the ones the phrase produces.
    pub fn matches_phrase(&self) -> bool {
        match Mnemonic::from_phrase(&self.phrase, Language::English) {
            Ok(mnemonic) => Seed::new(&mnemonic, "").as_bytes() == self.seed.as_slice(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for MnemonicSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicSeed")
            .field("words", &self.words().len())
            .finish_non_exhaustive()
    }
}

/// Validate a mnemonic phrase without deriving anything
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    let word_count = phrase.split_whitespace().count();
    if !ACCEPTED_WORD_COUNTS.contains(&word_count) {
        return Err(WalletError::InvalidMnemonic(format!(
            "Expected 12 or 24 words, got {}",
            word_count
        )));
    }

    Mnemonic::validate(&normalize_phrase(phrase), Language::English)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// SLIP-0010 path components for wallet `index`; every component is hardened.
pub fn derivation_path(index: u32) -> [u32; 4] {
    [PURPOSE, COIN_TYPE, index, 0]
}

/// Human-readable form of `derivation_path`
pub fn derivation_path_string(index: u32) -> String {
    format!("m/{}'/{}'/{}'/0'", PURPOSE, COIN_TYPE, index)
}

/// Derive the signing keypair for wallet `index`.
///
/// Depends only on `seed` and `index`.
pub fn derive_keypair(seed: &[u8], index: u32) -> WalletKeypair {
    let secret = Zeroizing::new(slip10_ed25519::derive_ed25519_private_key(
        seed,
        &derivation_path(index),
    ));
    WalletKeypair {
        signing_key: SigningKey::from_bytes(&secret),
    }
}

/// An ed25519 keypair able to sign transfers.
#[derive(Clone, Debug)]
pub struct WalletKeypair {
    signing_key: SigningKey,
}

impl WalletKeypair {
    /// Reconstruct a keypair from its base58 64-byte encoding.
    ///
    /// The public half is checked against the secret half.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            bs58::decode(secret.trim())
                .into_vec()
                .map_err(|e| WalletError::InvalidSecret(e.to_string()))?,
        );

        let keypair_bytes: &[u8; KEYPAIR_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            WalletError::InvalidSecret(format!(
                "expected {} bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(keypair_bytes)
            .map_err(|_| WalletError::InvalidSecret("public key does not match secret".into()))?;

        Ok(Self { signing_key })
    }

    /// The public address of this keypair
    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    /// Base58 encoding of the 64-byte keypair, as stored in a wallet record
    pub fn secret_string(&self) -> String {
        let bytes = Zeroizing::new(self.signing_key.to_keypair_bytes());
        bs58::encode(bytes.as_slice()).into_string()
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes()
    }

    /// The stored form of this keypair
    pub fn to_record(&self) -> WalletRecord {
        WalletRecord {
            secret: self.secret_string(),
            public: self.pubkey().to_string(),
        }
    }
}

/// Check an ed25519 signature against a public address.
pub fn verify_signature(pubkey: &Pubkey, message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(&pubkey.0) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(signature)).is_ok()
}

/// One derived wallet as stored in the session blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Base58 64-byte keypair
    pub secret: String,
    /// Base58 public address
    pub public: String,
}

impl WalletRecord {
    /// Rebuild the signing keypair from the stored secret
    pub fn keypair(&self) -> Result<WalletKeypair> {
        WalletKeypair::from_secret(&self.secret)
    }
}

/// A 32-byte account address, displayed as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    /// The native system program (`11111111111111111111111111111111`)
    pub const SYSTEM_PROGRAM: Pubkey = Pubkey([0u8; 32]);

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl FromStr for Pubkey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| WalletError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| WalletError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}
