//! Wallet Session
//!
//! A session is one mnemonic, its seed, and the wallets derived from it so
//! far. Wallet `i` is always the one at derivation index `i`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WalletError};
use crate::keys::{derive_keypair, derivation_path_string, MnemonicSeed, WalletRecord};

/// In-memory wallet session.
#[derive(Debug, Clone)]
pub struct Session {
    seed: MnemonicSeed,
    wallets: Vec<WalletRecord>,
}

impl Session {
    /// Start a session from a freshly generated phrase, with no wallets.
    pub fn create() -> Result<Self> {
        let seed = MnemonicSeed::generate();
        info!("Generated new {}-word seed phrase", seed.words().len());
        Ok(Self {
            seed,
            wallets: Vec::new(),
        })
    }

    /// Start a session from an existing phrase, with no wallets.
    pub fn recover(phrase: &str) -> Result<Self> {
        let seed = MnemonicSeed::from_phrase(phrase)?;
        info!("Recovered seed phrase");
        Ok(Self {
            seed,
            wallets: Vec::new(),
        })
    }

    /// Derive and append the next wallet.
    pub fn add_wallet(&mut self) -> Result<&WalletRecord> {
        let index = u32::try_from(self.wallets.len())
            .map_err(|_| WalletError::Validation("Too many wallets".into()))?;

        let record = derive_keypair(self.seed.seed_bytes(), index).to_record();
        info!(
            "Derived wallet {} at {}: {}",
            index,
            derivation_path_string(index),
            record.public
        );

        self.wallets.push(record);
        Ok(&self.wallets[index as usize])
    }

    /// Append wallets until there are `count` of them.
    pub fn derive_wallets(&mut self, count: usize) -> Result<()> {
        while self.wallets.len() < count {
            self.add_wallet()?;
        }
        Ok(())
    }

    /// Check that the stored seed and every stored wallet match what the
    /// phrase derives. Returns the first mismatching wallet index.
    pub fn verify(&self) -> std::result::Result<(), SessionMismatch> {
        if !self.seed.matches_phrase() {
            return Err(SessionMismatch::Seed);
        }

        for (index, record) in self.wallets.iter().enumerate() {
            let expected = derive_keypair(self.seed.seed_bytes(), index as u32).to_record();
            if &expected != record {
                return Err(SessionMismatch::Wallet(index));
            }
        }

        Ok(())
    }

    pub fn phrase(&self) -> &str {
        self.seed.phrase()
    }

    pub fn seed(&self) -> &MnemonicSeed {
        &self.seed
    }

    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    pub fn wallet(&self, index: usize) -> Option<&WalletRecord> {
        self.wallets.get(index)
    }

    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            phrase: self.seed.phrase().to_string(),
            seed: hex::encode(self.seed.seed_bytes()),
            wallets: self.wallets.clone(),
        }
    }

    pub fn from_stored(stored: StoredSession) -> Result<Self> {
        let seed = hex::decode(&stored.seed)
            .map_err(|e| WalletError::Storage(format!("Invalid seed encoding: {}", e)))?;

        Ok(Self {
            seed: MnemonicSeed::from_parts(stored.phrase, seed),
            wallets: stored.wallets,
        })
    }
}

/// Where a stored session disagrees with its own phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMismatch {
    Seed,
    Wallet(usize),
}

impl std::fmt::Display for SessionMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMismatch::Seed => write!(f, "stored seed does not match the phrase"),
            SessionMismatch::Wallet(i) => {
                write!(f, "wallet {} does not match its derivation path", i)
            }
        }
    }
}

/// Persisted form of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub phrase: String,
    /// Hex-encoded seed bytes
    pub seed: String,
    #[serde(default)]
    pub wallets: Vec<WalletRecord>,
}
