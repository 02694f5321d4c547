//! Transaction Building and Signing
//!
//! Builds the one transaction this wallet sends: a native transfer through
//! the system program. Message layout and wire encoding come from the
//! ledger's SDK crates; signing happens locally with the wallet key and only
//! the signed wire bytes leave the wallet.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_hash::Hash;
use solana_message::Message;
use solana_pubkey::Pubkey as LedgerPubkey;
use solana_signature::Signature;
use solana_system_interface::instruction as system_instruction;
use solana_transaction::Transaction;

use crate::error::{Result, WalletError};
use crate::keys::{Pubkey, WalletKeypair};

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert a SOL amount to lamports, rounding to the nearest lamport.
///
/// Negative and non-finite amounts convert to zero.
pub fn sol_to_lamports(sol: f64) -> u64 {
    if !sol.is_finite() || sol <= 0.0 {
        return 0;
    }
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

/// Convert lamports to SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Format an amount in lamports as SOL
pub fn format_amount(lamports: u64) -> String {
    format!("{} SOL", lamports_to_sol(lamports))
}

/// Parse a SOL amount string
pub fn parse_amount(sol: &str) -> Result<f64> {
    let value: f64 = sol
        .trim()
        .trim_end_matches(" SOL")
        .trim_end_matches("SOL")
        .trim()
        .parse()
        .map_err(|_| WalletError::Validation(format!("Invalid amount '{}'", sol)))?;

    if !value.is_finite() {
        return Err(WalletError::Validation("Amount must be a finite number".into()));
    }

    if value < 0.0 {
        return Err(WalletError::Validation("Amount cannot be negative".into()));
    }

    Ok(value)
}

/// An unsigned native transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMessage {
    pub from: Pubkey,
    pub to: Pubkey,
    pub lamports: u64,
    pub recent_blockhash: [u8; 32],
}

impl TransferMessage {
    pub fn new(from: Pubkey, to: Pubkey, lamports: u64, recent_blockhash: [u8; 32]) -> Self {
        Self {
            from,
            to,
            lamports,
            recent_blockhash,
        }
    }

    /// Legacy message with the source as fee payer
    fn compile(&self) -> Message {
        let from = LedgerPubkey::new_from_array(self.from.to_bytes());
        let to = LedgerPubkey::new_from_array(self.to.to_bytes());
        let instruction = system_instruction::transfer(&from, &to, self.lamports);

        Message::new_with_blockhash(
            &[instruction],
            Some(&from),
            &Hash::new_from_array(self.recent_blockhash),
        )
    }

    /// Serialize the message; these are the bytes that get signed.
    pub fn serialize(&self) -> Vec<u8> {
        self.compile().serialize()
    }

    /// Sign the message with the source keypair.
    pub fn sign(self, keypair: &WalletKeypair) -> Result<SignedTransfer> {
        if keypair.pubkey() != self.from {
            return Err(WalletError::InvalidSecret(
                "keypair does not match the transfer source".into(),
            ));
        }

        let mut transaction = Transaction::new_unsigned(self.compile());
        let message = transaction.message_data();
        let signature = keypair.sign(&message);
        transaction.signatures = vec![Signature::from(signature)];

        let wire = bincode::serialize(&transaction)
            .map_err(|e| WalletError::Encoding(e.to_string()))?;

        Ok(SignedTransfer {
            signature,
            message,
            wire,
        })
    }
}

/// A signed transfer ready for submission.
#[derive(Debug, Clone)]
pub struct SignedTransfer {
    signature: [u8; 64],
    message: Vec<u8>,
    wire: Vec<u8>,
}

impl SignedTransfer {
    /// Transaction id (base58 of the first signature)
    pub fn signature(&self) -> String {
        bs58::encode(self.signature).into_string()
    }

    pub fn signature_bytes(&self) -> &[u8; 64] {
        &self.signature
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Wire encoding of the signed transaction
    pub fn to_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Base64 wire encoding as accepted by `sendTransaction`
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.wire)
    }
}

/// Parse a base58 blockhash returned by the node
pub fn parse_blockhash(blockhash: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(blockhash)
        .into_vec()
        .map_err(|e| WalletError::InvalidResponse(format!("blockhash '{}': {}", blockhash, e)))?;
    bytes
        .try_into()
        .map_err(|_| WalletError::InvalidResponse(format!("blockhash '{}' is not 32 bytes", blockhash)))
}
