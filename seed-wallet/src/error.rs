//! Wallet error types.

use thiserror::Error;

/// Errors produced by the wallet library.
///
/// Variants fall into three groups: input validation (no network call was
/// made), network/RPC failures, and parse or storage failures that are fatal
/// to the current operation only.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A required input is missing or zero
    #[error("{0}")]
    Validation(String),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Transport-level failure talking to the node
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with neither a result nor an error
    #[error("Missing result in RPC response")]
    MissingResult,

    /// The node answered with a value this wallet cannot use
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// The transaction landed but failed on chain
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    /// The blockhash expired before the signature reached the commitment
    #[error("Transaction {0} was not confirmed before its blockhash expired")]
    BlockhashExpired(String),

    /// Not a base58-encoded 32-byte address
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Not a base58-encoded 64-byte keypair
    #[error("Invalid wallet secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The storage blob exists but is unusable
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transaction could not be put in wire form
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// True for failures that happened before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for failures reported by, or on the way to, the node.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Rpc { .. }
                | Self::Http(_)
                | Self::MissingResult
                | Self::InvalidResponse(_)
                | Self::TransactionFailed { .. }
                | Self::BlockhashExpired(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
