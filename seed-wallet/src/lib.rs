//! Seed Wallet
//!
//! A small wallet for Solana-style networks. One mnemonic phrase produces an
//! ordered list of ed25519 wallets, each derived on its own along
//! `m/44'/501'/i'/0'`. The session is kept in a single local file.
//!
//! ## Security Model
//!
//! - Transactions are signed locally; only signed bytes reach the node
//! - The node is trusted for balances and history
//! - The stored session is plaintext: anyone who can read the file owns
//!   every wallet in it

pub mod config;
pub mod error;
pub mod explorer;
pub mod keys;
pub mod rpc;
pub mod session;
pub mod storage;
pub mod transaction;
pub mod transfer;

pub mod commands;

#[cfg(test)]
mod mock_ledger;

pub use config::{Cluster, Commitment, WalletConfig};
pub use error::{Result, WalletError};
pub use explorer::{load_overview, ordered_join, request_airdrop, transaction_delta, Overview};
pub use keys::{derive_keypair, MnemonicSeed, Pubkey, WalletKeypair, WalletRecord};
pub use rpc::{LedgerClient, RpcClient};
pub use session::Session;
pub use storage::SessionStore;
pub use transfer::transfer;
