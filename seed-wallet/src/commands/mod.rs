//! CLI Commands
//!
//! Implementation of all wallet CLI commands. Each command is its own
//! failure boundary: library errors are printed, not propagated further.

pub mod add;
pub mod airdrop;
pub mod config;
pub mod explore;
pub mod export;
pub mod list;
pub mod new;
pub mod recover;
pub mod send;

use anyhow::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::WalletConfig;
use crate::explorer::TransactionRow;
use crate::rpc::RpcClient;
use crate::session::Session;
use crate::storage::SessionStore;

/// Everything a command needs: where the session lives and how to reach
/// the network.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub store: SessionStore,
    pub config: WalletConfig,
}

impl Context {
    pub fn new(data_dir: &Path, config: WalletConfig) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            store: SessionStore::new(data_dir),
            config,
        }
    }

    /// RPC client for the configured endpoint
    pub fn client(&self) -> Result<RpcClient> {
        Ok(RpcClient::from_config(&self.config)?)
    }

    /// Load the stored session, telling the user what to do if there is none
    pub fn require_session(&self) -> Result<Option<Session>> {
        let session = self.store.load()?;
        if session.is_none() {
            print_error("No seed phrase yet. Run 'seed-wallet new' or 'seed-wallet recover' first.");
        }
        Ok(session)
    }
}

/// Prompt for a line of input
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt for confirmation
pub fn prompt_confirm(message: &str) -> Result<bool> {
    let input = prompt_line(&format!("{} [y/N]: ", message))?;
    Ok(input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes"))
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("\x1b[33mWarning:\x1b[0m {}", message);
}

/// Print a phrase in numbered columns
pub fn print_phrase(words: &[&str]) {
    for (i, word) in words.iter().enumerate() {
        print!("{:>2}. {:<12}", i + 1, word);
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
    if words.len() % 4 != 0 {
        println!();
    }
}

/// First seven characters followed by an ellipsis
pub fn preview(value: &str) -> String {
    let head: String = value.chars().take(7).collect();
    format!("{}...", head)
}

/// Print transaction history as a table
pub fn print_transactions(rows: &[TransactionRow]) {
    if rows.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!("{:>3}  {:<88}  {:>16}", "#", "Signature", "Change (SOL)");
    println!("{}", "-".repeat(111));
    for row in rows {
        let status = if row.failed { " (failed)" } else { "" };
        println!(
            "{:>3}  {:<88}  {:>+16.9}{}",
            row.index + 1,
            row.signature,
            row.delta,
            status
        );
    }
}
