//! Seed Wallet CLI
//!
//! Derive wallets from one seed phrase, explore addresses, and send funds.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seed_wallet::commands::{self, Context};
use seed_wallet::config::{default_data_dir, Cluster, WalletConfig};
use seed_wallet::transaction::parse_amount;

#[derive(Parser)]
#[command(name = "seed-wallet")]
#[command(about = "HD wallet for Solana-style networks")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wallet data directory
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Network to use (devnet, testnet, mainnet-beta, localnet)
    #[arg(short, long, global = true)]
    cluster: Option<Cluster>,

    /// Custom RPC endpoint
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new seed phrase, replacing the stored one
    New {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Restore a session from an existing seed phrase
    Recover {
        /// Recovery phrase (prompted for when omitted)
        #[arg(long)]
        phrase: Option<String>,

        /// Number of wallets to derive
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Derive the next wallet
    Add,

    /// Show the seed phrase and wallets
    List,

    /// Show balance and recent transactions of an address
    Explore {
        /// Address to look up
        address: String,
    },

    /// Request test currency for an address
    Airdrop {
        /// Address to fund
        address: String,
    },

    /// Send SOL
    Send {
        /// Source wallet index or base58 secret
        #[arg(short, long)]
        from: String,

        /// Recipient address
        destination: String,

        /// Amount to send in SOL (e.g. 0.5 or "0.5 SOL")
        #[arg(value_parser = parse_amount)]
        amount: f64,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export the seed phrase and wallet secrets
    Export {
        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the data directory's config.toml
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);

    let mut config = WalletConfig::load(&data_dir)?;
    if let Some(cluster) = cli.cluster {
        config.cluster = cluster;
        config.rpc_url = None;
    }
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = Some(rpc_url);
    }

    let ctx = Context::new(&data_dir, config);

    match cli.command.unwrap_or(Commands::List) {
        Commands::New { yes } => commands::new::run(&ctx, yes).await,
        Commands::Recover { phrase, count, yes } => {
            commands::recover::run(&ctx, phrase, count, yes).await
        }
        Commands::Add => commands::add::run(&ctx).await,
        Commands::List => commands::list::run(&ctx).await,
        Commands::Explore { address } => commands::explore::run(&ctx, &address).await,
        Commands::Airdrop { address } => commands::airdrop::run(&ctx, &address).await,
        Commands::Send {
            from,
            destination,
            amount,
            yes,
        } => commands::send::run(&ctx, &from, &destination, amount, yes).await,
        Commands::Export { output } => commands::export::run(&ctx, output).await,
        Commands::Config { save } => commands::config::run(&ctx, save).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_amount_accepts_unit_suffix() {
        let cli = Cli::try_parse_from(["seed-wallet", "send", "--from", "0", "Dest", "0.5 SOL"])
            .unwrap();
        match cli.command {
            Some(Commands::Send { amount, .. }) => assert_eq!(amount, 0.5),
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_send_amount_rejects_garbage() {
        assert!(Cli::try_parse_from(["seed-wallet", "send", "--from", "0", "Dest", "lots"]).is_err());
        assert!(Cli::try_parse_from(["seed-wallet", "send", "--from", "0", "Dest", "inf"]).is_err());
    }
}
