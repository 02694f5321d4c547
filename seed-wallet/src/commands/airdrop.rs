//! Request test currency

use anyhow::Result;

use crate::explorer::{load_transactions, request_airdrop};
use crate::keys::Pubkey;
use crate::transaction::format_amount;

use super::{print_error, print_success, print_transactions, print_warning, Context};

/// Run the airdrop command
pub async fn run(ctx: &Context, address: &str) -> Result<()> {
    let address: Pubkey = match address.parse() {
        Ok(address) => address,
        Err(e) => {
            print_error(&e.to_string());
            return Ok(());
        }
    };

    if !ctx.config.cluster.supports_airdrop() {
        print_error(&format!("Airdrops are not available on {}", ctx.config.cluster));
        return Ok(());
    }

    let lamports = ctx.config.airdrop_lamports();
    let client = ctx.client()?;

    println!(
        "Requesting {} for {}, waiting for finalization...",
        format_amount(lamports),
        address
    );

    match request_airdrop(&client, &address, lamports).await {
        Ok(signature) => {
            print_success(&format!("Airdrop finalized: {}", signature));
        }
        Err(e) => {
            print_error(&format!("Airdrop failed: {}", e));
            print_warning("Test network faucets are often rate limited or down. Try again later.");
            return Ok(());
        }
    }

    println!();
    match load_transactions(&client, &address, ctx.config.history_limit).await {
        Ok(rows) => print_transactions(&rows),
        Err(e) => print_error(&format!("Failed to load transactions: {}", e)),
    }

    Ok(())
}
