//! Balance and recent transactions for one address

use anyhow::Result;

use crate::explorer::load_overview;
use crate::keys::Pubkey;
use crate::transaction::format_amount;

use super::{print_error, print_transactions, Context};

/// Run the explore command
pub async fn run(ctx: &Context, address: &str) -> Result<()> {
    let address: Pubkey = match address.parse() {
        Ok(address) => address,
        Err(e) => {
            print_error(&e.to_string());
            return Ok(());
        }
    };

    let client = ctx.client()?;
    println!("Address: {}", address);
    println!("Network: {} ({})", ctx.config.cluster, client.url());
    println!();

    let overview = load_overview(&client, address, ctx.config.history_limit).await;

    match overview.balance {
        Ok(lamports) => println!("Balance: {}", format_amount(lamports)),
        Err(e) => print_error(&format!("Failed to load balance: {}", e)),
    }
    println!();

    match overview.transactions {
        Ok(rows) => print_transactions(&rows),
        Err(e) => print_error(&format!("Failed to load transactions: {}", e)),
    }

    Ok(())
}
