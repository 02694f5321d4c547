//! Show the stored session

use anyhow::Result;

use super::{preview, print_phrase, print_warning, Context};

/// Run the list command
pub async fn run(ctx: &Context) -> Result<()> {
    let Some(session) = ctx.require_session()? else {
        return Ok(());
    };

    if let Err(mismatch) = session.verify() {
        print_warning(&format!("Stored session looks tampered with: {}", mismatch));
    }

    println!("Seed phrase:");
    print_phrase(&session.seed().words());
    println!();

    if session.wallets().is_empty() {
        println!("No wallets yet. Run 'seed-wallet add' to derive one.");
        return Ok(());
    }

    for (i, wallet) in session.wallets().iter().enumerate() {
        println!("Wallet {}", i);
        println!("  Pub: {}", preview(&wallet.public));
        println!("  Sec: {}", preview(&wallet.secret));
    }

    Ok(())
}
