//! Send transaction command

use anyhow::Result;
use zeroize::Zeroizing;

use crate::keys::WalletKeypair;
use crate::transaction::{format_amount, sol_to_lamports};
use crate::transfer::{transfer, validate_transfer};

use super::{print_error, print_success, prompt_confirm, Context};

/// Run the send command.
///
/// `from` is a wallet index in the stored session or a base58 secret.
pub async fn run(
    ctx: &Context,
    from: &str,
    destination: &str,
    amount: f64,
    skip_confirm: bool,
) -> Result<()> {
    let Some(secret) = resolve_source(ctx, from)? else {
        return Ok(());
    };

    if let Err(e) = validate_transfer(&secret, destination, amount) {
        print_error(&e.to_string());
        return Ok(());
    }

    let source = match WalletKeypair::from_secret(&secret) {
        Ok(keypair) => keypair.pubkey(),
        Err(e) => {
            print_error(&e.to_string());
            return Ok(());
        }
    };

    println!();
    println!("Transaction details:");
    println!("  From:    {}", source);
    println!("  To:      {}", destination);
    println!("  Amount:  {}", format_amount(sol_to_lamports(amount)));
    println!("  Network: {}", ctx.config.cluster);
    println!();

    if !skip_confirm && !prompt_confirm("Send this transaction?")? {
        println!("Aborted.");
        return Ok(());
    }

    let client = ctx.client()?;
    println!("Submitting and waiting for confirmation...");

    match transfer(&client, &secret, destination, amount).await {
        Ok(signature) => {
            print_success("Transaction confirmed!");
            println!("  Signature: {}", signature);
        }
        Err(e) => print_error(&format!("Transfer failed: {}", e)),
    }

    Ok(())
}

/// Look up the source secret. Plain numbers select a stored wallet.
fn resolve_source(ctx: &Context, from: &str) -> Result<Option<Zeroizing<String>>> {
    let Ok(index) = from.trim().parse::<usize>() else {
        return Ok(Some(Zeroizing::new(from.trim().to_string())));
    };

    let Some(session) = ctx.require_session()? else {
        return Ok(None);
    };

    match session.wallet(index) {
        Some(wallet) => Ok(Some(Zeroizing::new(wallet.secret.clone()))),
        None => {
            print_error(&format!(
                "No wallet {} (the session has {})",
                index,
                session.wallets().len()
            ));
            Ok(None)
        }
    }
}
