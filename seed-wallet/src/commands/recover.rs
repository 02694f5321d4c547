//! Recover a session from an existing phrase

use anyhow::Result;

use crate::keys::validate_mnemonic;
use crate::session::Session;

use super::{preview, print_error, print_success, print_warning, prompt_confirm, prompt_line, Context};

/// Run the recover command
pub async fn run(ctx: &Context, phrase: Option<String>, count: usize, skip_confirm: bool) -> Result<()> {
    if ctx.store.exists() && !skip_confirm {
        print_warning("A stored seed phrase will be replaced.");
        if !prompt_confirm("Continue?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let phrase = match phrase {
        Some(phrase) => phrase,
        None => {
            println!("Enter your 12 or 24-word recovery phrase:");
            prompt_line("> ")?
        }
    };

    if let Err(e) = validate_mnemonic(&phrase) {
        print_error(&e.to_string());
        return Ok(());
    }

    let mut session = Session::recover(&phrase)?;
    session.derive_wallets(count)?;
    ctx.store.persist(&session)?;

    print_success(&format!("Recovered {} wallet(s)", session.wallets().len()));
    for (i, wallet) in session.wallets().iter().enumerate() {
        println!("  Wallet {}: {}  (Sec: {})", i, wallet.public, preview(&wallet.secret));
    }

    Ok(())
}
