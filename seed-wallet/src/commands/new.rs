//! Generate a new seed phrase

use anyhow::Result;

use crate::session::Session;

use super::{print_error, print_phrase, print_success, print_warning, prompt_confirm, Context};

/// Run the new command
pub async fn run(ctx: &Context, skip_confirm: bool) -> Result<()> {
    run_with_confirm(ctx, skip_confirm, prompt_confirm)
}

/// Replace the stored session with a fresh one, asking `confirm` before
/// anything already on disk is overwritten.
fn run_with_confirm<F>(ctx: &Context, skip_confirm: bool, mut confirm: F) -> Result<()>
where
    F: FnMut(&str) -> Result<bool>,
{
    let question = match ctx.store.load() {
        Ok(None) => None,
        Ok(Some(existing)) => {
            print_warning(&format!(
                "A seed phrase with {} wallet(s) is already stored at {}",
                existing.wallets().len(),
                ctx.store.path().display()
            ));
            Some("Replace it? Its wallets will be lost")
        }
        Err(e) => {
            print_error(&format!(
                "Could not read {}: {}",
                ctx.store.path().display(),
                e
            ));
            print_warning("The file may hold the only copy of an existing seed phrase.");
            Some("Overwrite it anyway?")
        }
    };

    if let Some(question) = question {
        if !skip_confirm && !confirm(question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let session = Session::create()?;
    ctx.store.persist(&session)?;

    println!();
    println!("Your recovery phrase ({} words):", session.seed().words().len());
    println!();
    print_phrase(&session.seed().words());
    println!();

    print_success("Seed phrase created. Run 'seed-wallet add' to derive a wallet.");
    print_warning("Write down your recovery phrase. Anyone with it controls every wallet.");

    Ok(())
}
