//! Derive the next wallet

use anyhow::Result;

use crate::keys::derivation_path_string;

use super::{preview, print_success, Context};

/// Run the add command
pub async fn run(ctx: &Context) -> Result<()> {
    let Some(mut session) = ctx.require_session()? else {
        return Ok(());
    };

    let index = session.wallets().len();
    let wallet = session.add_wallet()?.clone();
    ctx.store.persist(&session)?;

    print_success(&format!("Added wallet {}", index));
    println!("  Path: {}", derivation_path_string(index as u32));
    println!("  Pub:  {}", wallet.public);
    println!("  Sec:  {}", preview(&wallet.secret));

    Ok(())
}
