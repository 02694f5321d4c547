//! Show or save the effective configuration

use anyhow::Result;
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

use super::{print_success, Context};

/// Run the config command
pub async fn run(ctx: &Context, save: bool) -> Result<()> {
    println!("{}", ctx.config.to_toml()?);
    println!("Endpoint: {}", ctx.config.effective_rpc_url());

    if save {
        let path = save_config(ctx)?;
        print_success(&format!("Configuration saved to {}", path.display()));
    }

    Ok(())
}

/// Write the context's configuration, flag overrides included, to
/// `<data_dir>/config.toml`.
pub fn save_config(ctx: &Context) -> Result<PathBuf> {
    let path = ctx.data_dir.join(CONFIG_FILE);
    ctx.config.save(&path)?;
    Ok(path)
}
