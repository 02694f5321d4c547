//! Wallet export/backup command

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::session::Session;

use super::{print_phrase, print_success, print_warning, prompt_confirm, Context};

/// Run the export command
pub async fn run(ctx: &Context, output: Option<String>) -> Result<()> {
    let Some(session) = ctx.require_session()? else {
        return Ok(());
    };

    if let Some(output_path) = output {
        let output_path = Path::new(&output_path);

        if output_path.exists() && !prompt_confirm("Output file exists. Overwrite?")? {
            println!("Aborted.");
            return Ok(());
        }

        let backup = backup_text(&session, chrono::Utc::now());

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(output_path)?;
            file.write_all(backup.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(output_path, backup)?;
        }

        println!();
        print_success(&format!("Backup saved to: {}", output_path.display()));
        print_warning("Keep this file safe and secret!");
        return Ok(());
    }

    println!();
    print_warning("Anyone with these values controls your wallets.");
    if !prompt_confirm("Show recovery phrase and secrets on screen?")? {
        println!("Aborted.");
        return Ok(());
    }

    println!();
    println!("Recovery phrase:");
    print_phrase(&session.seed().words());
    println!();

    for (i, wallet) in session.wallets().iter().enumerate() {
        println!("Wallet {}", i);
        println!("  Pub: {}", wallet.public);
        println!("  Sec: {}", wallet.secret);
    }

    Ok(())
}

fn backup_text(session: &Session, created: chrono::DateTime<chrono::Utc>) -> String {
    let mut text = format!(
        "# Seed Wallet Backup\n\
         # Created: {}\n\
         #\n\
         # KEEP THIS FILE SAFE AND SECRET!\n\
         # Anyone with this phrase can access your funds.\n\
         \n\
         {}\n",
        created.format("%Y-%m-%d %H:%M:%S UTC"),
        session.phrase()
    );

    for (i, wallet) in session.wallets().iter().enumerate() {
        text.push_str(&format!("\n# Wallet {}\n{}\n{}\n", i, wallet.public, wallet.secret));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_text() {
        let mut session = Session::recover(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        )
        .unwrap();
        session.derive_wallets(2).unwrap();

        let created = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text = backup_text(&session, created);

        assert!(text.contains("# Created: 2024-01-02 03:04:05 UTC"));
        assert!(text.contains(session.phrase()));
        assert!(text.contains("# Wallet 1"));
        assert!(text.contains(&session.wallets()[1].secret));
    }
}
