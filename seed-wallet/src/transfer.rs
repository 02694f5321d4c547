//! Transfer Flow
//!
//! Validates user input, builds and signs one native transfer, and submits
//! it. Nothing is sent unless every input is present.

use tracing::info;

use crate::config::Commitment;
use crate::error::{Result, WalletError};
use crate::keys::{Pubkey, WalletKeypair};
use crate::rpc::LedgerClient;
use crate::transaction::{format_amount, parse_blockhash, sol_to_lamports, TransferMessage};

/// Commitment a transfer waits for before it is reported as sent
pub const TRANSFER_COMMITMENT: Commitment = Commitment::Confirmed;

/// Check the three transfer inputs without touching the network.
pub fn validate_transfer(source_secret: &str, destination: &str, amount_sol: f64) -> Result<()> {
    if source_secret.trim().is_empty() {
        return Err(WalletError::Validation("Source wallet secret is required".into()));
    }
    if destination.trim().is_empty() {
        return Err(WalletError::Validation("Destination address is required".into()));
    }
    if !amount_sol.is_finite() || amount_sol <= 0.0 {
        return Err(WalletError::Validation("Amount must be greater than zero".into()));
    }
    if sol_to_lamports(amount_sol) == 0 {
        return Err(WalletError::Validation(
            "Amount is smaller than one lamport".into(),
        ));
    }
    Ok(())
}

/// Send `amount_sol` from the wallet whose base58 keypair is
/// `source_secret` to `destination`. Returns the transaction signature once
/// it is confirmed.
pub async fn transfer<C: LedgerClient + ?Sized>(
    client: &C,
    source_secret: &str,
    destination: &str,
    amount_sol: f64,
) -> Result<String> {
    validate_transfer(source_secret, destination, amount_sol)?;

    let keypair = WalletKeypair::from_secret(source_secret)?;
    let to: Pubkey = destination.trim().parse()?;
    let lamports = sol_to_lamports(amount_sol);

    let latest = client.get_latest_blockhash().await?;
    let blockhash = parse_blockhash(&latest.blockhash)?;

    let signed = TransferMessage::new(keypair.pubkey(), to, lamports, blockhash).sign(&keypair)?;

    info!(
        "Sending {} from {} to {}",
        format_amount(lamports),
        keypair.pubkey(),
        to
    );

    let signature = client
        .send_and_confirm(&signed, &latest, TRANSFER_COMMITMENT)
        .await?;

    info!("Transfer {} confirmed", signature);
    Ok(signature)
}
