//! In-process `LedgerClient` for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::Commitment;
use crate::error::{Result, WalletError};
use crate::keys::Pubkey;
use crate::rpc::{LatestBlockhash, LedgerClient, SignatureInfo, TransactionDetail};
use crate::transaction::SignedTransfer;

#[derive(Default)]
pub(crate) struct MockLedger {
    pub balance: u64,
    pub signatures: Vec<SignatureInfo>,
    /// Per-signature response delay and detail
    pub transactions: HashMap<String, (Duration, Option<TransactionDetail>)>,
    pub fail_balance: bool,
    pub fail_history: bool,
    pub fail_send: bool,

    pub calls: AtomicUsize,
    /// Signatures in the order their detail lookups finished
    pub completed: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<SignedTransfer>>,
    pub confirmations: Mutex<Vec<(String, Commitment)>>,
    pub airdrops: Mutex<Vec<(Pubkey, u64)>>,
}

impl MockLedger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn unavailable() -> WalletError {
        WalletError::Rpc {
            code: -32005,
            message: "Node is unhealthy".into(),
        }
    }
}

pub(crate) fn signature_info(signature: &str, slot: u64) -> SignatureInfo {
    SignatureInfo {
        signature: signature.to_string(),
        slot,
        err: None,
        memo: None,
        block_time: Some(1_700_000_000 + slot as i64),
        confirmation_status: Some("finalized".into()),
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_balance(&self, _address: &Pubkey) -> Result<u64> {
        self.record_call();
        if self.fail_balance {
            return Err(Self::unavailable());
        }
        Ok(self.balance)
    }

    async fn get_signatures_for_address(
        &self,
        _address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        self.record_call();
        if self.fail_history {
            return Err(Self::unavailable());
        }
        Ok(self.signatures.iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>> {
        self.record_call();
        let (delay, detail) = self
            .transactions
            .get(signature)
            .cloned()
            .unwrap_or((Duration::ZERO, None));
        tokio::time::sleep(delay).await;
        self.completed.lock().unwrap().push(signature.to_string());
        Ok(detail)
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        self.record_call();
        Ok(LatestBlockhash {
            blockhash: bs58::encode([7u8; 32]).into_string(),
            last_valid_block_height: 1_000,
        })
    }

    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<String> {
        self.record_call();
        self.airdrops.lock().unwrap().push((*address, lamports));
        Ok("airdrop-signature".into())
    }

    async fn send_transaction(&self, transaction: &SignedTransfer) -> Result<String> {
        self.record_call();
        if self.fail_send {
            return Err(WalletError::Rpc {
                code: -32002,
                message: "Transaction simulation failed: insufficient lamports".into(),
            });
        }
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signature())
    }

    async fn confirm_transaction(
        &self,
        signature: &str,
        _blockhash: &LatestBlockhash,
        commitment: Commitment,
    ) -> Result<()> {
        self.record_call();
        self.confirmations
            .lock()
            .unwrap()
            .push((signature.to_string(), commitment));
        Ok(())
    }
}
