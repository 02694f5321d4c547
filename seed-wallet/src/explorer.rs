//! Explorer View
//!
//! Read-only view of one address: its balance and its most recent
//! transactions, plus the test-network airdrop.

use futures::future::join_all;
use std::future::Future;
use tracing::{debug, info};

use crate::config::Commitment;
use crate::error::Result;
use crate::keys::Pubkey;
use crate::rpc::{LedgerClient, SignatureInfo, TransactionDetail, TransactionMeta};
use crate::transaction::LAMPORTS_PER_SOL;

/// Number of transactions shown when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Run every future concurrently and return their outputs in input order,
/// whatever order they finish in.
pub async fn ordered_join<I, F, T>(futures: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    join_all(futures).await
}

/// Balance change of the first account (the fee payer), in SOL.
///
/// Missing metadata or balances count as no change.
pub fn transaction_delta(meta: Option<&TransactionMeta>) -> f64 {
    let Some(meta) = meta else {
        return 0.0;
    };
    match (meta.pre_balances.first(), meta.post_balances.first()) {
        (Some(&pre), Some(&post)) => (post as f64 - pre as f64) / LAMPORTS_PER_SOL as f64,
        _ => 0.0,
    }
}

/// One line of transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    /// Position in the history, newest first
    pub index: usize,
    pub signature: String,
    /// Balance change in SOL
    pub delta: f64,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub failed: bool,
}

impl TransactionRow {
    fn new(index: usize, info: &SignatureInfo, detail: Option<&TransactionDetail>) -> Self {
        let meta = detail.and_then(|d| d.meta.as_ref());
        let signature = detail
            .and_then(|d| d.transaction.signatures.first().cloned())
            .unwrap_or_else(|| info.signature.clone());

        Self {
            index,
            signature,
            delta: transaction_delta(meta),
            slot: detail.map(|d| d.slot).unwrap_or(info.slot),
            block_time: detail.and_then(|d| d.block_time).or(info.block_time),
            failed: meta.map(|m| m.err.is_some()).unwrap_or(false) || info.err.is_some(),
        }
    }
}

/// Balance and history of one address.
///
/// Each half is loaded on its own, so one can fail while the other is shown.
#[derive(Debug)]
pub struct Overview {
    pub address: Pubkey,
    pub balance: Result<u64>,
    pub transactions: Result<Vec<TransactionRow>>,
}

/// Balance in lamports
pub async fn load_balance<C: LedgerClient + ?Sized>(client: &C, address: &Pubkey) -> Result<u64> {
    let balance = client.get_balance(address).await?;
    debug!("{} holds {} lamports", address, balance);
    Ok(balance)
}

/// Up to `limit` most recent transactions, newest first.
pub async fn load_transactions<C: LedgerClient + ?Sized>(
    client: &C,
    address: &Pubkey,
    limit: usize,
) -> Result<Vec<TransactionRow>> {
    let signatures = client.get_signatures_for_address(address, limit).await?;
    debug!(
        "Fetching {} transaction(s) for {}",
        signatures.len(),
        address
    );

    let details = ordered_join(
        signatures
            .iter()
            .map(|info| client.get_transaction(&info.signature)),
    )
    .await;

    signatures
        .iter()
        .zip(details)
        .enumerate()
        .map(|(index, (info, detail))| detail.map(|d| TransactionRow::new(index, info, d.as_ref())))
        .collect()
}

/// Balance and history, loaded side by side.
pub async fn load_overview<C: LedgerClient + ?Sized>(
    client: &C,
    address: Pubkey,
    limit: usize,
) -> Overview {
    let (balance, transactions) = tokio::join!(
        load_balance(client, &address),
        load_transactions(client, &address, limit)
    );

    Overview {
        address,
        balance,
        transactions,
    }
}

/// Request `lamports` of test currency and wait until the airdrop is
/// finalized. Returns the airdrop signature.
pub async fn request_airdrop<C: LedgerClient + ?Sized>(
    client: &C,
    address: &Pubkey,
    lamports: u64,
) -> Result<String> {
    let signature = client.request_airdrop(address, lamports).await?;
    info!("Airdrop {} requested for {}", signature, address);

    let latest = client.get_latest_blockhash().await?;
    client
        .confirm_transaction(&signature, &latest, Commitment::Finalized)
        .await?;

    info!("Airdrop {} finalized", signature);
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_ledger::{signature_info, MockLedger};
    use crate::rpc::TransactionBody;
    use std::time::Duration;

    fn detail(signature: &str, pre: Vec<u64>, post: Vec<u64>) -> TransactionDetail {
        TransactionDetail {
            slot: 1,
            block_time: None,
            meta: Some(TransactionMeta {
                err: None,
                fee: 5000,
                pre_balances: pre,
                post_balances: post,
            }),
            transaction: TransactionBody {
                signatures: vec![signature.to_string()],
            },
        }
    }

    #[test]
    fn test_delta() {
        let meta = TransactionMeta {
            pre_balances: vec![4_000_000_000, 10],
            post_balances: vec![5_000_000_000, 10],
            ..Default::default()
        };
        assert_eq!(transaction_delta(Some(&meta)), 1.0);

        let spent = TransactionMeta {
            pre_balances: vec![3_000_000_000],
            post_balances: vec![2_499_995_000],
            ..Default::default()
        };
        assert_eq!(transaction_delta(Some(&spent)), -0.500005);
    }

    #[test]
    fn test_delta_missing_data() {
        let no_pre = TransactionMeta {
            post_balances: vec![5_000_000_000],
            ..Default::default()
        };
        assert_eq!(transaction_delta(Some(&no_pre)), 0.0);

        let no_post = TransactionMeta {
            pre_balances: vec![5_000_000_000],
            ..Default::default()
        };
        assert_eq!(transaction_delta(Some(&no_post)), 0.0);

        assert_eq!(transaction_delta(None), 0.0);
    }

    #[tokio::test]
    async fn test_ordered_join_keeps_input_order() {
        let delays = [30u64, 5, 15];
        let out = ordered_join(delays.iter().enumerate().map(|(i, &ms)| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            i
        }))
        .await;
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_history_order_survives_completion_order() {
        let mut ledger = MockLedger {
            signatures: vec![
                signature_info("S1", 30),
                signature_info("S2", 20),
                signature_info("S3", 10),
            ],
            ..Default::default()
        };
        ledger.transactions.insert(
            "S1".into(),
            (Duration::from_millis(60), Some(detail("S1", vec![0], vec![1_000_000_000]))),
        );
        ledger.transactions.insert(
            "S2".into(),
            (Duration::from_millis(5), Some(detail("S2", vec![2], vec![1]))),
        );
        ledger.transactions.insert(
            "S3".into(),
            (Duration::from_millis(30), Some(detail("S3", vec![], vec![]))),
        );

        let rows = load_transactions(&ledger, &Pubkey::default(), 10)
            .await
            .unwrap();

        // S2 finished first, S1 last
        assert_eq!(ledger.completed.lock().unwrap().as_slice(), &["S2", "S3", "S1"]);

        let signatures: Vec<_> = rows.iter().map(|r| r.signature.as_str()).collect();
        assert_eq!(signatures, vec!["S1", "S2", "S3"]);
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(rows[0].delta, 1.0);
        assert_eq!(rows[2].delta, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_transaction_renders_neutral() {
        let ledger = MockLedger {
            signatures: vec![signature_info("gone", 7)],
            ..Default::default()
        };

        let rows = load_transactions(&ledger, &Pubkey::default(), 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].signature, "gone");
        assert_eq!(rows[0].delta, 0.0);
        assert_eq!(rows[0].slot, 7);
    }

    #[tokio::test]
    async fn test_history_limit() {
        let ledger = MockLedger {
            signatures: (0..15).map(|i| signature_info(&format!("S{}", i), i)).collect(),
            ..Default::default()
        };

        let rows = load_transactions(&ledger, &Pubkey::default(), DEFAULT_HISTORY_LIMIT)
            .await
            .unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9].signature, "S9");
    }

    #[tokio::test]
    async fn test_history_failure_keeps_balance() {
        let ledger = MockLedger {
            balance: 2_500_000_000,
            fail_history: true,
            ..Default::default()
        };

        let overview = load_overview(&ledger, Pubkey::default(), 10).await;
        assert_eq!(overview.balance.unwrap(), 2_500_000_000);
        assert!(overview.transactions.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_airdrop_waits_for_finalized() {
        let ledger = MockLedger::default();
        let address = Pubkey([3u8; 32]);

        let signature = request_airdrop(&ledger, &address, 1_000_000_000)
            .await
            .unwrap();

        assert_eq!(signature, "airdrop-signature");
        assert_eq!(
            ledger.airdrops.lock().unwrap().as_slice(),
            &[(address, 1_000_000_000)]
        );
        assert_eq!(
            ledger.confirmations.lock().unwrap().as_slice(),
            &[(signature, Commitment::Finalized)]
        );
    }
}
