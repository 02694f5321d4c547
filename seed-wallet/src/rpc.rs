//! Ledger RPC Client
//!
//! JSON-RPC 2.0 client for a Solana-style node, behind the `LedgerClient`
//! trait so the explorer and transfer flows can run against any backend.
//!
//! There is no retry or failover here: each call either returns the node's
//! answer or an error for the caller to report.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::config::{Commitment, WalletConfig};
use crate::error::{Result, WalletError};
use crate::keys::Pubkey;
use crate::transaction::SignedTransfer;

/// Default timeout for RPC requests
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between signature status polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// JSON-RPC request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// Read operations that the node wraps in `{ context, value }`
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Network operations the wallet needs.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance in lamports
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    /// Most recent signatures involving `address`, newest first
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>>;

    /// Full transaction detail; `None` if the node does not know it
    async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>>;

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash>;

    /// Ask the faucet for test currency; returns the airdrop signature
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<String>;

    /// Submit a signed transaction; returns its signature
    async fn send_transaction(&self, transaction: &SignedTransfer) -> Result<String>;

    /// Wait until `signature` reaches `commitment` or `blockhash` expires
    async fn confirm_transaction(
        &self,
        signature: &str,
        blockhash: &LatestBlockhash,
        commitment: Commitment,
    ) -> Result<()>;

    /// Submit and wait for confirmation
    async fn send_and_confirm(
        &self,
        transaction: &SignedTransfer,
        blockhash: &LatestBlockhash,
        commitment: Commitment,
    ) -> Result<String> {
        let signature = self.send_transaction(transaction).await?;
        self.confirm_transaction(&signature, blockhash, commitment)
            .await?;
        Ok(signature)
    }
}

/// JSON-RPC client for a single node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
    commitment: Commitment,
    poll_interval: Duration,
}

impl RpcClient {
    /// Create a client with default timeout and `confirmed` commitment
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_options(url, RPC_TIMEOUT, Commitment::default(), POLL_INTERVAL)
    }

    pub fn with_options(
        url: impl Into<String>,
        timeout: Duration,
        commitment: Commitment,
        poll_interval: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            commitment,
            poll_interval,
        })
    }

    /// Create a client from wallet configuration
    pub fn from_config(config: &WalletConfig) -> Result<Self> {
        Self::with_options(
            config.effective_rpc_url(),
            config.rpc_timeout(),
            config.commitment,
            config.confirm_poll_interval(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Execute one JSON-RPC call
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let json_response: JsonRpcResponse<T> = response.json().await?;

        debug!(
            "{} #{} answered in {}ms",
            method,
            id,
            start.elapsed().as_millis()
        );

        if let Some(error) = json_response.error {
            return Err(WalletError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        json_response.result.ok_or(WalletError::MissingResult)
    }

    /// Like `call`, but a JSON `null` result is a valid answer
    async fn call_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>> {
        match self.call::<Option<T>>(method, params).await {
            Ok(value) => Ok(value),
            Err(WalletError::MissingResult) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Status of each signature, aligned with the input
    pub async fn get_signature_statuses(
        &self,
        signatures: &[&str],
    ) -> Result<Vec<Option<SignatureStatus>>> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([signatures, { "searchTransactionHistory": false }]),
            )
            .await?;
        Ok(result.value)
    }

    pub async fn get_block_height(&self) -> Result<u64> {
        self.call(
            "getBlockHeight",
            json!([{ "commitment": self.commitment.as_str() }]),
        )
        .await
    }

    /// `getTransaction` does not accept `processed`
    fn read_commitment(&self) -> Commitment {
        self.commitment.max(Commitment::Confirmed)
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        let result: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(result.value)
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        self.call(
            "getSignaturesForAddress",
            json!([
                address.to_string(),
                { "limit": limit, "commitment": self.read_commitment().as_str() }
            ]),
        )
        .await
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<TransactionDetail>> {
        self.call_optional(
            "getTransaction",
            json!([
                signature,
                {
                    "encoding": "json",
                    "maxSupportedTransactionVersion": 0,
                    "commitment": self.read_commitment().as_str()
                }
            ]),
        )
        .await
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        let result: WithContext<LatestBlockhash> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(result.value)
    }

    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<String> {
        self.call(
            "requestAirdrop",
            json!([address.to_string(), lamports, { "commitment": self.commitment.as_str() }]),
        )
        .await
    }

    async fn send_transaction(&self, transaction: &SignedTransfer) -> Result<String> {
        let signature: String = self
            .call(
                "sendTransaction",
                json!([
                    transaction.to_base64(),
                    { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
                ]),
            )
            .await?;

        if signature != transaction.signature() {
            warn!(
                "Node returned signature {} for transaction {}",
                signature,
                transaction.signature()
            );
        }

        Ok(signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &str,
        blockhash: &LatestBlockhash,
        commitment: Commitment,
    ) -> Result<()> {
        loop {
            let statuses = self.get_signature_statuses(&[signature]).await?;

            if let Some(Some(status)) = statuses.into_iter().next() {
                if let Some(err) = &status.err {
                    return Err(WalletError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status.reached(commitment) {
                    debug!("{} reached {}", signature, commitment.as_str());
                    return Ok(());
                }
            }

            let height = self.get_block_height().await?;
            if height > blockhash.last_valid_block_height {
                return Err(WalletError::BlockhashExpired(signature.to_string()));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

// Response types for RPC calls

/// One entry of `getSignaturesForAddress`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

/// `getTransaction` result
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: TransactionBody,
}

/// Execution metadata; balances are indexed like the account list
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
}

/// The signed part of a transaction; only signatures are used here
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TransactionBody {
    #[serde(default)]
    pub signatures: Vec<String>,
}

/// `getLatestBlockhash` value
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

impl SignatureStatus {
    /// Commitment level this status has reached
    pub fn commitment(&self) -> Commitment {
        match self.confirmation_status.as_deref() {
            Some(level) => level.parse().unwrap_or(Commitment::Processed),
            None if self.confirmations.is_none() => Commitment::Finalized,
            None => Commitment::Processed,
        }
    }

    pub fn reached(&self, commitment: Commitment) -> bool {
        self.commitment() >= commitment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_commitment() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 10,
            "confirmations": 3,
            "err": null,
            "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert_eq!(status.commitment(), Commitment::Confirmed);
        assert!(status.reached(Commitment::Processed));
        assert!(status.reached(Commitment::Confirmed));
        assert!(!status.reached(Commitment::Finalized));

        let rooted: SignatureStatus = serde_json::from_value(json!({
            "slot": 10,
            "confirmations": null,
            "err": null
        }))
        .unwrap();
        assert!(rooted.reached(Commitment::Finalized));
    }

    #[test]
    fn test_transaction_detail_parsing() {
        let detail: TransactionDetail = serde_json::from_value(json!({
            "slot": 5,
            "blockTime": 1700000000,
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [4000000000u64, 0, 1],
                "postBalances": [5000000000u64, 0, 1],
                "logMessages": []
            },
            "transaction": {
                "signatures": ["sig1"],
                "message": { "accountKeys": [] }
            }
        }))
        .unwrap();

        let meta = detail.meta.unwrap();
        assert_eq!(meta.pre_balances[0], 4_000_000_000);
        assert_eq!(meta.post_balances[0], 5_000_000_000);
        assert_eq!(detail.transaction.signatures, vec!["sig1".to_string()]);
    }

    #[test]
    fn test_meta_without_balances() {
        let meta: TransactionMeta = serde_json::from_value(json!({ "fee": 5000 })).unwrap();
        assert!(meta.pre_balances.is_empty());
        assert!(meta.post_balances.is_empty());
    }

    #[test]
    fn test_client_from_config() {
        let config = WalletConfig::default();
        let client = RpcClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "https://api.devnet.solana.com");
        assert_eq!(client.commitment(), Commitment::Confirmed);
    }
}
