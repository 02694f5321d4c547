//! Wallet configuration.
//!
//! Settings live in an optional `config.toml` inside the wallet data
//! directory. Command-line flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, WalletError};
use crate::transaction::sol_to_lamports;

/// Configuration file name inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default data directory name under the user's home
const DEFAULT_DATA_DIR: &str = ".seed-wallet";

/// Target network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// Public development network (airdrops available)
    #[default]
    Devnet,
    /// Public test network
    Testnet,
    /// Production network (no airdrops)
    MainnetBeta,
    /// A validator running on this machine
    Localnet,
}

impl Cluster {
    /// Public JSON-RPC endpoint for this cluster
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Whether the cluster hands out test currency
    pub fn supports_airdrop(&self) -> bool {
        !matches!(self, Cluster::MainnetBeta)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Localnet => write!(f, "localnet"),
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devnet" | "d" => Ok(Cluster::Devnet),
            "testnet" | "t" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" | "m" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Cluster::Localnet),
            _ => Err(format!("Unknown cluster: {}", s)),
        }
    }
}

/// Commitment level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Processed (fastest, but may be rolled back)
    Processed,
    /// Confirmed (supermajority vote)
    #[default]
    Confirmed,
    /// Finalized (rooted, most secure)
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            _ => Err(format!("Unknown commitment: {}", s)),
        }
    }
}

/// Wallet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Target network
    pub cluster: Cluster,

    /// Explicit RPC endpoint, overriding the cluster's public one
    pub rpc_url: Option<String>,

    /// Commitment used for reads and transfer confirmation
    pub commitment: Commitment,

    /// HTTP timeout per RPC request
    pub rpc_timeout_secs: u64,

    /// Delay between signature status polls while confirming
    pub confirm_poll_ms: u64,

    /// Number of recent transactions shown by the explorer
    pub history_limit: usize,

    /// Amount requested per airdrop, in SOL
    pub airdrop_sol: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            commitment: Commitment::default(),
            rpc_timeout_secs: 30,
            confirm_poll_ms: 500,
            history_limit: 10,
            airdrop_sol: 1.0,
        }
    }
}

impl WalletConfig {
    /// Load configuration from `<data_dir>/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| WalletError::Storage(format!("Failed to parse config: {}", e)))
    }

    /// Render as TOML, in the same shape `from_file` reads.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| WalletError::Storage(format!("Failed to serialize config: {}", e)))
    }

    /// Write configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// The endpoint requests go to
    pub fn effective_rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.rpc_url().to_string())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_ms)
    }

    /// Airdrop amount in lamports
    pub fn airdrop_lamports(&self) -> u64 {
        sol_to_lamports(self.airdrop_sol)
    }
}

/// Default wallet data directory (`~/.seed-wallet`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = WalletConfig::default();
        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.effective_rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.airdrop_lamports(), 1_000_000_000);
        assert_eq!(config.commitment, Commitment::Confirmed);
    }

    #[test]
    fn test_rpc_url_override() {
        let config = WalletConfig {
            rpc_url: Some("http://localhost:9000".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_rpc_url(), "http://localhost:9000");
    }

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("L".parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert!("moonnet".parse::<Cluster>().is_err());
        assert!(!Cluster::MainnetBeta.supports_airdrop());
        assert_eq!(Cluster::MainnetBeta.to_string(), "mainnet-beta");
    }

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Finalized > Commitment::Confirmed);
        assert!(Commitment::Confirmed > Commitment::Processed);
        assert_eq!("finalized".parse::<Commitment>().unwrap(), Commitment::Finalized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "cluster = \"testnet\"\nhistory_limit = 5\n",
        )
        .unwrap();

        let config = WalletConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.cluster, Cluster::Testnet);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.rpc_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = WalletConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, WalletConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = WalletConfig {
            cluster: Cluster::Localnet,
            commitment: Commitment::Finalized,
            ..Default::default()
        };
        config.save(&temp_dir.path().join(CONFIG_FILE)).unwrap();

        let loaded = WalletConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "cluster = 42").unwrap();
        assert!(WalletConfig::load(temp_dir.path()).is_err());
    }
}
