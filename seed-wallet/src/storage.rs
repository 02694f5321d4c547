//! Session Storage
//!
//! The whole session is kept as one JSON blob under the `wallet` key, i.e.
//! `<data_dir>/wallet.json`. Every write replaces the previous blob.
//!
//! The blob holds the phrase, seed and wallet secrets in plaintext. The file
//! is created with owner-only permissions on unix, and nothing more.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, WalletError};
use crate::session::{Session, StoredSession};

/// Storage key for the session blob
pub const STORAGE_KEY: &str = "wallet";

/// Persists a session to a single file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store inside `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the session, overwriting whatever was stored before.
    pub fn persist(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&session.to_stored())?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            // mode() only applies on creation
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(json.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, json)?;
        }

        warn!(
            "Seed phrase and wallet secrets stored unencrypted at {}",
            self.path.display()
        );
        debug!("Persisted {} wallet(s)", session.wallets().len());

        Ok(())
    }

    /// Read the stored session; `None` if nothing was ever stored.
    pub fn load(&self) -> Result<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSession = serde_json::from_str(&json).map_err(|e| {
            WalletError::Storage(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Session::from_stored(stored).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path());

        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
        assert!(store.path().ends_with("wallet.json"));
    }

    #[test]
    fn test_persist_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(&temp_dir.path().join("nested"));

        let mut session = Session::recover(TEST_MNEMONIC).unwrap();
        session.derive_wallets(2).unwrap();
        store.persist(&session).unwrap();

        assert!(store.exists());
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.phrase(), session.phrase());
        assert_eq!(loaded.seed().seed_bytes(), session.seed().seed_bytes());
        assert_eq!(loaded.wallets(), session.wallets());
    }

    #[test]
    fn test_persist_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path());

        let mut first = Session::recover(TEST_MNEMONIC).unwrap();
        first.derive_wallets(3).unwrap();
        store.persist(&first).unwrap();

        let second = Session::create().unwrap();
        store.persist(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.phrase(), second.phrase());
        assert!(loaded.wallets().is_empty());
    }

    #[test]
    fn test_blob_shape() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path());

        let mut session = Session::recover(TEST_MNEMONIC).unwrap();
        session.add_wallet().unwrap();
        store.persist(&session).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["phrase"], TEST_MNEMONIC);
        assert!(value["seed"].is_string());
        assert!(value["wallets"][0]["secret"].is_string());
        assert!(value["wallets"][0]["public"].is_string());
    }

    #[test]
    fn test_malformed_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(WalletError::Storage(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path());
        store.persist(&Session::create().unwrap()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
