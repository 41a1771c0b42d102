//! Blob Persistence
//!
//! The surrounding persistence mechanism is an external collaborator;
//! only the encrypted-record shape is a contract of this core. The
//! `BlobStore` trait is the seam, with a JSON-file implementation for
//! processes and an in-memory one for tests and ephemeral wallets.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use super::EncryptedKeyBlob;
use crate::error::{WalletError, WalletResult};

/// Record key for the single active account slot
pub const ACTIVE_KEY_ID: &str = "active";

/// Record key for the encrypted mnemonic backup
pub const MNEMONIC_KEY_ID: &str = "mnemonic-backup";

/// Persistence seam for encrypted key records.
///
/// Implementations must serialize concurrent access to the same record;
/// a save racing a concurrent load must observe either the old or the
/// new blob, never a torn one.
pub trait BlobStore: Send + Sync {
    fn put(&self, blob: &EncryptedKeyBlob) -> WalletResult<()>;
    fn get(&self, key_id: &str) -> WalletResult<Option<EncryptedKeyBlob>>;
    fn delete(&self, key_id: &str) -> WalletResult<()>;
}

/// In-memory store for tests and ephemeral wallets.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, EncryptedKeyBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, blob: &EncryptedKeyBlob) -> WalletResult<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        blobs.insert(blob.key_id.clone(), blob.clone());
        Ok(())
    }

    fn get(&self, key_id: &str) -> WalletResult<Option<EncryptedKeyBlob>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        Ok(blobs.get(key_id).cloned())
    }

    fn delete(&self, key_id: &str) -> WalletResult<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        blobs.remove(key_id);
        Ok(())
    }
}

/// JSON-file store: one file holding a key_id → blob map.
pub struct FileBlobStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> WalletResult<HashMap<String, EncryptedKeyBlob>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let map = serde_json::from_str(&raw)?;
        Ok(map)
    }

    fn write_all(&self, map: &HashMap<String, EncryptedKeyBlob>) -> WalletResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(map)?;
        // Write-then-rename so a crash never leaves a torn record
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BlobStore for FileBlobStore {
    fn put(&self, blob: &EncryptedKeyBlob) -> WalletResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        let mut map = self.read_all()?;
        map.insert(blob.key_id.clone(), blob.clone());
        self.write_all(&map)
    }

    fn get(&self, key_id: &str) -> WalletResult<Option<EncryptedKeyBlob>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        Ok(self.read_all()?.remove(key_id))
    }

    fn delete(&self, key_id: &str) -> WalletResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| WalletError::internal("Blob store lock poisoned"))?;
        let mut map = self.read_all()?;
        if map.remove(key_id).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}
