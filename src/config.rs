//! Wallet Configuration
//!
//! Plain startup configuration for the wallet core. Built once by the
//! embedding process and handed to `AccountsRepository::new`.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::keystore::{BlobStore, FileBlobStore, KdfProfile, MemoryBlobStore};

/// Where encrypted records live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreBackend {
    /// JSON file on disk
    File(PathBuf),
    /// In-memory, lost on drop; for tests and ephemeral wallets
    Memory,
}

impl StoreBackend {
    pub(crate) fn build(&self) -> Arc<dyn BlobStore> {
        match self {
            StoreBackend::File(path) => Arc::new(FileBlobStore::new(path.clone())),
            StoreBackend::Memory => Arc::new(MemoryBlobStore::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Argon2id cost profile for key encryption
    pub kdf_profile: KdfProfile,
    /// Encrypted-record persistence backend
    pub store: StoreBackend,
    /// Chain id applied to transactions that do not carry one; mainnet
    pub default_chain_id: u64,
}

impl WalletConfig {
    /// File-backed config with standard KDF costs.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kdf_profile: KdfProfile::Standard,
            store: StoreBackend::File(path.into()),
            default_chain_id: 1,
        }
    }

    /// Memory-backed config for tests and ephemeral use.
    pub fn in_memory() -> Self {
        Self {
            kdf_profile: KdfProfile::Standard,
            store: StoreBackend::Memory,
            default_chain_id: 1,
        }
    }
}
