//! Accounts Repository
//!
//! Orchestrates the mnemonic, derivation, keystore, and signing layers
//! behind an async API. The repository holds exactly one active account
//! (replace-only) plus an optional encrypted mnemonic backup.
//!
//! Argon2id and ECDSA work runs under `spawn_blocking` so repository
//! calls never stall the async runtime. Plaintext key material exists
//! only inside `Zeroizing` scopes within a single blocking call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::config::WalletConfig;
use crate::derivation;
use crate::error::{WalletError, WalletResult};
use crate::keystore::{
    BlobStore, EncryptedKeyStore, ACTIVE_KEY_ID, MNEMONIC_KEY_ID,
};
use crate::mnemonic;
use crate::tx::{self, Transaction, Wei};
use crate::types::Address;
use crate::{log_debug, log_info, log_warn};

/// Cooperative cancellation handle.
///
/// Checked only before a unit of work begins; an operation that has
/// started decrypting or signing always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    fn check(&self) -> WalletResult<()> {
        if self.is_cancelled() {
            Err(WalletError::cancelled())
        } else {
            Ok(())
        }
    }
}

/// Handle to the currently active account: its address plus the ability
/// to sign, never the key itself.
#[derive(Clone)]
pub struct ActiveAccount {
    pub address: Address,
    repo: AccountsRepository,
}

impl std::fmt::Debug for ActiveAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl ActiveAccount {
    /// Sign a transaction with this account's key.
    pub async fn sign_transaction(&self, tx: &Transaction) -> WalletResult<String> {
        self.repo.sign_transaction(tx).await
    }
}

struct RepoInner {
    key_store: EncryptedKeyStore,
    blobs: Arc<dyn BlobStore>,
    credential: RwLock<Option<SecretString>>,
    active: RwLock<Option<Address>>,
    // Serializes read-modify-write sequences against the blob store
    store_lock: Mutex<()>,
    cancel: CancelFlag,
    default_chain_id: u64,
}

/// Cheaply cloneable; clones share the same store and active pointer.
#[derive(Clone)]
pub struct AccountsRepository {
    inner: Arc<RepoInner>,
}

impl AccountsRepository {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            inner: Arc::new(RepoInner {
                key_store: EncryptedKeyStore::new(config.kdf_profile),
                blobs: config.store.build(),
                credential: RwLock::new(None),
                active: RwLock::new(None),
                store_lock: Mutex::new(()),
                cancel: CancelFlag::new(),
                default_chain_id: config.default_chain_id,
            }),
        }
    }

    /// The cancellation handle shared by all operations on this repository.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.inner.cancel.clone()
    }

    pub fn default_chain_id(&self) -> u64 {
        self.inner.default_chain_id
    }

    /// Set the unlock credential for subsequent encrypt/decrypt operations.
    pub fn set_credential(&self, credential: SecretString) -> WalletResult<()> {
        let mut slot = write_lock(&self.inner.credential)?;
        *slot = Some(credential);
        Ok(())
    }

    /// Drop the unlock credential; operations needing it fail with a
    /// credential error until it is set again.
    pub fn clear_credential(&self) -> WalletResult<()> {
        let mut slot = write_lock(&self.inner.credential)?;
        *slot = None;
        Ok(())
    }

    /// Generate a fresh mnemonic. Does not touch the store.
    pub fn generate_mnemonic(&self, strength_bits: usize) -> WalletResult<String> {
        mnemonic::generate(strength_bits)
    }

    pub fn validate_mnemonic(&self, phrase: &str) -> WalletResult<()> {
        mnemonic::validate(phrase)
    }

    /// Build a value-transfer transaction on the default chain, padding
    /// the gas estimate by 10%.
    pub fn build_transfer(
        &self,
        to: Address,
        value: Wei,
        nonce: u64,
        gas_price: Wei,
        gas_estimate: u64,
    ) -> Transaction {
        Transaction {
            nonce,
            gas_price,
            start_gas: Transaction::adjusted_start_gas(gas_estimate),
            to: Some(to),
            value,
            data: Vec::new(),
            chain_id: self.inner.default_chain_id,
        }
    }

    /// Encrypt and persist a private key, making it the active account.
    /// Replaces any previous active account.
    pub async fn save_account(&self, private_key: &[u8]) -> WalletResult<Address> {
        self.inner.cancel.check()?;
        let key = derivation::validate_private_key(private_key)?;
        let credential = self.require_credential()?;
        let inner = self.inner.clone();

        let address = run_blocking(move || {
            let key = Zeroizing::new(key);
            let address = derivation::address_from_private_key(&key)?;

            let blob = inner.key_store.encrypt(ACTIVE_KEY_ID, key.as_ref(), &credential)?;

            let _guard = store_guard(&inner.store_lock)?;
            inner.blobs.put(&blob)?;
            let mut active = write_lock(&inner.active)?;
            *active = Some(address);
            Ok(address)
        })
        .await?;

        log_info!("accounts", "Account saved", address = address.to_checksum());
        Ok(address)
    }

    /// Validate a mnemonic, derive the key at `account_index`, and save it.
    pub async fn save_account_from_mnemonic(
        &self,
        phrase: &str,
        passphrase: &str,
        account_index: u32,
    ) -> WalletResult<Address> {
        self.inner.cancel.check()?;
        mnemonic::validate(phrase)?;

        let phrase = Zeroizing::new(phrase.to_string());
        let passphrase = Zeroizing::new(passphrase.to_string());
        let derived = run_blocking(move || {
            let seed = mnemonic::to_seed(&phrase, &passphrase)?;
            derivation::derive(seed.as_ref(), account_index)
        })
        .await?;

        log_debug!("accounts", "Derived account from mnemonic", index = account_index);
        self.save_account(derived.private_key.as_ref()).await
    }

    /// Load the active account: decrypts transiently to recover the
    /// address, returns a handle with no key material.
    pub async fn load_active_account(&self) -> WalletResult<ActiveAccount> {
        self.inner.cancel.check()?;

        // Fast path: pointer already populated
        if let Some(address) = *read_lock(&self.inner.active)? {
            return Ok(ActiveAccount {
                address,
                repo: self.clone(),
            });
        }

        let credential = self.require_credential()?;
        let inner = self.inner.clone();

        let address = run_blocking(move || {
            let blob = inner
                .blobs
                .get(ACTIVE_KEY_ID)?
                .ok_or_else(WalletError::no_active_account)?;

            let plaintext = inner.key_store.decrypt(&blob, &credential)?;
            let key = derivation::validate_private_key(&plaintext)?;
            let key = Zeroizing::new(key);
            let address = derivation::address_from_private_key(&key)?;

            let mut active = write_lock(&inner.active)?;
            *active = Some(address);
            Ok(address)
        })
        .await?;

        log_debug!("accounts", "Active account loaded", address = address.to_checksum());
        Ok(ActiveAccount {
            address,
            repo: self.clone(),
        })
    }

    /// Sign a transaction with the active account's key.
    ///
    /// The key is decrypted, used, and zeroized within one blocking call.
    /// Returns the 130-character hex signature.
    pub async fn sign_transaction(&self, tx: &Transaction) -> WalletResult<String> {
        self.inner.cancel.check()?;
        tx.validate()?;
        let credential = self.require_credential()?;
        let inner = self.inner.clone();
        let tx_owned = tx.clone();

        let signature = run_blocking(move || {
            let blob = inner
                .blobs
                .get(ACTIVE_KEY_ID)?
                .ok_or_else(WalletError::no_active_account)?;

            let plaintext = inner.key_store.decrypt(&blob, &credential)?;
            let key = Zeroizing::new(derivation::validate_private_key(&plaintext)?);
            tx::sign_transaction(&tx_owned, &key)
        })
        .await?;

        log_debug!("accounts", "Transaction signed", chain_id = tx.chain_id);
        Ok(signature.encode())
    }

    /// Encrypt and persist a mnemonic backup alongside the key record.
    pub async fn save_mnemonic(&self, phrase: &str) -> WalletResult<()> {
        self.inner.cancel.check()?;
        mnemonic::validate(phrase)?;
        let credential = self.require_credential()?;
        let inner = self.inner.clone();
        let phrase = Zeroizing::new(phrase.to_string());

        run_blocking(move || {
            let blob = inner
                .key_store
                .encrypt(MNEMONIC_KEY_ID, phrase.as_bytes(), &credential)?;
            let _guard = store_guard(&inner.store_lock)?;
            inner.blobs.put(&blob)
        })
        .await?;

        log_info!("accounts", "Mnemonic backup saved");
        Ok(())
    }

    /// Decrypt the mnemonic backup. Returns a zeroizing buffer holding
    /// the phrase.
    pub async fn load_mnemonic(&self) -> WalletResult<Zeroizing<String>> {
        self.inner.cancel.check()?;
        let credential = self.require_credential()?;
        let inner = self.inner.clone();

        run_blocking(move || {
            let blob = inner
                .blobs
                .get(MNEMONIC_KEY_ID)?
                .ok_or_else(|| WalletError::invalid_input("No mnemonic backup stored"))?;

            let plaintext = inner.key_store.decrypt(&blob, &credential)?;
            let phrase = String::from_utf8(plaintext.to_vec())
                .map_err(|_| WalletError::internal("Stored mnemonic is not valid UTF-8"))?;
            Ok(Zeroizing::new(phrase))
        })
        .await
    }

    /// Delete the stored account and mnemonic backup and forget the
    /// credential. The encrypted records are unrecoverable afterwards.
    pub async fn wipe(&self) -> WalletResult<()> {
        let inner = self.inner.clone();
        run_blocking(move || {
            let _guard = store_guard(&inner.store_lock)?;
            inner.blobs.delete(ACTIVE_KEY_ID)?;
            inner.blobs.delete(MNEMONIC_KEY_ID)?;
            let mut active = write_lock(&inner.active)?;
            *active = None;
            Ok(())
        })
        .await?;
        self.clear_credential()?;

        log_warn!("accounts", "Wallet wiped");
        Ok(())
    }

    fn require_credential(&self) -> WalletResult<SecretString> {
        read_lock(&self.inner.credential)?
            .clone()
            .ok_or_else(|| WalletError::credential_required("Unlock credential not set"))
    }
}

async fn run_blocking<T, F>(f: F) -> WalletResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> WalletResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WalletError::internal(format!("Blocking task failed: {}", e)))?
}

fn read_lock<T>(lock: &RwLock<T>) -> WalletResult<std::sync::RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| WalletError::internal("Repository lock poisoned"))
}

fn write_lock<T>(lock: &RwLock<T>) -> WalletResult<std::sync::RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| WalletError::internal("Repository lock poisoned"))
}

fn store_guard(lock: &Mutex<()>) -> WalletResult<std::sync::MutexGuard<'_, ()>> {
    lock.lock()
        .map_err(|_| WalletError::internal("Store lock poisoned"))
}
