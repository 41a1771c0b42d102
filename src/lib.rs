//! Ethereum wallet core: account management and transaction signing.
//!
//! Everything a host application needs to run a single-account wallet
//! without touching key material itself:
//!
//! - BIP39 mnemonic generation and validation across five word lists
//! - BIP44 key derivation at `m/44'/60'/0'/0/{index}`
//! - Encrypted key storage (Argon2id + AES-256-GCM) behind a pluggable
//!   `BlobStore`
//! - Legacy-transaction signing with EIP-155 replay protection
//! - A fixed hex wire format for signatures
//!
//! The [`AccountsRepository`] is the front door; the lower modules are
//! exposed for callers that need the pieces individually.
//!
//! SECURITY: private keys, seeds, and mnemonics live in `Zeroizing`
//! buffers and never appear in logs; the unlock credential is held as a
//! `SecretString`.

pub mod accounts;
pub mod config;
pub mod derivation;
pub mod error;
pub mod keystore;
pub mod mnemonic;
pub mod tx;
pub mod types;
pub mod utils;
pub mod wordlist;

pub use accounts::{AccountsRepository, ActiveAccount, CancelFlag};
pub use config::{StoreBackend, WalletConfig};
pub use error::{ErrorCode, WalletError, WalletResult};
pub use keystore::{EncryptedKeyBlob, EncryptedKeyStore, KdfParams, KdfProfile};
pub use tx::{Signature, Transaction, Wei, CHAIN_ID_ANY};
pub use types::Address;
