//! Encrypted Key Store
//!
//! Encrypts private key material at rest using:
//! - AES-256-GCM for authenticated encryption
//! - Argon2id for key derivation from the unlock credential
//! - Fresh random salt and nonce on every encrypt
//!
//! Decryption verifies the authentication tag before releasing any
//! plaintext; a wrong credential or corrupted blob always fails.

mod store;

pub use store::{BlobStore, FileBlobStore, MemoryBlobStore, ACTIVE_KEY_ID, MNEMONIC_KEY_ID};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};

const BLOB_VERSION: u8 = 1;
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Persisted encrypted-account record.
///
/// The GCM authentication tag is appended to `ciphertext` per AEAD
/// convention. Binary fields are base64.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EncryptedKeyBlob {
    /// Version for future compatibility
    pub version: u8,
    /// Logical record key ("active" slot or mnemonic backup)
    pub key_id: String,
    /// Salt used for key derivation (32 bytes, base64)
    pub salt: String,
    /// Nonce used for encryption (12 bytes, base64)
    pub nonce: String,
    /// Encrypted data (ciphertext + auth tag, base64)
    pub ciphertext: String,
    /// Key derivation parameters
    pub kdf_params: KdfParams,
}

/// Argon2id parameters
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism
    pub parallelism: u32,
}

impl KdfParams {
    /// Interactive-unlock defaults: 64 MiB, 3 iterations, 4 lanes
    pub fn standard() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Slower profile for high-value keys: 256 MiB, 4 iterations
    pub fn hardened() -> Self {
        Self {
            memory_cost: 262144,
            time_cost: 4,
            parallelism: 4,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// KDF profile selected at startup via configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdfProfile {
    Standard,
    Hardened,
}

impl KdfProfile {
    pub fn params(self) -> KdfParams {
        match self {
            KdfProfile::Standard => KdfParams::standard(),
            KdfProfile::Hardened => KdfParams::hardened(),
        }
    }
}

/// Encrypts and decrypts key blobs; owns no plaintext key material.
#[derive(Debug, Clone)]
pub struct EncryptedKeyStore {
    params: KdfParams,
}

impl EncryptedKeyStore {
    pub fn new(profile: KdfProfile) -> Self {
        Self {
            params: profile.params(),
        }
    }

    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }

    /// Encrypt key material under the unlock credential.
    ///
    /// Every call draws a fresh salt and nonce, so two encryptions of the
    /// same plaintext never produce the same blob.
    pub fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        credential: &SecretString,
    ) -> WalletResult<EncryptedKeyBlob> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let key = derive_cipher_key(credential, &salt, &self.params)?;

        let cipher = Aes256Gcm::new_from_slice(key.as_ref())
            .map_err(|e| WalletError::crypto_error(format!("Failed to create cipher: {}", e)))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| WalletError::crypto_error(format!("Encryption failed: {}", e)))?;

        Ok(EncryptedKeyBlob {
            version: BLOB_VERSION,
            key_id: key_id.to_string(),
            salt: base64_encode(&salt),
            nonce: base64_encode(&nonce_bytes),
            ciphertext: base64_encode(&ciphertext),
            kdf_params: self.params.clone(),
        })
    }

    /// Decrypt a blob with the unlock credential.
    ///
    /// The returned buffer is zeroized on drop; callers must keep its
    /// scope as short as possible. Tag verification happens inside the
    /// AEAD and is constant-time with respect to how much of it matched.
    pub fn decrypt(
        &self,
        blob: &EncryptedKeyBlob,
        credential: &SecretString,
    ) -> WalletResult<Zeroizing<Vec<u8>>> {
        if blob.version != BLOB_VERSION {
            return Err(WalletError::invalid_input(format!(
                "Unsupported blob version: {}",
                blob.version
            )));
        }

        let salt = base64_decode(&blob.salt)?;
        let nonce_bytes = base64_decode(&blob.nonce)?;
        let ciphertext = base64_decode(&blob.ciphertext)?;

        if salt.len() != SALT_LEN {
            return Err(WalletError::invalid_input("Invalid salt length"));
        }
        if nonce_bytes.len() != NONCE_LEN {
            return Err(WalletError::invalid_input("Invalid nonce length"));
        }

        // Re-derive with the parameters stored in the blob, not our own
        let key = derive_cipher_key(credential, &salt, &blob.kdf_params)?;

        let cipher = Aes256Gcm::new_from_slice(key.as_ref())
            .map_err(|e| WalletError::crypto_error(format!("Failed to create cipher: {}", e)))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| {
                WalletError::decryption_failed(
                    "Decryption failed: wrong credential or corrupted data",
                )
            })?;

        Ok(Zeroizing::new(plaintext))
    }
}

/// Derive the AES key from the credential using Argon2id
fn derive_cipher_key(
    credential: &SecretString,
    salt: &[u8],
    params: &KdfParams,
) -> WalletResult<Zeroizing<[u8; 32]>> {
    use argon2::{Algorithm, Argon2, Params, Version};

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| WalletError::crypto_error(format!("Invalid KDF params: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(credential.expose_secret().as_bytes(), salt, key.as_mut())
        .map_err(|e| WalletError::crypto_error(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

fn base64_decode(s: &str) -> WalletResult<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|e| WalletError::parse_error(format!("Invalid base64: {}", e)))
}
