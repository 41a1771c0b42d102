//! Key Derivation
//!
//! Derives an account private key and Ethereum address from a BIP39 seed
//! using the standard BIP44 path `m/44'/60'/0'/0/{index}`.
//!
//! Derivation is a pure function of (seed, index): no state, no randomness.
//!
//! SECURITY: private key material is zeroized when no longer needed.

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use bitcoin::Network;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::types::Address;
use crate::utils::crypto::keccak256;

/// Account-level BIP44 path prefix for Ethereum (coin type 60)
pub const PATH_PREFIX: &str = "m/44'/60'/0'/0";

/// A private key with its derived address.
pub struct DerivedKey {
    pub private_key: Zeroizing<[u8; 32]>,
    pub address: Address,
}

/// Derive the private key and address for `account_index` from a seed.
///
/// Index 0 reproduces the default account. Indices in the hardened range
/// are rejected; the leaf step of the path is non-hardened.
pub fn derive(seed: &[u8], account_index: u32) -> WalletResult<DerivedKey> {
    if account_index >= 0x8000_0000 {
        return Err(WalletError::invalid_input(format!(
            "Account index out of range: {}",
            account_index
        )));
    }

    let secp = Secp256k1::new();
    // Network only affects xpriv serialization prefixes, not the math
    let master = Xpriv::new_master(Network::Bitcoin, seed)?;
    let path = DerivationPath::from_str(&format!("{}/{}", PATH_PREFIX, account_index))?;
    let child = master.derive_priv(&secp, &path)?;

    let private_key = Zeroizing::new(child.private_key.secret_bytes());
    let address = address_for(&secp, &child.private_key);

    Ok(DerivedKey { private_key, address })
}

/// Validate raw private key material: 32 bytes, non-zero, below the curve order.
pub fn validate_private_key(bytes: &[u8]) -> WalletResult<[u8; 32]> {
    if bytes.len() != 32 {
        return Err(WalletError::invalid_private_key(format!(
            "Private key must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    // SecretKey::from_slice rejects zero and values >= the curve order
    SecretKey::from_slice(bytes)
        .map_err(|e| WalletError::invalid_private_key(format!("Invalid scalar: {}", e)))?;

    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Compute the Ethereum address for a raw private key.
pub fn address_from_private_key(private_key: &[u8; 32]) -> WalletResult<Address> {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(private_key)
        .map_err(|e| WalletError::invalid_private_key(format!("Invalid scalar: {}", e)))?;
    Ok(address_for(&secp, &sk))
}

fn address_for(secp: &Secp256k1<bitcoin::secp256k1::All>, sk: &SecretKey) -> Address {
    let pk = PublicKey::from_secret_key(secp, sk);
    let uncompressed = pk.serialize_uncompressed();
    // Address = last 20 bytes of keccak256 of the 64-byte public key point
    let hash = keccak256(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic;

    const VECTOR_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_derive_is_deterministic() {
        let seed = mnemonic::to_seed(VECTOR_PHRASE, "").unwrap();
        let a = derive(seed.as_ref(), 0).unwrap();
        let b = derive(seed.as_ref(), 0).unwrap();
        assert_eq!(
            AsRef::<[u8]>::as_ref(&a.private_key),
            AsRef::<[u8]>::as_ref(&b.private_key)
        );
        assert_eq!(a.address, b.address);
    }

    #[test]
    fn test_distinct_indices_give_distinct_keys() {
        let seed = mnemonic::to_seed(VECTOR_PHRASE, "").unwrap();
        let a = derive(seed.as_ref(), 0).unwrap();
        let b = derive(seed.as_ref(), 1).unwrap();
        assert_ne!(
            AsRef::<[u8]>::as_ref(&a.private_key),
            AsRef::<[u8]>::as_ref(&b.private_key)
        );
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn test_default_account_vector() {
        // m/44'/60'/0'/0/0 for the all-abandon vector is a fixed address
        let seed = mnemonic::to_seed(VECTOR_PHRASE, "").unwrap();
        let derived = derive(seed.as_ref(), 0).unwrap();
        assert_eq!(
            derived.address.to_checksum(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }

    #[test]
    fn test_rejects_hardened_index() {
        let seed = mnemonic::to_seed(VECTOR_PHRASE, "").unwrap();
        assert!(derive(seed.as_ref(), 0x8000_0000).is_err());
    }

    #[test]
    fn test_validate_private_key() {
        assert!(validate_private_key(&[0u8; 32]).is_err());
        assert!(validate_private_key(&[0u8; 31]).is_err());
        assert!(validate_private_key(&[0xffu8; 32]).is_err()); // above curve order

        let mut ok = [0u8; 32];
        ok[31] = 1;
        assert_eq!(validate_private_key(&ok).unwrap(), ok);
    }

    #[test]
    fn test_address_from_known_key() {
        // Well-known Hardhat test key
        let key: [u8; 32] =
            hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
                .unwrap()
                .try_into()
                .unwrap();
        let address = address_from_private_key(&key).unwrap();
        assert_eq!(
            address.to_checksum(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }
}
