//! Transaction Signer
//!
//! Deterministic (RFC 6979) recoverable ECDSA over the keccak256 hash of
//! the RLP signing payload. Chain id 0 signs without replay protection
//! (`v` = 27 + recovery id); any other chain id folds the chain into `v`
//! per EIP-155.

use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use super::codec::Signature;
use super::rlp;
use super::transaction::{Transaction, CHAIN_ID_ANY};
use crate::error::{WalletError, WalletResult};
use crate::types::Address;
use crate::utils::crypto::keccak256;

/// RLP payload that gets hashed for signing.
///
/// With replay protection the payload carries the EIP-155 trailer
/// `[chain_id, 0, 0]` in place of the signature fields.
pub fn signing_payload(tx: &Transaction) -> Vec<u8> {
    let mut fields = vec![
        rlp::encode_u64(tx.nonce),
        rlp::encode_u256(&tx.gas_price.inner()),
        rlp::encode_u64(tx.start_gas),
        rlp::encode_address(tx.to.as_ref()),
        rlp::encode_u256(&tx.value.inner()),
        rlp::encode_bytes(&tx.data),
    ];
    if tx.chain_id != CHAIN_ID_ANY {
        fields.push(rlp::encode_u64(tx.chain_id));
        fields.push(vec![0x80]);
        fields.push(vec![0x80]);
    }
    rlp::encode_list(&fields)
}

/// Keccak256 of the signing payload.
pub fn signing_hash(tx: &Transaction) -> [u8; 32] {
    keccak256(&signing_payload(tx))
}

/// Sign a transaction with a raw private key.
///
/// Deterministic: the same (transaction, key) pair always produces the
/// same signature. `s` is always in the lower half of the curve order.
pub fn sign_transaction(tx: &Transaction, private_key: &[u8; 32]) -> WalletResult<Signature> {
    tx.validate()?;

    let sk = SecretKey::from_slice(private_key)
        .map_err(|e| WalletError::invalid_private_key(format!("Invalid scalar: {}", e)))?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(signing_hash(tx));
    let recoverable = secp.sign_ecdsa_recoverable(&message, &sk);
    let (recovery_id, compact) = recoverable.serialize_compact();

    let rec = recovery_id.to_i32() as u64;
    let v = if tx.chain_id == CHAIN_ID_ANY {
        (rec + 27) as u8
    } else {
        // Truncation only matters for chain ids past ~2^63; callers on
        // such chains must carry the chain id alongside the signature
        (tx.chain_id
            .wrapping_mul(2)
            .wrapping_add(35)
            .wrapping_add(rec)
            & 0xff) as u8
    };

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    Ok(Signature { r, s, v })
}

/// Recover the signer address from a transaction and its signature.
pub fn recover_address(tx: &Transaction, sig: &Signature) -> WalletResult<Address> {
    let rec = if tx.chain_id == CHAIN_ID_ANY {
        sig.v as i128 - 27
    } else {
        sig.v as i128 - 35 - tx.chain_id as i128 * 2
    };
    if !(0..=3).contains(&rec) {
        return Err(WalletError::malformed_signature(format!(
            "Recovery id out of range for chain {}: v = {}",
            tx.chain_id, sig.v
        )));
    }

    let recovery_id = RecoveryId::from_i32(rec as i32)
        .map_err(|e| WalletError::malformed_signature(format!("Invalid recovery id: {}", e)))?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&sig.r);
    compact[32..].copy_from_slice(&sig.s);
    let recoverable = RecoverableSignature::from_compact(&compact, recovery_id)
        .map_err(|e| WalletError::malformed_signature(format!("Invalid signature: {}", e)))?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(signing_hash(tx));
    let public_key: PublicKey = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| WalletError::malformed_signature(format!("Recovery failed: {}", e)))?;

    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Ok(Address::from_bytes(bytes))
}

/// Assemble the raw signed transaction: the signing fields followed by
/// `[v, r, s]`, as one RLP list. This is what `eth_sendRawTransaction`
/// takes (hex-wrapped).
pub fn encode_signed(tx: &Transaction, sig: &Signature) -> Vec<u8> {
    let fields = vec![
        rlp::encode_u64(tx.nonce),
        rlp::encode_u256(&tx.gas_price.inner()),
        rlp::encode_u64(tx.start_gas),
        rlp::encode_address(tx.to.as_ref()),
        rlp::encode_u256(&tx.value.inner()),
        rlp::encode_bytes(&tx.data),
        rlp::encode_u64(sig.v as u64),
        rlp::encode_bytes(strip_leading_zeros(&sig.r)),
        rlp::encode_bytes(strip_leading_zeros(&sig.s)),
    ];
    rlp::encode_list(&fields)
}

/// Transaction hash of the raw signed encoding, 0x-prefixed.
pub fn transaction_id(raw: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(raw)))
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().take_while(|&&b| b == 0).count();
    // A zero scalar encodes as the empty string
    &bytes[start..]
}
