//! Signature Wire Codec
//!
//! Fixed wire form for a signature: 130 lowercase hex characters,
//! `r` (32 bytes) then `s` (32 bytes) then `v` (1 byte), no prefix.
//! Decode accepts exactly what encode produces, so
//! `encode(decode(text)) == text` for every accepted input.

use crate::error::{WalletError, WalletResult};

/// Encoded signature length in hex characters: 65 bytes * 2
pub const ENCODED_LEN: usize = 130;

/// A recoverable ECDSA signature over a transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl Signature {
    /// Serialize to the 130-character lowercase hex wire form.
    pub fn encode(&self) -> String {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        hex::encode(bytes)
    }

    /// Parse the wire form. Rejects wrong lengths, non-hex characters,
    /// and uppercase digits.
    pub fn decode(text: &str) -> WalletResult<Self> {
        if text.len() != ENCODED_LEN {
            return Err(WalletError::malformed_signature(format!(
                "Signature must be {} hex characters, got {}",
                ENCODED_LEN,
                text.len()
            )));
        }
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(WalletError::malformed_signature(
                "Signature hex must be lowercase",
            ));
        }

        let bytes = hex::decode(text).map_err(|e| {
            WalletError::malformed_signature(format!("Invalid signature hex: {}", e))
        })?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(Signature { r, s, v: bytes[64] })
    }
}
