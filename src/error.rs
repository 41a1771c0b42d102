//! Unified error types for the wallet core
//!
//! All errors flow through this module so callers can tell bad input,
//! bad secrets, bad state, and transport failures apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all wallet-core operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl WalletError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPrivateKey, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn malformed_signature(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedSignature, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn credential_required(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CredentialRequired, msg)
    }

    pub fn decryption_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecryptionFailed, msg)
    }

    pub fn no_active_account() -> Self {
        Self::new(ErrorCode::NoActiveAccount, "No active account saved")
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "Operation cancelled before start")
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn signing_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailed, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// True for errors the UI should answer with a credential re-prompt.
    pub fn is_credential(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::CredentialRequired | ErrorCode::DecryptionFailed
        )
    }

    /// True for bad-input errors that must never be retried automatically.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidInput
                | ErrorCode::InvalidMnemonic
                | ErrorCode::InvalidPrivateKey
                | ErrorCode::InvalidAddress
                | ErrorCode::InvalidTransaction
                | ErrorCode::MalformedSignature
                | ErrorCode::ParseError
                | ErrorCode::HexError
                | ErrorCode::JsonError
        )
    }

    /// True for remote-node failures passed through unchanged.
    pub fn is_transport(&self) -> bool {
        self.code == ErrorCode::Transport
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WalletError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Validation errors
    InvalidInput,
    InvalidMnemonic,
    InvalidPrivateKey,
    InvalidAddress,
    InvalidTransaction,
    MalformedSignature,
    ParseError,
    HexError,
    JsonError,

    // Credential errors
    CredentialRequired,
    DecryptionFailed,

    // State errors
    NoActiveAccount,
    Cancelled,

    // Transport errors (JSON-RPC pass-through)
    Transport,

    // Crypto errors
    CryptoError,
    SigningFailed,

    // Internal
    Internal,
}

/// Result type alias for wallet-core operations
pub type WalletResult<T> = Result<T, WalletError>;

/// JSON-RPC error shape consumed from a remote node.
///
/// Not produced by this core; surfaced unchanged to callers when a
/// signing-dependent remote call (nonce/gas lookup, broadcast) fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl From<JsonRpcError> for WalletError {
    fn from(e: JsonRpcError) -> Self {
        WalletError::new(ErrorCode::Transport, e.message.clone())
            .with_details(format!("code {}", e.code))
    }
}

// Conversions from common error types

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(e: hex::FromHexError) -> Self {
        WalletError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<bitcoin::bip32::Error> for WalletError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        WalletError::new(ErrorCode::CryptoError, format!("BIP32 error: {}", e))
    }
}

impl From<bitcoin::secp256k1::Error> for WalletError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        WalletError::new(ErrorCode::CryptoError, format!("Secp256k1 error: {}", e))
    }
}

impl From<bip39::Error> for WalletError {
    fn from(e: bip39::Error) -> Self {
        WalletError::new(ErrorCode::InvalidMnemonic, format!("BIP39 error: {}", e))
    }
}
