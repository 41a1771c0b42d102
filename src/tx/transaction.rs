//! Transaction Types
//!
//! A legacy (pre-typed-envelope) Ethereum transaction and the `Wei`
//! amount type used for its monetary fields.

use std::fmt;
use std::str::FromStr;

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};
use crate::types::Address;

/// Chain id 0 signs without replay protection (pre-EIP-155 rules)
pub const CHAIN_ID_ANY: u64 = 0;

const WEI_PER_MILLI_ETHER: u64 = 1_000_000_000_000_000;

/// A non-negative amount of wei.
///
/// Canonical text form is decimal; `parse` also accepts `0x`-prefixed
/// hex since node RPCs report quantities that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wei(pub U256);

impl Wei {
    pub fn zero() -> Self {
        Wei(U256::zero())
    }

    pub fn parse(s: &str) -> WalletResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(WalletError::parse_error("Empty wei amount"));
        }
        let value = if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
        {
            if hex_digits.is_empty() {
                return Err(WalletError::parse_error("Empty hex amount"));
            }
            U256::from_str_radix(hex_digits, 16)
                .map_err(|e| WalletError::parse_error(format!("Invalid hex amount: {}", e)))?
        } else {
            U256::from_dec_str(s)
                .map_err(|e| WalletError::parse_error(format!("Invalid decimal amount: {}", e)))?
        };
        Ok(Wei(value))
    }

    pub fn inner(&self) -> U256 {
        self.0
    }

    /// Render as ether with exactly three decimal places, rounding the
    /// fourth decimal half-up. "1.500", "0.000", "1234.568".
    pub fn to_ether_string(&self) -> String {
        let half_milli = U256::from(WEI_PER_MILLI_ETHER / 2);
        let milli = self.0.saturating_add(half_milli) / U256::from(WEI_PER_MILLI_ETHER);
        let whole = milli / U256::from(1000u64);
        let frac = (milli % U256::from(1000u64)).as_u64();
        format!("{}.{:03}", whole, frac)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wei {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Wei::parse(s)
    }
}

impl From<Wei> for String {
    fn from(w: Wei) -> Self {
        w.to_string()
    }
}

impl TryFrom<String> for Wei {
    type Error = WalletError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Wei::parse(&s)
    }
}

impl From<u64> for Wei {
    fn from(v: u64) -> Self {
        Wei(U256::from(v))
    }
}

impl From<u128> for Wei {
    fn from(v: u128) -> Self {
        Wei(U256::from(v))
    }
}

/// An unsigned legacy Ethereum transaction.
///
/// `to: None` means contract creation; the recipient field then encodes
/// as the empty byte string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub gas_price: Wei,
    pub start_gas: u64,
    pub to: Option<Address>,
    pub value: Wei,
    #[serde(with = "hex_bytes", default)]
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl Transaction {
    /// Reject transactions that cannot be meaningful on any chain.
    pub fn validate(&self) -> WalletResult<()> {
        if self.to.is_none() && self.data.is_empty() {
            return Err(WalletError::new(
                crate::error::ErrorCode::InvalidTransaction,
                "Contract creation requires non-empty data",
            ));
        }
        Ok(())
    }

    /// Gas limit padded by 10% over an estimate, rounding up.
    ///
    /// Estimates from nodes are routinely a little short for contracts
    /// whose gas use depends on state at execution time.
    pub fn adjusted_start_gas(estimate: u64) -> u64 {
        ((estimate as u128 * 11 + 9) / 10) as u64
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}
