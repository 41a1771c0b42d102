//! Transaction construction, signing, and signature encoding.

pub mod codec;
pub mod rlp;
pub mod signer;
mod transaction;

pub use codec::Signature;
pub use signer::{
    encode_signed, recover_address, sign_transaction, signing_hash, signing_payload,
    transaction_id,
};
pub use transaction::{Transaction, Wei, CHAIN_ID_ANY};
