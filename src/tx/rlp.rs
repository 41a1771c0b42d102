//! Minimal RLP Encoder
//!
//! Just the subset needed for legacy-transaction signing payloads:
//! scalars, byte strings, addresses, and lists.

use ethers_core::types::U256;

use crate::types::Address;

pub fn encode_u64(val: u64) -> Vec<u8> {
    if val == 0 {
        return vec![0x80];
    }
    let bytes = val.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    encode_scalar_bytes(&bytes[leading_zeros..])
}

pub fn encode_u256(val: &U256) -> Vec<u8> {
    if val.is_zero() {
        return vec![0x80];
    }
    let mut bytes = [0u8; 32];
    val.to_big_endian(&mut bytes);
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    encode_scalar_bytes(&bytes[leading_zeros..])
}

fn encode_scalar_bytes(significant: &[u8]) -> Vec<u8> {
    if significant.len() == 1 && significant[0] < 0x80 {
        significant.to_vec()
    } else {
        let mut result = vec![0x80 + significant.len() as u8];
        result.extend_from_slice(significant);
        result
    }
}

pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return vec![0x80];
    }
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }

    if data.len() < 56 {
        let mut result = vec![0x80 + data.len() as u8];
        result.extend_from_slice(data);
        result
    } else {
        let len_bytes = encode_length(data.len());
        let mut result = vec![0xb7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(data);
        result
    }
}

/// `None` encodes as the empty string (contract creation)
pub fn encode_address(addr: Option<&Address>) -> Vec<u8> {
    match addr {
        Some(a) => encode_bytes(a.as_bytes()),
        None => vec![0x80],
    }
}

pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        payload.extend_from_slice(item);
    }

    if payload.len() < 56 {
        let mut result = vec![0xc0 + payload.len() as u8];
        result.extend_from_slice(&payload);
        result
    } else {
        let len_bytes = encode_length(payload.len());
        let mut result = vec![0xf7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(&payload);
        result
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    if len == 0 {
        return vec![];
    }
    let bytes = len.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[leading_zeros..].to_vec()
}
