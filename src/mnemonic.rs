//! Mnemonic Service
//!
//! Generates, validates, and stretches BIP39 mnemonic phrases.
//!
//! SECURITY: entropy and seed buffers are zeroized on drop.

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::wordlist::{self, WordList};

/// Seed length produced by `to_seed`, per BIP39
pub const SEED_LEN: usize = 64;

/// Generate a new mnemonic from fresh OS entropy using the English list.
///
/// `strength_bits` must be a multiple of 32 in [128, 256];
/// 128 bits yields 12 words, 256 bits yields 24.
pub fn generate(strength_bits: usize) -> WalletResult<String> {
    generate_in(wordlist::english(), strength_bits)
}

/// Generate a new mnemonic in the given word list's language.
pub fn generate_in(list: WordList, strength_bits: usize) -> WalletResult<String> {
    if !(128..=256).contains(&strength_bits) || strength_bits % 32 != 0 {
        return Err(WalletError::invalid_input(format!(
            "Mnemonic strength must be a multiple of 32 in [128, 256], got {}",
            strength_bits
        )));
    }

    let mut entropy = Zeroizing::new(vec![0u8; strength_bits / 8]);
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy_in(list.language(), entropy.as_ref())
        .map_err(|e| WalletError::crypto_error(format!("Failed to create mnemonic: {}", e)))?;

    let words: Vec<&'static str> = mnemonic.words().collect();
    Ok(words.join(list.separator()))
}

/// Validate a mnemonic phrase: known words, word count, and checksum.
pub fn validate(phrase: &str) -> WalletResult<()> {
    parse(phrase).map(|_| ())
}

/// Stretch a mnemonic (plus optional passphrase) into a 64-byte seed.
///
/// PBKDF2-HMAC-SHA512 with the fixed BIP39 iteration count; NFKD
/// normalization is handled by the bip39 crate. Deterministic.
pub fn to_seed(phrase: &str, passphrase: &str) -> WalletResult<Zeroizing<[u8; SEED_LEN]>> {
    let mnemonic = parse(phrase)?;
    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

fn parse(phrase: &str) -> WalletResult<Mnemonic> {
    let word_count = phrase.split_whitespace().count();
    if !(12..=24).contains(&word_count) || word_count % 3 != 0 {
        return Err(WalletError::invalid_mnemonic(format!(
            "Word count must be a multiple of 3 in [12, 24], got {}",
            word_count
        )));
    }

    Mnemonic::parse(phrase)
        .map_err(|e| WalletError::invalid_mnemonic(format!("Invalid mnemonic: {}", e)))
}
