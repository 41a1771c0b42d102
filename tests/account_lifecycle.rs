//! Repository flows: save, load, sign, backup, and failure modes.

use secrecy::SecretString;

use ethwallet_core::error::ErrorCode;
use ethwallet_core::tx::{self, Transaction, Wei};
use ethwallet_core::{AccountsRepository, Address, WalletConfig};

const ABANDON_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn cred(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn unlocked_repo() -> AccountsRepository {
    let repo = AccountsRepository::new(&WalletConfig::in_memory());
    repo.set_credential(cred("correct horse")).unwrap();
    repo
}

fn sample_tx(chain_id: u64) -> Transaction {
    Transaction {
        nonce: 9,
        gas_price: Wei::parse("20000000000").unwrap(),
        start_gas: 21000,
        to: Some(Address::from_bytes([0x35; 20])),
        value: Wei::parse("1000000000000000000").unwrap(),
        data: vec![],
        chain_id,
    }
}

#[tokio::test]
async fn save_then_load_returns_same_address() {
    let repo = unlocked_repo();
    let saved = repo.save_account(&[0x46u8; 32]).await.unwrap();

    let account = repo.load_active_account().await.unwrap();
    assert_eq!(account.address, saved);
}

#[tokio::test]
async fn save_from_mnemonic_derives_default_account() {
    let repo = unlocked_repo();
    let address = repo
        .save_account_from_mnemonic(ABANDON_PHRASE, "", 0)
        .await
        .unwrap();
    assert_eq!(
        address.to_checksum(),
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
}

#[tokio::test]
async fn save_replaces_previous_account() {
    let repo = unlocked_repo();
    let first = repo.save_account(&[0x46u8; 32]).await.unwrap();
    let second = repo.save_account(&[0x47u8; 32]).await.unwrap();
    assert_ne!(first, second);

    let account = repo.load_active_account().await.unwrap();
    assert_eq!(account.address, second);
}

#[tokio::test]
async fn sign_transaction_matches_direct_signer() {
    let repo = unlocked_repo();
    let key = [0x46u8; 32];
    repo.save_account(&key).await.unwrap();

    let tx = sample_tx(1);
    let encoded = repo.sign_transaction(&tx).await.unwrap();

    let expected = tx::sign_transaction(&tx, &key).unwrap().encode();
    assert_eq!(encoded, expected);
    assert_eq!(encoded.len(), 130);
}

#[tokio::test]
async fn active_account_handle_signs() {
    let repo = unlocked_repo();
    let key = [0x46u8; 32];
    let address = repo.save_account(&key).await.unwrap();

    let account = repo.load_active_account().await.unwrap();
    let tx = sample_tx(1);
    let encoded = account.sign_transaction(&tx).await.unwrap();

    let sig = tx::codec::Signature::decode(&encoded).unwrap();
    assert_eq!(tx::recover_address(&tx, &sig).unwrap(), address);
}

#[tokio::test]
async fn load_without_account_fails() {
    let repo = unlocked_repo();
    let err = repo.load_active_account().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActiveAccount);
}

#[tokio::test]
async fn operations_require_credential() {
    let repo = AccountsRepository::new(&WalletConfig::in_memory());
    let err = repo.save_account(&[0x46u8; 32]).await.unwrap_err();
    assert!(err.is_credential());

    let err = repo.sign_transaction(&sample_tx(1)).await.unwrap_err();
    assert!(err.is_credential());
}

#[tokio::test]
async fn wrong_credential_is_a_credential_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalletConfig::file(dir.path().join("keys.json"));

    let writer = AccountsRepository::new(&config);
    writer.set_credential(cred("right")).unwrap();
    writer.save_account(&[0x46u8; 32]).await.unwrap();

    // Fresh repository over the same file, so nothing is cached
    let reader = AccountsRepository::new(&config);
    reader.set_credential(cred("wrong")).unwrap();
    let err = reader.load_active_account().await.unwrap_err();
    assert!(err.is_credential());
}

#[tokio::test]
async fn account_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalletConfig::file(dir.path().join("keys.json"));

    let writer = AccountsRepository::new(&config);
    writer.set_credential(cred("pw")).unwrap();
    let saved = writer.save_account(&[0x46u8; 32]).await.unwrap();

    let reader = AccountsRepository::new(&config);
    reader.set_credential(cred("pw")).unwrap();
    let account = reader.load_active_account().await.unwrap();
    assert_eq!(account.address, saved);
}

#[tokio::test]
async fn mnemonic_backup_roundtrips() {
    let repo = unlocked_repo();
    repo.save_mnemonic(ABANDON_PHRASE).await.unwrap();

    let restored = repo.load_mnemonic().await.unwrap();
    assert_eq!(restored.as_str(), ABANDON_PHRASE);
}

#[tokio::test]
async fn generated_mnemonic_saves_and_restores() {
    let repo = unlocked_repo();
    let phrase = repo.generate_mnemonic(128).unwrap();
    repo.validate_mnemonic(&phrase).unwrap();

    repo.save_mnemonic(&phrase).await.unwrap();
    let restored = repo.load_mnemonic().await.unwrap();
    assert_eq!(restored.as_str(), phrase);

    repo.save_account_from_mnemonic(&phrase, "", 0).await.unwrap();
    repo.load_active_account().await.unwrap();
}

#[tokio::test]
async fn cancelled_flag_short_circuits() {
    let repo = unlocked_repo();
    repo.save_account(&[0x46u8; 32]).await.unwrap();

    repo.cancel_flag().cancel();
    let err = repo.sign_transaction(&sample_tx(1)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Cancelled);

    // Reset lets work resume
    repo.cancel_flag().reset();
    repo.sign_transaction(&sample_tx(1)).await.unwrap();
}

#[tokio::test]
async fn wipe_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalletConfig::file(dir.path().join("keys.json"));

    let repo = AccountsRepository::new(&config);
    repo.set_credential(cred("pw")).unwrap();
    repo.save_account(&[0x46u8; 32]).await.unwrap();
    repo.save_mnemonic(ABANDON_PHRASE).await.unwrap();

    repo.wipe().await.unwrap();

    let reader = AccountsRepository::new(&config);
    reader.set_credential(cred("pw")).unwrap();
    let err = reader.load_active_account().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActiveAccount);
    assert!(reader.load_mnemonic().await.is_err());
}

#[tokio::test]
async fn invalid_inputs_are_validation_errors() {
    let repo = unlocked_repo();

    let err = repo.save_account(&[0u8; 32]).await.unwrap_err();
    assert!(err.is_validation());

    let err = repo
        .save_account_from_mnemonic("not a real phrase at all", "", 0)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let mut creation = sample_tx(1);
    creation.to = None;
    creation.data = vec![];
    repo.save_account(&[0x46u8; 32]).await.unwrap();
    let err = repo.sign_transaction(&creation).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransaction);
}
