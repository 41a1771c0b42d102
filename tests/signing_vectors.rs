//! End-to-end vectors: mnemonic through derivation, signing, and the
//! signature wire format.

use ethwallet_core::tx::{self, codec::Signature, Transaction, Wei, CHAIN_ID_ANY};
use ethwallet_core::{derivation, mnemonic, Address};

const ABANDON_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn abandon_vector_yields_known_address() {
    let seed = mnemonic::to_seed(ABANDON_PHRASE, "").unwrap();
    let derived = derivation::derive(seed.as_ref(), 0).unwrap();
    assert_eq!(
        derived.address.to_checksum(),
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
}

#[test]
fn eip155_example_through_wire_format() {
    let tx = Transaction {
        nonce: 9,
        gas_price: Wei::parse("20000000000").unwrap(),
        start_gas: 21000,
        to: Some("0x3535353535353535353535353535353535353535".parse().unwrap()),
        value: Wei::parse("1000000000000000000").unwrap(),
        data: vec![],
        chain_id: 1,
    };
    let key = [0x46u8; 32];

    let sig = tx::sign_transaction(&tx, &key).unwrap();
    let encoded = sig.encode();

    assert_eq!(encoded.len(), 130);
    assert_eq!(
        encoded,
        concat!(
            "28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276",
            "67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83",
            "25"
        )
    );

    let decoded = Signature::decode(&encoded).unwrap();
    assert_eq!(decoded, sig);
    assert_eq!(
        tx::recover_address(&tx, &decoded).unwrap(),
        derivation::address_from_private_key(&key).unwrap()
    );
}

#[test]
fn unprotected_signature_ends_in_1b_or_1c() {
    let tx = Transaction {
        nonce: 0,
        gas_price: Wei::from(1u64),
        start_gas: 21000,
        to: Some(Address::from_bytes([0x11; 20])),
        value: Wei::zero(),
        data: vec![],
        chain_id: CHAIN_ID_ANY,
    };
    let sig = tx::sign_transaction(&tx, &[0x46u8; 32]).unwrap();
    let encoded = sig.encode();
    let tail = &encoded[128..];
    assert!(tail == "1b" || tail == "1c"); // v = 27 or 28
}

#[test]
fn checksum_address_reference() {
    let addr: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
    assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
}

#[test]
fn hardhat_key_address() {
    let key: [u8; 32] =
        hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap()
            .try_into()
            .unwrap();
    assert_eq!(
        derivation::address_from_private_key(&key).unwrap().to_checksum(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
}

#[test]
fn raw_transaction_is_broadcast_ready_shape() {
    let tx = Transaction {
        nonce: 9,
        gas_price: Wei::parse("20000000000").unwrap(),
        start_gas: 21000,
        to: Some(Address::from_bytes([0x35; 20])),
        value: Wei::parse("1000000000000000000").unwrap(),
        data: vec![],
        chain_id: 1,
    };
    let sig = tx::sign_transaction(&tx, &[0x46u8; 32]).unwrap();
    let raw = tx::encode_signed(&tx, &sig);

    // Short-list header and a 66-char 0x txid
    assert!(raw[0] >= 0xc0);
    let id = tx::transaction_id(&raw);
    assert_eq!(id.len(), 66);
    assert!(id.starts_with("0x"));
    assert!(id[2..].bytes().all(|b| b.is_ascii_hexdigit()));
}
