//! Account tests for aptos-sdk
//!
//! Key generation, address derivation and transaction signing.

use aptos_crypto::SignatureScheme;
use aptos_primitives::AccountAddress;
use aptos_sdk::Account;
use aptos_types::{
    RawTransaction, RawTransactionWithData, Script, TransactionAuthenticator, TransactionPayload,
};

fn raw_for(sender: AccountAddress) -> RawTransaction {
    RawTransaction::new(
        sender,
        0,
        TransactionPayload::Script(Script::default()),
        2_000,
        100,
        1_800_000_000,
        4,
    )
}

// ==================== Generation ====================

#[test]
fn test_generated_accounts_differ() {
    let a = Account::generate_ed25519();
    let b = Account::generate_ed25519();
    assert_ne!(a.address(), b.address());

    let k = Account::generate_secp256k1();
    assert_eq!(k.scheme(), SignatureScheme::Secp256k1);
}

#[test]
fn test_address_is_auth_key() {
    for account in [Account::generate_ed25519(), Account::generate_secp256k1()] {
        assert_eq!(account.address().as_bytes(), &account.auth_key());
    }
}

#[test]
fn test_with_address_keeps_rotated_address() {
    let account = Account::from_ed25519_seed([4u8; 32]);
    let signer = Box::new(aptos_crypto::Ed25519PrivateKey::from_seed([4u8; 32]));
    let rotated = Account::with_address(AccountAddress::from_hex("0xa11ce").unwrap(), signer);
    assert_ne!(rotated.address(), account.address());
    assert_eq!(rotated.public_key(), account.public_key());
}

// ==================== Signing ====================

#[test]
fn test_sign_transaction_verifies() {
    for account in [Account::generate_ed25519(), Account::generate_secp256k1()] {
        let raw = raw_for(account.address());
        let signed = account.sign_transaction(&raw).unwrap();
        assert_eq!(signed.raw_txn, raw);
        assert!(matches!(
            signed.authenticator,
            TransactionAuthenticator::SingleSender { .. }
        ));
        assert!(signed.verify().unwrap());
    }
}

#[test]
fn test_sign_message() {
    let account = Account::from_ed25519_seed([2u8; 32]);
    let signature = account.sign(b"hello").unwrap();
    assert_eq!(signature.len(), 64);
    assert!(aptos_crypto::verify(
        SignatureScheme::Ed25519,
        &account.public_key(),
        b"hello",
        &signature
    ));
}

#[test]
fn test_fee_payer_flow() {
    let sender = Account::generate_ed25519();
    let payer = Account::generate_secp256k1();

    let data = RawTransactionWithData::new_fee_payer(raw_for(sender.address()), vec![], payer.address());
    let sender_auth = sender.sign_with_data(&data).unwrap();
    let payer_auth = payer.sign_with_data(&data).unwrap();

    let signed = data
        .into_signed_transaction(sender_auth, vec![], Some(payer_auth))
        .unwrap();
    assert!(signed.verify().unwrap());
}
