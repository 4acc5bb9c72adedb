//! # aptos-crypto
//!
//! Cryptographic primitives for Move-based chains.
//!
//! - SHA3-256 hashing with domain-separation prefixes
//! - Ed25519 signing/verification (ed25519-consensus)
//! - ECDSA secp256k1 signing/verification over SHA3-256 digests (k256)
//! - Single-key authentication-key and address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod ed25519;
mod error;
mod hash;
mod secp256k1;
mod signer;

pub use ed25519::{
    verify_ed25519, Ed25519PrivateKey, ED25519_PRIVATE_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH,
    ED25519_SIGNATURE_LENGTH,
};
pub use error::CryptoError;
pub use hash::{
    domain_prefix, hash_with_prefix, sha3_256, signing_message, transaction_hash,
    RAW_TRANSACTION_SALT, RAW_TRANSACTION_WITH_DATA_SALT, TRANSACTION_SALT,
};
pub use secp256k1::{
    verify_secp256k1, Secp256k1PrivateKey, SECP256K1_PRIVATE_KEY_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
pub use signer::{authentication_key, SignatureScheme, Signer};

/// Verify a signature for either scheme
pub fn verify(scheme: SignatureScheme, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    match scheme {
        SignatureScheme::Ed25519 => verify_ed25519(public_key, message, signature),
        SignatureScheme::Secp256k1 => verify_secp256k1(public_key, message, signature),
    }
}

/// Decode a `0x`-optional hex private key for the given scheme
pub fn private_key_from_hex(
    scheme: SignatureScheme,
    hex_key: &str,
) -> Result<Box<dyn Signer>, CryptoError> {
    let trimmed = hex_key.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = zeroize::Zeroizing::new(
        hex::decode(digits).map_err(|e| CryptoError::InvalidHex(e.to_string()))?,
    );
    Ok(match scheme {
        SignatureScheme::Ed25519 => Box::new(Ed25519PrivateKey::from_bytes(&bytes)?),
        SignatureScheme::Secp256k1 => Box::new(Secp256k1PrivateKey::from_bytes(&bytes)?),
    })
}
