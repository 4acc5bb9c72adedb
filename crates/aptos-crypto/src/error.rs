//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Invalid signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid public key
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Private key bytes rejected
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Wrong key or signature length
    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Kind of value
        what: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Unknown signature scheme byte
    #[error("unknown signature scheme: {0}")]
    UnknownScheme(u8),

    /// Unknown signature scheme name
    #[error("unknown signature scheme: {0:?}")]
    UnknownSchemeName(String),

    /// Hex decoding failed
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
