//! Signing capability and authentication keys

use std::fmt;

use aptos_primitives::AccountAddress;

use crate::{sha3_256, CryptoError};

/// Signature scheme, also the discriminant of `AnyPublicKey` / `AnySignature`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// Ed25519
    Ed25519,
    /// ECDSA over secp256k1
    Secp256k1,
}

impl SignatureScheme {
    /// Scheme byte appended to the public key for auth-key derivation
    pub const fn as_byte(self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0,
            SignatureScheme::Secp256k1 => 2,
        }
    }

    /// Public key length in bytes
    pub const fn public_key_len(self) -> usize {
        match self {
            SignatureScheme::Ed25519 => 32,
            SignatureScheme::Secp256k1 => 33,
        }
    }

    /// Signature length in bytes
    pub const fn signature_len(self) -> usize {
        64
    }
}

impl TryFrom<u8> for SignatureScheme {
    type Error = CryptoError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        match b {
            0 => Ok(SignatureScheme::Ed25519),
            2 => Ok(SignatureScheme::Secp256k1),
            other => Err(CryptoError::UnknownScheme(other)),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureScheme::Ed25519 => f.write_str("ed25519"),
            SignatureScheme::Secp256k1 => f.write_str("secp256k1"),
        }
    }
}

impl std::str::FromStr for SignatureScheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(SignatureScheme::Ed25519),
            "secp256k1" => Ok(SignatureScheme::Secp256k1),
            _ => Err(CryptoError::UnknownSchemeName(s.to_string())),
        }
    }
}

/// Anything that can sign transaction messages
///
/// Implementations must be shareable across tasks so an account can sign
/// from inside async code.
pub trait Signer: Send + Sync {
    /// Sign `message` (the 32-byte signing message of a transaction)
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Public key bytes in the scheme's wire form
    fn public_key(&self) -> Vec<u8>;

    /// Scheme of this signer
    fn scheme(&self) -> SignatureScheme;

    /// `sha3_256(public_key || scheme_byte)`
    fn auth_key(&self) -> [u8; 32] {
        authentication_key(&self.public_key(), self.scheme())
    }

    /// Account address derived from the authentication key
    fn address(&self) -> AccountAddress {
        AccountAddress::new(self.auth_key())
    }
}

/// Derive a single-key authentication key
pub fn authentication_key(public_key: &[u8], scheme: SignatureScheme) -> [u8; 32] {
    let mut buf = Vec::with_capacity(public_key.len() + 1);
    buf.extend_from_slice(public_key);
    buf.push(scheme.as_byte());
    sha3_256(&buf)
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).sign(message)
    }

    fn public_key(&self) -> Vec<u8> {
        (**self).public_key()
    }

    fn scheme(&self) -> SignatureScheme {
        (**self).scheme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_bytes() {
        assert_eq!(SignatureScheme::Ed25519.as_byte(), 0);
        assert_eq!(SignatureScheme::Secp256k1.as_byte(), 2);
        assert_eq!(SignatureScheme::try_from(2).unwrap(), SignatureScheme::Secp256k1);
        assert_eq!(
            SignatureScheme::try_from(1),
            Err(CryptoError::UnknownScheme(1))
        );
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("Ed25519".parse::<SignatureScheme>().unwrap(), SignatureScheme::Ed25519);
        assert!("rsa".parse::<SignatureScheme>().is_err());
    }

    #[test]
    fn test_authentication_key_appends_scheme() {
        let pk = [7u8; 32];
        let mut joined = pk.to_vec();
        joined.push(0);
        assert_eq!(
            authentication_key(&pk, SignatureScheme::Ed25519),
            sha3_256(&joined)
        );
        assert_ne!(
            authentication_key(&pk, SignatureScheme::Ed25519),
            authentication_key(&pk, SignatureScheme::Secp256k1)
        );
    }
}
