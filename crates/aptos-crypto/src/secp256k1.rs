//! ECDSA secp256k1 keys (k256)

use std::fmt;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as K256Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::{sha3_256, CryptoError, SignatureScheme, Signer};

/// Private key length
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;

/// Compressed SEC1 public key length
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;

/// `r || s` signature length
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// secp256k1 private key
///
/// Messages are hashed with SHA3-256 before signing, and signatures are
/// normalized to low-s. The scalar is wiped on drop by `k256`.
pub struct Secp256k1PrivateKey {
    key: SigningKey,
}

impl Secp256k1PrivateKey {
    /// Generate a random key
    pub fn generate() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// Create from 32 big-endian scalar bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(CryptoError::InvalidLength {
                what: "secp256k1 private key",
                expected: SECP256K1_PRIVATE_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let key = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { key })
    }

    /// Scalar bytes
    pub fn to_bytes(&self) -> Zeroizing<[u8; SECP256K1_PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.key.to_bytes().into())
    }

    /// Compressed public key
    pub fn public_key_bytes(&self) -> [u8; SECP256K1_PUBLIC_KEY_LENGTH] {
        let point = self.key.verifying_key().to_encoded_point(true);
        let mut out = [0u8; SECP256K1_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(point.as_bytes());
        out
    }
}

impl Signer for Secp256k1PrivateKey {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = sha3_256(message);
        let signature: K256Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }

    fn public_key(&self) -> Vec<u8> {
        self.public_key_bytes().to_vec()
    }

    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1PrivateKey")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

/// Verify a secp256k1 `r || s` signature over `sha3_256(message)`
///
/// High-s signatures are rejected.
pub fn verify_secp256k1(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    if public_key.len() != SECP256K1_PUBLIC_KEY_LENGTH
        || signature.len() != SECP256K1_SIGNATURE_LENGTH
    {
        return false;
    }
    let Ok(public_key) = VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = K256Signature::from_slice(signature) else {
        return false;
    };
    if signature.normalize_s().is_some() {
        return false;
    }
    let digest = sha3_256(message);
    public_key.verify_prehash(&digest, &signature).is_ok()
}
