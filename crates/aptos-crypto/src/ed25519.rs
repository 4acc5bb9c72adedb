//! Ed25519 keys (ed25519-consensus)

use std::fmt;

use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::{CryptoError, SignatureScheme, Signer};

/// Ed25519 seed length
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;

/// Ed25519 public key length
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// Ed25519 private key
///
/// The seed is wiped on drop. `Debug` prints only the public key.
pub struct Ed25519PrivateKey {
    seed: Zeroizing<[u8; ED25519_PRIVATE_KEY_LENGTH]>,
    key: ed25519_consensus::SigningKey,
}

impl Ed25519PrivateKey {
    /// Generate a random key
    pub fn generate() -> Self {
        Self::from_signing_key(ed25519_consensus::SigningKey::new(OsRng))
    }

    /// Create from a 32-byte seed
    pub fn from_seed(seed: [u8; ED25519_PRIVATE_KEY_LENGTH]) -> Self {
        Self::from_signing_key(ed25519_consensus::SigningKey::from(seed))
    }

    /// Create from a seed slice
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; ED25519_PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidLength {
                what: "ed25519 private key",
                expected: ED25519_PRIVATE_KEY_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self::from_seed(seed))
    }

    fn from_signing_key(key: ed25519_consensus::SigningKey) -> Self {
        Self {
            seed: Zeroizing::new(key.to_bytes()),
            key,
        }
    }

    /// Seed bytes
    pub fn to_bytes(&self) -> Zeroizing<[u8; ED25519_PRIVATE_KEY_LENGTH]> {
        self.seed.clone()
    }

    /// Public key bytes
    pub fn public_key_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.key.verification_key().to_bytes()
    }
}

impl Signer for Ed25519PrivateKey {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.key.sign(message).to_bytes().to_vec())
    }

    fn public_key(&self) -> Vec<u8> {
        self.public_key_bytes().to_vec()
    }

    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519PrivateKey")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

/// Verify an Ed25519 signature over `message`
pub fn verify_ed25519(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let public_key: [u8; ED25519_PUBLIC_KEY_LENGTH] = match public_key.try_into() {
        Ok(key) => key,
        Err(_) => return false,
    };
    let public_key = match ed25519_consensus::VerificationKey::try_from(public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature: [u8; ED25519_SIGNATURE_LENGTH] = match signature.try_into() {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    let signature = ed25519_consensus::Signature::from(signature);
    public_key.verify(&signature, message).is_ok()
}
