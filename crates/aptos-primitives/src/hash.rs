//! 32-byte hash value

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Decoded length
        got: usize,
    },
}

/// SHA3-256 output, used for transaction hashes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashValue([u8; 32]);

impl HashValue {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero hash
    pub const ZERO: HashValue = HashValue([0u8; 32]);

    /// Create from bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        HashValue(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| HashError::InvalidLength {
            expected: Self::LEN,
            got: slice.len(),
        })?;
        Ok(HashValue(bytes))
    }

    /// Parse from hex string, `0x` prefix optional
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self.to_hex())
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for HashValue {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for HashValue {
    fn from(bytes: [u8; 32]) -> Self {
        HashValue(bytes)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de;

    impl serde::Serialize for HashValue {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> serde::Deserialize<'de> for HashValue {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = <String as serde::Deserialize>::deserialize(deserializer)?;
            HashValue::from_hex(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let hash = HashValue::new([0xab; 32]);
        let parsed: HashValue = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
        assert_eq!(hash.to_hex().len(), 66);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            HashValue::from_hex("0xabcd"),
            Err(HashError::InvalidLength {
                expected: 32,
                got: 2
            })
        );
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(
            HashValue::from_hex("0xnothex"),
            Err(HashError::InvalidHex(_))
        ));
    }
}
