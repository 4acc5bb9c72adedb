//! 32-byte account address

use std::fmt;
use std::str::FromStr;

use aptos_bcs::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// No hex digits after the optional `0x` prefix
    #[error("empty address string")]
    Empty,
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// More than 32 bytes of hex
    #[error("address too long: expected at most 32 bytes, got {0}")]
    TooLong(usize),
    /// Slice is not exactly 32 bytes
    #[error("invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Account address on a Move-based chain
///
/// Displays as `0x` followed by 64 hex digits. Framework addresses are
/// usually written in short form, see [`AccountAddress::short_string`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    /// Size of address in bytes
    pub const LEN: usize = 32;

    /// `0x0`
    pub const ZERO: AccountAddress = AccountAddress([0u8; 32]);

    /// `0x1`, the core framework
    pub const ONE: AccountAddress = AccountAddress::special(1);

    /// `0x3`, legacy token
    pub const THREE: AccountAddress = AccountAddress::special(3);

    /// `0x4`, token objects
    pub const FOUR: AccountAddress = AccountAddress::special(4);

    const fn special(last: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[31] = last;
        AccountAddress(bytes)
    }

    /// Create address from bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        AccountAddress(bytes)
    }

    /// Create address from a 32-byte slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| AddressError::InvalidLength(slice.len()))?;
        Ok(AccountAddress(bytes))
    }

    /// Parse address from hex, with or without `0x`
    ///
    /// Odd-length input gets a leading `0` and short input is left-padded
    /// with zero bytes, so `0x1` equals [`AccountAddress::ONE`].
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        let decoded = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        }
        .map_err(|e| AddressError::InvalidHex(e.to_string()))?;

        if decoded.len() > Self::LEN {
            return Err(AddressError::TooLong(decoded.len()));
        }
        let mut bytes = [0u8; 32];
        bytes[Self::LEN - decoded.len()..].copy_from_slice(&decoded);
        Ok(AccountAddress(bytes))
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume into bytes
    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Full form: `0x` + 64 hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short form with leading zero nibbles stripped, e.g. `0x1`
    pub fn short_string(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.short_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for AccountAddress {
    fn from(bytes: [u8; 32]) -> Self {
        AccountAddress(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for AccountAddress {
    fn serialize(&self, ser: &mut Serializer) {
        ser.fixed_bytes(&self.0);
    }
}

impl Deserialize for AccountAddress {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        AccountAddress(de.fixed_array())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de;

    impl serde::Serialize for AccountAddress {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> serde::Deserialize<'de> for AccountAddress {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = <String as serde::Deserialize>::deserialize(deserializer)?;
            AccountAddress::from_hex(&s).map_err(de::Error::custom)
        }
    }
}
