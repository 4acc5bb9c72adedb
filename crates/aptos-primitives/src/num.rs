//! Unsigned 128/256-bit integers for Move values

use std::fmt;
use std::str::FromStr;

use aptos_bcs::{Deserialize, Deserializer, Serialize, Serializer};
use num_bigint::{BigInt, BigUint, Sign};
use thiserror::Error;

/// Decimal parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumberError {
    /// Empty input
    #[error("empty number string")]
    Empty,
    /// Anything other than ASCII digits
    #[error("invalid decimal number: {0:?}")]
    InvalidDigit(String),
}

fn parse_decimal(s: &str) -> Result<BigInt, ParseNumberError> {
    if s.is_empty() {
        return Err(ParseNumberError::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseNumberError::InvalidDigit(s.to_string()));
    }
    BigInt::parse_bytes(s.as_bytes(), 10).ok_or_else(|| ParseNumberError::InvalidDigit(s.to_string()))
}

macro_rules! big_unsigned {
    (@native $name:ident, $($ty:ty),*) => {
        $(
            impl From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    $name(BigInt::from(v))
                }
            }
        )*
    };
    ($name:ident, $bits:expr, $write:ident, $read:ident, $prim:ty, $doc:expr) => {
        #[doc = $doc]
        ///
        /// Wraps an arbitrary-precision integer. Values outside the unsigned
        /// range can be constructed, but fail to serialize.
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(BigInt);

        impl $name {
            /// Width in bits
            pub const BITS: u64 = $bits;

            /// Wrap any integer
            pub fn new(v: impl Into<BigInt>) -> Self {
                $name(v.into())
            }

            /// Underlying value
            pub fn value(&self) -> &BigInt {
                &self.0
            }

            /// Consume into the underlying value
            pub fn into_inner(self) -> BigInt {
                self.0
            }

            /// Whether the value is non-negative and fits the width
            pub fn is_in_range(&self) -> bool {
                self.0.sign() != Sign::Minus && self.0.bits() <= Self::BITS
            }

            /// Value as u64, if it fits
            pub fn to_u64(&self) -> Option<u64> {
                u64::try_from(&self.0).ok()
            }

            /// Value as a fixed-width integer, if it fits
            pub fn to_primitive(&self) -> Option<$prim> {
                if !self.is_in_range() {
                    return None;
                }
                let (_, magnitude) = self.0.to_bytes_le();
                Some(<$prim>::from_little_endian(&magnitude))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseNumberError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_decimal(s).map($name)
            }
        }

        impl From<BigInt> for $name {
            fn from(v: BigInt) -> Self {
                $name(v)
            }
        }

        impl From<BigUint> for $name {
            fn from(v: BigUint) -> Self {
                $name(BigInt::from(v))
            }
        }

        impl From<$prim> for $name {
            fn from(v: $prim) -> Self {
                let mut buf = [0u8; $bits / 8];
                v.to_little_endian(&mut buf);
                $name(BigInt::from_bytes_le(Sign::Plus, &buf))
            }
        }

        big_unsigned!(@native $name, u8, u16, u32, u64, u128);

        impl Serialize for $name {
            fn serialize(&self, ser: &mut Serializer) {
                ser.$write(&self.0);
            }
        }

        impl Deserialize for $name {
            fn deserialize(de: &mut Deserializer<'_>) -> Self {
                $name(de.$read())
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

big_unsigned!(U128, 128, u128, u128, primitive_types::U128, "Move `u128`");
big_unsigned!(U256, 256, u256, u256, primitive_types::U256, "Move `u256`");
