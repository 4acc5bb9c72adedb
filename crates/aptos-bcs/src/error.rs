//! Codec errors

use thiserror::Error;

/// BCS encode/decode error
///
/// Only the first error raised on a [`Serializer`](crate::Serializer) or
/// [`Deserializer`](crate::Deserializer) is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input ended before a read could complete
    #[error("bcs: unexpected end of input, need {needed} bytes, have {remaining}")]
    UnexpectedEnd {
        /// Bytes requested
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// Boolean byte other than 0x00 / 0x01
    #[error("bcs: invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// Option tag other than 0x00 / 0x01
    #[error("bcs: invalid option tag 0x{0:02x}")]
    InvalidOptionTag(u8),

    /// ULEB128 value does not fit in 32 bits
    #[error("bcs: ULEB128 overflow")]
    UlebOverflow,

    /// ULEB128 value carries a redundant trailing zero group
    #[error("bcs: non-canonical ULEB128 encoding")]
    NonCanonicalUleb,

    /// Negative big integer passed to `u128` / `u256`
    #[error("bcs: U{bits} value is negative")]
    Negative {
        /// Target width in bits
        bits: usize,
    },

    /// Big integer does not fit in the target width
    #[error("bcs: U{bits} value too large")]
    Overflow {
        /// Target width in bits
        bits: usize,
    },

    /// Collection length does not fit in a ULEB128 length prefix
    #[error("bcs: length {0} exceeds u32 range")]
    LengthOverflow(usize),

    /// String bytes are not valid UTF-8
    #[error("bcs: invalid UTF-8 string")]
    InvalidUtf8,

    /// Unrecognized tagged-union discriminant
    #[error("bcs: unknown {type_name} variant {index}")]
    UnknownVariant {
        /// Union being decoded
        type_name: &'static str,
        /// Discriminant read from the input
        index: u32,
    },

    /// Fixed-size value has the wrong length
    #[error("bcs: {type_name} must be {expected} bytes, got {got}")]
    InvalidLength {
        /// Value being encoded
        type_name: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Input was not fully consumed by a top-level decode
    #[error("bcs: {0} bytes remaining after deserialization")]
    TrailingBytes(usize),

    /// Error raised by a composed type
    #[error("bcs: {0}")]
    Custom(String),
}
