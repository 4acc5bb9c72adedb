//! # aptos-bcs
//!
//! Binary Canonical Serialization (BCS) for Move-based chains.
//!
//! BCS is deterministic and not self-describing: every value has exactly one
//! encoding and the reader must know the schema. Transaction hashes and
//! signatures are computed over these bytes.
//!
//! ## Encoding Rules
//!
//! - `bool`: one byte, `0x00` or `0x01`
//! - `u8`..`u64`: fixed-width little-endian
//! - `u128` / `u256`: 16 / 32 bytes little-endian, zero-padded
//! - lengths and variant indices: ULEB128, at most 32 bits
//! - bytes / strings: ULEB128 length + raw bytes
//! - fixed arrays: raw bytes, no prefix
//! - `Vec<T>`: ULEB128 count + each item
//! - `Option<T>`: `0x00`, or `0x01` + value
//!
//! ## Error Handling
//!
//! [`Serializer`] and [`Deserializer`] latch the first error and turn later
//! calls into no-ops. Composed types write or read all of their fields and
//! the caller checks once, usually through [`serialize`] / [`deserialize`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod deserializer;
mod error;
pub mod pool;
mod serializer;

pub use deserializer::Deserializer;
pub use error::Error;
pub use pool::{acquire_serializer, release_serializer, SerializerPool};
pub use serializer::Serializer;

/// A type that can write itself to a [`Serializer`]
pub trait Serialize {
    /// Append this value's BCS encoding
    fn serialize(&self, ser: &mut Serializer);
}

/// A type that can read itself from a [`Deserializer`]
///
/// On failure, implementations latch the error on `de` and return any
/// placeholder value; callers check [`Deserializer::error`] afterwards.
pub trait Deserialize: Sized {
    /// Fewest bytes any encoding of this type occupies
    ///
    /// [`Deserializer::sequence`] checks `count * MIN_ENCODED_LEN` against
    /// the remaining input before reading any item.
    const MIN_ENCODED_LEN: usize = 1;

    /// Read one value
    fn deserialize(de: &mut Deserializer<'_>) -> Self;
}

/// Serialize a value to bytes
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut ser = Serializer::new();
    value.serialize(&mut ser);
    ser.into_vec()
}

/// Deserialize a value, requiring the whole input to be consumed
pub fn deserialize<T: Deserialize>(data: &[u8]) -> Result<T, Error> {
    let mut de = Deserializer::new(data);
    let value = T::deserialize(&mut de);
    de.finish()?;
    Ok(value)
}

/// Encode a single u8
pub fn serialize_u8(v: u8) -> Vec<u8> {
    vec![v]
}

/// Encode a single little-endian u64
pub fn serialize_u64(v: u64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// Encode a length-prefixed string
pub fn serialize_string(v: &str) -> Vec<u8> {
    let mut ser = Serializer::with_capacity(v.len() + 5);
    ser.str(v);
    ser.into_vec().unwrap_or_default()
}

// ==================== Built-in impls ====================

macro_rules! impl_int {
    ($($ty:ident),*) => {
        $(
            impl Serialize for $ty {
                fn serialize(&self, ser: &mut Serializer) {
                    ser.$ty(*self);
                }
            }

            impl Deserialize for $ty {
                const MIN_ENCODED_LEN: usize = std::mem::size_of::<$ty>();

                fn deserialize(de: &mut Deserializer<'_>) -> Self {
                    de.$ty()
                }
            }
        )*
    };
}

impl_int!(bool, u8, u16, u32, u64);

impl Serialize for str {
    fn serialize(&self, ser: &mut Serializer) {
        ser.str(self);
    }
}

impl Serialize for String {
    fn serialize(&self, ser: &mut Serializer) {
        ser.str(self);
    }
}

impl Deserialize for String {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        de.string()
    }
}

impl<T: Serialize> Serialize for [T] {
    fn serialize(&self, ser: &mut Serializer) {
        ser.sequence(self);
    }
}

impl<T: Serialize> Serialize for Vec<T> {
    fn serialize(&self, ser: &mut Serializer) {
        ser.sequence(self);
    }
}

impl<T: Deserialize> Deserialize for Vec<T> {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        de.sequence()
    }
}

impl<T: Serialize> Serialize for Option<T> {
    fn serialize(&self, ser: &mut Serializer) {
        ser.option(self.as_ref());
    }
}

impl<T: Deserialize> Deserialize for Option<T> {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        de.option()
    }
}

impl<const N: usize> Serialize for [u8; N] {
    fn serialize(&self, ser: &mut Serializer) {
        ser.fixed_bytes(self);
    }
}

impl<const N: usize> Deserialize for [u8; N] {
    const MIN_ENCODED_LEN: usize = N;

    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        de.fixed_array()
    }
}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize(&self, ser: &mut Serializer) {
        (**self).serialize(ser);
    }
}

impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn serialize(&self, ser: &mut Serializer) {
        (**self).serialize(ser);
    }
}

impl<T: Deserialize> Deserialize for Box<T> {
    const MIN_ENCODED_LEN: usize = T::MIN_ENCODED_LEN;

    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Box::new(T::deserialize(de))
    }
}
