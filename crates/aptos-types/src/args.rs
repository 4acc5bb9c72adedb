//! Entry-function argument encoders
//!
//! Each encoder returns the BCS bytes of one Move value, ready to push onto
//! [`EntryFunction::args`](crate::EntryFunction). Scalars are written
//! directly; everything else goes through a pooled serializer.
//!
//! ```
//! use aptos_primitives::AccountAddress;
//! use aptos_types::args::{address_arg, entry_function_args, u64_arg};
//!
//! let args = entry_function_args([address_arg(&AccountAddress::ONE), u64_arg(1000)]);
//! assert_eq!(args[1], 1000u64.to_le_bytes());
//! ```

use aptos_bcs::{acquire_serializer, release_serializer, Serializer};
use aptos_primitives::{AccountAddress, U256};

/// Run `write` on a pooled serializer and copy the bytes out
///
/// Every encoder below only performs writes that cannot fail.
fn pooled(write: impl FnOnce(&mut Serializer)) -> Vec<u8> {
    let mut ser = acquire_serializer();
    write(&mut ser);
    let bytes = ser.to_bytes().unwrap_or_default();
    release_serializer(ser);
    bytes
}

/// Collect encoded arguments
pub fn entry_function_args<I>(args: I) -> Vec<Vec<u8>>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    args.into_iter().collect()
}

// ==================== Scalars ====================

/// `bool`
pub fn bool_arg(v: bool) -> Vec<u8> {
    vec![u8::from(v)]
}

/// `u8`
pub fn u8_arg(v: u8) -> Vec<u8> {
    vec![v]
}

/// `u16`
pub fn u16_arg(v: u16) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// `u32`
pub fn u32_arg(v: u32) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// `u64`
pub fn u64_arg(v: u64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// `u128`
pub fn u128_arg(v: u128) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// `u256`
pub fn u256_arg(v: primitive_types::U256) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    v.to_little_endian(&mut out);
    out
}

/// `u256` from the arbitrary-precision wrapper
///
/// Fails if the value is negative or wider than 256 bits.
pub fn try_u256_arg(v: &U256) -> Result<Vec<u8>, aptos_bcs::Error> {
    let mut ser = acquire_serializer();
    ser.u256(v.value());
    let result = match ser.error() {
        Some(err) => Err(err.clone()),
        None => Ok(ser.to_bytes().unwrap_or_default()),
    };
    release_serializer(ser);
    result
}

/// `address`
pub fn address_arg(addr: &AccountAddress) -> Vec<u8> {
    addr.as_bytes().to_vec()
}

/// `Object<T>`, encoded as the object's address
pub fn object_arg(addr: &AccountAddress) -> Vec<u8> {
    address_arg(addr)
}

// ==================== Strings and bytes ====================

/// `0x1::string::String`
pub fn string_arg(v: &str) -> Vec<u8> {
    pooled(|ser| ser.str(v))
}

/// `vector<u8>`
pub fn bytes_arg(v: &[u8]) -> Vec<u8> {
    pooled(|ser| ser.bytes(v))
}

/// `vector<u8>`, same as [`bytes_arg`]
pub fn vector_u8_arg(v: &[u8]) -> Vec<u8> {
    bytes_arg(v)
}

// ==================== Vectors ====================

/// `vector<u64>`
pub fn vector_u64_arg(values: &[u64]) -> Vec<u8> {
    pooled(|ser| ser.sequence_with(values, |ser, v| ser.u64(*v)))
}

/// `vector<address>`
pub fn vector_address_arg(addrs: &[AccountAddress]) -> Vec<u8> {
    pooled(|ser| ser.sequence(addrs))
}

/// `vector<String>`
pub fn vector_string_arg<S: AsRef<str>>(values: &[S]) -> Vec<u8> {
    pooled(|ser| ser.sequence_with(values, |ser, v| ser.str(v.as_ref())))
}

// ==================== Options ====================

/// `Option<u64>`
pub fn option_u64_arg(v: Option<u64>) -> Vec<u8> {
    pooled(|ser| ser.option(v.as_ref()))
}

/// `Option<address>`
pub fn option_address_arg(addr: Option<&AccountAddress>) -> Vec<u8> {
    pooled(|ser| ser.option(addr))
}

/// `Option<String>`
pub fn option_string_arg(v: Option<&str>) -> Vec<u8> {
    pooled(|ser| ser.option_with(v, |ser, s| ser.str(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Scalars ====================

    #[test]
    fn test_scalars_little_endian() {
        assert_eq!(bool_arg(true), vec![1]);
        assert_eq!(u8_arg(7), vec![7]);
        assert_eq!(u16_arg(0x1234), vec![0x34, 0x12]);
        assert_eq!(u32_arg(1), vec![1, 0, 0, 0]);
        assert_eq!(u64_arg(0x123456789abcdef0), vec![0xf0, 0xde, 0xbc, 0x9a, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(u128_arg(1).len(), 16);
    }

    #[test]
    fn test_u256_encoders_agree() {
        let v = primitive_types::U256::from(1u64) << 200;
        assert_eq!(u256_arg(v), try_u256_arg(&U256::from(v)).unwrap());
        assert_eq!(u256_arg(v).len(), 32);
        assert_eq!(
            try_u256_arg(&U256::new(-1)),
            Err(aptos_bcs::Error::Negative { bits: 256 })
        );
    }

    #[test]
    fn test_address_and_object() {
        let addr = AccountAddress::from_hex("0xcafe").unwrap();
        assert_eq!(address_arg(&addr).len(), 32);
        assert_eq!(object_arg(&addr), address_arg(&addr));
    }

    // ==================== Composites ====================

    #[test]
    fn test_string_and_bytes() {
        assert_eq!(string_arg("hi"), vec![2, b'h', b'i']);
        assert_eq!(bytes_arg(&[1, 2]), vec![2, 1, 2]);
        assert_eq!(vector_u8_arg(&[1, 2]), bytes_arg(&[1, 2]));
        assert_eq!(string_arg(""), vec![0]);
    }

    #[test]
    fn test_vectors() {
        let encoded = vector_u64_arg(&[1, 2]);
        assert_eq!(encoded.len(), 1 + 16);
        assert_eq!(encoded[0], 2);
        assert_eq!(vector_address_arg(&[AccountAddress::ONE]).len(), 33);
        assert_eq!(vector_string_arg(&["a", "bc"]), vec![2, 1, b'a', 2, b'b', b'c']);
        assert_eq!(vector_string_arg::<String>(&[]), vec![0]);
    }

    #[test]
    fn test_options() {
        assert_eq!(option_u64_arg(None), vec![0]);
        assert_eq!(option_u64_arg(Some(1)), vec![1, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(option_address_arg(Some(&AccountAddress::ONE)).len(), 33);
        assert_eq!(option_string_arg(Some("x")), vec![1, 1, b'x']);
        assert_eq!(option_string_arg(None), vec![0]);
    }

    #[test]
    fn test_entry_function_args_preserves_order() {
        let args = entry_function_args([u8_arg(1), bool_arg(false), string_arg("z")]);
        assert_eq!(args, vec![vec![1], vec![0], vec![1, b'z']]);
    }

    #[test]
    fn test_encoders_reuse_pool_cleanly() {
        // a pooled serializer must come back empty
        let first = string_arg("first value");
        let second = string_arg("x");
        assert_eq!(first[0], 11);
        assert_eq!(second, vec![1, b'x']);
    }
}
