//! Streaming BCS writer

use bytes::{BufMut, BytesMut};
use num_bigint::{BigInt, Sign};

use crate::{Error, Serialize};

/// BCS serializer
///
/// Appends fields to an internal buffer. The first error is latched and every
/// later write becomes a no-op, so composed types can write all of their
/// fields and check once at the end.
#[derive(Debug, Default)]
pub struct Serializer {
    buf: BytesMut,
    err: Option<Error>,
}

impl Serializer {
    /// Create an empty serializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with a preallocated buffer
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            err: None,
        }
    }

    /// Latched error, if any
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Latch an error. Ignored if one is already set.
    pub fn set_error(&mut self, err: Error) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    /// Whether no error has been latched
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Allocated buffer capacity
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Clear the buffer and the latched error, keeping the allocation
    pub fn reset(&mut self) {
        self.buf.clear();
        self.err = None;
    }

    /// Written bytes, or `None` if an error was latched
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.err {
            Some(_) => None,
            None => Some(&self.buf[..]),
        }
    }

    /// Copy of the written bytes, or `None` if an error was latched
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        self.as_bytes().map(<[u8]>::to_vec)
    }

    /// Consume the serializer, returning the bytes or the latched error
    pub fn into_vec(self) -> Result<Vec<u8>, Error> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.buf.to_vec()),
        }
    }

    // ==================== Primitives ====================

    /// Write a bool as 0x00 / 0x01
    pub fn bool(&mut self, v: bool) {
        self.u8(u8::from(v));
    }

    /// Write a u8
    pub fn u8(&mut self, v: u8) {
        if self.err.is_none() {
            self.buf.put_u8(v);
        }
    }

    /// Write a little-endian u16
    pub fn u16(&mut self, v: u16) {
        if self.err.is_none() {
            self.buf.put_u16_le(v);
        }
    }

    /// Write a little-endian u32
    pub fn u32(&mut self, v: u32) {
        if self.err.is_none() {
            self.buf.put_u32_le(v);
        }
    }

    /// Write a little-endian u64
    pub fn u64(&mut self, v: u64) {
        if self.err.is_none() {
            self.buf.put_u64_le(v);
        }
    }

    /// Write a 16-byte little-endian unsigned integer
    ///
    /// Latches [`Error::Negative`] or [`Error::Overflow`] if `v` is outside `0..2^128`.
    pub fn u128(&mut self, v: &BigInt) {
        self.unsigned_le(v, 16);
    }

    /// Write a 32-byte little-endian unsigned integer
    ///
    /// Latches [`Error::Negative`] or [`Error::Overflow`] if `v` is outside `0..2^256`.
    pub fn u256(&mut self, v: &BigInt) {
        self.unsigned_le(v, 32);
    }

    fn unsigned_le(&mut self, v: &BigInt, width: usize) {
        if self.err.is_some() {
            return;
        }
        let (sign, magnitude) = v.to_bytes_le();
        if sign == Sign::Minus {
            self.set_error(Error::Negative { bits: width * 8 });
            return;
        }
        if magnitude.len() > width {
            self.set_error(Error::Overflow { bits: width * 8 });
            return;
        }
        self.buf.put_slice(&magnitude);
        self.buf.put_bytes(0, width - magnitude.len());
    }

    /// Write an unsigned LEB128 integer (lengths and variant indices)
    pub fn uleb128(&mut self, mut v: u32) {
        if self.err.is_some() {
            return;
        }
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.put_u8(byte);
                return;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    /// Write a collection length as ULEB128
    pub fn length(&mut self, len: usize) {
        match u32::try_from(len) {
            Ok(len) => self.uleb128(len),
            Err(_) => self.set_error(Error::LengthOverflow(len)),
        }
    }

    /// Write length-prefixed bytes
    pub fn bytes(&mut self, v: &[u8]) {
        self.length(v.len());
        self.fixed_bytes(v);
    }

    /// Write a length-prefixed UTF-8 string
    pub fn str(&mut self, v: &str) {
        self.bytes(v.as_bytes());
    }

    /// Write raw bytes with no length prefix
    pub fn fixed_bytes(&mut self, v: &[u8]) {
        if self.err.is_none() {
            self.buf.put_slice(v);
        }
    }

    // ==================== Composition ====================

    /// Write a value that knows how to serialize itself
    pub fn value<T: Serialize + ?Sized>(&mut self, v: &T) {
        if self.err.is_none() {
            v.serialize(self);
        }
    }

    /// Write a ULEB128 count followed by each item
    pub fn sequence<T: Serialize>(&mut self, items: &[T]) {
        self.sequence_with(items, |ser, item| item.serialize(ser));
    }

    /// Write a ULEB128 count followed by each item, using `f` per item
    pub fn sequence_with<T, F>(&mut self, items: &[T], mut f: F)
    where
        F: FnMut(&mut Self, &T),
    {
        self.length(items.len());
        for item in items {
            if self.err.is_some() {
                return;
            }
            f(self, item);
        }
    }

    /// Write 0x00 for `None`, or 0x01 followed by the value
    pub fn option<T: Serialize + ?Sized>(&mut self, v: Option<&T>) {
        self.option_with(v, |ser, v| v.serialize(ser));
    }

    /// Write an option tag, using `f` for the present value
    pub fn option_with<T: ?Sized, F>(&mut self, v: Option<&T>, f: F)
    where
        F: FnOnce(&mut Self, &T),
    {
        match v {
            None => self.u8(0),
            Some(v) => {
                self.u8(1);
                if self.err.is_none() {
                    f(self, v);
                }
            }
        }
    }
}
