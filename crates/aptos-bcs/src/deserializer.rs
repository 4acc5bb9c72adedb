//! Cursor-based BCS reader

use num_bigint::{BigInt, Sign};

use crate::{Deserialize, Error};

/// BCS deserializer over a borrowed input
///
/// Every read checks the remaining length first. The first failure is latched
/// and later reads return default values without touching the cursor.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    data: &'a [u8],
    offset: usize,
    err: Option<Error>,
}

impl<'a> Deserializer<'a> {
    /// Create a deserializer positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            err: None,
        }
    }

    /// Point this instance at new input, clearing the cursor and error
    pub fn reset(&mut self, data: &'a [u8]) {
        self.data = data;
        self.offset = 0;
        self.err = None;
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

    /// Unread byte count
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Check the latched error, then that the input was fully consumed
    pub fn finish(&self) -> Result<(), Error> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.err.is_some() {
            return None;
        }
        let remaining = self.remaining();
        if n > remaining {
            self.set_error(Error::UnexpectedEnd {
                needed: n,
                remaining,
            });
            return None;
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.offset..self.offset + n];
        self.offset += n;
        Some(slice)
    }

    fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N).and_then(|slice| slice.try_into().ok())
    }

    // ==================== Primitives ====================

    /// Read a bool; any byte other than 0x00 / 0x01 is an error
    pub fn bool(&mut self) -> bool {
        match self.take(1) {
            Some([0]) | None => false,
            Some([1]) => true,
            Some(other) => {
                self.set_error(Error::InvalidBool(other[0]));
                false
            }
        }
    }

    /// Read a u8
    pub fn u8(&mut self) -> u8 {
        self.array::<1>().map(|b| b[0]).unwrap_or_default()
    }

    /// Read a little-endian u16
    pub fn u16(&mut self) -> u16 {
        self.array().map(u16::from_le_bytes).unwrap_or_default()
    }

    /// Read a little-endian u32
    pub fn u32(&mut self) -> u32 {
        self.array().map(u32::from_le_bytes).unwrap_or_default()
    }

    /// Read a little-endian u64
    pub fn u64(&mut self) -> u64 {
        self.array().map(u64::from_le_bytes).unwrap_or_default()
    }

    /// Read a 16-byte little-endian unsigned integer
    pub fn u128(&mut self) -> BigInt {
        self.unsigned_le(16)
    }

    /// Read a 32-byte little-endian unsigned integer
    pub fn u256(&mut self) -> BigInt {
        self.unsigned_le(32)
    }

    fn unsigned_le(&mut self, width: usize) -> BigInt {
        self.take(width)
            .map(|b| BigInt::from_bytes_le(Sign::Plus, b))
            .unwrap_or_default()
    }

    /// Read an unsigned LEB128 integer
    ///
    /// At most five groups are accepted and the value must fit in a `u32`.
    /// A trailing zero group (a padded encoding) is rejected.
    pub fn uleb128(&mut self) -> u32 {
        let mut value: u32 = 0;
        let mut shift: u32 = 0;
        loop {
            let Some(&[byte]) = self.take(1) else {
                return 0;
            };
            let group = u32::from(byte & 0x7f);
            if shift == 28 && group > 0x0f {
                self.set_error(Error::UlebOverflow);
                return 0;
            }
            value |= group << shift;
            if byte & 0x80 == 0 {
                if byte == 0 && shift > 0 {
                    self.set_error(Error::NonCanonicalUleb);
                    return 0;
                }
                return value;
            }
            shift += 7;
            if shift > 28 {
                self.set_error(Error::UlebOverflow);
                return 0;
            }
        }
    }

    /// Read a ULEB128 collection length
    pub fn length(&mut self) -> usize {
        self.uleb128() as usize
    }

    /// Read length-prefixed bytes (copied)
    pub fn bytes(&mut self) -> Vec<u8> {
        self.bytes_borrowed().to_vec()
    }

    /// Read length-prefixed bytes without copying
    pub fn bytes_borrowed(&mut self) -> &'a [u8] {
        let len = self.length();
        self.fixed_bytes_borrowed(len)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn string(&mut self) -> String {
        let raw = self.bytes_borrowed();
        match std::str::from_utf8(raw) {
            Ok(s) => s.to_owned(),
            Err(_) => {
                self.set_error(Error::InvalidUtf8);
                String::new()
            }
        }
    }

    /// Read exactly `n` raw bytes (copied)
    pub fn fixed_bytes(&mut self, n: usize) -> Vec<u8> {
        self.fixed_bytes_borrowed(n).to_vec()
    }

    /// Read exactly `n` raw bytes as a view into the input
    ///
    /// The returned slice borrows the input buffer, not the deserializer, so it
    /// stays valid after the deserializer is dropped or reset and can never
    /// outlive the data it points into.
    pub fn fixed_bytes_borrowed(&mut self, n: usize) -> &'a [u8] {
        self.take(n).unwrap_or_default()
    }

    /// Read exactly `N` raw bytes into an array
    pub fn fixed_array<const N: usize>(&mut self) -> [u8; N] {
        self.array().unwrap_or([0u8; N])
    }

    // ==================== Composition ====================

    /// Read a value that knows how to deserialize itself
    pub fn value<T: Deserialize>(&mut self) -> T {
        T::deserialize(self)
    }

    /// Read a ULEB128 count followed by that many items
    pub fn sequence<T: Deserialize>(&mut self) -> Vec<T> {
        let len = self.length();
        self.items(len, T::MIN_ENCODED_LEN, T::deserialize)
    }

    /// Read a ULEB128 count followed by that many items built by `f`
    ///
    /// Returns an empty vector if any item fails.
    pub fn sequence_with<T, F>(&mut self, f: F) -> Vec<T>
    where
        F: FnMut(&mut Self) -> T,
    {
        let len = self.length();
        self.items(len, 0, f)
    }

    fn items<T, F>(&mut self, len: usize, min_item_len: usize, mut f: F) -> Vec<T>
    where
        F: FnMut(&mut Self) -> T,
    {
        if self.err.is_some() {
            return Vec::new();
        }
        let remaining = self.remaining();
        let needed = len.saturating_mul(min_item_len);
        if needed > remaining {
            self.set_error(Error::UnexpectedEnd { needed, remaining });
            return Vec::new();
        }
        // every item consumes at least one byte
        let mut items = Vec::with_capacity(len.min(remaining));
        for _ in 0..len {
            let item = f(self);
            if self.err.is_some() {
                return Vec::new();
            }
            items.push(item);
        }
        items
    }

    /// Read an option tag and, if present, the value
    pub fn option<T: Deserialize>(&mut self) -> Option<T> {
        self.option_with(T::deserialize)
    }

    /// Read an option tag and, if present, the value built by `f`
    pub fn option_with<T, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> T,
    {
        let tag = self.u8();
        if self.err.is_some() {
            return None;
        }
        match tag {
            0 => None,
            1 => {
                let value = f(self);
                self.err.is_none().then_some(value)
            }
            other => {
                self.set_error(Error::InvalidOptionTag(other));
                None
            }
        }
    }
}
