//! Bounds-checked cursor over a byte slice.

use std::str;

use crate::BufferError;

/// A cursor over an immutable byte slice.
///
/// Every read is bounds-checked; on error the cursor stays where it was, so
/// callers can report the failing offset or retry with more input.
///
/// # Example
///
/// ```
/// use msgp_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8().unwrap(), 0x01);
/// assert_eq!(reader.try_u16().unwrap(), 0x0203);
/// assert!(reader.try_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

macro_rules! be_reader {
    ($(#[$doc:meta] $name:ident -> $ty:ty;)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, BufferError> {
                const N: usize = std::mem::size_of::<$ty>();
                let raw = self.try_buf(N)?;
                let mut arr = [0u8; N];
                arr.copy_from_slice(raw);
                Ok(<$ty>::from_be_bytes(arr))
            }
        )*
    };
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, x: 0 }
    }

    /// Number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.x
    }

    /// The unread tail of the slice.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.x..]
    }

    /// The bytes consumed so far.
    pub fn consumed(&self) -> &'a [u8] {
        &self.bytes[..self.x]
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.bytes[self.x])
    }

    /// Peeks at the next `n` bytes without advancing.
    pub fn try_peek_n(&self, n: usize) -> Result<&'a [u8], BufferError> {
        self.check(n)?;
        Ok(&self.bytes[self.x..self.x + n])
    }

    /// Advances the cursor by `n` bytes.
    pub fn try_skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.bytes[start..self.x])
    }

    /// Reads `size` bytes as a UTF-8 string.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let s = str::from_utf8(&self.bytes[self.x..self.x + size])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.x += size;
        Ok(s)
    }

    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let v = self.bytes[self.x];
        self.x += 1;
        Ok(v)
    }

    #[inline]
    pub fn try_i8(&mut self) -> Result<i8, BufferError> {
        self.try_u8().map(|v| v as i8)
    }

    be_reader! {
        /// Reads a big-endian `u16`.
        try_u16 -> u16;
        /// Reads a big-endian `i16`.
        try_i16 -> i16;
        /// Reads a big-endian `u32`.
        try_u32 -> u32;
        /// Reads a big-endian `i32`.
        try_i32 -> i32;
        /// Reads a big-endian `u64`.
        try_u64 -> u64;
        /// Reads a big-endian `i64`.
        try_i64 -> i64;
        /// Reads a big-endian `f32`.
        try_f32 -> f32;
        /// Reads a big-endian `f64`.
        try_f64 -> f64;
    }
}
