//! Growable big-endian byte writer.

/// A byte writer that grows as needed.
///
/// # Example
///
/// ```
/// use msgp_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Initial capacity used by [`Writer::new`].
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Wraps an existing buffer; new bytes are appended after its contents.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        Self { buf }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reserves room for at least `additional` more bytes.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    /// Bytes written since the last flush.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Discards everything written since the last flush.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Returns the written bytes and starts a fresh buffer.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Consumes the writer, returning its buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian `u16`.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.buf.push(marker);
        self.u16(val);
    }

    /// Writes a marker byte followed by a big-endian `u32`.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.buf.push(marker);
        self.u32(val);
    }

    /// Writes a marker byte followed by a big-endian `u64`.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.buf.push(marker);
        self.u64(val);
    }

    /// Writes a marker byte followed by a big-endian `f32`.
    pub fn u8f32(&mut self, marker: u8, val: f32) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian `f64`.
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Appends raw bytes.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 bytes of `s` and returns how many were written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf.extend_from_slice(s.as_bytes());
        s.len()
    }
}
