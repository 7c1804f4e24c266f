//! Streaming reader and writer over `std::io`.

use std::fmt;
use std::io::{Read, Write};
use std::ops::{Deref, DerefMut};

use msgp_buffers::StreamReader;

use crate::constants::WireType;
use crate::header::{prefix_len, size_of, Size, MAX_PREFIX_LEN};
use crate::{Decoder, Encoder, Error, Value};

/// Largest chunk appended at once by [`Reader::read_bin_into`].
const COPY_CHUNK: usize = 8 * 1024;

/// Reads MessagePack values from a byte stream.
///
/// Every read peeks the value first and consumes it only once it decoded
/// successfully, so a type mismatch leaves the stream positioned at the
/// offending value.
pub struct Reader<'r> {
    r: StreamReader<Box<dyn Read + 'r>>,
}

impl fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("buffered", &self.r.buffered())
            .finish()
    }
}

impl<'r> Reader<'r> {
    pub fn new(source: impl Read + 'r) -> Self {
        Self::with_capacity(source, StreamReader::<Box<dyn Read + 'r>>::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(source: impl Read + 'r, capacity: usize) -> Self {
        let source: Box<dyn Read + 'r> = Box::new(source);
        Self {
            r: StreamReader::with_capacity(source, capacity),
        }
    }

    /// Bytes read from the source but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.r.buffered()
    }

    /// Decodes the header of the next value without consuming anything.
    ///
    /// Uses bytes already in the buffer when enough are present and falls
    /// back to exact-length peeks otherwise.
    pub fn peek_size(&mut self) -> Result<Size, Error> {
        if let Some(p) = self.r.peek_buffered(MAX_PREFIX_LEN) {
            return size_of(p);
        }
        let lead = self.r.peek(1)?[0];
        let p = self.r.peek(prefix_len(lead))?;
        size_of(p)
    }

    pub fn peek_type(&mut self) -> Result<WireType, Error> {
        Ok(WireType::of(self.r.peek(1)?[0]))
    }

    /// Decodes the next value's own bytes with `f` and consumes them on
    /// success. Containers contribute only their header.
    fn read_with<T>(
        &mut self,
        f: impl FnOnce(&mut Decoder<'_>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let size = self.peek_size()?;
        let raw = self.r.peek(size.bytes)?;
        let value = f(&mut Decoder::new(raw))?;
        self.r.skip(size.bytes)?;
        Ok(value)
    }

    pub fn read_nil(&mut self) -> Result<(), Error> {
        self.read_with(|dc| dc.read_nil())
    }

    /// Consumes a nil if one is next and reports whether it did.
    pub fn try_nil(&mut self) -> Result<bool, Error> {
        if self.peek_type()? == WireType::Nil {
            self.r.skip(1)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read_with(|dc| dc.read_bool())
    }

    pub fn read_int(&mut self) -> Result<i64, Error> {
        self.read_with(|dc| dc.read_int())
    }

    pub fn read_uint(&mut self) -> Result<u64, Error> {
        self.read_with(|dc| dc.read_uint())
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read_with(|dc| dc.read_f32())
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.read_with(|dc| dc.read_f64())
    }

    pub fn read_string(&mut self) -> Result<String, Error> {
        self.read_with(|dc| dc.read_str().map(str::to_owned))
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        self.read_with(|dc| dc.read_bin().map(<[u8]>::to_vec))
    }

    /// Reads a map key written as a string or a binary.
    pub fn read_map_key(&mut self) -> Result<String, Error> {
        self.read_with(|dc| {
            let key = dc.read_map_key()?;
            String::from_utf8(key.to_vec()).map_err(|_| Error::InvalidUtf8)
        })
    }

    pub fn read_array_header(&mut self) -> Result<u32, Error> {
        self.read_with(|dc| dc.read_array_header())
    }

    pub fn read_map_header(&mut self) -> Result<u32, Error> {
        self.read_with(|dc| dc.read_map_header())
    }

    pub fn read_ext(&mut self) -> Result<(i8, Vec<u8>), Error> {
        self.read_with(|dc| dc.read_ext().map(|(tag, data)| (tag, data.to_vec())))
    }

    /// Reads a binary into `dst`, replacing its contents.
    ///
    /// The payload is copied in bounded chunks, so a declared length larger
    /// than the stream fails with [`Error::UnexpectedEof`] without
    /// allocating it up front.
    pub fn read_bin_into(&mut self, dst: &mut Vec<u8>) -> Result<(), Error> {
        dst.clear();
        let lead = self.r.peek(1)?[0];
        let header_len = prefix_len(lead);
        let len = Decoder::new(self.r.peek(header_len)?).read_bin_header()? as usize;
        self.r.skip(header_len)?;
        while dst.len() < len {
            let start = dst.len();
            let chunk = (len - start).min(COPY_CHUNK);
            dst.resize(start + chunk, 0);
            self.r.read_full(&mut dst[start..])?;
        }
        Ok(())
    }

    pub fn read_value(&mut self) -> Result<Value, Error> {
        let raw = self.next_value()?;
        Decoder::new(&raw).read_value()
    }

    /// Consumes the next value, however deeply nested.
    pub fn skip(&mut self) -> Result<(), Error> {
        let mut pending: u64 = 1;
        while pending > 0 {
            let size = self.peek_size()?;
            self.r.skip(size.bytes)?;
            pending = pending - 1 + size.objects;
        }
        Ok(())
    }

    /// Consumes the next value and returns its exact encoded bytes.
    pub fn next_value(&mut self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.append_next_value(&mut out)?;
        Ok(out)
    }

    /// Consumes the next value and appends its encoded bytes to `out`.
    ///
    /// On error `out` is restored to its previous length.
    pub fn append_next_value(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        let start = out.len();
        let mut pending: u64 = 1;
        while pending > 0 {
            let size = match self.peek_size() {
                Ok(size) => size,
                Err(e) => {
                    out.truncate(start);
                    return Err(e);
                }
            };
            match self.r.next(size.bytes) {
                Ok(bytes) => out.extend_from_slice(bytes),
                Err(e) => {
                    out.truncate(start);
                    return Err(e.into());
                }
            }
            pending = pending - 1 + size.objects;
        }
        Ok(())
    }
}

/// Writes MessagePack values to a byte sink.
///
/// Values are staged in an [`Encoder`] (reachable through `Deref`) and
/// handed to the sink on [`Writer::flush`].
pub struct Writer<'w> {
    en: Encoder,
    sink: Box<dyn Write + 'w>,
}

impl fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("buffered", &self.en.len())
            .finish()
    }
}

impl<'w> Writer<'w> {
    pub fn new(sink: impl Write + 'w) -> Self {
        Self {
            en: Encoder::new(),
            sink: Box::new(sink),
        }
    }

    /// Bytes staged but not yet written to the sink.
    pub fn buffered(&self) -> usize {
        self.en.len()
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        let staged = self.en.flush();
        self.sink.write_all(&staged)?;
        self.sink.flush()?;
        Ok(())
    }
}

impl Deref for Writer<'_> {
    type Target = Encoder;

    fn deref(&self) -> &Encoder {
        &self.en
    }
}

impl DerefMut for Writer<'_> {
    fn deref_mut(&mut self) -> &mut Encoder {
        &mut self.en
    }
}
