//! Append-style MessagePack encoder.

use msgp_buffers::Writer;

use crate::constants::marker::*;
use crate::{Error, Value};

/// Converts a length to its 32-bit wire form.
pub(crate) fn checked_len(len: usize) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| Error::LengthOverflow(len))
}

fn wire_len(len: usize) -> u32 {
    match checked_len(len) {
        Ok(len) => len,
        Err(e) => panic!("msgp: {e}"),
    }
}

/// Encodes MessagePack values into a growable buffer.
///
/// Integers and headers always use their smallest wire form.
///
/// Writers that take a slice panic if it is longer than `u32::MAX` bytes;
/// MessagePack has no header for it.
///
/// # Example
///
/// ```
/// use msgp::Encoder;
///
/// let mut en = Encoder::new();
/// en.write_map_header(1);
/// en.write_str("a");
/// en.write_int(-1);
/// assert_eq!(en.into_vec(), [0x81, 0xa1, b'a', 0xff]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    pub writer: Writer,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: Writer::with_capacity(capacity),
        }
    }

    /// Appends to `buf` after its existing contents.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        Self {
            writer: Writer::from_vec(buf),
        }
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.writer.as_slice()
    }

    /// Takes the encoded bytes, leaving the encoder empty.
    pub fn flush(&mut self) -> Vec<u8> {
        self.writer.flush()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.writer.into_vec()
    }

    /// Encodes a single value into a fresh buffer.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_value(value);
        self.writer.flush()
    }

    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_int(*i),
            Value::Uint(u) => self.write_uint(*u),
            Value::F32(f) => self.write_f32(*f),
            Value::F64(f) => self.write_f64(*f),
            Value::Str(s) => self.write_str(s),
            Value::Bin(b) => self.write_bin(b),
            Value::Array(items) => {
                self.write_array_header(wire_len(items.len()));
                for item in items {
                    self.write_value(item);
                }
            }
            Value::Map(entries) => {
                self.write_map_header(wire_len(entries.len()));
                for (k, v) in entries {
                    self.write_value(k);
                    self.write_value(v);
                }
            }
            Value::Ext(tag, data) => self.write_ext(*tag, data),
        }
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    pub fn write_uint(&mut self, num: u64) {
        if num <= 0x7f {
            self.writer.u8(num as u8);
        } else if num <= 0xff {
            self.writer.u16(((UINT8 as u16) << 8) | num as u16);
        } else if num <= 0xffff {
            self.writer.u8u16(UINT16, num as u16);
        } else if num <= 0xffff_ffff {
            self.writer.u8u32(UINT32, num as u32);
        } else {
            self.writer.u8u64(UINT64, num);
        }
    }

    pub fn write_int(&mut self, num: i64) {
        if num >= 0 {
            self.write_uint(num as u64);
        } else if num >= -0x20 {
            // negative fixint: 0xe0..0xff
            self.writer.u8(num as i8 as u8);
        } else if num >= i8::MIN as i64 {
            self.writer.u16(((INT8 as u16) << 8) | (num as i8 as u8) as u16);
        } else if num >= i16::MIN as i64 {
            self.writer.u8u16(INT16, num as i16 as u16);
        } else if num >= i32::MIN as i64 {
            self.writer.u8u32(INT32, num as i32 as u32);
        } else {
            self.writer.u8u64(INT64, num as u64);
        }
    }

    pub fn write_f32(&mut self, num: f32) {
        self.writer.u8f32(FLOAT32, num);
    }

    pub fn write_f64(&mut self, num: f64) {
        self.writer.u8f64(FLOAT64, num);
    }

    pub fn write_str_header(&mut self, length: u32) {
        if length <= 0x1f {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            self.writer.u16(((STR8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else {
            self.writer.u8u32(STR32, length);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.writer.ensure_capacity(5 + s.len());
        self.write_str_header(wire_len(s.len()));
        self.writer.utf8(s);
    }

    pub fn write_bin_header(&mut self, length: u32) {
        if length <= 0xff {
            self.writer.u16(((BIN8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(BIN16, length as u16);
        } else {
            self.writer.u8u32(BIN32, length);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.writer.ensure_capacity(5 + buf.len());
        self.write_bin_header(wire_len(buf.len()));
        self.writer.buf(buf);
    }

    pub fn write_array_header(&mut self, length: u32) {
        if length <= 0xf {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            self.writer.u8u32(ARRAY32, length);
        }
    }

    pub fn write_map_header(&mut self, length: u32) {
        if length <= 0xf {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            self.writer.u8u32(MAP32, length);
        }
    }

    pub fn write_ext_header(&mut self, tag: i8, length: u32) {
        let tag = tag as u8;
        match length {
            1 => self.writer.u16(((FIXEXT1 as u16) << 8) | tag as u16),
            2 => self.writer.u16(((FIXEXT2 as u16) << 8) | tag as u16),
            4 => self.writer.u16(((FIXEXT4 as u16) << 8) | tag as u16),
            8 => self.writer.u16(((FIXEXT8 as u16) << 8) | tag as u16),
            16 => self.writer.u16(((FIXEXT16 as u16) << 8) | tag as u16),
            _ => {
                if length <= 0xff {
                    self.writer.u16(((EXT8 as u16) << 8) | length as u16);
                } else if length <= 0xffff {
                    self.writer.u8u16(EXT16, length as u16);
                } else {
                    self.writer.u8u32(EXT32, length);
                }
                self.writer.u8(tag);
            }
        }
    }

    pub fn write_ext(&mut self, tag: i8, data: &[u8]) {
        self.write_ext_header(tag, wire_len(data.len()));
        self.writer.buf(data);
    }

    /// Appends bytes that are already valid MessagePack.
    pub fn write_raw(&mut self, raw: &[u8]) {
        self.writer.buf(raw);
    }
}
