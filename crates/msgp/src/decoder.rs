//! Zero-copy MessagePack decoder over a byte slice.

use msgp_buffers::Reader;

use crate::constants::{marker::*, WireType};
use crate::{skip, Error, Value};

/// Deepest container nesting [`Decoder::read_value`] will build.
///
/// Decoding keeps its own stack, so the limit only bounds memory.
pub const MAX_VALUE_DEPTH: usize = 1024;

/// Reads MessagePack values from a byte slice.
///
/// Strings and binaries are returned as borrows of the input. A failed read
/// leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    pub reader: Reader<'a>,
}

fn mismatch<T>(expected: WireType, found: u8) -> Result<T, Error> {
    Err(Error::TypeMismatch { expected, found })
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(bytes),
        }
    }

    /// The undecoded tail of the input.
    pub fn remaining(&self) -> &'a [u8] {
        self.reader.rest()
    }

    pub fn position(&self) -> usize {
        self.reader.x
    }

    pub fn is_empty(&self) -> bool {
        self.reader.remaining() == 0
    }

    /// Runs `f` on a copy of the cursor and commits it only on success.
    fn atomic<T>(
        &mut self,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut r = self.reader.clone();
        let value = f(&mut r)?;
        self.reader = r;
        Ok(value)
    }

    pub fn peek_type(&self) -> Result<WireType, Error> {
        Ok(WireType::of(self.reader.try_peek()?))
    }

    /// Consumes a nil if one is next and reports whether it did.
    pub fn try_nil(&mut self) -> Result<bool, Error> {
        if self.reader.try_peek()? == NIL {
            self.reader.try_skip(1)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn read_nil(&mut self) -> Result<(), Error> {
        self.atomic(|r| match r.try_u8()? {
            NIL => Ok(()),
            lead => mismatch(WireType::Nil, lead),
        })
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.atomic(|r| match r.try_u8()? {
            TRUE => Ok(true),
            FALSE => Ok(false),
            lead => mismatch(WireType::Bool, lead),
        })
    }

    /// Reads any integer that fits an `i64`.
    pub fn read_int(&mut self) -> Result<i64, Error> {
        self.atomic(read_int)
    }

    /// Reads any non-negative integer.
    pub fn read_uint(&mut self) -> Result<u64, Error> {
        self.atomic(read_uint)
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.atomic(|r| match r.try_u8()? {
            FLOAT32 => Ok(r.try_f32()?),
            lead => mismatch(WireType::F32, lead),
        })
    }

    /// Reads a float64, widening a float32 if that is what was written.
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.atomic(|r| match r.try_u8()? {
            FLOAT64 => Ok(r.try_f64()?),
            FLOAT32 => Ok(r.try_f32()? as f64),
            lead => mismatch(WireType::F64, lead),
        })
    }

    pub fn read_str_header(&mut self) -> Result<u32, Error> {
        self.atomic(read_str_header)
    }

    pub fn read_str(&mut self) -> Result<&'a str, Error> {
        self.atomic(|r| {
            let len = read_str_header(r)?;
            Ok(r.try_utf8(len as usize)?)
        })
    }

    pub fn read_bin_header(&mut self) -> Result<u32, Error> {
        self.atomic(read_bin_header)
    }

    pub fn read_bin(&mut self) -> Result<&'a [u8], Error> {
        self.atomic(|r| {
            let len = read_bin_header(r)?;
            Ok(r.try_buf(len as usize)?)
        })
    }

    /// Reads a map key written as either a string or a binary.
    pub fn read_map_key(&mut self) -> Result<&'a [u8], Error> {
        self.atomic(|r| {
            let lead = r.try_peek()?;
            let len = match WireType::of(lead) {
                WireType::Str => read_str_header(r)?,
                WireType::Bin => read_bin_header(r)?,
                _ => return mismatch(WireType::Str, lead),
            };
            Ok(r.try_buf(len as usize)?)
        })
    }

    pub fn read_array_header(&mut self) -> Result<u32, Error> {
        self.atomic(read_array_header)
    }

    pub fn read_map_header(&mut self) -> Result<u32, Error> {
        self.atomic(read_map_header)
    }

    /// Reads an extension's type tag and payload.
    pub fn read_ext(&mut self) -> Result<(i8, &'a [u8]), Error> {
        self.atomic(read_ext)
    }

    /// Decodes the next value into a [`Value`] tree.
    pub fn read_value(&mut self) -> Result<Value, Error> {
        self.atomic(read_value)
    }

    /// Returns the raw bytes of the next value and moves past it.
    pub fn read_raw(&mut self) -> Result<&'a [u8], Error> {
        let n = skip::measure(self.reader.rest())?;
        Ok(self.reader.try_buf(n)?)
    }

    /// Moves past the next value, however deeply nested.
    pub fn skip(&mut self) -> Result<(), Error> {
        self.read_raw().map(|_| ())
    }
}

fn read_int(r: &mut Reader<'_>) -> Result<i64, Error> {
    let lead = r.try_u8()?;
    let num = match lead {
        0x00..=0x7f => lead as i64,
        0xe0..=0xff => lead as i8 as i64,
        INT8 => r.try_i8()? as i64,
        INT16 => r.try_i16()? as i64,
        INT32 => r.try_i32()? as i64,
        INT64 => r.try_i64()?,
        UINT8 => r.try_u8()? as i64,
        UINT16 => r.try_u16()? as i64,
        UINT32 => r.try_u32()? as i64,
        UINT64 => i64::try_from(r.try_u64()?).map_err(|_| Error::IntOverflow)?,
        _ => return mismatch(WireType::Int, lead),
    };
    Ok(num)
}

fn read_uint(r: &mut Reader<'_>) -> Result<u64, Error> {
    let lead = r.try_u8()?;
    let num = match lead {
        0x00..=0x7f => lead as u64,
        UINT8 => r.try_u8()? as u64,
        UINT16 => r.try_u16()? as u64,
        UINT32 => r.try_u32()? as u64,
        UINT64 => r.try_u64()?,
        0xe0..=0xff => return Err(Error::IntOverflow),
        INT8 | INT16 | INT32 | INT64 => {
            let signed = match lead {
                INT8 => r.try_i8()? as i64,
                INT16 => r.try_i16()? as i64,
                INT32 => r.try_i32()? as i64,
                _ => r.try_i64()?,
            };
            u64::try_from(signed).map_err(|_| Error::IntOverflow)?
        }
        _ => return mismatch(WireType::Uint, lead),
    };
    Ok(num)
}

fn read_str_header(r: &mut Reader<'_>) -> Result<u32, Error> {
    let lead = r.try_u8()?;
    let len = match lead {
        0xa0..=0xbf => (lead & 0x1f) as u32,
        STR8 => r.try_u8()? as u32,
        STR16 => r.try_u16()? as u32,
        STR32 => r.try_u32()?,
        _ => return mismatch(WireType::Str, lead),
    };
    Ok(len)
}

fn read_bin_header(r: &mut Reader<'_>) -> Result<u32, Error> {
    let lead = r.try_u8()?;
    let len = match lead {
        BIN8 => r.try_u8()? as u32,
        BIN16 => r.try_u16()? as u32,
        BIN32 => r.try_u32()?,
        _ => return mismatch(WireType::Bin, lead),
    };
    Ok(len)
}

fn read_array_header(r: &mut Reader<'_>) -> Result<u32, Error> {
    let lead = r.try_u8()?;
    let len = match lead {
        0x90..=0x9f => (lead & 0x0f) as u32,
        ARRAY16 => r.try_u16()? as u32,
        ARRAY32 => r.try_u32()?,
        _ => return mismatch(WireType::Array, lead),
    };
    Ok(len)
}

fn read_map_header(r: &mut Reader<'_>) -> Result<u32, Error> {
    let lead = r.try_u8()?;
    let len = match lead {
        0x80..=0x8f => (lead & 0x0f) as u32,
        MAP16 => r.try_u16()? as u32,
        MAP32 => r.try_u32()?,
        _ => return mismatch(WireType::Map, lead),
    };
    Ok(len)
}

fn read_ext<'a>(r: &mut Reader<'a>) -> Result<(i8, &'a [u8]), Error> {
    let lead = r.try_u8()?;
    let len = match lead {
        FIXEXT1 => 1,
        FIXEXT2 => 2,
        FIXEXT4 => 4,
        FIXEXT8 => 8,
        FIXEXT16 => 16,
        EXT8 => r.try_u8()? as usize,
        EXT16 => r.try_u16()? as usize,
        EXT32 => r.try_u32()? as usize,
        _ => return mismatch(WireType::Ext, lead),
    };
    let tag = r.try_i8()?;
    Ok((tag, r.try_buf(len)?))
}

/// A container whose children are still being read.
enum Frame {
    Array {
        items: Vec<Value>,
        left: u32,
    },
    Map {
        entries: Vec<(Value, Value)>,
        key: Option<Value>,
        left: u32,
    },
}

impl Frame {
    /// Adds a finished child and reports whether more are expected.
    fn push(&mut self, child: Value) -> bool {
        match self {
            Frame::Array { items, left } => {
                items.push(child);
                *left -= 1;
                *left > 0
            }
            Frame::Map { entries, key, left } => match key.take() {
                None => {
                    *key = Some(child);
                    true
                }
                Some(k) => {
                    entries.push((k, child));
                    *left -= 1;
                    *left > 0
                }
            },
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Map { entries, .. } => Value::Map(entries),
        }
    }
}

/// Builds a [`Value`] with an explicit stack of open containers, so the
/// nesting limit is independent of the thread's stack size.
fn read_value(r: &mut Reader<'_>) -> Result<Value, Error> {
    let mut open: Vec<Frame> = Vec::new();
    loop {
        let lead = r.try_peek()?;
        let mut value = match WireType::of(lead) {
            WireType::Array | WireType::Map if open.len() >= MAX_VALUE_DEPTH => {
                return Err(Error::DepthLimitExceeded(MAX_VALUE_DEPTH));
            }
            WireType::Array => {
                let len = read_array_header(r)?;
                if len > 0 {
                    // Cap the pre-allocation by what the input could possibly hold.
                    open.push(Frame::Array {
                        items: Vec::with_capacity((len as usize).min(r.remaining())),
                        left: len,
                    });
                    continue;
                }
                Value::Array(Vec::new())
            }
            WireType::Map => {
                let len = read_map_header(r)?;
                if len > 0 {
                    open.push(Frame::Map {
                        entries: Vec::with_capacity((len as usize).min(r.remaining() / 2)),
                        key: None,
                        left: len,
                    });
                    continue;
                }
                Value::Map(Vec::new())
            }
            WireType::Nil => {
                r.try_skip(1)?;
                Value::Nil
            }
            WireType::Bool => {
                r.try_skip(1)?;
                Value::Bool(lead == TRUE)
            }
            WireType::Uint => Value::Uint(read_uint(r)?),
            WireType::Int => Value::from(read_int(r)?),
            WireType::F32 => {
                r.try_skip(1)?;
                Value::F32(r.try_f32()?)
            }
            WireType::F64 => {
                r.try_skip(1)?;
                Value::F64(r.try_f64()?)
            }
            WireType::Str => {
                let len = read_str_header(r)?;
                Value::Str(r.try_utf8(len as usize)?.to_owned())
            }
            WireType::Bin => {
                let len = read_bin_header(r)?;
                Value::Bin(r.try_buf(len as usize)?.to_vec())
            }
            WireType::Ext => {
                let (tag, data) = read_ext(r)?;
                Value::Ext(tag, data.to_vec())
            }
            WireType::Invalid => return Err(Error::InvalidMarker(lead)),
        };
        loop {
            let Some(mut parent) = open.pop() else {
                return Ok(value);
            };
            if parent.push(value) {
                open.push(parent);
                break;
            }
            value = parent.finish();
        }
    }
}

macro_rules! bytes_reader {
    ($($(#[$doc:meta])* $name:ident => $method:ident -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(b: &[u8]) -> Result<($ty, &[u8]), Error> {
                let mut dc = Decoder::new(b);
                let value = dc.$method()?;
                Ok((value, dc.remaining()))
            }
        )*
    };
}

bytes_reader! {
    /// Reads a nil and returns the rest of `b`.
    read_nil_bytes => read_nil -> ();
    read_bool_bytes => read_bool -> bool;
    read_int_bytes => read_int -> i64;
    read_uint_bytes => read_uint -> u64;
    read_f64_bytes => read_f64 -> f64;
    /// Reads a string borrowed from `b` and returns the rest of `b`.
    read_str_bytes => read_str -> &str;
    read_bin_bytes => read_bin -> &[u8];
    read_map_key_bytes => read_map_key -> &[u8];
    read_array_header_bytes => read_array_header -> u32;
    read_map_header_bytes => read_map_header -> u32;
    read_value_bytes => read_value -> Value;
}
