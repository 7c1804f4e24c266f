//! Wire markers, wire types and size-estimate constants.

use std::fmt;

/// One-byte MessagePack markers.
pub mod marker {
    pub const NIL: u8 = 0xc0;
    pub const NEVER_USED: u8 = 0xc1;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const BIN8: u8 = 0xc4;
    pub const BIN16: u8 = 0xc5;
    pub const BIN32: u8 = 0xc6;
    pub const EXT8: u8 = 0xc7;
    pub const EXT16: u8 = 0xc8;
    pub const EXT32: u8 = 0xc9;
    pub const FLOAT32: u8 = 0xca;
    pub const FLOAT64: u8 = 0xcb;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    pub const INT8: u8 = 0xd0;
    pub const INT16: u8 = 0xd1;
    pub const INT32: u8 = 0xd2;
    pub const INT64: u8 = 0xd3;
    pub const FIXEXT1: u8 = 0xd4;
    pub const FIXEXT2: u8 = 0xd5;
    pub const FIXEXT4: u8 = 0xd6;
    pub const FIXEXT8: u8 = 0xd7;
    pub const FIXEXT16: u8 = 0xd8;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;

    pub const FIXMAP: u8 = 0x80;
    pub const FIXARRAY: u8 = 0x90;
    pub const FIXSTR: u8 = 0xa0;
}

/// Upper bound of a string header (marker + 32-bit length).
pub const STR_PREFIX_SIZE: usize = 5;
/// Upper bound of a binary header (marker + 32-bit length).
pub const BIN_PREFIX_SIZE: usize = 5;
pub const ARRAY_HEADER_SIZE: usize = 5;
pub const MAP_HEADER_SIZE: usize = 5;
pub const NIL_SIZE: usize = 1;
pub const BOOL_SIZE: usize = 1;
pub const INT_SIZE: usize = 9;
pub const UINT_SIZE: usize = 9;
pub const F32_SIZE: usize = 5;
pub const F64_SIZE: usize = 9;

/// The family a lead byte belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Nil,
    Bool,
    Int,
    Uint,
    F32,
    F64,
    Str,
    Bin,
    Array,
    Map,
    Ext,
    Invalid,
}

impl WireType {
    /// Classifies a lead byte.
    pub fn of(lead: u8) -> WireType {
        use marker::*;
        match lead {
            0x00..=0x7f => WireType::Int,
            0x80..=0x8f => WireType::Map,
            0x90..=0x9f => WireType::Array,
            0xa0..=0xbf => WireType::Str,
            0xe0..=0xff => WireType::Int,
            NIL => WireType::Nil,
            FALSE | TRUE => WireType::Bool,
            BIN8 | BIN16 | BIN32 => WireType::Bin,
            EXT8 | EXT16 | EXT32 | FIXEXT1 | FIXEXT2 | FIXEXT4 | FIXEXT8 | FIXEXT16 => {
                WireType::Ext
            }
            FLOAT32 => WireType::F32,
            FLOAT64 => WireType::F64,
            UINT8 | UINT16 | UINT32 | UINT64 => WireType::Uint,
            INT8 | INT16 | INT32 | INT64 => WireType::Int,
            STR8 | STR16 | STR32 => WireType::Str,
            ARRAY16 | ARRAY32 => WireType::Array,
            MAP16 | MAP32 => WireType::Map,
            _ => WireType::Invalid,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WireType::Nil => "nil",
            WireType::Bool => "bool",
            WireType::Int => "int",
            WireType::Uint => "uint",
            WireType::F32 => "float32",
            WireType::F64 => "float64",
            WireType::Str => "str",
            WireType::Bin => "bin",
            WireType::Array => "array",
            WireType::Map => "map",
            WireType::Ext => "ext",
            WireType::Invalid => "invalid",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
