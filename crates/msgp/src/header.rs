//! Header size table.
//!
//! Given the first bytes of an encoded value, [`size_of`] reports how many
//! bytes belong to the value itself (marker, length fields and inline payload)
//! and how many child values follow it. Containers report only their header
//! bytes; their elements are counted as children.

use crate::constants::marker::*;
use crate::Error;

/// The longest prefix [`size_of`] ever needs: a marker plus a 32-bit length.
pub const MAX_PREFIX_LEN: usize = 5;

/// Result of [`size_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Bytes owned by this value, excluding any children.
    pub bytes: usize,
    /// Number of child values that follow. Maps count keys and values.
    pub objects: u64,
}

impl Size {
    const fn scalar(bytes: usize) -> Size {
        Size { bytes, objects: 0 }
    }
}

/// Number of prefix bytes [`size_of`] needs to read for a value whose first
/// byte is `lead`.
pub fn prefix_len(lead: u8) -> usize {
    match lead {
        BIN8 | EXT8 | STR8 => 2,
        BIN16 | EXT16 | STR16 | ARRAY16 | MAP16 => 3,
        BIN32 | EXT32 | STR32 | ARRAY32 | MAP32 => 5,
        _ => 1,
    }
}

/// Decodes the size of the value starting at `p[0]`.
///
/// `p` must hold at least [`prefix_len`]`(p[0])` bytes; extra bytes are
/// ignored.
pub fn size_of(p: &[u8]) -> Result<Size, Error> {
    let lead = *p.first().ok_or(Error::UnexpectedEof)?;
    if p.len() < prefix_len(lead) {
        return Err(Error::UnexpectedEof);
    }
    let len8 = || p[1] as u64;
    let len16 = || u16::from_be_bytes([p[1], p[2]]) as u64;
    let len32 = || u32::from_be_bytes([p[1], p[2], p[3], p[4]]) as u64;

    let (bytes, objects): (u64, u64) = match lead {
        0x00..=0x7f | 0xe0..=0xff | NIL | FALSE | TRUE => (1, 0),
        0x80..=0x8f => (1, 2 * (lead & 0x0f) as u64),
        0x90..=0x9f => (1, (lead & 0x0f) as u64),
        0xa0..=0xbf => (1 + (lead & 0x1f) as u64, 0),
        NEVER_USED => return Err(Error::InvalidMarker(lead)),
        BIN8 => (2 + len8(), 0),
        BIN16 => (3 + len16(), 0),
        BIN32 => (5 + len32(), 0),
        EXT8 => (3 + len8(), 0),
        EXT16 => (4 + len16(), 0),
        EXT32 => (6 + len32(), 0),
        FLOAT32 => return Ok(Size::scalar(5)),
        FLOAT64 => return Ok(Size::scalar(9)),
        UINT8 | INT8 => return Ok(Size::scalar(2)),
        UINT16 | INT16 => return Ok(Size::scalar(3)),
        UINT32 | INT32 => return Ok(Size::scalar(5)),
        UINT64 | INT64 => return Ok(Size::scalar(9)),
        FIXEXT1 => return Ok(Size::scalar(3)),
        FIXEXT2 => return Ok(Size::scalar(4)),
        FIXEXT4 => return Ok(Size::scalar(6)),
        FIXEXT8 => return Ok(Size::scalar(10)),
        FIXEXT16 => return Ok(Size::scalar(18)),
        STR8 => (2 + len8(), 0),
        STR16 => (3 + len16(), 0),
        STR32 => (5 + len32(), 0),
        ARRAY16 => (3, len16()),
        ARRAY32 => (5, len32()),
        MAP16 => (3, 2 * len16()),
        MAP32 => (5, 2 * len32()),
    };
    let bytes = usize::try_from(bytes).map_err(|_| Error::IntOverflow)?;
    Ok(Size { bytes, objects })
}
