//! Error type shared by every msgp operation.

use msgp_buffers::BufferError;
use thiserror::Error;

use crate::constants::WireType;

/// Errors returned by encoding, decoding and navigation.
///
/// Registry configuration mistakes are not represented here: they panic at
/// registration time.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ended inside a value, or a header declared more bytes or
    /// elements than remain.
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid marker byte 0x{0:02x}")]
    InvalidMarker(u8),
    #[error("type mismatch: expected {expected}, found marker 0x{found:02x}")]
    TypeMismatch { expected: WireType, found: u8 },
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// An integer does not fit the requested Rust type.
    #[error("integer overflow")]
    IntOverflow,
    /// A string, binary, extension or container is longer than a 32-bit
    /// length field can describe.
    #[error("length {0} does not fit a MessagePack header")]
    LengthOverflow(usize),
    #[error("value nesting exceeds {0} levels")]
    DepthLimitExceeded(usize),
    #[error("unknown type id {0}")]
    UnknownTypeId(u16),
    #[error("unregistered type {0}")]
    UnregisteredType(&'static str),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for [`Error::UnexpectedEof`].
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof)
    }
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => Error::UnexpectedEof,
            BufferError::InvalidUtf8 => Error::InvalidUtf8,
            BufferError::Io(e) => Error::Io(e),
        }
    }
}
