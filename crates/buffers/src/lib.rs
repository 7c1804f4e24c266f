//! Byte-level I/O primitives shared by the msgp codec.
//!
//! - [`Reader`] walks an immutable byte slice with a cursor.
//! - [`Writer`] appends big-endian values to a growable buffer.
//! - [`StreamReader`] buffers an [`std::io::Read`] source and offers
//!   guaranteed-size peek and consume operations.

mod reader;
mod stream_reader;
mod writer;

pub use reader::Reader;
pub use stream_reader::StreamReader;
pub use writer::Writer;

use thiserror::Error;

/// Errors raised by the buffer primitives.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The slice or stream ended before the requested number of bytes.
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    /// Returns `true` for [`BufferError::EndOfBuffer`].
    pub fn is_eof(&self) -> bool {
        matches!(self, BufferError::EndOfBuffer)
    }
}
