//! Buffered reader with guaranteed-size peek and consume.

use std::io::{self, Read};

use crate::BufferError;

/// A buffered reader over any [`Read`] source.
///
/// Unlike [`std::io::BufReader`], [`StreamReader::peek`] and
/// [`StreamReader::next`] guarantee that exactly `n` bytes are returned,
/// refilling (and growing) the internal buffer as needed. The buffer only
/// grows as data actually arrives, so a bogus size read from the input cannot
/// force a large allocation up front.
pub struct StreamReader<R> {
    inner: R,
    buf: Vec<u8>,
    /// Read position inside `buf`.
    x: usize,
    /// End of valid data inside `buf`.
    end: usize,
}

impl<R: Read> StreamReader<R> {
    pub const DEFAULT_CAPACITY: usize = 4096;
    const MIN_CAPACITY: usize = 16;

    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(Self::MIN_CAPACITY)],
            x: 0,
            end: 0,
        }
    }

    /// Number of bytes available without touching the source.
    pub fn buffered(&self) -> usize {
        self.end - self.x
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns the source. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns `n` bytes if they are already buffered; never reads the source.
    pub fn peek_buffered(&self, n: usize) -> Option<&[u8]> {
        if self.buffered() >= n {
            Some(&self.buf[self.x..self.x + n])
        } else {
            None
        }
    }

    /// Returns the next `n` bytes without consuming them.
    pub fn peek(&mut self, n: usize) -> Result<&[u8], BufferError> {
        self.fill(n)?;
        Ok(&self.buf[self.x..self.x + n])
    }

    /// Consumes and returns the next `n` bytes.
    pub fn next(&mut self, n: usize) -> Result<&[u8], BufferError> {
        self.fill(n)?;
        let start = self.x;
        self.x += n;
        Ok(&self.buf[start..start + n])
    }

    /// Consumes `n` bytes without retaining them.
    pub fn skip(&mut self, mut n: usize) -> Result<(), BufferError> {
        loop {
            let take = n.min(self.buffered());
            self.x += take;
            n -= take;
            if n == 0 {
                return Ok(());
            }
            self.x = 0;
            self.end = 0;
            self.read_some()?;
        }
    }

    /// Fills `dst` completely, draining the buffer first and then reading the
    /// source directly.
    pub fn read_full(&mut self, dst: &mut [u8]) -> Result<(), BufferError> {
        let take = dst.len().min(self.buffered());
        dst[..take].copy_from_slice(&self.buf[self.x..self.x + take]);
        self.x += take;
        if take == dst.len() {
            return Ok(());
        }
        self.inner.read_exact(&mut dst[take..]).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                BufferError::EndOfBuffer
            } else {
                BufferError::Io(e)
            }
        })
    }

    /// Ensures at least `n` bytes are buffered.
    fn fill(&mut self, n: usize) -> Result<(), BufferError> {
        if self.buffered() >= n {
            return Ok(());
        }
        if self.x > 0 {
            self.buf.copy_within(self.x..self.end, 0);
            self.end -= self.x;
            self.x = 0;
        }
        while self.end < n {
            if self.end == self.buf.len() {
                let grown = (self.buf.len() * 2).min(n);
                self.buf.resize(grown, 0);
            }
            self.read_some()?;
        }
        Ok(())
    }

    /// Reads once into the free tail of the buffer.
    fn read_some(&mut self) -> Result<(), BufferError> {
        loop {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => return Err(BufferError::EndOfBuffer),
                Ok(read) => {
                    self.end += read;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BufferError::Io(e)),
            }
        }
    }
}
