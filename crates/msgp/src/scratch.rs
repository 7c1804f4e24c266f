//! Pool of reusable byte buffers for staging envelope payloads.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::Config;

/// A bounded pool of byte buffers.
///
/// Buffers come out empty and go back empty, so no bytes from one use are
/// observable in the next.
pub struct ScratchPool {
    free: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
    retain_limit: usize,
    max_pooled: usize,
}

impl ScratchPool {
    pub fn new(config: &Config) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity: config.scratch_capacity,
            retain_limit: config.scratch_retain_limit,
            max_pooled: config.scratch_pool_size,
        }
    }

    /// Takes a buffer from the pool, allocating if none is idle.
    pub fn acquire(&self) -> Scratch<'_> {
        let mut buf = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.capacity));
        buf.clear();
        Scratch { pool: self, buf }
    }

    /// Number of idle buffers.
    pub fn pooled(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        if buf.capacity() > self.retain_limit {
            return;
        }
        let mut free = self.free.lock();
        if free.len() < self.max_pooled {
            free.push(buf);
        }
    }
}

/// A buffer borrowed from a [`ScratchPool`]; returned on drop.
pub struct Scratch<'p> {
    pool: &'p ScratchPool,
    buf: Vec<u8>,
}

impl Scratch<'_> {
    /// Moves the buffer out, leaving an empty one in its place.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Puts a buffer back after [`Scratch::take`].
    pub fn restore(&mut self, buf: Vec<u8>) {
        self.buf = buf;
    }
}

impl Deref for Scratch<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}
