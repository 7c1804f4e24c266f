//! Runtime tuning knobs.

/// Buffer sizes used by a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Initial buffer capacity of readers built by
    /// [`Context::reader`](crate::Context::reader).
    pub stream_buffer_size: usize,
    /// Capacity of freshly allocated scratch buffers.
    pub scratch_capacity: usize,
    /// Scratch buffers that grew beyond this many bytes are dropped instead
    /// of returned to the pool.
    pub scratch_retain_limit: usize,
    /// Maximum number of idle scratch buffers kept.
    pub scratch_pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stream_buffer_size: 4096,
            scratch_capacity: 512,
            scratch_retain_limit: 64 * 1024,
            scratch_pool_size: 64,
        }
    }
}

impl Config {
    pub fn with_stream_buffer_size(mut self, size: usize) -> Self {
        self.stream_buffer_size = size;
        self
    }

    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    pub fn with_scratch_retain_limit(mut self, limit: usize) -> Self {
        self.scratch_retain_limit = limit;
        self
    }

    pub fn with_scratch_pool_size(mut self, size: usize) -> Self {
        self.scratch_pool_size = size;
        self
    }
}
