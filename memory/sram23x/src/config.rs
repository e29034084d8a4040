use core::num::NonZeroU16;

/// The default upper bound on the number of payload bytes carried by a single bus transaction.
pub const DEFAULT_MAX_CHUNK_SIZE: NonZeroU16 = match NonZeroU16::new(128) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The maximum number of payload bytes per bus transaction.
    ///
    /// Longer reads and writes are split into multiple transactions,
    /// so that the shared bus is released at least this often.
    pub max_chunk_size: NonZeroU16,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }

    pub const fn with_max_chunk_size(mut self, max_chunk_size: NonZeroU16) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
