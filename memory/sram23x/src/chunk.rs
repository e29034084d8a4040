use core::{num::NonZeroU16, ops::Range};

use crate::DriverError;

/// A part of a read or write that is sent as a single bus transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Chunk {
    /// The chip address of the first byte.
    pub address: u16,
    /// The position of the first byte in the caller buffer.
    pub offset: usize,
    pub len: usize,
}

impl Chunk {
    /// The range of the chunk within the caller buffer.
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// The ordered chunks of a single read or write.
#[derive(Clone, Debug)]
pub struct Chunks {
    address: u16,
    offset: usize,
    remaining: usize,
    max_len: usize,
}

/// Split `length` bytes starting at `address` into chunks of at most `max_chunk_size` bytes.
///
/// The range is validated against `capacity` up front, so an error means that nothing may be sent.
pub fn plan(
    capacity: u16,
    address: u16,
    length: usize,
    max_chunk_size: NonZeroU16,
) -> Result<Chunks, DriverError> {
    if length > u16::MAX as usize {
        return Err(DriverError::InvalidLength);
    }
    if address as usize + length > capacity as usize {
        return Err(DriverError::AddressRange);
    }

    Ok(Chunks {
        address,
        offset: 0,
        remaining: length,
        max_len: max_chunk_size.get() as usize,
    })
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let len = usize::min(self.remaining, self.max_len);
        let chunk = Chunk {
            address: self.address,
            offset: self.offset,
            len,
        };

        // The planned range ends at or below the capacity, so this never overflows.
        self.address += len as u16;
        self.offset += len;
        self.remaining -= len;

        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.div_ceil(self.max_len);
        (count, Some(count))
    }
}

impl ExactSizeIterator for Chunks {}
