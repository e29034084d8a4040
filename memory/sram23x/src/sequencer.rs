use core::num::NonZeroU16;

use crate::{
    chunk::{self, Chunk, Chunks},
    DriverError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No operation in progress.
    Idle,
    /// The operation is being split into chunks.
    Planning,
    /// A chunk is about to be sent.
    Issuing,
    /// A chunk has been handed to the bus and the transaction is awaited.
    Waiting,
    /// All chunks were transferred.
    Complete,
    /// A chunk failed and the remaining chunks were abandoned.
    Failed,
}

/// Progress of a single read or write through its chunks.
#[derive(Debug)]
pub struct Sequencer {
    state: State,
    chunks: Option<Chunks>,
    current: Option<Chunk>,
    completed: usize,
}

impl Sequencer {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            chunks: None,
            current: None,
            completed: 0,
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    /// Plan a new operation.
    /// Any earlier operation that was abandoned half way is forgotten.
    pub fn begin(
        &mut self,
        capacity: u16,
        address: u16,
        length: usize,
        max_chunk_size: NonZeroU16,
    ) -> Result<(), DriverError> {
        self.state = State::Planning;
        self.current = None;
        self.completed = 0;

        match chunk::plan(capacity, address, length, max_chunk_size) {
            Ok(chunks) => {
                self.chunks = Some(chunks);
                Ok(())
            }
            Err(e) => {
                self.chunks = None;
                self.state = State::Idle;
                Err(e)
            }
        }
    }

    /// Get the next chunk to send, or `None` when every chunk has been transferred.
    pub fn next_chunk(&mut self) -> Option<Chunk> {
        debug_assert!(matches!(self.state, State::Planning | State::Issuing));

        match self.chunks.as_mut().and_then(|chunks| chunks.next()) {
            Some(chunk) => {
                self.current = Some(chunk);
                self.state = State::Issuing;
                Some(chunk)
            }
            None => {
                self.chunks = None;
                self.state = State::Complete;
                None
            }
        }
    }

    /// The current chunk is being transferred.
    pub fn issued(&mut self) {
        debug_assert_eq!(State::Issuing, self.state);
        self.state = State::Waiting;
    }

    /// The current chunk was transferred.
    pub fn complete(&mut self) {
        debug_assert_eq!(State::Waiting, self.state);
        if let Some(chunk) = self.current.take() {
            self.completed += chunk.len;
        }
        self.state = State::Issuing;
    }

    /// The current chunk could not be transferred.
    pub fn fail(&mut self) {
        self.chunks = None;
        self.state = State::Failed;
    }

    /// End the operation and get the number of transferred bytes.
    pub fn finish(&mut self) -> Result<usize, DriverError> {
        let result = match self.state {
            State::Failed => Err(DriverError::Transport {
                address: self.current.map(|chunk| chunk.address).unwrap_or_default(),
                completed: self.completed,
            }),
            _ => {
                debug_assert_eq!(State::Complete, self.state);
                Ok(self.completed)
            }
        };

        self.state = State::Idle;
        self.current = None;
        result
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPACITY: u16 = 32768;

    fn size(value: u16) -> NonZeroU16 {
        NonZeroU16::new(value).unwrap()
    }

    #[test]
    fn walks_through_all_chunks() {
        // Given
        let mut sequencer = Sequencer::new();
        assert_eq!(State::Idle, sequencer.state());

        // When
        sequencer.begin(CAPACITY, 0x10, 300, size(128)).unwrap();
        assert_eq!(State::Planning, sequencer.state());

        let mut addresses = vec![];
        while let Some(chunk) = sequencer.next_chunk() {
            assert_eq!(State::Issuing, sequencer.state());
            sequencer.issued();
            assert_eq!(State::Waiting, sequencer.state());
            sequencer.complete();
            addresses.push(chunk.address);
        }

        // Then
        assert_eq!(State::Complete, sequencer.state());
        assert_eq!(vec![0x10, 0x90, 0x110], addresses);
        assert_eq!(Ok(300), sequencer.finish());
        assert_eq!(State::Idle, sequencer.state());
    }

    #[test]
    fn failure_reports_progress() {
        // Given
        let mut sequencer = Sequencer::new();
        sequencer.begin(CAPACITY, 0x10, 300, size(128)).unwrap();

        let _first = sequencer.next_chunk().unwrap();
        sequencer.issued();
        sequencer.complete();

        let second = sequencer.next_chunk().unwrap();
        sequencer.issued();

        // When
        sequencer.fail();

        // Then
        assert_eq!(State::Failed, sequencer.state());
        assert_eq!(
            Err(DriverError::Transport {
                address: second.address,
                completed: 128
            }),
            sequencer.finish()
        );
        assert_eq!(State::Idle, sequencer.state());
    }

    #[test]
    fn rejected_plan_stays_idle() {
        // Given
        let mut sequencer = Sequencer::new();

        // When
        let result = sequencer.begin(CAPACITY, CAPACITY - 1, 2, size(128));

        // Then
        assert_eq!(Err(DriverError::AddressRange), result);
        assert_eq!(State::Idle, sequencer.state());
    }

    #[test]
    fn empty_operation_completes_immediately() {
        let mut sequencer = Sequencer::new();
        sequencer.begin(CAPACITY, 0, 0, size(128)).unwrap();

        assert_eq!(None, sequencer.next_chunk());
        assert_eq!(Ok(0), sequencer.finish());
    }

    #[test]
    fn begin_forgets_abandoned_operation() {
        // Given
        let mut sequencer = Sequencer::new();
        sequencer.begin(CAPACITY, 0, 300, size(128)).unwrap();
        sequencer.next_chunk().unwrap();
        sequencer.issued();

        // When
        sequencer.begin(CAPACITY, 0x20, 4, size(128)).unwrap();

        // Then
        let chunk = sequencer.next_chunk().unwrap();
        assert_eq!(0x20, chunk.address);
        sequencer.issued();
        sequencer.complete();
        assert_eq!(None, sequencer.next_chunk());
        assert_eq!(Ok(4), sequencer.finish());
    }
}
