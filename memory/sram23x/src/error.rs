#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The requested range exceeds the memory capacity. Nothing was sent to the chip.
    AddressRange,
    /// The requested length does not fit the 16 bit size word. Nothing was sent to the chip.
    InvalidLength,
    /// A bus transaction failed.
    Transport {
        /// The chip address targeted by the failing transaction (zero for status register access).
        address: u16,
        /// The number of bytes already transferred to or from the chip before the failure.
        completed: usize,
    },
}

impl DriverError {
    /// Get the number of bytes that were transferred before the error occurred.
    pub const fn completed(&self) -> usize {
        match self {
            DriverError::Transport { completed, .. } => *completed,
            DriverError::AddressRange | DriverError::InvalidLength => 0,
        }
    }
}
