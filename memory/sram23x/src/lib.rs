#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

mod chunk;
mod config;
mod driver;
#[cfg(feature = "embedded-io")]
mod embeddedio;
mod error;
#[cfg(test)]
mod fake;
mod opcode;
mod sequencer;
mod status;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PartNumber {
    Sram23k256,
    Sram23a256,
    Sram23k640,
    Sram23a640,
}

impl PartNumber {
    /// Get the SRAM capacity in bytes
    pub const fn capacity(&self) -> u16 {
        match self {
            PartNumber::Sram23k256 => 32768,
            PartNumber::Sram23a256 => 32768,
            PartNumber::Sram23k640 => 8192,
            PartNumber::Sram23a640 => 8192,
        }
    }
}

pub use chunk::{plan, Chunk, Chunks};
pub use config::{Config, DEFAULT_MAX_CHUNK_SIZE};
pub use driver::{Driver, PAGE_SIZE};
#[cfg(feature = "embedded-io")]
pub use embeddedio::StatefulDriver;
pub use error::DriverError;
pub use opcode::Opcode;
pub use sequencer::{Sequencer, State};
pub use status::{Mode, StatusRegister};
