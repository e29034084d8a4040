use bitfield::bitfield;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

bitfield! {
    /// The status register, holding the operating mode and the HOLD pin configuration.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct StatusRegister(u8);
    impl Debug;
    /// Operating mode
    mode_bits, set_mode_bits: 7, 6;
    /// Reserved
    reserved, _: 5, 1;
    /// Disable the HOLD pin function
    pub hold_disabled, set_hold_disabled: 0;
}

/// The addressing mode used by the chip to auto-increment its address pointer within a single transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Read and write operations are limited to one byte.
    Byte = 0b00,
    /// The entire array can be read or written, the address pointer wraps at the end of the array.
    Sequential = 0b01,
    /// Read and write operations are limited to the addressed page, the address pointer wraps at the page boundary.
    Page = 0b10,
}

impl StatusRegister {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Get the operating mode, or `None` if the mode bits hold the reserved value.
    pub fn mode(&self) -> Option<Mode> {
        Mode::from_u8(self.mode_bits())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.set_mode_bits(mode as u8);
    }

    /// Get a copy of the register where only the mode bits are replaced.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.set_mode(mode);
        self
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusRegister {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StatusRegister({=u8:#x})", self.0)
    }
}
