pub const HEADER_LEN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Opcode {
    /// Read data from memory array beginning at selected address
    READ,
    /// Write data to memory array beginning at selected address
    WRITE,
    /// Read status register
    RDSR,
    /// Write status register
    WRSR,
}

impl Opcode {
    pub const fn as_u8(self) -> u8 {
        match self {
            Opcode::READ => 0x03,
            Opcode::WRITE => 0x02,
            Opcode::RDSR => 0x05,
            Opcode::WRSR => 0x01,
        }
    }

    /// Get the instruction followed by the 16 bit address, most significant byte first.
    pub const fn header(self, address: u16) -> [u8; HEADER_LEN] {
        let [hi, lo] = address.to_be_bytes();
        [self.as_u8(), hi, lo]
    }
}
