//! A behavioral model of the chip, used to verify what the driver leaves in memory.

use embedded_hal_async::spi::{ErrorType, Operation, SpiDevice};
use embedded_hal_async_mocks::spi::SpiError;

use crate::{opcode::Opcode, PAGE_SIZE};

pub struct FakeSram {
    pub memory: Vec<u8>,
    pub status: u8,
    /// The bytes sent in each transaction.
    pub sent: Vec<Vec<u8>>,
    /// Fail the n'th transaction (one based) without affecting the memory.
    pub fail_transaction: Option<usize>,
    /// The number of data bytes clocked beyond the first while in byte mode.
    pub byte_mode_overruns: usize,
}

#[derive(Default)]
struct Session {
    index: usize,
    opcode: u8,
    address: u16,
}

impl FakeSram {
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: vec![0; capacity],
            status: 0x00,
            sent: Vec::new(),
            fail_transaction: None,
            byte_mode_overruns: 0,
        }
    }

    pub fn transactions(&self) -> usize {
        self.sent.len()
    }

    fn clock(&mut self, session: &mut Session, mosi: u8) -> u8 {
        if let Some(sent) = self.sent.last_mut() {
            sent.push(mosi);
        }

        let index = session.index;
        session.index += 1;

        if index == 0 {
            session.opcode = mosi;
            return 0;
        }

        const READ: u8 = Opcode::READ.as_u8();
        const WRITE: u8 = Opcode::WRITE.as_u8();
        const RDSR: u8 = Opcode::RDSR.as_u8();
        const WRSR: u8 = Opcode::WRSR.as_u8();

        match (session.opcode, index) {
            (RDSR, _) => self.status,
            (WRSR, 1) => {
                self.status = mosi;
                0
            }
            (READ | WRITE, 1) => {
                session.address = (mosi as u16) << 8;
                0
            }
            (READ | WRITE, 2) => {
                session.address |= mosi as u16;
                0
            }
            (READ, _) => {
                let address = self.data_address(session.address, index - 3);
                self.memory[address]
            }
            (WRITE, _) => {
                let address = self.data_address(session.address, index - 3);
                self.memory[address] = mosi;
                0
            }
            _ => 0,
        }
    }

    fn data_address(&mut self, start: u16, n: usize) -> usize {
        let capacity = self.memory.len();
        let start = start as usize % capacity;
        match self.status >> 6 {
            0b00 => {
                if n > 0 {
                    self.byte_mode_overruns += 1;
                }
                start
            }
            0b10 => {
                let page = start - start % PAGE_SIZE;
                page + (start + n) % PAGE_SIZE
            }
            _ => (start + n) % capacity,
        }
    }
}

impl ErrorType for FakeSram {
    type Error = SpiError;
}

impl SpiDevice for FakeSram {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SpiError> {
        self.sent.push(Vec::new());
        if self.fail_transaction == Some(self.sent.len()) {
            return Err(SpiError);
        }

        let mut session = Session::default();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Read(rx) => {
                    for byte in rx.iter_mut() {
                        *byte = self.clock(&mut session, 0x00);
                    }
                }
                Operation::Write(tx) => {
                    for byte in tx.iter() {
                        self.clock(&mut session, *byte);
                    }
                }
                Operation::Transfer(rx, tx) => {
                    for (i, byte) in tx.iter().enumerate() {
                        let miso = self.clock(&mut session, *byte);
                        if let Some(rx) = rx.get_mut(i) {
                            *rx = miso;
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.clock(&mut session, *byte);
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }

        Ok(())
    }
}
