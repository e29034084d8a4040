use embedded_hal_async::spi::{self, Operation};

use crate::{
    chunk::Chunk,
    config::Config,
    opcode::Opcode,
    sequencer::{Sequencer, State},
    status::{Mode, StatusRegister},
    DriverError, PartNumber,
};

/// The page size used when the chip operates in page mode.
pub const PAGE_SIZE: usize = 32;

/// Status register access is not part of a read or write, so there is no address or progress to report.
const STATUS_TRANSPORT_ERROR: DriverError = DriverError::Transport {
    address: 0,
    completed: 0,
};

enum Payload<'a> {
    Read(&'a mut [u8]),
    Write(&'a [u8]),
}

impl Payload<'_> {
    fn len(&self) -> usize {
        match self {
            Payload::Read(buffer) => buffer.len(),
            Payload::Write(buffer) => buffer.len(),
        }
    }
}

/// Driver for the 23x256 and 23x640 serial SRAMs.
///
/// The operating mode of the chip is cached, so that it is only checked before the first multi byte transfer.
/// The cache assumes that the chip stays powered while the driver exists.
/// Call [`Driver::forget_mode`] after the chip may have been power cycled.
pub struct Driver<Spi>
where
    Spi: spi::SpiDevice,
{
    spi: Spi,
    part_number: PartNumber,
    config: Config,
    /// The last known operating mode of the chip.
    mode: Option<Mode>,
    sequencer: Sequencer,
}

impl<Spi> Driver<Spi>
where
    Spi: spi::SpiDevice,
{
    pub const fn new(spi: Spi, part_number: PartNumber) -> Self {
        Self::with_config(spi, part_number, Config::new())
    }

    pub const fn with_config(spi: Spi, part_number: PartNumber, config: Config) -> Self {
        Self {
            spi,
            part_number,
            config,
            mode: None,
            sequencer: Sequencer::new(),
        }
    }

    #[cfg(feature = "embedded-io")]
    pub const fn to_stateful(self) -> crate::StatefulDriver<Spi> {
        crate::StatefulDriver {
            driver: self,
            position: 0,
        }
    }

    /// Release the spi device.
    pub fn release(self) -> Spi {
        self.spi
    }

    pub const fn part_number(&self) -> PartNumber {
        self.part_number
    }

    /// Get the SRAM capacity in bytes
    pub const fn capacity(&self) -> u16 {
        self.part_number.capacity()
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get the progress state of the current read or write.
    pub const fn state(&self) -> State {
        self.sequencer.state()
    }

    /// Forget the cached operating mode, e.g. because the chip was power cycled.
    /// The mode is read back from the chip before the next multi byte transfer.
    pub fn forget_mode(&mut self) {
        self.mode = None;
    }

    /// Read a sequence of bytes from the SRAM.
    ///
    /// The read is split into transactions of at most `max_chunk_size` bytes,
    /// releasing the spi bus between each of them.
    /// Returns the number of bytes read, which is always the length of `buffer`.
    pub async fn read(&mut self, origin: u16, buffer: &mut [u8]) -> Result<usize, DriverError> {
        self.execute(origin, Payload::Read(buffer)).await
    }

    /// Write a sequence of bytes to the SRAM.
    ///
    /// The write is split into transactions of at most `max_chunk_size` bytes,
    /// releasing the spi bus between each of them.
    /// If a transaction fails, the bytes written by earlier transactions remain written,
    /// and their count is reported in the error.
    pub async fn write(&mut self, origin: u16, buffer: &[u8]) -> Result<usize, DriverError> {
        self.execute(origin, Payload::Write(buffer)).await
    }

    pub async fn read_status(&mut self) -> Result<StatusRegister, DriverError> {
        self.read_status_register()
            .await
            .map_err(|_| STATUS_TRANSPORT_ERROR)
    }

    pub async fn write_status(&mut self, sr: StatusRegister) -> Result<(), DriverError> {
        self.write_status_register(sr)
            .await
            .map_err(|_| STATUS_TRANSPORT_ERROR)
    }

    /// Read the operating mode from the chip.
    /// `None` is returned if the mode bits hold the reserved value.
    pub async fn mode(&mut self) -> Result<Option<Mode>, DriverError> {
        let sr = self.read_status().await?;
        Ok(sr.mode())
    }

    /// Change the operating mode while keeping the remaining status register bits.
    pub async fn set_mode(&mut self, mode: Mode) -> Result<StatusRegister, DriverError> {
        self.switch_mode(mode)
            .await
            .map_err(|_| STATUS_TRANSPORT_ERROR)
    }

    async fn execute(&mut self, origin: u16, mut payload: Payload<'_>) -> Result<usize, DriverError> {
        let capacity = self.capacity();
        self.sequencer
            .begin(capacity, origin, payload.len(), self.config.max_chunk_size)?;

        while let Some(chunk) = self.sequencer.next_chunk() {
            if self.transfer_chunk(chunk, &mut payload).await.is_err() {
                warn!(
                    "Transaction of {} bytes at address {} failed",
                    chunk.len,
                    chunk.address
                );
                self.sequencer.fail();
                break;
            }

            self.sequencer.complete();
        }

        self.sequencer.finish()
    }

    async fn transfer_chunk(
        &mut self,
        chunk: Chunk,
        payload: &mut Payload<'_>,
    ) -> Result<(), Spi::Error> {
        // Single bytes can be transferred in any mode.
        if chunk.len > 1 && self.mode != Some(Mode::Sequential) {
            self.ensure_mode(Mode::Sequential).await?;
        }

        trace!("Transferring {} bytes at address {}", chunk.len, chunk.address);
        self.sequencer.issued();

        match payload {
            Payload::Read(buffer) => {
                let header = Opcode::READ.header(chunk.address);
                self.spi
                    .transaction(&mut [
                        Operation::Write(&header),
                        Operation::Read(&mut buffer[chunk.range()]),
                    ])
                    .await
            }
            Payload::Write(buffer) => {
                let header = Opcode::WRITE.header(chunk.address);
                self.spi
                    .transaction(&mut [
                        Operation::Write(&header),
                        Operation::Write(&buffer[chunk.range()]),
                    ])
                    .await
            }
        }
    }

    async fn ensure_mode(&mut self, mode: Mode) -> Result<(), Spi::Error> {
        let sr = self.read_status_register().await?;
        if sr.mode() != Some(mode) {
            self.write_status_register(sr.with_mode(mode)).await?;
            debug!("Switched to {:?} mode", mode);
        }
        Ok(())
    }

    async fn switch_mode(&mut self, mode: Mode) -> Result<StatusRegister, Spi::Error> {
        let sr = self.read_status_register().await?.with_mode(mode);
        self.write_status_register(sr).await?;
        Ok(sr)
    }

    async fn read_status_register(&mut self) -> Result<StatusRegister, Spi::Error> {
        const TX: [u8; 2] = [Opcode::RDSR.as_u8(), 0x00];
        let mut rx: [u8; 2] = [0x00, 0x00];

        match self.spi.transfer(&mut rx, &TX).await {
            Ok(()) => {
                let sr = StatusRegister::from_bits(rx[1]);
                self.mode = sr.mode();
                Ok(sr)
            }
            Err(e) => {
                self.mode = None;
                Err(e)
            }
        }
    }

    async fn write_status_register(&mut self, sr: StatusRegister) -> Result<(), Spi::Error> {
        let tx = [Opcode::WRSR.as_u8(), sr.bits()];

        match self.spi.write(&tx).await {
            Ok(()) => {
                self.mode = sr.mode();
                Ok(())
            }
            Err(e) => {
                self.mode = None;
                Err(e)
            }
        }
    }
}
