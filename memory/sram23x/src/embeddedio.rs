use embedded_hal_async::spi;
use embedded_io::{Error, ErrorKind, ErrorType, SeekFrom};
use embedded_io_async::{Read, Seek, Write};

use crate::{Driver, DriverError};

impl Error for DriverError {
    fn kind(&self) -> ErrorKind {
        match self {
            DriverError::AddressRange | DriverError::InvalidLength => ErrorKind::InvalidInput,
            DriverError::Transport { .. } => ErrorKind::Other,
        }
    }
}

/// A driver with a cursor, exposing the SRAM as a seekable byte stream.
pub struct StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    pub driver: Driver<Spi>,
    pub(crate) position: u16,
}

impl<Spi> StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    pub const fn position(&self) -> u16 {
        self.position
    }

    fn remaining(&self) -> usize {
        (self.driver.capacity() - self.position) as usize
    }

    /// Move the cursor past the bytes that were transferred, also if the transfer failed half way.
    fn advance(&mut self, result: Result<usize, DriverError>) -> Result<usize, DriverError> {
        let completed = match &result {
            Ok(length) => *length,
            Err(e) => e.completed(),
        };
        self.position += completed as u16;
        result
    }
}

impl<Spi> ErrorType for StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    type Error = DriverError;
}

impl<Spi> Seek for StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    async fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let pos = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).ok(),
            SeekFrom::End(offset) => (self.driver.capacity() as i64).checked_add(offset),
            SeekFrom::Current(offset) => (self.position as i64).checked_add(offset),
        };

        match pos {
            Some(pos) if (0..=self.driver.capacity() as i64).contains(&pos) => {
                self.position = pos as u16;
                Ok(pos as u64)
            }
            _ => Err(DriverError::AddressRange),
        }
    }
}

impl<Spi> Read for StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let length = usize::min(buf.len(), self.remaining());
        let result = self.driver.read(self.position, &mut buf[..length]).await;
        self.advance(result)
    }
}

impl<Spi> Write for StatefulDriver<Spi>
where
    Spi: spi::SpiDevice,
{
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let length = usize::min(buf.len(), self.remaining());
        let result = self.driver.write(self.position, &buf[..length]).await;
        self.advance(result)
    }
}
