use embedded_hal_async::spi::{self, Operation};
use mockall::{mock, Sequence};

#[derive(Debug, Clone, Copy)]
pub struct SpiError;

impl spi::Error for SpiError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

mock! {
    #[derive(Debug)]
    pub SpiDevice {}

    impl spi::SpiDevice<u8> for SpiDevice {
        async fn transaction<'a>(&mut self, operations: &mut [Operation<'a, u8>]) -> Result<(), SpiError>;
    }

    impl spi::ErrorType for SpiDevice {
        type Error = SpiError;
    }
}

impl MockSpiDevice {
    /// Expect a single transaction consisting of exactly `expected`, ordered by `seq`.
    ///
    /// Writes and transfers are matched on the bytes sent, reads on their length.
    /// The data of expected reads and transfers is copied into the actual buffers.
    pub fn expect_transaction_operations(
        &mut self,
        seq: &mut Sequence,
        expected: &'static [Operation<'static, u8>],
    ) {
        self.expect_transaction()
            .withf(move |transaction| Self::is_match_all(transaction, expected))
            .times(1)
            .in_sequence(seq)
            .returning(move |transaction| {
                for (dest, src) in transaction.iter_mut().zip(expected) {
                    Self::assign(dest, src);
                }
                Ok(())
            });
    }

    /// Expect a single transaction consisting of exactly `expected`, ordered by `seq`, that fails on the bus.
    pub fn expect_failing_transaction(
        &mut self,
        seq: &mut Sequence,
        expected: &'static [Operation<'static, u8>],
    ) {
        self.expect_transaction()
            .withf(move |transaction| Self::is_match_all(transaction, expected))
            .times(1)
            .in_sequence(seq)
            .returning(|_| Err(SpiError));
    }

    fn is_match_all(transaction: &[Operation<'_, u8>], expected: &[Operation<'_, u8>]) -> bool {
        transaction.len() == expected.len()
            && transaction
                .iter()
                .zip(expected)
                .all(|(actual, expected)| Self::is_match(actual, expected))
    }

    fn is_match(x: &Operation<'_, u8>, y: &Operation<'_, u8>) -> bool {
        match (x, y) {
            (Operation::Read(x), Operation::Read(y)) => x.len() == y.len(),
            (Operation::Write(x), Operation::Write(y)) => x == y,
            (Operation::Transfer(_, x), Operation::Transfer(_, y)) => x == y,
            (Operation::TransferInPlace(x), Operation::TransferInPlace(y)) => x.len() == y.len(),
            (Operation::DelayNs(x), Operation::DelayNs(y)) => x == y,
            _ => false,
        }
    }

    fn assign(dest: &mut Operation<'_, u8>, src: &Operation<'_, u8>) {
        match (dest, src) {
            (Operation::Read(dest), Operation::Read(src)) => dest.copy_from_slice(src),
            (Operation::Transfer(dest, _), Operation::Transfer(src, _)) => dest.copy_from_slice(src),
            (Operation::TransferInPlace(dest), Operation::TransferInPlace(src)) => {
                dest.copy_from_slice(src)
            }
            _ => {}
        }
    }
}
