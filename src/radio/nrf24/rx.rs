use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, mnemonics, registers, Nrf24};
use crate::{
    radio::prelude::RadioRx,
    types::{RadioError, StatusFlags},
};

impl<SPI, DO, DELAY> RadioRx for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RxError = RadioError<SPI::Error, DO::Error>;

    fn available(&mut self) -> Result<bool, Self::RxError> {
        let fifo = self.read_register(registers::FIFO_STATUS)?;
        Ok(fifo & mnemonics::RX_EMPTY == 0)
    }

    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::RxError> {
        if self.available()? {
            // the pipe number lives in the STATUS byte
            self.command(commands::NOP)?;
            *pipe = self.status.rx_pipe();
            return Ok(true);
        }
        Ok(false)
    }

    fn read(&mut self, buf: &mut [u8], len: u8) -> Result<u8, Self::RxError> {
        if len == 0 || buf.is_empty() {
            return Ok(0);
        }
        let read = self.read_payload(buf, len)?;
        self.write_register(registers::STATUS, StatusFlags::IRQ_MASK)?;
        Ok(read)
    }
}
