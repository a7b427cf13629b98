use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, mnemonics, registers, Nrf24};
use crate::{radio::prelude::RadioFifo, types::RadioError, FifoState};

impl<SPI, DO, DELAY> RadioFifo for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoError = RadioError<SPI::Error, DO::Error>;

    fn flush_rx(&mut self) -> Result<(), Self::FifoError> {
        self.command(commands::FLUSH_RX)
    }

    fn flush_tx(&mut self) -> Result<(), Self::FifoError> {
        self.command(commands::FLUSH_TX)
    }

    fn fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoError> {
        let fifo = self.read_register(registers::FIFO_STATUS)?;
        let offset = about_tx as u8 * 4;
        match (fifo >> offset) & 3 {
            1 => Ok(FifoState::Empty),
            2 => Ok(FifoState::Full),
            _ => Ok(FifoState::Occupied),
        }
    }

    fn rx_fifo_full(&mut self) -> Result<bool, Self::FifoError> {
        let fifo = self.read_register(registers::FIFO_STATUS)?;
        Ok(fifo & mnemonics::RX_FULL != 0)
    }
}
