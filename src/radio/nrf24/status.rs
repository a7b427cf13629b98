use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, Nrf24};
use crate::{
    radio::prelude::RadioStatus,
    types::{RadioError, StatusFlags},
};

impl<SPI, DO, DELAY> RadioStatus for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type StatusError = RadioError<SPI::Error, DO::Error>;

    fn update(&mut self) -> Result<(), Self::StatusError> {
        self.command(commands::NOP)
    }

    fn flags(&self) -> StatusFlags {
        self.status
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusError> {
        self.write_register(registers::STATUS, flags.into_bits() & StatusFlags::IRQ_MASK)
    }

    fn what_happened(&mut self) -> Result<StatusFlags, Self::StatusError> {
        // All three events are cleared in the same write; the pre-clear
        // STATUS byte rides back on that very transaction.
        self.write_register(registers::STATUS, StatusFlags::IRQ_MASK)?;
        Ok(self.status)
    }
}
