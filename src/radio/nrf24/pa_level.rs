use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, Nrf24};
use crate::{radio::prelude::RadioPaLevel, types::RadioError, PaLevel};

impl<SPI, DO, DELAY> RadioPaLevel for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PaLevelError = RadioError<SPI::Error, DO::Error>;

    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelError> {
        let setup = self.read_register(registers::RF_SETUP)?;
        // keep the LNA bit asserted alongside the level
        let out = setup & !0b111 | pa_level.into_bits() | 1;
        self.write_register(registers::RF_SETUP, out)
    }

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelError> {
        let setup = self.read_register(registers::RF_SETUP)?;
        Ok(PaLevel::from_bits(setup & 0b110))
    }
}
