use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, Nrf24};
use crate::{radio::prelude::RadioDataRate, types::RadioError, DataRate};

impl<SPI, DO, DELAY> RadioDataRate for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DataRateError = RadioError<SPI::Error, DO::Error>;

    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<bool, Self::DataRateError> {
        let setup = self.read_register(registers::RF_SETUP)?;
        let out = setup & !DataRate::MASK | data_rate.into_bits();
        self.write_register(registers::RF_SETUP, out)?;
        // Read-back verification. A non-plus part silently refuses the
        // 250 Kbps bit; init() leans on that to identify the variant.
        Ok(self.read_register(registers::RF_SETUP)? == out)
    }

    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateError> {
        let setup = self.read_register(registers::RF_SETUP)?;
        Ok(DataRate::from_bits(setup & DataRate::MASK))
    }
}
