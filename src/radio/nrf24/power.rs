use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, timing, Nrf24};
use crate::{radio::prelude::RadioPower, types::RadioError};

impl<SPI, DO, DELAY> RadioPower for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PowerError = RadioError<SPI::Error, DO::Error>;

    fn power_down(&mut self) -> Result<(), Self::PowerError> {
        // CE must be low before the power bit drops
        self.ce(false)?;
        self.config_reg = self.config_reg.with_power(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }

    fn power_up(&mut self) -> Result<(), Self::PowerError> {
        if self.config_reg.power() {
            return Ok(());
        }
        self.config_reg = self.config_reg.with_power(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;

        // Power-down to standby passes through a mandatory settle period
        // (Tpd2stby, up to 5 ms) before CE may rise.
        self.delay.delay_us(timing::POWER_SETTLE_US);
        Ok(())
    }

    fn is_powered(&self) -> bool {
        self.config_reg.power()
    }
}
