use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, Nrf24};
use crate::{radio::prelude::RadioChannel, types::RadioError};

impl<SPI, DO, DELAY> RadioChannel for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ChannelError = RadioError<SPI::Error, DO::Error>;

    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelError> {
        self.write_register(registers::RF_CH, channel.min(125))
    }

    fn get_channel(&mut self) -> Result<u8, Self::ChannelError> {
        self.read_register(registers::RF_CH)
    }
}
