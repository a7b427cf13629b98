use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{bit_fields::Config, registers, Nrf24};
use crate::{radio::prelude::RadioCrc, types::RadioError, CrcLength};

impl<SPI, DO, DELAY> RadioCrc for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type CrcError = RadioError<SPI::Error, DO::Error>;

    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcError> {
        let config = self.read_register(registers::CONFIG)?;
        self.config_reg = Config::from_bits(config).with_crc_length(crc_length);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }

    fn get_crc_length(&mut self) -> Result<CrcLength, Self::CrcError> {
        let config = self.read_register(registers::CONFIG)?;
        // auto-ack forces the checksum on, whatever CONFIG claims
        let auto_ack = self.read_register(registers::EN_AA)?;
        if config & Config::CRC_MASK == 0 && auto_ack == 0 {
            return Ok(CrcLength::Disabled);
        }
        if config & 0b100 != 0 {
            Ok(CrcLength::Bit16)
        } else {
            Ok(CrcLength::Bit8)
        }
    }
}
