use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, mnemonics, registers, timing, Nrf24, MAX_PAYLOAD_LEN};
use crate::{
    radio::prelude::{RadioFifo, RadioPayload},
    types::RadioError,
};

impl<SPI, DO, DELAY> RadioPayload for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PayloadError = RadioError<SPI::Error, DO::Error>;

    fn set_payload_length(&mut self, length: u8) -> Result<(), Self::PayloadError> {
        let length = length.clamp(1, MAX_PAYLOAD_LEN);
        for pipe in 0..6 {
            self.write_register(registers::RX_PW_P0 + pipe, length)?;
        }
        self.payload_length = length;
        Ok(())
    }

    fn payload_length(&self) -> u8 {
        self.payload_length
    }

    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::PayloadError> {
        self.toggle_features()?;
        let feature = self.read_register(registers::FEATURE)?;
        let out = if enable {
            feature | mnemonics::EN_DPL
        } else {
            // ack payloads cannot work without dynamic payloads
            feature & !(mnemonics::EN_DPL | mnemonics::EN_ACK_PAY)
        };
        self.write_register(registers::FEATURE, out)?;
        self.write_register(registers::DYNPD, 0x3F * enable as u8)?;
        self.feature = self.feature.with_dynamic_payloads(enable);
        Ok(())
    }

    fn dynamic_payloads(&self) -> bool {
        self.feature.dynamic_payloads()
    }

    fn dynamic_payload_length(&mut self) -> Result<u8, Self::PayloadError> {
        self.buf[0] = commands::R_RX_PL_WID;
        self.buf[1] = 0;
        self.exchange(2)?;
        let length = self.buf[1];
        if length > MAX_PAYLOAD_LEN {
            // corrupted framing; drop the whole FIFO rather than hand out garbage
            self.flush_rx()?;
            self.delay.delay_us(timing::FLUSH_SETTLE_US);
            return Ok(0);
        }
        Ok(length)
    }
}
