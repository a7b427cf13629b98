use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, timing, Nrf24};
use crate::{
    radio::prelude::{RadioFifo, RadioMode, RadioPipes, RadioPower, RadioStatus},
    types::{RadioError, StatusFlags},
};

impl<SPI, DO, DELAY> RadioMode for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ModeError = RadioError<SPI::Error, DO::Error>;

    fn start_listening(&mut self) -> Result<(), Self::ModeError> {
        self.power_up()?;
        self.config_reg = self.config_reg.with_prim_rx(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;

        // Opening a TX pipe repurposes pipe 0 as the ack mirror; bring back
        // the receive address that was cached for it, or keep it closed.
        if let Some(address) = self.pipe0_rx_addr {
            let width = self.feature.address_width() as usize;
            self.write_register_buf(registers::RX_ADDR_P0, &address[..width])?;
        } else {
            self.close_rx_pipe(0)?;
        }

        // Stale ack payloads queued for peers that are no longer talking to
        // us would leak into the next transmit cycle.
        if self.feature.ack_payloads() {
            self.flush_tx()?;
        }

        self.ce(true)
    }

    fn stop_listening(&mut self) -> Result<(), Self::ModeError> {
        self.ce(false)?;
        self.delay.delay_us(timing::MODE_SETTLE_US);

        if self.feature.ack_payloads() {
            self.flush_tx()?;
        }

        self.config_reg = self.config_reg.with_prim_rx(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;

        // pipe 0 must be listening for acknowledgements of the next send
        let enabled = self.read_register(registers::EN_RXADDR)?;
        self.write_register(registers::EN_RXADDR, enabled | 1)
    }

    fn is_listening(&self) -> bool {
        self.config_reg.prim_rx()
    }
}
