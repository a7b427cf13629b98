use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, Nrf24};
use crate::{radio::prelude::RadioPipes, types::RadioError};

impl<SPI, DO, DELAY> RadioPipes for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PipeError = RadioError<SPI::Error, DO::Error>;

    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeError> {
        if pipe > 5 {
            return Ok(());
        }

        if pipe < 2 {
            let width = address.len().min(self.feature.address_width() as usize);

            // Pipe 0's slot is overwritten by every open_tx_pipe() call, so
            // remember what the caller wanted; start_listening() restores it.
            if pipe == 0 {
                let mut cached = self.pipe0_rx_addr.unwrap_or_default();
                cached[..width].copy_from_slice(&address[..width]);
                self.pipe0_rx_addr = Some(cached);
            }
            self.write_register_buf(registers::RX_ADDR_P0 + pipe, &address[..width])?;
        } else {
            // pipes 2-5 hold one distinct byte; the rest comes from pipe 1
            self.write_register(registers::RX_ADDR_P0 + pipe, address[0])?;
        }

        self.write_register(registers::RX_PW_P0 + pipe, self.payload_length)?;

        let enabled = self.read_register(registers::EN_RXADDR)?;
        self.write_register(registers::EN_RXADDR, enabled | (1 << pipe))
    }

    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeError> {
        let width = address.len().min(self.feature.address_width() as usize);
        self.write_register_buf(registers::TX_ADDR, &address[..width])?;
        // acknowledgements come back addressed to us, on pipe 0
        self.write_register_buf(registers::RX_ADDR_P0, &address[..width])?;
        self.write_register(registers::RX_PW_P0, self.payload_length)
    }

    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeError> {
        if pipe > 5 {
            return Ok(());
        }
        let enabled = self.read_register(registers::EN_RXADDR)?;
        self.write_register(registers::EN_RXADDR, enabled & !(1 << pipe))?;
        if pipe == 0 {
            self.pipe0_rx_addr = None;
        }
        Ok(())
    }

    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeError> {
        let width = width.clamp(3, 5);
        self.write_register(registers::SETUP_AW, width - 2)?;
        self.feature.set_address_width(width);
        Ok(())
    }

    fn address_width(&self) -> u8 {
        self.feature.address_width()
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, RadioPipes};
    use crate::radio::nrf24::commands;
    use crate::{spi_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn open_rx_pipe5_writes_one_byte() {
        let spi_expectations = spi_expects![
            (
                vec![(registers::RX_ADDR_P0 + 5) | commands::W_REGISTER, 0x55u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![(registers::RX_PW_P0 + 5) | commands::W_REGISTER, 32u8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 1u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0x21u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let address = [0x55u8; 5];
        // out-of-range pipe is a no-op
        radio.open_rx_pipe(9, &address).unwrap();
        radio.open_rx_pipe(5, &address).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn open_tx_pipe_mirrors_pipe0() {
        let mut tx_write = [0x55u8; 6];
        tx_write[0] = registers::TX_ADDR | commands::W_REGISTER;
        let mut p0_write = [0x55u8; 6];
        p0_write[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;

        let spi_expectations = spi_expects![
            (tx_write.to_vec(), vec![0xEu8, 0, 0, 0, 0, 0]),
            (p0_write.to_vec(), vec![0xEu8, 0, 0, 0, 0, 0]),
            (
                vec![registers::RX_PW_P0 | commands::W_REGISTER, 32u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let address = [0x55u8; 5];
        radio.open_tx_pipe(&address).unwrap();
        // close_rx_pipe is also a no-op out of range
        radio.close_rx_pipe(9).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn close_rx_pipe0_drops_cache() {
        let mut addr_write = [0x55u8; 6];
        addr_write[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;

        let spi_expectations = spi_expects![
            // open_rx_pipe(0)
            (addr_write.to_vec(), vec![0xEu8, 0, 0, 0, 0, 0]),
            (
                vec![registers::RX_PW_P0 | commands::W_REGISTER, 32u8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 0u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
            // close_rx_pipe(0)
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 1u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.open_rx_pipe(0, &[0x55u8; 5]).unwrap();
        assert!(radio.pipe0_rx_addr.is_some());
        radio.close_rx_pipe(0).unwrap();
        assert!(radio.pipe0_rx_addr.is_none());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn address_width_clamped() {
        let spi_expectations = spi_expects![
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.set_address_width(2).unwrap();
        assert_eq!(radio.address_width(), 3);
        radio.set_address_width(8).unwrap();
        assert_eq!(radio.address_width(), 5);
        radio.set_address_width(4).unwrap();
        assert_eq!(radio.address_width(), 4);
        spi.done();
        ce_pin.done();
    }
}
