use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, mnemonics, registers, timing, Nrf24};
use crate::{
    radio::prelude::{RadioFifo, RadioStatus, RadioTx},
    types::{RadioError, StatusFlags},
};

impl<SPI, DO, DELAY> RadioTx for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type TxError = RadioError<SPI::Error, DO::Error>;

    fn send(&mut self, buf: &[u8], no_ack: bool) -> Result<bool, Self::TxError> {
        self.start_fast_write(buf, no_ack)?;

        let mut elapsed = 0u32;
        loop {
            self.update()?;
            if self.status.tx_sent() || self.status.max_retries() {
                break;
            }
            if elapsed >= timing::TX_FAILURE_WINDOW_US {
                // neither outcome arrived: the radio is wedged or gone
                self.hardware_failed = true;
                self.ce(false)?;
                return Ok(false);
            }
            self.delay.delay_us(timing::POLL_STEP_US);
            elapsed += timing::POLL_STEP_US;
        }

        self.ce(false)?;
        // one write clears all three events; the pre-clear STATUS byte
        // riding back on it carries the outcome
        self.write_register(registers::STATUS, StatusFlags::IRQ_MASK)?;
        if self.status.max_retries() {
            // only one payload is in flight with this method, discard it
            self.flush_tx()?;
            return Ok(false);
        }
        Ok(true)
    }

    fn send_fast(&mut self, buf: &[u8], no_ack: bool) -> Result<bool, Self::TxError> {
        let mut elapsed = 0u32;
        loop {
            self.update()?;
            if !self.status.tx_full() {
                break;
            }
            if self.status.max_retries() {
                // leave the payload queued; the caller decides whether to
                // retransmit or flush
                self.clear_status_flags(StatusFlags::default().with_max_retries(true))?;
                return Ok(false);
            }
            if elapsed >= timing::TX_FAILURE_WINDOW_US {
                self.hardware_failed = true;
                return Ok(false);
            }
            self.delay.delay_us(timing::POLL_STEP_US);
            elapsed += timing::POLL_STEP_US;
        }
        self.start_fast_write(buf, no_ack)?;
        Ok(true)
    }

    fn send_blocking(&mut self, buf: &[u8], timeout_ms: u32) -> Result<bool, Self::TxError> {
        let budget_us = timeout_ms.saturating_mul(1000);
        let mut elapsed = 0u32;
        loop {
            self.update()?;
            if !self.status.tx_full() {
                break;
            }
            if self.status.max_retries() {
                // keep pushing the stuck payload until the caller's budget
                // runs out
                self.reuse_tx()?;
                if elapsed >= budget_us {
                    return Ok(false);
                }
            }
            if elapsed >= budget_us.saturating_add(timing::TX_FAILURE_WINDOW_US) {
                self.hardware_failed = true;
                return Ok(false);
            }
            self.delay.delay_us(timing::POLL_STEP_US);
            elapsed += timing::POLL_STEP_US;
        }
        self.start_fast_write(buf, false)?;
        Ok(true)
    }

    fn tx_standby(&mut self) -> Result<bool, Self::TxError> {
        let mut elapsed = 0u32;
        loop {
            let fifo = self.read_register(registers::FIFO_STATUS)?;
            if fifo & mnemonics::TX_EMPTY != 0 {
                break;
            }
            // the STATUS byte cached from that read tells us about failures
            if self.status.max_retries() {
                self.clear_status_flags(StatusFlags::default().with_max_retries(true))?;
                self.ce(false)?;
                self.flush_tx()?;
                return Ok(false);
            }
            if elapsed >= timing::TX_FAILURE_WINDOW_US {
                self.hardware_failed = true;
                return Ok(false);
            }
            self.delay.delay_us(timing::POLL_STEP_US);
            elapsed += timing::POLL_STEP_US;
        }
        self.ce(false)?;
        Ok(true)
    }

    fn tx_standby_timeout(&mut self, timeout_ms: u32) -> Result<bool, Self::TxError> {
        let budget_us = timeout_ms.saturating_mul(1000);
        let mut elapsed = 0u32;
        loop {
            let fifo = self.read_register(registers::FIFO_STATUS)?;
            if fifo & mnemonics::TX_EMPTY != 0 {
                break;
            }
            if self.status.max_retries() {
                self.clear_status_flags(StatusFlags::default().with_max_retries(true))?;
                // pulse CE to retransmit the stuck payload
                self.ce(false)?;
                self.ce(true)?;
                if elapsed >= budget_us {
                    self.ce(false)?;
                    self.flush_tx()?;
                    return Ok(false);
                }
            }
            if elapsed >= budget_us.saturating_add(timing::TX_FAILURE_WINDOW_US) {
                self.hardware_failed = true;
                return Ok(false);
            }
            self.delay.delay_us(timing::POLL_STEP_US);
            elapsed += timing::POLL_STEP_US;
        }
        self.ce(false)?;
        Ok(true)
    }

    fn start_fast_write(&mut self, buf: &[u8], no_ack: bool) -> Result<(), Self::TxError> {
        self.write_payload(buf, no_ack)?;
        // the full frame (padding included) is already clocked into the
        // chip, so raising CE cannot start a partial transmission
        self.ce(true)
    }

    fn reuse_tx(&mut self) -> Result<(), Self::TxError> {
        self.clear_status_flags(StatusFlags::default().with_max_retries(true))?;
        self.command(commands::REUSE_TX_PL)?;
        self.ce(false)?;
        self.ce(true)
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, RadioTx};
    use crate::{spi_expects, test::mk_radio};
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::vec;
    use std::vec::Vec;

    /// Expected frame for a fixed-length payload write: command byte, the
    /// data, and zero padding up to the 32-byte payload length.
    fn padded_frame(command: u8, data: &[u8]) -> Vec<u8> {
        let mut frame = vec![0u8; 33];
        frame[0] = command;
        frame[1..=data.len()].copy_from_slice(data);
        frame
    }

    #[test]
    fn start_fast_write_pads_fixed_frames() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
        ];
        let spi_expectations = spi_expects![
            // 2 data bytes padded with 30 blanks
            (padded_frame(commands::W_TX_PAYLOAD, b"hi"), vec![0u8; 33]),
            // no-ack variant uses its own opcode
            (
                padded_frame(commands::W_TX_PAYLOAD_NO_ACK, b"hi"),
                vec![0u8; 33],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.start_fast_write(b"hi", false).unwrap();
        radio.start_fast_write(b"hi", true).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn oversized_payloads_clamp_to_32() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let spi_expectations = spi_expects![
            (padded_frame(commands::W_TX_PAYLOAD, &[0x55; 32]), vec![0u8; 33]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        // 40 bytes offered, 32 transacted
        radio.start_fast_write(&[0x55; 40], false).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn dynamic_frames_use_exact_length() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let mut frame = vec![0u8; 9];
        frame[0] = commands::W_TX_PAYLOAD;
        frame[1..9].copy_from_slice(&[0x55; 8]);
        let spi_expectations = spi_expects![(frame, vec![0u8; 9]),];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.feature = radio.feature.with_dynamic_payloads(true);
        radio.start_fast_write(&[0x55; 8], false).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_success_clears_all_flags() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let spi_expectations = spi_expects![
            (padded_frame(commands::W_TX_PAYLOAD, &[0x55; 8]), vec![0u8; 33]),
            // first poll reports data-sent
            (vec![commands::NOP], vec![0x2Eu8]),
            // all three events cleared in one write
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0x2Eu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.send(&[0x55; 8], false).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_max_retries_flushes_and_fails() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let spi_expectations = spi_expects![
            (padded_frame(commands::W_TX_PAYLOAD, &[0x55; 8]), vec![0u8; 33]),
            // retry budget exhausted
            (vec![commands::NOP], vec![0x1Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0x1Eu8, 0u8],
            ),
            // the dead payload is discarded
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(!radio.send(&[0x55; 8], false).unwrap());
        assert!(!radio.hardware_failed());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_detects_wedged_radio() {
        let ce_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut spi_expectations =
            spi_expects![(padded_frame(commands::W_TX_PAYLOAD, &[0x55; 8]), vec![0u8; 33]),]
                .to_vec();
        // 75 ms of polls at 250 us each, with no event ever arriving
        for _ in 0..301 {
            spi_expectations.extend(spi_expects![(vec![commands::NOP], vec![0xEu8]),]);
        }
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(!radio.send(&[0x55; 8], false).unwrap());
        assert!(radio.hardware_failed());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_fast_queues_when_fifo_has_room() {
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let spi_expectations = spi_expects![
            (vec![commands::NOP], vec![0xEu8]),
            (padded_frame(commands::W_TX_PAYLOAD, &[0x55; 8]), vec![0u8; 33]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.send_fast(&[0x55; 8], false).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_fast_reports_failed_payload() {
        let spi_expectations = spi_expects![
            // FIFO full and retry budget already exhausted
            (vec![commands::NOP], vec![0x1Fu8]),
            // only the max-retries flag is cleared; the payload stays queued
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Fu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(!radio.send_fast(&[0x55; 8], false).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_blocking_retransmits_until_room() {
        let ce_expectations = [
            // reuse_tx() pulses CE
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            // start_fast_write()
            PinTransaction::set(PinState::High),
        ];
        let spi_expectations = spi_expects![
            // FIFO full, retries exhausted
            (vec![commands::NOP], vec![0x1Fu8]),
            // reuse_tx(): clear flag and re-arm the queued payload
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Fu8, 0u8],
            ),
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
            // next poll finds room
            (vec![commands::NOP], vec![0xEu8]),
            (padded_frame(commands::W_TX_PAYLOAD, &[0x55; 8]), vec![0u8; 33]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.send_blocking(&[0x55; 8], 1000).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn send_blocking_honors_caller_timeout() {
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let spi_expectations = spi_expects![
            (vec![commands::NOP], vec![0x1Fu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Fu8, 0u8],
            ),
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        // zero budget: the first max-retries ends the attempt
        assert!(!radio.send_blocking(&[0x55; 8], 0).unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn tx_standby_drains() {
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let spi_expectations = spi_expects![
            // still draining
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0u8]),
            // TX FIFO empty
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x10u8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.tx_standby().unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn tx_standby_gives_up_on_max_retries() {
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let spi_expectations = spi_expects![
            // not empty, and the STATUS byte reports max-retries
            (vec![registers::FIFO_STATUS, 0u8], vec![0x1Eu8, 0u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Eu8, 0u8],
            ),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(!radio.tx_standby().unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn tx_standby_timeout_retries_then_flushes() {
        let ce_expectations = [
            // retransmit pulse
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            // expiry
            PinTransaction::set(PinState::Low),
        ];
        let spi_expectations = spi_expects![
            (vec![registers::FIFO_STATUS, 0u8], vec![0x1Eu8, 0u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Eu8, 0u8],
            ),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        // zero budget: one retransmit pulse, then flush and fail
        assert!(!radio.tx_standby_timeout(0).unwrap());
        spi.done();
        ce_pin.done();
    }
}
