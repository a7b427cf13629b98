use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

pub(crate) mod bit_fields;
mod constants;
use bit_fields::{Config, Feature};
pub use constants::{commands, mnemonics, registers};
pub(crate) use constants::timing;
mod ack;
mod channel;
mod crc_length;
mod data_rate;
mod fifo;
mod init;
mod mode;
mod pa_level;
mod payload;
mod pipe;
mod power;
mod rx;
mod status;
mod tx;

use crate::types::{RadioError, StatusFlags};

/// Maximum payload the chip can carry in one frame.
pub const MAX_PAYLOAD_LEN: u8 = 32;

/// Driver context for one nRF24L01(+) transceiver.
///
/// All chip state (registers, CE/CSN lines, both FIFOs) is owned by this one
/// object; every other layer of the crate mutates the chip exclusively through
/// it. The CSN line belongs to the [`SpiDevice`] implementation, which asserts
/// it for exactly one command/response exchange at a time.
pub struct Nrf24<SPI, DO, DELAY> {
    spi: SPI,
    ce_pin: DO,
    delay: DELAY,
    /// Scratch for one SPI transaction: opcode + up to 32 payload bytes.
    buf: [u8; 33],
    /// STATUS byte captured from the last transaction.
    status: StatusFlags,
    config_reg: Config,
    feature: Feature,
    /// Pipe 0's receive address, kept so entering RX mode can undo the
    /// overwrite that opening a TX pipe performs.
    pipe0_rx_addr: Option<[u8; 5]>,
    payload_length: u8,
    hardware_failed: bool,
}

impl<SPI, DO, DELAY> Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Create a driver for the radio wired to the given `spi` bus and
    /// `ce_pin`. The CSN pin is the [`SpiDevice`]'s chip-select.
    ///
    /// Nothing is sent to the chip until [`init()`](crate::radio::prelude::RadioInit::init).
    pub fn new(spi: SPI, ce_pin: DO, delay: DELAY) -> Nrf24<SPI, DO, DELAY> {
        Nrf24 {
            spi,
            ce_pin,
            delay,
            buf: [0; 33],
            status: StatusFlags::from_bits(0),
            config_reg: Config::default(),
            feature: Feature::default(),
            pipe0_rx_addr: None,
            payload_length: MAX_PAYLOAD_LEN,
            hardware_failed: false,
        }
    }

    /// Drive the CE line.
    fn ce(&mut self, level: bool) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        if level {
            self.ce_pin.set_high()
        } else {
            self.ce_pin.set_low()
        }
        .map_err(RadioError::Gpo)
    }

    /// One scoped bus transaction over the first `len` bytes of `buf`.
    /// The chip clocks its STATUS byte back first; it is cached here.
    fn exchange(&mut self, len: usize) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.spi
            .transfer_in_place(&mut self.buf[..len])
            .map_err(RadioError::Spi)?;
        self.status = StatusFlags::from_bits(self.buf[0]);
        Ok(())
    }

    /// Issue a bare command, keeping only the returned STATUS byte.
    fn command(&mut self, opcode: u8) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = opcode;
        self.exchange(1)
    }

    /// Read one register byte. Also serves single-byte read commands, since
    /// the read-register opcode is the bare register address.
    fn read_register(&mut self, reg: u8) -> Result<u8, RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = reg;
        self.buf[1] = 0;
        self.exchange(2)?;
        Ok(self.buf[1])
    }

    /// Read a multi-byte register into `data`.
    fn read_register_buf(
        &mut self,
        reg: u8,
        data: &mut [u8],
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = reg;
        self.buf[1..=data.len()].fill(0);
        self.exchange(data.len() + 1)?;
        data.copy_from_slice(&self.buf[1..=data.len()]);
        Ok(())
    }

    fn write_register(
        &mut self,
        reg: u8,
        value: u8,
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = commands::W_REGISTER | reg;
        self.buf[1] = value;
        self.exchange(2)
    }

    fn write_register_buf(
        &mut self,
        reg: u8,
        data: &[u8],
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = commands::W_REGISTER | reg;
        self.buf[1..=data.len()].copy_from_slice(data);
        self.exchange(data.len() + 1)
    }

    /// Upload a TX payload. In fixed-length mode the frame is zero-padded up
    /// to the configured payload length so the chip always receives a whole
    /// frame before CE can rise; dynamic mode transfers exactly
    /// `min(len, 32)` bytes.
    fn write_payload(
        &mut self,
        data: &[u8],
        no_ack: bool,
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        let mut data_len = data.len().min(MAX_PAYLOAD_LEN as usize) as u8;
        if !self.feature.dynamic_payloads() {
            data_len = data_len.min(self.payload_length);
        }
        self.buf[0] = if no_ack {
            commands::W_TX_PAYLOAD_NO_ACK
        } else {
            commands::W_TX_PAYLOAD
        };
        self.buf[1..=data_len as usize].copy_from_slice(&data[..data_len as usize]);
        let frame_len = if !self.feature.dynamic_payloads() && data_len < self.payload_length {
            self.buf[data_len as usize + 1..=self.payload_length as usize].fill(0);
            self.payload_length
        } else {
            data_len
        };
        self.exchange(frame_len as usize + 1)
    }

    /// Fetch the head RX payload. In fixed-length mode the whole frame is
    /// clocked out (blanks included) so the FIFO entry is fully consumed;
    /// only `len` bytes land in `data`.
    fn read_payload(
        &mut self,
        data: &mut [u8],
        len: u8,
    ) -> Result<u8, RadioError<SPI::Error, DO::Error>> {
        let mut data_len = (data.len().min(MAX_PAYLOAD_LEN as usize) as u8).min(len);
        let frame_len = if self.feature.dynamic_payloads() {
            data_len
        } else {
            data_len = data_len.min(self.payload_length);
            self.payload_length
        };
        self.buf[0] = commands::R_RX_PAYLOAD;
        self.buf[1..=frame_len as usize].fill(0);
        self.exchange(frame_len as usize + 1)?;
        data[..data_len as usize].copy_from_slice(&self.buf[1..=data_len as usize]);
        Ok(data_len)
    }

    /// ACTIVATE command unlocking FEATURE/DYNPD writes on non-plus parts.
    /// Plus variants ignore it.
    fn toggle_features(&mut self) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = commands::ACTIVATE;
        self.buf[1] = commands::ACTIVATE_MAGIC;
        self.exchange(2)
    }

    /// Was the richer (plus) feature set detected?
    ///
    /// Only meaningful after [`init()`](crate::radio::prelude::RadioInit::init).
    pub fn is_plus_variant(&self) -> bool {
        self.feature.plus_variant()
    }

    /// Received-power / carrier detect bit.
    pub fn carrier_detected(&mut self) -> Result<bool, RadioError<SPI::Error, DO::Error>> {
        Ok(self.read_register(registers::RPD)? & 1 == 1)
    }

    /// Read back the address a receive pipe currently matches on.
    ///
    /// For pipes 2-5 the upper bytes are fetched from pipe 1, mirroring how
    /// the chip assembles those addresses. Pipes above 5 leave `address`
    /// untouched.
    pub fn rx_address(
        &mut self,
        pipe: u8,
        address: &mut [u8; 5],
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        if pipe > 5 {
            return Ok(());
        }
        let width = self.feature.address_width() as usize;
        if pipe < 2 {
            self.read_register_buf(registers::RX_ADDR_P0 + pipe, &mut address[..width])?;
        } else {
            self.read_register_buf(registers::RX_ADDR_P0 + 1, &mut address[..width])?;
            address[0] = self.read_register(registers::RX_ADDR_P0 + pipe)?;
        }
        Ok(())
    }

    /// Retry counter of the most recent transmission attempt.
    pub fn last_retry_count(&mut self) -> Result<u8, RadioError<SPI::Error, DO::Error>> {
        Ok(self.read_register(registers::OBSERVE_TX)? & 0xF)
    }

    /// Sticky indicator set when a transmission saw neither a data-sent nor a
    /// max-retries event inside the hardware failure window. Points at a
    /// wedged or disconnected radio.
    pub fn hardware_failed(&self) -> bool {
        self.hardware_failed
    }

    /// Clear the sticky failure indicator after the caller has handled it.
    pub fn reset_hardware_failure(&mut self) {
        self.hardware_failed = false;
    }
}
