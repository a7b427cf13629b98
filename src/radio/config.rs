use crate::radio::nrf24::bit_fields::SetupRetry;
use crate::{CrcLength, DataRate, PaLevel};

/// Addresses and enable bits for the six receive pipes plus the transmit
/// address.
///
/// Pipes 2-5 physically store one distinct byte each and borrow the
/// remaining address bytes from pipe 1; this table mirrors that.
#[derive(Debug, Clone, Copy)]
pub struct PipeTable {
    pub(super) tx_address: [u8; 5],
    pipe0: [u8; 5],
    pipe1: [u8; 5],
    /// Distinct low byte for pipes 2-5.
    lsb: [u8; 4],
    pub(super) enabled: u8,
}

impl Default for PipeTable {
    fn default() -> Self {
        Self {
            tx_address: [0xE7; 5],
            pipe0: [0xE7; 5],
            pipe1: [0xC2; 5],
            lsb: [0xC3, 0xC4, 0xC5, 0xC6],
            enabled: 1 << 1,
        }
    }
}

impl PipeTable {
    pub fn set_tx_address(&mut self, address: &[u8]) {
        let len = address.len().min(5);
        self.tx_address[..len].copy_from_slice(&address[..len]);
    }

    /// Store an address for `pipe` and mark it enabled.
    /// Does nothing for pipes above 5 or an empty address.
    pub fn set_rx_address(&mut self, pipe: u8, address: &[u8]) {
        let len = address.len().min(5);
        if len == 0 || pipe > 5 {
            return;
        }
        self.enabled |= 1 << pipe;
        match pipe {
            0 => self.pipe0[..len].copy_from_slice(&address[..len]),
            1 => self.pipe1[..len].copy_from_slice(&address[..len]),
            _ => self.lsb[pipe as usize - 2] = address[0],
        }
    }

    pub fn close_rx_pipe(&mut self, pipe: u8) {
        if pipe <= 5 {
            self.enabled &= !(1 << pipe);
        }
    }

    pub fn is_enabled(&self, pipe: u8) -> bool {
        pipe <= 5 && self.enabled & (1 << pipe) != 0
    }

    /// Reconstruct the full address `pipe` matches on, pipe-1 borrowing
    /// included.
    pub(super) fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        let len = address.len().min(5);
        match pipe {
            0 => address[..len].copy_from_slice(&self.pipe0[..len]),
            1 => address[..len].copy_from_slice(&self.pipe1[..len]),
            2..=5 => {
                address[..len].copy_from_slice(&self.pipe1[..len]);
                address[0] = self.lsb[pipe as usize - 2];
            }
            _ => (),
        }
    }
}

/// A full radio configuration, applied in one pass with
/// [`RadioInit::with_config()`](crate::radio::prelude::RadioInit::with_config).
///
/// Builder-style: start from [`RadioConfig::default`] and chain `with_*`
/// calls. Inputs are clamped into their valid ranges here, before anything
/// reaches the hardware.
///
/// Defaults: channel 76, 5-byte addresses, 1 Mbps, max PA, 16-bit CRC,
/// 32-byte fixed payloads, auto-ack on every pipe, retries (5, 15), dynamic
/// payloads / ack payloads / per-payload no-ack all off, pipe 1 open on
/// `[0xC2; 5]`.
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    channel: u8,
    address_width: u8,
    payload_length: u8,
    data_rate: DataRate,
    pa_level: PaLevel,
    crc_length: CrcLength,
    pub(super) retries: SetupRetry,
    auto_ack: u8,
    dynamic_payloads: bool,
    ack_payloads: bool,
    no_ack_allowed: bool,
    pipes: PipeTable,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            channel: 76,
            address_width: 5,
            payload_length: 32,
            data_rate: DataRate::Mbps1,
            pa_level: PaLevel::Max,
            crc_length: CrcLength::Bit16,
            retries: SetupRetry::default(),
            auto_ack: 0x3F,
            dynamic_payloads: false,
            ack_payloads: false,
            no_ack_allowed: false,
            pipes: PipeTable::default(),
        }
    }
}

impl RadioConfig {
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Clamped to 0-125.
    pub fn with_channel(self, channel: u8) -> Self {
        Self {
            channel: channel.min(125),
            ..self
        }
    }

    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// Clamped to 3-5 bytes.
    pub fn with_address_width(self, width: u8) -> Self {
        Self {
            address_width: width.clamp(3, 5),
            ..self
        }
    }

    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// Fixed payload length, clamped to 1-32. Moot while dynamic payloads
    /// are enabled.
    pub fn with_payload_length(self, length: u8) -> Self {
        Self {
            payload_length: length.clamp(1, 32),
            ..self
        }
    }

    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self { data_rate, ..self }
    }

    pub const fn pa_level(&self) -> PaLevel {
        self.pa_level
    }

    pub fn with_pa_level(self, pa_level: PaLevel) -> Self {
        Self { pa_level, ..self }
    }

    pub const fn crc_length(&self) -> CrcLength {
        self.crc_length
    }

    pub fn with_crc_length(self, crc_length: CrcLength) -> Self {
        Self { crc_length, ..self }
    }

    pub const fn retry_delay(&self) -> u8 {
        self.retries.ard()
    }

    pub const fn retry_count(&self) -> u8 {
        self.retries.arc()
    }

    /// Delay and count both clamped to 0-15.
    pub fn with_retries(self, delay: u8, count: u8) -> Self {
        Self {
            retries: self.retries.with_ard(delay.min(15)).with_arc(count.min(15)),
            ..self
        }
    }

    /// Per-pipe auto-ack bits (bit n controls pipe n).
    pub const fn auto_ack(&self) -> u8 {
        self.auto_ack
    }

    /// Pipe 0 should stay enabled whenever any other pipe is, since pipe 0
    /// transmits the acknowledgements.
    pub fn with_auto_ack(self, mask: u8) -> Self {
        Self {
            auto_ack: mask & 0x3F,
            ..self
        }
    }

    pub const fn dynamic_payloads(&self) -> bool {
        self.dynamic_payloads
    }

    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        Self {
            dynamic_payloads: enable,
            // ack payloads require dynamic payloads
            ack_payloads: self.ack_payloads && enable,
            ..self
        }
    }

    pub const fn ack_payloads(&self) -> bool {
        self.ack_payloads
    }

    pub fn with_ack_payloads(self, enable: bool) -> Self {
        Self {
            ack_payloads: enable,
            dynamic_payloads: self.dynamic_payloads || enable,
            ..self
        }
    }

    pub const fn no_ack_allowed(&self) -> bool {
        self.no_ack_allowed
    }

    /// Permit the per-payload no-ack request (broadcast sends need it).
    pub fn with_no_ack_allowed(self, enable: bool) -> Self {
        Self {
            no_ack_allowed: enable,
            ..self
        }
    }

    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        self.pipes.is_enabled(pipe)
    }

    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        pipes.set_rx_address(pipe, address);
        Self { pipes, ..self }
    }

    pub fn close_rx_pipe(self, pipe: u8) -> Self {
        let mut pipes = self.pipes;
        pipes.close_rx_pipe(pipe);
        Self { pipes, ..self }
    }

    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        self.pipes.rx_address(pipe, address);
    }

    pub fn with_tx_address(self, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        pipes.set_tx_address(address);
        Self { pipes, ..self }
    }

    pub fn tx_address(&self, address: &mut [u8]) {
        let len = address.len().min(5);
        address[..len].copy_from_slice(&self.pipes.tx_address[..len]);
    }

    /// The FEATURE register image for this configuration.
    pub(super) fn feature_bits(&self) -> u8 {
        use crate::radio::nrf24::mnemonics;
        (self.dynamic_payloads as u8 * mnemonics::EN_DPL)
            | (self.ack_payloads as u8 * mnemonics::EN_ACK_PAY)
            | (self.no_ack_allowed as u8 * mnemonics::EN_DYN_ACK)
    }
}
