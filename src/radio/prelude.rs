//! Traits describing the radio's capability surface, one concern per trait.
//!
//! Import them wholesale when working with a driver instance:
//!
//! ```
//! use nrf24_link::radio::prelude::*;
//! ```

use crate::types::{CrcLength, DataRate, FifoState, PaLevel, StatusFlags};

use super::RadioConfig;

/// Bring-up and bulk reconfiguration.
pub trait RadioInit {
    type InitError;

    /// Run the power-on sequence: settle delays, retry defaults, the
    /// hardware-variant probe, CRC/channel defaults, FIFO flushes, power-up.
    ///
    /// The radio is left powered in transmit-standby (not listening).
    /// Fails when the chip does not answer the probe's read-back checks,
    /// i.e. no (or an incompatible) radio is present.
    fn init(&mut self) -> Result<(), Self::InitError>;

    /// Apply a whole [`RadioConfig`] in one pass.
    ///
    /// Handy when switching between network profiles at runtime; [`init()`]
    /// must have run once before.
    ///
    /// [`init()`]: RadioInit::init
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::InitError>;
}

/// Power state transitions. Mode changes out of power-down must pass
/// through standby, which [`RadioPower::power_up`] guarantees by waiting
/// out the chip's settle time.
pub trait RadioPower {
    type PowerError;

    /// Enter power-down. Configuration persists in the chip's registers.
    fn power_down(&mut self) -> Result<(), Self::PowerError>;

    /// Leave power-down and wait the mandatory settle delay (no-op when
    /// already powered).
    fn power_up(&mut self) -> Result<(), Self::PowerError>;

    /// Cached power state.
    fn is_powered(&self) -> bool;
}

/// The listen/transmit mode machine.
pub trait RadioMode {
    type ModeError;

    /// Enter active RX mode.
    ///
    /// Restores the cached pipe-0 address (see
    /// [`RadioPipes::open_rx_pipe`]), discards stale ack payloads from the
    /// TX FIFO when that feature is on, and raises CE.
    fn start_listening(&mut self) -> Result<(), Self::ModeError>;

    /// Drop back to standby so payloads can be transmitted.
    ///
    /// Lowers CE, waits the mode-settle delay and re-enables pipe 0 for
    /// receiving acknowledgements.
    fn stop_listening(&mut self) -> Result<(), Self::ModeError>;

    /// Is the radio configured for RX mode?
    fn is_listening(&self) -> bool;
}

/// Receive-pipe and transmit-address bookkeeping.
pub trait RadioPipes {
    type PipeError;

    /// Open `pipe` (0-5) for receiving on `address`.
    ///
    /// Pipes 0 and 1 take the full configured address width; pipes 2-5
    /// store a single distinct byte and borrow the rest from pipe 1. The
    /// pipe's payload width is set from the configured payload length.
    ///
    /// Pipe 0 doubles as the acknowledgement mirror for transmissions, so
    /// its address is cached here and restored by
    /// [`RadioMode::start_listening`] after any transmit cycle.
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeError>;

    /// Set the transmit address, mirroring it into pipe 0 so automatic
    /// acknowledgements can be received.
    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeError>;

    /// Stop receiving on `pipe`. Only the enable bit is touched.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeError>;

    /// Set the address width used by all pipes, clamped to 3-5 bytes.
    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeError>;

    /// Currently configured address width (cached).
    fn address_width(&self) -> u8;
}

/// RF channel selection.
pub trait RadioChannel {
    type ChannelError;

    /// Select the channel (offset in MHz from 2400). Clamped to 0-125.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelError>;

    fn get_channel(&mut self) -> Result<u8, Self::ChannelError>;
}

/// Over-the-air data rate.
pub trait RadioDataRate {
    type DataRateError;

    /// Set the data rate and report whether the chip accepted it.
    ///
    /// This is the one setter that verifies its write by reading the
    /// register back: non-plus variants silently reject 250 Kbps, which is
    /// how [`RadioInit::init`] tells the two variants apart, and a missing
    /// radio fails the read-back entirely.
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<bool, Self::DataRateError>;

    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateError>;
}

/// Frame checksum configuration.
pub trait RadioCrc {
    type CrcError;

    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcError>;

    /// Effective CRC mode. Any pipe with auto-ack enabled forces the
    /// checksum on, and the reported value reflects that.
    fn get_crc_length(&mut self) -> Result<CrcLength, Self::CrcError>;
}

/// Transmit power amplifier level.
pub trait RadioPaLevel {
    type PaLevelError;

    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelError>;

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelError>;
}

/// Payload sizing, fixed and dynamic.
pub trait RadioPayload {
    type PayloadError;

    /// Set the fixed payload length (clamped to 1-32) used when dynamic
    /// payloads are off. Applied to every pipe.
    fn set_payload_length(&mut self, length: u8) -> Result<(), Self::PayloadError>;

    /// Cached fixed payload length.
    fn payload_length(&self) -> u8;

    /// Switch per-frame dynamic payload lengths on or off (all pipes).
    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::PayloadError>;

    /// Cached dynamic-payloads flag.
    fn dynamic_payloads(&self) -> bool;

    /// Length of the head payload in the RX FIFO.
    ///
    /// A reported length above 32 is corrupted framing: the RX FIFO is
    /// flushed and 0 is returned.
    fn dynamic_payload_length(&mut self) -> Result<u8, Self::PayloadError>;
}

/// Automatic acknowledgement, retries, and ack payloads.
pub trait RadioAck {
    type AckError;

    /// Auto-ack for all pipes at once.
    fn set_auto_ack(&mut self, enable: bool) -> Result<(), Self::AckError>;

    /// Auto-ack for one pipe. Broadcast-style pipes want this off.
    fn set_auto_ack_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::AckError>;

    /// Retry delay (multiples of 250 us above 250 us) and retry budget,
    /// both clamped to 0-15.
    fn set_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::AckError>;

    /// Allow application data to piggyback on acknowledgement frames.
    /// Implies dynamic payloads on the acknowledging pipes.
    fn set_ack_payloads(&mut self, enable: bool) -> Result<(), Self::AckError>;

    /// Cached ack-payloads flag.
    fn ack_payloads(&self) -> bool;

    /// Permit the per-payload no-ack request used for broadcasts.
    fn allow_no_ack(&mut self, enable: bool) -> Result<(), Self::AckError>;

    /// Queue up to 32 bytes to ride on the next acknowledgement sent from
    /// `pipe`. Returns false when the feature is off, the pipe is invalid,
    /// or the TX FIFO has no room.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::AckError>;

    /// Whether an acknowledgement-carried payload is waiting.
    ///
    /// Quirk preserved from long-deployed firmware: the check negates the
    /// whole FIFO status byte rather than its RX-empty bit, so this only
    /// reports true while both FIFOs are occupied but neither is full.
    /// Prefer [`RadioRx::available`] for a plain RX check.
    fn ack_payload_available(&mut self) -> Result<bool, Self::AckError>;
}

/// FIFO inspection and disposal.
pub trait RadioFifo {
    type FifoError;

    fn flush_rx(&mut self) -> Result<(), Self::FifoError>;

    fn flush_tx(&mut self) -> Result<(), Self::FifoError>;

    /// Occupancy of the TX (`about_tx`) or RX FIFO.
    fn fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoError>;

    /// Is the RX FIFO out of room?
    fn rx_fifo_full(&mut self) -> Result<bool, Self::FifoError>;
}

/// STATUS byte bookkeeping.
pub trait RadioStatus {
    type StatusError;

    /// Refresh the cached STATUS byte with a NOP exchange.
    fn update(&mut self) -> Result<(), Self::StatusError>;

    /// STATUS flags captured during the most recent transaction.
    fn flags(&self) -> StatusFlags;

    /// Clear the asserted members of `flags` in the STATUS register.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusError>;

    /// Atomically read and clear all three IRQ events, reporting which had
    /// fired. This is the chip's only flag-clearing primitive and always
    /// clears the three together; clearing a subset could drop an event.
    fn what_happened(&mut self) -> Result<StatusFlags, Self::StatusError>;
}

/// Transmission engine.
///
/// All variants are built on the same primitive: frame the payload with the
/// acknowledged or no-ack write command, then raise CE. A payload write
/// followed by CE high cannot produce a partial frame; the full frame
/// (padding included) is clocked into the chip before CE rises.
pub trait RadioTx {
    type TxError;

    /// Transmit one payload, blocking until the chip reports data-sent or
    /// max-retries.
    ///
    /// Returns false on max-retries (the one queued payload is flushed) and
    /// on hardware failure: when neither event arrives within 75 ms the
    /// radio is considered wedged and the sticky failure indicator is set.
    fn send(&mut self, buf: &[u8], no_ack: bool) -> Result<bool, Self::TxError>;

    /// Queue one payload without waiting for the outcome, for caller-paced
    /// streaming.
    ///
    /// Blocks only while the TX FIFO is full. If max-retries is already
    /// flagged while waiting, the flag is cleared and false is returned so
    /// the caller decides whether to retransmit (the payload stays queued).
    fn send_fast(&mut self, buf: &[u8], no_ack: bool) -> Result<bool, Self::TxError>;

    /// Queue one payload, retransmitting on max-retries instead of giving
    /// up, bounded by `timeout_ms` (plus the hardware failure margin).
    fn send_blocking(&mut self, buf: &[u8], timeout_ms: u32) -> Result<bool, Self::TxError>;

    /// Wait for the TX FIFO to drain, then drop to standby.
    ///
    /// A max-retries event while draining is a hard failure: the FIFO is
    /// flushed and false returned.
    fn tx_standby(&mut self) -> Result<bool, Self::TxError>;

    /// Like [`tx_standby`](RadioTx::tx_standby), but a max-retries event
    /// re-triggers transmission of the stuck payload until `timeout_ms`
    /// expires.
    fn tx_standby_timeout(&mut self, timeout_ms: u32) -> Result<bool, Self::TxError>;

    /// The bare primitive: upload the frame and raise CE. No completion
    /// tracking; pair with [`RadioStatus::what_happened`] or
    /// [`tx_standby`](RadioTx::tx_standby).
    fn start_fast_write(&mut self, buf: &[u8], no_ack: bool) -> Result<(), Self::TxError>;

    /// Re-arm transmission of the payload still sitting in the TX FIFO
    /// after a max-retries event.
    fn reuse_tx(&mut self) -> Result<(), Self::TxError>;
}

/// Receive path.
pub trait RadioRx {
    type RxError;

    /// Is a payload waiting in the RX FIFO?
    fn available(&mut self) -> Result<bool, Self::RxError>;

    /// Like [`available`](RadioRx::available), additionally storing the
    /// pipe number the head payload arrived on. `pipe` is untouched when
    /// nothing is waiting.
    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::RxError>;

    /// Read up to `len` bytes of the head RX payload into `buf` and clear
    /// the IRQ events. Returns the number of bytes stored.
    fn read(&mut self, buf: &mut [u8], len: u8) -> Result<u8, Self::RxError>;
}
