//! Hardware-agnostic types shared by the driver and the transport layer.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Errors raised by the driver.
///
/// Protocol-level conditions (max retries exhausted, full FIFO, corrupted
/// dynamic length) are reported through `bool`/length return values instead;
/// an `Err` here always means the bus, a pin, or the chip itself misbehaved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadioError<SPI, DO> {
    /// A SPI bus transaction failed.
    Spi(SPI),
    /// Driving the CE line failed.
    Gpo(DO),
    /// The chip did not answer the probe/read-back sequence as expected.
    /// Usually means no radio (or an unsupported clone) is wired up.
    NotResponding,
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for RadioError<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RadioError::Spi(_) => defmt::write!(fmt, "SPI transaction error"),
            RadioError::Gpo(_) => defmt::write!(fmt, "CE pin error"),
            RadioError::NotResponding => defmt::write!(fmt, "radio not responding"),
        }
    }
}

/// Transmit power level, one of four discrete settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// -18 dBm on a stock nRF24L01.
    Min,
    /// -12 dBm on a stock nRF24L01.
    Low,
    /// -6 dBm on a stock nRF24L01.
    High,
    /// 0 dBm on a stock nRF24L01.
    Max,
}

impl PaLevel {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "Min"),
            PaLevel::Low => defmt::write!(fmt, "Low"),
            PaLevel::High => defmt::write!(fmt, "High"),
            PaLevel::Max => defmt::write!(fmt, "Max"),
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// Over-the-air data rate.
///
/// Only the plus variant supports [`DataRate::Kbps250`]; the driver exploits
/// that to detect the hardware variant at init time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    /// 1 Mbps, the rate every variant supports.
    Mbps1,
    /// 2 Mbps.
    Mbps2,
    /// 250 Kbps (plus variant only).
    Kbps250,
}

impl DataRate {
    /// RF_DR_LOW | RF_DR_HIGH positions in RF_SETUP.
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// CRC checksum mode appended to every frame by the chip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrcLength {
    /// No checksum.
    Disabled,
    /// 8-bit checksum.
    Bit8,
    /// 16-bit checksum.
    Bit16,
}

impl CrcLength {
    /// EN_CRC | CRCO positions in CONFIG.
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 8,
            CrcLength::Bit16 => 12,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => CrcLength::Disabled,
            8 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrcLength::Disabled => defmt::write!(fmt, "disabled"),
            CrcLength::Bit8 => defmt::write!(fmt, "8 bit"),
            CrcLength::Bit16 => defmt::write!(fmt, "16 bit"),
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Disabled => write!(f, "disabled"),
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// Occupancy of one of the chip's 3-level FIFOs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FifoState {
    /// No room for another payload.
    Full,
    /// No payload held.
    Empty,
    /// Neither full nor empty.
    Occupied,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FifoState::Empty => defmt::write!(fmt, "Empty"),
            FifoState::Full => defmt::write!(fmt, "Full"),
            FifoState::Occupied => defmt::write!(fmt, "Occupied"),
        }
    }
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FifoState::Empty => write!(f, "Empty"),
            FifoState::Full => write!(f, "Full"),
            FifoState::Occupied => write!(f, "Occupied"),
        }
    }
}

/// The chip's STATUS byte, clocked back as the first byte of every SPI
/// transaction.
///
/// Use [`StatusFlags::default`] for all-false flags and [`StatusFlags::new`]
/// for all three IRQ events asserted (the usual "clear everything" mask).
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A payload arrived in the RX FIFO.
    #[bits(1, access = RO)]
    pub rx_ready: bool,

    /// A payload left the TX FIFO (acknowledged, when auto-ack applies).
    #[bits(1, access = RO)]
    pub tx_sent: bool,

    /// The chip exhausted its automatic retry budget.
    #[bits(1, access = RO)]
    pub max_retries: bool,

    /// Pipe number the head RX payload arrived on (7 when RX FIFO empty).
    #[bits(3, access = RO)]
    pub(crate) rx_pipe: u8,

    /// The TX FIFO has no room for another payload.
    #[bits(1, access = RO)]
    pub(crate) tx_full: bool,
}

impl StatusFlags {
    /// Mask isolating the three IRQ event bits.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// All three IRQ event flags asserted.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// Assert or clear the RX-data-ready flag.
    pub fn with_rx_ready(self, flag: bool) -> Self {
        let cleared = self.into_bits() & !(1 << Self::RX_READY_OFFSET);
        Self::from_bits(cleared | ((flag as u8) << Self::RX_READY_OFFSET))
    }

    /// Assert or clear the TX-data-sent flag.
    pub fn with_tx_sent(self, flag: bool) -> Self {
        let cleared = self.into_bits() & !(1 << Self::TX_SENT_OFFSET);
        Self::from_bits(cleared | ((flag as u8) << Self::TX_SENT_OFFSET))
    }

    /// Assert or clear the max-retries flag.
    pub fn with_max_retries(self, flag: bool) -> Self {
        let cleared = self.into_bits() & !(1 << Self::MAX_RETRIES_OFFSET);
        Self::from_bits(cleared | ((flag as u8) << Self::MAX_RETRIES_OFFSET))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_ready: {}, tx_sent: {}, max_retries: {}",
            self.rx_ready(),
            self.tx_sent(),
            self.max_retries()
        )
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_ready: {}, tx_sent: {}, max_retries: {}",
            self.rx_ready(),
            self.tx_sent(),
            self.max_retries()
        )
    }
}
