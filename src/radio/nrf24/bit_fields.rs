use bitfield_struct::bitfield;

use crate::CrcLength;

use super::mnemonics;

/// Shadow of the chip's CONFIG register.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// IRQ-mask bits; always zero here (every event drives the IRQ pin,
    /// this driver discovers them by polling).
    #[bits(3, access = None)]
    irq_masks: u8,

    #[bits(2, access = None, default = 3)]
    crc: u8,

    pub power: bool,

    pub prim_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self::from_bits(self.into_bits() & !Self::CRC_MASK | length.into_bits())
    }
}

/// Shadow of the chip's SETUP_RETR register.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// Delay between retry attempts, in 250 us steps above 250 us.
    #[bits(4, default = 5)]
    pub ard: u8,

    /// Automatic retry budget.
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// Driver-side feature cache: the low three bits mirror the chip's FEATURE
/// register, the rest records facts learned at init/config time.
#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    /// Configured address width in bytes (3-5).
    #[bits(3, default = 5)]
    pub address_width: u8,

    #[bits(1)]
    _padding: u8,

    /// Result of the init-time variant probe.
    #[bits(1, default = true)]
    pub plus_variant: bool,

    #[bits(1, access = RO)]
    pub dynamic_payloads: bool,

    #[bits(1, access = RO)]
    pub ack_payloads: bool,

    pub no_ack_allowed: bool,
}

impl Feature {
    /// Bits of this cache that live in the chip's FEATURE register.
    pub const REG_MASK: u8 = mnemonics::EN_DPL | mnemonics::EN_ACK_PAY | mnemonics::EN_DYN_ACK;

    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        let mut bits = self.into_bits() & !(1 << Self::DYNAMIC_PAYLOADS_OFFSET);
        if enable {
            bits |= 1 << Self::DYNAMIC_PAYLOADS_OFFSET;
        } else {
            // ack payloads cannot outlive dynamic payloads
            bits &= !(1 << Self::ACK_PAYLOADS_OFFSET);
        }
        Self::from_bits(bits)
    }

    pub fn with_ack_payloads(self, enable: bool) -> Self {
        let mut bits = self.into_bits() & !(1 << Self::ACK_PAYLOADS_OFFSET);
        if enable {
            // ack payloads ride on dynamic payloads
            bits |= (1 << Self::ACK_PAYLOADS_OFFSET) | (1 << Self::DYNAMIC_PAYLOADS_OFFSET);
        }
        Self::from_bits(bits)
    }
}
