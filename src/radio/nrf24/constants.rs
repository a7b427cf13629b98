/// Register offsets for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// SPI command opcodes for the nRF24L01.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const ACTIVATE: u8 = 0x50;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const REUSE_TX_PL: u8 = 0xE3;
    pub const NOP: u8 = 0xFF;

    /// Magic byte following [`ACTIVATE`] to unlock FEATURE on non-plus parts.
    pub const ACTIVATE_MAGIC: u8 = 0x73;
}

/// Bit mnemonics for STATUS, FIFO_STATUS and FEATURE.
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;

    pub const RX_EMPTY: u8 = 1 << 0;
    pub const RX_FULL: u8 = 1 << 1;
    pub const TX_EMPTY: u8 = 1 << 4;

    pub const EN_DYN_ACK: u8 = 1 << 0;
    pub const EN_ACK_PAY: u8 = 1 << 1;
    pub const EN_DPL: u8 = 1 << 2;
}

/// Timing contracts, taken from the datasheet and field-proven practice.
/// These are hardware constraints, not tunables.
pub(crate) mod timing {
    /// Power-on / power-up settle (Tpd2stby worst case, rounded up).
    pub const POWER_SETTLE_US: u32 = 5_000;
    /// CE-low settle when leaving active RX mode.
    pub const MODE_SETTLE_US: u32 = 130;
    /// Window after which a missing data-sent/max-retries event means the
    /// radio is wedged or disconnected.
    pub const TX_FAILURE_WINDOW_US: u32 = 75_000;
    /// RX FIFO settle after flushing a corrupted frame.
    pub const FLUSH_SETTLE_US: u32 = 2_000;
    /// Granularity of the status-poll loops that meter the windows above.
    pub const POLL_STEP_US: u32 = 250;
}
