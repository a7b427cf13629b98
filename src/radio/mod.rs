//! The transceiver driver: capability traits, configuration, and the
//! nRF24L01 implementation.
pub mod prelude;

mod nrf24;
pub use nrf24::{commands, mnemonics, registers, Nrf24, MAX_PAYLOAD_LEN};

mod config;
pub use config::{PipeTable, RadioConfig};
