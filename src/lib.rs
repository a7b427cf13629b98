//! A pure-rust driver for the nRF24L01(+) 2.4 GHz transceiver, topped with a
//! small node-addressed transport layer suitable as the link layer of a mesh
//! stack.
//!
//! The driver talks to the chip over any [`embedded_hal`] 1.0
//! `SpiDevice`/`OutputPin`/`DelayNs` trio and never blocks on interrupts:
//! availability and completion are discovered by polling the STATUS byte
//! that rides on every SPI transaction.
//!
//! ## Driver API
//!
//! - [`Nrf24::new()`](fn@crate::radio::Nrf24::new)
//! - [`RadioInit::init()`](fn@crate::radio::prelude::RadioInit::init)
//! - [`RadioMode::start_listening()`](fn@crate::radio::prelude::RadioMode::start_listening)
//! - [`RadioMode::stop_listening()`](fn@crate::radio::prelude::RadioMode::stop_listening)
//! - [`RadioPipes::open_rx_pipe()`](fn@crate::radio::prelude::RadioPipes::open_rx_pipe)
//! - [`RadioPipes::open_tx_pipe()`](fn@crate::radio::prelude::RadioPipes::open_tx_pipe)
//! - [`RadioTx::send()`](fn@crate::radio::prelude::RadioTx::send)
//! - [`RadioTx::send_fast()`](fn@crate::radio::prelude::RadioTx::send_fast)
//! - [`RadioTx::send_blocking()`](fn@crate::radio::prelude::RadioTx::send_blocking)
//! - [`RadioTx::tx_standby()`](fn@crate::radio::prelude::RadioTx::tx_standby)
//! - [`RadioRx::available()`](fn@crate::radio::prelude::RadioRx::available)
//! - [`RadioRx::read()`](fn@crate::radio::prelude::RadioRx::read)
//! - [`RadioStatus::what_happened()`](fn@crate::radio::prelude::RadioStatus::what_happened)
//! - [`RadioAck::write_ack_payload()`](fn@crate::radio::prelude::RadioAck::write_ack_payload)
//!
//! ## Transport API
//!
//! - [`net::Transport`]
//! - [`net::NodeTransport`]
//! - [`net::cipher::Encrypted`]
//!
//! Configuration setters live in the remaining [`radio::prelude`] traits;
//! [`radio::RadioConfig`] applies a whole profile at once.
#![no_std]

mod types;
pub use types::{CrcLength, DataRate, FifoState, PaLevel, RadioError, StatusFlags};

pub mod net;
pub mod radio;

#[cfg(test)]
mod test {
    use crate::radio::Nrf24;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    /// Expands a list of `(expected_mosi, miso_response)` vector pairs into
    /// an array of [`SpiTransaction`]s, one full chip-select assertion per
    /// pair.
    #[macro_export]
    macro_rules! spi_expects {
        ($( ($expected:expr , $response:expr $(,)? ) , ) + ) => {
            [
                $(
                    SpiTransaction::transaction_start(),
                    SpiTransaction::transfer_in_place($expected, $response),
                    SpiTransaction::transaction_end(),
                )*
            ]
        }
    }

    /// A driver wired to mocks, plus the mocks for their `done()` checks.
    pub struct MockRadio(
        pub Nrf24<SpiMock<u8>, PinMock, NoopDelay>,
        pub SpiMock<u8>,
        pub PinMock,
    );

    /// Build a mocked driver from CE-pin and SPI transaction expectations.
    pub fn mk_radio(
        ce_expectations: &[PinTransaction],
        spi_expectations: &[SpiTransaction<u8>],
    ) -> MockRadio {
        let spi = SpiMock::new(spi_expectations);
        let ce_pin = PinMock::new(ce_expectations);
        let radio = Nrf24::new(spi.clone(), ce_pin.clone(), NoopDelay);
        MockRadio(radio, spi, ce_pin)
    }
}
