//! A small reliable point-to-point/broadcast transport for a mesh layer.
//!
//! One-byte logical node addresses are mapped onto radio pipe addresses by
//! splicing the node id into a fixed 5-byte base. Every node listens on its
//! own unicast address (pipes 0 and 1) and on the shared broadcast address
//! (pipe 2, acknowledgements disabled).

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

pub mod cipher;

use crate::{
    radio::{prelude::*, Nrf24},
    types::{DataRate, PaLevel, RadioError},
    CrcLength,
};

/// The logical address every node receives on.
pub const BROADCAST_ADDR: u8 = 255;

/// High-order bytes shared by every pipe address on the network; the node id
/// becomes the least-significant byte.
const BASE_ADDR: [u8; 5] = [0x00, 0xFC, 0xE1, 0xA8, 0xA8];

/// Pipe 0 mirrors the TX address, so it hears acknowledgements.
const WRITE_PIPE: u8 = 0;
/// Pipe carrying unicast frames for this node.
const NODE_PIPE: u8 = 1;
/// Pipe carrying broadcast frames, auto-ack disabled.
const BROADCAST_PIPE: u8 = 2;

/// Radio pipe address for a logical node id.
pub fn pipe_address(node: u8) -> [u8; 5] {
    let mut address = BASE_ADDR;
    address[0] = node;
    address
}

/// The surface the mesh layer drives.
pub trait Transport {
    type Error;

    /// Bring the radio up and configure the link. Fails when no compatible
    /// radio answers the probe.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Adopt a node address: listen on its unicast pipes plus broadcast.
    fn set_address(&mut self, address: u8) -> Result<(), Self::Error>;

    /// The node address adopted by [`Transport::set_address`].
    fn address(&self) -> u8;

    /// Deliver `buf` to node `to`. Broadcast frames are sent without
    /// acknowledgement; unicast frames use the chip's auto-ack/retry
    /// machinery. Returns delivery success.
    fn send(&mut self, to: u8, buf: &[u8]) -> Result<bool, Self::Error>;

    /// Is a frame waiting? On success, `from` is set to this node's address
    /// for unicast traffic or [`BROADCAST_ADDR`] for broadcast traffic.
    fn available(&mut self, from: &mut u8) -> Result<bool, Self::Error>;

    /// Fetch the waiting frame into `buf`, returning its length.
    fn receive(&mut self, buf: &mut [u8]) -> Result<u8, Self::Error>;

    /// Put the radio to sleep. Configuration survives in its registers.
    fn power_down(&mut self) -> Result<(), Self::Error>;
}

/// Link parameters applied by [`Transport::init`].
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    pub channel: u8,
    pub pa_level: PaLevel,
    pub data_rate: DataRate,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            channel: 76,
            pa_level: PaLevel::Max,
            data_rate: DataRate::Mbps1,
        }
    }
}

/// [`Transport`] over one nRF24L01(+).
pub struct NodeTransport<SPI, DO, DELAY> {
    radio: Nrf24<SPI, DO, DELAY>,
    config: LinkConfig,
    address: u8,
}

impl<SPI, DO, DELAY> NodeTransport<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(radio: Nrf24<SPI, DO, DELAY>, config: LinkConfig) -> Self {
        Self {
            radio,
            config,
            address: BROADCAST_ADDR,
        }
    }

    /// The underlying driver, for diagnostics the transport does not cover.
    pub fn radio(&mut self) -> &mut Nrf24<SPI, DO, DELAY> {
        &mut self.radio
    }
}

impl<SPI, DO, DELAY> Transport for NodeTransport<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type Error = RadioError<SPI::Error, DO::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.radio.init()?;
        // ack payloads and the per-payload no-ack bit only exist on the
        // plus feature set; a lesser chip cannot join this network
        if !self.radio.is_plus_variant() {
            return Err(RadioError::NotResponding);
        }
        self.radio.set_auto_ack(true)?;
        self.radio.set_auto_ack_pipe(false, BROADCAST_PIPE)?;
        self.radio.set_ack_payloads(true)?;
        self.radio.allow_no_ack(true)?;
        self.radio.set_channel(self.config.channel)?;
        self.radio.set_pa_level(self.config.pa_level)?;
        if !self.radio.set_data_rate(self.config.data_rate)? {
            return Err(RadioError::NotResponding);
        }
        self.radio.set_retries(5, 15)?;
        self.radio.set_crc_length(CrcLength::Bit16)?;
        self.radio.set_dynamic_payloads(true)?;

        // everyone hears the broadcast pipe
        self.radio
            .open_rx_pipe(BROADCAST_PIPE, &pipe_address(BROADCAST_ADDR))
    }

    fn set_address(&mut self, address: u8) -> Result<(), Self::Error> {
        self.address = address;
        let unicast = pipe_address(address);
        self.radio.open_rx_pipe(WRITE_PIPE, &unicast)?;
        self.radio.open_rx_pipe(NODE_PIPE, &unicast)?;
        self.radio.start_listening()
    }

    fn address(&self) -> u8 {
        self.address
    }

    fn send(&mut self, to: u8, buf: &[u8]) -> Result<bool, Self::Error> {
        self.radio.power_up()?;
        self.radio.stop_listening()?;
        self.radio.open_tx_pipe(&pipe_address(to))?;
        let delivered = self.radio.send(buf, to == BROADCAST_ADDR)?;
        self.radio.start_listening()?;
        Ok(delivered)
    }

    fn available(&mut self, from: &mut u8) -> Result<bool, Self::Error> {
        let mut pipe = 0xFF;
        let waiting = self.radio.available_pipe(&mut pipe)?;
        if pipe == NODE_PIPE {
            *from = self.address;
        } else if pipe == BROADCAST_PIPE {
            *from = BROADCAST_ADDR;
        }
        Ok(waiting && pipe < 6)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<u8, Self::Error> {
        let length = self.radio.dynamic_payload_length()?;
        if length == 0 {
            return Ok(0);
        }
        self.radio.read(buf, length)
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.radio.power_down()
    }
}
