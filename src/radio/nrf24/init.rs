use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{bit_fields::Feature, registers, timing, Nrf24};
use crate::{
    radio::{
        prelude::{
            RadioAck, RadioChannel, RadioCrc, RadioDataRate, RadioFifo, RadioPipes, RadioPower,
            RadioStatus,
        },
        RadioConfig,
    },
    types::{CrcLength, DataRate, RadioError, StatusFlags},
};

use crate::radio::prelude::RadioInit;

impl<SPI, DO, DELAY> RadioInit for Nrf24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type InitError = RadioError<SPI::Error, DO::Error>;

    fn init(&mut self) -> Result<(), Self::InitError> {
        self.ce(false)?;
        // Configuration bits will not stick until the chip has settled after
        // power-on. 4.5 ms + margin covers the worst case seen in the wild.
        self.delay.delay_us(timing::POWER_SETTLE_US);

        // 1500 us minimum for a full 32-byte payload with auto-ack at the
        // lowest rate.
        self.set_retries(5, 15)?;

        // Variant probe: only the plus part accepts the lowest data rate.
        let plus_variant = self.set_data_rate(DataRate::Kbps250)?;
        self.feature.set_plus_variant(plus_variant);

        // Back to the rate every variant supports. If even this read-back
        // fails there is no radio on the bus.
        if !self.set_data_rate(DataRate::Mbps1)? {
            return Err(RadioError::NotResponding);
        }

        self.set_crc_length(CrcLength::Bit16)?;
        self.clear_status_flags(StatusFlags::new())?;
        self.set_channel(76)?;
        self.flush_rx()?;
        self.flush_tx()?;
        self.power_up()?;

        // Stay in transmit-standby until the caller starts listening;
        // the RX/TX transition from here takes 130 us instead of 1.5 ms.
        self.config_reg = self.config_reg.with_prim_rx(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::InitError> {
        self.clear_status_flags(StatusFlags::new())?;
        self.power_down()?;

        self.flush_rx()?;
        self.flush_tx()?;

        self.set_address_width(config.address_width())?;
        self.set_retries(config.retry_delay(), config.retry_count())?;
        self.write_register(registers::EN_AA, config.auto_ack())?;

        let feature_bits = config.feature_bits();
        self.toggle_features()?;
        self.write_register(registers::FEATURE, feature_bits)?;
        self.feature = Feature::from_bits(
            self.feature.into_bits() & !Feature::REG_MASK | feature_bits,
        );
        self.write_register(registers::DYNPD, 0x3F * config.dynamic_payloads() as u8)?;

        self.write_register(
            registers::RF_SETUP,
            config.data_rate().into_bits() | config.pa_level().into_bits() | 1,
        )?;

        // Pipe opens below write each pipe's payload width from this cache.
        self.payload_length = config.payload_length();
        let mut address = [0; 5];
        for pipe in 0..6 {
            config.rx_address(pipe, &mut address);
            self.open_rx_pipe(pipe, &address)?;
            // addresses must be written even for closed pipes, because
            // pipes 2-5 borrow bytes from pipe 1
            if !config.is_rx_pipe_enabled(pipe) {
                self.close_rx_pipe(pipe)?;
            }
        }
        config.tx_address(&mut address);
        self.open_tx_pipe(&address)?;

        self.set_channel(config.channel())?;

        // CRC, power up, transmit-standby; CE stays low.
        self.config_reg = self
            .config_reg
            .with_crc_length(config.crc_length())
            .with_power(true)
            .with_prim_rx(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }
}
