//! MCP3008 8-channel, 10-bit SPI ADC on the Raspberry Pi SPI0 bus.
//!
//! Readings are 0..=1023, the same span as the default input range of a sensor.
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use crate::error::{HwError, Result};

pub const CHANNELS: u8 = 8;

pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn new(clock_hz: u32) -> Result<Self> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, clock_hz, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi })
    }

    /// Single-ended conversion on `channel`.
    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        if channel >= CHANNELS {
            return Err(HwError::InvalidChannel(channel));
        }
        // start bit, then SGL/DIFF=1 and the 3 channel bits in the high nibble
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let value = (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]);
        trace!(channel, raw = value, "mcp3008 conversion");
        Ok(value)
    }
}

impl reactor_traits::AnalogInput for Mcp3008 {
    fn read(&mut self, channel: u8) -> std::result::Result<i32, reactor_traits::BoxError> {
        let raw = self.read_channel(channel)?;
        Ok(i32::from(raw))
    }
}
