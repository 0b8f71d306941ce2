#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Analog inputs for the reactor pipeline.
//!
//! - `SimulatedInput`: deterministic waveforms with pseudo-random noise per channel
//! - `ReplayInput`: replays a recorded trace of raw readings
//! - `Mcp3008`: SPI ADC on Linux (feature `hardware`)
pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod mcp3008;

use reactor_traits::{AnalogInput, BoxError};

use crate::error::HwError;

/// Highest reading of a 10-bit converter.
pub const ADC_MAX: i32 = 1023;

/// Shape of a simulated signal, evaluated once per read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Fixed level.
    Constant { level: i32 },
    /// Triangle sweep between `from` and `to` over `period_ticks` reads.
    Ramp { from: i32, to: i32, period_ticks: u32 },
    /// Sine around `base` with peak deviation `amplitude`.
    Sine {
        base: i32,
        amplitude: i32,
        period_ticks: u32,
    },
}

impl Waveform {
    fn at(&self, tick: u64) -> i32 {
        match *self {
            Waveform::Constant { level } => level,
            Waveform::Ramp {
                from,
                to,
                period_ticks,
            } => {
                let half = u64::from(period_ticks.max(2) / 2);
                let pos = tick % (half * 2);
                let along = if pos < half { pos } else { half * 2 - pos };
                let span = i64::from(to) - i64::from(from);
                (i64::from(from) + span * along as i64 / half as i64) as i32
            }
            Waveform::Sine {
                base,
                amplitude,
                period_ticks,
            } => {
                let period = f64::from(period_ticks.max(1));
                let phase = (tick % u64::from(period_ticks.max(1))) as f64 / period;
                let dev = f64::from(amplitude) * (phase * std::f64::consts::TAU).sin();
                base.saturating_add(dev.round() as i32)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct SimChannel {
    channel: u8,
    waveform: Waveform,
    noise: i32,
    tick: u64,
    seed: u32,
}

/// Simulated multi-channel ADC.
///
/// Every read of a channel advances that channel's waveform by one tick and adds
/// uniform noise in `[-noise, noise]` from a per-channel LCG, so runs are repeatable.
/// Readings are clamped to `0..=ADC_MAX`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedInput {
    channels: Vec<SimChannel>,
}

impl SimulatedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a waveform to `channel`, replacing any previous one.
    pub fn with_channel(mut self, channel: u8, waveform: Waveform, noise: i32) -> Self {
        self.channels.retain(|c| c.channel != channel);
        self.channels.push(SimChannel {
            channel,
            waveform,
            noise: noise.max(0),
            tick: 0,
            seed: 0x2545_F491 ^ u32::from(channel),
        });
        self
    }
}

impl AnalogInput for SimulatedInput {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError> {
        let ch = self
            .channels
            .iter_mut()
            .find(|c| c.channel == channel)
            .ok_or(HwError::InvalidChannel(channel))?;
        let clean = ch.waveform.at(ch.tick);
        ch.tick = ch.tick.wrapping_add(1);
        let jitter = if ch.noise > 0 {
            // Numerical Recipes LCG constants
            ch.seed = ch.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let span = (ch.noise as u32).saturating_mul(2).saturating_add(1);
            ((ch.seed >> 8) % span) as i32 - ch.noise
        } else {
            0
        };
        Ok(clean.saturating_add(jitter).clamp(0, ADC_MAX))
    }
}

/// Replays a recorded sequence of raw readings on any channel.
///
/// Once the trace is exhausted the last reading is held, mimicking a settled input.
#[derive(Debug, Clone)]
pub struct ReplayInput {
    trace: Vec<i32>,
    pos: usize,
}

impl ReplayInput {
    pub fn new(trace: Vec<i32>) -> error::Result<Self> {
        if trace.is_empty() {
            return Err(HwError::EmptyTrace);
        }
        Ok(Self { trace, pos: 0 })
    }

    /// Whether every recorded reading has been served at least once.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.trace.len()
    }
}

impl AnalogInput for ReplayInput {
    fn read(&mut self, _channel: u8) -> Result<i32, BoxError> {
        let idx = self.pos.min(self.trace.len() - 1);
        if self.pos < self.trace.len() {
            self.pos += 1;
        }
        Ok(self.trace[idx])
    }
}
