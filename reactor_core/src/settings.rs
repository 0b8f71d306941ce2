//! Per-sensor configuration as one value type.
//!
//! `Sensor` keeps its configuration in a `SensorSettings` so presets can be
//! applied to (and compared against) a plain value without a live input.

use tracing::{debug, warn};

use crate::range::{RangeMapper, ValueRange};
use crate::stability::StabilityMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub mapper: RangeMapper,
    pub smoothing_samples: u8,
    pub mode: StabilityMode,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            mapper: RangeMapper::default(),
            smoothing_samples: 1,
            mode: StabilityMode::Raw,
        }
    }
}

impl SensorSettings {
    /// Set the calibrated raw span. The output span is left alone.
    pub fn input_range(&mut self, min: i32, max: i32) -> &mut Self {
        self.mapper.input = ValueRange::new(min, max);
        self
    }

    pub fn output_range(&mut self, min: i32, max: i32) -> &mut Self {
        self.mapper.output = ValueRange::new(min, max);
        self
    }

    pub fn invert(&mut self, inverted: bool) -> &mut Self {
        self.mapper.inverted = inverted;
        self
    }

    /// Window length of the block average; 0 is treated as 1.
    pub fn smoothing(&mut self, samples: u8) -> &mut Self {
        if samples == 0 {
            debug!("smoothing window of 0 samples coerced to 1");
        }
        self.smoothing_samples = samples.max(1);
        self
    }

    pub fn quantize(&mut self, step: i32) -> &mut Self {
        self.set_mode(StabilityMode::quantized(step), "quantize")
    }

    pub fn quantize_with_hysteresis(&mut self, step: i32, hysteresis: i32) -> &mut Self {
        if hysteresis < 0 {
            warn!(hysteresis, "negative hysteresis coerced to 0");
        }
        self.set_mode(
            StabilityMode::quantized_with_hysteresis(step, hysteresis),
            "quantize",
        )
    }

    pub fn change_threshold(&mut self, delta: i32) -> &mut Self {
        self.set_mode(StabilityMode::change_threshold(delta), "change_threshold")
    }

    /// Replace the stability mode; the most recent call always wins.
    /// Out-of-range parameters get the same coercions as the dedicated setters.
    pub fn stability(&mut self, mode: StabilityMode) -> &mut Self {
        let normalized = mode.normalized();
        if normalized != mode {
            debug!(requested = ?mode, applied = ?normalized, "stability mode coerced");
        }
        self.set_mode(normalized, "stability")
    }

    fn set_mode(&mut self, mode: StabilityMode, setter: &'static str) -> &mut Self {
        if mode == StabilityMode::Raw {
            debug!(setter, "parameter selects raw mode");
        }
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_bare_converter() {
        let s = SensorSettings::default();
        assert_eq!(s.mapper.input, ValueRange::new(0, 1023));
        assert_eq!(s.mapper.output, ValueRange::new(0, 1023));
        assert!(!s.mapper.inverted);
        assert_eq!(s.smoothing_samples, 1);
        assert_eq!(s.mode, StabilityMode::Raw);
    }

    #[test]
    fn stability_setter_coerces_like_dedicated_setters() {
        let mut s = SensorSettings::default();
        s.stability(StabilityMode::ChangeThreshold { delta: 0 });
        assert_eq!(s.mode, StabilityMode::Raw);
        s.stability(StabilityMode::ChangeThreshold { delta: -5 });
        assert_eq!(s.mode, StabilityMode::Raw);
        s.stability(StabilityMode::Quantized { step: 0, hysteresis: 3 });
        assert_eq!(s.mode, StabilityMode::Raw);
        s.stability(StabilityMode::Quantized { step: 10, hysteresis: -2 });
        assert_eq!(s.mode, StabilityMode::Quantized { step: 10, hysteresis: 0 });
    }

    #[test]
    fn last_mode_setter_wins() {
        let mut s = SensorSettings::default();
        s.quantize(10).change_threshold(4);
        assert_eq!(s.mode, StabilityMode::ChangeThreshold { delta: 4 });
        s.change_threshold(4).quantize(10);
        assert_eq!(
            s.mode,
            StabilityMode::Quantized {
                step: 10,
                hysteresis: 2
            }
        );
    }

    #[test]
    fn zero_smoothing_becomes_one() {
        let mut s = SensorSettings::default();
        s.smoothing(0);
        assert_eq!(s.smoothing_samples, 1);
    }
}
