//! Calibration and range mapping stage.
//!
//! Order is fixed: clamp to the calibrated input span, map linearly, clamp to
//! the output span, then optionally invert. Clamping first keeps noise spikes
//! outside calibration from being extrapolated; clamping before inversion keeps
//! the reflection inside the output span.

use crate::fixed_point::map_linear;

/// Inclusive `[min, max]` span of readings or values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

impl ValueRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Saturate `v` into the span. A reversed span is treated by its bounds.
    #[inline]
    pub fn clamp(&self, v: i32) -> i32 {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        v.clamp(lo, hi)
    }

    #[inline]
    pub fn contains(&self, v: i32) -> bool {
        self.clamp(v) == v
    }
}

/// Full span of a 10-bit converter, the default calibration.
pub const ADC_RANGE: ValueRange = ValueRange::new(0, 1023);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMapper {
    pub input: ValueRange,
    pub output: ValueRange,
    pub inverted: bool,
}

impl Default for RangeMapper {
    fn default() -> Self {
        Self {
            input: ADC_RANGE,
            output: ADC_RANGE,
            inverted: false,
        }
    }
}

impl RangeMapper {
    /// Convert a window average into the high-resolution output value.
    pub fn map(&self, avg: i32) -> i32 {
        let clamped = self.input.clamp(avg);
        let mapped = map_linear(
            clamped,
            self.input.min,
            self.input.max,
            self.output.min,
            self.output.max,
        );
        let bounded = self.output.clamp(mapped);
        if self.inverted {
            // bounded is inside the output span, so the reflection is too
            (i64::from(self.output.max) + i64::from(self.output.min) - i64::from(bounded)) as i32
        } else {
            bounded
        }
    }
}
