//! Commit decision: which high-resolution values become externally visible.
//!
//! Three mutually exclusive algorithms, selected by [`StabilityMode`]:
//!
//! - **Quantized hysteresis**: the committed value snaps to multiples of
//!   `step`; a move to a neighbouring grid point requires the signal to pass
//!   the midpoint between grid points by `hysteresis`. The trigger points are
//!   anchored to the grid, so they never drift with history.
//! - **Change threshold**: commit the exact value once it moved at least
//!   `delta` away from the last commit (the dead zone follows the signal).
//! - **Raw**: commit every change.

use crate::fixed_point::{abs_diff_i32_u32, div_round_half_away};
use crate::range::ValueRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StabilityMode {
    #[default]
    Raw,
    ChangeThreshold {
        delta: i32,
    },
    Quantized {
        step: i32,
        hysteresis: i32,
    },
}

impl StabilityMode {
    /// Quantized mode with the default hysteresis of `step / 4`.
    /// A non-positive step selects `Raw`.
    pub fn quantized(step: i32) -> Self {
        Self::quantized_with_hysteresis(step, step / 4)
    }

    /// Quantized mode with an explicit hysteresis; negative values are coerced to 0.
    /// A non-positive step selects `Raw`.
    pub fn quantized_with_hysteresis(step: i32, hysteresis: i32) -> Self {
        if step > 0 {
            Self::Quantized {
                step,
                hysteresis: hysteresis.max(0),
            }
        } else {
            Self::Raw
        }
    }

    /// Change-threshold mode. A delta of 1 or less is equivalent to `Raw`.
    pub fn change_threshold(delta: i32) -> Self {
        if delta > 1 {
            Self::ChangeThreshold { delta }
        } else {
            Self::Raw
        }
    }

    /// Apply the constructor coercions to a mode built from its variant
    /// fields directly.
    pub fn normalized(self) -> Self {
        match self {
            Self::Quantized { step, hysteresis } => Self::quantized_with_hysteresis(step, hysteresis),
            Self::ChangeThreshold { delta } => Self::change_threshold(delta),
            Self::Raw => Self::Raw,
        }
    }
}

/// Nearest multiple of `step` (ties away from zero), clamped into `output`.
pub fn snap_to_grid(value: i32, step: i32, output: ValueRange) -> i32 {
    let step = i64::from(step.max(1));
    let snapped = div_round_half_away(i64::from(value), step) * step;
    let lo = i64::from(output.min.min(output.max));
    let hi = i64::from(output.min.max(output.max));
    snapped.clamp(lo, hi) as i32
}

/// Holds the committed value and applies the configured mode to new samples.
#[derive(Debug, Clone, Default)]
pub struct StabilityEngine {
    committed: i32,
}

impl StabilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(&self) -> i32 {
        self.committed
    }

    /// Set the committed value directly from the first observation, without
    /// any trigger check. Quantized mode starts on the nearest grid point.
    pub fn anchor(&mut self, mode: StabilityMode, hi_res: i32, output: ValueRange) -> i32 {
        self.committed = match mode.normalized() {
            StabilityMode::Quantized { step, .. } => snap_to_grid(hi_res, step, output),
            StabilityMode::ChangeThreshold { .. } | StabilityMode::Raw => hi_res,
        };
        self.committed
    }

    /// Decide whether `hi_res` produces a new committed value.
    /// Returns the new value on commit.
    pub fn evaluate(&mut self, mode: StabilityMode, hi_res: i32, output: ValueRange) -> Option<i32> {
        let current = self.committed;
        let next = match mode.normalized() {
            StabilityMode::Quantized { step, hysteresis } => {
                let candidate = snap_to_grid(hi_res, step, output);
                let reach = i64::from(step / 2) + i64::from(hysteresis);
                let hi = i64::from(hi_res);
                if candidate > current && hi >= i64::from(current) + reach {
                    Some(candidate)
                } else if candidate < current && hi <= i64::from(current) - reach {
                    Some(candidate)
                } else {
                    None
                }
            }
            StabilityMode::ChangeThreshold { delta } => {
                (abs_diff_i32_u32(hi_res, current) >= delta.unsigned_abs()).then_some(hi_res)
            }
            StabilityMode::Raw => (hi_res != current).then_some(hi_res),
        }?;
        self.committed = next;
        Some(next)
    }
}
