//! Named configuration recipes for common input types.
//!
//! A preset is a shortcut for a sequence of setter calls, nothing more:
//! applying one overwrites smoothing, output range and stability mode, and any
//! setter called afterwards overrides the preset in turn.

use core::fmt;
use core::str::FromStr;

use crate::settings::SensorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    RawData,
    PotForLed,
    PotForServo,
    PotForPercentage,
    Switch5Position,
}

/// One row of the preset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetRecord {
    pub smoothing: u8,
    pub out_min: i32,
    pub out_max: i32,
    /// 0 selects the change-threshold path.
    pub quantize_step: i32,
    /// 0 means "use step / 4".
    pub hysteresis: i32,
    pub change_delta: i32,
}

const fn record(
    smoothing: u8,
    out_min: i32,
    out_max: i32,
    quantize_step: i32,
    hysteresis: i32,
    change_delta: i32,
) -> PresetRecord {
    PresetRecord {
        smoothing,
        out_min,
        out_max,
        quantize_step,
        hysteresis,
        change_delta,
    }
}

// Indexed by `Preset as usize`.
static PRESETS: [PresetRecord; 5] = [
    record(1, 0, 1023, 0, 0, 1),
    record(8, 0, 255, 0, 0, 2),
    record(8, 0, 180, 0, 0, 2),
    record(10, 0, 100, 5, 1, 1),
    record(12, 0, 4, 1, 1, 1),
];

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::RawData,
        Preset::PotForLed,
        Preset::PotForServo,
        Preset::PotForPercentage,
        Preset::Switch5Position,
    ];

    pub fn record(self) -> &'static PresetRecord {
        &PRESETS[self as usize]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Preset::RawData => "raw_data",
            Preset::PotForLed => "pot_for_led",
            Preset::PotForServo => "pot_for_servo",
            Preset::PotForPercentage => "pot_for_percentage",
            Preset::Switch5Position => "switch_5_position",
        }
    }

    /// Run the preset's setter sequence against `settings`.
    pub fn apply(self, settings: &mut SensorSettings) {
        let r = self.record();
        settings.smoothing(r.smoothing).output_range(r.out_min, r.out_max);
        if r.quantize_step > 0 {
            let h = if r.hysteresis > 0 {
                r.hysteresis
            } else {
                r.quantize_step / 4
            };
            settings.quantize_with_hysteresis(r.quantize_step, h);
        } else {
            settings.change_threshold(r.change_delta);
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}'")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
