#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Analog conditioning pipeline (hardware-agnostic).
//!
//! Turns a noisy raw reading into a stable committed value and a stable zone.
//! All hardware access goes through `reactor_traits::AnalogInput`.
//!
//! ## Architecture
//!
//! - **Smoothing**: block average over N samples (`smoother`)
//! - **Mapping**: clamp, linear re-scale, clamp, invert (`range`)
//! - **Stability**: quantized hysteresis, change threshold or raw (`stability`)
//! - **Zones**: first-match classification of the committed value (`zones`)
//! - **Presets**: named setter sequences (`preset`)
//! - **Sensor**: one pipeline per input, with change and zone callbacks (`sensor`)
//! - **Device**: fixed-capacity registry of sensors sharing one converter (`device`)
//!
//! ## Integer arithmetic
//!
//! Every stage computes on `i32` values with `i64` intermediates; rounding is
//! half away from zero wherever a value is snapped to a grid. No floats.

pub mod conversions;
pub mod device;
pub mod error;
pub mod fixed_point;
pub mod hw_error;
pub mod mocks;
pub mod preset;
pub mod range;
pub mod sensor;
pub mod settings;
pub mod smoother;
pub mod stability;
pub mod status;
pub mod util;
pub mod zones;

pub use device::{Device, SensorHandle, SharedInput};
pub use error::{ReactorError, RegistryError, Report, Result, ZoneError};
pub use preset::{Preset, PresetRecord};
pub use range::{RangeMapper, ValueRange};
pub use sensor::{DEFAULT_ZONE_CAPACITY, Sensor};
pub use settings::SensorSettings;
pub use stability::StabilityMode;
pub use status::PassOutcome;
pub use zones::{Zone, ZoneId, ZoneTransition};
