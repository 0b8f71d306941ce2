//! `From` implementations bridging `reactor_config` types to `reactor_core` types.

use eyre::WrapErr;
use reactor_config::{PresetName, SensorCfg, StabilityCfg, ZoneCfg};
use reactor_traits::AnalogInput;

use crate::device::{Device, SensorHandle};
use crate::error::{Result as CoreResult, ZoneError};
use crate::preset::Preset;
use crate::sensor::Sensor;
use crate::stability::StabilityMode;
use crate::zones::Zone;

// ── Preset ───────────────────────────────────────────────────────────────────

impl From<PresetName> for Preset {
    fn from(p: PresetName) -> Self {
        match p {
            PresetName::RawData => Preset::RawData,
            PresetName::PotForLed => Preset::PotForLed,
            PresetName::PotForServo => Preset::PotForServo,
            PresetName::PotForPercentage => Preset::PotForPercentage,
            PresetName::Switch5Position => Preset::Switch5Position,
        }
    }
}

// ── StabilityMode ────────────────────────────────────────────────────────────

impl From<&StabilityCfg> for StabilityMode {
    fn from(c: &StabilityCfg) -> Self {
        match *c {
            StabilityCfg::Raw => StabilityMode::Raw,
            StabilityCfg::ChangeThreshold { delta } => StabilityMode::change_threshold(delta),
            StabilityCfg::Quantized {
                step,
                hysteresis: Some(h),
            } => StabilityMode::quantized_with_hysteresis(step, h),
            StabilityCfg::Quantized {
                step,
                hysteresis: None,
            } => StabilityMode::quantized(step),
        }
    }
}

// ── Zone ─────────────────────────────────────────────────────────────────────

impl TryFrom<&ZoneCfg> for Zone {
    type Error = ZoneError;

    fn try_from(c: &ZoneCfg) -> Result<Self, Self::Error> {
        Zone::new(c.id, c.min, c.max)
    }
}

// ── Sensor ───────────────────────────────────────────────────────────────────

impl<A: AnalogInput, const Z: usize> Sensor<A, Z> {
    /// Configure from a `[[sensor]]` table: bind, preset, then explicit
    /// overrides, then zones. A sensor already bound elsewhere keeps its channel.
    pub fn apply_config(&mut self, cfg: &SensorCfg) -> Result<&mut Self, ZoneError> {
        if self.channel() != Some(cfg.channel) {
            self.bind(cfg.channel);
        }
        if let Some(p) = cfg.preset {
            self.apply_preset(p.into());
        }
        if let Some([min, max]) = cfg.input_range {
            self.input_range(min, max);
        }
        if let Some([min, max]) = cfg.output_range {
            self.output_range(min, max);
        }
        if cfg.invert {
            self.invert(true);
        }
        if let Some(n) = cfg.smoothing {
            self.smoothing(n);
        }
        if let Some(s) = &cfg.stability {
            self.stability(s.into());
        }
        for z in &cfg.zones {
            let zone = Zone::try_from(z)?;
            self.try_add_zone(zone.id, zone.min, zone.max)?;
        }
        Ok(self)
    }
}

// ── Device ───────────────────────────────────────────────────────────────────

impl<A: AnalogInput, const Z: usize> Device<A, Z> {
    /// Register a sensor for `cfg.channel` and configure it from the table.
    /// Errors name the sensor by its label.
    pub fn add_configured(&mut self, cfg: &SensorCfg) -> CoreResult<SensorHandle> {
        let label = cfg.label();
        let handle = self
            .new_analog_sensor(cfg.channel)
            .wrap_err_with(|| format!("register sensor {label}"))?;
        self.analog_sensor(handle)?
            .apply_config(cfg)
            .wrap_err_with(|| format!("configure sensor {label}"))?;
        Ok(handle)
    }
}
