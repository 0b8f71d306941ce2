#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and trace parsing for the reactor pipeline.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Trace CSV loader enforces a strict `raw` header so recorded sessions can be replayed.
use std::collections::HashSet;

use serde::Deserialize;

/// Zones a single sensor can hold; matches the core's fixed zone storage.
pub const MAX_ZONES_PER_SENSOR: usize = 8;

/// Default raw span of a 10-bit converter.
pub const DEFAULT_INPUT_RANGE: [i32; 2] = [0, 1023];

/// Trace CSV schema.
///
/// Expected headers:
/// raw
///
/// Example:
/// raw
/// 512
/// 517
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TraceRow {
    pub raw: i32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Scheduler tick rate; one pipeline pass per sensor per tick.
    pub tick_hz: u32,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { tick_hz: 100 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Named configuration recipes understood by the core.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresetName {
    RawData,
    PotForLed,
    PotForServo,
    PotForPercentage,
    #[serde(rename = "switch_5_position")]
    Switch5Position,
}

/// Stability algorithm selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StabilityCfg {
    Raw,
    ChangeThreshold {
        delta: i32,
    },
    Quantized {
        step: i32,
        /// Defaults to step / 4 when absent.
        #[serde(default)]
        hysteresis: Option<i32>,
    },
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCfg {
    pub id: u8,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaveformCfg {
    Constant {
        level: i32,
    },
    Ramp {
        from: i32,
        to: i32,
        period_ticks: u32,
    },
    Sine {
        base: i32,
        amplitude: i32,
        period_ticks: u32,
    },
}

/// Signal fed to a sensor when running against the simulated input.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SimulationCfg {
    #[serde(flatten)]
    pub waveform: WaveformCfg,
    /// Peak uniform noise added to every reading.
    #[serde(default)]
    pub noise: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorCfg {
    /// Label used in logs and event output; defaults to "ch<channel>".
    #[serde(default)]
    pub name: Option<String>,
    /// ADC channel the sensor is bound to.
    pub channel: u8,
    /// Applied first; every explicit field below overrides it.
    #[serde(default)]
    pub preset: Option<PresetName>,
    #[serde(default)]
    pub input_range: Option<[i32; 2]>,
    #[serde(default)]
    pub output_range: Option<[i32; 2]>,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub smoothing: Option<u8>,
    #[serde(default)]
    pub stability: Option<StabilityCfg>,
    #[serde(default)]
    pub zones: Vec<ZoneCfg>,
    #[serde(default)]
    pub simulation: Option<SimulationCfg>,
}

impl SensorCfg {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("ch{}", self.channel))
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default, rename = "sensor")]
    pub sensors: Vec<SensorCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Readings from a single-column `raw` CSV. A header-only file yields an
/// empty vector; the replay input decides whether that is usable.
pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<i32>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != ["raw"] {
        eyre::bail!(
            "trace CSV must have header 'raw', got: {}",
            actual.join(",")
        );
    }

    let mut readings = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => readings.push(row.raw),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(readings)
}

fn check_range(label: &str, field: &str, range: [i32; 2]) -> eyre::Result<()> {
    if range[0] > range[1] {
        eyre::bail!(
            "sensor {label}: {field} min must be <= max (got [{}, {}])",
            range[0],
            range[1]
        );
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Runner
        if self.runner.tick_hz == 0 {
            eyre::bail!("runner.tick_hz must be > 0");
        }
        if self.runner.tick_hz > 10_000 {
            eyre::bail!("runner.tick_hz is unreasonably large (>10kHz)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Sensors
        let mut channels = HashSet::new();
        for s in &self.sensors {
            let label = s.label();
            if !channels.insert(s.channel) {
                eyre::bail!("sensor {label}: channel {} is used twice", s.channel);
            }
            if let Some(r) = s.input_range {
                check_range(&label, "input_range", r)?;
                if r[0] == r[1] {
                    eyre::bail!("sensor {label}: input_range must span more than one value");
                }
            }
            if let Some(r) = s.output_range {
                check_range(&label, "output_range", r)?;
            }
            if s.smoothing == Some(0) {
                eyre::bail!("sensor {label}: smoothing must be >= 1");
            }
            match s.stability {
                Some(StabilityCfg::Quantized { step, hysteresis }) => {
                    if step <= 0 {
                        eyre::bail!("sensor {label}: stability.step must be > 0");
                    }
                    if hysteresis.is_some_and(|h| h < 0) {
                        eyre::bail!("sensor {label}: stability.hysteresis must be >= 0");
                    }
                }
                Some(StabilityCfg::ChangeThreshold { delta }) => {
                    if delta <= 1 {
                        eyre::bail!(
                            "sensor {label}: stability.delta must be > 1 (use mode = \"raw\" otherwise)"
                        );
                    }
                }
                Some(StabilityCfg::Raw) | None => {}
            }
            if s.zones.len() > MAX_ZONES_PER_SENSOR {
                eyre::bail!(
                    "sensor {label}: at most {MAX_ZONES_PER_SENSOR} zones are supported, got {}",
                    s.zones.len()
                );
            }
            for z in &s.zones {
                if z.min > z.max {
                    eyre::bail!(
                        "sensor {label}: zone {} min must be <= max (got [{}, {}])",
                        z.id,
                        z.min,
                        z.max
                    );
                }
            }
            if let Some(sim) = s.simulation {
                if sim.noise < 0 {
                    eyre::bail!("sensor {label}: simulation.noise must be >= 0");
                }
                let period = match sim.waveform {
                    WaveformCfg::Constant { .. } => None,
                    WaveformCfg::Ramp { period_ticks, .. }
                    | WaveformCfg::Sine { period_ticks, .. } => Some(period_ticks),
                };
                if period == Some(0) {
                    eyre::bail!("sensor {label}: simulation.period_ticks must be > 0");
                }
            }
        }

        Ok(())
    }
}
