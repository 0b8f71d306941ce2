//! Sensor assembly and the fixed-rate tick loop.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::{WrapErr, bail};
use reactor_config::{Config, SensorCfg, WaveformCfg};
use reactor_core::{Device, PassOutcome, ReactorError, ZoneId};
use reactor_hardware::{SimulatedInput, Waveform};
use reactor_traits::{AnalogInput, Clock};
use serde_json::json;

/// Mid-scale level fed to sensors without a `[sensor.simulation]` table.
const IDLE_LEVEL: i32 = 512;

#[derive(Debug, Default)]
pub struct RunOptions {
    pub ticks: Option<u64>,
    pub trace: Option<PathBuf>,
    pub channel: Option<u8>,
    pub stats: bool,
}

/// Final state of one sensor after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorReport {
    pub label: String,
    pub channel: u8,
    pub value: i32,
    pub zone: Option<ZoneId>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub changes: u64,
    pub zone_changes: u64,
    pub faults: u64,
    pub missed_deadlines: u64,
    pub sensors: Vec<SensorReport>,
}

enum Event {
    Change { value: i32 },
    Zone { from: Option<ZoneId>, to: Option<ZoneId> },
}

fn zone_text(z: Option<ZoneId>) -> String {
    z.map_or_else(|| "none".to_string(), |id| id.to_string())
}

fn write_event(
    out: &mut impl Write,
    json: bool,
    tick: u64,
    sensor: &SensorCfg,
    label: &str,
    event: &Event,
) -> std::io::Result<()> {
    if json {
        let line = match *event {
            Event::Change { value } => json!({
                "tick": tick, "sensor": label, "channel": sensor.channel,
                "event": "change", "value": value,
            }),
            Event::Zone { from, to } => json!({
                "tick": tick, "sensor": label, "channel": sensor.channel,
                "event": "zone", "from": from, "zone": to,
            }),
        };
        writeln!(out, "{line}")
    } else {
        match *event {
            Event::Change { value } => writeln!(out, "[tick {tick}] {label} = {value}"),
            Event::Zone { from, to } => writeln!(
                out,
                "[tick {tick}] {label} zone {} -> {}",
                zone_text(from),
                zone_text(to)
            ),
        }
    }
}

pub fn waveform_from(cfg: &WaveformCfg) -> Waveform {
    match *cfg {
        WaveformCfg::Constant { level } => Waveform::Constant { level },
        WaveformCfg::Ramp {
            from,
            to,
            period_ticks,
        } => Waveform::Ramp {
            from,
            to,
            period_ticks,
        },
        WaveformCfg::Sine {
            base,
            amplitude,
            period_ticks,
        } => Waveform::Sine {
            base,
            amplitude,
            period_ticks,
        },
    }
}

#[cfg_attr(all(feature = "hardware", target_os = "linux"), allow(dead_code))]
fn simulated_input(sensors: &[&SensorCfg]) -> SimulatedInput {
    sensors.iter().fold(SimulatedInput::new(), |sim, s| match s.simulation {
        Some(cfg) => sim.with_channel(s.channel, waveform_from(&cfg.waveform), cfg.noise),
        None => sim.with_channel(s.channel, Waveform::Constant { level: IDLE_LEVEL }, 0),
    })
}

/// Sensors selected by `--channel`, or all of them.
pub fn select_sensors<'a>(cfg: &'a Config, channel: Option<u8>) -> eyre::Result<Vec<&'a SensorCfg>> {
    if cfg.sensors.is_empty() {
        bail!("config defines no [[sensor]] tables");
    }
    let selected: Vec<_> = cfg
        .sensors
        .iter()
        .filter(|s| channel.is_none_or(|c| s.channel == c))
        .collect();
    if selected.is_empty()
        && let Some(c) = channel
    {
        bail!("no sensor configured on channel {c}");
    }
    Ok(selected)
}

/// Pick the converter for this run: a replayed trace, the SPI ADC, or the simulator.
/// Returns the input and the number of readings in the trace, if any.
pub fn build_input(
    sensors: &[&SensorCfg],
    trace: Option<&std::path::Path>,
) -> eyre::Result<(Box<dyn AnalogInput>, Option<u64>)> {
    if let Some(path) = trace {
        if sensors.len() != 1 {
            bail!(
                "--trace replays a single input but {} sensors are selected; pick one with --channel",
                sensors.len()
            );
        }
        let readings = reactor_config::load_trace_csv(path)?;
        let len = readings.len() as u64;
        let replay = reactor_hardware::ReplayInput::new(readings)
            .wrap_err_with(|| format!("replay trace {}", path.display()))?;
        tracing::info!(path = %path.display(), readings = len, "replaying trace");
        return Ok((Box::new(replay), Some(len)));
    }

    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        let adc = reactor_hardware::mcp3008::Mcp3008::new(1_350_000)
            .wrap_err("open MCP3008 on SPI0")?;
        tracing::info!("using MCP3008 on SPI0");
        Ok((Box::new(adc), None))
    }
    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        tracing::info!(channels = sensors.len(), "using simulated input");
        Ok((Box::new(simulated_input(sensors)), None))
    }
}

/// Run `sensors` on `input` at `cfg.runner.tick_hz` until the tick budget is
/// spent or `shutdown` is raised, writing one line per event to `out`.
#[allow(clippy::too_many_arguments)]
pub fn run_loop<A: AnalogInput, C: Clock>(
    cfg: &Config,
    sensors: &[&SensorCfg],
    input: A,
    ticks: Option<u64>,
    clock: &C,
    out: &mut impl Write,
    json: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<RunSummary> {
    let mut dev: Device<A> = Device::new(input, sensors.len());
    let mut labels = Vec::with_capacity(sensors.len());
    for s in sensors {
        dev.add_configured(s)?;
        labels.push(s.label());
    }

    let period = Duration::from_micros(reactor_core::util::period_us(cfg.runner.tick_hz));
    tracing::info!(
        sensors = sensors.len(),
        tick_hz = cfg.runner.tick_hz,
        ticks = ?ticks,
        "run start"
    );

    let mut summary = RunSummary::default();
    let mut pending: Vec<(usize, Event)> = Vec::new();
    let mut next = clock.now();
    while ticks.is_none_or(|n| summary.ticks < n) {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(tick = summary.ticks, "shutdown requested");
            break;
        }

        let first_tick = summary.ticks == 0;
        let mut startup_fault: Option<(usize, ReactorError)> = None;
        dev.update_with(|h, outcome| {
            let i = usize::from(h.index());
            match outcome {
                PassOutcome::SamplerFault(e) => {
                    summary.faults += 1;
                    if first_tick && startup_fault.is_none() {
                        startup_fault = Some((i, e.clone()));
                    }
                }
                PassOutcome::Evaluated { committed, zone } => {
                    if let Some(value) = *committed {
                        pending.push((i, Event::Change { value }));
                    }
                    if let Some(t) = *zone {
                        pending.push((i, Event::Zone {
                            from: t.from,
                            to: t.to,
                        }));
                    }
                }
                PassOutcome::Unbound | PassOutcome::Collecting | PassOutcome::Initialized { .. } => {}
            }
        });
        // A sensor that cannot take its first reading means the input is unusable.
        if let Some((i, e)) = startup_fault {
            return Err(eyre::Report::new(e)
                .wrap_err(format!("sensor {}: first reading failed", labels[i])));
        }
        for (i, event) in pending.drain(..) {
            match event {
                Event::Change { .. } => summary.changes += 1,
                Event::Zone { .. } => summary.zone_changes += 1,
            }
            write_event(out, json, summary.ticks, sensors[i], &labels[i], &event)
                .wrap_err("write event")?;
        }

        summary.ticks += 1;
        next += period;
        if clock.now() > next {
            summary.missed_deadlines += 1;
        }
        clock.sleep_until(next);
    }

    for (i, s) in sensors.iter().enumerate() {
        let handle = reactor_core::SensorHandle::new(i as u8);
        let sensor = dev.analog_sensor(handle)?;
        summary.sensors.push(SensorReport {
            label: labels[i].clone(),
            channel: s.channel,
            value: sensor.committed(),
            zone: sensor.current_zone(),
        });
    }
    tracing::info!(
        ticks = summary.ticks,
        changes = summary.changes,
        zone_changes = summary.zone_changes,
        faults = summary.faults,
        "run complete"
    );
    Ok(summary)
}

/// Full `run` command against the real clock and stdout.
pub fn run(cfg: &Config, opts: &RunOptions, json: bool, shutdown: Arc<AtomicBool>) -> eyre::Result<()> {
    let sensors = select_sensors(cfg, opts.channel)?;
    let (input, trace_len) = build_input(&sensors, opts.trace.as_deref())?;
    let ticks = opts.ticks.or(trace_len);
    let clock = reactor_traits::MonotonicClock::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_loop(cfg, &sensors, input, ticks, &clock, &mut out, json, &shutdown)?;
    print_summary(&mut out, json, &summary).wrap_err("write summary")?;
    if opts.stats {
        print_stats(&summary, cfg.runner.tick_hz);
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, json: bool, summary: &RunSummary) -> std::io::Result<()> {
    if json {
        let sensors: Vec<_> = summary
            .sensors
            .iter()
            .map(|s| json!({ "sensor": s.label, "channel": s.channel, "value": s.value, "zone": s.zone }))
            .collect();
        let line = json!({
            "event": "summary",
            "ticks": summary.ticks,
            "changes": summary.changes,
            "zone_changes": summary.zone_changes,
            "faults": summary.faults,
            "sensors": sensors,
        });
        writeln!(out, "{line}")
    } else {
        for s in &summary.sensors {
            writeln!(out, "{}: value {} zone {}", s.label, s.value, zone_text(s.zone))?;
        }
        Ok(())
    }
}

/// Print tick timing stats to stderr.
fn print_stats(summary: &RunSummary, tick_hz: u32) {
    eprintln!("\n--- Reactor Stats ---");
    eprintln!("Ticks: {}", summary.ticks);
    eprintln!("Period (us): {}", reactor_core::util::period_us(tick_hz));
    eprintln!("Events: {} changes / {} zone changes", summary.changes, summary.zone_changes);
    eprintln!("Sampler faults: {}", summary.faults);
    eprintln!("Missed deadlines (> period): {}", summary.missed_deadlines);
    eprintln!("---------------------\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactor_core::mocks::LevelInput;
    use reactor_traits::clock::test_clock::TestClock;

    fn config(toml: &str) -> Config {
        let cfg = reactor_config::load_toml(toml).unwrap();
        cfg.validate().unwrap();
        cfg
    }

    const TWO_ZONES: &str = r#"
[runner]
tick_hz = 50

[[sensor]]
name = "knob"
channel = 2
input_range = [0, 100]
output_range = [0, 100]
zones = [{ id = 0, min = 0, max = 49 }, { id = 1, min = 50, max = 100 }]
"#;

    #[test]
    fn ticks_are_paced_by_the_clock() {
        let cfg = config(TWO_ZONES);
        let sensors = select_sensors(&cfg, None).unwrap();
        let clock = TestClock::new();
        let mut out = Vec::new();
        let stop = AtomicBool::new(false);
        let summary = run_loop(
            &cfg,
            &sensors,
            LevelInput::new(10),
            Some(25),
            &clock,
            &mut out,
            false,
            &stop,
        )
        .unwrap();
        assert_eq!(summary.ticks, 25);
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
        assert!(out.is_empty(), "a steady input produces no events");
        assert_eq!(
            summary.sensors,
            vec![SensorReport {
                label: "knob".into(),
                channel: 2,
                value: 10,
                zone: Some(0),
            }]
        );
    }

    #[test]
    fn raised_shutdown_stops_before_first_tick() {
        let cfg = config(TWO_ZONES);
        let sensors = select_sensors(&cfg, None).unwrap();
        let stop = AtomicBool::new(true);
        let summary = run_loop(
            &cfg,
            &sensors,
            LevelInput::new(10),
            None,
            &TestClock::new(),
            &mut Vec::new(),
            false,
            &stop,
        )
        .unwrap();
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn events_are_written_as_json_lines() {
        let cfg = config(TWO_ZONES);
        let sensors = select_sensors(&cfg, None).unwrap();
        let trace = reactor_hardware::ReplayInput::new(vec![10, 10, 60, 60, 20]).unwrap();
        let mut out = Vec::new();
        let stop = AtomicBool::new(false);
        let summary = run_loop(
            &cfg,
            &sensors,
            trace,
            Some(5),
            &TestClock::new(),
            &mut out,
            true,
            &stop,
        )
        .unwrap();
        assert_eq!((summary.changes, summary.zone_changes), (2, 2));

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["event"], "change");
        assert_eq!(lines[0]["value"], 60);
        assert_eq!(lines[0]["tick"], 2);
        assert_eq!(lines[1]["event"], "zone");
        assert_eq!(lines[1]["from"], 0);
        assert_eq!(lines[1]["zone"], 1);
        assert_eq!(lines[3]["zone"], 0);
        assert_eq!(lines[3]["sensor"], "knob");
    }

    #[test]
    fn failed_first_reading_aborts_the_run() {
        let cfg = config(TWO_ZONES);
        let sensors = select_sensors(&cfg, None).unwrap();
        let stop = AtomicBool::new(false);
        let err = run_loop(
            &cfg,
            &sensors,
            reactor_core::mocks::FailingInput,
            Some(5),
            &TestClock::new(),
            &mut Vec::new(),
            false,
            &stop,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "sensor knob: first reading failed");
        assert!(matches!(
            err.downcast_ref::<ReactorError>(),
            Some(ReactorError::Hardware(_))
        ));
        assert_eq!(crate::error_fmt::exit_code_for_error(&err), crate::error_fmt::EXIT_HARDWARE);
    }

    #[test]
    fn header_only_trace_is_a_hardware_error() {
        let cfg = config(TWO_ZONES);
        let sensors = select_sensors(&cfg, None).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "raw\n").unwrap();
        let err = build_input(&sensors, Some(&path)).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<reactor_hardware::error::HwError>(),
            Some(reactor_hardware::error::HwError::EmptyTrace)
        ));
        assert_eq!(crate::error_fmt::exit_code_for_error(&err), crate::error_fmt::EXIT_HARDWARE);
    }

    #[test]
    fn channel_filter_must_match_a_sensor() {
        let cfg = config(TWO_ZONES);
        let err = select_sensors(&cfg, Some(7)).unwrap_err();
        assert!(err.to_string().contains("no sensor configured on channel 7"));
        assert_eq!(select_sensors(&cfg, Some(2)).unwrap().len(), 1);
    }

    #[test]
    fn trace_requires_a_single_sensor() {
        let cfg = config(
            "[[sensor]]\nchannel = 0\n[[sensor]]\nchannel = 1\n",
        );
        let sensors = select_sensors(&cfg, None).unwrap();
        let err = build_input(&sensors, Some(std::path::Path::new("unused.csv")))
            .err()
            .unwrap();
        assert!(err.to_string().contains("pick one with --channel"));
    }
}
