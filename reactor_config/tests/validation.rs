use reactor_config::{PresetName, StabilityCfg, WaveformCfg, load_toml};
use rstest::rstest;

const VALID: &str = r#"
[runner]
tick_hz = 50

[logging]
level = "debug"
rotation = "daily"

[[sensor]]
name = "volume"
channel = 0
preset = "pot_for_percentage"
input_range = [10, 1000]
invert = true
zones = [
    { id = 0, min = 0, max = 33 },
    { id = 1, min = 34, max = 66 },
    { id = 2, min = 67, max = 100 },
]
simulation = { kind = "sine", base = 512, amplitude = 400, period_ticks = 200, noise = 6 }

[[sensor]]
channel = 1
stability = { mode = "quantized", step = 10 }

[[sensor]]
channel = 2
preset = "switch_5_position"
stability = { mode = "change_threshold", delta = 4 }
"#;

#[test]
fn accepts_full_config() {
    let cfg = load_toml(VALID).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    assert_eq!(cfg.runner.tick_hz, 50);
    assert_eq!(cfg.sensors.len(), 3);

    let volume = &cfg.sensors[0];
    assert_eq!(volume.label(), "volume");
    assert_eq!(volume.preset, Some(PresetName::PotForPercentage));
    assert_eq!(volume.input_range, Some([10, 1000]));
    assert!(volume.invert);
    assert_eq!(volume.zones.len(), 3);
    let sim = volume.simulation.expect("simulation block");
    assert_eq!(sim.noise, 6);
    assert!(matches!(sim.waveform, WaveformCfg::Sine { base: 512, .. }));

    assert_eq!(
        cfg.sensors[1].stability,
        Some(StabilityCfg::Quantized {
            step: 10,
            hysteresis: None
        })
    );
    assert_eq!(cfg.sensors[2].preset, Some(PresetName::Switch5Position));
}

#[rstest]
#[case("[runner]\ntick_hz = 0\n", "tick_hz must be > 0")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation must be one of")]
#[case(
    "[[sensor]]\nchannel = 0\n[[sensor]]\nchannel = 0\n",
    "used twice"
)]
#[case(
    "[[sensor]]\nchannel = 0\ninput_range = [900, 100]\n",
    "input_range min must be <= max"
)]
#[case(
    "[[sensor]]\nchannel = 0\ninput_range = [5, 5]\n",
    "more than one value"
)]
#[case(
    "[[sensor]]\nchannel = 0\nsmoothing = 0\n",
    "smoothing must be >= 1"
)]
#[case(
    "[[sensor]]\nchannel = 0\nstability = { mode = \"quantized\", step = 0 }\n",
    "step must be > 0"
)]
#[case(
    "[[sensor]]\nchannel = 0\nstability = { mode = \"quantized\", step = 4, hysteresis = -1 }\n",
    "hysteresis must be >= 0"
)]
#[case(
    "[[sensor]]\nchannel = 0\nstability = { mode = \"change_threshold\", delta = 1 }\n",
    "delta must be > 1"
)]
#[case(
    "[[sensor]]\nchannel = 0\nzones = [{ id = 4, min = 10, max = 2 }]\n",
    "zone 4 min must be <= max"
)]
#[case(
    "[[sensor]]\nchannel = 0\nsimulation = { kind = \"ramp\", from = 0, to = 10, period_ticks = 0 }\n",
    "period_ticks must be > 0"
)]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "expected '{needle}' in '{msg}'");
}

#[test]
fn rejects_too_many_zones() {
    let zones: Vec<String> = (0..9)
        .map(|i| format!("{{ id = {i}, min = {}, max = {} }}", i * 10, i * 10 + 9))
        .collect();
    let toml = format!("[[sensor]]\nchannel = 0\nzones = [{}]\n", zones.join(", "));
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("nine zones exceed capacity");
    assert!(format!("{err}").contains("at most 8 zones"));
}

#[test]
fn unknown_preset_is_a_parse_error() {
    let err = load_toml("[[sensor]]\nchannel = 0\npreset = \"pot_for_fan\"\n")
        .expect_err("unknown preset");
    assert!(format!("{err}").contains("pot_for_fan"));
}
