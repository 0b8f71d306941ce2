#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use reactor_core::mocks::LevelInput;
use reactor_core::{Sensor, StabilityMode};

#[derive(Arbitrary, Debug)]
struct Input {
    input_range: (i32, i32),
    output_range: (i32, i32),
    inverted: bool,
    smoothing: u8,
    mode: u8,
    param: i32,
    hysteresis: i32,
    readings: Vec<i32>,
}

fuzz_target!(|inp: Input| {
    let level = LevelInput::new(0);
    let mut s = Sensor::<_>::bound(level.clone(), 0);
    let mode = match inp.mode % 3 {
        0 => StabilityMode::Raw,
        1 => StabilityMode::change_threshold(inp.param),
        _ => StabilityMode::quantized_with_hysteresis(inp.param, inp.hysteresis),
    };
    s.input_range(inp.input_range.0, inp.input_range.1)
        .output_range(inp.output_range.0, inp.output_range.1)
        .invert(inp.inverted)
        .smoothing(inp.smoothing)
        .stability(mode)
        .add_zone(0, i32::MIN, 0)
        .add_zone(1, 1, i32::MAX);
    for raw in inp.readings {
        level.set(raw);
        let _ = s.update();
    }
});
