#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    let parsed = toml::from_str::<reactor_config::Config>(data);
    if let Ok(cfg) = parsed
        && cfg.validate().is_ok()
    {
        // A valid config must configure sensors without zone errors.
        for s in &cfg.sensors {
            let mut sensor = reactor_core::Sensor::<_>::new(reactor_core::mocks::LevelInput::new(0));
            assert!(sensor.apply_config(s).is_ok());
        }
    }
});
