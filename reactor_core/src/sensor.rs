//! The per-input pipeline aggregate.
//!
//! A `Sensor` owns one instance of every stage (smoother, range mapper,
//! stability engine, zone classifier) plus the configuration and the two
//! optional event sinks. `update` runs one pass to completion: read, smooth,
//! map, decide, classify, notify.

use reactor_traits::AnalogInput;
use tracing::{debug, trace, warn};

use crate::error::ZoneError;
use crate::hw_error::map_hw_error;
use crate::preset::Preset;
use crate::range::ValueRange;
use crate::settings::SensorSettings;
use crate::smoother::Smoother;
use crate::stability::{StabilityEngine, StabilityMode};
use crate::status::PassOutcome;
use crate::zones::{Zone, ZoneClassifier, ZoneId};

/// Zones per sensor unless a different capacity is chosen at the type level.
pub const DEFAULT_ZONE_CAPACITY: usize = reactor_config::MAX_ZONES_PER_SENSOR;

type ChangeFn = Box<dyn FnMut(i32)>;
type ZoneChangeFn = Box<dyn FnMut(Option<ZoneId>)>;

pub struct Sensor<A: AnalogInput, const Z: usize = DEFAULT_ZONE_CAPACITY> {
    input: A,
    channel: Option<u8>,
    settings: SensorSettings,
    smoother: Smoother,
    hi_res: i32,
    engine: StabilityEngine,
    zones: ZoneClassifier<Z>,
    initialized: bool,
    on_change: Option<ChangeFn>,
    on_zone_change: Option<ZoneChangeFn>,
}

impl<A: AnalogInput, const Z: usize> core::fmt::Debug for Sensor<A, Z> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sensor")
            .field("channel", &self.channel)
            .field("settings", &self.settings)
            .field("hi_res", &self.hi_res)
            .field("committed", &self.engine.committed())
            .field("zone", &self.zones.current())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<A: AnalogInput, const Z: usize> Sensor<A, Z> {
    /// Unbound sensor with default configuration.
    pub fn new(input: A) -> Self {
        Self {
            input,
            channel: None,
            settings: SensorSettings::default(),
            smoother: Smoother::new(),
            hi_res: 0,
            engine: StabilityEngine::new(),
            zones: ZoneClassifier::new(),
            initialized: false,
            on_change: None,
            on_zone_change: None,
        }
    }

    /// Sensor bound to `channel`.
    pub fn bound(input: A, channel: u8) -> Self {
        let mut s = Self::new(input);
        s.bind(channel);
        s
    }

    /// Attach the sensor to an input channel. Only the first call has effect.
    pub fn bind(&mut self, channel: u8) -> &mut Self {
        match self.channel {
            None => {
                debug!(channel, "sensor bound");
                self.channel = Some(channel);
            }
            Some(existing) => {
                warn!(existing, requested = channel, "sensor already bound; ignoring");
            }
        }
        self
    }

    // ---- configuration ----

    pub fn input_range(&mut self, min: i32, max: i32) -> &mut Self {
        self.settings.input_range(min, max);
        self
    }

    pub fn output_range(&mut self, min: i32, max: i32) -> &mut Self {
        self.settings.output_range(min, max);
        self
    }

    pub fn invert(&mut self, inverted: bool) -> &mut Self {
        self.settings.invert(inverted);
        self
    }

    pub fn smoothing(&mut self, samples: u8) -> &mut Self {
        self.settings.smoothing(samples);
        self
    }

    pub fn quantize(&mut self, step: i32) -> &mut Self {
        self.settings.quantize(step);
        self
    }

    pub fn quantize_with_hysteresis(&mut self, step: i32, hysteresis: i32) -> &mut Self {
        self.settings.quantize_with_hysteresis(step, hysteresis);
        self
    }

    pub fn change_threshold(&mut self, delta: i32) -> &mut Self {
        self.settings.change_threshold(delta);
        self
    }

    pub fn stability(&mut self, mode: StabilityMode) -> &mut Self {
        self.settings.stability(mode);
        self
    }

    pub fn apply_preset(&mut self, preset: Preset) -> &mut Self {
        debug!(%preset, "applying preset");
        preset.apply(&mut self.settings);
        self
    }

    /// Register a zone; capacity exhaustion and inverted bounds are logged and ignored.
    pub fn add_zone(&mut self, id: ZoneId, min: i32, max: i32) -> &mut Self {
        if let Err(e) = self.try_add_zone(id, min, max) {
            warn!(error = %e, "zone not added");
        }
        self
    }

    pub fn try_add_zone(&mut self, id: ZoneId, min: i32, max: i32) -> Result<(), ZoneError> {
        self.zones.add(Zone::new(id, min, max)?)?;
        debug!(id, min, max, "zone added");
        Ok(())
    }

    pub fn clear_zones(&mut self) -> &mut Self {
        self.zones.clear();
        self
    }

    pub fn on_change(&mut self, f: impl FnMut(i32) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_zone_change(&mut self, f: impl FnMut(Option<ZoneId>) + 'static) -> &mut Self {
        self.on_zone_change = Some(Box::new(f));
        self
    }

    // ---- observation ----

    /// Current committed value, taking the initial reading if none was taken yet.
    pub fn value(&mut self) -> i32 {
        if !self.initialized && let Err(outcome) = self.initialize() {
            trace!(?outcome, "initial reading unavailable");
        }
        self.engine.committed()
    }

    /// Last committed value without touching the input.
    pub fn committed(&self) -> i32 {
        self.engine.committed()
    }

    pub fn hi_res_value(&self) -> i32 {
        self.hi_res
    }

    pub fn current_zone(&self) -> Option<ZoneId> {
        self.zones.current()
    }

    pub fn stability_mode(&self) -> StabilityMode {
        self.settings.mode
    }

    pub fn input(&self) -> ValueRange {
        self.settings.mapper.input
    }

    pub fn output(&self) -> ValueRange {
        self.settings.mapper.output
    }

    pub fn smoothing_samples(&self) -> u8 {
        self.settings.smoothing_samples
    }

    pub fn is_inverted(&self) -> bool {
        self.settings.mapper.inverted
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub const fn zone_capacity(&self) -> usize {
        Z
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> SensorSettings {
        self.settings
    }

    pub fn input_mut(&mut self) -> &mut A {
        &mut self.input
    }

    // ---- pipeline ----

    /// Run one pass. Events fire synchronously before this returns.
    pub fn update(&mut self) -> PassOutcome {
        if !self.initialized {
            return match self.initialize() {
                Ok(value) => PassOutcome::Initialized { value },
                Err(outcome) => outcome,
            };
        }

        let raw = match self.sample() {
            Ok(raw) => raw,
            Err(outcome) => return outcome,
        };
        let Some(avg) = self.smoother.push(raw, self.settings.smoothing_samples) else {
            return PassOutcome::Collecting;
        };

        let output = self.settings.mapper.output;
        self.hi_res = self.settings.mapper.map(avg);
        trace!(raw, avg, hi_res = self.hi_res, "window complete");

        let committed = self.engine.evaluate(self.settings.mode, self.hi_res, output);
        if let Some(value) = committed {
            debug!(channel = ?self.channel, value, "value committed");
            if let Some(cb) = self.on_change.as_mut() {
                cb(value);
            }
        }

        let zone = self.zones.observe(self.engine.committed());
        if let Some(t) = zone {
            debug!(channel = ?self.channel, from = ?t.from, to = ?t.to, "zone changed");
            if let Some(cb) = self.on_zone_change.as_mut() {
                cb(t.to);
            }
        }

        PassOutcome::Evaluated { committed, zone }
    }

    fn sample(&mut self) -> Result<i32, PassOutcome> {
        let Some(channel) = self.channel else {
            return Err(PassOutcome::Unbound);
        };
        self.input.read(channel).map_err(|e| {
            let err = map_hw_error(&*e);
            warn!(channel, error = %err, "sample failed; pass skipped");
            PassOutcome::SamplerFault(err)
        })
    }

    fn initialize(&mut self) -> Result<i32, PassOutcome> {
        let raw = self.sample()?;
        let avg = self.smoother.prime(raw, self.settings.smoothing_samples);
        self.hi_res = self.settings.mapper.map(avg);
        let value = self
            .engine
            .anchor(self.settings.mode, self.hi_res, self.settings.mapper.output);
        self.zones.anchor(value);
        self.initialized = true;
        debug!(channel = ?self.channel, raw, value, zone = ?self.zones.current(), "initial reading");
        Ok(value)
    }
}
