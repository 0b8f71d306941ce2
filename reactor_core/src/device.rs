//! A shared converter with a fixed number of sensors hanging off it.
//!
//! All sensors created by a `Device` read through the same `AnalogInput`
//! (typically one multi-channel ADC). Handles are plain indices; `update`
//! fans one pass out to every registered sensor in creation order.

use std::cell::RefCell;
use std::rc::Rc;

use reactor_traits::{AnalogInput, BoxError};
use tracing::debug;

use crate::error::RegistryError;
use crate::sensor::{DEFAULT_ZONE_CAPACITY, Sensor};
use crate::status::PassOutcome;

/// Index of a sensor within its `Device`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorHandle(u8);

impl SensorHandle {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// Cloneable view of the device's converter.
pub struct SharedInput<A>(Rc<RefCell<A>>);

impl<A> Clone for SharedInput<A> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<A: AnalogInput> AnalogInput for SharedInput<A> {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError> {
        let mut input = self
            .0
            .try_borrow_mut()
            .map_err(|_| Box::new(std::io::Error::other("analog input is busy")) as BoxError)?;
        input.read(channel)
    }
}

pub struct Device<A: AnalogInput, const Z: usize = DEFAULT_ZONE_CAPACITY> {
    input: Rc<RefCell<A>>,
    sensors: Vec<Sensor<SharedInput<A>, Z>>,
    capacity: usize,
}

impl<A: AnalogInput, const Z: usize> Device<A, Z> {
    /// Largest number of sensors a device can address.
    pub const MAX_SENSORS: usize = u8::MAX as usize;

    /// Device able to hold `capacity` sensors (at most `MAX_SENSORS`).
    /// Storage is reserved up front.
    pub fn new(input: A, capacity: usize) -> Self {
        let capacity = capacity.min(Self::MAX_SENSORS);
        Self {
            input: Rc::new(RefCell::new(input)),
            sensors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a sensor bound to `channel` and return its handle.
    pub fn new_analog_sensor(&mut self, channel: u8) -> Result<SensorHandle, RegistryError> {
        let index = self.sensors.len();
        if index >= self.capacity {
            return Err(RegistryError::Exhausted {
                capacity: self.capacity,
            });
        }
        let handle = u8::try_from(index).map_err(|_| RegistryError::Exhausted {
            capacity: self.capacity,
        })?;
        let shared = SharedInput(Rc::clone(&self.input));
        self.sensors.push(Sensor::bound(shared, channel));
        debug!(handle, channel, "sensor registered");
        Ok(SensorHandle(handle))
    }

    pub fn analog_sensor(
        &mut self,
        handle: SensorHandle,
    ) -> Result<&mut Sensor<SharedInput<A>, Z>, RegistryError> {
        self.sensors
            .get_mut(usize::from(handle.0))
            .ok_or(RegistryError::InvalidHandle(handle.0))
    }

    /// Run one pass on every sensor, in registration order.
    /// Returns how many sensors could not read their input.
    pub fn update(&mut self) -> usize {
        let mut faults = 0;
        for sensor in &mut self.sensors {
            if let PassOutcome::SamplerFault(e) = sensor.update() {
                debug!(channel = ?sensor.channel(), error = %e, "sensor skipped this pass");
                faults += 1;
            }
        }
        faults
    }

    /// Like `update`, calling `f` with every sensor's outcome.
    pub fn update_with(&mut self, mut f: impl FnMut(SensorHandle, &PassOutcome)) {
        for (i, sensor) in self.sensors.iter_mut().enumerate() {
            let outcome = sensor.update();
            // index < capacity <= u8::MAX
            f(SensorHandle(i as u8), &outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Direct access to the converter, e.g. to drive a simulated input.
    pub fn with_input<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(&mut self.input.borrow_mut())
    }
}
