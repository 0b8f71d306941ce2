//! Test and helper inputs for reactor_core

use std::cell::Cell;
use std::rc::Rc;

use reactor_traits::{AnalogInput, BoxError};

/// Input that returns whatever level was last set, on every channel.
/// Clones share the level so a test can steer a sensor it no longer owns.
#[derive(Debug, Clone, Default)]
pub struct LevelInput(Rc<Cell<i32>>);

impl LevelInput {
    pub fn new(level: i32) -> Self {
        Self(Rc::new(Cell::new(level)))
    }

    pub fn set(&self, level: i32) {
        self.0.set(level);
    }

    pub fn get(&self) -> i32 {
        self.0.get()
    }
}

impl AnalogInput for LevelInput {
    fn read(&mut self, _channel: u8) -> Result<i32, BoxError> {
        Ok(self.0.get())
    }
}

/// An input that always errors on read.
pub struct FailingInput;

impl AnalogInput for FailingInput {
    fn read(&mut self, _channel: u8) -> Result<i32, BoxError> {
        Err(Box::new(std::io::Error::other("failing input")))
    }
}
