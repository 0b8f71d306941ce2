use thiserror::Error;

/// Rejected zone registration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ZoneError {
    #[error("zone storage is full (capacity {capacity})")]
    Full { capacity: usize },
    #[error("zone {id}: min must be <= max (got [{min}, {max}])")]
    InvalidRange { id: u8, min: i32, max: i32 },
}

/// Sensor registry failures on a `Device`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("sensor registry exhausted (capacity {capacity})")]
    Exhausted { capacity: usize },
    #[error("no sensor registered under handle {0}")]
    InvalidHandle(u8),
}

/// Input failure observed during a pass, carried by `PassOutcome::SamplerFault`.
#[derive(Debug, Error, Clone)]
pub enum ReactorError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for sample")]
    Timeout,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
