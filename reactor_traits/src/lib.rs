pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Boxed error crossing the hardware seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw-sample provider: one hardware conversion per call for a given input channel.
pub trait AnalogInput {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError> {
        (**self).read(channel)
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self, channel: u8) -> Result<i32, BoxError> {
        (**self).read(channel)
    }
}
