//! Maps `Box<dyn Error>` from trait boundaries to typed `ReactorError`.
//!
//! `reactor_traits::AnalogInput` returns boxed errors so any converter can sit
//! behind it; this module converts those to our typed error enum, with an
//! optional feature-gated path for `reactor_hardware::HwError` downcasting.

use crate::error::ReactorError;

/// Map a trait-boundary error to a typed `ReactorError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> ReactorError {
    #[cfg(feature = "hardware-errors")]
    {
        use reactor_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout => ReactorError::Timeout,
                other => ReactorError::HardwareFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        ReactorError::Timeout
    } else {
        ReactorError::Hardware(s)
    }
}
