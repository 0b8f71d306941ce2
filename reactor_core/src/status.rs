//! Outcome of one pipeline pass.

use crate::error::ReactorError;
use crate::zones::ZoneTransition;

/// What a single `Sensor::update` did.
#[derive(Debug, Clone)]
pub enum PassOutcome {
    /// No input channel bound yet; nothing was read.
    Unbound,
    /// The input failed; the pass was skipped and state is unchanged.
    SamplerFault(ReactorError),
    /// A sample was added but the averaging window is not complete.
    Collecting,
    /// First observation: the committed value was set without an event.
    Initialized { value: i32 },
    /// A full window was evaluated.
    Evaluated {
        committed: Option<i32>,
        zone: Option<ZoneTransition>,
    },
}

impl PassOutcome {
    /// Whether the pass fired any event.
    pub fn fired(&self) -> bool {
        matches!(
            self,
            PassOutcome::Evaluated { committed: Some(_), .. }
                | PassOutcome::Evaluated { zone: Some(_), .. }
        )
    }
}
