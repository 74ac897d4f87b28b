//! Failure bookkeeping for the host.
//!
//! A load failure leaves the actor invisible, a missing clip freezes it
//! mid-animation. Both look alike on screen, so the last error of each kind
//! is kept here for the host to inspect.
use bevy_ecs::prelude::Resource;

use crate::error::LocomotionError;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Set once when the model load fails.
    pub load_failure: Option<LocomotionError>,
    /// Most recent state machine failure (missing clip, unknown state).
    pub last_state_error: Option<LocomotionError>,
    /// Number of state machine failures since start.
    pub state_error_count: u32,
}

impl Diagnostics {
    /// Count a state machine failure and remember it.
    ///
    /// Returns the error when it differs from the previously recorded one, so
    /// callers can log a failure once instead of every frame it repeats.
    pub fn record_state_error(&mut self, err: LocomotionError) -> Option<&LocomotionError> {
        self.state_error_count = self.state_error_count.saturating_add(1);
        if self.last_state_error.as_ref() == Some(&err) {
            return None;
        }
        self.last_state_error = Some(err);
        self.last_state_error.as_ref()
    }

    pub fn record_load_failure(&mut self, err: LocomotionError) {
        self.load_failure = Some(err);
    }

    /// Whether anything has gone wrong so far.
    pub fn is_clean(&self) -> bool {
        self.load_failure.is_none() && self.last_state_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_state_error_reported_once() {
        let mut diagnostics = Diagnostics::default();
        let walk = LocomotionError::missing_clip("walk", "walk");
        assert_eq!(diagnostics.record_state_error(walk.clone()), Some(&walk));
        assert_eq!(diagnostics.record_state_error(walk.clone()), None);
        assert_eq!(diagnostics.record_state_error(walk.clone()), None);
        assert_eq!(diagnostics.state_error_count, 3);

        let run = LocomotionError::missing_clip("run", "run");
        assert_eq!(diagnostics.record_state_error(run.clone()), Some(&run));
        assert_eq!(diagnostics.record_state_error(walk.clone()), Some(&walk));
        assert_eq!(diagnostics.last_state_error, Some(walk));
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn test_state_error_count_saturates() {
        let mut diagnostics = Diagnostics {
            state_error_count: u32::MAX,
            ..Default::default()
        };
        diagnostics.record_state_error(LocomotionError::UnknownState("jump".to_string()));
        assert_eq!(diagnostics.state_error_count, u32::MAX);
    }
}
