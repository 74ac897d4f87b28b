//! Error taxonomy for the locomotion core.
//!
//! Every failure is surfaced synchronously to the caller, or through the
//! asset load channel. Nothing here is retried.

use thiserror::Error;

/// Errors raised by the state machine, the locomotion states, asset loading
/// and configuration.
///
/// The type is `Clone + PartialEq` so the last error of each kind can be kept
/// in [`Diagnostics`](crate::resources::diagnostics::Diagnostics) and compared
/// in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocomotionError {
    /// `set_state` was asked for a name nobody registered.
    #[error("no state registered under '{0}'")]
    UnknownState(String),

    /// A state was entered but its animation clip is not in the mixer.
    #[error("state '{state}' has no animation clip named '{clip}'")]
    MissingClip { state: String, clip: String },

    /// The character model could not be loaded. Terminal for the actor.
    #[error("failed to load model '{path}': {reason}")]
    AssetLoad { path: String, reason: String },

    /// The configuration file could not be read or written.
    #[error("config error: {0}")]
    Config(String),
}

impl LocomotionError {
    /// Build a [`LocomotionError::MissingClip`] from borrowed names.
    pub fn missing_clip(state: &str, clip: &str) -> Self {
        LocomotionError::MissingClip {
            state: state.to_string(),
            clip: clip.to_string(),
        }
    }

    /// Build a [`LocomotionError::AssetLoad`] from anything displayable.
    pub fn asset_load(path: impl Into<String>, reason: impl ToString) -> Self {
        LocomotionError::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
