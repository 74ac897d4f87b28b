//! One-shot bridge between an asynchronous model loader and the frame loop.
//!
//! Use [`AssetLoadBridge::pending`] to get a [`LoadCompleter`] for a host's own
//! loader, or [`spawn_manifest_load`] to read a JSON model manifest on a
//! background thread. Either way the frame loop only polls the bridge with
//! [`AssetLoadBridge::poll`]; it never blocks, and a load can not be
//! cancelled once started.
//!
//! # Manifest format
//!
//! ```json
//! {
//!   "name": "Fox",
//!   "scale": 0.025,
//!   "clips": [
//!     { "name": "Survey", "duration": 3.4166667 },
//!     { "name": "Walk", "duration": 0.7083333 },
//!     { "name": "Run", "duration": 1.1583333 }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::components::animationmixer::AnimationClip;
use crate::error::LocomotionError;

/// Everything the locomotion core needs from a loaded character model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedModel {
    pub name: String,
    /// Uniform scale to apply to the model; the configured scale is used
    /// when absent.
    #[serde(default)]
    pub scale: Option<f32>,
    pub clips: Vec<AnimationClip>,
}

/// Result delivered through the bridge.
pub type LoadOutcome = Result<LoadedModel, LocomotionError>;

/// Where the actor's model load stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded,
    /// Terminal: the actor stays inert.
    Failed(LocomotionError),
}

/// Sending half handed to whoever performs the load. Completes exactly once.
#[derive(Debug)]
pub struct LoadCompleter {
    path: String,
    tx: Sender<LoadOutcome>,
}

impl LoadCompleter {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Signal that the model and its clips are ready.
    pub fn complete(self, model: LoadedModel) {
        // The receiver may already be gone if the controller was dropped.
        let _ = self.tx.send(Ok(model));
    }

    /// Signal that the load failed.
    pub fn fail(self, reason: impl ToString) {
        let err = LocomotionError::asset_load(self.path.clone(), reason);
        let _ = self.tx.send(Err(err));
    }
}

/// ECS resource the load polling system reads.
#[derive(Resource, Debug)]
pub struct AssetLoadBridge {
    path: String,
    rx: Receiver<LoadOutcome>,
    status: LoadStatus,
}

impl AssetLoadBridge {
    /// Create a bridge waiting on a load of `path`.
    pub fn pending(path: impl Into<String>) -> (LoadCompleter, AssetLoadBridge) {
        let path = path.into();
        let (tx, rx) = bounded::<LoadOutcome>(1);
        (
            LoadCompleter {
                path: path.clone(),
                tx,
            },
            AssetLoadBridge {
                path,
                rx,
                status: LoadStatus::Pending,
            },
        )
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    /// Check for a completion without blocking.
    ///
    /// Returns the outcome exactly once. A completer dropped without
    /// completing counts as a failure.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        if self.status != LoadStatus::Pending {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LocomotionError::asset_load(
                self.path.clone(),
                "loader finished without signalling completion",
            )),
        };
        self.status = match &outcome {
            Ok(_) => LoadStatus::Loaded,
            Err(err) => LoadStatus::Failed(err.clone()),
        };
        Some(outcome)
    }
}

/// Parse a model manifest from JSON text.
pub fn parse_manifest(path: &str, text: &str) -> LoadOutcome {
    serde_json::from_str::<LoadedModel>(text).map_err(|e| LocomotionError::asset_load(path, e))
}

/// Read and parse a model manifest from disk.
pub fn read_manifest(path: &Path) -> LoadOutcome {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| LocomotionError::asset_load(&display, e))?;
    let model = parse_manifest(&display, &text)?;
    info!(
        "Loaded model '{}' with {} clip(s) from {}",
        model.name,
        model.clips.len(),
        display
    );
    Ok(model)
}

/// Load a model manifest on a background thread.
pub fn spawn_manifest_load(path: impl Into<PathBuf>) -> AssetLoadBridge {
    let path = path.into();
    let (completer, bridge) = AssetLoadBridge::pending(path.display().to_string());
    std::thread::spawn(move || {
        debug!("loading model manifest {:?}", path);
        match read_manifest(&path) {
            Ok(model) => completer.complete(model),
            Err(LocomotionError::AssetLoad { reason, .. }) => completer.fail(reason),
            Err(other) => completer.fail(other),
        }
    });
    bridge
}
