//! Event types and observers used by the locomotion core.
//!
//! Events let the per-frame systems announce what happened without knowing
//! who listens. The observers in this module only log and apply small
//! resource changes; hosts can register their own observers next to them.
//!
//! Submodules:
//! - [`assetload`] – model load completion and failure notifications
//! - [`camera`] – shoulder preset cycling for the follow camera
//! - [`locomotion`] – locomotion state transitions of an actor
pub mod assetload;
pub mod camera;
pub mod locomotion;
