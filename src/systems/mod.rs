//! Per-frame systems.
//!
//! They run chained in this order every frame:
//! 1. [`input`] – fold queued raw events into the [`KeyState`](crate::resources::input::KeyState) snapshot
//! 2. [`assetload`] – attach the model once its load completes
//! 3. [`locomotion`] – run each actor's state machine
//! 4. [`movement`] – integrate velocity and position, advance the mixer
//! 5. [`camera`] – chase the actor with the follow camera
//!
//! [`time`] is called by the controller before the schedule runs.

pub mod assetload;
pub mod camera;
pub mod input;
pub mod locomotion;
pub mod movement;
pub mod time;
