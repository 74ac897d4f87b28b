//! ECS resources made available to systems.
//!
//! Overview
//! - `assetload` – one-shot bridge delivering the loaded model to the frame loop
//! - `diagnostics` – last load and state machine failures, for the host
//! - `followcamera` – third-person camera rig and its smoothed pose
//! - `input` – raw event aggregation and the per-frame key snapshot
//! - `locomotionconfig` – tuning constants, optionally read from an INI file
//! - `worldtime` – simulation time and delta
pub mod assetload;
pub mod diagnostics;
pub mod followcamera;
pub mod input;
pub mod locomotionconfig;
pub mod worldtime;
