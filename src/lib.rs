//! Actor locomotion library.
//!
//! Third-person character locomotion built on `bevy_ecs`: an input
//! aggregator, a generic state machine driving survey/walk/run animation
//! states with cross-fades, a damped movement integrator and a smoothed
//! over-the-shoulder follow camera. [`controller::LocomotionController`] ties
//! them together for a host's frame loop.

pub mod components;
pub mod controller;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
