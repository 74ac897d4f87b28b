//! ECS components for the controllable actor.
//!
//! Submodules overview:
//! - [`animationmixer`] – clip actions, cross-fades and playback time
//! - [`kinematics`] – velocity with per-axis damping and acceleration
//! - [`locomotion`] – survey/walk/run states and the actor's state machine
//! - [`statemachine`] – generic name-keyed finite state machine
//! - [`transform3d`] – world transform plus the `Player` and `ModelLoaded` markers

pub mod animationmixer;
pub mod kinematics;
pub mod locomotion;
pub mod statemachine;
pub mod transform3d;
