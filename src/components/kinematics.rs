//! Kinematic body of the actor.
//!
//! The [`Kinematics`] component stores the actor's velocity together with the
//! per-axis damping and acceleration profile used by the movement integrator
//! in [`crate::systems::movement`].
//!
//! Axes follow the actor's local frame: `x` is lateral, `y` is vertical and
//! `z` is longitudinal (forward). The `y` acceleration doubles as the turn
//! rate coefficient.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Default per-axis damping coefficients (negative: decay toward rest).
pub const DEFAULT_DAMPING: Vec3 = Vec3::new(-0.0005, -0.0001, -5.0);
/// Default per-axis acceleration profile.
pub const DEFAULT_ACCELERATION: Vec3 = Vec3::new(1.0, 0.25, 50.0);
/// Factor applied to the whole acceleration profile while `shift` is held.
pub const DEFAULT_TURBO_MULTIPLIER: f32 = 2.0;
/// Turn speed in multiples of PI per second, before the turn rate coefficient.
pub const DEFAULT_TURN_RATE: f32 = 4.0;

/// Velocity, damping and acceleration of a controllable actor.
///
/// # Fields
/// - `velocity` - Current velocity in local units per second
/// - `damping` - Per-axis damping coefficients, applied as `velocity * damping * dt`
/// - `acceleration` - Per-axis acceleration applied while movement keys are held
/// - `turbo_multiplier` - Scale of `acceleration` while `shift` is held
/// - `turn_rate` - Multiples of PI per second the actor turns, times `acceleration.y`
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub velocity: Vec3,
    pub damping: Vec3,
    pub acceleration: Vec3,
    pub turbo_multiplier: f32,
    pub turn_rate: f32,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self::new()
    }
}

impl Kinematics {
    /// Create a body at rest with the default profile.
    pub fn new() -> Self {
        Self {
            velocity: Vec3::ZERO,
            damping: DEFAULT_DAMPING,
            acceleration: DEFAULT_ACCELERATION,
            turbo_multiplier: DEFAULT_TURBO_MULTIPLIER,
            turn_rate: DEFAULT_TURN_RATE,
        }
    }

    /// Create a body at rest with a custom damping/acceleration profile.
    pub fn with_profile(damping: Vec3, acceleration: Vec3) -> Self {
        Self {
            damping,
            acceleration,
            ..Self::new()
        }
    }

    /// Velocity change caused by damping over `dt` seconds.
    ///
    /// The longitudinal component is clamped so it can never push the
    /// velocity past zero.
    pub fn frame_deceleration(&self, dt: f32) -> Vec3 {
        let mut decel = self.velocity * self.damping * dt;
        decel.z = decel.z.signum() * decel.z.abs().min(self.velocity.z.abs());
        decel
    }

    /// Apply one damping step.
    pub fn apply_damping(&mut self, dt: f32) {
        let decel = self.frame_deceleration(dt);
        self.velocity += decel;
    }

    /// Acceleration profile for this frame.
    pub fn frame_acceleration(&self, turbo: bool) -> Vec3 {
        if turbo {
            self.acceleration * self.turbo_multiplier
        } else {
            self.acceleration
        }
    }

    /// Turn angle in radians for `dt` seconds of a held turn key.
    pub fn turn_angle(&self, dt: f32) -> f32 {
        self.turn_rate * std::f32::consts::PI * dt * self.acceleration.y
    }
}
