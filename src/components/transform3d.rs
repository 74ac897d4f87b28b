//! World transform of the actor's model.
//!
//! Holds position, orientation (a rotation about the vertical axis in
//! practice) and the uniform model scale applied when the model is attached.

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};

/// Position, orientation and scale in world space.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform3D {
    /// Unit vector the actor faces (local +Z).
    pub fn forward(&self) -> Vec3 {
        (self.rotation * Vec3::Z).normalize_or_zero()
    }

    /// Unit vector to the actor's side (local +X).
    pub fn sideways(&self) -> Vec3 {
        (self.rotation * Vec3::X).normalize_or_zero()
    }
}

/// Marker for the player-controlled actor.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Marker inserted once the actor's model and clips have finished loading.
///
/// Movement, locomotion and camera systems ignore actors without it.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ModelLoaded;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_faces_plus_z() {
        let t = Transform3D::default();
        assert!((t.forward() - Vec3::Z).length() < EPSILON);
        assert!((t.sideways() - Vec3::X).length() < EPSILON);
    }

    #[test]
    fn test_quarter_turn_faces_plus_x() {
        let t = Transform3D {
            rotation: Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        assert!((t.forward() - Vec3::X).length() < EPSILON);
        assert!((t.sideways() - Vec3::NEG_Z).length() < EPSILON);
    }
}
