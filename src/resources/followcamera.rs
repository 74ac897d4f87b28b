//! Third-person follow camera resource.
//!
//! The camera sits behind and above the actor, over one of three shoulders
//! ([`ShoulderPreset`]), and looks at a point ahead of the actor. Both the
//! camera position and its look-at point chase their ideal values with a
//! frame-rate independent exponential approach.

use bevy_ecs::prelude::Resource;
use glam::{Mat3, Quat, Vec3};

pub const DEFAULT_LATERAL_SPREAD: f32 = 5.0;
pub const DEFAULT_HEIGHT: f32 = 3.0;
pub const DEFAULT_FOLLOW_DISTANCE: f32 = 7.0;
pub const DEFAULT_LOOKAT: Vec3 = Vec3::new(5.0, 3.0, 25.0);
pub const DEFAULT_SMOOTHING_BASE: f32 = 0.001;

/// Which shoulder the camera hangs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShoulderPreset {
    #[default]
    Left,
    Center,
    Right,
}

impl ShoulderPreset {
    /// Signed preset index: -1, 0 or +1.
    pub fn index(&self) -> i8 {
        match self {
            ShoulderPreset::Left => -1,
            ShoulderPreset::Center => 0,
            ShoulderPreset::Right => 1,
        }
    }

    /// Next preset in the cycle left -> center -> right -> left.
    pub fn next(&self) -> Self {
        match self {
            ShoulderPreset::Left => ShoulderPreset::Center,
            ShoulderPreset::Center => ShoulderPreset::Right,
            ShoulderPreset::Right => ShoulderPreset::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShoulderPreset::Left => "left",
            ShoulderPreset::Center => "center",
            ShoulderPreset::Right => "right",
        }
    }
}

/// Camera pose handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Follow camera rig and its smoothed state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FollowCamera {
    pub preset: ShoulderPreset,
    pub smoothed_position: Vec3,
    pub smoothed_lookat: Vec3,
    /// Last pose produced by [`FollowCamera::follow`].
    pub transform: CameraTransform,
    pub lateral_spread: f32,
    pub height: f32,
    pub follow_distance: f32,
    pub lookat: Vec3,
    pub smoothing_base: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            preset: ShoulderPreset::default(),
            smoothed_position: Vec3::ZERO,
            smoothed_lookat: Vec3::ZERO,
            transform: CameraTransform::default(),
            lateral_spread: DEFAULT_LATERAL_SPREAD,
            height: DEFAULT_HEIGHT,
            follow_distance: DEFAULT_FOLLOW_DISTANCE,
            lookat: DEFAULT_LOOKAT,
            smoothing_base: DEFAULT_SMOOTHING_BASE,
        }
    }
}

impl FollowCamera {
    /// Move to the next shoulder preset and return it.
    pub fn cycle_preset(&mut self) -> ShoulderPreset {
        self.preset = self.preset.next();
        self.preset
    }

    /// Camera position the rig aims for.
    pub fn ideal_offset(&self, target_position: Vec3, target_rotation: Quat) -> Vec3 {
        let local = Vec3::new(
            f32::from(self.preset.index()) * self.lateral_spread,
            self.height,
            -self.follow_distance,
        );
        target_rotation * local + target_position
    }

    /// Look-at point the rig aims for.
    pub fn ideal_lookat(&self, target_position: Vec3, target_rotation: Quat) -> Vec3 {
        target_rotation * self.lookat + target_position
    }

    /// Blend factor for a frame of `dt` seconds.
    pub fn smoothing_factor(&self, dt: f32) -> f32 {
        1.0 - self.smoothing_base.powf(dt)
    }

    /// Advance the smoothed pose toward the target by one frame.
    pub fn follow(&mut self, target_position: Vec3, target_rotation: Quat, dt: f32) -> CameraTransform {
        let ideal_offset = self.ideal_offset(target_position, target_rotation);
        let ideal_lookat = self.ideal_lookat(target_position, target_rotation);
        let t = self.smoothing_factor(dt);

        self.smoothed_position = self.smoothed_position.lerp(ideal_offset, t);
        self.smoothed_lookat = self.smoothed_lookat.lerp(ideal_lookat, t);

        let rotation = look_at_rotation(self.smoothed_position, self.smoothed_lookat)
            .unwrap_or(self.transform.rotation);
        self.transform = CameraTransform {
            position: self.smoothed_position,
            rotation,
        };
        self.transform
    }
}

/// Orientation of a camera at `eye` looking at `target` with +Y up.
///
/// Cameras look down their local -Z. Returns `None` when the direction is
/// degenerate (zero length or parallel to up).
pub fn look_at_rotation(eye: Vec3, target: Vec3) -> Option<Quat> {
    let back = (eye - target).normalize_or_zero();
    if back == Vec3::ZERO {
        return None;
    }
    let right = Vec3::Y.cross(back).normalize_or_zero();
    if right == Vec3::ZERO {
        return None;
    }
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize())
}
