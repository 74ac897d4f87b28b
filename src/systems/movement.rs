//! Movement integration.
//!
//! Each frame the actor's velocity is damped toward rest, accelerated by the
//! held keys, and turned into a displacement along its facing and lateral
//! axes. The animation mixer is advanced by the same `dt` so clip playback
//! tracks wall-clock time whether or not the state machine switched.
//!
//! Nothing moves until the actor carries [`ModelLoaded`].

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::animationmixer::AnimationMixer;
use crate::components::kinematics::Kinematics;
use crate::components::transform3d::{ModelLoaded, Transform3D};
use crate::resources::input::KeyState;
use crate::resources::worldtime::WorldTime;

/// Integrate one frame of movement for a single actor.
///
/// The forward displacement uses the orientation from before this frame's
/// turn, the lateral displacement the orientation after it.
pub fn integrate(kinematics: &mut Kinematics, transform: &mut Transform3D, keys: &KeyState, dt: f32) {
    kinematics.apply_damping(dt);

    let acceleration = kinematics.frame_acceleration(keys.shift);
    if keys.forward {
        kinematics.velocity.z += acceleration.z * dt;
    }
    if keys.backward {
        kinematics.velocity.z -= acceleration.z * dt;
    }

    let forward = transform.forward() * (kinematics.velocity.z * dt);

    let turn = kinematics.turn_angle(dt);
    if keys.left {
        transform.rotation *= Quat::from_axis_angle(Vec3::Y, turn);
    }
    if keys.right {
        transform.rotation *= Quat::from_axis_angle(Vec3::Y, -turn);
    }
    transform.rotation = transform.rotation.normalize();

    let sideways = transform.sideways() * (kinematics.velocity.x * dt);

    transform.position += forward + sideways;
}

/// Move loaded actors and advance their animation mixers.
pub fn movement_system(
    keys: Res<KeyState>,
    time: Res<WorldTime>,
    mut query: Query<(&mut Kinematics, &mut Transform3D, &mut AnimationMixer), With<ModelLoaded>>,
) {
    for (mut kinematics, mut transform, mut mixer) in query.iter_mut() {
        integrate(&mut kinematics, &mut transform, &keys, time.delta);
        mixer.update(time.delta);
    }
}
