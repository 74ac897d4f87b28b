//! Follow camera system.
//!
//! Chases the loaded player actor with the [`FollowCamera`] rig. Before the
//! model has loaded there is nothing to follow and the camera keeps its pose.
use bevy_ecs::prelude::*;

use crate::components::transform3d::{ModelLoaded, Player, Transform3D};
use crate::resources::followcamera::FollowCamera;
use crate::resources::worldtime::WorldTime;

pub fn camera_follow_system(
    time: Res<WorldTime>,
    mut camera: ResMut<FollowCamera>,
    query: Query<&Transform3D, (With<Player>, With<ModelLoaded>)>,
) {
    let Ok(target) = query.single() else {
        return;
    };
    camera.follow(target.position, target.rotation, time.delta);
}
