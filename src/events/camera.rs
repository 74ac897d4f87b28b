//! Camera preset cycling.
//!
//! The host binds a secondary gesture (a right click or a long press) to
//! [`LocomotionController::cycle_camera_preset`](crate::controller::LocomotionController::cycle_camera_preset),
//! which triggers a [`CycleCameraPresetEvent`]. The observer moves the
//! [`FollowCamera`] to the next shoulder.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::resources::followcamera::FollowCamera;

/// Request to move the follow camera to the next shoulder preset.
#[derive(Event, Debug, Clone, Copy)]
pub struct CycleCameraPresetEvent {}

/// What the host should do with the native gesture that cycled the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureDisposition {
    /// Suppress the platform default (e.g. the context menu).
    PreventDefault,
}

/// Observer that cycles the shoulder preset left -> center -> right -> left.
pub fn cycle_camera_preset_observer(
    _trigger: On<CycleCameraPresetEvent>,
    camera: Option<ResMut<FollowCamera>>,
) {
    let Some(mut camera) = camera else {
        warn!("CycleCameraPresetEvent without a FollowCamera resource");
        return;
    };
    let preset = camera.cycle_preset();
    info!("camera shoulder: {}", preset.label());
}
