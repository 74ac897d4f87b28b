//! Model load notifications.
//!
//! [`poll_model_load`](crate::systems::assetload::poll_model_load) emits
//! exactly one of these per controller: [`ModelLoadedEvent`] once the actor
//! has its clips and is in `survey`, or [`AssetLoadFailedEvent`] when the
//! load failed and the actor will stay inert.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{error, info};

use crate::error::LocomotionError;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ModelLoadedEvent {
    pub entity: Entity,
    pub name: String,
    pub clip_count: usize,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct AssetLoadFailedEvent {
    pub path: String,
    pub error: LocomotionError,
}

pub fn observe_model_loaded(trigger: On<ModelLoadedEvent>) {
    let event = trigger.event();
    info!(
        "{:?}: model '{}' attached with {} clip(s)",
        event.entity, event.name, event.clip_count
    );
}

/// Logs the failure. Nothing is retried; the owner decides what to do.
pub fn observe_asset_load_failed(trigger: On<AssetLoadFailedEvent>) {
    let event = trigger.event();
    error!("model '{}' will not be shown: {}", event.path, event.error);
}
