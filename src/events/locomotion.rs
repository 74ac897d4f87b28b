//! Locomotion transition event and observer.
//!
//! [`locomotion_system`](crate::systems::locomotion::locomotion_system) and
//! the load poller emit a [`LocomotionChangedEvent`] every time an actor's
//! state machine actually switches state. Self transitions are not reported.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

/// An actor's locomotion state changed.
///
/// `from` is `None` for the first activation after the model loaded.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocomotionChangedEvent {
    pub entity: Entity,
    pub from: Option<&'static str>,
    pub to: &'static str,
}

/// Observer that logs locomotion transitions.
pub fn observe_locomotion_changed(trigger: On<LocomotionChangedEvent>) {
    let event = trigger.event();
    match event.from {
        Some(from) => debug!("{:?}: [{}] -> [{}]", event.entity, from, event.to),
        None => info!("{:?}: locomotion starts in [{}]", event.entity, event.to),
    }
}
