//! Locomotion state machine system.
//!
//! Runs each loaded actor's [`Locomotion`] machine against the frame's
//! [`KeyState`]. Applied transitions are announced with a
//! [`LocomotionChangedEvent`]; failures (a clip missing from the mixer) are
//! recorded in [`Diagnostics`] and leave the actor in its current state. A
//! failure that repeats every frame is logged only when it first appears.
use bevy_ecs::prelude::*;
use log::error;

use crate::components::animationmixer::AnimationMixer;
use crate::components::locomotion::Locomotion;
use crate::components::transform3d::ModelLoaded;
use crate::events::locomotion::LocomotionChangedEvent;
use crate::resources::diagnostics::Diagnostics;
use crate::resources::input::KeyState;
use crate::resources::worldtime::WorldTime;

pub fn locomotion_system(
    mut commands: Commands,
    keys: Res<KeyState>,
    time: Res<WorldTime>,
    mut diagnostics: ResMut<Diagnostics>,
    mut query: Query<(Entity, &mut Locomotion, &mut AnimationMixer), With<ModelLoaded>>,
) {
    for (entity, mut locomotion, mut mixer) in query.iter_mut() {
        match locomotion.update(time.delta, &keys, &mut mixer) {
            Ok(Some(transition)) => commands.trigger(LocomotionChangedEvent {
                entity,
                from: transition.from,
                to: transition.to,
            }),
            Ok(None) => {}
            Err(err) => {
                if let Some(err) = diagnostics.record_state_error(err) {
                    error!("{:?}: locomotion stuck: {}", entity, err);
                }
            }
        }
    }
}
