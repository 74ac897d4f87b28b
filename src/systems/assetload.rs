//! Model load polling.
//!
//! [`poll_model_load`] checks the [`AssetLoadBridge`] once per frame without
//! blocking. When the model arrives it is attached to every player actor that
//! is still waiting: an [`AnimationMixer`] is built from its clips, the model
//! scale is applied, the actor is marked [`ModelLoaded`] and its locomotion
//! starts in `survey`. A failed load is recorded in [`Diagnostics`] and the
//! actor stays inert for good.
use bevy_ecs::prelude::*;
use log::error;

use crate::components::animationmixer::AnimationMixer;
use crate::components::locomotion::{Locomotion, LocomotionState};
use crate::components::transform3d::{ModelLoaded, Player, Transform3D};
use crate::events::assetload::{AssetLoadFailedEvent, ModelLoadedEvent};
use crate::events::locomotion::LocomotionChangedEvent;
use crate::resources::assetload::AssetLoadBridge;
use crate::resources::diagnostics::Diagnostics;
use crate::resources::locomotionconfig::LocomotionConfig;

pub fn poll_model_load(
    mut commands: Commands,
    mut bridge: ResMut<AssetLoadBridge>,
    config: Res<LocomotionConfig>,
    mut diagnostics: ResMut<Diagnostics>,
    mut query: Query<(Entity, &mut Transform3D, &mut Locomotion), (With<Player>, Without<ModelLoaded>)>,
) {
    let Some(outcome) = bridge.poll() else {
        return;
    };

    let model = match outcome {
        Ok(model) => model,
        Err(error) => {
            diagnostics.record_load_failure(error.clone());
            commands.trigger(AssetLoadFailedEvent {
                path: bridge.path().to_string(),
                error,
            });
            return;
        }
    };

    for (entity, mut transform, mut locomotion) in query.iter_mut() {
        transform.scale = model.scale.unwrap_or(config.model_scale);

        let mut mixer =
            AnimationMixer::from_clips(model.clips.iter().cloned()).with_cross_fade(config.cross_fade);
        match locomotion.set_state(LocomotionState::SURVEY, &mut mixer) {
            Ok(Some(transition)) => commands.trigger(LocomotionChangedEvent {
                entity,
                from: transition.from,
                to: transition.to,
            }),
            Ok(None) => {}
            Err(err) => {
                if let Some(err) = diagnostics.record_state_error(err) {
                    error!("{:?}: cannot enter initial state: {}", entity, err);
                }
            }
        }

        commands.entity(entity).insert((mixer, ModelLoaded));
        commands.trigger(ModelLoadedEvent {
            entity,
            name: model.name.clone(),
            clip_count: model.clips.len(),
        });
    }
}
