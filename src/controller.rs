//! Host-facing facade over the locomotion world.
//!
//! [`LocomotionController`] owns a bevy [`World`] holding one player actor
//! and the resources around it, plus the per-frame [`Schedule`]. A host
//! feeds it raw input events as they arrive and calls
//! [`update`](LocomotionController::update) (or
//! [`tick`](LocomotionController::tick)) once per rendered frame, then reads
//! the actor and camera poses back for drawing.
//!
//! ```no_run
//! use actor_locomotion::controller::LocomotionController;
//! use actor_locomotion::resources::input::{Key, RawInputEvent};
//! use actor_locomotion::resources::locomotionconfig::LocomotionConfig;
//!
//! let mut controller = LocomotionController::with_manifest(LocomotionConfig::new());
//! controller.handle_input(RawInputEvent::KeyDown(Key::W));
//! controller.update(1.0 / 60.0);
//! let camera = controller.camera();
//! # let _ = camera;
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::animationmixer::AnimationMixer;
use crate::components::kinematics::Kinematics;
use crate::components::locomotion::{Locomotion, LocomotionState};
use crate::components::transform3d::{ModelLoaded, Player, Transform3D};
use crate::events::assetload::{observe_asset_load_failed, observe_model_loaded};
use crate::events::camera::{CycleCameraPresetEvent, GestureDisposition, cycle_camera_preset_observer};
use crate::events::locomotion::observe_locomotion_changed;
use crate::resources::assetload::{AssetLoadBridge, LoadStatus, spawn_manifest_load};
use crate::resources::diagnostics::Diagnostics;
use crate::resources::followcamera::{CameraTransform, FollowCamera, ShoulderPreset};
use crate::resources::input::{InputState, KeyState, RawInputEvent};
use crate::resources::locomotionconfig::LocomotionConfig;
use crate::resources::worldtime::{FrameClock, WorldTime};
use crate::systems::assetload::poll_model_load;
use crate::systems::camera::camera_follow_system;
use crate::systems::input::snapshot_input;
use crate::systems::locomotion::locomotion_system;
use crate::systems::movement::movement_system;
use crate::systems::time::update_world_time;

/// One controllable actor with its camera, driven frame by frame.
pub struct LocomotionController {
    world: World,
    schedule: Schedule,
    actor: Entity,
    clock: FrameClock,
}

impl LocomotionController {
    /// Build a controller whose model arrives through `bridge`.
    pub fn new(config: LocomotionConfig, bridge: AssetLoadBridge) -> Self {
        let mut world = World::new();

        world.insert_resource(WorldTime::default());
        world.insert_resource(config.input_state());
        world.insert_resource(KeyState::default());
        world.insert_resource(config.follow_camera());
        world.insert_resource(Diagnostics::default());
        world.insert_resource(bridge);

        let actor = world
            .spawn((Player, Transform3D::default(), config.kinematics(), Locomotion::new()))
            .id();
        world.insert_resource(config);

        world.spawn(Observer::new(observe_locomotion_changed));
        world.spawn(Observer::new(cycle_camera_preset_observer));
        world.spawn(Observer::new(observe_model_loaded));
        world.spawn(Observer::new(observe_asset_load_failed));
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                snapshot_input,
                poll_model_load,
                locomotion_system,
                movement_system,
                camera_follow_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            actor,
            clock: FrameClock::new(),
        }
    }

    /// Build a controller that loads `config.model_path` on a background thread.
    pub fn with_manifest(config: LocomotionConfig) -> Self {
        let bridge = spawn_manifest_load(config.model_path.clone());
        Self::new(config, bridge)
    }

    /// Queue a raw device event. It takes effect at the next frame.
    pub fn handle_input(&mut self, event: RawInputEvent) {
        self.world.resource_mut::<InputState>().push(event);
    }

    /// Move the camera to the next shoulder preset.
    ///
    /// The returned disposition tells the host to suppress the native
    /// behavior of the gesture that asked for it.
    pub fn cycle_camera_preset(&mut self) -> GestureDisposition {
        self.world.trigger(CycleCameraPresetEvent {});
        GestureDisposition::PreventDefault
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Advance one frame given the host's monotonic elapsed time in seconds.
    ///
    /// The first call only primes the clock.
    pub fn tick(&mut self, elapsed: f64) {
        let dt = self.clock.sample(elapsed);
        self.update(dt);
    }

    pub fn actor(&self) -> Entity {
        self.actor
    }

    pub fn is_loaded(&self) -> bool {
        self.world.get::<ModelLoaded>(self.actor).is_some()
    }

    /// Actor position in world space.
    pub fn position(&self) -> Vec3 {
        self.world
            .get::<Transform3D>(self.actor)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO)
    }

    /// Actor orientation; identity until the model has loaded.
    pub fn rotation(&self) -> Quat {
        if !self.is_loaded() {
            return Quat::IDENTITY;
        }
        self.world
            .get::<Transform3D>(self.actor)
            .map(|t| t.rotation)
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn velocity(&self) -> Vec3 {
        self.world
            .get::<Kinematics>(self.actor)
            .map(|k| k.velocity)
            .unwrap_or(Vec3::ZERO)
    }

    /// Latest camera pose.
    pub fn camera(&self) -> CameraTransform {
        self.world.resource::<FollowCamera>().transform
    }

    pub fn camera_preset(&self) -> ShoulderPreset {
        self.world.resource::<FollowCamera>().preset
    }

    pub fn current_state(&self) -> Option<LocomotionState> {
        self.world
            .get::<Locomotion>(self.actor)
            .and_then(|l| l.current())
    }

    /// The actor's mixer, once the model has loaded.
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.world.get::<AnimationMixer>(self.actor)
    }

    pub fn keys(&self) -> KeyState {
        *self.world.resource::<KeyState>()
    }

    pub fn load_status(&self) -> &LoadStatus {
        self.world.resource::<AssetLoadBridge>().status()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.world.resource::<Diagnostics>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
