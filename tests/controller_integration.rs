//! Frame-by-frame tests of the locomotion controller.
//!
//! Every test drives a [`LocomotionController`] the way a host would: raw
//! input events in, `update(dt)` once per frame, poses and state read back.
//! Models are delivered through an in-memory [`AssetLoadBridge`] unless a
//! test exercises the manifest loader itself.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bevy_ecs::observer::On;
use glam::{Quat, Vec3};

use actor_locomotion::components::animationmixer::AnimationClip;
use actor_locomotion::components::locomotion::LocomotionState;
use actor_locomotion::controller::LocomotionController;
use actor_locomotion::error::LocomotionError;
use actor_locomotion::events::locomotion::LocomotionChangedEvent;
use actor_locomotion::resources::assetload::{AssetLoadBridge, LoadCompleter, LoadStatus, LoadedModel};
use actor_locomotion::resources::followcamera::CameraTransform;
use actor_locomotion::resources::input::{Key, RawInputEvent};
use actor_locomotion::resources::locomotionconfig::LocomotionConfig;

const EPSILON: f32 = 1e-4;
const FRAME: f32 = 1.0 / 60.0;

const SURVEY_DURATION: f32 = 3.4166667;
const WALK_DURATION: f32 = 0.7083333;
const RUN_DURATION: f32 = 1.1583333;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn fox() -> LoadedModel {
    LoadedModel {
        name: "Fox".into(),
        scale: Some(0.025),
        clips: vec![
            AnimationClip::new("Survey", SURVEY_DURATION),
            AnimationClip::new("Walk", WALK_DURATION),
            AnimationClip::new("Run", RUN_DURATION),
        ],
    }
}

fn pending_controller() -> (LocomotionController, LoadCompleter) {
    let (completer, bridge) = AssetLoadBridge::pending("fox.json");
    (LocomotionController::new(LocomotionConfig::new(), bridge), completer)
}

fn loaded_controller(model: LoadedModel) -> LocomotionController {
    let (mut controller, completer) = pending_controller();
    completer.complete(model);
    controller.update(0.0);
    assert!(controller.is_loaded());
    controller
}

fn press(controller: &mut LocomotionController, key: Key) {
    controller.handle_input(RawInputEvent::KeyDown(key));
}

fn release(controller: &mut LocomotionController, key: Key) {
    controller.handle_input(RawInputEvent::KeyUp(key));
}

#[test]
fn no_motion_before_load() {
    let (mut controller, _completer) = pending_controller();
    press(&mut controller, Key::W);
    press(&mut controller, Key::A);
    press(&mut controller, Key::Shift);

    for _ in 0..120 {
        controller.update(FRAME);
    }

    assert!(!controller.is_loaded());
    assert_eq!(controller.load_status(), &LoadStatus::Pending);
    assert_eq!(controller.position(), Vec3::ZERO);
    assert_eq!(controller.rotation(), Quat::IDENTITY);
    assert_eq!(controller.camera(), CameraTransform::default());
    assert_eq!(controller.current_state(), None);
    // input is still aggregated while waiting
    assert!(controller.keys().forward);
}

#[test]
fn survey_walk_survey() {
    let mut controller = loaded_controller(fox());
    assert_eq!(controller.current_state(), Some(LocomotionState::Survey));

    press(&mut controller, Key::W);
    controller.update(0.0);
    assert_eq!(controller.current_state(), Some(LocomotionState::Walk));

    let mixer = controller.mixer().unwrap();
    let walk = mixer.action("walk").unwrap();
    assert!(approx_eq(walk.time, 0.0));
    assert!(walk.is_playing());
    let fade_in = walk.fading().unwrap();
    assert!(approx_eq(fade_in.duration, 0.5));
    assert!(approx_eq(fade_in.from, 0.0) && approx_eq(fade_in.to, 1.0));
    let fade_out = mixer.action("survey").unwrap().fading().unwrap();
    assert!(approx_eq(fade_out.from, 1.0) && approx_eq(fade_out.to, 0.0));

    release(&mut controller, Key::W);
    controller.update(FRAME);
    assert_eq!(controller.current_state(), Some(LocomotionState::Survey));
}

#[test]
fn cross_fade_completes_and_disables_outgoing() {
    let mut controller = loaded_controller(fox());
    press(&mut controller, Key::W);
    for _ in 0..60 {
        controller.update(FRAME);
    }
    let mixer = controller.mixer().unwrap();
    assert!(approx_eq(mixer.effective_weight("walk"), 1.0));
    assert!(approx_eq(mixer.effective_weight("survey"), 0.0));
    assert!(!mixer.action("survey").unwrap().enabled);
    assert!(mixer.action("walk").unwrap().warping().is_none());
}

#[test]
fn walk_to_run_keeps_phase() {
    let mut controller = loaded_controller(fox());
    press(&mut controller, Key::W);
    controller.update(0.0);
    for _ in 0..20 {
        controller.update(FRAME);
    }
    assert_eq!(controller.current_state(), Some(LocomotionState::Walk));
    let walk_time = controller.mixer().unwrap().action("walk").unwrap().time;
    assert!(walk_time > 0.0);

    press(&mut controller, Key::Shift);
    controller.update(0.0);
    assert_eq!(controller.current_state(), Some(LocomotionState::Run));
    let run_time = controller.mixer().unwrap().action("run").unwrap().time;
    assert!(approx_eq(run_time, walk_time * RUN_DURATION / WALK_DURATION));
}

#[test]
fn run_to_walk_keeps_phase() {
    let mut controller = loaded_controller(fox());
    press(&mut controller, Key::W);
    press(&mut controller, Key::Shift);
    controller.update(0.0);
    assert_eq!(controller.current_state(), Some(LocomotionState::Run));
    for _ in 0..25 {
        controller.update(FRAME);
    }
    let run_time = controller.mixer().unwrap().action("run").unwrap().time;

    release(&mut controller, Key::Shift);
    controller.update(0.0);
    assert_eq!(controller.current_state(), Some(LocomotionState::Walk));
    let walk_time = controller.mixer().unwrap().action("walk").unwrap().time;
    assert!(approx_eq(walk_time, run_time * WALK_DURATION / RUN_DURATION));
}

#[test]
fn backward_with_shift_stays_in_walk() {
    let mut controller = loaded_controller(fox());
    press(&mut controller, Key::W);
    controller.update(FRAME);
    release(&mut controller, Key::W);
    press(&mut controller, Key::S);
    press(&mut controller, Key::Shift);
    controller.update(FRAME);
    assert_eq!(controller.current_state(), Some(LocomotionState::Walk));
}

#[test]
fn transitions_are_announced() {
    let mut controller = loaded_controller(fox());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    controller
        .world_mut()
        .add_observer(move |trigger: On<LocomotionChangedEvent>| {
            let event = trigger.event();
            seen_clone.lock().unwrap().push((event.from, event.to));
        });
    controller.world_mut().flush();

    press(&mut controller, Key::W);
    controller.update(FRAME);
    controller.update(FRAME);
    press(&mut controller, Key::Shift);
    controller.update(FRAME);
    release(&mut controller, Key::W);
    controller.update(FRAME);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (Some("survey"), "walk"),
            (Some("walk"), "run"),
            (Some("run"), "survey"),
        ]
    );
}

#[test]
fn walking_moves_and_turns_the_actor() {
    let mut controller = loaded_controller(fox());
    press(&mut controller, Key::W);
    for _ in 0..30 {
        controller.update(FRAME);
    }
    let straight = controller.position();
    assert!(straight.z > 0.0);
    assert!(approx_eq(straight.x, 0.0));

    press(&mut controller, Key::A);
    for _ in 0..30 {
        controller.update(FRAME);
    }
    // half a second of turning at 4 * PI * 0.25 rad/s
    let expected = Quat::from_axis_angle(Vec3::Y, std::f32::consts::PI * 0.5);
    assert!(controller.rotation().angle_between(expected) < 1e-3);
    assert!(controller.position().x > 0.0);
}

#[test]
fn camera_preset_cycle() {
    let mut controller = loaded_controller(fox());
    let mut seen = vec![controller.camera_preset().index()];
    for _ in 0..6 {
        controller.cycle_camera_preset();
        seen.push(controller.camera_preset().index());
    }
    assert_eq!(seen, vec![-1, 0, 1, -1, 0, 1, -1]);
}

#[test]
fn camera_settles_behind_the_actor() {
    let mut controller = loaded_controller(fox());
    for _ in 0..600 {
        controller.update(FRAME);
    }
    let camera = controller.camera();
    assert!(camera.position.distance(Vec3::new(-5.0, 3.0, -7.0)) < 1e-2);
    let facing = camera.rotation * Vec3::NEG_Z;
    let wanted = (Vec3::new(5.0, 3.0, 25.0) - camera.position).normalize();
    assert!(facing.distance(wanted) < 1e-2);

    controller.cycle_camera_preset();
    for _ in 0..600 {
        controller.update(FRAME);
    }
    assert!(controller.camera().position.distance(Vec3::new(0.0, 3.0, -7.0)) < 1e-2);
}

#[test]
fn load_failure_keeps_actor_inert() {
    let (mut controller, completer) = pending_controller();
    completer.fail("404 not found");
    press(&mut controller, Key::W);
    for _ in 0..60 {
        controller.update(FRAME);
    }

    assert!(matches!(controller.load_status(), LoadStatus::Failed(_)));
    assert_eq!(controller.position(), Vec3::ZERO);
    assert_eq!(controller.camera(), CameraTransform::default());
    let diagnostics = controller.diagnostics();
    assert_eq!(
        diagnostics.load_failure,
        Some(LocomotionError::asset_load("fox.json", "404 not found"))
    );
    assert!(diagnostics.last_state_error.is_none());
}

#[test]
fn missing_clip_is_reported_apart_from_load_failure() {
    let mut model = fox();
    model.clips.retain(|c| c.name != "Run");
    let mut controller = loaded_controller(model);

    press(&mut controller, Key::W);
    press(&mut controller, Key::Shift);
    controller.update(FRAME);

    assert_eq!(controller.current_state(), Some(LocomotionState::Survey));
    let diagnostics = controller.diagnostics();
    assert!(diagnostics.load_failure.is_none());
    assert_eq!(
        diagnostics.last_state_error,
        Some(LocomotionError::missing_clip("run", "run"))
    );
}

#[test]
fn manifest_loads_in_background() {
    let mut config = LocomotionConfig::new();
    config.model_path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/models/fox.json").into();
    let mut controller = LocomotionController::with_manifest(config);

    let deadline = Instant::now() + Duration::from_secs(5);
    while !controller.is_loaded() {
        assert!(Instant::now() < deadline, "manifest never loaded");
        assert!(controller.diagnostics().load_failure.is_none());
        controller.update(0.0);
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(controller.current_state(), Some(LocomotionState::Survey));
    let scale = controller
        .world()
        .get::<actor_locomotion::components::transform3d::Transform3D>(controller.actor())
        .unwrap()
        .scale;
    assert!(approx_eq(scale, 0.025));
}
