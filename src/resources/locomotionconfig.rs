//! Locomotion tuning resource.
//!
//! Holds every constant the locomotion core reads: damping and acceleration
//! profile, cross-fade window, camera rig and input device selection. Safe
//! defaults are built in; an INI file can override any subset of them.
//!
//! # Configuration File Format
//!
//! ```ini
//! [movement]
//! damping_x = -0.0005
//! damping_y = -0.0001
//! damping_z = -5.0
//! acceleration_x = 1.0
//! acceleration_y = 0.25
//! acceleration_z = 50.0
//! turbo_multiplier = 2.0
//! turn_rate = 4.0
//!
//! [animation]
//! cross_fade = 0.5
//!
//! [camera]
//! lateral_spread = 5.0
//! height = 3.0
//! follow_distance = 7.0
//! lookat_x = 5.0
//! lookat_y = 3.0
//! lookat_z = 25.0
//! smoothing_base = 0.001
//!
//! [input]
//! mobile = false
//! keyboard_on_mobile = true
//! turbo_touch_threshold = 100.0
//!
//! [model]
//! path = assets/models/fox.json
//! scale = 0.025
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;
use std::path::PathBuf;

use crate::components::animationmixer::AnimationMixer;
use crate::components::kinematics::{
    DEFAULT_ACCELERATION, DEFAULT_DAMPING, DEFAULT_TURBO_MULTIPLIER, DEFAULT_TURN_RATE,
    Kinematics,
};
use crate::error::LocomotionError;
use crate::resources::followcamera::{
    DEFAULT_FOLLOW_DISTANCE, DEFAULT_HEIGHT, DEFAULT_LATERAL_SPREAD, DEFAULT_LOOKAT,
    DEFAULT_SMOOTHING_BASE, FollowCamera,
};
use crate::resources::input::{DEFAULT_TURBO_TOUCH_THRESHOLD, InputState};

const DEFAULT_MODEL_PATH: &str = "assets/models/fox.json";
const DEFAULT_MODEL_SCALE: f32 = 0.025;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Locomotion configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LocomotionConfig {
    /// Per-axis damping coefficients.
    pub damping: Vec3,
    /// Per-axis acceleration profile; `y` is also the turn rate coefficient.
    pub acceleration: Vec3,
    /// Acceleration factor while `shift` is held.
    pub turbo_multiplier: f32,
    /// Turn speed in multiples of PI per second.
    pub turn_rate: f32,
    /// Animation blend window in seconds.
    pub cross_fade: f32,
    /// Sideways offset of the camera per shoulder preset step.
    pub camera_lateral_spread: f32,
    /// Camera height above the actor.
    pub camera_height: f32,
    /// Camera distance behind the actor.
    pub camera_follow_distance: f32,
    /// Look-at point in the actor's local frame.
    pub camera_lookat: Vec3,
    /// Fraction of the distance to the ideal camera pose left after one second.
    pub camera_smoothing_base: f32,
    /// Run with touch input.
    pub mobile: bool,
    /// Also accept the keyboard when running with touch input.
    pub keyboard_on_mobile: bool,
    /// Forward swipes above this screen y engage turbo.
    pub turbo_touch_threshold: f32,
    /// Model manifest to load.
    pub model_path: PathBuf,
    /// Uniform scale applied to the loaded model.
    pub model_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LocomotionConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            acceleration: DEFAULT_ACCELERATION,
            turbo_multiplier: DEFAULT_TURBO_MULTIPLIER,
            turn_rate: DEFAULT_TURN_RATE,
            cross_fade: AnimationMixer::DEFAULT_CROSS_FADE,
            camera_lateral_spread: DEFAULT_LATERAL_SPREAD,
            camera_height: DEFAULT_HEIGHT,
            camera_follow_distance: DEFAULT_FOLLOW_DISTANCE,
            camera_lookat: DEFAULT_LOOKAT,
            camera_smoothing_base: DEFAULT_SMOOTHING_BASE,
            mobile: false,
            keyboard_on_mobile: true,
            turbo_touch_threshold: DEFAULT_TURBO_TOUCH_THRESHOLD,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_scale: DEFAULT_MODEL_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), LocomotionError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| LocomotionError::Config(format!("failed to load config file: {e}")))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: damping={:?} acceleration={:?} turbo={} cross_fade={}s mobile={} model={:?}",
            self.damping,
            self.acceleration,
            self.turbo_multiplier,
            self.cross_fade,
            self.mobile,
            self.model_path
        );

        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            config.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };
        let boolean =
            |section: &str, key: &str| -> Option<bool> { config.getbool(section, key).ok().flatten() };

        // [movement] section
        if let Some(v) = float("movement", "damping_x") {
            self.damping.x = v;
        }
        if let Some(v) = float("movement", "damping_y") {
            self.damping.y = v;
        }
        if let Some(v) = float("movement", "damping_z") {
            self.damping.z = v;
        }
        if let Some(v) = float("movement", "acceleration_x") {
            self.acceleration.x = v;
        }
        if let Some(v) = float("movement", "acceleration_y") {
            self.acceleration.y = v;
        }
        if let Some(v) = float("movement", "acceleration_z") {
            self.acceleration.z = v;
        }
        if let Some(v) = float("movement", "turbo_multiplier") {
            self.turbo_multiplier = v;
        }
        if let Some(v) = float("movement", "turn_rate") {
            self.turn_rate = v;
        }

        // [animation] section
        if let Some(v) = float("animation", "cross_fade") {
            self.cross_fade = v;
        }

        // [camera] section
        if let Some(v) = float("camera", "lateral_spread") {
            self.camera_lateral_spread = v;
        }
        if let Some(v) = float("camera", "height") {
            self.camera_height = v;
        }
        if let Some(v) = float("camera", "follow_distance") {
            self.camera_follow_distance = v;
        }
        if let Some(v) = float("camera", "lookat_x") {
            self.camera_lookat.x = v;
        }
        if let Some(v) = float("camera", "lookat_y") {
            self.camera_lookat.y = v;
        }
        if let Some(v) = float("camera", "lookat_z") {
            self.camera_lookat.z = v;
        }
        if let Some(v) = float("camera", "smoothing_base") {
            self.camera_smoothing_base = v;
        }

        // [input] section
        if let Some(v) = boolean("input", "mobile") {
            self.mobile = v;
        }
        if let Some(v) = boolean("input", "keyboard_on_mobile") {
            self.keyboard_on_mobile = v;
        }
        if let Some(v) = float("input", "turbo_touch_threshold") {
            self.turbo_touch_threshold = v;
        }

        // [model] section
        if let Some(path) = config.get("model", "path") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(v) = float("model", "scale") {
            self.model_scale = v;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), LocomotionError> {
        let mut config = Ini::new();
        let mut put = |section: &str, key: &str, value: String| {
            config.set(section, key, Some(value));
        };

        put("movement", "damping_x", self.damping.x.to_string());
        put("movement", "damping_y", self.damping.y.to_string());
        put("movement", "damping_z", self.damping.z.to_string());
        put("movement", "acceleration_x", self.acceleration.x.to_string());
        put("movement", "acceleration_y", self.acceleration.y.to_string());
        put("movement", "acceleration_z", self.acceleration.z.to_string());
        put("movement", "turbo_multiplier", self.turbo_multiplier.to_string());
        put("movement", "turn_rate", self.turn_rate.to_string());

        put("animation", "cross_fade", self.cross_fade.to_string());

        put("camera", "lateral_spread", self.camera_lateral_spread.to_string());
        put("camera", "height", self.camera_height.to_string());
        put("camera", "follow_distance", self.camera_follow_distance.to_string());
        put("camera", "lookat_x", self.camera_lookat.x.to_string());
        put("camera", "lookat_y", self.camera_lookat.y.to_string());
        put("camera", "lookat_z", self.camera_lookat.z.to_string());
        put("camera", "smoothing_base", self.camera_smoothing_base.to_string());

        put("input", "mobile", self.mobile.to_string());
        put("input", "keyboard_on_mobile", self.keyboard_on_mobile.to_string());
        put("input", "turbo_touch_threshold", self.turbo_touch_threshold.to_string());

        put("model", "path", self.model_path.display().to_string());
        put("model", "scale", self.model_scale.to_string());

        config
            .write(&self.config_path)
            .map_err(|e| LocomotionError::Config(format!("failed to save config file: {e}")))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Kinematic body built from the movement section.
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            turbo_multiplier: self.turbo_multiplier,
            turn_rate: self.turn_rate,
            ..Kinematics::with_profile(self.damping, self.acceleration)
        }
    }

    /// Camera rig built from the camera section.
    pub fn follow_camera(&self) -> FollowCamera {
        FollowCamera {
            lateral_spread: self.camera_lateral_spread,
            height: self.camera_height,
            follow_distance: self.camera_follow_distance,
            lookat: self.camera_lookat,
            smoothing_base: self.camera_smoothing_base,
            ..FollowCamera::default()
        }
    }

    /// Input aggregator built from the input section.
    pub fn input_state(&self) -> InputState {
        let mut input = InputState::for_device(self.mobile, self.keyboard_on_mobile);
        input.turbo_touch_threshold = self.turbo_touch_threshold;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_components() {
        let config = LocomotionConfig::new();
        assert_eq!(config.kinematics(), Kinematics::new());
        assert_eq!(config.cross_fade, 0.5);
        assert_eq!(config.camera_lookat, Vec3::new(5.0, 3.0, 25.0));
        assert!(!config.mobile);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = LocomotionConfig::with_path("/definitely/not/here/config.ini");
        let err = config.load_from_file().unwrap_err();
        assert!(matches!(err, LocomotionError::Config(_)));
        assert_eq!(config.damping, DEFAULT_DAMPING);
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[movement]\nacceleration_z = 80.0\n\n[input]\nmobile = true").unwrap();

        let mut config = LocomotionConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.acceleration.z, 80.0);
        assert_eq!(config.acceleration.x, DEFAULT_ACCELERATION.x);
        assert!(config.mobile);
        assert!(config.keyboard_on_mobile);
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let mut saved = LocomotionConfig::with_path(&path);
        saved.cross_fade = 0.25;
        saved.camera_height = 4.5;
        saved.model_path = PathBuf::from("models/wolf.json");
        saved.save_to_file().unwrap();

        let mut loaded = LocomotionConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_input_state_follows_device_flags() {
        let config = LocomotionConfig {
            mobile: true,
            keyboard_on_mobile: false,
            turbo_touch_threshold: 64.0,
            ..LocomotionConfig::new()
        };
        let input = config.input_state();
        assert!(input.touch_enabled);
        assert!(!input.keyboard_enabled);
        assert_eq!(input.turbo_touch_threshold, 64.0);
    }
}
