//! Headless locomotion demo.
//!
//! Loads the configuration and the model manifest, then drives the actor
//! with scripted pseudo-random input for a fixed number of frames, logging
//! state changes, the actor pose and the camera pose as it goes.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 600 --seed 3
//! ```

use std::path::PathBuf;

use actor_locomotion::controller::LocomotionController;
use actor_locomotion::resources::assetload::LoadStatus;
use actor_locomotion::resources::input::{Key, RawInputEvent};
use actor_locomotion::resources::locomotionconfig::LocomotionConfig;
use clap::Parser;
use log::{error, info, warn};

/// Third-person actor locomotion demo
#[derive(Parser)]
#[command(version, about = "Drives a locomotion controller with scripted input and logs what it does.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Model manifest to load instead of the configured one.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for the scripted input.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
}

const SCRIPTED_KEYS: [Key; 5] = [Key::W, Key::S, Key::A, Key::D, Key::Shift];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = LocomotionConfig::with_path(&cli.config);
    if cli.config.exists() {
        if let Err(e) = config.load_from_file() {
            warn!("{e}, using defaults");
        }
    } else {
        info!("No config at {:?}, using defaults", cli.config);
    }
    if let Some(manifest) = cli.manifest {
        config.model_path = manifest;
    }

    if let Some(path) = cli.save_config {
        config.config_path = path;
        if let Err(e) = config.save_to_file() {
            error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let fps = if cli.fps >= 1.0 { cli.fps } else { 60.0 };
    let frames_per_second = fps as u32;
    let mut controller = LocomotionController::with_manifest(config);
    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let mut held = [false; SCRIPTED_KEYS.len()];

    for frame in 0..cli.frames {
        let elapsed = frame as f64 / f64::from(fps);

        // Every half second, flip one key and sometimes move the camera.
        if frame % (frames_per_second / 2).max(1) == 0 {
            let i = rng.usize(..SCRIPTED_KEYS.len());
            held[i] = !held[i];
            let event = if held[i] {
                RawInputEvent::KeyDown(SCRIPTED_KEYS[i])
            } else {
                RawInputEvent::KeyUp(SCRIPTED_KEYS[i])
            };
            controller.handle_input(event);
            if rng.u8(..10) == 0 {
                controller.cycle_camera_preset();
            }
        }

        controller.tick(elapsed);

        if let LoadStatus::Failed(_) = controller.load_status() {
            break;
        }
        if frame % frames_per_second == 0 && controller.is_loaded() {
            let camera = controller.camera();
            info!(
                "t={:>6.2}s state={:<6} pos={:.2} cam={:.2}",
                elapsed,
                controller.current_state().map(|s| s.clip_name()).unwrap_or("-"),
                controller.position(),
                camera.position
            );
        }
    }

    let diagnostics = controller.diagnostics();
    if let Some(err) = &diagnostics.load_failure {
        error!("actor never loaded: {err}");
        std::process::exit(1);
    }
    if let Some(err) = &diagnostics.last_state_error {
        warn!(
            "{} locomotion error(s), last: {err}",
            diagnostics.state_error_count
        );
    }
    info!("final position {:.2}", controller.position());
}
