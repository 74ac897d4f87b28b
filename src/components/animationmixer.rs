//! Clip playback and cross-fading for a skinned actor.
//!
//! The [`AnimationMixer`] component owns one [`ClipAction`] per animation clip,
//! keyed by the lowercase clip name. Locomotion states never own actions; they
//! address them by name through the mixer, which is free to advance them every
//! frame regardless of which state is current.
//!
//! # Cross-fading
//!
//! [`AnimationMixer::cross_fade`] schedules a weight ramp on both actions
//! (outgoing 1 → 0, incoming 0 → 1). With warping, the time scales are ramped
//! too, so each clip starts the blend at the other clip's cadence and ends it
//! at its own:
//!
//! - outgoing: `1` → `outgoing.duration / incoming.duration`
//! - incoming: `incoming.duration / outgoing.duration` → `1`
//!
//! A finished fade-out disables the action. A finished warp commits its end
//! scale as the action's time scale.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Named, time-seekable animation clip description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in seconds.
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Linear ramp of a value over a window of seconds.
///
/// The ramp counts its own elapsed time, so it does not depend on how long
/// the mixer has been running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    /// Seconds since the ramp started.
    pub elapsed: f32,
    /// Length of the ramp in seconds.
    pub duration: f32,
    pub from: f32,
    pub to: f32,
}

impl Ramp {
    fn new(duration: f32, from: f32, to: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            from,
            to,
        }
    }

    /// Current value, clamped to the window.
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let alpha = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * alpha
    }

    fn step(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback handle for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    clip: AnimationClip,
    /// Local playback time in seconds, in `[0, duration)` while looping.
    pub time: f32,
    time_scale: f32,
    weight: f32,
    /// Disabled actions neither advance nor contribute weight.
    pub enabled: bool,
    playing: bool,
    fade: Option<Ramp>,
    warp: Option<Ramp>,
}

impl ClipAction {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            enabled: true,
            playing: false,
            fade: None,
            warp: None,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn duration(&self) -> f32 {
        self.clip.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start (or keep) playing. Idempotent.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop playback and rewind, dropping any scheduled fade or warp.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
        self.fade = None;
        self.warp = None;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Set the time scale and cancel any warp in progress.
    pub fn set_effective_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
        self.warp = None;
    }

    /// Set the weight and cancel any fade in progress.
    pub fn set_effective_weight(&mut self, weight: f32) {
        self.weight = weight;
        self.fade = None;
    }

    /// Base time scale, ignoring a warp in progress.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Base weight, ignoring a fade in progress.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Scheduled fade, if one is running.
    pub fn fading(&self) -> Option<&Ramp> {
        self.fade.as_ref()
    }

    /// Scheduled warp, if one is running.
    pub fn warping(&self) -> Option<&Ramp> {
        self.warp.as_ref()
    }

    fn schedule_fade(&mut self, duration: f32, from: f32, to: f32) {
        self.fade = Some(Ramp::new(duration, from, to));
    }

    fn schedule_warp(&mut self, duration: f32, from: f32, to: f32) {
        self.warp = Some(Ramp::new(duration, from, to));
    }

    /// Weight this action contributes right now.
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        match &self.fade {
            Some(ramp) => self.weight * ramp.value(),
            None => self.weight,
        }
    }

    /// Time scale this action plays at right now.
    pub fn effective_time_scale(&self) -> f32 {
        match &self.warp {
            Some(ramp) => ramp.value(),
            None => self.time_scale,
        }
    }

    /// Advance by a step of `dt` seconds.
    ///
    /// Ramps progress whether or not the clip is playing; playback time only
    /// moves while the action is playing and enabled.
    fn advance(&mut self, dt: f32) {
        if let Some(fade) = self.fade.as_mut() {
            fade.step(dt);
        }
        if let Some(warp) = self.warp.as_mut() {
            warp.step(dt);
        }

        if self.playing && self.enabled {
            self.time += dt * self.effective_time_scale();
            let duration = self.clip.duration;
            if duration > 0.0 {
                self.time = self.time.rem_euclid(duration);
            }
        }

        if let Some(warp) = self.warp
            && warp.is_finished()
        {
            self.time_scale = warp.to;
            self.warp = None;
        }

        if let Some(fade) = self.fade
            && fade.is_finished()
        {
            self.fade = None;
            if fade.to == 0.0 {
                self.enabled = false;
            }
        }
    }
}

/// Owner of every clip action of one actor.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationMixer {
    /// Seconds the mixer has been advanced in total.
    time: f64,
    actions: FxHashMap<String, ClipAction>,
    /// Blend window used by locomotion states when they cross-fade.
    pub cross_fade_duration: f32,
}

impl AnimationMixer {
    /// Default blend window, in seconds.
    pub const DEFAULT_CROSS_FADE: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            time: 0.0,
            actions: FxHashMap::default(),
            cross_fade_duration: Self::DEFAULT_CROSS_FADE,
        }
    }

    /// Build a mixer holding one action per clip, keyed by lowercase name.
    pub fn from_clips(clips: impl IntoIterator<Item = AnimationClip>) -> Self {
        let mut mixer = Self::new();
        for clip in clips {
            mixer.add_clip(clip);
        }
        mixer
    }

    pub fn with_cross_fade(mut self, seconds: f32) -> Self {
        self.cross_fade_duration = seconds;
        self
    }

    /// Register a clip. A clip with the same lowercase name is replaced.
    pub fn add_clip(&mut self, clip: AnimationClip) {
        let key = clip.name.to_lowercase();
        self.actions.insert(key, ClipAction::new(clip));
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn action(&self, name: &str) -> Option<&ClipAction> {
        self.actions.get(name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut ClipAction> {
        self.actions.get_mut(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Current weight of `name`, 0 when absent.
    pub fn effective_weight(&self, name: &str) -> f32 {
        self.actions
            .get(name)
            .map(ClipAction::effective_weight)
            .unwrap_or(0.0)
    }

    /// Cross-fade from `outgoing` into `incoming` over `duration` seconds.
    ///
    /// Returns false (and schedules nothing) when either action is missing or
    /// both names are the same.
    pub fn cross_fade(&mut self, incoming: &str, outgoing: &str, duration: f32, warp: bool) -> bool {
        if incoming == outgoing {
            return false;
        }
        let (Some(in_duration), Some(out_duration)) = (
            self.actions.get(incoming).map(ClipAction::duration),
            self.actions.get(outgoing).map(ClipAction::duration),
        ) else {
            return false;
        };
        if let Some(out) = self.actions.get_mut(outgoing) {
            out.schedule_fade(duration, 1.0, 0.0);
            if warp && in_duration > 0.0 {
                out.schedule_warp(duration, 1.0, out_duration / in_duration);
            }
        }
        if let Some(inc) = self.actions.get_mut(incoming) {
            inc.schedule_fade(duration, 0.0, 1.0);
            if warp && out_duration > 0.0 {
                inc.schedule_warp(duration, in_duration / out_duration, 1.0);
            }
        }
        true
    }

    /// Advance every playing action by `dt` seconds of wall-clock time.
    pub fn update(&mut self, dt: f32) {
        self.time += f64::from(dt);
        for action in self.actions.values_mut() {
            action.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn mixer() -> AnimationMixer {
        AnimationMixer::from_clips([
            AnimationClip::new("Walk", 0.8),
            AnimationClip::new("Run", 1.2),
        ])
    }

    #[test]
    fn test_actions_are_keyed_lowercase() {
        let m = mixer();
        assert!(m.has_action("walk"));
        assert!(m.has_action("run"));
        assert!(!m.has_action("Walk"));
        assert_eq!(m.action("walk").unwrap().clip().name, "Walk");
    }

    #[test]
    fn test_update_advances_only_playing_actions() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.update(0.25);
        assert!(approx_eq(m.action("walk").unwrap().time, 0.25));
        assert!(approx_eq(m.action("run").unwrap().time, 0.0));
    }

    #[test]
    fn test_time_loops_modulo_duration() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.update(1.0);
        assert!(approx_eq(m.action("walk").unwrap().time, 0.2));
    }

    #[test]
    fn test_time_scale_affects_advance() {
        let mut m = mixer();
        let walk = m.action_mut("walk").unwrap();
        walk.play();
        walk.set_effective_time_scale(0.5);
        m.update(0.4);
        assert!(approx_eq(m.action("walk").unwrap().time, 0.2));
    }

    #[test]
    fn test_disabled_action_does_not_advance() {
        let mut m = mixer();
        let walk = m.action_mut("walk").unwrap();
        walk.play();
        walk.set_enabled(false);
        m.update(0.3);
        assert!(approx_eq(m.action("walk").unwrap().time, 0.0));
        assert!(approx_eq(m.effective_weight("walk"), 0.0));
    }

    #[test]
    fn test_stop_rewinds() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.update(0.3);
        m.action_mut("walk").unwrap().stop();
        let walk = m.action("walk").unwrap();
        assert!(!walk.is_playing());
        assert!(approx_eq(walk.time, 0.0));
    }

    #[test]
    fn test_cross_fade_schedules_both_ramps() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        assert!(m.cross_fade("run", "walk", 0.5, false));

        let run_fade = *m.action("run").unwrap().fading().unwrap();
        let walk_fade = *m.action("walk").unwrap().fading().unwrap();
        assert!(approx_eq(run_fade.duration, 0.5));
        assert!(approx_eq(run_fade.from, 0.0) && approx_eq(run_fade.to, 1.0));
        assert!(approx_eq(walk_fade.from, 1.0) && approx_eq(walk_fade.to, 0.0));
        assert!(m.action("run").unwrap().warping().is_none());
    }

    #[test]
    fn test_cross_fade_with_warp_uses_duration_ratios() {
        let mut m = mixer();
        m.cross_fade("run", "walk", 0.5, true);
        let run_warp = *m.action("run").unwrap().warping().unwrap();
        let walk_warp = *m.action("walk").unwrap().warping().unwrap();
        assert!(approx_eq(run_warp.from, 1.2 / 0.8));
        assert!(approx_eq(run_warp.to, 1.0));
        assert!(approx_eq(walk_warp.from, 1.0));
        assert!(approx_eq(walk_warp.to, 0.8 / 1.2));
    }

    #[test]
    fn test_weights_blend_halfway() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.action_mut("run").unwrap().play();
        m.cross_fade("run", "walk", 0.5, false);
        m.update(0.25);
        assert!(approx_eq(m.effective_weight("run"), 0.5));
        assert!(approx_eq(m.effective_weight("walk"), 0.5));
    }

    #[test]
    fn test_finished_fade_out_disables_outgoing() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.action_mut("run").unwrap().play();
        m.cross_fade("run", "walk", 0.5, true);
        m.update(0.3);
        m.update(0.3);
        let walk = m.action("walk").unwrap();
        let run = m.action("run").unwrap();
        assert!(!walk.enabled);
        assert!(walk.fading().is_none());
        assert!(run.enabled);
        assert!(run.fading().is_none());
        assert!(run.warping().is_none());
        assert!(approx_eq(run.time_scale(), 1.0));
        assert!(approx_eq(m.effective_weight("run"), 1.0));
    }

    #[test]
    fn test_cross_fade_completes_after_long_play() {
        let mut m = mixer();
        m.action_mut("walk").unwrap().play();
        m.action_mut("run").unwrap().play();
        m.update(600_000.0);
        assert!(m.cross_fade("run", "walk", 0.5, true));
        for _ in 0..60 {
            m.update(1.0 / 60.0);
        }
        assert!(approx_eq(m.effective_weight("run"), 1.0));
        assert!(!m.action("walk").unwrap().enabled);
        assert!(m.action("run").unwrap().warping().is_none());
        assert!((m.time() - 600_001.0).abs() < 1e-6);
    }

    #[test]
    fn test_cross_fade_rejects_missing_or_same() {
        let mut m = mixer();
        assert!(!m.cross_fade("walk", "walk", 0.5, true));
        assert!(!m.cross_fade("walk", "survey", 0.5, true));
        assert!(m.action("walk").unwrap().fading().is_none());
    }

    #[test]
    fn test_setters_cancel_ramps() {
        let mut m = mixer();
        m.cross_fade("run", "walk", 0.5, true);
        let run = m.action_mut("run").unwrap();
        run.set_effective_weight(1.0);
        run.set_effective_time_scale(1.0);
        assert!(run.fading().is_none());
        assert!(run.warping().is_none());
    }
}
