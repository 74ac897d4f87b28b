//! Locomotion states of the controllable actor.
//!
//! Three states drive the actor's animation: `survey` (idle), `walk` and
//! `run`. Each one plays the clip of the same name and decides, from the
//! per-frame [`KeyState`], which state should come next:
//!
//! | State  | Sees                                       | Goes to |
//! |--------|--------------------------------------------|---------|
//! | survey | forward && shift                           | run     |
//! | survey | forward && !shift                          | walk    |
//! | walk   | !(forward \|\| backward)                   | survey  |
//! | walk   | (forward \|\| backward) && shift && !backward | run  |
//! | run    | !forward                                   | survey  |
//! | run    | forward && !shift                          | walk    |
//!
//! Entering a state cross-fades from the previous state's clip. Between walk
//! and run the incoming clip is started at the same phase as the outgoing one
//! (scaled by the ratio of their durations), so footsteps stay in step across
//! the speed change.

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::animationmixer::AnimationMixer;
use crate::components::statemachine::{MachineState, StateMachine, Transition};
use crate::error::LocomotionError;
use crate::resources::input::KeyState;

/// One of the actor's locomotion states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    Survey,
    Walk,
    Run,
}

impl LocomotionState {
    pub const SURVEY: &'static str = "survey";
    pub const WALK: &'static str = "walk";
    pub const RUN: &'static str = "run";

    /// Animation clip played while in this state.
    pub fn clip_name(&self) -> &'static str {
        self.name()
    }

    /// Whether entering `self` from `previous` keeps the clip phase.
    fn phase_matches(&self, previous: &LocomotionState) -> bool {
        matches!(
            (self, previous),
            (LocomotionState::Walk, LocomotionState::Run)
                | (LocomotionState::Run, LocomotionState::Walk)
        )
    }

    fn next_state(&self, keys: &KeyState) -> Option<&'static str> {
        match self {
            LocomotionState::Survey => {
                if keys.forward {
                    if keys.shift {
                        return Some(Self::RUN);
                    }
                    return Some(Self::WALK);
                }
                None
            }
            LocomotionState::Walk => {
                if !(keys.forward || keys.backward) {
                    return Some(Self::SURVEY);
                }
                if keys.shift && !keys.backward {
                    return Some(Self::RUN);
                }
                None
            }
            LocomotionState::Run => {
                if !keys.forward {
                    return Some(Self::SURVEY);
                }
                if !keys.shift {
                    return Some(Self::WALK);
                }
                None
            }
        }
    }
}

impl MachineState for LocomotionState {
    type Input = KeyState;
    type Context = AnimationMixer;

    fn name(&self) -> &'static str {
        match self {
            LocomotionState::Survey => Self::SURVEY,
            LocomotionState::Walk => Self::WALK,
            LocomotionState::Run => Self::RUN,
        }
    }

    fn enter(
        &mut self,
        previous: Option<&Self>,
        mixer: &mut AnimationMixer,
    ) -> Result<(), LocomotionError> {
        let clip = self.clip_name();
        if !mixer.has_action(clip) {
            debug!("[{}] animation clip '{}' is missing", self.name(), clip);
            return Err(LocomotionError::missing_clip(self.name(), clip));
        }

        let Some(previous) = previous else {
            debug!("[{}] first activation", self.name());
            if let Some(action) = mixer.action_mut(clip) {
                action.set_time(0.0);
                action.set_effective_time_scale(1.0);
                action.set_effective_weight(1.0);
                action.play();
            }
            return Ok(());
        };

        let prev_clip = previous.clip_name();
        let Some((prev_time, prev_duration)) = mixer
            .action(prev_clip)
            .map(|a| (a.time, a.duration()))
        else {
            debug!("[{}] previous clip '{}' is missing", previous.name(), prev_clip);
            return Err(LocomotionError::missing_clip(previous.name(), prev_clip));
        };

        debug!("[{}] -> [{}]", previous.name(), self.name());

        let phase_matches = self.phase_matches(previous);
        let cross_fade = mixer.cross_fade_duration;
        if let Some(action) = mixer.action_mut(clip) {
            action.set_enabled(true);
            if phase_matches && prev_duration > 0.0 {
                let ratio = action.duration() / prev_duration;
                action.set_time(prev_time * ratio);
            } else {
                action.set_time(0.0);
                action.set_effective_time_scale(1.0);
                action.set_effective_weight(1.0);
            }
        }
        mixer.cross_fade(clip, prev_clip, cross_fade, true);

        if let Some(action) = mixer.action_mut(clip) {
            action.play();
        }
        Ok(())
    }

    fn exit(&mut self, _mixer: &mut AnimationMixer) {
        // The outgoing clip keeps running; the incoming state fades it out.
    }

    fn update(
        &mut self,
        _dt: f32,
        keys: &KeyState,
        _mixer: &mut AnimationMixer,
    ) -> Option<&'static str> {
        self.next_state(keys)
    }
}

/// Locomotion state machine attached to the actor.
#[derive(Component, Debug)]
pub struct Locomotion {
    pub machine: StateMachine<LocomotionState>,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new()
    }
}

impl Locomotion {
    /// Create a machine with `survey`, `walk` and `run` registered and no
    /// state active yet.
    pub fn new() -> Self {
        let machine = StateMachine::new()
            .with_state(LocomotionState::SURVEY, || LocomotionState::Survey)
            .with_state(LocomotionState::WALK, || LocomotionState::Walk)
            .with_state(LocomotionState::RUN, || LocomotionState::Run);
        Self { machine }
    }

    pub fn current(&self) -> Option<LocomotionState> {
        self.machine.current().copied()
    }

    pub fn set_state(
        &mut self,
        name: &str,
        mixer: &mut AnimationMixer,
    ) -> Result<Option<Transition>, LocomotionError> {
        self.machine.set_state(name, mixer)
    }

    pub fn update(
        &mut self,
        dt: f32,
        keys: &KeyState,
        mixer: &mut AnimationMixer,
    ) -> Result<Option<Transition>, LocomotionError> {
        self.machine.update(dt, keys, mixer)
    }
}
