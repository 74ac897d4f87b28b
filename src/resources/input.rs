//! Input aggregation resources.
//!
//! Raw device events (keyboard and touch) are pushed into the [`InputState`]
//! resource as they arrive. Once per frame,
//! [`snapshot_input`](crate::systems::input::snapshot_input) folds the queued
//! events into the logical action states and publishes a [`KeyState`]
//! snapshot. Every other system reads only the snapshot, so handlers and the
//! frame tick never observe each other halfway through.
//!
//! Default bindings: W/S forward/backward, A/D left/right, Shift turbo.
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Threshold (in screen pixels from the top) under which a forward swipe
/// also engages turbo.
pub const DEFAULT_TURBO_TOUCH_THRESHOLD: f32 = 100.0;

/// Host-agnostic key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Shift,
    Other,
}

/// Raw device event as delivered by the host platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A touch point moved to screen coordinates `(x, y)`.
    TouchMove { x: f32, y: f32 },
    /// All touches ended.
    TouchEnd,
}

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the action is currently active.
    pub active: bool,
    /// Whether the action became active this frame.
    pub just_pressed: bool,
    /// Whether the action became inactive this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: Key,
}

impl BoolState {
    fn bound_to(key_binding: Key) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound_to(Key::Other)
    }
}

/// Logical key snapshot consumed by locomotion and movement.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub shift: bool,
}

/// Live input aggregator, mutated by event handlers.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub forward: BoolState,
    pub backward: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub shift: BoolState,
    /// Accept keyboard events.
    pub keyboard_enabled: bool,
    /// Accept touch events.
    pub touch_enabled: bool,
    /// Forward swipes above this screen y also engage turbo.
    pub turbo_touch_threshold: f32,
    previous_touch: (Option<f32>, Option<f32>),
    pending: SmallVec<[RawInputEvent; 8]>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            forward: BoolState::bound_to(Key::W),
            backward: BoolState::bound_to(Key::S),
            left: BoolState::bound_to(Key::A),
            right: BoolState::bound_to(Key::D),
            shift: BoolState::bound_to(Key::Shift),
            keyboard_enabled: true,
            touch_enabled: false,
            turbo_touch_threshold: DEFAULT_TURBO_TOUCH_THRESHOLD,
            previous_touch: (None, None),
            pending: SmallVec::new(),
        }
    }
}

impl InputState {
    /// Configure which devices are listened to.
    ///
    /// Desktop listens to the keyboard only. Mobile listens to touch, and to
    /// the keyboard only when `keyboard_on_mobile` is set.
    pub fn for_device(mobile: bool, keyboard_on_mobile: bool) -> Self {
        Self {
            keyboard_enabled: !mobile || keyboard_on_mobile,
            touch_enabled: mobile,
            ..Default::default()
        }
    }

    /// Queue a raw event; it is applied at the next frame snapshot.
    pub fn push(&mut self, event: RawInputEvent) {
        self.pending.push(event);
    }

    /// Number of events waiting for the next snapshot.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take the queued events, oldest first.
    pub fn drain_pending(&mut self) -> SmallVec<[RawInputEvent; 8]> {
        std::mem::take(&mut self.pending)
    }

    fn actions_mut(&mut self) -> [&mut BoolState; 5] {
        [
            &mut self.forward,
            &mut self.backward,
            &mut self.left,
            &mut self.right,
            &mut self.shift,
        ]
    }

    fn set_key(&mut self, key: Key, down: bool) {
        for action in self.actions_mut() {
            if action.key_binding == key {
                action.active = down;
            }
        }
    }

    /// Apply one raw event to the action states immediately.
    pub fn apply(&mut self, event: RawInputEvent) {
        match event {
            RawInputEvent::KeyDown(key) if self.keyboard_enabled => self.set_key(key, true),
            RawInputEvent::KeyUp(key) if self.keyboard_enabled => self.set_key(key, false),
            RawInputEvent::TouchMove { x, y } if self.touch_enabled => self.touch_move(x, y),
            RawInputEvent::TouchEnd if self.touch_enabled => self.touch_end(),
            _ => {}
        }
    }

    fn touch_move(&mut self, x: f32, y: f32) {
        let (prev_x, prev_y) = self.previous_touch;
        if let Some(prev_x) = prev_x {
            if x > prev_x {
                self.right.active = true;
            } else {
                self.left.active = true;
            }
        }
        if let Some(prev_y) = prev_y {
            if y > prev_y {
                self.backward.active = true;
            } else {
                self.forward.active = true;
                if y <= self.turbo_touch_threshold {
                    self.shift.active = true;
                }
            }
        }
        self.previous_touch = (Some(x), Some(y));
    }

    fn touch_end(&mut self) {
        for action in self.actions_mut() {
            action.active = false;
        }
        self.previous_touch = (None, None);
    }

    /// Refresh edge flags against the previous frame's snapshot.
    pub fn update_edges(&mut self, previous: &KeyState) {
        let was = [
            previous.forward,
            previous.backward,
            previous.left,
            previous.right,
            previous.shift,
        ];
        for (action, was_active) in self.actions_mut().into_iter().zip(was) {
            action.just_pressed = action.active && !was_active;
            action.just_released = !action.active && was_active;
        }
    }

    /// Current logical key state.
    pub fn keys(&self) -> KeyState {
        KeyState {
            forward: self.forward.active,
            backward: self.backward.active,
            left: self.left.active,
            right: self.right.active,
            shift: self.shift.active,
        }
    }
}
