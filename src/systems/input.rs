//! Input snapshot system.
//!
//! [`snapshot_input`] runs first in the frame. It folds every raw event
//! queued on [`InputState`] since the previous frame, in arrival order, and
//! publishes the result as the [`KeyState`] resource. Later systems read
//! only that snapshot.
use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::input::{InputState, KeyState};

/// Apply pending raw events and refresh the per-frame [`KeyState`].
pub fn snapshot_input(mut input: ResMut<InputState>, mut keys: ResMut<KeyState>) {
    let previous = *keys;
    for event in input.drain_pending() {
        input.apply(event);
    }
    input.update_edges(&previous);

    let snapshot = input.keys();
    if snapshot != previous {
        trace!("keys: {:?}", snapshot);
        *keys = snapshot;
    }
}
