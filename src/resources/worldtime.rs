//! Frame clock resource.
//!
//! [`WorldTime`] carries the scaled frame delta every system reads. It is
//! advanced once per frame by [`update_world_time`](crate::systems::time::update_world_time).
use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}

/// Derives frame deltas from a monotonic elapsed-time source.
///
/// The first sample only primes the clock and yields a zero delta. A sample
/// earlier than the previous one also yields zero. Samples are kept in `f64`
/// so hosts that report seconds since the epoch still get frame-sized deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Feed the current elapsed time in seconds and get the delta since the
    /// previous sample.
    pub fn sample(&mut self, elapsed: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (elapsed - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(elapsed);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_primes() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.sample(12.0), 0.0);
        assert!((clock.sample(12.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_sample_is_zero() {
        let mut clock = FrameClock::new();
        clock.sample(3.0);
        assert_eq!(clock.sample(2.0), 0.0);
        assert!((clock.sample(2.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_large_elapsed_keeps_frame_resolution() {
        let mut clock = FrameClock::new();
        let base = 1.7e9;
        clock.sample(base);
        for i in 1..6 {
            let dt = clock.sample(base + f64::from(i) / 60.0);
            assert!((dt - 1.0 / 60.0).abs() < 1e-4, "frame {i} gave {dt}");
        }
    }
}
