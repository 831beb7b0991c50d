//! Frame clock.

use crate::config::ClockConfig;
use std::time::{Duration, Instant};

/// Measures wall time between frames and turns it into a bounded Δt.
#[derive(Debug, Clone)]
pub struct FrameClock {
    min_delta: f32,
    max_delta: f32,
    last: Instant,
}

impl FrameClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            min_delta: 1.0 / config.max_fps.max(1) as f32,
            max_delta: config.max_delta,
            last: Instant::now(),
        }
    }

    /// Duration of one frame at the target rate.
    #[inline]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f32(self.min_delta)
    }

    /// Bound a measured frame time to `[1 / max_fps, max_delta]`.
    #[inline]
    pub fn bound(&self, elapsed: f32) -> f32 {
        elapsed.max(self.min_delta).min(self.max_delta.max(self.min_delta))
    }

    /// Δt for the frame that just ended; starts timing the next one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.bound(elapsed)
    }
}
