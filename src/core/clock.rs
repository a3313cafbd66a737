use std::time::Instant;

use super::frame::FrameTime;
use crate::traits::TimeSource;

/// Longest delta a single tick may report; a stalled frame cannot teleport the camera
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Monotonic display clock
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    frames: u64,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for Clock {
    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = now
            .duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        self.last_tick = now;
        self.frames += 1;
        FrameTime::new(self.frames, delta, self.elapsed())
    }

    fn elapsed(&self) -> f32 {
        self.last_tick.duration_since(self.start).as_secs_f32()
    }
}

/// Fixed-step clock for tests and headless runs
#[derive(Debug, Clone)]
pub struct ManualClock {
    step: f32,
    elapsed: f32,
    frames: u64,
}

impl ManualClock {
    /// Clock advancing by `step` seconds per tick; negative steps count as zero
    pub fn new(step: f32) -> Self {
        Self {
            step: step.clamp(0.0, MAX_FRAME_DELTA),
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Advance by an arbitrary delta instead of the fixed step
    pub fn advance(&mut self, delta: f32) -> FrameTime {
        let delta = delta.clamp(0.0, MAX_FRAME_DELTA);
        self.elapsed += delta;
        self.frames += 1;
        FrameTime::new(self.frames, delta, self.elapsed)
    }
}

impl TimeSource for ManualClock {
    fn tick(&mut self) -> FrameTime {
        self.advance(self.step)
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
