/// Timing for one frame tick - shared by every component in that tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub number: u64,
    /// Seconds since the previous tick, never negative
    pub delta: f32,
    /// Seconds since the session started
    pub elapsed: f32,
}

impl FrameTime {
    pub fn new(number: u64, delta: f32, elapsed: f32) -> Self {
        Self {
            number,
            delta,
            elapsed,
        }
    }
}
