use crate::core::FrameTime;

/// Frame timing source - a real display clock or a deterministic test clock
pub trait TimeSource {
    /// Advance to the next frame and report its timing
    fn tick(&mut self) -> FrameTime;

    /// Seconds since the source started
    fn elapsed(&self) -> f32;
}
