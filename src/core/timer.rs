/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
    /// Ticks seen since the last fire
    ticks: u32,
}

impl Throttled {
    /// Create throttled timer with minimum interval; the first tick does not fire
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
            ticks: 0,
        }
    }

    /// Accumulate delta. Returns `(ticks, seconds)` covered by the window when it fires.
    pub fn try_tick(&mut self, delta: f32) -> Option<(u32, f32)> {
        self.time_since_last += delta.max(0.0);
        self.ticks += 1;

        if self.time_since_last >= self.min_interval {
            let window = (self.ticks, self.time_since_last);
            self.time_since_last = 0.0;
            self.ticks = 0;
            Some(window)
        } else {
            None
        }
    }
}
