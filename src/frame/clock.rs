//! Per-frame timing

/// Elapsed time, frame delta and frame counter
///
/// Advanced exactly once per completed frame by [`super::FrameLoop`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    /// Seconds since the loop started
    pub time: f64,
    /// Seconds between this frame and the previous one
    pub delta: f64,
    /// Completed frames
    pub frame_index: u64,
}

impl ClockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to `elapsed` seconds since start and counts a frame
    ///
    /// A clock that would run backwards is held at its previous time.
    pub fn advance(&mut self, elapsed: f64) {
        let elapsed = elapsed.max(self.time);
        self.delta = elapsed - self.time;
        self.time = elapsed;
        self.frame_index += 1;
    }

    /// Instantaneous frame rate, zero until a nonzero delta was seen
    pub fn instant_fps(&self) -> f64 {
        if self.delta > 0.0 {
            1.0 / self.delta
        } else {
            0.0
        }
    }
}
