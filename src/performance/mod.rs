//! # Frame Rate Statistics
//!
//! Rolling FPS over fixed windows of frames. Each frame adds its
//! instantaneous rate (`1 / delta`) to an accumulator; when the frame counter
//! reaches a multiple of [`FPS_WINDOW`] the mean over the window is reported
//! and the accumulator starts again from zero.
//!
//! ## Usage
//!
//! ```rust
//! use gpu_life::frame::ClockState;
//! use gpu_life::performance::FrameStats;
//!
//! let mut clock = ClockState::new();
//! let mut stats = FrameStats::default();
//!
//! for frame in 1..=30 {
//!     clock.advance(frame as f64 / 60.0);
//!     if let Some(report) = stats.record(&clock) {
//!         log::info!("{}", report);
//!     }
//! }
//! ```

use std::fmt;

use crate::frame::ClockState;

/// Frames per reporting window
pub const FPS_WINDOW: u64 = 30;

/// Mean frame rate over one completed window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsReport {
    /// Frame index the window ended on
    pub frame: u64,
    /// Elapsed seconds at that frame
    pub time: f64,
    /// Mean of the per-frame rates in the window
    pub fps: f64,
}

impl fmt::Display for FpsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame number {}, time {:.3}, {:.1} fps",
            self.frame, self.time, self.fps
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    fps_accum: f64,
    frames_in_window: u64,
}

impl FrameStats {
    /// Accumulates the frame the clock just completed
    pub fn record(&mut self, clock: &ClockState) -> Option<FpsReport> {
        self.fps_accum += clock.instant_fps();
        self.frames_in_window += 1;

        if clock.frame_index % FPS_WINDOW != 0 {
            return None;
        }

        let report = FpsReport {
            frame: clock.frame_index,
            time: clock.time,
            fps: self.fps_accum / FPS_WINDOW as f64,
        };
        self.reset();
        Some(report)
    }

    /// Rolling sum of per-frame rates since the last report
    pub fn accumulated(&self) -> f64 {
        self.fps_accum
    }

    pub fn frames_in_window(&self) -> u64 {
        self.frames_in_window
    }

    pub fn reset(&mut self) {
        self.fps_accum = 0.0;
        self.frames_in_window = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(frames: u64, delta: f64) -> (FrameStats, Vec<FpsReport>) {
        let mut clock = ClockState::new();
        let mut stats = FrameStats::default();
        let mut reports = Vec::new();
        for frame in 1..=frames {
            clock.advance(frame as f64 * delta);
            reports.extend(stats.record(&clock));
        }
        (stats, reports)
    }

    #[test]
    fn no_report_before_window_completes() {
        let (stats, reports) = run(29, 0.01);
        assert!(reports.is_empty());
        assert_eq!(stats.frames_in_window(), 29);
        assert!(stats.accumulated() > 0.0);
    }

    #[test]
    fn report_resets_accumulator() {
        let (stats, reports) = run(30, 0.02);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].frame, 30);
        assert!((reports[0].fps - 50.0).abs() < 1e-6);
        assert!((reports[0].time - 0.6).abs() < 1e-9);
        assert_eq!(stats.accumulated(), 0.0);
        assert_eq!(stats.frames_in_window(), 0);
    }

    #[test]
    fn exactly_one_report_per_window() {
        let (_, reports) = run(95, 0.01);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].frame, 90);
    }

    #[test]
    fn zero_delta_frames_add_nothing() {
        let mut clock = ClockState::new();
        let mut stats = FrameStats::default();
        for _ in 0..30 {
            clock.advance(0.0);
            stats.record(&clock);
        }
        assert_eq!(clock.frame_index, 30);
        assert_eq!(stats.accumulated(), 0.0);
    }

    #[test]
    fn report_line_format() {
        let report = FpsReport {
            frame: 60,
            time: 1.0,
            fps: 59.94,
        };
        assert_eq!(report.to_string(), "frame number 60, time 1.000, 59.9 fps");
    }
}
