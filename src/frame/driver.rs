//! Frame loop state machine
//!
//! Owns the [`FrameContext`] and the frame statistics. The application feeds it
//! translated events and, once per drawn frame, the elapsed time; GPU work in
//! between is ordered by the caller (step, then present).

use super::{FrameContext, FrameEvent};
use crate::performance::{FpsReport, FrameStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    context: FrameContext,
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: LoopState::Running,
            context: FrameContext::new(width, height),
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Delivers one event; events after a stop are ignored
    pub fn handle(&mut self, event: FrameEvent) -> LoopState {
        if self.is_running() && !self.context.apply(&event) {
            log::info!("Quit requested after {} frames", self.context.clock.frame_index);
            self.state = LoopState::Stopped;
        }
        self.state
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    /// Advances the clock after a frame was drawn
    ///
    /// Returns a report every [`crate::performance::FPS_WINDOW`] frames.
    pub fn finish_frame(&mut self, elapsed: f64) -> Option<FpsReport> {
        self.context.clock.advance(elapsed);
        self.stats.record(&self.context.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PointerButton;

    #[test]
    fn quit_stops_and_later_events_are_ignored() {
        let mut frame_loop = FrameLoop::new(64, 64);
        assert_eq!(
            frame_loop.handle(FrameEvent::PointerMoved { x: 32.0, y: 32.0 }),
            LoopState::Running
        );
        assert_eq!(frame_loop.handle(FrameEvent::Quit), LoopState::Stopped);

        frame_loop.handle(FrameEvent::Button {
            button: PointerButton::Primary,
            pressed: true,
        });
        assert!(!frame_loop.context().input.primary);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn resize_only_touches_the_viewport() {
        let mut frame_loop = FrameLoop::new(64, 64);
        frame_loop.handle(FrameEvent::Resized {
            width: 128,
            height: 32,
        });
        assert_eq!(frame_loop.context().viewport.dimensions(), (128, 32));
        assert_eq!(frame_loop.context().clock.frame_index, 0);
    }

    #[test]
    fn reports_once_per_thirty_frames() {
        let mut frame_loop = FrameLoop::new(64, 64);
        let reports: Vec<FpsReport> = (1..=90)
            .filter_map(|frame| frame_loop.finish_frame(frame as f64 / 60.0))
            .collect();

        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports.iter().map(|r| r.frame).collect::<Vec<_>>(),
            vec![30, 60, 90]
        );
        assert!((reports[1].fps - 60.0).abs() < 1e-6);
    }
}
