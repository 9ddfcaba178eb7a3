//! The state bundle handed to every per-frame function

use super::{ClockState, FrameEvent, InputState, ViewportState};

/// Clock, pointer and viewport for the frame being built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub clock: ClockState,
    pub input: InputState,
    pub viewport: ViewportState,
}

impl FrameContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            clock: ClockState::new(),
            input: InputState::new(),
            viewport: ViewportState::new(width, height),
        }
    }

    /// Folds one event into the context
    ///
    /// Returns `false` when the event asks the loop to stop.
    pub fn apply(&mut self, event: &FrameEvent) -> bool {
        match *event {
            FrameEvent::Quit => return false,
            FrameEvent::PointerMoved { x, y } => {
                let (width, height) = self.viewport.dimensions();
                self.input.pointer_moved(x, y, width, height);
            }
            FrameEvent::Button { button, pressed } => self.input.set_button(button, pressed),
            FrameEvent::Resized { width, height } => {
                self.viewport.resize(width, height);
            }
        }
        true
    }
}
