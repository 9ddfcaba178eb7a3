//! Window-system events after translation

use super::input::PointerButton;

/// An event the frame loop reacts to
///
/// Produced from winit window events by the application; everything else
/// winit delivers is dropped before it gets here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    Quit,
    /// Pointer position in physical window pixels, origin top-left
    PointerMoved { x: f64, y: f64 },
    Button { button: PointerButton, pressed: bool },
    /// New surface size in physical pixels
    Resized { width: u32, height: u32 },
}
