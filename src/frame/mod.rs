//! Per-frame state and the loop that drives it
//!
//! No globals: the clock, pointer and viewport live in a [`FrameContext`] that
//! is passed by reference to whatever needs them.

pub mod clock;
pub mod context;
pub mod driver;
pub mod event;
pub mod input;
pub mod viewport;

pub use clock::ClockState;
pub use context::FrameContext;
pub use driver::{FrameLoop, LoopState};
pub use event::FrameEvent;
pub use input::{InputState, PointerButton};
pub use viewport::ViewportState;
