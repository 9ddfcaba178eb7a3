// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Surface and device ownership, and the pass that puts a generation on screen.

pub mod presentation;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use presentation::Presentation;
pub use render_engine::{Frame, RenderEngine};
pub use vertex::QuadVertex;
