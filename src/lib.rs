// src/lib.rs
//! GPU Game of Life
//!
//! Conway's Game of Life advanced by a wgpu compute pass over a ping-pong pair
//! of single-channel images and drawn to a winit window every frame.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod performance;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{run, LifeApp};
pub use config::LifeConfig;
pub use error::{LifeError, LifeResult};
