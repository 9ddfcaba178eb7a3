//! # Graphics Module
//!
//! Everything that talks to the GPU apart from the simulation kernel itself.
//!
//! - **Rendering** ([`rendering`]) - surface/device ownership and the presentation pass
//! - **Resources** ([`resources`]) - texture creation for generations and depth/stencil
//! - **Shaders** ([`shaders`]) - WGSL sources and compile-or-fail module creation

pub mod rendering;
pub mod resources;
pub mod shaders;

// Re-export commonly used types
pub use rendering::{Presentation, RenderEngine};
pub use shaders::ShaderSources;
