// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures for the generation images and the presentation pass.

pub mod texture_resource;

// Re-export main types
pub use texture_resource::TextureResource;
