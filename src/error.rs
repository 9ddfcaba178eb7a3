//! Error types for the GPU Life application
//!
//! Everything here is a startup-fatal condition: the frame loop never retries,
//! it logs the error and the process exits with a nonzero status.

use std::path::PathBuf;

/// Result alias used throughout the crate
pub type LifeResult<T> = Result<T, LifeError>;

#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the selected adapter")]
    SurfaceUnsupported,

    #[error("adapter does not support compute shaders")]
    ComputeUnsupported,

    #[error("failed to read shader '{path}': {source}")]
    ShaderLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compilation or pipeline linking failed; `diagnostics` carries the
    /// validator output verbatim.
    #[error("shader '{label}' failed to compile:\n{diagnostics}")]
    ShaderCompile { label: String, diagnostics: String },

    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,

    #[error("failed to read back generation texture: {0}")]
    Readback(String),
}
