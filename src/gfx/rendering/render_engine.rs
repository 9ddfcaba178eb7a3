//! WGPU device and surface ownership
//!
//! The engine owns the window surface, the device and queue, and the
//! depth/stencil buffer the presentation pass clears. It knows nothing about
//! cells; the frame driver records simulation and presentation work into
//! encoders created from [`RenderEngine::device`].

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::{LifeError, LifeResult};
use crate::gfx::resources::TextureResource;

/// An acquired swapchain image
///
/// Dropping a frame without calling [`Frame::present`] discards it.
pub struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Frame {
    pub fn present(self) {
        self.surface_texture.present();
    }
}

/// Surface, device and queue for one window
///
/// The RenderEngine handles the low-level graphics state:
/// - Adapter selection (compute shaders are required)
/// - Surface configuration and present mode (VSync)
/// - Depth/stencil buffer sized to the surface
/// - Frame acquisition with recovery from lost or outdated surfaces
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    present_modes: Vec<wgpu::PresentMode>,
    depth_texture: TextureResource,
    format: TextureFormat,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Fifo presentation when true
    ///
    /// # Errors
    /// Fails when no adapter can present to the window, when the adapter cannot
    /// run compute shaders, or when the device request is refused.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> LifeResult<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        if !adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return Err(LifeError::ComputeUnsupported);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("Uncaptured GPU error: {}", error);
        }));

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(LifeError::SurfaceUnsupported)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let present_modes = surface_capabilities.present_modes;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: select_present_mode(&present_modes, vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface {}x{} {:?}, {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            present_modes,
            depth_texture,
            format,
        })
    }

    /// Resizes the surface and recreates the depth/stencil buffer
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Set VSync (vertical synchronization) state
    ///
    /// Falls back to Fifo when the surface has no immediate mode.
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = select_present_mode(&self.present_modes, enable);
        self.surface.configure(&self.device, &self.config);
        log::info!("Present mode {:?}", self.config.present_mode);
    }

    /// Acquires the next swapchain image
    ///
    /// `Ok(None)` means this frame should be skipped: the surface was lost or
    /// outdated (and has been reconfigured), or acquisition timed out.
    pub fn acquire_frame(&mut self) -> LifeResult<Option<Frame>> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory acquiring surface texture");
                return Err(LifeError::OutOfMemory);
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(None);
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Some(Frame {
            surface_texture,
            view,
        }))
    }

    /// Returns current surface dimensions in physical pixels
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn depth_texture(&self) -> &TextureResource {
        &self.depth_texture
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Fifo for VSync, otherwise Immediate when the surface offers it
pub fn select_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if !vsync && available.contains(&wgpu::PresentMode::Immediate) {
        wgpu::PresentMode::Immediate
    } else {
        wgpu::PresentMode::Fifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::PresentMode;

    #[test]
    fn vsync_always_uses_fifo() {
        let all = [PresentMode::Fifo, PresentMode::Immediate, PresentMode::Mailbox];
        assert_eq!(select_present_mode(&all, true), PresentMode::Fifo);
    }

    #[test]
    fn no_vsync_prefers_immediate() {
        let all = [PresentMode::Fifo, PresentMode::Immediate];
        assert_eq!(select_present_mode(&all, false), PresentMode::Immediate);
        assert_eq!(select_present_mode(&[PresentMode::Fifo], false), PresentMode::Fifo);
    }
}
