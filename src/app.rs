use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::config::LifeConfig;
use crate::error::{LifeError, LifeResult};
use crate::frame::{FrameEvent, FrameLoop, PointerButton};
use crate::gfx::{
    rendering::{Presentation, RenderEngine},
    shaders::{compile_shader, ShaderSources},
};
use crate::performance::FpsReport;
use crate::simulation::{seed, LifeSimulation};

pub const WINDOW_TITLE: &str = "Conway";

/// Opens the window and runs the simulation until it is closed
///
/// Startup failures (window, adapter, device, shaders) stop the event loop and
/// are returned here.
pub fn run(config: LifeConfig) -> LifeResult<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LifeApp::new(config);
    event_loop.run_app(&mut app)?;
    app.finish()
}

pub struct LifeApp {
    config: LifeConfig,
    gpu: Option<GpuState>,
    frame_loop: FrameLoop,
    start: Instant,
    error: Option<LifeError>,
}

// Fields drop in declaration order: pipelines and images before the device,
// the device before the window its surface points into.
struct GpuState {
    simulation: LifeSimulation,
    presentation: Presentation,
    render_engine: RenderEngine,
    window: Arc<Window>,
}

impl LifeApp {
    pub fn new(config: LifeConfig) -> Self {
        let frame_loop = FrameLoop::new(config.width, config.height);
        Self {
            config,
            gpu: None,
            frame_loop,
            start: Instant::now(),
            error: None,
        }
    }

    /// The error that stopped the loop, if any
    pub fn finish(mut self) -> LifeResult<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: LifeError) {
        log::error!("{}", error);
        self.error = Some(error);
        self.frame_loop.stop();
        event_loop.exit();
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> LifeResult<GpuState> {
        let fullscreen = self
            .config
            .fullscreen
            .then_some(Fullscreen::Borderless(None));
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_fullscreen(fullscreen);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let (width, height) = window.inner_size().into();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        ))?;
        let device = render_engine.device();

        let sources = ShaderSources::load(self.config.shader_dir.as_deref())?;
        let step_shader = compile_shader(device, "life_step", &sources.life_step)?;
        let present_shader = compile_shader(device, "present", &sources.present)?;

        let first = seed::initial_generation(&self.config);
        let simulation = LifeSimulation::new(
            device,
            render_engine.queue(),
            &step_shader,
            &first,
            self.config.radius,
        )?;
        let presentation = Presentation::new(
            device,
            &present_shader,
            render_engine.surface_format(),
            simulation.textures(),
        )?;

        Ok(GpuState {
            simulation,
            presentation,
            render_engine,
            window,
        })
    }

    fn handle_event(&mut self, event_loop: &ActiveEventLoop, event: FrameEvent) {
        if let (FrameEvent::Resized { width, height }, Some(gpu)) = (event, self.gpu.as_mut()) {
            gpu.render_engine.resize(width, height);
            let device = gpu.render_engine.device();
            if self.config.resize_simulation && gpu.simulation.resize_to(device, width, height) {
                gpu.presentation.rebind(device, gpu.simulation.textures());
            }
        }

        self.frame_loop.handle(event);
        if !self.frame_loop.is_running() {
            event_loop.exit();
        }
    }

    /// Step, draw, advance the clock, present
    fn redraw(&mut self) -> LifeResult<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        if !self.frame_loop.is_running() {
            return Ok(());
        }

        let Some(frame) = gpu.render_engine.acquire_frame()? else {
            return Ok(());
        };

        let device = gpu.render_engine.device();
        let queue = gpu.render_engine.queue();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        let stepped = gpu
            .simulation
            .step(&mut encoder, queue, self.frame_loop.context());
        gpu.presentation.encode(
            &mut encoder,
            &frame.view,
            gpu.render_engine.depth_texture(),
            gpu.render_engine.surface_size(),
            stepped,
        );
        queue.submit(std::iter::once(encoder.finish()));

        if let Some(report) = self
            .frame_loop
            .finish_frame(self.start.elapsed().as_secs_f64())
        {
            let simulation = self.config.log_population.then_some(&gpu.simulation);
            log_report(&report, simulation, &gpu.render_engine);
        }

        gpu.window.pre_present_notify();
        frame.present();
        Ok(())
    }
}

fn log_report(
    report: &FpsReport,
    simulation: Option<&LifeSimulation>,
    render_engine: &RenderEngine,
) {
    let Some(simulation) = simulation else {
        log::info!("{}", report);
        return;
    };

    match simulation.read_current(render_engine.device(), render_engine.queue()) {
        Ok(grid) => log::info!(
            "{}, generation {}, population {}",
            report,
            simulation.generation(),
            grid.population()
        ),
        Err(e) => {
            log::info!("{}", report);
            log::warn!("{}", e);
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

impl ApplicationHandler for LifeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.error.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(gpu) => {
                let (width, height) = gpu.render_engine.surface_size();
                self.gpu = Some(gpu);
                self.frame_loop.handle(FrameEvent::Resized { width, height });
                self.start = Instant::now();
                log::info!("Running; Escape quits, V toggles vsync");
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.handle_event(event_loop, FrameEvent::Quit),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => self.handle_event(event_loop, FrameEvent::Quit),
                KeyCode::KeyV => {
                    self.config.vsync = !self.config.vsync;
                    if let Some(gpu) = self.gpu.as_mut() {
                        gpu.render_engine.set_vsync(self.config.vsync);
                    }
                }
                _ => (),
            },
            WindowEvent::CursorMoved { position, .. } => self.handle_event(
                event_loop,
                FrameEvent::PointerMoved {
                    x: position.x,
                    y: position.y,
                },
            ),
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    self.handle_event(
                        event_loop,
                        FrameEvent::Button {
                            button,
                            pressed: state == ElementState::Pressed,
                        },
                    );
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.handle_event(event_loop, FrameEvent::Resized { width, height })
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.gpu.take().is_some() {
            log::info!(
                "Released GPU resources after {} frames",
                self.frame_loop.context().clock.frame_index
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_paints_right_erases() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Middle), None);
    }

    #[test]
    fn finish_without_error_is_ok() {
        let app = LifeApp::new(LifeConfig::default());
        assert!(app.finish().is_ok());
    }
}
