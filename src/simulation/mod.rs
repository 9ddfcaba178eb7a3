// src/simulation/mod.rs
//! Game of Life simulation
//!
//! The GPU side ([`LifeSimulation`]) owns the generation image pair and the
//! compute step. The CPU side ([`CellGrid`]) is a reference automaton used to
//! build seeds and to check what the kernel produced.

pub mod grid;
pub mod patterns;
pub mod seed;
pub mod step;
pub mod textures;

pub use grid::{Brush, CellGrid};
pub use patterns::SeedPattern;
pub use step::{dispatch_size, SimulationStep, StepOutput, StepUniforms, WORKGROUP_SIZE};
pub use textures::{reallocation_target, GenerationTextures};

use crate::error::LifeResult;
use crate::frame::FrameContext;

/// The generation pair together with the kernel that advances it
pub struct LifeSimulation {
    textures: GenerationTextures,
    step: SimulationStep,
    radius: f32,
}

impl LifeSimulation {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shader: &wgpu::ShaderModule,
        first: &CellGrid,
        radius: f32,
    ) -> LifeResult<Self> {
        let textures = GenerationTextures::new(device, queue, first);
        let step = SimulationStep::new(
            device,
            shader,
            &textures,
            StepUniforms::new([0.0; 4], radius, 0.0),
        )?;
        let (width, height) = textures.dimensions();
        log::info!(
            "Simulation {}x{} ({} live cells), dispatch {:?}",
            width,
            height,
            first.population(),
            step.dispatch()
        );

        Ok(Self {
            textures,
            step,
            radius,
        })
    }

    /// Records one generation driven by this frame's pointer and clock
    pub fn step(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        context: &FrameContext,
    ) -> StepOutput {
        let uniforms = StepUniforms::from_context(context, self.radius);
        self.step.encode(encoder, queue, &mut self.textures, uniforms)
    }

    /// Records one generation with explicit uniforms
    pub fn step_with(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        uniforms: StepUniforms,
    ) -> StepOutput {
        self.step.encode(encoder, queue, &mut self.textures, uniforms)
    }

    /// Replaces the pair with cleared images of a new size
    pub fn reallocate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.textures.reallocate(device, width, height);
        self.step.rebind(device, &self.textures);
    }

    /// Follows the window size, returning whether the pair was replaced
    pub fn resize_to(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        match reallocation_target(self.dimensions(), width, height) {
            Some((width, height)) => {
                self.reallocate(device, width, height);
                true
            }
            None => false,
        }
    }

    pub fn upload(&self, queue: &wgpu::Queue, grid: &CellGrid) {
        self.textures.upload(queue, grid);
    }

    pub fn read_current(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> LifeResult<CellGrid> {
        self.textures.read_current(device, queue)
    }

    pub fn textures(&self) -> &GenerationTextures {
        &self.textures
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.textures.dimensions()
    }

    pub fn dispatch(&self) -> (u32, u32) {
        self.step.dispatch()
    }

    pub fn generation(&self) -> u64 {
        self.step.generation()
    }
}
