//! One generation on the GPU
//!
//! [`SimulationStep::encode`] records a single compute pass that reads the
//! current image and writes the next one. The pass ends before the function
//! returns, and wgpu inserts the storage-write to sampled-read transition at
//! that boundary. The returned [`StepOutput`] is what the presentation pass
//! takes as input, so a frame cannot draw a generation that was never
//! stepped into its encoder.

use crate::error::LifeResult;
use crate::frame::FrameContext;
use crate::gfx::resources::TextureResource;
use crate::gfx::shaders::validated;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, UniformBuffer,
};

use super::textures::GenerationTextures;

/// Side length of the kernel's square workgroup
pub const WORKGROUP_SIZE: u32 = 8;

/// Workgroup counts covering a `width`x`height` image, rounding up
pub fn dispatch_size(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(WORKGROUP_SIZE), height.div_ceil(WORKGROUP_SIZE))
}

/// Uniform block of `life_step.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StepUniforms {
    /// Pointer x, y in [0, 1] (y up), primary held, secondary held
    pub mouse: [f32; 4],
    pub radius_mouse: f32,
    pub time: f32,
    _padding: [f32; 2],
}

impl StepUniforms {
    pub fn new(mouse: [f32; 4], radius_mouse: f32, time: f32) -> Self {
        Self {
            mouse,
            radius_mouse,
            time,
            _padding: [0.0; 2],
        }
    }

    pub fn from_context(context: &FrameContext, radius_mouse: f32) -> Self {
        Self::new(
            context.input.mouse(),
            radius_mouse,
            context.clock.time as f32,
        )
    }
}

/// Proof that a step was recorded into an encoder
///
/// Consumed by the presentation pass.
#[must_use = "the stepped generation should be presented"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutput {
    /// Number of completed steps, this one included
    pub generation: u64,
    /// Index of the image now holding the current generation
    pub current: usize,
}

pub struct SimulationStep {
    pipeline: wgpu::ComputePipeline,
    layout: BindGroupLayoutWithDesc,
    uniforms: UniformBuffer<StepUniforms>,
    // [0] reads image 0 and writes image 1, [1] the other way round
    bind_groups: [wgpu::BindGroup; 2],
    dispatch: (u32, u32),
    generation: u64,
}

impl SimulationStep {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        textures: &GenerationTextures,
        initial: StepUniforms,
    ) -> LifeResult<Self> {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_compute(binding_types::texture_2d_unfilterable())
            .next_binding_compute(binding_types::image_2d(
                TextureResource::CELL_FORMAT,
                wgpu::StorageTextureAccess::WriteOnly,
            ))
            .next_binding_compute(binding_types::uniform())
            .create(device, "Life Step Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Life Step Pipeline Layout"),
            bind_group_layouts: &[&layout.layout],
            push_constant_ranges: &[],
        });

        // Entry point and bindings are checked against the module here
        let pipeline = validated(device, "life_step", || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Life Step Pipeline"),
                layout: Some(&pipeline_layout),
                module: shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            })
        })?;

        let uniforms = UniformBuffer::new_with_data(device, &initial);
        let bind_groups = Self::create_bind_groups(device, &layout, &uniforms, textures);
        let (width, height) = textures.dimensions();

        Ok(Self {
            pipeline,
            layout,
            uniforms,
            bind_groups,
            dispatch: dispatch_size(width, height),
            generation: 0,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniforms: &UniformBuffer<StepUniforms>,
        textures: &GenerationTextures,
    ) -> [wgpu::BindGroup; 2] {
        let a = textures.texture(0);
        let b = textures.texture(1);
        [
            BindGroupBuilder::new(layout)
                .texture(&a.view)
                .texture(&b.view)
                .resource(uniforms.binding_resource())
                .create(device, "Life Step A -> B"),
            BindGroupBuilder::new(layout)
                .texture(&b.view)
                .texture(&a.view)
                .resource(uniforms.binding_resource())
                .create(device, "Life Step B -> A"),
        ]
    }

    /// Rebuilds bind groups and the dispatch grid after the pair was reallocated
    pub fn rebind(&mut self, device: &wgpu::Device, textures: &GenerationTextures) {
        self.bind_groups = Self::create_bind_groups(device, &self.layout, &self.uniforms, textures);
        let (width, height) = textures.dimensions();
        self.dispatch = dispatch_size(width, height);
        log::debug!(
            "Life step dispatch is now {}x{} workgroups",
            self.dispatch.0,
            self.dispatch.1
        );
    }

    pub fn dispatch(&self) -> (u32, u32) {
        self.dispatch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records one generation into `encoder` and swaps the pair's roles
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        textures: &mut GenerationTextures,
        uniforms: StepUniforms,
    ) -> StepOutput {
        self.uniforms.update_content(queue, uniforms);

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Life Step Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &self.bind_groups[textures.current_index()], &[]);
            compute_pass.dispatch_workgroups(self.dispatch.0, self.dispatch.1, 1);
        }

        textures.swap();
        self.generation += 1;

        StepOutput {
            generation: self.generation,
            current: textures.current_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_rounds_up() {
        assert_eq!(dispatch_size(256, 256), (32, 32));
        assert_eq!(dispatch_size(257, 1), (33, 1));
        assert_eq!(dispatch_size(1, 1), (1, 1));
        assert_eq!(dispatch_size(800, 600), (100, 75));
        assert_eq!(dispatch_size(13, 70), (2, 9));
    }

    #[test]
    fn dispatch_covers_every_cell() {
        for width in 1..40 {
            let (groups, _) = dispatch_size(width, 1);
            assert!(groups * WORKGROUP_SIZE >= width);
            assert!((groups - 1) * WORKGROUP_SIZE < width);
        }
    }

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        // vec4 + f32 + f32 + vec2 padding
        assert_eq!(std::mem::size_of::<StepUniforms>(), 32);
        let uniforms = StepUniforms::new([0.25, 0.75, 1.0, 0.0], 5.0, 2.5);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(floats, &[0.25, 0.75, 1.0, 0.0, 5.0, 2.5, 0.0, 0.0]);
    }
}
