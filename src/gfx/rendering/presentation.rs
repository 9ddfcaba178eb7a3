//! Presentation pass
//!
//! Draws the current generation onto a quad covering the whole viewport. The
//! pass clears color, depth and stencil first; the quad itself neither tests
//! nor writes depth.

use wgpu::util::DeviceExt;

use super::vertex::{QuadVertex, QUAD_VERTICES};
use crate::error::LifeResult;
use crate::gfx::resources::TextureResource;
use crate::gfx::shaders::validated;
use crate::simulation::{GenerationTextures, StepOutput};
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

pub struct Presentation {
    pipeline: wgpu::RenderPipeline,
    layout: BindGroupLayoutWithDesc,
    // Indexed by the image that is current
    bind_groups: [wgpu::BindGroup; 2],
    vertex_buffer: wgpu::Buffer,
}

impl Presentation {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        textures: &GenerationTextures,
    ) -> LifeResult<Self> {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d_unfilterable())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::NonFiltering,
            ))
            .create(device, "Present Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[&layout.layout],
            push_constant_ranges: &[],
        });

        let pipeline = validated(device, "present", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Present Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[QuadVertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: TextureResource::DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Present Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_groups = Self::create_bind_groups(device, &layout, textures);

        Ok(Self {
            pipeline,
            layout,
            bind_groups,
            vertex_buffer,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        textures: &GenerationTextures,
    ) -> [wgpu::BindGroup; 2] {
        [0, 1].map(|index| {
            let texture = textures.texture(index);
            BindGroupBuilder::new(layout)
                .texture(&texture.view)
                .sampler(&texture.sampler)
                .create(device, &format!("Present Generation {}", index))
        })
    }

    /// Rebuilds the bind groups after the generation pair was reallocated
    pub fn rebind(&mut self, device: &wgpu::Device, textures: &GenerationTextures) {
        self.bind_groups = Self::create_bind_groups(device, &self.layout, textures);
    }

    /// Records the presentation pass for the generation `step` produced
    ///
    /// Must be recorded into the same encoder as the step, after it.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: &TextureResource,
        viewport: (u32, u32),
        step: StepOutput,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Present Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (width, height) = viewport;
        render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_groups[step.current], &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}
