// src/wgpu_utils/uniform_buffer.rs
use wgpu::util::DeviceExt;

/// Typed uniform buffer that remembers what it last uploaded
///
/// The step uniforms rarely change between frames (the pointer is idle most of
/// the time), so writes of identical content are skipped.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content: Content,
}

impl<Content: bytemuck::Pod + PartialEq> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        type_name.rsplit("::").next().unwrap_or(type_name)
    }

    /// Create buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("UniformBuffer: {}", Self::name())),
            contents: bytemuck::bytes_of(initial_content),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        UniformBuffer {
            buffer,
            content: *initial_content,
        }
    }

    /// Queues a write unless `content` equals the last upload
    ///
    /// Returns whether a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        if self.content == content {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.content = content;
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
