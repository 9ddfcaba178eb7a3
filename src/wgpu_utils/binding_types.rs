// src/wgpu_utils/binding_types.rs
//! Binding types used by the step and presentation layouts

/// Whole-buffer uniform block (the step's `params`)
pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

pub fn sampler(filtering: wgpu::SamplerBindingType) -> wgpu::BindingType {
    wgpu::BindingType::Sampler(filtering)
}

/// 2D float texture read with `textureLoad` or a non-filtering sampler
///
/// `R32Float` is only filterable behind an optional device feature.
pub fn texture_2d_unfilterable() -> wgpu::BindingType {
    wgpu::BindingType::Texture {
        sample_type: wgpu::TextureSampleType::Float { filterable: false },
        view_dimension: wgpu::TextureViewDimension::D2,
        multisampled: false,
    }
}

/// 2D storage image, e.g. the write-only next generation
pub fn image_2d(
    format: wgpu::TextureFormat,
    access: wgpu::StorageTextureAccess,
) -> wgpu::BindingType {
    wgpu::BindingType::StorageTexture {
        access,
        view_dimension: wgpu::TextureViewDimension::D2,
        format,
    }
}
