//! Vertex format of the full-viewport quad

/// A 2D vertex in normalized device coordinates with a texture coordinate.
///
/// # Memory Layout
///
/// `#[repr(C)]` keeps the layout that [`QuadVertex::desc`] describes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position [x, y] in NDC
    pub position: [f32; 2],
    /// Texture coordinate [u, v]; (0, 0) addresses texel row 0, column 0
    pub uv: [f32; 2],
}

/// Two counter-clockwise triangles covering NDC, bottom-left mapped to uv (0, 0)
#[rustfmt::skip]
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 0.0] },
    QuadVertex { position: [ 1.0, -1.0], uv: [1.0, 0.0] },
    QuadVertex { position: [ 1.0,  1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 0.0] },
    QuadVertex { position: [ 1.0,  1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [-1.0,  1.0], uv: [0.0, 1.0] },
];

impl QuadVertex {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x2) at shader location 0
    /// - Attribute 1: Texture coordinate (Float32x2) at shader location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_ndc_with_matching_uvs() {
        for vertex in QUAD_VERTICES {
            let [x, y] = vertex.position;
            assert_eq!(vertex.uv, [(x + 1.0) / 2.0, (y + 1.0) / 2.0]);
        }
    }

    #[test]
    fn triangles_are_counter_clockwise() {
        for triangle in QUAD_VERTICES.chunks_exact(3) {
            let [a, b, c] = [triangle[0].position, triangle[1].position, triangle[2].position];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn layout_stride_matches_struct() {
        assert_eq!(QuadVertex::desc().array_stride, 16);
    }
}
