//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by every pipeline.

/// A 3D vertex with position, normal and texture coordinates.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, which is required for GPU buffer operations.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]
    pub tex_coords: [f32; 2],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    /// - Attribute 2: Texture coordinates (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex3D>(), 32);
        let layout = Vertex3D::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 24);
    }
}
