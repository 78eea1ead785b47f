//! # Procedural Geometry Generation
//!
//! Every mesh in the scene is generated here; there are no model files.
//! All primitives are Y-up and centered on their local origin unless noted.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with independent extents
//! - **Sphere segment**: UV sphere cut at a polar angle (hemisphere for dome shells)
//! - **Plane**: flat XZ plane facing +Y
//! - **Cylinder**: Y-axis cylinder with separate top and bottom radii
//! - **Circle**: flat XZ disc facing +Y
//! - **Hexagonal prism**: hexagon in XY extruded along +Z
//! - **Wireframe**: unique edge list of any triangle mesh
//!
//! ## Usage
//!
//! ```rust
//! use geodome::gfx::geometry::{generate_box, generate_sphere_segment, generate_wireframe};
//!
//! let wall = generate_box(10.0, 6.0, 0.3);
//! let shell = generate_sphere_segment(30.0, 32, 32, std::f32::consts::FRAC_PI_2);
//! let lattice = generate_wireframe(&shell);
//! assert!(lattice.edge_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and UVs into renderer vertices
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

/// Line segments sharing a vertex list, two indices per segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineData {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl LineData {
    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Line vertices carry no lighting data, so normals and UVs are zeroed
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .map(|&position| Vertex3D {
                position,
                normal: [0.0, 0.0, 0.0],
                tex_coords: [0.0, 0.0],
            })
            .collect();

        (vertices, self.indices.clone())
    }
}
