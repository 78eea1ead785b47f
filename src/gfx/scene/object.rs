use cgmath::{Matrix4, Point3, SquareMatrix};
use wgpu::{util::DeviceExt, Device};

use super::vertex::Vertex3D;
use crate::{
    gfx::geometry::{GeometryData, LineData},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

/// Primitive assembly of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// Index into [`Scene::objects`](super::Scene::objects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    topology: Topology,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>, topology: Topology) -> Self {
        Self {
            index_count: indices.len() as u32,
            vertex_count: vertices.len() as u32,
            vertices,
            indices,
            topology,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(vertices, indices, Topology::Triangles)
    }

    pub fn from_lines(lines: &LineData) -> Self {
        let (vertices, indices) = lines.to_scene_format();
        Self::new(vertices, indices, Topology::Lines)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Triangles for triangle meshes, segments for line meshes
    pub fn primitive_count(&self) -> u32 {
        match self.topology {
            Topology::Triangles => self.index_count / 3,
            Topology::Lines => self.index_count / 2,
        }
    }

    fn init_gpu_resources(&mut self, device: &Device, label: &str) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Layout of the per-object transform bind group, slot 1 in every pipeline
pub struct TransformBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl TransformBindings {
    pub fn new(device: &Device) -> Self {
        Self {
            bind_group_layout: BindGroupLayoutBuilder::new()
                .next_binding_vertex(binding_types::uniform())
                .create(device, "Transform Bind Group Layout"),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

// GPU resources struct to hold the transform uniform and its bind group
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// A named mesh placed in the world with a material
pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    pub material_id: Option<String>,
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Matrix4::identity(),
            material_id: None,
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn get_material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    /// World-space origin of the object
    pub fn world_position(&self) -> Point3<f32> {
        Point3::new(self.transform.w.x, self.transform.w.y, self.transform.w.z)
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device, bindings: &TransformBindings) {
        self.mesh.init_gpu_resources(device, &self.name);

        // cgmath matrices are already column-major for GPU
        let transform_data: &[f32; 16] = self.transform.as_ref();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform Buffer", self.name)),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = BindGroupBuilder::new(&bindings.bind_group_layout)
            .resource(transform_buffer.as_entire_binding())
            .create(device, &format!("{} Transform Bind Group", self.name));

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn draw_object(&mut self, object: &'b Object) {
        let Some(transform) = object.get_transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, transform, &[]);
        self.draw_mesh(&object.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_cube, generate_wireframe};

    #[test]
    fn test_mesh_counts_primitives_by_topology() {
        let cube = generate_cube();
        assert_eq!(Mesh::from_geometry(&cube).primitive_count(), 12);
        assert_eq!(Mesh::from_lines(&generate_wireframe(&cube)).primitive_count(), 30);
    }

    #[test]
    fn test_world_position_reads_translation() {
        let object = Object::new("table", Mesh::from_geometry(&generate_cube()))
            .with_transform(Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(object.world_position(), Point3::new(1.0, 2.0, 3.0));
    }
}
