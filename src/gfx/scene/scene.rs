use wgpu::Device;

use super::object::{Object, ObjectId, TransformBindings};
use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::{
        global_bindings::LightConfig,
        material::{Material, MaterialBindings, MaterialManager},
    },
};

/// Main scene containing objects, materials, lighting and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
    pub light: LightConfig,
    pub clear_color: wgpu::Color,
}

impl Scene {
    /// Creates a new, empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            light: LightConfig::default(),
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Per-frame update: camera damping and matrices
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    /// Adds an object under a unique name and returns its ID
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        object.name = self.ensure_unique_name(&object.name);
        log::trace!("Adding object '{}'", object.name);
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Creates a new material and adds it to the material manager
    pub fn add_material(&mut self, material: Material) -> String {
        self.material_manager.add_material(material)
    }

    /// Initializes GPU resources for all objects and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transforms: &TransformBindings,
        materials: &MaterialBindings,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, transforms);
        }
        self.update_materials(device, queue, materials);
    }

    /// Syncs material changes (including newly applied textures) to the GPU
    pub fn update_materials(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        materials: &MaterialBindings,
    ) {
        self.material_manager
            .update_all_gpu_resources(device, queue, materials);
    }

    /// Gets material for rendering an object
    ///
    /// Returns the material assigned to the object, or the default material
    /// if no material is assigned or the assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    /// Gets the total number of objects
    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.material_count(),
            ..SceneStatistics::default()
        };

        for object in &self.objects {
            stats.total_vertices += object.mesh.vertex_count;
            match object.mesh.topology() {
                super::object::Topology::Triangles => {
                    stats.total_triangles += object.mesh.primitive_count()
                }
                super::object::Topology::Lines => stats.total_lines += object.mesh.primitive_count(),
            }
        }

        stats
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_lines: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{CameraController, OrbitCamera},
        geometry::{generate_cube, generate_wireframe},
        scene::object::Mesh,
    };
    use cgmath::{Deg, Point3};

    fn scene() -> Scene {
        let camera = OrbitCamera::looking_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            1.0,
            Deg(75.0),
            0.1,
            100.0,
        );
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 1.0)))
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let mut scene = scene();
        let a = scene.add_object(Object::new("chair", Mesh::from_geometry(&generate_cube())));
        let b = scene.add_object(Object::new("chair", Mesh::from_geometry(&generate_cube())));
        assert_eq!(scene.get_object(a).map(|o| o.name.as_str()), Some("chair"));
        assert_eq!(scene.get_object(b).map(|o| o.name.as_str()), Some("chair (1)"));
    }

    #[test]
    fn test_statistics_split_triangles_and_lines() {
        let mut scene = scene();
        let cube = generate_cube();
        scene.add_object(Object::new("box", Mesh::from_geometry(&cube)));
        scene.add_object(Object::new("edges", Mesh::from_lines(&generate_wireframe(&cube))));

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_lines, 30);
        assert_eq!(stats.total_vertices, 48);
        assert_eq!(stats.material_count, 1);
    }
}
