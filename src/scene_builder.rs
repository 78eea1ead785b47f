//! # Scene Construction
//!
//! [`SceneBuilder`] turns a [`SceneConfig`] into a populated [`Scene`]: it sets
//! up camera, lighting and ground, runs the layout generator and creates one
//! object per generated piece. Every object created for a dome is reported
//! back in a [`DomeHandles`] next to the descriptor it came from.

use cgmath::{Deg, EuclideanSpace, Matrix4, Point3};

use crate::{
    config::{hex_color, SceneConfig},
    error::Result,
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        geometry::{
            generate_box, generate_circle, generate_cylinder, generate_hexagonal_prism,
            generate_plane, generate_sphere, generate_sphere_segment, generate_wireframe,
            GeometryData,
        },
        resources::Material,
        scene::{Mesh, Object, ObjectId, Scene},
    },
    layout::{self, DomeDescriptor, DomeLayout, InteriorLayout},
};

/// Material shared by every dome floor; the wood texture is bound to it
pub const FLOOR_MATERIAL: &str = "floor";

const GROUND_MATERIAL: &str = "ground";
const LATTICE_MATERIAL: &str = "lattice";
const HEX_PANEL_MATERIAL: &str = "hex_panel";
const TABLE_MATERIAL: &str = "table";
const CHAIR_MATERIAL: &str = "chair";
const POT_MATERIAL: &str = "plant_pot";
const FOLIAGE_MATERIAL: &str = "foliage";
const WALL_MATERIAL: &str = "wall";

const SHELL_OPACITY: f32 = 0.5;
const HEX_PANEL_OPACITY: f32 = 0.6;
/// Floor color shown until (or instead of) the wood texture
const FLOOR_FALLBACK_COLOR: u32 = 0xa0522d;

const ROUND_SEGMENTS: u32 = 32;
const POT_SEGMENTS: u32 = 16;
const FOLIAGE_WIDTH_SEGMENTS: u32 = 8;
const FOLIAGE_HEIGHT_SEGMENTS: u32 = 6;
const POT_RADIUS_TOP: f32 = 0.5;
const POT_RADIUS_BOTTOM: f32 = 0.4;
const POT_HEIGHT: f32 = 0.6;
const FOLIAGE_RADIUS: f32 = 0.8;

/// Objects created during environment setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentHandles {
    pub ground: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantHandles {
    pub pot: ObjectId,
    pub foliage: ObjectId,
}

/// Objects furnishing one dome's interior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteriorHandles {
    pub floor: Option<ObjectId>,
    pub tables: Vec<ObjectId>,
    pub chairs: Vec<ObjectId>,
    pub plants: Vec<PlantHandles>,
    pub walls: Vec<ObjectId>,
}

/// Everything created for one dome, paired with its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DomeHandles {
    pub descriptor: DomeDescriptor,
    pub shell: ObjectId,
    pub lattice: ObjectId,
    pub panels: Vec<ObjectId>,
    pub interior: InteriorHandles,
}

/// A finished scene plus the layout it was built from
pub struct BuiltScene {
    pub scene: Scene,
    pub environment: EnvironmentHandles,
    pub domes: Vec<DomeHandles>,
    pub layouts: Vec<DomeLayout>,
}

/// Builds the dome scene from a configuration
///
/// The builder is the only place objects are added; once [`build`] returns
/// the scene is not structurally modified again.
///
/// [`build`]: SceneBuilder::build
pub struct SceneBuilder<'a> {
    config: &'a SceneConfig,
    scene: Scene,
    table: GeometryData,
    chair: GeometryData,
    pot: GeometryData,
    foliage: GeometryData,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a SceneConfig) -> Self {
        let (width, height) = config.window_size;
        let camera = OrbitCamera::looking_at(
            config.camera.eye,
            config.camera.target,
            width.max(1) as f32 / height.max(1) as f32,
            Deg(config.camera.fovy_degrees),
            config.camera.znear,
            config.camera.zfar,
        );
        let controller = CameraController::new(0.005, 1.0);
        let scene = Scene::new(CameraManager::new(camera, controller));

        let layout = &config.layout;
        let [chair_x, chair_y, chair_z] = layout.chair_size;

        Self {
            config,
            scene,
            table: generate_cylinder(
                layout.table_radius,
                layout.table_radius,
                layout.table_height,
                ROUND_SEGMENTS,
            ),
            chair: generate_box(chair_x, chair_y, chair_z),
            pot: generate_cylinder(POT_RADIUS_TOP, POT_RADIUS_BOTTOM, POT_HEIGHT, POT_SEGMENTS),
            foliage: generate_sphere(
                FOLIAGE_RADIUS,
                FOLIAGE_WIDTH_SEGMENTS,
                FOLIAGE_HEIGHT_SEGMENTS,
            ),
        }
    }

    /// Runs every stage and returns the finished scene
    ///
    /// # Errors
    /// Propagates layout failures: an invalid descriptor or a dome too small
    /// for its furniture.
    pub fn build(mut self) -> Result<BuiltScene> {
        let layouts = layout::generate(&self.config.domes, &self.config.layout)?;

        let environment = self.setup_environment();
        self.add_shared_materials();

        let domes = layouts
            .iter()
            .map(|dome_layout| self.add_dome(dome_layout))
            .collect();

        let stats = self.scene.get_statistics();
        log::info!(
            "Scene built: {} objects, {} materials, {} triangles, {} lattice lines",
            stats.object_count,
            stats.material_count,
            stats.total_triangles,
            stats.total_lines
        );

        Ok(BuiltScene {
            scene: self.scene,
            environment,
            domes,
            layouts,
        })
    }

    /// Stage 1: lighting, clear color and the ground plane
    fn setup_environment(&mut self) -> EnvironmentHandles {
        let [r, g, b] = self.config.clear_color;
        self.scene.clear_color = wgpu::Color { r, g, b, a: 1.0 };
        self.scene.light = self.config.light;

        let ground = &self.config.ground;
        self.scene.add_material(
            Material::new(GROUND_MATERIAL, [1.0; 4], 0.0, 0.9).with_color(ground.color),
        );
        let ground = self.scene.add_object(
            Object::new(
                "ground",
                Mesh::from_geometry(&generate_plane(ground.size, ground.size, 1, 1)),
            )
            .with_material(GROUND_MATERIAL),
        );

        EnvironmentHandles { ground }
    }

    fn add_shared_materials(&mut self) {
        let materials = [
            Material::new(LATTICE_MATERIAL, [1.0; 4], 0.0, 1.0),
            Material::new(HEX_PANEL_MATERIAL, [1.0; 4], 0.2, 0.4)
                .with_color(hex_color(0xdddddd))
                .with_opacity(HEX_PANEL_OPACITY),
            Material::new(FLOOR_MATERIAL, [1.0; 4], 0.1, 0.8)
                .with_color(hex_color(FLOOR_FALLBACK_COLOR))
                .with_uv_repeat(self.config.floor_texture_repeat, self.config.floor_texture_repeat),
            Material::new(TABLE_MATERIAL, [1.0; 4], 0.0, 0.6).with_color(hex_color(0x8b4513)),
            Material::new(CHAIR_MATERIAL, [1.0; 4], 0.0, 0.5).with_color(hex_color(0x444444)),
            Material::new(POT_MATERIAL, [1.0; 4], 0.0, 0.8).with_color(hex_color(0x654321)),
            Material::new(FOLIAGE_MATERIAL, [1.0; 4], 0.0, 0.9).with_color(hex_color(0x3a5f0b)),
            Material::new(WALL_MATERIAL, [1.0; 4], 0.1, 0.7).with_color(hex_color(0xf5f5dc)),
        ];
        for material in materials {
            self.scene.add_material(material);
        }
    }

    /// Stages 2 to 4 for one dome: shell, lattice, panels and interior
    fn add_dome(&mut self, dome_layout: &DomeLayout) -> DomeHandles {
        let dome = &dome_layout.dome;
        let descriptor = dome.descriptor;

        let shell_material = self.scene.add_material(
            Material::new(&format!("dome_{}", dome.index), [1.0; 4], 0.0, 0.2)
                .with_color(descriptor.color)
                .with_opacity(SHELL_OPACITY),
        );

        let shell_geometry = generate_sphere_segment(
            dome.radius(),
            dome.width_segments,
            dome.height_segments,
            std::f32::consts::FRAC_PI_2,
        );
        let shell = self.scene.add_object(
            Object::new(
                format!("dome {} shell", dome.index),
                Mesh::from_geometry(&shell_geometry),
            )
            .with_transform(dome.transform())
            .with_material(&shell_material),
        );
        let lattice = self.scene.add_object(
            Object::new(
                format!("dome {} lattice", dome.index),
                Mesh::from_lines(&generate_wireframe(&shell_geometry)),
            )
            .with_transform(dome.transform())
            .with_material(LATTICE_MATERIAL),
        );

        let prism = generate_hexagonal_prism(
            dome.radius() * self.config.layout.hex_radius_ratio,
            self.config.layout.hex_depth,
        );
        let panels = dome_layout
            .hex_panels
            .iter()
            .map(|panel| {
                self.scene.add_object(
                    Object::new(
                        format!("dome {} hex {}.{}", dome.index, panel.band, panel.slot),
                        Mesh::from_geometry(&prism),
                    )
                    .with_transform(panel.transform())
                    .with_material(HEX_PANEL_MATERIAL),
                )
            })
            .collect();

        let interior = self.add_interior(&dome_layout.interior);

        log::debug!(
            "Dome #{} materialized with {} panels",
            dome.index,
            dome_layout.hex_panels.len()
        );

        DomeHandles {
            descriptor,
            shell,
            lattice,
            panels,
            interior,
        }
    }

    fn add_interior(&mut self, interior: &InteriorLayout) -> InteriorHandles {
        let dome = interior.dome;
        let mut handles = InteriorHandles::default();

        let floor = interior.floor;
        handles.floor = Some(
            self.scene.add_object(
                Object::new(
                    format!("dome {} floor", dome),
                    Mesh::from_geometry(&generate_circle(
                        floor.radius,
                        self.config.layout.floor_segments,
                    )),
                )
                .with_transform(translation(floor.center))
                .with_material(FLOOR_MATERIAL),
            ),
        );

        for table in &interior.tables {
            let object = Object::new(
                format!("dome {} table {}", dome, table.sector),
                Mesh::from_geometry(&self.table),
            )
            .with_transform(translation(table.position))
            .with_material(TABLE_MATERIAL);
            handles.tables.push(self.scene.add_object(object));
        }

        for chair in &interior.chairs {
            let object = Object::new(
                format!("dome {} chair {}.{}", dome, chair.sector, chair.seat),
                Mesh::from_geometry(&self.chair),
            )
            .with_transform(translation(chair.position))
            .with_material(CHAIR_MATERIAL);
            handles.chairs.push(self.scene.add_object(object));
        }

        for plant in &interior.plants {
            let pot = Object::new(
                format!("dome {} pot {}", dome, plant.sector),
                Mesh::from_geometry(&self.pot),
            )
            .with_transform(translation(plant.pot))
            .with_material(POT_MATERIAL);
            let foliage = Object::new(
                format!("dome {} foliage {}", dome, plant.sector),
                Mesh::from_geometry(&self.foliage),
            )
            .with_transform(translation(plant.foliage))
            .with_material(FOLIAGE_MATERIAL);
            handles.plants.push(PlantHandles {
                pot: self.scene.add_object(pot),
                foliage: self.scene.add_object(foliage),
            });
        }

        for wall in &interior.walls {
            let object = Object::new(
                format!("dome {} wall {}", dome, wall.sector),
                Mesh::from_geometry(&generate_box(wall.length(), wall.height, wall.thickness)),
            )
            .with_transform(wall.transform())
            .with_material(WALL_MATERIAL);
            handles.walls.push(self.scene.add_object(object));
        }

        handles
    }
}

fn translation(point: Point3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(point.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GeodomeError, gfx::scene::Topology};
    use cgmath::InnerSpace;

    fn built() -> BuiltScene {
        SceneBuilder::new(&SceneConfig::reference()).build().unwrap()
    }

    #[test]
    fn test_handles_pair_with_descriptors() {
        let config = SceneConfig::reference();
        let built = SceneBuilder::new(&config).build().unwrap();
        assert_eq!(built.domes.len(), config.domes.len());
        for (handles, descriptor) in built.domes.iter().zip(&config.domes) {
            assert_eq!(&handles.descriptor, descriptor);
            assert_eq!(handles.panels.len(), 36);
            assert_eq!(handles.interior.tables.len(), 3);
            assert_eq!(handles.interior.chairs.len(), 12);
            assert_eq!(handles.interior.plants.len(), 3);
            assert_eq!(handles.interior.walls.len(), 3);
            assert!(handles.interior.floor.is_some());
        }
    }

    #[test]
    fn test_object_count() {
        let built = built();
        // ground + per dome: shell, lattice, 36 panels, floor, 3 tables,
        // 12 chairs, 3 pots, 3 foliage, 3 walls
        assert_eq!(built.scene.get_object_count(), 1 + 3 * 63);
    }

    #[test]
    fn test_shell_and_lattice_share_transform() {
        let built = built();
        for handles in &built.domes {
            let shell = built.scene.get_object(handles.shell).unwrap();
            let lattice = built.scene.get_object(handles.lattice).unwrap();
            assert_eq!(shell.transform, lattice.transform);
            assert_eq!(lattice.mesh.topology(), Topology::Lines);
            assert_eq!(shell.world_position(), handles.descriptor.center);
        }
    }

    #[test]
    fn test_materials_follow_descriptors() {
        let built = built();
        for (i, handles) in built.domes.iter().enumerate() {
            let shell = built.scene.get_object(handles.shell).unwrap();
            let material = built.scene.get_material_for_object(shell);
            assert_eq!(material.name, format!("dome_{}", i));
            assert!(material.is_transparent());
            assert_eq!(material.base_color[3], SHELL_OPACITY);
            assert_eq!(&material.base_color[..3], &handles.descriptor.color[..]);
        }

        let floor = built
            .scene
            .material_manager
            .get_material(FLOOR_MATERIAL)
            .unwrap();
        assert_eq!(floor.uv_repeat, [4.0, 4.0]);
        assert!(floor.texture.is_none());
    }

    #[test]
    fn test_panels_face_dome_center() {
        let built = built();
        for (handles, layout) in built.domes.iter().zip(&built.layouts) {
            for (id, panel) in handles.panels.iter().zip(&layout.hex_panels) {
                let object = built.scene.get_object(*id).unwrap();
                assert_eq!(object.world_position(), panel.position);
                let to_center = (handles.descriptor.center - panel.position).normalize();
                assert!(panel.facing().dot(to_center) > 0.999);
            }
        }
    }

    #[test]
    fn test_environment() {
        let built = built();
        assert_eq!(built.environment.ground, ObjectId(0));
        assert_eq!(built.scene.light, SceneConfig::reference().light);
        assert_eq!(built.scene.clear_color.r, 0.53);
    }

    #[test]
    fn test_small_dome_aborts_build() {
        let mut config = SceneConfig::reference();
        config.domes[1].radius = 10.0;
        let result = SceneBuilder::new(&config).build();
        assert!(matches!(
            result,
            Err(GeodomeError::WallIntersectsTable { dome: 1, .. })
        ));
    }
}
