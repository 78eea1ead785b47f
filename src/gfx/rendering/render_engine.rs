//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the depth buffer, the shared bind
//! group layouts and the three scene pipelines. A frame is a single render
//! pass: opaque triangles, then lattice lines, then transparent triangles
//! sorted back to front, followed by the optional UI overlay.

use std::sync::Arc;

use cgmath::{EuclideanSpace, InnerSpace, Point3};
use wgpu::TextureFormat;

use crate::{
    error::Result,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            material::MaterialBindings,
            texture_loader::DecodedImage,
            texture_resource::TextureResource,
        },
        scene::{
            object::{DrawObject, ObjectId, Topology, TransformBindings},
            scene::Scene,
        },
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Which pipeline an object is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPassKind {
    Opaque,
    Lattice,
    Transparent,
}

impl RenderPassKind {
    pub fn pipeline_name(self) -> &'static str {
        match self {
            RenderPassKind::Opaque => "Opaque",
            RenderPassKind::Lattice => "Lattice",
            RenderPassKind::Transparent => "Transparent",
        }
    }
}

/// Orders visible objects for drawing
///
/// Opaque triangles come first, then line meshes, then transparent
/// triangles from farthest to nearest relative to the camera eye.
pub fn plan_draws(scene: &Scene) -> Vec<(ObjectId, RenderPassKind)> {
    let eye = Point3::from_vec(scene.camera_manager.camera.eye);
    let mut opaque = Vec::new();
    let mut lattice = Vec::new();
    let mut transparent = Vec::new();

    for (index, object) in scene.objects.iter().enumerate() {
        if !object.visible {
            continue;
        }
        let id = ObjectId(index);
        match object.mesh.topology() {
            Topology::Lines => lattice.push((id, RenderPassKind::Lattice)),
            Topology::Triangles if scene.get_material_for_object(object).is_transparent() => {
                let distance = (object.world_position() - eye).magnitude2();
                transparent.push((id, distance));
            }
            Topology::Triangles => opaque.push((id, RenderPassKind::Opaque)),
        }
    }

    transparent.sort_by(|a, b| b.1.total_cmp(&a.1));

    opaque
        .into_iter()
        .chain(lattice)
        .chain(
            transparent
                .into_iter()
                .map(|(id, _)| (id, RenderPassKind::Transparent)),
        )
        .collect()
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_bindings: TransformBindings,
    material_bindings: MaterialBindings,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    ///
    /// # Errors
    /// Fails if the surface, adapter or device cannot be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&surface_capabilities.formats);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let transform_bindings = TransformBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device, &queue);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        let layouts = vec![
            global_bindings.bind_group_layout().clone(),
            transform_bindings.bind_group_layout().clone(),
            material_bindings.bind_group_layout().clone(),
        ];
        let base = PipelineConfig::default()
            .with_shader("scene")
            .with_bind_group_layouts(layouts)
            .with_depth_format(TextureResource::DEPTH_FORMAT);

        pipeline_manager.register_pipeline(
            RenderPassKind::Opaque.pipeline_name(),
            base.clone()
                .with_label("OPAQUE")
                // The ground is a single-sided plane seen from both sides.
                .with_cull_mode(None)
                .with_color_target(format, wgpu::BlendState::REPLACE),
        );
        pipeline_manager.register_pipeline(
            RenderPassKind::Lattice.pipeline_name(),
            base.clone()
                .with_label("LATTICE")
                .with_fragment_entry("fs_unlit")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_color_target(format, wgpu::BlendState::ALPHA_BLENDING),
        );
        pipeline_manager.register_pipeline(
            RenderPassKind::Transparent.pipeline_name(),
            base.with_label("TRANSPARENT")
                .with_cull_mode(None)
                .without_depth_write()
                .with_color_target(format, wgpu::BlendState::ALPHA_BLENDING),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_bindings,
            material_bindings,
        })
    }

    /// Uploads meshes, transforms and materials of a freshly built scene
    pub fn prepare_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.transform_bindings,
            &self.material_bindings,
        );
    }

    /// Pushes material edits (colors, new textures) to the GPU
    pub fn sync_materials(&self, scene: &mut Scene) {
        scene.update_materials(&self.device, &self.queue, &self.material_bindings);
    }

    /// Creates a repeating sRGB texture from a decoded image
    pub fn upload_texture(&self, image: &DecodedImage) -> TextureResource {
        TextureResource::create_from_rgba_data(
            &self.device,
            &self.queue,
            &image.rgba,
            image.width,
            image.height,
            &image.path.display().to_string(),
            wgpu::AddressMode::Repeat,
        )
    }

    /// Renders a frame with optional UI overlay
    ///
    /// # Errors
    /// Returns the surface error when no frame could be acquired; the
    /// caller decides whether to reconfigure or give up.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> std::result::Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draws = plan_draws(scene);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            let mut current = None;
            for (id, kind) in draws {
                let Some(object) = scene.get_object(id) else {
                    continue;
                };
                if current != Some(kind) {
                    let Some(pipeline) = self.pipeline_manager.get_pipeline(kind.pipeline_name())
                    else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    current = Some(kind);
                }

                let material = scene.get_material_for_object(object);
                let Some(material_bind_group) = material.get_bind_group() else {
                    log::trace!(
                        "Skipping '{}' - material '{}' has no GPU resources",
                        object.name,
                        material.name
                    );
                    continue;
                };
                render_pass.set_bind_group(2, material_bind_group, &[]);
                render_pass.draw_object(object);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Updates camera and light uniforms for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform, light: &LightConfig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, light);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Reconfigures the surface at its current size, after it was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format, needed by the UI renderer
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Prefers a non-sRGB surface format so shaded colors are presented as written
pub fn pick_surface_format(formats: &[TextureFormat]) -> TextureFormat {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .unwrap_or(TextureFormat::Bgra8Unorm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        geometry::{generate_box, generate_wireframe},
        resources::material::Material,
        scene::object::{Mesh, Object},
    };
    use cgmath::{Deg, Matrix4, Vector3};

    fn scene() -> Scene {
        let camera = OrbitCamera::looking_at(
            Point3::new(0.0, 0.0, 100.0),
            Point3::new(0.0, 0.0, 0.0),
            1.0,
            Deg(75.0),
            0.1,
            1000.0,
        );
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 1.0)));
        scene.add_material(Material::new("glass", [1.0; 4], 0.0, 0.1).with_opacity(0.3));
        scene
    }

    fn boxed_at(name: &str, z: f32) -> Object {
        Object::new(name, Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0)))
            .with_transform(Matrix4::from_translation(Vector3::new(0.0, 0.0, z)))
    }

    #[test]
    fn test_opaque_then_lines_then_transparent() {
        let mut scene = scene();
        let near_glass = scene.add_object(boxed_at("near", 50.0).with_material("glass"));
        let wall = scene.add_object(boxed_at("wall", 0.0));
        let edges = scene.add_object(Object::new(
            "edges",
            Mesh::from_lines(&generate_wireframe(&generate_box(1.0, 1.0, 1.0))),
        ));
        let far_glass = scene.add_object(boxed_at("far", -50.0).with_material("glass"));

        let plan = plan_draws(&scene);
        assert_eq!(
            plan,
            vec![
                (wall, RenderPassKind::Opaque),
                (edges, RenderPassKind::Lattice),
                (far_glass, RenderPassKind::Transparent),
                (near_glass, RenderPassKind::Transparent),
            ]
        );
    }

    #[test]
    fn test_hidden_objects_are_skipped() {
        let mut scene = scene();
        let mut hidden = boxed_at("hidden", 0.0);
        hidden.visible = false;
        scene.add_object(hidden);
        assert!(plan_draws(&scene).is_empty());
    }

    #[test]
    fn test_textures_match_surface_encoding() {
        use crate::gfx::resources::texture_resource::TextureResource;

        let surface = pick_surface_format(&[
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Bgra8Unorm,
        ]);
        assert_eq!(surface, TextureFormat::Bgra8Unorm);
        // Both linear: image texels come out as bright as the source file
        assert_eq!(TextureResource::COLOR_FORMAT.is_srgb(), surface.is_srgb());
        assert_eq!(TextureResource::COLOR_FORMAT, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_surface_format_falls_back_to_first_offered() {
        assert_eq!(
            pick_surface_format(&[TextureFormat::Rgba8UnormSrgb]),
            TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(pick_surface_format(&[]), TextureFormat::Bgra8Unorm);
    }
}
