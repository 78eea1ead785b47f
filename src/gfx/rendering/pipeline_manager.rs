//! Render pipeline management for wgpu
//!
//! Pipelines are described by [`PipelineConfig`], registered by name and
//! created lazily on first use. All pipelines share the vertex layout of
//! [`Vertex3D`].

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Configuration for creating a render pipeline
///
/// Defines all parameters needed to create a wgpu render pipeline,
/// including shaders, bind group layouts, and render state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub fragment_entry: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write: bool,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene".to_string(),
            fragment_entry: "fs_main".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_write: true,
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Selects the fragment entry point, `fs_main` by default
    pub fn with_fragment_entry(mut self, entry: &str) -> Self {
        self.fragment_entry = entry.to_string();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    ///
    /// # Arguments
    /// * `layouts` - Vector of bind group layouts to use, in slot order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a buffer of `format` (builder pattern)
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Keeps depth testing but stops writing depth, for blended geometry
    pub fn without_depth_write(mut self) -> Self {
        self.depth_write = false;
        self
    }

    /// Sets color targets for this pipeline (builder pattern)
    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }

    /// Single color target of `format` with the given blend state
    pub fn with_color_target(self, format: TextureFormat, blend: BlendState) -> Self {
        self.with_color_targets(vec![Some(ColorTargetState {
            format,
            blend: Some(blend),
            write_mask: ColorWrites::ALL,
        })])
    }

    /// Sets primitive topology for this pipeline (builder pattern)
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }
}

/// Manages render pipelines with caching and lazy creation
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    /// Creates a new pipeline manager
    ///
    /// # Arguments
    /// * `device` - Shared wgpu device for creating resources
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Pipelines are created lazily when first requested via `get_pipeline()`.
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL shader module under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Gets or creates a pipeline (lazy loading)
    ///
    /// Returns `None` if no config is registered under `name` or creation failed.
    pub fn get_pipeline(&mut self, name: &str) -> Option<&RenderPipeline> {
        if !self.pipelines.contains_key(name) {
            let config = self.pipeline_configs.get(name)?.clone();
            match self.create_pipeline_from_config(name, &config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name.to_string(), pipeline);
                    self.pending_pipelines.retain(|n| n != name);
                }
                Err(e) => {
                    log::error!("Failed to create pipeline '{}': {}", name, e);
                    return None;
                }
            }
        }
        self.pipelines.get(name)
    }

    /// Creates all pending pipelines immediately
    ///
    /// # Returns
    /// Error messages for every pipeline that failed to create
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            let Some(config) = self.pipeline_configs.get(&name).cloned() else {
                continue;
            };
            match self.create_pipeline_from_config(&name, &config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => {
                    errors.push(format!("Pipeline '{}': {}", name, e));
                    self.pending_pipelines.push(name);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some(&config.fragment_entry),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: config.multisample,
                multiview: None,
                cache: None,
            });

        log::debug!("Created pipeline '{}'", name);
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_blended_state() {
        let config = PipelineConfig::default()
            .with_label("Transparent")
            .with_cull_mode(None)
            .with_depth_format(TextureFormat::Depth32Float)
            .without_depth_write()
            .with_color_target(TextureFormat::Bgra8Unorm, BlendState::ALPHA_BLENDING);

        assert_eq!(config.label, "Transparent");
        assert_eq!(config.cull_mode, None);
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert!(!config.depth_write);
        let target = config.color_targets[0].as_ref().map(|t| t.blend);
        assert_eq!(target, Some(Some(BlendState::ALPHA_BLENDING)));
    }

    #[test]
    fn test_defaults_draw_opaque_triangles() {
        let config = PipelineConfig::default();
        assert_eq!(config.primitive_topology, PrimitiveTopology::TriangleList);
        assert_eq!(config.fragment_entry, "fs_main");
        assert!(config.depth_write);
        assert_eq!(config.cull_mode, Some(Face::Back));
    }
}
