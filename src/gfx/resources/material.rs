//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and objects reference
//! them by name. Each material owns a small uniform buffer and a bind group
//! combining that buffer with a base-color texture; materials without a
//! texture bind the shared white fallback.

use std::collections::HashMap;

use wgpu::Device;

use crate::{
    gfx::resources::texture_resource::TextureResource,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials, mirrors `Material` in `scene.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub uv_repeat: [f32; 2],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// How a material is composited
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    /// Alpha-blended, drawn after opaque geometry without depth writes
    Transparent,
}

/// Shared layout for material bind groups plus the fallback texture
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    fallback_texture: TextureResource,
}

impl MaterialBindings {
    pub fn new(device: &Device, queue: &wgpu::Queue) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group Layout");

        MaterialBindings {
            bind_group_layout,
            fallback_texture: TextureResource::white_pixel(device, queue),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    fn create_bind_group(
        &self,
        device: &Device,
        ubo: &MaterialUBO,
        texture: Option<&TextureResource>,
        label: &str,
    ) -> wgpu::BindGroup {
        let texture = texture.unwrap_or(&self.fallback_texture);
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, label)
    }
}

struct MaterialGpuResources {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Material definition
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// Texture repeats along u and v
    pub uv_repeat: [f32; 2],
    pub blend: BlendMode,
    /// Name of a texture registered with the [`MaterialManager`]
    pub texture: Option<String>,

    gpu: Option<MaterialGpuResources>,
    needs_rebind: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
    }
}

impl Material {
    /// Creates a new opaque, untextured material
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            uv_repeat: [1.0, 1.0],
            blend: BlendMode::Opaque,
            texture: None,
            gpu: None,
            needs_rebind: true,
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, [r, g, b]: [f32; 3]) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set opacity; anything below 1 switches to blending
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self.blend = if self.base_color[3] < 1.0 {
            BlendMode::Transparent
        } else {
            BlendMode::Opaque
        };
        self
    }

    /// Builder pattern: Set texture repeat
    pub fn with_uv_repeat(mut self, u: f32, v: f32) -> Self {
        self.uv_repeat = [u, v];
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.blend == BlendMode::Transparent
    }

    fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            uv_repeat: self.uv_repeat,
        }
    }

    /// Syncs the uniform and, when the texture changed, rebuilds the bind group
    fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        textures: &HashMap<String, TextureResource>,
    ) {
        let texture = self.texture.as_ref().and_then(|name| textures.get(name));
        let uniform = self.uniform();

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.ubo.update_content(queue, uniform);
            if self.needs_rebind {
                gpu.bind_group = bindings.create_bind_group(device, &gpu.ubo, texture, &self.name);
            }
        } else {
            let ubo = MaterialUBO::new_with_data(device, &uniform);
            let bind_group = bindings.create_bind_group(device, &ubo, texture, &self.name);
            self.gpu = Some(MaterialGpuResources { ubo, bind_group });
        }
        self.needs_rebind = false;
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials and the textures they sample
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    textures: HashMap<String, TextureResource>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();

        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            textures: HashMap::new(),
            default_material_id,
        }
    }

    /// Adds or replaces a material and returns its ID
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), material);
        id
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Material for an object, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    /// Registers a texture and binds it as the base-color map of `material_id`
    ///
    /// The material's color is reset to white so the texture shows unmodified;
    /// alpha is kept. Returns `false` if the material does not exist.
    pub fn apply_texture(
        &mut self,
        material_id: &str,
        texture_name: &str,
        texture: TextureResource,
    ) -> bool {
        let Some(material) = self.materials.get_mut(material_id) else {
            return false;
        };
        material.texture = Some(texture_name.to_string());
        material.base_color = [1.0, 1.0, 1.0, material.base_color[3]];
        material.needs_rebind = true;
        self.textures.insert(texture_name.to_string(), texture);
        true
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, bindings, &self.textures);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
    }

    #[test]
    fn test_opacity_selects_blend_mode() {
        let shell = Material::new("shell", [1.0; 4], 0.0, 0.5).with_opacity(0.5);
        assert!(shell.is_transparent());
        assert_eq!(shell.base_color[3], 0.5);

        let wall = Material::new("wall", [1.0; 4], 0.1, 0.7).with_opacity(1.0);
        assert_eq!(wall.blend, BlendMode::Opaque);
    }

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("chair", [0.2, 0.2, 0.2, 1.0], 0.0, 0.5));

        assert_eq!(manager.get_material_for_object(Some("chair")).name, "chair");
        assert_eq!(manager.get_material_for_object(Some("missing")).name, "default");
        assert_eq!(manager.get_material_for_object(None).name, "default");
        assert_eq!(manager.material_count(), 2);
    }
}
