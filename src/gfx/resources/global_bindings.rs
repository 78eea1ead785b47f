//! Global uniform bindings for camera and scene lighting
//!
//! Manages the uniform buffer and bind group shared by every object in a
//! frame: camera matrices, the directional light and the ambient term.

use crate::{
    config::hex_color,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Unit vector pointing from the scene toward the light
    light_direction: [f32; 4],
    /// Light color premultiplied by intensity
    light_color: [f32; 4],
    ambient_color: [f32; 4],
}

/// Scene lighting: one directional light plus a flat ambient term
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// Light position; the light shines from here toward `target`
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [50.0, 100.0, 50.0],
            target: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient: hex_color(0x404040),
        }
    }
}

impl LightConfig {
    /// Normalized direction toward the light, straight up if degenerate
    pub fn direction_to_light(&self) -> [f32; 3] {
        let d = [
            self.position[0] - self.target[0],
            self.position[1] - self.target[1],
            self.position[2] - self.target[2],
        ];
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        if len > f32::EPSILON {
            [d[0] / len, d[1] / len, d[2] / len]
        } else {
            [0.0, 1.0, 0.0]
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Builds the uniform content for one frame
pub fn global_ubo_content(camera: CameraUniform, light: &LightConfig) -> GlobalUBOContent {
    let [dx, dy, dz] = light.direction_to_light();
    let [r, g, b] = light.color;
    let [ar, ag, ab] = light.ambient;

    GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_direction: [dx, dy, dz, 0.0],
        light_color: [
            r * light.intensity,
            g * light.intensity,
            b * light.intensity,
            1.0,
        ],
        ambient_color: [ar, ag, ab, 1.0],
    }
}

/// Updates the global uniform buffer with camera and light data
///
/// Called each frame; unchanged content is not re-uploaded.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: &LightConfig,
) {
    ubo.update_content(queue, global_ubo_content(camera, light));
}

/// Bind group layout and bind group for global uniforms, bound to slot 0
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);
    }

    #[test]
    fn test_light_shines_from_its_position() {
        let light = LightConfig::default();
        let [x, y, z] = light.direction_to_light();
        let len = (50.0f32 * 50.0 + 100.0 * 100.0 + 50.0 * 50.0).sqrt();
        assert!((x - 50.0 / len).abs() < 1e-6);
        assert!((y - 100.0 / len).abs() < 1e-6);
        assert!((z - 50.0 / len).abs() < 1e-6);
    }

    #[test]
    fn test_content_premultiplies_intensity() {
        let light = LightConfig {
            intensity: 0.5,
            ..LightConfig::default()
        };
        let content = global_ubo_content(CameraUniform::default(), &light);
        assert_eq!(content.light_color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(content.ambient_color[..3], light.ambient[..]);
    }
}
