//! # Scene Configuration
//!
//! All configuration lives in source. [`SceneConfig::reference`] reproduces the
//! reference scene: three domes over a grass field, lit by one directional and
//! one ambient light. [`SceneConfig::from_env`] layers the few supported
//! environment overrides on top.
//!
//! | Variable                | Effect                                   |
//! |-------------------------|------------------------------------------|
//! | `GEODOME_FLOOR_TEXTURE` | Path of the image used for dome floors   |

use std::path::PathBuf;

use cgmath::Point3;

use crate::{gfx::resources::global_bindings::LightConfig, layout::DomeDescriptor};

/// Environment variable overriding the floor texture path
pub const FLOOR_TEXTURE_ENV: &str = "GEODOME_FLOOR_TEXTURE";

/// Floor texture shipped with the crate, resolved against the manifest directory
/// so the binary finds it from any working directory
pub const DEFAULT_FLOOR_TEXTURE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/assets/hardwood_diffuse.png");

/// Converts a `0xRRGGBB` literal into linear-ish RGB components in `0.0..=1.0`
pub fn hex_color(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

/// The three domes of the reference scene
pub fn reference_domes() -> Vec<DomeDescriptor> {
    vec![
        DomeDescriptor::new(Point3::new(0.0, 30.0, 0.0), 30.0, hex_color(0xa0d8ef)),
        DomeDescriptor::new(Point3::new(-50.0, 30.0, 10.0), 20.0, hex_color(0xd0e8af)),
        DomeDescriptor::new(Point3::new(50.0, 30.0, 10.0), 20.0, hex_color(0xfad1af)),
    ]
}

/// Constants of the dome, hex-panel and interior layout
///
/// Every distance here is either absolute (world units) or a ratio of the dome
/// radius `R` / floor radius `Rf`, as noted per field.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Shell tessellation around the vertical axis
    pub shell_width_segments: u32,
    /// Shell tessellation from the pole down to the rim
    pub shell_height_segments: u32,

    /// Hex footprint radius as a fraction of `R`
    pub hex_radius_ratio: f32,
    /// Hex prism depth
    pub hex_depth: f32,
    /// First latitude fraction (multiplied by pi)
    pub latitude_start: f32,
    /// Latitude fraction between consecutive bands
    pub latitude_step: f32,
    /// Fixed number of latitude bands
    pub latitude_bands: usize,
    /// Panels per latitude ring
    pub panels_per_ring: usize,

    /// Floor radius `Rf` as a fraction of `R`
    pub floor_radius_ratio: f32,
    /// Floor drop below the dome center as a fraction of `R`
    pub floor_drop_ratio: f32,
    /// Constant lift applied after the drop
    pub floor_lift: f32,
    /// Floor tessellation
    pub floor_segments: u32,

    /// Table distance from the floor center as a fraction of `Rf`
    pub table_distance_ratio: f32,
    pub table_radius: f32,
    pub table_height: f32,
    /// Table center height above the floor
    pub table_elevation: f32,

    pub chairs_per_table: usize,
    /// Chair distance from the table anchor
    pub chair_offset: f32,
    /// Chair box extents (x, y, z)
    pub chair_size: [f32; 3],
    /// Chair center height above the floor
    pub chair_elevation: f32,

    /// Pot center height above the floor
    pub plant_elevation: f32,
    /// Foliage center height above the pot
    pub foliage_lift: f32,

    /// Wall start distance from the floor center as a fraction of `Rf`
    pub wall_start_ratio: f32,
    /// Wall end distance from the floor center as a fraction of `Rf`
    pub wall_end_ratio: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            shell_width_segments: 32,
            shell_height_segments: 32,

            hex_radius_ratio: 0.2,
            hex_depth: 2.0,
            latitude_start: 0.2,
            latitude_step: 0.15,
            latitude_bands: 3,
            panels_per_ring: 12,

            floor_radius_ratio: 0.8,
            floor_drop_ratio: 0.1,
            floor_lift: 0.1,
            floor_segments: 32,

            table_distance_ratio: 0.5,
            table_radius: 2.0,
            table_height: 0.8,
            table_elevation: 0.8,

            chairs_per_table: 4,
            chair_offset: 3.0,
            chair_size: [1.2, 1.5, 1.2],
            chair_elevation: 0.4,

            plant_elevation: 1.2,
            foliage_lift: 0.5,

            wall_start_ratio: 0.2,
            wall_end_ratio: 0.85,
            wall_height: 6.0,
            wall_thickness: 0.3,
        }
    }
}

impl LayoutConfig {
    /// Horizontal radius covered by a table together with its chairs
    pub fn table_ensemble_radius(&self) -> f32 {
        let [cx, _, cz] = self.chair_size;
        let chair_reach = self.chair_offset + (cx * cx + cz * cz).sqrt() * 0.5;
        chair_reach.max(self.table_radius)
    }

    /// Minimum distance a wall's center line must keep from any table anchor
    pub fn required_wall_clearance(&self) -> f32 {
        self.table_ensemble_radius() + self.wall_thickness * 0.5
    }
}

/// Perspective camera placement
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 50.0, 150.0),
            target: Point3::new(0.0, 0.0, 0.0),
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

/// Grass field under the domes
#[derive(Debug, Clone, PartialEq)]
pub struct GroundConfig {
    pub size: f32,
    pub color: [f32; 3],
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 500.0,
            color: hex_color(0x2e7d32),
        }
    }
}

/// Everything needed to build and present the scene
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub domes: Vec<DomeDescriptor>,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub ground: GroundConfig,
    pub floor_texture: PathBuf,
    /// Texture repeats across a floor disc in each direction
    pub floor_texture_repeat: f32,
    pub clear_color: [f64; 3],
    /// Initial window size in logical pixels
    pub window_size: (u32, u32),
}

impl SceneConfig {
    /// The reference configuration with no overrides applied
    pub fn reference() -> Self {
        Self {
            domes: reference_domes(),
            layout: LayoutConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            ground: GroundConfig::default(),
            floor_texture: PathBuf::from(DEFAULT_FLOOR_TEXTURE),
            floor_texture_repeat: 4.0,
            clear_color: [0.53, 0.72, 0.88],
            window_size: (1200, 800),
        }
    }

    /// The reference configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::reference();
        if let Some(path) = std::env::var_os(FLOOR_TEXTURE_ENV) {
            log::info!("Using floor texture override {:?}", path);
            config.floor_texture = PathBuf::from(path);
        }
        config
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_channels() {
        assert_eq!(hex_color(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_color(0x00ff00), [0.0, 1.0, 0.0]);
        let gray = hex_color(0x404040);
        assert!((gray[0] - 64.0 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reference_configuration() {
        let config = SceneConfig::reference();
        assert_eq!(config.domes.len(), 3);
        assert_eq!(config.domes[0].radius, 30.0);
        assert_eq!(config.domes[1].radius, 20.0);
        assert_eq!(config.layout.latitude_bands, 3);
        assert_eq!(config.layout.panels_per_ring, 12);
        assert_eq!(config.floor_texture, PathBuf::from(DEFAULT_FLOOR_TEXTURE));
    }

    #[test]
    fn test_reference_floor_texture_decodes() {
        use crate::gfx::resources::{PendingTexture, TextureStatus};
        use std::time::{Duration, Instant};

        let config = SceneConfig::reference();
        assert!(config.floor_texture.is_absolute());

        let mut pending = PendingTexture::spawn(config.floor_texture.clone());
        let deadline = Instant::now() + Duration::from_secs(10);
        let status = loop {
            match pending.poll() {
                TextureStatus::Loading if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(5))
                }
                status => break status,
            }
        };

        match status {
            TextureStatus::Ready(image) => {
                assert_eq!((image.width, image.height), (256, 256));
                assert_eq!(image.rgba.len(), 256 * 256 * 4);
            }
            other => panic!("reference floor texture did not load: {:?}", other),
        }
    }

    #[test]
    fn test_wall_clearance_accounts_for_chairs() {
        let layout = LayoutConfig::default();
        // chair offset 3 + half diagonal of a 1.2 x 1.2 footprint
        let expected = 3.0 + (1.2f32 * 1.2 * 2.0).sqrt() * 0.5;
        assert!((layout.table_ensemble_radius() - expected).abs() < 1e-5);
        assert!((layout.required_wall_clearance() - (expected + 0.15)).abs() < 1e-5);
    }
}
