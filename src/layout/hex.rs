use std::f32::consts::{PI, TAU};

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix3, Matrix4, Point3, Quaternion, Rotation, Vector3,
};

use super::PlacedDome;
use crate::config::LayoutConfig;

/// One hexagonal prism sitting on a dome's outer surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexPanel {
    /// Index of the owning dome
    pub dome: usize,
    /// Latitude band, counted from the lowest ring
    pub band: usize,
    /// Position around the ring
    pub slot: usize,
    /// Latitude fraction of the band (multiplied by pi for the polar angle)
    pub latitude: f32,
    /// Longitude in radians
    pub longitude: f32,
    pub position: Point3<f32>,
    /// Rotates the prism's local +Z axis onto the direction of the dome center
    pub rotation: Quaternion<f32>,
    pub radius: f32,
    pub depth: f32,
}

impl HexPanel {
    /// Direction the panel's face points in, world space
    pub fn facing(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(Vector3::unit_z())
    }

    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position.to_vec()) * Matrix4::from(self.rotation)
    }
}

/// Latitude fractions of the tiled bands
///
/// The band count is fixed rather than derived from an accumulated float
/// bound, so `0.2 + 3 * 0.15` can never sneak in as a fourth band.
pub fn latitude_bands(config: &LayoutConfig) -> impl Iterator<Item = f32> + '_ {
    (0..config.latitude_bands).map(move |k| config.latitude_start + config.latitude_step * k as f32)
}

/// Tiles `latitude_bands * panels_per_ring` panels over a dome
pub fn tile_hex_panels(dome: &PlacedDome, config: &LayoutConfig) -> Vec<HexPanel> {
    let radius = dome.radius();
    let center = dome.center();
    let hex_radius = radius * config.hex_radius_ratio;
    let lon_step = TAU / config.panels_per_ring as f32;

    let mut panels = Vec::with_capacity(config.latitude_bands * config.panels_per_ring);

    for (band, latitude) in latitude_bands(config).enumerate() {
        let polar = latitude * PI;
        let ring_radius = radius * polar.cos();
        let height = radius * polar.sin();

        for slot in 0..config.panels_per_ring {
            let longitude = slot as f32 * lon_step;
            let position = center
                + Vector3::new(
                    ring_radius * longitude.cos(),
                    height,
                    ring_radius * longitude.sin(),
                );

            panels.push(HexPanel {
                dome: dome.index,
                band,
                slot,
                latitude,
                longitude,
                position,
                rotation: look_at_rotation(position, center),
                radius: hex_radius,
                depth: config.hex_depth,
            });
        }
    }

    log::trace!("Dome #{}: tiled {} hex panels", dome.index, panels.len());
    panels
}

/// Rotation that turns local +Z toward `target`, keeping world +Y as the up hint
///
/// When the direction is parallel to +Y the forward vector is nudged along +X
/// so the basis stays well defined.
pub fn look_at_rotation(from: Point3<f32>, target: Point3<f32>) -> Quaternion<f32> {
    let up = Vector3::unit_y();

    let offset = target - from;
    let mut forward = if offset.magnitude2() > 0.0 {
        offset.normalize()
    } else {
        Vector3::unit_z()
    };

    let mut right = up.cross(forward);
    if right.magnitude2() < 1e-12 {
        forward.x += 1e-4;
        forward = forward.normalize();
        right = up.cross(forward);
    }
    let right = right.normalize();
    let true_up = forward.cross(right);

    Quaternion::from(Matrix3::from_cols(right, true_up, forward)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::reference_domes, layout::place_domes};

    fn reference_panels() -> Vec<Vec<HexPanel>> {
        let config = LayoutConfig::default();
        place_domes(&reference_domes(), &config)
            .unwrap()
            .iter()
            .map(|dome| tile_hex_panels(dome, &config))
            .collect()
    }

    #[test]
    fn test_band_count_is_pinned() {
        let bands: Vec<f32> = latitude_bands(&LayoutConfig::default()).collect();
        assert_eq!(bands.len(), 3);
        for (band, expected) in bands.iter().zip([0.2, 0.35, 0.5]) {
            assert!((band - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_panel_count_per_dome() {
        for panels in reference_panels() {
            assert_eq!(panels.len(), 36);
        }
    }

    #[test]
    fn test_panels_lie_on_dome_surface() {
        let domes = reference_domes();
        for (dome, panels) in domes.iter().zip(reference_panels()) {
            for panel in panels {
                let distance = (panel.position - dome.center).magnitude();
                assert!(
                    (distance - dome.radius).abs() < 1e-3 * dome.radius,
                    "panel {}/{} sits {} from center, radius {}",
                    panel.band,
                    panel.slot,
                    distance,
                    dome.radius
                );
                assert!(panel.position.y >= dome.center.y);
            }
        }
    }

    #[test]
    fn test_panels_face_dome_center() {
        let domes = reference_domes();
        for (dome, panels) in domes.iter().zip(reference_panels()) {
            for panel in panels {
                let toward_center = (dome.center - panel.position).normalize();
                assert!(panel.facing().dot(toward_center) > 0.9999);
            }
        }
    }

    #[test]
    fn test_panel_size_scales_with_radius() {
        let panels = reference_panels();
        assert!((panels[0][0].radius - 6.0).abs() < 1e-5);
        assert!((panels[1][0].radius - 4.0).abs() < 1e-5);
        assert_eq!(panels[0][0].depth, 2.0);
    }

    #[test]
    fn test_look_at_handles_vertical_direction() {
        let rotation = look_at_rotation(Point3::new(0.0, 10.0, 0.0), Point3::new(0.0, 0.0, 0.0));
        let facing = rotation.rotate_vector(Vector3::unit_z());
        assert!(facing.x.is_finite() && facing.y.is_finite() && facing.z.is_finite());
        assert!(facing.dot(-Vector3::unit_y()) > 0.9999);
    }
}
