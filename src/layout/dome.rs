use cgmath::{Matrix4, Point3, Vector3};

use super::DomeDescriptor;
use crate::{config::LayoutConfig, error::Result};

/// A dome shell placed in the world, paired with the descriptor it came from
///
/// The wireframe lattice is derived from the same shell geometry and shares
/// [`PlacedDome::transform`], so it needs no data of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedDome {
    /// Position of the descriptor in the input list
    pub index: usize,
    pub descriptor: DomeDescriptor,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl PlacedDome {
    pub fn center(&self) -> Point3<f32> {
        self.descriptor.center
    }

    pub fn radius(&self) -> f32 {
        self.descriptor.radius
    }

    /// World transform shared by the shell and its lattice
    pub fn transform(&self) -> Matrix4<f32> {
        let Point3 { x, y, z } = self.descriptor.center;
        Matrix4::from_translation(Vector3::new(x, y, z))
    }
}

/// Validates every descriptor and places one shell per descriptor, in order
pub fn place_domes(descriptors: &[DomeDescriptor], config: &LayoutConfig) -> Result<Vec<PlacedDome>> {
    descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| {
            descriptor.validate(index)?;
            log::debug!(
                "Placing dome #{} at {:?} with radius {}",
                index,
                descriptor.center,
                descriptor.radius
            );
            Ok(PlacedDome {
                index,
                descriptor: *descriptor,
                width_segments: config.shell_width_segments,
                height_segments: config.shell_height_segments,
            })
        })
        .collect()
}
