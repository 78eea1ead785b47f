use cgmath::Point3;

use crate::error::{GeodomeError, Result};

/// Where a dome stands, how big it is and what color its shell takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeDescriptor {
    pub center: Point3<f32>,
    pub radius: f32,
    pub color: [f32; 3],
}

impl DomeDescriptor {
    pub fn new(center: Point3<f32>, radius: f32, color: [f32; 3]) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }

    /// Rejects inputs that would otherwise leak NaNs into the scene
    ///
    /// `index` is the descriptor's position in its list and is carried into
    /// the error so the offending literal can be found.
    pub fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| GeodomeError::InvalidDescriptor { index, reason };

        if !self.radius.is_finite() {
            return Err(invalid(format!("radius {} is not finite", self.radius)));
        }
        if self.radius <= 0.0 {
            return Err(invalid(format!("radius {} must be positive", self.radius)));
        }

        let Point3 { x, y, z } = self.center;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(invalid(format!(
                "center ({}, {}, {}) has a non-finite coordinate",
                x, y, z
            )));
        }

        if self
            .color
            .iter()
            .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err(invalid(format!(
                "color {:?} must have components in 0.0..=1.0",
                self.color
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dome(radius: f32) -> DomeDescriptor {
        DomeDescriptor::new(Point3::new(0.0, 0.0, 0.0), radius, [0.5, 0.5, 0.5])
    }

    #[test]
    fn test_valid_descriptor_passes() {
        assert!(dome(20.0).validate(0).is_ok());
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        for radius in [0.0, -1.0] {
            match dome(radius).validate(4) {
                Err(GeodomeError::InvalidDescriptor { index, .. }) => assert_eq!(index, 4),
                other => panic!("expected InvalidDescriptor, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        assert!(dome(f32::NAN).validate(0).is_err());
        assert!(dome(f32::INFINITY).validate(0).is_err());

        let mut bad_center = dome(10.0);
        bad_center.center.y = f32::NAN;
        assert!(bad_center.validate(0).is_err());

        let mut bad_color = dome(10.0);
        bad_color.color[2] = 1.5;
        assert!(bad_color.validate(0).is_err());
    }
}
