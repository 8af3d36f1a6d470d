//! Arc entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// An arc entity (portion of a circle)
///
/// Angles are in degrees, counter-clockwise from start to end, matching the
/// values stored under group codes 50/51.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point of the arc
    pub center: Vector2,
    /// Radius of the arc
    pub radius: f64,
    /// Start angle in degrees
    pub start_angle: f64,
    /// End angle in degrees
    pub end_angle: f64,
}

impl Arc {
    /// Create a full-turn arc of radius 1 at the origin
    pub fn new() -> Self {
        Arc {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            radius: 1.0,
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }

    /// Create a new arc with center, radius, and angles (degrees)
    pub fn from_center_radius_angles(
        center: Vector2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ..Self::new()
        }
    }

    /// Sweep angle in degrees, always in `[0, 360)`
    pub fn sweep_angle(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(360.0)
    }

    /// Point at the start angle
    pub fn start_point(&self) -> Vector2 {
        self.center + Vector2::from_angle(self.start_angle.to_radians()) * self.radius
    }

    /// Point at the end angle
    pub fn end_point(&self) -> Vector2 {
        self.center + Vector2::from_angle(self.end_angle.to_radians()) * self.radius
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Arc {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "ARC"
    }

    fn translate(&mut self, offset: Vector2) {
        self.center = self.center + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_defaults() {
        let arc = Arc::new();
        assert_eq!(arc.start_angle, 0.0);
        assert_eq!(arc.end_angle, 360.0);
    }

    #[test]
    fn test_arc_sweep_wraps() {
        let arc = Arc::from_center_radius_angles(Vector2::ZERO, 1.0, 270.0, 90.0);
        assert_eq!(arc.sweep_angle(), 180.0);
    }

    #[test]
    fn test_arc_end_points() {
        let arc = Arc::from_center_radius_angles(Vector2::new(1.0, 1.0), 2.0, 0.0, 90.0);
        assert!(arc.start_point().approx_eq(&Vector2::new(3.0, 1.0), 1e-12));
        assert!(arc.end_point().approx_eq(&Vector2::new(1.0, 3.0), 1e-12));
    }
}
