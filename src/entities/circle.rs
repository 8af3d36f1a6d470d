//! Circle entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;
use std::f64::consts::PI;

/// A full circle
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point
    pub center: Vector2,
    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Create a unit circle at the origin
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            radius: 1.0,
        }
    }

    /// Create a circle from center and radius
    pub fn from_center_radius(center: Vector2, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Circle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "CIRCLE"
    }

    fn translate(&mut self, offset: Vector2) {
        self.center = self.center + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_creation() {
        let circle = Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0);
        assert_eq!(circle.diameter(), 100.0);
        assert_eq!(circle.entity_type(), "CIRCLE");
    }

    #[test]
    fn test_circle_translate() {
        let mut circle = Circle::new();
        circle.translate(Vector2::new(2.0, 3.0));
        assert_eq!(circle.center, Vector2::new(2.0, 3.0));
    }
}
