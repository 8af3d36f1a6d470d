//! Solid (filled quadrilateral) entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// A filled triangle or quadrilateral
///
/// Corners follow the zig-zag order used by the format: the fourth corner
/// is diagonal to the first. A triangle repeats the third corner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solid {
    pub common: EntityCommon,
    pub first_corner: Vector2,
    pub second_corner: Vector2,
    pub third_corner: Vector2,
    pub fourth_corner: Vector2,
}

impl Solid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quadrilateral from four corners
    pub fn from_corners(first: Vector2, second: Vector2, third: Vector2, fourth: Vector2) -> Self {
        Solid {
            common: EntityCommon::new(),
            first_corner: first,
            second_corner: second,
            third_corner: third,
            fourth_corner: fourth,
        }
    }

    /// Create a triangle
    pub fn triangle(first: Vector2, second: Vector2, third: Vector2) -> Self {
        Self::from_corners(first, second, third, third)
    }

    pub fn is_triangle(&self) -> bool {
        self.third_corner == self.fourth_corner
    }
}

impl Entity for Solid {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "SOLID"
    }

    fn translate(&mut self, offset: Vector2) {
        self.first_corner = self.first_corner + offset;
        self.second_corner = self.second_corner + offset;
        self.third_corner = self.third_corner + offset;
        self.fourth_corner = self.fourth_corner + offset;
    }
}
