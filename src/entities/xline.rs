//! Construction line (infinite in both directions)

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// An infinite construction line through `base_point`
#[derive(Debug, Clone, PartialEq)]
pub struct XLine {
    pub common: EntityCommon,
    /// A point on the line
    pub base_point: Vector2,
    /// Unit direction vector
    pub direction: Vector2,
}

impl XLine {
    pub fn new() -> Self {
        XLine {
            common: EntityCommon::new(),
            base_point: Vector2::ZERO,
            direction: Vector2::UNIT_X,
        }
    }

    /// Create from a base point and a direction (normalized)
    pub fn from_point_direction(base_point: Vector2, direction: Vector2) -> Self {
        XLine {
            base_point,
            direction: direction.normalize(),
            ..Self::new()
        }
    }
}

impl Default for XLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for XLine {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "XLINE"
    }

    fn translate(&mut self, offset: Vector2) {
        self.base_point = self.base_point + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xline_normalizes_direction() {
        let x = XLine::from_point_direction(Vector2::ZERO, Vector2::new(0.0, 5.0));
        assert_eq!(x.direction, Vector2::UNIT_Y);
    }
}
