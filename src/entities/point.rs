//! Point entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// A single point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub common: EntityCommon,
    pub location: Vector2,
}

impl Point {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_location(location: Vector2) -> Self {
        Point {
            common: EntityCommon::new(),
            location,
        }
    }
}

impl Entity for Point {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "POINT"
    }

    fn translate(&mut self, offset: Vector2) {
        self.location = self.location + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_translate() {
        let mut p = Point::from_location(Vector2::new(1.0, 2.0));
        p.translate(Vector2::new(1.0, 1.0));
        assert_eq!(p.location, Vector2::new(2.0, 3.0));
        assert_eq!(p.common.layer, "0");
    }
}
