//! Leader entity

use super::{Entity, EntityCommon};
use crate::types::{Handle, Vector2};

/// Leader path shape and arrow presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum LeaderPathType {
    LineNoArrow = 0,
    SplineNoArrow = 1,
    #[default]
    LineWithArrow = 2,
    SplineWithArrow = 3,
}

impl LeaderPathType {
    /// Combine the arrow flag (group 71) and spline flag (group 72)
    pub fn from_flags(has_arrow: bool, is_spline: bool) -> Self {
        match (has_arrow, is_spline) {
            (false, false) => LeaderPathType::LineNoArrow,
            (false, true) => LeaderPathType::SplineNoArrow,
            (true, false) => LeaderPathType::LineWithArrow,
            (true, true) => LeaderPathType::SplineWithArrow,
        }
    }

    pub fn has_arrow(self) -> bool {
        (self as i16) & 2 != 0
    }

    pub fn is_spline(self) -> bool {
        (self as i16) & 1 != 0
    }
}

/// A leader line, optionally linked to an MTEXT or INSERT annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub common: EntityCommon,
    /// Dimension style name
    pub style_name: String,
    pub path_type: LeaderPathType,
    /// Arrow size override; zero inherits the style
    pub arrow_size: f64,
    pub has_baseline: bool,
    /// Hookline direction flips against the horizontal when set
    pub baseline_direction: bool,
    pub vertices: Vec<Vector2>,
    /// Annotation text height
    pub char_height: f64,
    /// Annotation text width
    pub text_width: f64,
    /// Weak link to the annotation (an MTEXT or INSERT in the same container)
    pub annotation: Option<Handle>,
}

impl Leader {
    pub fn new() -> Self {
        Leader {
            common: EntityCommon::new(),
            style_name: "ISO-25".to_string(),
            path_type: LeaderPathType::LineWithArrow,
            arrow_size: 10.0,
            has_baseline: true,
            baseline_direction: false,
            vertices: Vec::new(),
            char_height: 10.0,
            text_width: 100.0,
            annotation: None,
        }
    }

    /// Create from a vertex path
    pub fn from_vertices(vertices: Vec<Vector2>) -> Self {
        Leader {
            vertices,
            ..Self::new()
        }
    }
}

impl Default for Leader {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Leader {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "LEADER"
    }

    fn translate(&mut self, offset: Vector2) {
        for v in &mut self.vertices {
            *v = *v + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_type_bits() {
        assert!(LeaderPathType::LineWithArrow.has_arrow());
        assert!(!LeaderPathType::LineWithArrow.is_spline());
        assert!(LeaderPathType::SplineNoArrow.is_spline());
        for t in [
            LeaderPathType::LineNoArrow,
            LeaderPathType::SplineNoArrow,
            LeaderPathType::LineWithArrow,
            LeaderPathType::SplineWithArrow,
        ] {
            assert_eq!(LeaderPathType::from_flags(t.has_arrow(), t.is_spline()), t);
        }
    }

    #[test]
    fn test_leader_defaults() {
        let l = Leader::new();
        assert_eq!(l.style_name, "ISO-25");
        assert_eq!(l.arrow_size, 10.0);
        assert!(l.annotation.is_none());
    }
}
