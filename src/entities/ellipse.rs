//! Ellipse entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;
use std::f64::consts::{FRAC_PI_2, PI};

/// An ellipse or elliptical arc
///
/// The major axis is stored relative to the center. Start and end are
/// parametric angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub common: EntityCommon,
    /// Center point
    pub center: Vector2,
    /// Endpoint of the major axis, relative to the center
    pub major_axis: Vector2,
    /// Ratio of minor axis to major axis
    pub minor_axis_ratio: f64,
    /// Start parameter in radians
    pub start_parameter: f64,
    /// End parameter in radians
    pub end_parameter: f64,
}

impl Ellipse {
    /// Create a new ellipse
    pub fn new() -> Self {
        Ellipse {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            major_axis: Vector2::UNIT_X,
            minor_axis_ratio: 0.0,
            start_parameter: 0.0,
            end_parameter: 2.0 * PI,
        }
    }

    /// Create a full ellipse from center, major axis and ratio
    pub fn from_center_axes(center: Vector2, major_axis: Vector2, minor_axis_ratio: f64) -> Self {
        Ellipse {
            center,
            major_axis,
            minor_axis_ratio,
            ..Self::new()
        }
    }

    pub fn major_axis_length(&self) -> f64 {
        self.major_axis.length()
    }

    pub fn minor_axis_length(&self) -> f64 {
        self.major_axis.length() * self.minor_axis_ratio
    }

    /// Is this a closed ellipse rather than an arc
    pub fn is_full(&self) -> bool {
        ((self.end_parameter - self.start_parameter).abs() - 2.0 * PI).abs() < 1e-10
    }

    /// Axis, ratio and parameters with the ratio brought into `(0, 1]`.
    ///
    /// A ratio above one means the stored "major" axis is actually the minor
    /// one; the axis is turned a quarter and the parameters shifted to match.
    pub fn normalized(&self) -> (Vector2, f64, f64, f64) {
        let ratio = self.minor_axis_ratio;
        if ratio > 1.0 {
            let axis = Vector2::new(-self.major_axis.y * ratio, self.major_axis.x * ratio);
            let shift = |p: f64| if self.is_full() { p } else { p - FRAC_PI_2 };
            (axis, 1.0 / ratio, shift(self.start_parameter), shift(self.end_parameter))
        } else {
            (self.major_axis, ratio, self.start_parameter, self.end_parameter)
        }
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Ellipse {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "ELLIPSE"
    }

    fn translate(&mut self, offset: Vector2) {
        self.center = self.center + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_axes() {
        let e = Ellipse::from_center_axes(Vector2::ZERO, Vector2::new(4.0, 0.0), 0.5);
        assert_eq!(e.major_axis_length(), 4.0);
        assert_eq!(e.minor_axis_length(), 2.0);
        assert!(e.is_full());
    }

    #[test]
    fn test_normalized_swaps_axes() {
        let e = Ellipse::from_center_axes(Vector2::ZERO, Vector2::new(2.0, 0.0), 2.0);
        let (axis, ratio, start, end) = e.normalized();
        assert!(axis.approx_eq(&Vector2::new(0.0, 4.0), 1e-12));
        assert_eq!(ratio, 0.5);
        assert_eq!(start, 0.0);
        assert_eq!(end, 2.0 * PI);
    }

    #[test]
    fn test_normalized_keeps_small_ratio() {
        let e = Ellipse::from_center_axes(Vector2::ZERO, Vector2::new(2.0, 1.0), 0.3);
        assert_eq!(e.normalized().0, Vector2::new(2.0, 1.0));
    }
}
