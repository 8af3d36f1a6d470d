//! Spline entity (NURBS curve)

use super::{Entity, EntityCommon};
use crate::types::Vector2;
use bitflags::bitflags;

bitflags! {
    /// Spline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SplineFlags: i16 {
        const CLOSED = 1;
        const PERIODIC = 2;
        const RATIONAL = 4;
        const PLANAR = 8;
        const LINEAR = 16;
    }
}

impl Default for SplineFlags {
    fn default() -> Self {
        SplineFlags::PLANAR
    }
}

/// A spline entity (NURBS curve)
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    /// Spline flags
    pub flags: SplineFlags,
    /// Degree of the spline (typically 3 for cubic)
    pub degree: i32,
    /// Knot values
    pub knots: Vec<f64>,
    /// Weights (rational splines only)
    pub weights: Vec<f64>,
    /// Control points
    pub control_points: Vec<Vector2>,
    /// Fit points
    pub fit_points: Vec<Vector2>,
    pub start_tangent: Vector2,
    pub end_tangent: Vector2,
}

impl Spline {
    /// Create an empty planar cubic spline
    pub fn new() -> Self {
        Spline {
            common: EntityCommon::new(),
            flags: SplineFlags::default(),
            degree: 3,
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            fit_points: Vec::new(),
            start_tangent: Vector2::ZERO,
            end_tangent: Vector2::ZERO,
        }
    }

    /// Create from control points with a clamped uniform knot vector
    pub fn from_control_points(degree: i32, control_points: Vec<Vector2>) -> Self {
        let knots = clamped_knots(degree.max(1) as usize, control_points.len());
        Spline {
            degree,
            knots,
            control_points,
            ..Self::new()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(SplineFlags::CLOSED)
    }

    pub fn is_periodic(&self) -> bool {
        self.flags.contains(SplineFlags::PERIODIC)
    }

    pub fn is_rational(&self) -> bool {
        self.flags.contains(SplineFlags::RATIONAL)
    }
}

/// Clamped uniform knot vector for `count` control points
fn clamped_knots(degree: usize, count: usize) -> Vec<f64> {
    if count <= degree {
        return Vec::new();
    }
    let spans = count - degree;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..spans).map(|i| i as f64 / spans as f64));
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Spline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "SPLINE"
    }

    fn translate(&mut self, offset: Vector2) {
        for p in self.control_points.iter_mut().chain(self.fit_points.iter_mut()) {
            *p = *p + offset;
        }
    }
}
