//! Heavy 2D polyline (POLYLINE / VERTEX / SEQEND)

use super::{Entity, EntityCommon, LwPolyline};
use crate::types::{Handle, Vector2};
use bitflags::bitflags;

bitflags! {
    /// Polyline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
        const CURVE_FIT = 2;
        const SPLINE_FIT = 4;
        const LINETYPE_CONTINUOUS = 128;
    }
}

/// One VERTEX record of a heavy polyline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineVertex {
    /// Handle of the VERTEX record, assigned on write
    pub handle: Handle,
    pub location: Vector2,
    pub start_width: f64,
    pub end_width: f64,
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(location: Vector2) -> Self {
        PolylineVertex {
            location,
            ..Default::default()
        }
    }
}

/// A heavy polyline: each vertex is its own record, closed by a SEQEND
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub common: EntityCommon,
    pub flags: PolylineFlags,
    /// Default start width for segments without their own
    pub default_start_width: f64,
    /// Default end width for segments without their own
    pub default_end_width: f64,
    pub vertices: Vec<PolylineVertex>,
    /// Handle of the terminating SEQEND record, assigned on write
    pub seqend_handle: Handle,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from plain vertex positions
    pub fn from_points(points: &[Vector2], closed: bool) -> Self {
        let mut flags = PolylineFlags::empty();
        flags.set(PolylineFlags::CLOSED, closed);
        Polyline {
            flags,
            vertices: points.iter().map(|p| PolylineVertex::new(*p)).collect(),
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }

    /// Convert into the equivalent lightweight polyline
    pub fn to_lwpolyline(&self) -> LwPolyline {
        let mut pl = LwPolyline::from_points(
            self.vertices.iter().map(|v| v.location).collect(),
            self.is_closed(),
        );
        pl.common = self.common.clone();
        if self.vertices.iter().any(|v| v.bulge != 0.0) {
            pl.bulges = self.vertices.iter().map(|v| v.bulge).collect();
        }
        if self.vertices.iter().any(|v| v.start_width != 0.0 || v.end_width != 0.0) {
            pl.start_widths = self.vertices.iter().map(|v| v.start_width).collect();
            pl.end_widths = self.vertices.iter().map(|v| v.end_width).collect();
        }
        pl
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "POLYLINE"
    }

    fn translate(&mut self, offset: Vector2) {
        for v in &mut self.vertices {
            v.location = v.location + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_closed_flag() {
        let pl = Polyline::from_points(&[Vector2::ZERO, Vector2::UNIT_X], true);
        assert!(pl.is_closed());
        assert_eq!(pl.vertices.len(), 2);
    }

    #[test]
    fn test_to_lwpolyline_keeps_bulges() {
        let mut pl = Polyline::from_points(&[Vector2::ZERO, Vector2::UNIT_X], false);
        pl.vertices[0].bulge = 1.0;
        let lw = pl.to_lwpolyline();
        assert_eq!(lw.bulges, vec![1.0, 0.0]);
        assert!(lw.start_widths.is_empty());
    }
}
