//! Lightweight polyline entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// A lightweight polyline: planar vertices with optional widths and bulges
///
/// Width and bulge vectors are sparse: they may be shorter than the vertex
/// list, and missing entries read as zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LwPolyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Vertex positions
    pub vertices: Vec<Vector2>,
    /// Is the polyline closed
    pub is_closed: bool,
    /// Constant width for every segment; per-vertex widths when `None`
    pub constant_width: Option<f64>,
    /// Per-vertex start widths
    pub start_widths: Vec<f64>,
    /// Per-vertex end widths
    pub end_widths: Vec<f64>,
    /// Per-vertex bulges (tan of a quarter of the arc angle)
    pub bulges: Vec<f64>,
}

impl LwPolyline {
    /// Create a new empty polyline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vertices
    pub fn from_points(vertices: Vec<Vector2>, is_closed: bool) -> Self {
        LwPolyline {
            vertices,
            is_closed,
            ..Self::default()
        }
    }

    /// Add a vertex
    pub fn add_point(&mut self, point: Vector2) {
        self.vertices.push(point);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn set_constant_width(&mut self, width: f64) {
        self.constant_width = Some(width);
    }

    pub fn clear_constant_width(&mut self) {
        self.constant_width = None;
    }

    pub fn is_constant_width(&self) -> bool {
        self.constant_width.is_some()
    }

    fn grow_widths(&mut self, index: usize) {
        if self.start_widths.len() < index + 1 {
            self.start_widths.resize(index + 1, 0.0);
        }
        if self.end_widths.len() < index + 1 {
            self.end_widths.resize(index + 1, 0.0);
        }
    }

    /// Set both widths at vertex `index`
    pub fn set_width(&mut self, index: usize, start_width: f64, end_width: f64) {
        debug_assert!(index < self.vertices.len());
        self.grow_widths(index);
        self.start_widths[index] = start_width;
        self.end_widths[index] = end_width;
    }

    pub fn set_start_width(&mut self, index: usize, start_width: f64) {
        debug_assert!(index < self.vertices.len());
        self.grow_widths(index);
        self.start_widths[index] = start_width;
    }

    pub fn set_end_width(&mut self, index: usize, end_width: f64) {
        debug_assert!(index < self.vertices.len());
        self.grow_widths(index);
        self.end_widths[index] = end_width;
    }

    /// Replace the width vectors
    pub fn set_widths(&mut self, start_widths: Vec<f64>, end_widths: Vec<f64>) {
        self.start_widths = start_widths;
        self.end_widths = end_widths;
    }

    /// Start width at `index`, zero when not set
    pub fn start_width(&self, index: usize) -> f64 {
        self.start_widths.get(index).copied().unwrap_or(0.0)
    }

    /// End width at `index`, zero when not set
    pub fn end_width(&self, index: usize) -> f64 {
        self.end_widths.get(index).copied().unwrap_or(0.0)
    }

    /// Set the bulge at vertex `index`
    pub fn set_bulge(&mut self, index: usize, bulge: f64) {
        debug_assert!(index < self.vertices.len());
        if self.bulges.len() < index + 1 {
            self.bulges.resize(index + 1, 0.0);
        }
        self.bulges[index] = bulge;
    }

    pub fn push_bulge(&mut self, bulge: f64) {
        self.bulges.push(bulge);
    }

    pub fn set_bulges(&mut self, bulges: Vec<f64>) {
        self.bulges = bulges;
    }

    /// Bulge at `index`, zero when not set
    pub fn bulge(&self, index: usize) -> f64 {
        debug_assert!(index < self.vertices.len());
        self.bulges.get(index).copied().unwrap_or(0.0)
    }

    pub fn has_bulges(&self) -> bool {
        !self.bulges.is_empty()
    }
}

impl Entity for LwPolyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "LWPOLYLINE"
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

    fn square() -> LwPolyline {
        LwPolyline::from_points(
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(0.0, 1.0),
            ],
            true,
        )
    }

    #[test]
    fn test_bulge_defaults_to_zero() {
        let mut pl = square();
        assert!(!pl.has_bulges());
        pl.set_bulge(2, 0.5);
        assert!(pl.has_bulges());
        assert_eq!(pl.bulges.len(), 3);
        assert_eq!(pl.bulge(1), 0.0);
        assert_eq!(pl.bulge(2), 0.5);
        assert_eq!(pl.bulge(3), 0.0);
    }

    #[test]
    fn test_widths_grow_together() {
        let mut pl = square();
        pl.set_start_width(1, 2.0);
        assert_eq!(pl.start_widths.len(), 2);
        assert_eq!(pl.end_widths.len(), 2);
        assert_eq!(pl.start_width(1), 2.0);
        assert_eq!(pl.end_width(1), 0.0);
        assert_eq!(pl.end_width(3), 0.0);
    }

    #[test]
    fn test_constant_width() {
        let mut pl = square();
        assert!(!pl.is_constant_width());
        pl.set_constant_width(0.5);
        assert_eq!(pl.constant_width, Some(0.5));
        pl.clear_constant_width();
        assert!(!pl.is_constant_width());
    }
}
