//! Hatch entity and boundary loop types

use bitflags::bitflags;

use crate::document::CadDocument;
use crate::entities::{Arc, Circle, Ellipse, Entity, EntityCommon, EntityType, Line, LwPolyline, Spline};
use crate::types::{Handle, Vector2};

/// Hatch pattern type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum HatchPatternType {
    /// User-defined pattern
    UserDefined = 0,
    /// Predefined pattern
    #[default]
    Predefined = 1,
    /// Custom pattern
    Custom = 2,
}

impl HatchPatternType {
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => HatchPatternType::UserDefined,
            2 => HatchPatternType::Custom,
            _ => HatchPatternType::Predefined,
        }
    }
}

/// Island detection style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum HatchStyle {
    /// Hatch "odd parity" area
    #[default]
    Normal = 0,
    /// Hatch outermost area only
    Outer = 1,
    /// Hatch through entire area
    Ignore = 2,
}

impl HatchStyle {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => HatchStyle::Outer,
            2 => HatchStyle::Ignore,
            _ => HatchStyle::Normal,
        }
    }

    /// Suffix appended to the pattern name on the wire
    pub(crate) fn name_suffix(self) -> &'static str {
        match self {
            HatchStyle::Normal => "",
            HatchStyle::Outer => ",_O",
            HatchStyle::Ignore => ",_I",
        }
    }
}

bitflags! {
    /// Boundary path flags (group code 92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BoundaryPathFlags: i32 {
        const OUTER = 0x1;
        const POLYLINE = 0x2;
        const EXPORT = 0x4;
        const TEXT = 0x8;
        const OUTERMOST = 0x10;
    }
}

impl Default for BoundaryPathFlags {
    fn default() -> Self {
        BoundaryPathFlags::empty()
    }
}

/// One edge of a composite boundary loop
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line(Line),
    Arc(Arc),
    Ellipse(Ellipse),
    Spline(Spline),
}

impl BoundaryEdge {
    /// Edge type discriminator (group code 72)
    pub fn type_code(&self) -> i16 {
        match self {
            BoundaryEdge::Line(_) => 1,
            BoundaryEdge::Arc(_) => 2,
            BoundaryEdge::Ellipse(_) => 3,
            BoundaryEdge::Spline(_) => 4,
        }
    }

    fn translate(&mut self, offset: Vector2) {
        match self {
            BoundaryEdge::Line(e) => e.translate(offset),
            BoundaryEdge::Arc(e) => e.translate(offset),
            BoundaryEdge::Ellipse(e) => e.translate(offset),
            BoundaryEdge::Spline(e) => e.translate(offset),
        }
    }
}

/// Geometry of a boundary loop: compact polyline or a heterogeneous edge list
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryPath {
    Polyline(LwPolyline),
    Edges(Vec<BoundaryEdge>),
}

impl BoundaryPath {
    pub fn is_empty(&self) -> bool {
        match self {
            BoundaryPath::Polyline(p) => p.vertices.is_empty(),
            BoundaryPath::Edges(edges) => edges.is_empty(),
        }
    }
}

impl Default for BoundaryPath {
    fn default() -> Self {
        BoundaryPath::Edges(Vec::new())
    }
}

/// A hatch boundary loop. The geometry is owned by the hatch; `associated`
/// holds weak links to the drawing entities the boundary was derived from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryLoop {
    pub flags: BoundaryPathFlags,
    pub path: BoundaryPath,
    pub associated: Vec<Handle>,
}

impl BoundaryLoop {
    pub fn new(flags: BoundaryPathFlags) -> Self {
        BoundaryLoop {
            flags,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Add boundary geometry. Returns false when the entity cannot be part of
    /// a boundary or would mix the compact and edge forms.
    fn add(&mut self, entity: EntityType, is_outer: bool) -> bool {
        let edge = match entity {
            EntityType::Circle(c) => {
                if !self.path.is_empty() {
                    return false;
                }
                self.path = BoundaryPath::Polyline(circle_to_polyline(&c));
                self.flags = compact_loop_flags(is_outer);
                return true;
            }
            EntityType::LwPolyline(p) => {
                if !self.path.is_empty() || !p.is_closed {
                    return false;
                }
                self.path = BoundaryPath::Polyline(p);
                self.flags = compact_loop_flags(is_outer);
                return true;
            }
            EntityType::Line(e) => BoundaryEdge::Line(e),
            EntityType::Arc(e) => BoundaryEdge::Arc(e),
            EntityType::Ellipse(e) => BoundaryEdge::Ellipse(e),
            EntityType::Spline(e) => BoundaryEdge::Spline(e),
            _ => return false,
        };
        match &mut self.path {
            BoundaryPath::Edges(edges) => {
                edges.push(edge);
                true
            }
            BoundaryPath::Polyline(_) => false,
        }
    }
}

/// Flags of a loop stored as a single closed polyline
fn compact_loop_flags(is_outer: bool) -> BoundaryPathFlags {
    if is_outer {
        BoundaryPathFlags::OUTER | BoundaryPathFlags::POLYLINE | BoundaryPathFlags::EXPORT
    } else {
        BoundaryPathFlags::POLYLINE
    }
}

/// Closed two-vertex polyline equivalent of a circle
pub(crate) fn circle_to_polyline(circle: &Circle) -> LwPolyline {
    let (c, r) = (circle.center, circle.radius);
    let mut pline = LwPolyline::from_points(
        vec![Vector2::new(c.x - r, c.y), Vector2::new(c.x + r, c.y)],
        true,
    );
    pline.set_bulges(vec![1.0, 1.0]);
    pline
}

/// Hatch fill entity
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    pub common: EntityCommon,
    /// Solid fill instead of a pattern
    pub solid_fill: bool,
    pub style: HatchStyle,
    // Pattern fields are only meaningful for pattern fills
    pub pattern_name: String,
    pub pattern_type: HatchPatternType,
    pub pattern_scale: f64,
    /// Pattern angle in degrees
    pub pattern_angle: f64,
    /// Group code 47
    pub pixel_size: f64,
    pub outer: BoundaryLoop,
    pub inner: Vec<BoundaryLoop>,
}

impl Hatch {
    pub fn new() -> Self {
        Hatch {
            common: EntityCommon::new(),
            solid_fill: false,
            style: HatchStyle::Normal,
            pattern_name: "ANSI31".to_string(),
            pattern_type: HatchPatternType::Predefined,
            pattern_scale: 1.0,
            pattern_angle: 0.0,
            pixel_size: 2.5,
            outer: BoundaryLoop::new(BoundaryPathFlags::OUTER | BoundaryPathFlags::EXPORT),
            inner: Vec::new(),
        }
    }

    /// Create a solid fill hatch
    pub fn solid() -> Self {
        Hatch {
            solid_fill: true,
            pattern_name: "SOLID".to_string(),
            ..Self::new()
        }
    }

    /// Create a pattern fill hatch
    pub fn with_pattern(name: impl Into<String>, scale: f64, angle: f64) -> Self {
        Hatch {
            pattern_name: name.into(),
            pattern_scale: scale,
            pattern_angle: angle,
            ..Self::new()
        }
    }

    /// Solid fill flag, or a pattern literally named SOLID
    pub fn is_solid(&self) -> bool {
        self.solid_fill || self.pattern_name.eq_ignore_ascii_case("SOLID")
    }

    fn loop_for(&mut self, loop_index: Option<usize>) -> &mut BoundaryLoop {
        match loop_index {
            None => &mut self.outer,
            Some(i) => {
                if self.inner.len() <= i {
                    self.inner.resize_with(i + 1, BoundaryLoop::default);
                }
                &mut self.inner[i]
            }
        }
    }

    /// Add boundary geometry to the outer loop (`None`) or an inner loop.
    ///
    /// A loop is either a single closed LwPolyline/Circle or a list of
    /// Line/Arc/Ellipse/Spline edges. Closing an edge loop is the caller's job.
    pub fn add_boundary(&mut self, entity: impl Into<EntityType>, loop_index: Option<usize>) -> bool {
        let is_outer = loop_index.is_none();
        self.loop_for(loop_index).add(entity.into(), is_outer)
    }

    /// Link a drawing entity the loop was derived from
    pub fn add_associated_entity(&mut self, handle: Handle, loop_index: Option<usize>) {
        self.loop_for(loop_index).associated.push(handle);
    }

    /// True when any associated link still points at a live entity
    pub fn has_associated_entity(&self, document: &CadDocument) -> bool {
        self.loops()
            .flat_map(|lp| lp.associated.iter())
            .any(|h| document.entity(*h).is_some())
    }

    /// Outer loop followed by the inner loops
    pub fn loops(&self) -> impl Iterator<Item = &BoundaryLoop> {
        std::iter::once(&self.outer).chain(self.inner.iter())
    }

    pub fn loops_mut(&mut self) -> impl Iterator<Item = &mut BoundaryLoop> {
        std::iter::once(&mut self.outer).chain(self.inner.iter_mut())
    }

    pub fn loop_count(&self) -> usize {
        self.inner.len() + 1
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Hatch {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "HATCH"
    }

    fn translate(&mut self, offset: Vector2) {
        for lp in self.loops_mut() {
            match &mut lp.path {
                BoundaryPath::Polyline(p) => p.translate(offset),
                BoundaryPath::Edges(edges) => edges.iter_mut().for_each(|e| e.translate(offset)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hatch_defaults() {
        let h = Hatch::new();
        assert_eq!(h.pattern_name, "ANSI31");
        assert_eq!(h.pattern_type, HatchPatternType::Predefined);
        assert_eq!(h.outer.flags, BoundaryPathFlags::OUTER | BoundaryPathFlags::EXPORT);
        assert!(h.outer.is_empty());
        assert!(!h.is_solid());
        assert!(Hatch::solid().is_solid());
    }

    #[test]
    fn test_circle_becomes_compact_polyline() {
        let mut h = Hatch::solid();
        assert!(h.add_boundary(Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0), None));
        match &h.outer.path {
            BoundaryPath::Polyline(p) => {
                assert!(p.is_closed);
                assert_eq!(p.vertices, vec![Vector2::new(-40.0, 10.0), Vector2::new(60.0, 10.0)]);
                assert_eq!(p.bulges, vec![1.0, 1.0]);
            }
            other => panic!("unexpected path {:?}", other),
        }
        assert_eq!(
            h.outer.flags,
            BoundaryPathFlags::OUTER | BoundaryPathFlags::POLYLINE | BoundaryPathFlags::EXPORT
        );
    }

    #[test]
    fn test_edge_loop_rejects_mixing() {
        let mut h = Hatch::new();
        assert!(h.add_boundary(Line::from_coords(0.0, 0.0, 10.0, 0.0), None));
        assert!(h.add_boundary(Arc::from_center_radius_angles(Vector2::new(5.0, 0.0), 5.0, 0.0, 180.0), None));
        assert!(!h.add_boundary(Circle::from_center_radius(Vector2::ZERO, 1.0), None));
        assert!(!h.add_boundary(crate::entities::Point::new(), None));
        match &h.outer.path {
            BoundaryPath::Edges(edges) => {
                assert_eq!(edges.len(), 2);
                assert_eq!(edges[1].type_code(), 2);
            }
            other => panic!("unexpected path {:?}", other),
        }
    }

    #[test]
    fn test_inner_loops_grow() {
        let mut h = Hatch::new();
        h.add_boundary(Circle::from_center_radius(Vector2::ZERO, 1.0), Some(2));
        assert_eq!(h.inner.len(), 3);
        assert!(h.inner[0].is_empty());
        assert_eq!(h.inner[2].flags, BoundaryPathFlags::POLYLINE);

        h.add_associated_entity(Handle::new(0x40), Some(4));
        assert_eq!(h.loop_count(), 6);
        assert_eq!(h.inner[4].associated, vec![Handle::new(0x40)]);
    }

    #[test]
    fn test_polyline_loop_flags_match_circle_loop() {
        let square = LwPolyline::from_points(
            vec![Vector2::ZERO, Vector2::UNIT_X, Vector2::new(1.0, 1.0), Vector2::UNIT_Y],
            true,
        );
        let mut h = Hatch::new();
        h.outer.flags = BoundaryPathFlags::empty();
        assert!(h.add_boundary(square.clone(), None));
        assert_eq!(
            h.outer.flags,
            BoundaryPathFlags::OUTER | BoundaryPathFlags::POLYLINE | BoundaryPathFlags::EXPORT
        );

        assert!(h.add_boundary(square, Some(0)));
        assert_eq!(h.inner[0].flags, BoundaryPathFlags::POLYLINE);
    }

    #[test]
    fn test_open_polyline_rejected() {
        let mut h = Hatch::new();
        let open = LwPolyline::from_points(vec![Vector2::ZERO, Vector2::UNIT_X], false);
        assert!(!h.add_boundary(open, None));
    }
}
