//! Drawing entity types and traits
//!
//! Every entity kind is a variant of the closed union [`EntityType`]. Entities
//! are owned by exactly one [`EntityList`] (model space, a block definition or
//! a layout). Links between entities (reactors, viewport clip outlines, leader
//! annotations, hatch sources) are plain [`Handle`] values looked up through
//! the owning document; a handle with no live target reads as "absent".

use crate::types::{Color, Handle, LineWeight, Vector2};

pub mod arc;
pub mod attribute_definition;
pub mod attribute_entity;
pub mod circle;
pub mod dimension;
pub mod ellipse;
pub mod hatch;
pub mod insert;
pub mod leader;
pub mod line;
pub mod lwpolyline;
pub mod mtext;
pub mod multileader;
pub mod point;
pub mod polyline;
pub mod solid;
pub mod spline;
pub mod table;
pub mod text;
pub mod viewport;
pub mod xline;

pub use arc::Arc;
pub use attribute_definition::{AttributeDefinition, AttributeFlags, AttributeText};
pub use attribute_entity::AttributeEntity;
pub use circle::Circle;
pub use dimension::{DimStyleOverride, Dimension, DimensionKind};
pub use ellipse::Ellipse;
pub use hatch::{
    BoundaryEdge, BoundaryLoop, BoundaryPath, BoundaryPathFlags, Hatch, HatchPatternType,
    HatchStyle,
};
pub use insert::Insert;
pub use leader::{Leader, LeaderPathType};
pub use line::Line;
pub use lwpolyline::LwPolyline;
pub use mtext::{AttachmentPoint, DrawingDirection, MText};
pub use multileader::{
    BlockContent, LeaderBranch, MTextContent, MultiLeader, MultiLeaderContent, MultiLeaderContext,
    MultiLeaderPathType,
};
pub use point::Point;
pub use polyline::{Polyline, PolylineFlags, PolylineVertex};
pub use solid::Solid;
pub use spline::{Spline, SplineFlags};
pub use table::{Borders, Cell, CellAlignment, CellBlock, CellContent, CellKind, CellText, Table};
pub use text::{Text, TextHorizontalAlignment, TextVerticalAlignment};
pub use viewport::Viewport;
pub use xline::XLine;

/// Base trait for all drawing entities
pub trait Entity {
    /// Shared attributes (handle, layer, color, ...)
    fn common(&self) -> &EntityCommon;

    /// Mutable access to the shared attributes
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Keyword used for this entity in the tag stream (`LINE`, `HATCH`, ...)
    fn entity_type(&self) -> &'static str;

    /// Move the entity by `offset`
    fn translate(&mut self, offset: Vector2);

    /// Get the entity's unique handle
    fn handle(&self) -> Handle {
        self.common().handle
    }

    /// Set the entity's handle
    fn set_handle(&mut self, handle: Handle) {
        self.common_mut().handle = handle;
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Set the entity's layer name
    fn set_layer(&mut self, layer: String) {
        self.common_mut().layer = layer;
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Set the entity's color
    fn set_color(&mut self, color: Color) {
        self.common_mut().color = color;
    }

    /// Get the entity's line weight
    fn line_weight(&self) -> LineWeight {
        self.common().line_weight
    }

    /// Set the entity's line weight
    fn set_line_weight(&mut self, weight: LineWeight) {
        self.common_mut().line_weight = weight;
    }

    /// Get the entity's line type name
    fn line_type(&self) -> &str {
        &self.common().line_type
    }

    /// Set the entity's line type name
    fn set_line_type(&mut self, line_type: String) {
        self.common_mut().line_type = line_type;
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Unique handle (null until assigned by the document or the writer)
    pub handle: Handle,
    /// Layer name
    pub layer: String,
    /// Color
    pub color: Color,
    /// Line weight
    pub line_weight: LineWeight,
    /// Line type name
    pub line_type: String,
    /// Line type scale
    pub line_type_scale: f64,
    /// Entity lives in a paper space layout
    pub paperspace: bool,
    /// Weak back-references to entities that depend on this one
    pub reactors: Vec<Handle>,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
            line_type: "ByLayer".to_string(),
            line_type_scale: 1.0,
            paperspace: false,
            reactors: Vec::new(),
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of all entity kinds
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Point(Point),
    Solid(Solid),
    Spline(Spline),
    /// Lightweight polyline
    LwPolyline(LwPolyline),
    /// Heavy polyline (POLYLINE / VERTEX / SEQEND)
    Polyline(Polyline),
    MText(MText),
    Text(Text),
    /// Block reference, carrying its attribute instances
    Insert(Insert),
    AttributeDefinition(AttributeDefinition),
    /// All seven dimension geometries
    Dimension(Dimension),
    Leader(Leader),
    MultiLeader(MultiLeader),
    Hatch(Hatch),
    Table(Table),
    Viewport(Viewport),
    XLine(XLine),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Point(e) => e,
            EntityType::Solid(e) => e,
            EntityType::Spline(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::MText(e) => e,
            EntityType::Text(e) => e,
            EntityType::Insert(e) => e,
            EntityType::AttributeDefinition(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Leader(e) => e,
            EntityType::MultiLeader(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Table(e) => e,
            EntityType::Viewport(e) => e,
            EntityType::XLine(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Point(e) => e,
            EntityType::Solid(e) => e,
            EntityType::Spline(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::MText(e) => e,
            EntityType::Text(e) => e,
            EntityType::Insert(e) => e,
            EntityType::AttributeDefinition(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Leader(e) => e,
            EntityType::MultiLeader(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Table(e) => e,
            EntityType::Viewport(e) => e,
            EntityType::XLine(e) => e,
        }
    }

    /// Shared attributes of the wrapped entity
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Mutable shared attributes of the wrapped entity
    pub fn common_mut(&mut self) -> &mut EntityCommon {
        self.as_entity_mut().common_mut()
    }

    /// Handle of the wrapped entity
    pub fn handle(&self) -> Handle {
        self.common().handle
    }

    /// Keyword of the wrapped entity
    pub fn type_name(&self) -> &'static str {
        self.as_entity().entity_type()
    }

    /// Rewrite every weak reference held by this entity.
    ///
    /// `map` returns the replacement handle, or `None` when the target no
    /// longer exists. Dropped targets are removed from reference lists;
    /// positional lists (attribute definitions paired with values) keep
    /// their slot as a null handle so values stay aligned.
    pub fn remap_references(&mut self, map: &mut dyn FnMut(Handle) -> Option<Handle>) {
        fn retain(list: &mut Vec<Handle>, map: &mut dyn FnMut(Handle) -> Option<Handle>) {
            *list = list.iter().filter_map(|h| map(*h)).collect();
        }
        fn positional(list: &mut [Handle], map: &mut dyn FnMut(Handle) -> Option<Handle>) {
            for h in list.iter_mut() {
                *h = map(*h).unwrap_or(Handle::NULL);
            }
        }

        retain(&mut self.common_mut().reactors, map);
        match self {
            EntityType::Viewport(v) => {
                v.clip_entity = v.clip_entity.and_then(|h| map(h));
            }
            EntityType::Leader(l) => {
                l.annotation = l.annotation.and_then(|h| map(h));
            }
            EntityType::Hatch(h) => {
                for lp in h.loops_mut() {
                    retain(&mut lp.associated, map);
                }
            }
            EntityType::MultiLeader(m) => positional(&mut m.attribute_definitions, map),
            EntityType::Table(t) => {
                for cell in t.cells.iter_mut() {
                    if let CellContent::Block(block) = &mut cell.content {
                        positional(&mut block.attribute_definitions, map);
                    }
                }
            }
            _ => {}
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EntityType {
                fn from(e: $variant) -> Self {
                    EntityType::$variant(e)
                }
            }
        )*
    };
}

impl_from_entity!(
    Line, Circle, Arc, Ellipse, Point, Solid, Spline, LwPolyline, Polyline, MText, Text, Insert,
    AttributeDefinition, Dimension, Leader, MultiLeader, Hatch, Table, Viewport, XLine,
);

/// Ordered, exclusively owning sequence of entities.
///
/// Deliberately not `Clone`: an entity has exactly one owner, so a list can
/// only be moved or drained into another container.
#[derive(Debug, Default, PartialEq)]
pub struct EntityList {
    items: Vec<EntityType>,
}

impl EntityList {
    /// Create an empty list
    pub fn new() -> Self {
        EntityList { items: Vec::new() }
    }

    /// Append an entity
    pub fn push(&mut self, entity: EntityType) {
        self.items.push(entity);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityType> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EntityType> {
        self.items.iter_mut()
    }

    /// Entity at position `index`
    pub fn get(&self, index: usize) -> Option<&EntityType> {
        self.items.get(index)
    }

    /// Mutable entity at position `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EntityType> {
        self.items.get_mut(index)
    }

    /// Last entity in the list
    pub fn last_mut(&mut self) -> Option<&mut EntityType> {
        self.items.last_mut()
    }

    /// Position of the entity with `handle`
    pub fn position(&self, handle: Handle) -> Option<usize> {
        if handle.is_null() {
            return None;
        }
        self.items.iter().position(|e| e.handle() == handle)
    }

    /// Find an entity by handle
    pub fn find(&self, handle: Handle) -> Option<&EntityType> {
        self.position(handle).and_then(|i| self.items.get(i))
    }

    /// Find an entity by handle for mutation
    pub fn find_mut(&mut self, handle: Handle) -> Option<&mut EntityType> {
        self.position(handle).and_then(move |i| self.items.get_mut(i))
    }

    /// Remove and return the entity with `handle`
    pub fn remove(&mut self, handle: Handle) -> Option<EntityType> {
        self.position(handle).map(|i| self.items.remove(i))
    }

    /// Destroy every entity in the list
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move every entity out of the list
    pub fn drain(&mut self) -> std::vec::Drain<'_, EntityType> {
        self.items.drain(..)
    }
}

impl<'a> IntoIterator for &'a EntityList {
    type Item = &'a EntityType;
    type IntoIter = std::slice::Iter<'a, EntityType>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a mut EntityList {
    type Item = &'a mut EntityType;
    type IntoIter = std::slice::IterMut<'a, EntityType>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl IntoIterator for EntityList {
    type Item = EntityType;
    type IntoIter = std::vec::IntoIter<EntityType>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<EntityType> for EntityList {
    fn from_iter<I: IntoIterator<Item = EntityType>>(iter: I) -> Self {
        EntityList {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_handle(h: u64) -> EntityType {
        let mut line = Line::from_points(Vector2::ZERO, Vector2::new(1.0, 1.0));
        line.common.handle = Handle::new(h);
        line.into()
    }

    #[test]
    fn test_common_defaults() {
        let common = EntityCommon::new();
        assert_eq!(common.layer, "0");
        assert_eq!(common.line_type, "ByLayer");
        assert_eq!(common.line_type_scale, 1.0);
        assert_eq!(common.color, Color::ByLayer);
        assert!(common.reactors.is_empty());
    }

    #[test]
    fn test_entity_list_find_and_remove() {
        let mut list = EntityList::new();
        list.push(line_with_handle(0x10));
        list.push(line_with_handle(0x11));

        assert_eq!(list.len(), 2);
        assert!(list.find(Handle::new(0x11)).is_some());
        assert!(list.find(Handle::NULL).is_none());

        let removed = list.remove(Handle::new(0x10)).unwrap();
        assert_eq!(removed.handle(), Handle::new(0x10));
        assert_eq!(list.len(), 1);
        assert!(list.remove(Handle::new(0x10)).is_none());
    }

    #[test]
    fn test_remap_drops_dangling_reactors() {
        let mut e = line_with_handle(1);
        e.common_mut().reactors = vec![Handle::new(2), Handle::new(3)];
        e.remap_references(&mut |h| (h == Handle::new(2)).then(|| Handle::new(20)));
        assert_eq!(e.common().reactors, vec![Handle::new(20)]);
    }

    #[test]
    fn test_remap_viewport_clip() {
        let mut vp = Viewport::new();
        vp.clip_entity = Some(Handle::new(7));
        let mut e: EntityType = vp.into();
        e.remap_references(&mut |_| None);
        match e {
            EntityType::Viewport(v) => assert!(v.clip_entity.is_none()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_type_name_dispatch() {
        let e: EntityType = Circle::from_center_radius(Vector2::ZERO, 1.0).into();
        assert_eq!(e.type_name(), "CIRCLE");
    }
}
