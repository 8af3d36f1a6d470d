//! Predefined arrowhead blocks
//!
//! Dimension styles and leaders name their arrowheads by kind; each kind but
//! [`ArrowHeadType::UserDefined`] maps to one of twenty fixed blocks that the
//! writer emits alongside the document's own blocks. The geometry is built
//! once per process on first use and shared read-only afterwards.

use once_cell::sync::Lazy;

use crate::entities::{Arc, Circle, EntityCommon, EntityType, Line, LwPolyline, Solid};
use crate::tables::ArrowHeadType;
use crate::types::{Color, LineWeight, Vector2};

/// Block names indexed by arrowhead kind
const BLOCK_NAMES: [&str; 20] = [
    "_Solid",
    "_ClosedBlank",
    "_Closed",
    "_Dot",
    "_ArchTick",
    "_Oblique",
    "_Open",
    "_Origin",
    "_Origin2",
    "_Open90",
    "_Open30",
    "_DotSmall",
    "_DotBlank",
    "_Small",
    "_BoxBlank",
    "_BoxFilled",
    "_DatumBlank",
    "_DatumFilled",
    "_Integral",
    "_None",
];

/// One fixed arrowhead block
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedBlock {
    pub kind: ArrowHeadType,
    pub name: &'static str,
    /// Unit-size geometry pointing along +X with its tip at the origin
    pub entities: Vec<EntityType>,
}

static PREDEFINED_BLOCKS: Lazy<Vec<PredefinedBlock>> = Lazy::new(build_blocks);

/// All twenty predefined blocks, in [`ArrowHeadType`] order
pub fn predefined_blocks() -> &'static [PredefinedBlock] {
    &PREDEFINED_BLOCKS
}

/// Block name of a predefined arrowhead; `None` for user defined arrows
pub fn predefined_block_name(kind: ArrowHeadType) -> Option<&'static str> {
    BLOCK_NAMES.get(usize::try_from(kind.value()).ok()?).copied()
}

/// Arrowhead kind named by `block_name` (case-insensitive);
/// `UserDefined` when it is not a predefined block
pub fn arrow_head_type(block_name: &str) -> ArrowHeadType {
    BLOCK_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(block_name))
        .map(|i| ArrowHeadType::PREDEFINED[i])
        .unwrap_or(ArrowHeadType::UserDefined)
}

/// True when `name` is one of the predefined block names
pub fn is_predefined_block(name: &str) -> bool {
    arrow_head_type(name) != ArrowHeadType::UserDefined
}

// ----------------------------------------------------------------------------
// Geometry
// ----------------------------------------------------------------------------

const SIXTH: f64 = 1.0 / 6.0;
const TAN_15: f64 = 0.26794919;
const DATUM_Y: f64 = 0.5773502700000001;

fn pt(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

/// Layer 0, ByBlock color and line type
fn fill_common() -> EntityCommon {
    let mut common = EntityCommon::new();
    common.color = Color::ByBlock;
    common.line_type = "ByBlock".to_string();
    common
}

/// Like [`fill_common`], plus a ByBlock line weight
fn stroke_common() -> EntityCommon {
    let mut common = fill_common();
    common.line_weight = LineWeight::ByBlock;
    common
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> EntityType {
    let mut line = Line::from_points(pt(x1, y1), pt(x2, y2));
    line.common = stroke_common();
    line.into()
}

fn circle(radius: f64) -> EntityType {
    let mut circle = Circle::from_center_radius(Vector2::ZERO, radius);
    circle.common = stroke_common();
    circle.into()
}

fn arc(center: Vector2, radius: f64, start: f64, end: f64) -> EntityType {
    let mut arc = Arc::from_center_radius_angles(center, radius, start, end);
    arc.common = stroke_common();
    arc.into()
}

fn solid(a: Vector2, b: Vector2, c: Vector2, d: Vector2) -> EntityType {
    let mut solid = Solid::from_corners(a, b, c, d);
    solid.common = fill_common();
    solid.into()
}

/// Filled disc drawn as a wide closed polyline of two half circles
fn dot(half_width: f64) -> EntityType {
    let mut pl = LwPolyline::from_points(vec![pt(-half_width, 0.0), pt(half_width, 0.0)], true);
    pl.common = fill_common();
    pl.set_constant_width(0.5);
    pl.set_bulges(vec![1.0, 1.0]);
    pl.into()
}

fn build_blocks() -> Vec<PredefinedBlock> {
    let geometry: [Vec<EntityType>; 20] = [
        // _Solid
        vec![{
            let mut s = Solid::from_corners(pt(-1.0, SIXTH), pt(0.0, 0.0), pt(-1.0, -SIXTH), pt(-1.0, SIXTH));
            s.common.color = Color::ByBlock;
            s.into()
        }],
        // _ClosedBlank
        vec![
            line(-1.0, SIXTH, 0.0, 0.0),
            line(0.0, 0.0, -1.0, -SIXTH),
            line(-1.0, SIXTH, -1.0, -SIXTH),
        ],
        // _Closed
        vec![
            line(-1.0, SIXTH, 0.0, 0.0),
            line(0.0, 0.0, -1.0, -SIXTH),
            line(-1.0, SIXTH, -1.0, -SIXTH),
            line(0.0, 0.0, -1.0, 0.0),
        ],
        // _Dot
        vec![dot(0.25), line(-0.5, 0.0, -1.0, 0.0)],
        // _ArchTick
        vec![
            {
                let mut pl = LwPolyline::from_points(vec![pt(-0.5, -0.5), pt(0.5, 0.5)], false);
                pl.common = fill_common();
                pl.set_constant_width(0.15);
                pl.into()
            },
            line(-1.0, 0.0, 0.0, 0.0),
        ],
        // _Oblique
        vec![line(-0.5, -0.5, 0.5, 0.5)],
        // _Open
        vec![
            line(-1.0, SIXTH, 0.0, 0.0),
            line(-1.0, -SIXTH, 0.0, 0.0),
            line(0.0, 0.0, -1.0, 0.0),
        ],
        // _Origin
        vec![circle(0.5), line(0.0, 0.0, -1.0, 0.0)],
        // _Origin2
        vec![circle(0.5), circle(0.25), line(-0.5, 0.0, -1.0, 0.0)],
        // _Open90
        vec![
            line(-0.5, 0.5, 0.0, 0.0),
            line(0.0, 0.0, -0.5, -0.5),
            line(0.0, 0.0, -1.0, 0.0),
        ],
        // _Open30
        vec![
            line(-1.0, TAN_15, 0.0, 0.0),
            line(-1.0, -TAN_15, 0.0, 0.0),
            line(0.0, 0.0, -1.0, 0.0),
        ],
        // _DotSmall
        vec![dot(0.0625)],
        // _DotBlank
        vec![circle(0.5), line(-0.5, 0.0, -1.0, 0.0)],
        // _Small
        vec![circle(0.25)],
        // _BoxBlank
        vec![
            line(-0.5, -0.5, 0.5, -0.5),
            line(0.5, -0.5, 0.5, 0.5),
            line(0.5, 0.5, -0.5, 0.5),
            line(-0.5, 0.5, -0.5, -0.5),
            line(-0.5, 0.0, -1.0, 0.0),
        ],
        // _BoxFilled
        vec![
            solid(pt(-0.5, 0.5), pt(0.5, 0.5), pt(-0.5, -0.5), pt(0.5, -0.5)),
            line(-0.5, 0.0, -1.0, 0.0),
        ],
        // _DatumBlank
        vec![
            line(0.0, DATUM_Y, -1.0, 0.0),
            line(-1.0, 0.0, 0.0, -DATUM_Y),
            line(0.0, DATUM_Y, 0.0, -DATUM_Y),
        ],
        // _DatumFilled
        vec![solid(pt(0.0, DATUM_Y), pt(-1.0, 0.0), pt(0.0, -DATUM_Y), pt(0.0, -DATUM_Y))],
        // _Integral
        vec![
            arc(pt(0.44488802, -0.09133463), 0.4541666700000002, 101.9999999980395, 167.9999999799193),
            arc(pt(-0.44488802, 0.09133463), 0.4541666700000002, 282.0000000215427, 348.0000000034225),
        ],
        // _None
        Vec::new(),
    ];

    geometry
        .into_iter()
        .enumerate()
        .map(|(i, entities)| PredefinedBlock {
            kind: ArrowHeadType::PREDEFINED[i],
            name: BLOCK_NAMES[i],
            entities,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_blocks_in_kind_order() {
        let blocks = predefined_blocks();
        assert_eq!(blocks.len(), 20);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.kind.value(), i as i16);
            assert_eq!(Some(block.name), predefined_block_name(block.kind));
        }
        assert!(blocks[19].entities.is_empty());
        assert_eq!(blocks[14].entities.len(), 5);
    }

    #[test]
    fn test_block_name_lookup() {
        assert_eq!(predefined_block_name(ArrowHeadType::Default), Some("_Solid"));
        assert_eq!(predefined_block_name(ArrowHeadType::Integral), Some("_Integral"));
        assert_eq!(predefined_block_name(ArrowHeadType::UserDefined), None);
    }

    #[test]
    fn test_arrow_head_type_from_name() {
        assert_eq!(arrow_head_type("_Dot"), ArrowHeadType::Dot);
        assert_eq!(arrow_head_type("_OPEN30"), ArrowHeadType::Open30);
        assert_eq!(arrow_head_type("MYARROW"), ArrowHeadType::UserDefined);
        assert!(is_predefined_block("_none"));
    }

    #[test]
    fn test_geometry_is_by_block() {
        for block in predefined_blocks() {
            for entity in &block.entities {
                assert_eq!(entity.common().color, Color::ByBlock);
                assert_eq!(entity.common().layer, "0");
            }
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| predefined_blocks().as_ptr() as usize))
            .collect();
        let ptrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }
}
