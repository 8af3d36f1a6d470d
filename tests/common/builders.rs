//! Test document builders.
//!
//! `create_sample_document()` produces a drawing with one instance of each
//! annotation kind plus the cross references between them: a hatch tied to
//! its circle, a block reference with attributes, and a paper space layout
//! whose viewport is clipped by an outline polyline.

#![allow(dead_code)]

use dxf_graph::entities::*;
use dxf_graph::tables::{DimStyle, Layer};
use dxf_graph::types::{Color, Handle, Vector2};
use dxf_graph::CadDocument;

/// Name of the block defined by the sample document.
pub const SAMPLE_BLOCK: &str = "TAG_BLOCK";
/// Name of the paper space layout of the sample document.
pub const SAMPLE_LAYOUT: &str = "Sheet";
/// Dimension style whose values the sample dimension inherits.
pub const SAMPLE_DIM_STYLE: &str = "TEST-DIM";

/// Handles of the interesting entities of the sample document.
pub struct SampleHandles {
    pub circle: Handle,
    pub hatch: Handle,
    pub viewport: Handle,
}

/// A solid hatch whose single loop is derived from `circle`.
pub fn hatch_from_circle(circle: &Circle, circle_handle: Handle) -> Hatch {
    let mut hatch = Hatch::solid();
    assert!(hatch.add_boundary(circle.clone(), None));
    hatch.add_associated_entity(circle_handle, None);
    hatch
}

/// A 2 x 2 text table with fixed row heights and column widths.
pub fn text_table(origin: Vector2) -> Table {
    let mut table = Table::new(origin);
    assert!(table.initialize_cells(2, 2, CellKind::Text));
    table.set_row_height(8.0);
    table.set_column_width(30.0);
    for row in 0..2 {
        for column in 0..2 {
            if let Some(text) = table.cell_text_mut(row, column) {
                text.text = format!("R{row}C{column}");
            }
        }
    }
    table
}

/// Create the sample document.
pub fn create_sample_document() -> (CadDocument, SampleHandles) {
    let mut doc = CadDocument::new();
    doc.set_layer(Layer::with_color("Outlines", Color::RED));

    let mut style = DimStyle::new(SAMPLE_DIM_STYLE);
    style.arrow_head_size = 4.0;
    style.text_height = 3.0;
    doc.set_dim_style(style);

    // Row 1: plain geometry
    let mut line = Line::from_coords(0.0, 0.0, 10.0, 10.0);
    line.common.layer = "Outlines".to_string();
    doc.add_entity(line);

    let mut arc = Arc::new();
    arc.center = Vector2::new(25.0, 0.0);
    arc.radius = 5.0;
    arc.start_angle = 0.0;
    arc.end_angle = 180.0;
    doc.add_entity(arc);

    let mut pline = LwPolyline::from_points(
        vec![Vector2::new(50.0, 0.0), Vector2::new(60.0, 5.0), Vector2::new(70.0, 0.0)],
        true,
    );
    pline.set_bulges(vec![0.0, 0.5, 0.0]);
    doc.add_entity(pline);

    // Row 2: hatch tied to its circle
    let circle = Circle::from_center_radius(Vector2::new(0.0, 30.0), 5.0);
    let circle_handle = doc.add_entity(circle.clone());
    let hatch = doc.add_entity(hatch_from_circle(&circle, circle_handle));

    // Row 3: text and annotation
    let mut text = Text::new();
    text.value = "Title".to_string();
    text.base_point = Vector2::new(0.0, 60.0);
    text.alignment_point = text.base_point;
    text.height = 2.5;
    doc.add_entity(text);

    let mut mtext = MText::new();
    mtext.value = "Two\\Plines".to_string();
    mtext.insertion_point = Vector2::new(25.0, 60.0);
    mtext.height = 2.5;
    doc.add_entity(mtext);

    let mut dim = Dimension::aligned(Vector2::new(50.0, 60.0), Vector2::new(70.0, 60.0), Vector2::new(60.0, 65.0));
    dim.style_name = SAMPLE_DIM_STYLE.to_string();
    dim.override_text_height(5.0);
    doc.add_entity(dim);

    doc.add_entity(MultiLeader::with_text(
        "Note",
        Vector2::new(90.0, 70.0),
        vec![Vector2::new(80.0, 60.0), Vector2::new(88.0, 70.0)],
    ));

    doc.add_entity(text_table(Vector2::new(0.0, 90.0)));

    // Block with an attribute definition and a reference carrying its value
    let block = doc.define_block(SAMPLE_BLOCK, Vector2::ZERO);
    let mut definition = AttributeDefinition::new();
    definition.text.tag = "NUMBER".to_string();
    definition.prompt = "Number?".to_string();
    definition.text.height = 2.5;
    block.add_entity(definition);
    block.add_entity(Circle::from_center_radius(Vector2::ZERO, 2.0));

    let mut insert = Insert::new(SAMPLE_BLOCK, Vector2::new(100.0, 0.0));
    let mut attribute = AttributeEntity::new();
    attribute.text.tag = "NUMBER".to_string();
    attribute.text.value = "42".to_string();
    attribute.text.height = 2.5;
    insert.add_attribute(attribute);
    doc.add_entity(insert);

    // Paper space
    doc.add_layout(SAMPLE_LAYOUT);
    let viewport = doc
        .add_polygonal_viewport(
            SAMPLE_LAYOUT,
            vec![
                Vector2::new(10.0, 10.0),
                Vector2::new(110.0, 10.0),
                Vector2::new(110.0, 80.0),
                Vector2::new(10.0, 80.0),
            ],
            Vector2::new(50.0, 50.0),
            120.0,
            0.0,
        )
        .expect("layout exists");

    (
        doc,
        SampleHandles {
            circle: circle_handle,
            hatch,
            viewport,
        },
    )
}
