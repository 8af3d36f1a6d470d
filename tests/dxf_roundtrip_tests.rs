//! Write-then-read tests over the sample document

mod common;

use common::builders::*;
use common::*;
use dxf_graph::entities::*;
use dxf_graph::types::Vector2;
use dxf_graph::NotificationType;
use std::collections::HashSet;

#[test]
fn test_roundtrip_keeps_entity_kinds() {
    let (doc, _) = create_sample_document();
    let before = entity_type_histogram(&doc);
    let read = roundtrip(doc);
    let after = entity_type_histogram(&read);

    for kind in ["LINE", "ARC", "LWPOLYLINE", "CIRCLE", "HATCH", "TEXT", "MTEXT", "DIMENSION", "MULTILEADER", "INSERT", "VIEWPORT"] {
        assert_eq!(before.get(kind), after.get(kind), "count of {kind} changed");
    }
    assert!(!read.notifications.has_type(NotificationType::Error));
}

#[test]
fn test_roundtrip_handles_are_unique() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let handles = entity_handles(&read);
    let unique: HashSet<_> = handles.iter().copied().collect();
    assert_eq!(unique.len(), handles.len());
    assert!(handles.iter().all(|h| !h.is_null()));

    let largest = handles.iter().copied().max().unwrap();
    assert!(read.next_handle() > largest);
}

#[test]
fn test_roundtrip_hatch_stays_associated_with_circle() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let Some(EntityType::Hatch(hatch)) = first_of(&read, "HATCH") else {
        panic!("hatch missing");
    };
    assert!(hatch.solid_fill);
    let BoundaryPath::Polyline(pline) = &hatch.outer.path else {
        panic!("circle loop should be written as a polyline");
    };
    assert_eq!(pline.vertices.len(), 2);
    assert!(pline.is_closed);
    assert_eq!(pline.bulges, vec![1.0, 1.0]);

    assert_eq!(hatch.outer.associated.len(), 1);
    let target = read.entity(hatch.outer.associated[0]);
    assert!(matches!(target, Some(EntityType::Circle(c)) if approx_eq(c.radius, 5.0)));
    assert!(hatch.has_associated_entity(&read));
}

#[test]
fn test_roundtrip_viewport_clip_and_layout() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let layout = read.layout(SAMPLE_LAYOUT).expect("layout kept");
    let viewport = layout
        .entities
        .iter()
        .find_map(|e| match e {
            EntityType::Viewport(v) => Some(v),
            _ => None,
        })
        .expect("viewport kept");
    assert!(approx_eq(viewport.view_height, 120.0));
    assert_eq!(viewport.view_center, Vector2::new(50.0, 50.0));

    let clip = viewport.clip_entity.and_then(|h| read.entity(h));
    assert!(matches!(clip, Some(EntityType::LwPolyline(p)) if p.vertices.len() == 4));
}

#[test]
fn test_removed_clip_outline_reads_as_absent() {
    let (mut doc, handles) = create_sample_document();
    let Some(EntityType::Viewport(viewport)) = doc.entity(handles.viewport) else {
        panic!("viewport missing");
    };
    let outline = viewport.clip_entity.expect("clip set");
    assert!(doc.remove_entity(outline).is_some());

    let read = roundtrip(doc);
    let Some(EntityType::Viewport(viewport)) = first_of(&read, "VIEWPORT") else {
        panic!("viewport missing");
    };
    assert!(viewport.clip_entity.and_then(|h| read.entity(h)).is_none());
}

#[test]
fn test_removed_hatch_source_reads_as_absent() {
    let (mut doc, handles) = create_sample_document();
    assert!(doc.remove_entity(handles.circle).is_some());
    let Some(EntityType::Hatch(hatch)) = doc.entity(handles.hatch) else {
        panic!("hatch missing");
    };
    assert!(!hatch.has_associated_entity(&doc));

    let read = roundtrip(doc);
    let Some(EntityType::Hatch(hatch)) = first_of(&read, "HATCH") else {
        panic!("hatch missing");
    };
    assert!(!hatch.has_associated_entity(&read));
}

#[test]
fn test_roundtrip_dimension_override_and_fallback() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let Some(EntityType::Dimension(dim)) = first_of(&read, "DIMENSION") else {
        panic!("dimension missing");
    };
    assert_eq!(dim.style_name, SAMPLE_DIM_STYLE);
    assert!(matches!(dim.kind, DimensionKind::Aligned { .. }));
    // Overridden on the instance
    assert!(approx_eq(dim.text_height(&read), 5.0));
    // Inherited from the style
    assert!(approx_eq(dim.arrow_head_size(&read), 4.0));
}

#[test]
fn test_roundtrip_block_reference_attributes() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let block = read.block(SAMPLE_BLOCK).expect("block kept");
    assert!(block.entities.iter().any(|e| matches!(e, EntityType::AttributeDefinition(d) if d.tag() == "NUMBER")));

    let Some(EntityType::Insert(insert)) = first_of(&read, "INSERT") else {
        panic!("insert missing");
    };
    assert_eq!(insert.block_name, SAMPLE_BLOCK);
    let attribute = insert.attribute("NUMBER").expect("attribute kept");
    assert_eq!(attribute.value(), "42");
}

#[test]
fn test_roundtrip_table_grid() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let Some(EntityType::Table(table)) = first_of(&read, "ACAD_TABLE") else {
        panic!("table missing");
    };
    assert_eq!((table.row_count, table.column_count), (2, 2));
    assert!(table.invalid_reason().is_none());
    let Some(cell) = table.cell(1, 0) else {
        panic!("cell missing");
    };
    assert!(matches!(&cell.content, CellContent::Text(t) if t.text == "R1C0"));
}

#[test]
fn test_roundtrip_multileader_text() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);

    let Some(EntityType::MultiLeader(leader)) = first_of(&read, "MULTILEADER") else {
        panic!("multileader missing");
    };
    assert_eq!(leader.text_content().map(|t| t.text.as_str()), Some("Note"));
    assert_eq!(leader.context.leader.lines.len(), 1);
    assert!(leader.invalid_reason().is_none());
}

#[test]
fn test_second_roundtrip_keeps_kinds() {
    let once = roundtrip(create_sample_document().0);
    let before = entity_type_histogram(&once);
    let twice = roundtrip(once);
    assert_eq!(before, entity_type_histogram(&twice));
}

#[test]
fn test_layers_survive() {
    let (doc, _) = create_sample_document();
    let read = roundtrip(doc);
    let names = layer_names(&read);
    assert!(names.iter().any(|n| n == "0"));
    assert!(names.iter().any(|n| n == "Outlines"));
    let Some(EntityType::Line(line)) = first_of(&read, "LINE") else {
        panic!("line missing");
    };
    assert_eq!(line.common.layer, "Outlines");
}

#[test]
fn test_roundtrip_zero_suppression_override_stays_narrow() {
    let (mut doc, _) = create_sample_document();
    let handle = first_of(&doc, "DIMENSION").map(EntityType::handle).expect("dimension");
    if let Some(EntityType::Dimension(dim)) = doc.entity_mut(handle) {
        dim.override_suppress_leading_zeros(true);
    }
    let read = roundtrip(doc);

    let Some(EntityType::Dimension(dim)) = first_of(&read, "DIMENSION") else {
        panic!("dimension missing");
    };
    assert_eq!(dim.overrides.suppress_leading_zeros, Some(true));
    assert_eq!(dim.overrides.suppress_trailing_zeros, None);
    assert!(dim.suppress_leading_zeros(&read));
    assert!(dim.suppress_trailing_zeros(&read));
}
