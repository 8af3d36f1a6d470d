//! Shared test utilities for dxf-graph integration tests.
//!
//! Read helpers, write-then-read round trips and entity collectors used by
//! every test crate via `mod common;`.

#![allow(dead_code)]

pub mod builders;

use dxf_graph::entities::EntityType;
use dxf_graph::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter};
use dxf_graph::{CadDocument, Handle};
use std::collections::BTreeMap;

/// Default tolerance for floating-point comparisons.
pub const TOL: f64 = 1e-6;

/// Check approximate equality of two f64 values within `TOL`.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

// ===========================================================================
// Read helpers
// ===========================================================================

/// Join `(code, value)` pairs into ASCII DXF text.
pub fn dxf_text(pairs: &[(i32, &str)]) -> String {
    let mut text = String::new();
    for (code, value) in pairs {
        text.push_str(&format!("{:>3}\n{}\n", code, value));
    }
    text
}

/// Wrap entity records into a minimal drawing with every required section.
pub fn drawing_with_entities(entities: &[(i32, &str)]) -> String {
    let mut pairs = vec![
        (0, "SECTION"),
        (2, "HEADER"),
        (9, "$ACADVER"),
        (1, "AC1015"),
        (0, "ENDSEC"),
        (0, "SECTION"),
        (2, "TABLES"),
        (0, "ENDSEC"),
        (0, "SECTION"),
        (2, "BLOCKS"),
        (0, "ENDSEC"),
        (0, "SECTION"),
        (2, "ENTITIES"),
    ];
    pairs.extend_from_slice(entities);
    pairs.extend_from_slice(&[(0, "ENDSEC"), (0, "EOF")]);
    dxf_text(&pairs)
}

/// Read DXF text in strict mode.
pub fn read_text(text: &str) -> CadDocument {
    DxfReader::from_bytes(text)
        .read()
        .unwrap_or_else(|e| panic!("Failed to read DXF: {e:?}"))
}

/// Read DXF text in failsafe mode.
pub fn read_text_failsafe(text: &str) -> CadDocument {
    let config = DxfReaderConfiguration {
        failsafe: true,
        ..Default::default()
    };
    DxfReader::from_bytes(text)
        .with_configuration(config)
        .read()
        .unwrap_or_else(|e| panic!("Failed to read DXF: {e:?}"))
}

// ===========================================================================
// Write + read-back
// ===========================================================================

/// Write a document to DXF bytes.
pub fn write_bytes(doc: CadDocument) -> Vec<u8> {
    DxfWriter::new(doc)
        .write_to_vec()
        .unwrap_or_else(|e| panic!("Failed to write DXF: {e:?}"))
}

/// Roundtrip: write the document as DXF and read it back in strict mode.
pub fn roundtrip(doc: CadDocument) -> CadDocument {
    let bytes = write_bytes(doc);
    DxfReader::from_bytes(bytes)
        .read()
        .unwrap_or_else(|e| panic!("Failed to read back DXF: {e:?}"))
}

// ===========================================================================
// Entity utilities
// ===========================================================================

/// Build a sorted frequency map of entity type names.
pub fn entity_type_histogram(doc: &CadDocument) -> BTreeMap<&'static str, usize> {
    let mut map = BTreeMap::new();
    for e in doc.entities() {
        *map.entry(e.type_name()).or_insert(0) += 1;
    }
    map
}

/// Every entity handle, in container order.
pub fn entity_handles(doc: &CadDocument) -> Vec<Handle> {
    doc.entities().map(EntityType::handle).collect()
}

/// First entity of a kind, by its DXF keyword.
pub fn first_of<'a>(doc: &'a CadDocument, type_name: &str) -> Option<&'a EntityType> {
    doc.entities().find(|e| e.type_name() == type_name)
}

/// Collect sorted layer names.
pub fn layer_names(doc: &CadDocument) -> Vec<String> {
    let mut names: Vec<_> = doc.layers.iter().map(|l| l.name.clone()).collect();
    names.sort();
    names
}
