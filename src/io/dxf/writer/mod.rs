//! DXF writer module
//!
//! Writing happens in two phases. The document is first prepared (required
//! default styles and layouts are added) and every entity is given a fresh
//! handle, predefined arrowhead blocks first, then model space, block
//! definitions and layouts. The sections are then emitted in their fixed
//! order by [`SectionWriter`].

mod entity_writer;
mod section_writer;
mod stream_writer;
mod text_writer;

pub use section_writer::{ArrowBlock, SectionWriter};
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt, MAX_STRING_CHUNK};
pub use text_writer::{format_real, DxfTextWriter};

use crate::catalog::{LineTypeCatalog, PatternCatalog};
use crate::document::{assign_entity_handles, CadDocument, ENTITY_HANDLE_BASE};
use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::predefined::predefined_blocks;
use crate::types::{HandleSeed, Vector2};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Settings that do not live in the document
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Line type definitions; entries found here replace the stored segments
    pub line_types: Option<LineTypeCatalog>,
    /// Hatch pattern definitions; patterns not found are written without lines
    pub patterns: Option<PatternCatalog>,
    /// Center of the active viewport
    pub view_center: Vector2,
    /// Height of the active viewport
    pub view_height: f64,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            line_types: None,
            patterns: None,
            view_center: Vector2::ZERO,
            view_height: 297.0,
        }
    }
}

/// DXF file writer
pub struct DxfWriter {
    document: CadDocument,
    options: WriteOptions,
    notifications: NotificationCollection,
}

impl DxfWriter {
    /// Create a new DXF writer with default options
    pub fn new(document: CadDocument) -> Self {
        Self {
            document,
            options: WriteOptions::default(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Replace the write options
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(BufWriter::new(file))
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(&mut self, writer: W) -> Result<()> {
        let mut stream_writer = DxfTextWriter::new(writer);
        self.notifications = write_document(&mut self.document, &self.options, &mut stream_writer)?;
        Ok(())
    }

    /// Write to a byte vector (useful for testing)
    pub fn write_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Diagnostics of the last write
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Get a reference to the document
    pub fn document(&self) -> &CadDocument {
        &self.document
    }

    /// Take the document back, with the handles given by the last write
    pub fn into_document(self) -> CadDocument {
        self.document
    }
}

/// Prepare `document`, assign handles and write every section to `writer`
pub fn write_document<W: DxfStreamWriter>(
    document: &mut CadDocument,
    options: &WriteOptions,
    writer: &mut W,
) -> Result<NotificationCollection> {
    document.prepare_before_write();

    let mut seed = HandleSeed::starting_after(ENTITY_HANDLE_BASE);
    let mut arrows = Vec::new();
    for block in predefined_blocks() {
        if document.block(block.name).is_some() {
            continue;
        }
        let mut entities = block.entities.clone();
        for entity in entities.iter_mut() {
            assign_entity_handles(entity, &mut seed);
        }
        arrows.push(ArrowBlock { name: block.name, entities });
    }

    document.reassign_handles(&mut seed);
    for style in document.multileader_styles.values_mut() {
        style.handle = seed.allocate();
    }
    for style in document.table_styles.values_mut() {
        style.handle = seed.allocate();
    }
    tracing::debug!(last_handle = seed.last(), arrows = arrows.len(), "handles assigned");

    let mut section_writer = SectionWriter::new(writer, document, options, &arrows);
    section_writer.write_document()?;
    let notifications = section_writer.into_notifications();
    for notification in notifications.iter() {
        tracing::debug!(message = %notification.message, "write diagnostic");
    }
    Ok(notifications)
}

/// Save `document` to `path`.
///
/// The catalogs are loaded first; when either cannot be read nothing is
/// written. The document keeps the handles assigned for this write.
pub fn save(
    document: &mut CadDocument,
    path: impl AsRef<Path>,
    line_type_file: Option<&Path>,
    pattern_file: Option<&Path>,
    view_center: Vector2,
    view_height: f64,
) -> Result<NotificationCollection> {
    let line_types = line_type_file.map(LineTypeCatalog::from_file).transpose()?;
    let patterns = pattern_file.map(PatternCatalog::from_file).transpose()?;
    let options = WriteOptions {
        line_types,
        patterns,
        view_center,
        view_height,
    };

    let file = File::create(path)?;
    let mut writer = DxfTextWriter::new(BufWriter::new(file));
    write_document(document, &options, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DxfError;
    use crate::entities::{Circle, EntityType, Hatch, Insert, Line};
    use crate::types::Handle;
    use ahash::AHashSet;

    fn sample() -> CadDocument {
        let mut doc = CadDocument::new();
        let circle = doc.add_entity(Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0));
        let mut hatch = Hatch::solid();
        hatch.add_boundary(Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0), None);
        hatch.add_associated_entity(circle, None);
        doc.add_entity(hatch);
        doc.define_block("PART", Vector2::ZERO).add_entity(Line::from_coords(0.0, 0.0, 1.0, 0.0));
        doc.add_entity(Insert::new("PART", Vector2::new(5.0, 5.0)));
        doc
    }

    #[test]
    fn test_write_sections_in_order() {
        let mut writer = DxfWriter::new(sample());
        let bytes = writer.write_to_vec().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let positions: Vec<usize> = ["HEADER", "TABLES", "BLOCKS", "ENTITIES", "OBJECTS"]
            .iter()
            .map(|name| text.find(&format!("  2\n{}\n", name)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.ends_with("  0\nEOF\n"));
    }

    #[test]
    fn test_entity_handles_are_unique_and_nonzero() {
        let mut writer = DxfWriter::new(sample());
        writer.write_to_vec().unwrap();
        let mut seen = AHashSet::new();
        for entity in writer.document().entities() {
            let handle = entity.handle();
            assert!(handle.is_valid());
            assert!(handle.value() > ENTITY_HANDLE_BASE);
            assert!(seen.insert(handle), "duplicate handle {}", handle);
        }
        for style in writer.document().multileader_styles.values() {
            assert!(seen.insert(style.handle));
        }
    }

    #[test]
    fn test_hatch_association_follows_rehandling() {
        let mut writer = DxfWriter::new(sample());
        writer.write_to_vec().unwrap();
        let doc = writer.document();
        let circle = doc.model_space.iter().find(|e| matches!(e, EntityType::Circle(_))).unwrap().handle();
        let hatch = doc
            .model_space
            .iter()
            .find_map(|e| match e {
                EntityType::Hatch(h) => Some(h),
                _ => None,
            })
            .unwrap();
        assert_eq!(hatch.outer.associated, vec![circle]);
    }

    #[test]
    fn test_predefined_blocks_are_written_once() {
        let mut doc = sample();
        doc.define_block("_Dot", Vector2::ZERO);
        let mut writer = DxfWriter::new(doc);
        let text = String::from_utf8(writer.write_to_vec().unwrap()).unwrap();
        assert_eq!(text.matches("  0\nBLOCK\n").count(), text.matches("  0\nENDBLK\n").count());
        assert_eq!(text.matches("  2\n_Dot\n").count(), 2);
        assert!(text.contains("  2\n_Solid\n"));
    }

    #[test]
    fn test_save_fails_on_missing_catalog() {
        let mut doc = sample();
        let dir = std::env::temp_dir().join("dxf_graph_missing_catalog");
        let out = dir.join("out.dxf");
        let result = save(
            &mut doc,
            &out,
            Some(Path::new("/nonexistent/acadiso.lin")),
            None,
            Vector2::ZERO,
            100.0,
        );
        assert!(matches!(result, Err(DxfError::Catalog(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_seqend_handle_follows_attributes() {
        let mut doc = CadDocument::new();
        let mut insert = Insert::new("PART", Vector2::ZERO);
        insert.add_attribute(Default::default());
        doc.add_entity(insert);
        let mut writer = DxfWriter::new(doc);
        writer.write_to_vec().unwrap();
        let EntityType::Insert(insert) = &writer.document().model_space.iter().next().unwrap() else {
            panic!("expected insert");
        };
        let first = insert.common.handle.value();
        assert_eq!(insert.attributes[0].common.handle, Handle::new(first + 1));
        assert_eq!(insert.seqend_handle, Handle::new(first + 2));
    }
}
