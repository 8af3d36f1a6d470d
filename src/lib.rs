//! # dxf-graph
//!
//! A pure Rust library for building 2D drawings as an entity graph and
//! exchanging them as ASCII DXF.
//!
//! ## Features
//!
//! - 20 entity kinds, from lines and arcs to hatches, multileaders and tables
//! - Layer, line type, text style, dimension style and block tables
//! - Paper space layouts, multileader styles and table styles
//! - Line type (`.lin`) and hatch pattern (`.pat`) catalogs
//! - Order-independent reading: forward references resolve after the load
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dxf_graph::{io::dxf::DxfReader, CadDocument};
//!
//! // Read a DXF file
//! let mut doc = DxfReader::from_file("sample.dxf")?.read()?;
//!
//! // Access entities
//! for entity in doc.entities() {
//!     println!("{} {}", entity.type_name(), entity.handle());
//! }
//!
//! // Write to DXF
//! use dxf_graph::io::dxf::DxfWriter;
//! DxfWriter::new(doc).write_to_file("output.dxf")?;
//! # Ok::<(), dxf_graph::error::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`CadDocument`] owns every table, style, block, layout and entity
//! - [`EntityType`] is the closed union of entity kinds; links between
//!   entities are [`Handle`] values that read as absent once their target
//!   is gone
//! - [`io::dxf`] holds the two codecs: a section writer that re-handles the
//!   drawing on every save, and a single-pass reader that patches references
//!   once the whole stream is known

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod objects;
pub mod predefined;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{Color, Handle, HandleSeed, LineWeight, Vector2};

// Re-export entity types
pub use entities::{
    Arc, Circle, Dimension, DimensionKind, Ellipse, Entity, EntityList, EntityType, Hatch, Insert, Leader, Line,
    LwPolyline, MText, MultiLeader, Point, Polyline, Solid, Spline, Table as TableEntity, Text, Viewport, XLine,
};

// Re-export table types
pub use tables::{BlockRecord, DimStyle, Layer, LineType, Table, TableEntry, TextStyle};

// Re-export objects
pub use objects::{Layout, MultiLeaderStyle, TableStyle};

// Re-export catalogs
pub use catalog::{LineTypeCatalog, PatternCatalog};

// Re-export document
pub use document::CadDocument;

// Re-export notifications
pub use notification::{Notification, NotificationCollection, NotificationType};

// Re-export I/O types
pub use io::dxf::{load, save, DxfReader, DxfReaderConfiguration, DxfWriter, WriteOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cad_document_creation() {
        let doc = CadDocument::new();
        assert_eq!(doc.entity_count(), 0);
        assert!(doc.notifications.is_empty());
    }
}
