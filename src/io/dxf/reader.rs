//! DXF file reader
//!
//! Loading is a single forward pass over the tag stream followed by a link
//! resolution pass. References between records (block names, style handles,
//! hatch sources, viewport clip outlines) are collected while decoding and
//! patched once every record is known, so their order in the file does not
//! matter.

mod entity_reader;
mod pending;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use stream_reader::{DxfCodePair, DxfStreamReader, StreamMark};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::document::CadDocument;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, an entity or table entry that fails to decode is skipped
    /// and reported as a notification instead of aborting the read.
    /// Malformed handles and missing sections stay fatal.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,
    /// Keep model space only: paper space entities and layouts are dropped.
    pub model_space_only: bool,
}

impl DxfReaderConfiguration {
    /// Strict reader that only keeps model space
    pub fn model_space_only() -> Self {
        Self {
            failsafe: false,
            model_space_only: true,
        }
    }

    /// Turn failsafe mode on or off
    pub fn with_failsafe(mut self, failsafe: bool) -> Self {
        self.failsafe = failsafe;
        self
    }
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a new DXF reader from any reader. The stream is buffered
    /// whole so the reader can look ahead.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = DxfTextReader::from_reader(reader)?;
        Ok(Self::with_stream(Box::new(reader)))
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opening DXF file");
        Self::from_reader(BufReader::new(file))
    }

    /// Create a new DXF reader over bytes already in memory
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::with_stream(Box::new(DxfTextReader::new(data.into())))
    }

    /// Read from a custom tag stream
    pub fn with_stream(reader: Box<dyn DxfStreamReader>) -> Self {
        Self {
            reader,
            config: DxfReaderConfiguration::default(),
        }
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the stream and return the document
    pub fn read(mut self) -> Result<CadDocument> {
        let document = SectionReader::new(self.reader.as_mut(), self.config.clone()).read()?;
        tracing::info!(
            entities = document.entity_count(),
            layouts = document.layouts.len(),
            blocks = document.blocks.len(),
            notifications = document.notifications.len(),
            "DXF loaded"
        );
        Ok(document)
    }
}

/// Load the drawing at `path` with the default configuration
pub fn load(path: impl AsRef<Path>) -> Result<CadDocument> {
    DxfReader::from_file(path)?.read()
}
