//! Error types for dxf-graph

use std::io;
use thiserror::Error;

/// Main error type for reading and writing drawings
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tag stream
    #[error("Parse error: {0}")]
    Parse(String),

    /// A mandatory section is absent from the stream
    #[error("Missing section: {0}")]
    MissingSection(String),

    /// Invalid handle reference
    #[error("Invalid handle: {0:#X}")]
    InvalidHandle(u64),

    /// Object not found in document
    #[error("Object not found: handle {0:#X}")]
    ObjectNotFound(u64),

    /// Named container (block, layout) not found in document
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Invalid entity type
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    /// Line type or hatch pattern definition file could not be used
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxf-graph operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
