//! I/O for DXF drawings

pub mod dxf;

pub use dxf::{load, save, DxfReader, DxfReaderConfiguration, DxfWriter, WriteOptions};
