//! DXF (Drawing Exchange Format) reading and writing

pub mod code_page;
pub mod xdata;
mod reader;
mod writer;

pub use reader::{load, DxfCodePair, DxfReader, DxfReaderConfiguration, DxfStreamReader, DxfTextReader, StreamMark};
pub use writer::{format_real, save, write_document, DxfWriter, WriteOptions};
pub use writer::{ArrowBlock, DxfStreamWriter, DxfStreamWriterExt, DxfTextWriter, SectionWriter, MAX_STRING_CHUNK};
