//! Text tag stream writer

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::types::Handle;
use std::io::Write;

/// Text stream writer: one line for the code, one for the value
pub struct DxfTextWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfTextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Codes are right-aligned in a three character field
    fn write_code(&mut self, code: i32) -> Result<()> {
        writeln!(self.writer, "{:>3}", code)?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Six decimals, then trailing zeros removed while keeping one decimal
/// (`1.500000` becomes `1.5`, `2.000000` becomes `2.0`).
pub fn format_real(value: f64) -> String {
    let mut text = format!("{:.6}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    if text == "-0.0" {
        text.remove(0);
    }
    text
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", format_real(value))?;
        Ok(())
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{:X}", handle.value())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
