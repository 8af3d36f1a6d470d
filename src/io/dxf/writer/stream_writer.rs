//! Tag stream writer trait and helpers shared by every section

use crate::error::Result;
use crate::types::{Color, Handle, Vector2};

/// Longest value line; longer strings are split across several pairs
pub const MAX_STRING_CHUNK: usize = 250;

/// Trait for writing code/value pairs
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with an i16 value
    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with an i32 value
    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    /// Write a code/value pair with a real value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a handle value (uppercase hex)
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write a flag as 0/1
    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_i16(code, i16::from(value))
    }

    /// Write a 2D point (codes 10/20 or similar)
    fn write_point2d(&mut self, x_code: i32, point: Vector2) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)
    }

    /// Write a 2D point followed by a zero Z (codes 10/20/30 or similar)
    fn write_point_z0(&mut self, x_code: i32, point: Vector2) -> Result<()> {
        self.write_point2d(x_code, point)?;
        self.write_double(x_code + 20, 0.0)
    }

    /// Write a color index, plus code 420 for true colors
    fn write_color(&mut self, code: i32, color: Color) -> Result<()> {
        self.write_i16(code, color.dxf_index())?;
        if let Some(true_color) = color.true_color() {
            self.write_i32(420, true_color)?;
        }
        Ok(())
    }

    /// Write a string split into chunks of at most [`MAX_STRING_CHUNK`]
    /// bytes. Every chunk but the last goes under `code`, the last one under
    /// `last_code`. Chunks never split a character.
    fn write_text_chunks(&mut self, code: i32, last_code: i32, text: &str) -> Result<()> {
        let mut rest = text;
        while rest.len() > MAX_STRING_CHUNK {
            let mut split = MAX_STRING_CHUNK;
            while !rest.is_char_boundary(split) {
                split -= 1;
            }
            let (chunk, tail) = rest.split_at(split);
            self.write_string(code, chunk)?;
            rest = tail;
        }
        self.write_string(last_code, rest)
    }

    /// Write an entity or object keyword
    fn write_entity_type(&mut self, entity_type: &str) -> Result<()> {
        self.write_string(0, entity_type)
    }

    /// Write a subclass marker
    fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(100, marker)
    }

    /// Write `102 {ACAD_REACTORS`, one 330 per handle, `102 }`
    fn write_reactors(&mut self, handles: &[Handle]) -> Result<()> {
        self.write_string(102, "{ACAD_REACTORS")?;
        for handle in handles {
            self.write_handle(330, *handle)?;
        }
        self.write_string(102, "}")
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }
}

impl<T: DxfStreamWriter> DxfStreamWriterExt for T {}
