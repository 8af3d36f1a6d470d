//! Tag stream cursor trait and the code/value pair it yields

use crate::error::{DxfError, Result};
use crate::types::Handle;
use encoding_rs::Encoding;

/// One group code and its raw value line
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// Group code
    pub code: i32,
    /// Value as read, escapes already decoded
    pub value: String,
    /// Line number of the value, for diagnostics
    pub line: usize,
}

impl DxfCodePair {
    pub fn new(code: i32, value: impl Into<String>, line: usize) -> Self {
        Self {
            code,
            value: value.into(),
            line,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// `true` when this pair has `code` and, ignoring case, `value`
    pub fn is(&self, code: i32, value: &str) -> bool {
        self.code == code && self.value.trim().eq_ignore_ascii_case(value)
    }

    fn malformed(&self, expected: &str) -> DxfError {
        DxfError::Parse(format!(
            "line {}: group code {} expects {}, found '{}'",
            self.line, self.code, expected, self.value
        ))
    }

    pub fn as_i16(&self) -> Result<i16> {
        let text = self.value.trim();
        text.parse::<i16>()
            .or_else(|_| text.parse::<f64>().map(|v| v as i16))
            .map_err(|_| self.malformed("a 16-bit integer"))
    }

    pub fn as_i32(&self) -> Result<i32> {
        let text = self.value.trim();
        text.parse::<i32>()
            .or_else(|_| text.parse::<f64>().map(|v| v as i32))
            .map_err(|_| self.malformed("an integer"))
    }

    pub fn as_double(&self) -> Result<f64> {
        self.value.trim().parse::<f64>().map_err(|_| self.malformed("a real"))
    }

    pub fn as_bool(&self) -> Result<bool> {
        Ok(self.as_i16()? != 0)
    }

    pub fn as_handle(&self) -> Result<Handle> {
        Handle::parse_hex(self.value.trim()).ok_or_else(|| self.malformed("a hex handle"))
    }
}

/// Position in a tag stream, taken before a read so it can be undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMark {
    pub(crate) offset: usize,
    pub(crate) line: usize,
}

/// Cursor over a tag stream.
///
/// The grammar has no record lengths, so callers read one pair, inspect it
/// and rewind to the mark taken before the read when it belongs to the next
/// record.
pub trait DxfStreamReader {
    /// Read the next pair, `None` at the end of the stream
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Current position
    fn tell(&self) -> StreamMark;

    /// Go back to a position returned by [`DxfStreamReader::tell`]
    fn seek(&mut self, mark: StreamMark);

    /// `true` when no pair is left
    fn at_end(&self) -> bool;

    /// Decoding for bytes that are not valid UTF-8; `None` means Latin-1
    fn set_encoding(&mut self, encoding: Option<&'static Encoding>);

    /// Line number of the last line read
    fn line_number(&self) -> usize;

    /// Read the next pair without consuming it
    fn peek_pair(&mut self) -> Result<Option<DxfCodePair>> {
        let mark = self.tell();
        let pair = self.read_pair()?;
        self.seek(mark);
        Ok(pair)
    }

    /// Read a pair that must exist
    fn expect_pair(&mut self) -> Result<DxfCodePair> {
        let line = self.line_number();
        self.read_pair()?
            .ok_or_else(|| DxfError::Parse(format!("unexpected end of stream after line {}", line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_conversions() {
        let pair = DxfCodePair::new(70, "  42", 3);
        assert_eq!(pair.as_i16().unwrap(), 42);
        assert_eq!(pair.as_i32().unwrap(), 42);
        assert!(pair.as_bool().unwrap());
        let real = DxfCodePair::new(40, "1.5", 4);
        assert_eq!(real.as_double().unwrap(), 1.5);
        assert_eq!(DxfCodePair::new(70, "1.0", 5).as_i16().unwrap(), 1);
    }

    #[test]
    fn test_malformed_number_names_line() {
        let pair = DxfCodePair::new(40, "abc", 17);
        let err = pair.as_double().unwrap_err().to_string();
        assert!(err.contains("line 17"));
        assert!(err.contains("40"));
    }

    #[test]
    fn test_handle_and_keyword() {
        let pair = DxfCodePair::new(5, "2711", 1);
        assert_eq!(pair.as_handle().unwrap(), Handle::new(0x2711));
        assert!(DxfCodePair::new(0, "endsec", 1).is(0, "ENDSEC"));
        assert!(!DxfCodePair::new(2, "ENDSEC", 1).is(0, "ENDSEC"));
        assert!(DxfCodePair::new(5, "XYZ", 1).as_handle().is_err());
    }
}
