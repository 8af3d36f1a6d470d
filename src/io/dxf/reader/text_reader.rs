//! Text tag stream reader over a fully buffered input

use super::stream_reader::{DxfCodePair, DxfStreamReader, StreamMark};
use crate::error::{DxfError, Result};
use encoding_rs::Encoding;
use std::io::Read;

/// Reader for the text form: one line for the code, one for the value
pub struct DxfTextReader {
    data: Vec<u8>,
    offset: usize,
    line_number: usize,
    /// Fallback for lines that are not UTF-8. `None` means Latin-1.
    encoding: Option<&'static Encoding>,
}

impl DxfTextReader {
    /// Wrap bytes already in memory
    pub fn new(data: Vec<u8>) -> Self {
        // A byte order mark is not part of the first code line
        let offset = if data.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
        Self {
            data,
            offset,
            line_number: 0,
            encoding: None,
        }
    }

    /// Buffer everything `reader` yields
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::new(data))
    }

    /// Next raw line without its terminator, `None` at the end
    fn next_line(&mut self) -> Option<&[u8]> {
        if self.offset >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.offset..];
        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.offset += consumed;
        self.line_number += 1;
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// UTF-8 first, then the configured encoding
    fn decode(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => match encoding {
                Some(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
                // Latin-1 maps bytes 0-255 to the same code points
                None => bytes.iter().map(|&b| char::from(b)).collect(),
            },
        }
    }

    /// Caret escapes used for control characters in values
    fn unescape(value: String) -> String {
        if !value.contains('^') {
            return value;
        }
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c != '^' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('J') => out.push('\n'),
                Some('M') => out.push('\r'),
                Some('I') => out.push('\t'),
                Some(' ') => out.push('^'),
                Some(other) => {
                    out.push('^');
                    out.push(other);
                }
                None => out.push('^'),
            }
        }
        out
    }
}

impl DxfStreamReader for DxfTextReader {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        let encoding = self.encoding;
        let code_line = match self.next_line() {
            Some(line) => Self::decode(line, encoding),
            None => return Ok(None),
        };
        let code_text = code_line.trim();
        if code_text.is_empty() && self.offset >= self.data.len() {
            // Trailing blank line after EOF
            return Ok(None);
        }
        let code = code_text.parse::<i32>().map_err(|_| {
            DxfError::Parse(format!("line {}: invalid group code '{}'", self.line_number, code_text))
        })?;

        let value = match self.next_line() {
            Some(line) => Self::decode(line, encoding),
            None => {
                return Err(DxfError::Parse(format!(
                    "line {}: end of stream after group code {}",
                    self.line_number, code
                )))
            }
        };
        Ok(Some(DxfCodePair::new(code, Self::unescape(value), self.line_number)))
    }

    fn tell(&self) -> StreamMark {
        StreamMark {
            offset: self.offset,
            line: self.line_number,
        }
    }

    fn seek(&mut self, mark: StreamMark) {
        self.offset = mark.offset.min(self.data.len());
        self.line_number = mark.line;
    }

    fn at_end(&self) -> bool {
        self.data[self.offset.min(self.data.len())..]
            .iter()
            .all(|b| b.is_ascii_whitespace())
    }

    fn set_encoding(&mut self, encoding: Option<&'static Encoding>) {
        self.encoding = encoding;
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> DxfTextReader {
        DxfTextReader::new(text.as_bytes().to_vec())
    }

    #[test]
    fn test_read_simple_pair() {
        let mut reader = reader("  0\nSECTION\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 0);
        assert_eq!(pair.value, "SECTION");
        assert!(reader.read_pair().unwrap().is_none());
        assert!(reader.at_end());
    }

    #[test]
    fn test_crlf_and_values_keep_spaces() {
        let mut reader = reader(" 1\r\n two words \r\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 1);
        assert_eq!(pair.value, " two words ");
    }

    #[test]
    fn test_tell_and_seek_rewind() {
        let mut reader = reader("  0\nSECTION\n  2\nHEADER\n");
        let mark = reader.tell();
        reader.read_pair().unwrap();
        assert_eq!(reader.line_number(), 2);
        reader.seek(mark);
        assert_eq!(reader.line_number(), 0);
        assert_eq!(reader.read_pair().unwrap().unwrap().value, "SECTION");
        let peeked = reader.peek_pair().unwrap().unwrap();
        assert_eq!(peeked.code, 2);
        assert_eq!(reader.read_pair().unwrap().unwrap(), peeked);
    }

    #[test]
    fn test_special_characters() {
        let mut reader = reader("1\nLine1^JLine2^MLine3^ x\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.value, "Line1\nLine2\rLine3^x");
    }

    #[test]
    fn test_invalid_code_is_an_error() {
        let mut reader = reader("abc\nLINE\n");
        assert!(matches!(reader.read_pair(), Err(DxfError::Parse(_))));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let mut reader = reader("  0\n");
        assert!(reader.read_pair().is_err());
    }

    #[test]
    fn test_legacy_code_page() {
        let mut bytes = b"  1\n".to_vec();
        bytes.extend_from_slice(&[0xD6, 0xD0]);
        bytes.push(b'\n');
        let mut reader = DxfTextReader::new(bytes.clone());
        reader.set_encoding(Some(encoding_rs::GBK));
        assert_eq!(reader.read_pair().unwrap().unwrap().value, "中");

        let mut latin = DxfTextReader::new(bytes);
        assert_eq!(latin.read_pair().unwrap().unwrap().value, "\u{D6}\u{D0}");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"  0\nEOF\n");
        let mut reader = DxfTextReader::new(bytes);
        assert!(reader.read_pair().unwrap().unwrap().is(0, "EOF"));
    }
}
