//! Hatch pattern definition files (`.pat`)

use nom::{combinator::all_consuming, multi::separated_list1, IResult};
use std::path::Path;

use super::{classify, comma, number, read_catalog_text, CatalogLine};
use crate::error::Result;
use crate::types::Vector2;

/// One family of parallel dashed lines
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLine {
    /// Line angle in degrees
    pub angle: f64,
    pub origin: Vector2,
    /// Offset between successive lines, in the line's own frame
    pub offset: Vector2,
    /// Dash lengths; empty for a continuous line
    pub dashes: Vec<f64>,
}

/// A named hatch pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDescriptor {
    pub name: String,
    pub description: String,
    pub lines: Vec<PatternLine>,
}

/// All patterns of a `.pat` file
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    entries: Vec<PatternDescriptor>,
}

impl PatternCatalog {
    /// Load and parse a `.pat` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = read_catalog_text(path.as_ref())?;
        Ok(Self::parse(&text))
    }

    /// Parse `.pat` text. Lines with fewer than five numbers are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut current: Option<PatternDescriptor> = None;

        for line in text.lines() {
            match classify(line) {
                CatalogLine::Blank => {}
                CatalogLine::Header { name, description } => {
                    entries.extend(current.take());
                    current = Some(PatternDescriptor {
                        name: name.to_string(),
                        description: description.to_string(),
                        lines: Vec::new(),
                    });
                }
                CatalogLine::Body(body) => {
                    let Some(descriptor) = current.as_mut() else {
                        continue;
                    };
                    match pattern_line(body) {
                        Some(line) => descriptor.lines.push(line),
                        None => tracing::warn!(pattern = %descriptor.name, line = body, "skipping malformed pattern line"),
                    }
                }
            }
        }
        entries.extend(current);
        PatternCatalog { entries }
    }

    /// Find a pattern by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&PatternDescriptor> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternDescriptor> {
        self.entries.iter()
    }
}

fn numbers(input: &str) -> IResult<&str, Vec<f64>> {
    separated_list1(comma, number)(input)
}

/// `angle, x, y, dx, dy[, dash...]`
fn pattern_line(body: &str) -> Option<PatternLine> {
    let (_, values) = all_consuming(numbers)(body).ok()?;
    match values.as_slice() {
        [angle, x, y, dx, dy, dashes @ ..] => Some(PatternLine {
            angle: *angle,
            origin: Vector2::new(*x, *y),
            offset: Vector2::new(*dx, *dy),
            dashes: dashes.to_vec(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAT: &str = "\
*ANSI31, ANSI Iron, Brick, Stone masonry
45, 0,0, 0,.125
*ANSI37, ANSI Lead, Zinc, Magnesium
45, 0,0, 0,.125
; second family
135, 0,0, 0,.125
*DASH,Dashed lines
0, 0,0, .125,.125, .125,-.125
";

    #[test]
    fn test_parse_patterns() {
        let catalog = PatternCatalog::parse(PAT);
        assert_eq!(catalog.len(), 3);

        let ansi31 = catalog.find("ansi31").unwrap();
        assert_eq!(ansi31.description, "ANSI Iron, Brick, Stone masonry");
        assert_eq!(ansi31.lines.len(), 1);
        assert_eq!(ansi31.lines[0].angle, 45.0);
        assert_eq!(ansi31.lines[0].offset, Vector2::new(0.0, 0.125));
        assert!(ansi31.lines[0].dashes.is_empty());
    }

    #[test]
    fn test_comment_does_not_end_pattern() {
        let catalog = PatternCatalog::parse(PAT);
        let ansi37 = catalog.find("ANSI37").unwrap();
        assert_eq!(ansi37.lines.len(), 2);
        assert_eq!(ansi37.lines[1].angle, 135.0);
    }

    #[test]
    fn test_dashes() {
        let catalog = PatternCatalog::parse(PAT);
        let dash = catalog.find("DASH").unwrap();
        assert_eq!(dash.lines[0].dashes, vec![0.125, -0.125]);
    }

    #[test]
    fn test_short_line_is_skipped() {
        let catalog = PatternCatalog::parse("*P,p\n0,0,0\n90, 0,0, 0,1\n");
        let p = catalog.find("P").unwrap();
        assert_eq!(p.lines.len(), 1);
        assert_eq!(p.lines[0].angle, 90.0);
        assert!(catalog.find("Q").is_none());
    }
}
