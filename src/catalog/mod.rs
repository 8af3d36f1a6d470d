//! Read-only line type (`.lin`) and hatch pattern (`.pat`) catalogs
//!
//! Both file kinds are line oriented: `;` starts a comment, `*NAME,text`
//! opens a definition and the following lines carry comma separated
//! numbers. Lookup is by case-insensitive name.

pub mod linetype_catalog;
pub mod pattern_catalog;

pub use linetype_catalog::{
    EmbeddedElement, LineTypeCatalog, LineTypeDescriptor, LineTypeSegment, SegmentShape,
};
pub use pattern_catalog::{PatternCatalog, PatternDescriptor, PatternLine};

use nom::{
    bytes::complete::take_till,
    character::complete::{char, space0},
    combinator::{map, opt, rest},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};
use std::path::Path;

use crate::error::{DxfError, Result};

/// `*NAME,description` header; the description may be absent
pub(crate) fn header(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        char('*'),
        map(
            separated_pair(take_till(|c| c == ','), opt(char(',')), rest),
            |(name, description): (&str, &str)| (name.trim(), description.trim()),
        ),
    )(input)
}

/// A real number with optional surrounding blanks
pub(crate) fn number(input: &str) -> IResult<&str, f64> {
    delimited(space0, double, space0)(input)
}

/// A comma with optional surrounding blanks
pub(crate) fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

/// Classification of one catalog line
pub(crate) enum CatalogLine<'a> {
    Blank,
    Header { name: &'a str, description: &'a str },
    Body(&'a str),
}

pub(crate) fn classify(line: &str) -> CatalogLine<'_> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return CatalogLine::Blank;
    }
    match header(line) {
        Ok((_, (name, description))) => CatalogLine::Header { name, description },
        Err(_) => CatalogLine::Body(line),
    }
}

/// Read a catalog file, accepting non-UTF-8 content as Latin-1
pub(crate) fn read_catalog_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| DxfError::Catalog(format!("{}: {}", path.display(), e)))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let (_, (name, desc)) = header("*DASHED,Dashed __ __ __").unwrap();
        assert_eq!(name, "DASHED");
        assert_eq!(desc, "Dashed __ __ __");
        let (_, (name, desc)) = header("*SOLID").unwrap();
        assert_eq!(name, "SOLID");
        assert_eq!(desc, "");
    }

    #[test]
    fn test_number_and_comma() {
        assert_eq!(number(" -.25 ").unwrap().1, -0.25);
        assert_eq!(comma(" , x").unwrap().0, "x");
    }

    #[test]
    fn test_classify() {
        assert!(matches!(classify("  ; comment"), CatalogLine::Blank));
        assert!(matches!(classify(""), CatalogLine::Blank));
        assert!(matches!(classify("*ANSI31, ANSI Iron"), CatalogLine::Header { name: "ANSI31", .. }));
        assert!(matches!(classify("45, 0,0, 0,.125"), CatalogLine::Body(_)));
    }
}
