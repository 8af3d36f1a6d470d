//! Line type definition files (`.lin`)

use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, one_of, space0},
    combinator::{all_consuming, map, opt},
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use std::f64::consts::PI;
use std::path::Path;

use super::{classify, comma, number, read_catalog_text, CatalogLine};
use crate::error::Result;
use crate::tables::{LineType, LineTypeElement};

/// What a complex segment draws
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentShape {
    /// A shape from a compiled shape file
    Shape { name: String, file: String },
    /// A quoted string drawn with a text style
    Text { text: String, style: String },
}

/// Shape or text embedded in a segment
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedElement {
    pub shape: SegmentShape,
    pub scale: f64,
    /// Rotation in radians
    pub rotation: f64,
    /// Rotation is relative to the world X axis instead of the line
    pub absolute_rotation: bool,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl EmbeddedElement {
    fn new(shape: SegmentShape) -> Self {
        EmbeddedElement {
            shape,
            scale: 1.0,
            rotation: 0.0,
            absolute_rotation: false,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

/// One dash of a line type pattern
#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeSegment {
    /// Positive draws, negative skips, zero is a dot
    pub length: f64,
    pub embedded: Option<EmbeddedElement>,
}

/// A named line type definition
#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeDescriptor {
    pub name: String,
    pub description: String,
    pub segments: Vec<LineTypeSegment>,
}

impl LineTypeDescriptor {
    /// Sum of absolute segment lengths
    pub fn pattern_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length.abs()).sum()
    }

    /// Table entry carrying the plain dash pattern
    pub fn to_line_type(&self) -> LineType {
        LineType::with_pattern(
            self.name.clone(),
            self.description.clone(),
            self.segments
                .iter()
                .map(|s| LineTypeElement { length: s.length })
                .collect(),
        )
    }
}

/// All definitions of a `.lin` file
#[derive(Debug, Clone, Default)]
pub struct LineTypeCatalog {
    entries: Vec<LineTypeDescriptor>,
}

impl LineTypeCatalog {
    /// Load and parse a `.lin` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = read_catalog_text(path.as_ref())?;
        Ok(Self::parse(&text))
    }

    /// Parse `.lin` text. Malformed definition lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut current: Option<LineTypeDescriptor> = None;

        for line in text.lines() {
            match classify(line) {
                CatalogLine::Blank => {}
                CatalogLine::Header { name, description } => {
                    entries.extend(current.take());
                    current = Some(LineTypeDescriptor {
                        name: name.to_string(),
                        description: description.to_string(),
                        segments: Vec::new(),
                    });
                }
                CatalogLine::Body(body) => {
                    let Some(descriptor) = current.as_mut() else {
                        continue;
                    };
                    match all_consuming(definition)(body) {
                        Ok((_, segments)) => descriptor.segments = segments,
                        Err(e) => tracing::warn!(line_type = %descriptor.name, error = %e, "skipping malformed line type definition"),
                    }
                }
            }
        }
        entries.extend(current);
        LineTypeCatalog { entries }
    }

    /// Find a definition by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&LineTypeDescriptor> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineTypeDescriptor> {
        self.entries.iter()
    }
}

// ----------------------------------------------------------------------------
// Grammar
// ----------------------------------------------------------------------------

enum Item {
    Dash(f64),
    Embedded(EmbeddedElement),
}

/// `A,dash,dash,[shape,...],dash`
fn definition(input: &str) -> IResult<&str, Vec<LineTypeSegment>> {
    map(
        terminated(
            preceded(tuple((space0, one_of("Aa"))), many0(preceded(comma, item))),
            space0,
        ),
        |items| {
            let mut segments: Vec<LineTypeSegment> = Vec::new();
            for item in items {
                match item {
                    Item::Dash(length) => segments.push(LineTypeSegment { length, embedded: None }),
                    Item::Embedded(element) => match segments.last_mut() {
                        Some(last) if last.embedded.is_none() => last.embedded = Some(element),
                        _ => segments.push(LineTypeSegment {
                            length: 0.0,
                            embedded: Some(element),
                        }),
                    },
                }
            }
            segments
        },
    )(input)
}

fn item(input: &str) -> IResult<&str, Item> {
    alt((map(embedded, Item::Embedded), map(number, Item::Dash)))(input)
}

fn bare_field(input: &str) -> IResult<&str, &str> {
    map(take_till(|c| c == ',' || c == ']'), str::trim)(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

/// `[name,file,S=..,R=..,X=..,Y=..]`
fn embedded(input: &str) -> IResult<&str, EmbeddedElement> {
    let (input, _) = char('[')(input)?;
    let (input, _) = space0(input)?;
    let (input, text) = opt(quoted)(input)?;
    let (input, name) = match text {
        Some(_) => (input, ""),
        None => bare_field(input)?,
    };
    let (input, file) = preceded(comma, bare_field)(input)?;
    let (input, transforms) = many0(preceded(comma, transform))(input)?;
    let (input, _) = preceded(space0, char(']'))(input)?;

    let shape = match text {
        Some(text) => SegmentShape::Text {
            text: text.to_string(),
            style: file.to_string(),
        },
        None => SegmentShape::Shape {
            name: name.to_string(),
            file: file.to_string(),
        },
    };
    let mut element = EmbeddedElement::new(shape);
    for (key, value) in transforms {
        match key.to_ascii_uppercase() {
            'S' => element.scale = value,
            'A' => {
                element.absolute_rotation = true;
                element.rotation = value;
            }
            'R' => element.rotation = value,
            'X' => element.x_offset = value,
            'Y' => element.y_offset = value,
            _ => {}
        }
    }
    Ok((input, element))
}

/// `K=value[unit]`; rotations are converted to radians
fn transform(input: &str) -> IResult<&str, (char, f64)> {
    map(
        tuple((
            one_of("SsRrAaXxYy"),
            space0,
            char('='),
            number,
            opt(one_of("dDrRgG")),
            space0,
        )),
        |(key, _, _, value, unit, _)| {
            let value = match (key.to_ascii_uppercase(), unit.map(|u| u.to_ascii_uppercase())) {
                ('R' | 'A', Some('R')) => value,
                ('R' | 'A', Some('G')) => value * PI / 200.0,
                ('R' | 'A', _) => value.to_radians(),
                _ => value,
            };
            (key, value)
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIN: &str = "\
;; sample
*BORDER,Border __ __ . __ __ . __ __ . __ __ . __ __ .
A,.5,-.25,.5,-.25,0,-.25
*dashed,Dashed __ __ __ __ __ __ __ __ __ __ __ __ __ _
A, .5, -.25
*GAS_LINE,Gas line ----GAS----GAS----GAS----GAS----GAS----GAS--
A,.5,-.2,[\"GAS\",STANDARD,S=.1,R=0.0,X=-0.1,Y=-.05],-.25
*BOX,Box line ---[]---[]---
A,.5,-.2,[BOX,ltypeshp.shx,x=-.1,s=.1,a=90d],-.2
";

    #[test]
    fn test_parse_simple_definitions() {
        let catalog = LineTypeCatalog::parse(LIN);
        assert_eq!(catalog.len(), 4);
        let border = catalog.find("border").unwrap();
        assert_eq!(border.segments.len(), 6);
        assert_eq!(border.segments[4].length, 0.0);
        assert!((border.pattern_length() - 1.75).abs() < 1e-12);

        let dashed = catalog.find("DASHED").unwrap();
        assert_eq!(dashed.name, "dashed");
        assert_eq!(dashed.segments.len(), 2);
    }

    #[test]
    fn test_parse_text_element() {
        let catalog = LineTypeCatalog::parse(LIN);
        let gas = catalog.find("GAS_LINE").unwrap();
        assert_eq!(gas.segments.len(), 3);
        let embedded = gas.segments[1].embedded.as_ref().unwrap();
        assert_eq!(
            embedded.shape,
            SegmentShape::Text { text: "GAS".into(), style: "STANDARD".into() }
        );
        assert_eq!(embedded.scale, 0.1);
        assert_eq!(embedded.y_offset, -0.05);
    }

    #[test]
    fn test_parse_shape_element() {
        let catalog = LineTypeCatalog::parse(LIN);
        let boxed = catalog.find("box").unwrap();
        let embedded = boxed.segments[1].embedded.as_ref().unwrap();
        assert!(matches!(&embedded.shape, SegmentShape::Shape { name, file } if name == "BOX" && file == "ltypeshp.shx"));
        assert!(embedded.absolute_rotation);
        assert!((embedded.rotation - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_line_type() {
        let catalog = LineTypeCatalog::parse(LIN);
        let lt = catalog.find("DASHED").unwrap().to_line_type();
        assert_eq!(lt.elements.len(), 2);
        assert!((lt.pattern_length() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let catalog = LineTypeCatalog::parse("*BAD,bad\nA,.5,oops\n*OK,ok\nA,1\n");
        assert!(catalog.find("BAD").unwrap().segments.is_empty());
        assert_eq!(catalog.find("OK").unwrap().segments.len(), 1);
        assert!(catalog.find("missing").is_none());
    }
}
