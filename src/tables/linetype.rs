//! Line type table entry

use super::impl_table_entry;
use crate::types::Handle;

/// Line type element (dash, dot, space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTypeElement {
    /// Length of the element (positive = dash, negative = space, 0 = dot)
    pub length: f64,
}

impl LineTypeElement {
    /// Create a dash element
    pub fn dash(length: f64) -> Self {
        LineTypeElement { length: length.abs() }
    }

    /// Create a space element
    pub fn space(length: f64) -> Self {
        LineTypeElement { length: -length.abs() }
    }

    /// Create a dot element
    pub fn dot() -> Self {
        LineTypeElement { length: 0.0 }
    }

    pub fn is_dash(&self) -> bool {
        self.length > 0.0
    }

    pub fn is_space(&self) -> bool {
        self.length < 0.0
    }

    pub fn is_dot(&self) -> bool {
        self.length == 0.0
    }
}

/// A line type table entry
///
/// The element list is used when the writer has no line type catalog
/// entry of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    /// Handle, assigned on write
    pub handle: Handle,
    pub name: String,
    pub description: String,
    /// Pattern elements
    pub elements: Vec<LineTypeElement>,
}

impl LineType {
    /// Create a new line type with no pattern
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            handle: Handle::NULL,
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
        }
    }

    /// Create a line type with a description and pattern
    pub fn with_pattern(
        name: impl Into<String>,
        description: impl Into<String>,
        elements: Vec<LineTypeElement>,
    ) -> Self {
        LineType {
            description: description.into(),
            elements,
            ..Self::new(name)
        }
    }

    /// Sum of absolute element lengths (group code 40)
    pub fn pattern_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length.abs()).sum()
    }

    /// Names reserved by the format; these are written as fixed entries
    pub fn is_reserved_name(name: &str) -> bool {
        ["ByBlock", "ByLayer", "Continuous"]
            .iter()
            .any(|r| r.eq_ignore_ascii_case(name))
    }
}

impl_table_entry!(LineType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_length() {
        let lt = LineType::with_pattern(
            "DASHED",
            "__ __",
            vec![LineTypeElement::dash(0.5), LineTypeElement::space(0.25)],
        );
        assert_eq!(lt.pattern_length(), 0.75);
        assert!(lt.elements[1].is_space());
    }

    #[test]
    fn test_reserved_names() {
        assert!(LineType::is_reserved_name("continuous"));
        assert!(LineType::is_reserved_name("BYLAYER"));
        assert!(!LineType::is_reserved_name("DASHED"));
    }
}
