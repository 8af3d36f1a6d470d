//! Text style table entry

use super::impl_table_entry;
use crate::types::Handle;

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Handle, assigned on write
    pub handle: Handle,
    /// Style name
    pub name: String,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name (for Asian languages)
    pub big_font_file: String,
    /// Fixed text height (0 = variable)
    pub height: f64,
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// TrueType font family; takes precedence over the font files when set
    pub true_type_font: String,
}

impl TextStyle {
    /// Create a new text style using the default shape font
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            handle: Handle::NULL,
            name: name.into(),
            font_file: "txt.shx".to_string(),
            big_font_file: String::new(),
            height: 2.5,
            width_factor: 1.0,
            oblique_angle: 0.0,
            true_type_font: String::new(),
        }
    }

    /// Create the "Standard" style
    pub fn standard() -> Self {
        Self::new("Standard")
    }

    /// Create a style using a TrueType font family
    pub fn true_type(name: impl Into<String>, family: impl Into<String>) -> Self {
        TextStyle {
            true_type_font: family.into(),
            ..Self::new(name)
        }
    }

    pub fn is_true_type(&self) -> bool {
        !self.true_type_font.is_empty()
    }
}

impl_table_entry!(TextStyle);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::standard();
        assert_eq!(style.font_file, "txt.shx");
        assert_eq!(style.height, 2.5);
        assert_eq!(style.width_factor, 1.0);
        assert!(!style.is_true_type());
    }

    #[test]
    fn test_true_type_style() {
        let style = TextStyle::true_type("Title", "Arial");
        assert!(style.is_true_type());
    }
}
