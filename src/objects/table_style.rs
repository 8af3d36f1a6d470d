//! TableStyle object
//!
//! Shared formatting for ACAD_TABLE entities, written under the
//! `ACAD_TABLESTYLE` dictionary.

use crate::entities::CellAlignment;
use crate::types::{Color, Handle, LineWeight};

/// Per-row-type cell formatting inside a table style
#[derive(Debug, Clone, PartialEq)]
pub struct RowCellStyle {
    pub text_height: f64,
    pub alignment: CellAlignment,
    pub text_color: Color,
    pub background_color: Color,
    pub background_enabled: bool,
    /// Value data type (group 90)
    pub data_type: i32,
    /// Value unit type (group 91)
    pub unit_type: i32,
    pub border_weights: [LineWeight; 6],
    pub border_visible: [bool; 6],
    pub border_colors: [Color; 6],
}

impl Default for RowCellStyle {
    fn default() -> Self {
        RowCellStyle {
            text_height: 0.18,
            alignment: CellAlignment::MiddleCenter,
            text_color: Color::ByBlock,
            background_color: Color::WHITE,
            background_enabled: false,
            data_type: 512,
            unit_type: 0,
            border_weights: [LineWeight::ByBlock; 6],
            border_visible: [true; 6],
            border_colors: [Color::ByBlock; 6],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    /// Handle, assigned on write
    pub handle: Handle,
    pub name: String,
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    pub no_title: bool,
    pub no_column_heading: bool,
    /// Text style name
    pub text_style: String,
    /// Data, column header and title rows
    pub cell_styles: Vec<RowCellStyle>,
}

impl TableStyle {
    pub fn new(name: impl Into<String>) -> Self {
        TableStyle {
            handle: Handle::NULL,
            name: name.into(),
            horizontal_margin: 0.06,
            vertical_margin: 0.06,
            no_title: false,
            no_column_heading: false,
            text_style: "Standard".to_string(),
            cell_styles: vec![RowCellStyle::default(); 3],
        }
    }

    pub fn standard() -> Self {
        Self::new("Standard")
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_style_defaults() {
        let s = TableStyle::standard();
        assert_eq!(s.cell_styles.len(), 3);
        assert_eq!(s.horizontal_margin, 0.06);
        let cell = &s.cell_styles[0];
        assert_eq!(cell.alignment, CellAlignment::MiddleCenter);
        assert_eq!(cell.background_color, Color::WHITE);
        assert!(cell.border_visible.iter().all(|v| *v));
    }
}
