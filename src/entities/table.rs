//! Table entity (ACAD_TABLE)
//!
//! A table is a `row_count × column_count` grid of cells stored row-major.
//! Each cell holds either text or a block reference with attribute values.

use crate::entities::{Entity, EntityCommon};
use crate::types::{Color, Handle, Vector2};

/// Cell property override bits (group 91)
pub mod cell_property {
    pub const ALIGNMENT: i32 = 32;
    pub const TEXT_HEIGHT: i32 = 512;
    pub const CONTENT_LAYOUT: i32 = 262_144;
}

/// Cell content alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum CellAlignment {
    /// Not set; omitted on the wire
    #[default]
    Invalid = 0,
    TopLeft = 1,
    TopCenter = 2,
    TopRight = 3,
    MiddleLeft = 4,
    MiddleCenter = 5,
    MiddleRight = 6,
    BottomLeft = 7,
    BottomCenter = 8,
    BottomRight = 9,
}

impl From<i16> for CellAlignment {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::TopLeft,
            2 => Self::TopCenter,
            3 => Self::TopRight,
            4 => Self::MiddleLeft,
            5 => Self::MiddleCenter,
            6 => Self::MiddleRight,
            7 => Self::BottomLeft,
            8 => Self::BottomCenter,
            9 => Self::BottomRight,
            _ => Self::Invalid,
        }
    }
}

/// Requested content kind when building a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum CellKind {
    Text = 1,
    Block = 2,
}

impl CellKind {
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            1 => Some(CellKind::Text),
            2 => Some(CellKind::Block),
            _ => None,
        }
    }
}

/// Text cell content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellText {
    pub text: String,
    /// Text style name; empty inherits the table style
    pub style: String,
}

/// Block cell content
#[derive(Debug, Clone, PartialEq)]
pub struct CellBlock {
    pub block_name: String,
    pub scale: f64,
    /// Weak links to attribute definitions, paired with `attribute_values`
    pub attribute_definitions: Vec<Handle>,
    pub attribute_values: Vec<String>,
}

impl Default for CellBlock {
    fn default() -> Self {
        CellBlock {
            block_name: String::new(),
            scale: 1.0,
            attribute_definitions: Vec::new(),
            attribute_values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(CellText),
    Block(CellBlock),
}

impl CellContent {
    pub fn empty(kind: CellKind) -> Self {
        match kind {
            CellKind::Text => CellContent::Text(CellText::default()),
            CellKind::Block => CellContent::Block(CellBlock::default()),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Text(_) => CellKind::Text,
            CellContent::Block(_) => CellKind::Block,
        }
    }
}

/// Border visibility flags, in the order left, right, top, bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Borders {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Default for Borders {
    fn default() -> Self {
        Borders { left: true, right: true, top: true, bottom: true }
    }
}

/// A table cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Group 172
    pub flag: i32,
    /// Covered by a merge anchored elsewhere
    pub merged: bool,
    pub auto_fit: bool,
    pub column_span: i32,
    pub row_span: i32,
    /// Group 91, see [`cell_property`]
    pub override_flag: i32,
    /// Group 178
    pub virtual_edge_flag: i32,
    /// Rotation in radians
    pub rotation: f64,
    pub alignment: CellAlignment,
    pub background_color: Color,
    pub text_color: Color,
    pub background_enabled: bool,
    /// Zero inherits the table style
    pub text_height: f64,
    /// Value flags (groups 93 and 90) and the value override (group 91)
    pub value_flags: i32,
    pub value_data_type: i32,
    pub value_override_flag: i32,
    pub content: CellContent,
    pub borders: Borders,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Cell {
            flag: 0,
            merged: false,
            auto_fit: false,
            column_span: 1,
            row_span: 1,
            override_flag: cell_property::ALIGNMENT
                | cell_property::CONTENT_LAYOUT
                | cell_property::TEXT_HEIGHT,
            virtual_edge_flag: 0,
            rotation: 0.0,
            alignment: CellAlignment::Invalid,
            background_color: Color::ByBlock,
            text_color: Color::ByBlock,
            background_enabled: false,
            text_height: 0.0,
            value_flags: 6,
            value_data_type: 4,
            value_override_flag: 0,
            content: CellContent::empty(kind),
            borders: Borders::default(),
        }
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }
}

/// Table entity
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub common: EntityCommon,
    /// Optional anonymous `*T` block rendering the whole table
    pub block_name: String,
    pub insertion_point: Vector2,
    /// Table style name
    pub style_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub row_heights: Vec<f64>,
    pub column_widths: Vec<f64>,
    /// Row-major; must hold `row_count * column_count` cells to be written
    pub cells: Vec<Cell>,
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    pub borders: Borders,
}

impl Table {
    pub fn new(insertion_point: Vector2) -> Self {
        Table {
            common: EntityCommon::new(),
            block_name: String::new(),
            insertion_point,
            style_name: "Standard".to_string(),
            row_count: 0,
            column_count: 0,
            row_heights: Vec::new(),
            column_widths: Vec::new(),
            cells: Vec::new(),
            horizontal_margin: 0.0,
            vertical_margin: 0.0,
            borders: Borders::default(),
        }
    }

    /// Size the grid, filling new cells with `kind` content.
    ///
    /// Zero counts are rejected and leave the table unchanged.
    pub fn initialize_cells(&mut self, rows: usize, columns: usize, kind: CellKind) -> bool {
        if rows == 0 || columns == 0 {
            tracing::warn!(rows, columns, "invalid table dimensions");
            return false;
        }
        self.row_count = rows;
        self.column_count = columns;
        self.cells.resize(rows * columns, Cell::new(kind));
        true
    }

    /// Give every row the same height
    pub fn set_row_height(&mut self, height: f64) {
        self.row_heights.resize(self.row_count, height);
    }

    /// Give every column the same width
    pub fn set_column_width(&mut self, width: f64) {
        self.column_widths.resize(self.column_count, width);
    }

    /// Whether `cells` holds exactly one cell per grid position
    fn grid_is_complete(&self) -> bool {
        self.row_count.checked_mul(self.column_count) == Some(self.cells.len())
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        let valid = row < self.row_count && column < self.column_count && self.grid_is_complete();
        valid.then(|| row * self.column_count + column)
    }

    /// Merge a block of cells; the top-left cell stays the visible anchor.
    /// Overlapping merges are the caller's responsibility.
    pub fn merge_cells(&mut self, row: usize, column: usize, row_span: usize, column_span: usize) {
        let fits = row_span >= 1
            && column_span >= 1
            && row + row_span <= self.row_count
            && column + column_span <= self.column_count;
        debug_assert!(fits, "merge span out of range");
        let Some(anchor) = self.index(row, column) else {
            return;
        };
        if !fits {
            return;
        }
        for i in row..row + row_span {
            for j in column..column + column_span {
                self.cells[i * self.column_count + j].merged = true;
            }
        }
        self.cells[anchor].merged = false;
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.index(row, column).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.index(row, column).map(move |i| &mut self.cells[i])
    }

    /// Text content of a cell, replacing block content
    pub fn cell_text_mut(&mut self, row: usize, column: usize) -> Option<&mut CellText> {
        let cell = self.cell_mut(row, column)?;
        if !matches!(cell.content, CellContent::Text(_)) {
            cell.content = CellContent::Text(CellText::default());
        }
        match &mut cell.content {
            CellContent::Text(t) => Some(t),
            CellContent::Block(_) => None,
        }
    }

    /// Block content of a cell, replacing text content
    pub fn cell_block_mut(&mut self, row: usize, column: usize) -> Option<&mut CellBlock> {
        let cell = self.cell_mut(row, column)?;
        if !matches!(cell.content, CellContent::Block(_)) {
            cell.content = CellContent::Block(CellBlock::default());
        }
        match &mut cell.content {
            CellContent::Block(b) => Some(b),
            CellContent::Text(_) => None,
        }
    }

    /// Reason this table cannot be written, if any
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.row_count == 0 || self.column_count == 0 {
            Some("table has no rows or columns")
        } else if self.row_heights.len() != self.row_count {
            Some("row height count differs from row count")
        } else if self.column_widths.len() != self.column_count {
            Some("column width count differs from column count")
        } else if !self.grid_is_complete() {
            Some("cell count differs from rows x columns")
        } else {
            None
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(Vector2::ZERO)
    }
}

impl Entity for Table {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "ACAD_TABLE"
    }

    fn translate(&mut self, offset: Vector2) {
        self.insertion_point = self.insertion_point + offset;
    }
}
