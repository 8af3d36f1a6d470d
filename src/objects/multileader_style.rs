//! MultiLeaderStyle object implementation.
//!
//! Defines the visual properties shared by MultiLeader entities. Written to
//! the OBJECTS section under the `ACAD_MLEADERSTYLE` dictionary.

use crate::entities::MultiLeaderPathType;
use crate::types::{Color, Handle, LineWeight, Vector2};

// ============================================================================
// Enums
// ============================================================================

/// Text angle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextAngleType {
    /// Follow the insertion angle.
    Insert = 0,
    /// Always horizontal (default).
    #[default]
    Horizontal = 1,
    /// Keep text right-reading.
    AlwaysRightReading = 2,
}

impl From<i16> for TextAngleType {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::Insert,
            2 => Self::AlwaysRightReading,
            _ => Self::Horizontal,
        }
    }
}

/// Block content connection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum BlockConnectionType {
    /// Connect to block extents.
    #[default]
    Extents = 0,
    /// Connect to block base point.
    Base = 1,
}

impl From<i16> for BlockConnectionType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Base,
            _ => Self::Extents,
        }
    }
}

// ============================================================================
// Content
// ============================================================================

/// Default text content settings
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMTextContent {
    /// Text style name
    pub text_style: String,
    pub angle_type: TextAngleType,
    pub color: Color,
    pub height: f64,
    pub align_space: f64,
}

impl Default for StyleMTextContent {
    fn default() -> Self {
        StyleMTextContent {
            text_style: "Standard".to_string(),
            angle_type: TextAngleType::Horizontal,
            color: Color::ByBlock,
            height: 0.18,
            align_space: 4.0,
        }
    }
}

/// Default block content settings
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBlockContent {
    pub block_name: String,
    pub connection: BlockConnectionType,
    pub color: Color,
    pub scale: Vector2,
}

impl Default for StyleBlockContent {
    fn default() -> Self {
        StyleBlockContent {
            block_name: "_DetailCallout".to_string(),
            connection: BlockConnectionType::Extents,
            color: Color::ByLayer,
            scale: Vector2::new(1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultiLeaderStyleContent {
    MText(StyleMTextContent),
    Block(StyleBlockContent),
}

impl MultiLeaderStyleContent {
    /// Content type code (group 170)
    pub fn type_code(&self) -> i16 {
        match self {
            MultiLeaderStyleContent::Block(_) => 1,
            MultiLeaderStyleContent::MText(_) => 2,
        }
    }
}

// ============================================================================
// MultiLeaderStyle
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLeaderStyle {
    /// Handle, assigned on write
    pub handle: Handle,
    pub name: String,
    pub path_type: MultiLeaderPathType,
    pub line_color: Color,
    /// Leader line type name
    pub line_type: String,
    pub line_weight: LineWeight,
    /// Arrow block name; empty means the default arrow
    pub arrow_head: String,
    pub arrow_size: f64,
    pub max_leader_points: i32,
    pub first_segment_angle: f64,
    pub second_segment_angle: f64,
    pub enable_landing: bool,
    pub enable_dogleg: bool,
    pub is_annotative: bool,
    pub landing_gap: f64,
    pub dogleg_length: f64,
    pub break_gap_size: f64,
    pub content: MultiLeaderStyleContent,
}

impl MultiLeaderStyle {
    pub fn new(name: impl Into<String>) -> Self {
        MultiLeaderStyle {
            handle: Handle::NULL,
            name: name.into(),
            path_type: MultiLeaderPathType::Straight,
            line_color: Color::ByBlock,
            line_type: "ByBlock".to_string(),
            line_weight: LineWeight::ByBlock,
            arrow_head: String::new(),
            arrow_size: 0.18,
            max_leader_points: 2,
            first_segment_angle: 0.0,
            second_segment_angle: 0.0,
            enable_landing: true,
            enable_dogleg: true,
            is_annotative: false,
            landing_gap: 0.09,
            dogleg_length: 8.0,
            break_gap_size: 3.75,
            content: MultiLeaderStyleContent::MText(StyleMTextContent::default()),
        }
    }

    /// The "Standard" style
    pub fn standard() -> Self {
        Self::new("Standard")
    }

    /// The "Annotative" style
    pub fn annotative() -> Self {
        MultiLeaderStyle {
            is_annotative: true,
            ..Self::new("Annotative")
        }
    }
}

impl Default for MultiLeaderStyle {
    fn default() -> Self {
        Self::standard()
    }
}
