//! Multi-line text entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// Attachment point for MText (group code 71)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum AttachmentPoint {
    #[default]
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

impl AttachmentPoint {
    /// Decode group code 71; out-of-range values fall back to top left
    pub fn from_value(value: i16) -> Self {
        match value {
            2 => AttachmentPoint::TopCenter,
            3 => AttachmentPoint::TopRight,
            4 => AttachmentPoint::MiddleLeft,
            5 => AttachmentPoint::MiddleCenter,
            6 => AttachmentPoint::MiddleRight,
            7 => AttachmentPoint::BottomLeft,
            8 => AttachmentPoint::BottomCenter,
            9 => AttachmentPoint::BottomRight,
            _ => AttachmentPoint::TopLeft,
        }
    }

    pub fn value(self) -> i16 {
        self as i16
    }
}

/// Drawing direction for MText (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum DrawingDirection {
    #[default]
    LeftToRight = 1,
    TopToBottom = 3,
    ByStyle = 5,
}

impl DrawingDirection {
    pub fn from_value(value: i16) -> Self {
        match value {
            3 => DrawingDirection::TopToBottom,
            5 => DrawingDirection::ByStyle,
            _ => DrawingDirection::LeftToRight,
        }
    }

    pub fn value(self) -> i16 {
        self as i16
    }
}

/// A multi-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct MText {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content; `\P` marks a paragraph break
    pub value: String,
    /// Insertion point (the attachment point position)
    pub insertion_point: Vector2,
    /// Reference rectangle width
    pub rectangle_width: f64,
    /// Character height; zero uses the text style's height
    pub height: f64,
    /// Line spacing factor; zero means "at least" spacing
    pub line_spacing_factor: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    pub attachment_point: AttachmentPoint,
    pub drawing_direction: DrawingDirection,
    /// Text style name
    pub style: String,
}

impl MText {
    pub fn new() -> Self {
        MText {
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector2::ZERO,
            rectangle_width: 100.0,
            height: 0.0,
            line_spacing_factor: 0.0,
            rotation: 0.0,
            attachment_point: AttachmentPoint::TopLeft,
            drawing_direction: DrawingDirection::LeftToRight,
            style: String::new(),
        }
    }

    /// Create with content at a position
    pub fn with_value(value: impl Into<String>, insertion_point: Vector2) -> Self {
        MText {
            value: value.into(),
            insertion_point,
            ..Self::new()
        }
    }

    /// Content with paragraph codes turned into newlines
    pub fn plain_text(&self) -> String {
        self.value.replace("\\P", "\n")
    }
}

impl Default for MText {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for MText {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "MTEXT"
    }

    fn translate(&mut self, offset: Vector2) {
        self.insertion_point = self.insertion_point + offset;
    }
}
