//! Single-line text entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// Text horizontal alignment (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextHorizontalAlignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
    /// Fit between two points, height follows (vertical must be baseline)
    Aligned = 3,
    /// Centered horizontally and vertically (vertical must be baseline)
    Middle = 4,
    /// Fit between two points, height kept (vertical must be baseline)
    Fit = 5,
}

impl TextHorizontalAlignment {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => TextHorizontalAlignment::Center,
            2 => TextHorizontalAlignment::Right,
            3 => TextHorizontalAlignment::Aligned,
            4 => TextHorizontalAlignment::Middle,
            5 => TextHorizontalAlignment::Fit,
            _ => TextHorizontalAlignment::Left,
        }
    }

    pub fn value(self) -> i16 {
        self as i16
    }
}

/// Text vertical alignment (group code 73, or 74 on attributes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextVerticalAlignment {
    #[default]
    Baseline = 0,
    Bottom = 1,
    Middle = 2,
    Top = 3,
}

impl TextVerticalAlignment {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => TextVerticalAlignment::Bottom,
            2 => TextVerticalAlignment::Middle,
            3 => TextVerticalAlignment::Top,
            _ => TextVerticalAlignment::Baseline,
        }
    }

    pub fn value(self) -> i16 {
        self as i16
    }
}

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// Lower-left corner of the text (group 10)
    pub base_point: Vector2,
    /// Alignment point (group 11), used when any alignment is set
    pub alignment_point: Vector2,
    /// Rotation angle in degrees
    pub rotation: f64,
    pub horizontal_alignment: TextHorizontalAlignment,
    pub vertical_alignment: TextVerticalAlignment,
    /// Text style name
    pub style: String,
    /// Height; zero uses the text style's height
    pub height: f64,
    /// Width factor; zero uses the text style's factor
    pub width_factor: f64,
    /// Oblique angle in degrees; `None` uses the text style's angle
    pub oblique_angle: Option<f64>,
}

impl Text {
    pub fn new() -> Self {
        Text {
            common: EntityCommon::new(),
            value: String::new(),
            base_point: Vector2::ZERO,
            alignment_point: Vector2::ZERO,
            rotation: 0.0,
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            style: String::new(),
            height: 0.0,
            width_factor: 0.0,
            oblique_angle: None,
        }
    }

    /// Create left-aligned text at `point`
    pub fn with_value(value: impl Into<String>, point: Vector2) -> Self {
        Text {
            value: value.into(),
            base_point: point,
            alignment_point: point,
            ..Self::new()
        }
    }

    pub fn set_oblique_angle(&mut self, degrees: f64) {
        self.oblique_angle = Some(degrees);
    }

    /// Whether the alignment point (group 11) governs placement
    pub fn uses_alignment_point(&self) -> bool {
        self.horizontal_alignment != TextHorizontalAlignment::Left
            || self.vertical_alignment != TextVerticalAlignment::Baseline
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "TEXT"
    }

    fn translate(&mut self, offset: Vector2) {
        self.base_point = self.base_point + offset;
        self.alignment_point = self.alignment_point + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_alignment_point_usage() {
        let mut t = Text::with_value("A", Vector2::new(1.0, 2.0));
        assert!(!t.uses_alignment_point());
        t.vertical_alignment = TextVerticalAlignment::Top;
        assert!(t.uses_alignment_point());
    }

    #[test]
    fn test_alignment_values() {
        for v in 0..=5 {
            assert_eq!(TextHorizontalAlignment::from_value(v).value(), v);
        }
        assert_eq!(TextVerticalAlignment::from_value(7), TextVerticalAlignment::Baseline);
    }

    #[test]
    fn test_oblique_angle_optional() {
        let mut t = Text::new();
        assert!(t.oblique_angle.is_none());
        t.set_oblique_angle(15.0);
        assert_eq!(t.oblique_angle, Some(15.0));
    }
}
