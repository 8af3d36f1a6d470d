//! Attribute definition: the template for attribute values in a block

use crate::entities::{Entity, EntityCommon};
use crate::entities::text::{TextHorizontalAlignment, TextVerticalAlignment};
use crate::types::Vector2;
use bitflags::bitflags;

bitflags! {
    /// Attribute flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttributeFlags: i16 {
        const INVISIBLE = 1;
        const CONSTANT = 2;
        const VERIFY = 4;
        const PRESET = 8;
        const LOCK_POSITION = 16;
        const MULTIPLE_LINE = 32;
    }
}

/// Text placement and tag shared by attribute definitions and instances
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeText {
    /// Lower-left corner (group 10)
    pub base_point: Vector2,
    /// Alignment point (group 11)
    pub alignment_point: Vector2,
    pub height: f64,
    /// Default value (definitions) or actual value (instances)
    pub value: String,
    /// Tag; must not contain spaces
    pub tag: String,
    pub flags: AttributeFlags,
    /// Rotation in degrees
    pub rotation: f64,
    pub style: String,
    pub horizontal_alignment: TextHorizontalAlignment,
    pub vertical_alignment: TextVerticalAlignment,
    /// Duplicate record cloning flag; 1 keeps existing
    pub duplicate_flag: i16,
}

impl AttributeText {
    pub fn new() -> Self {
        AttributeText {
            base_point: Vector2::ZERO,
            alignment_point: Vector2::ZERO,
            height: 0.25,
            value: String::new(),
            tag: String::new(),
            flags: AttributeFlags::empty(),
            rotation: 0.0,
            style: String::new(),
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            duplicate_flag: 1,
        }
    }

    /// Whether the alignment point (group 11) governs placement
    pub fn uses_alignment_point(&self) -> bool {
        self.horizontal_alignment != TextHorizontalAlignment::Left
            || self.vertical_alignment != TextVerticalAlignment::Baseline
    }

    pub(crate) fn translate(&mut self, offset: Vector2) {
        self.base_point = self.base_point + offset;
        self.alignment_point = self.alignment_point + offset;
    }
}

impl Default for AttributeText {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute definition entity (ATTDEF)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeDefinition {
    pub common: EntityCommon,
    pub text: AttributeText,
    /// Prompt shown when the block is inserted
    pub prompt: String,
}

impl AttributeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a definition with tag, prompt and default value
    pub fn with_tag(tag: impl Into<String>, prompt: impl Into<String>, default: impl Into<String>) -> Self {
        let mut def = Self::new();
        def.text.tag = tag.into();
        def.text.value = default.into();
        def.prompt = prompt.into();
        def
    }

    pub fn tag(&self) -> &str {
        &self.text.tag
    }

    pub fn is_constant(&self) -> bool {
        self.text.flags.contains(AttributeFlags::CONSTANT)
    }
}

impl Entity for AttributeDefinition {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "ATTDEF"
    }

    fn translate(&mut self, offset: Vector2) {
        self.text.translate(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attdef_defaults() {
        let def = AttributeDefinition::with_tag("PART", "Part number", "X-1");
        assert_eq!(def.tag(), "PART");
        assert_eq!(def.text.height, 0.25);
        assert_eq!(def.text.duplicate_flag, 1);
        assert!(!def.is_constant());
    }

    #[test]
    fn test_attribute_flags_bits() {
        let flags = AttributeFlags::from_bits_truncate(2 | 8);
        assert!(flags.contains(AttributeFlags::CONSTANT));
        assert!(flags.contains(AttributeFlags::PRESET));
        assert_eq!(flags.bits(), 10);
    }
}
