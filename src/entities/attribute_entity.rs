//! Attribute instance carried by a block reference

use crate::entities::attribute_definition::AttributeText;
use crate::entities::{Entity, EntityCommon};
use crate::types::Vector2;

/// Attribute value attached to an INSERT (ATTRIB)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeEntity {
    pub common: EntityCommon,
    pub text: AttributeText,
}

impl AttributeEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value for `tag`
    pub fn with_tag(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut attrib = Self::new();
        attrib.text.tag = tag.into();
        attrib.text.value = value.into();
        attrib
    }

    pub fn tag(&self) -> &str {
        &self.text.tag
    }

    pub fn value(&self) -> &str {
        &self.text.value
    }
}

impl Entity for AttributeEntity {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "ATTRIB"
    }

    fn translate(&mut self, offset: Vector2) {
        self.text.translate(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrib_value() {
        let a = AttributeEntity::with_tag("PART", "X-2");
        assert_eq!(a.tag(), "PART");
        assert_eq!(a.value(), "X-2");
        assert_eq!(a.entity_type(), "ATTRIB");
    }
}
