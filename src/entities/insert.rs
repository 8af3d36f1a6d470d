//! Block reference (INSERT) entity

use super::{AttributeEntity, Entity, EntityCommon};
use crate::types::{Handle, Vector2};

/// A reference to a named block, with optional attribute values
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Name of the referenced block
    pub block_name: String,
    pub insert_point: Vector2,
    pub x_scale: f64,
    pub y_scale: f64,
    pub z_scale: f64,
    /// Rotation in degrees
    pub rotation: f64,
    /// Attribute instances, owned by the reference
    pub attributes: Vec<AttributeEntity>,
    /// Handle of the terminating SEQEND record, assigned on write
    pub seqend_handle: Handle,
}

impl Insert {
    pub fn new(block_name: impl Into<String>, insert_point: Vector2) -> Self {
        Insert {
            common: EntityCommon::new(),
            block_name: block_name.into(),
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
            attributes: Vec::new(),
            seqend_handle: Handle::NULL,
        }
    }

    /// Set a uniform scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.x_scale = scale;
        self.y_scale = scale;
        self.z_scale = scale;
        self
    }

    pub fn add_attribute(&mut self, attribute: AttributeEntity) {
        self.attributes.push(attribute);
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Attribute value by tag
    pub fn attribute(&self, tag: &str) -> Option<&AttributeEntity> {
        self.attributes.iter().find(|a| a.tag() == tag)
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new("", Vector2::ZERO)
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "INSERT"
    }

    fn translate(&mut self, offset: Vector2) {
        self.insert_point = self.insert_point + offset;
        for a in &mut self.attributes {
            a.translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_defaults() {
        let ins = Insert::new("DOOR", Vector2::new(1.0, 2.0));
        assert_eq!(ins.x_scale, 1.0);
        assert!(!ins.has_attributes());
    }

    #[test]
    fn test_insert_translate_moves_attributes() {
        let mut ins = Insert::new("DOOR", Vector2::ZERO);
        ins.add_attribute(AttributeEntity::with_tag("W", "900"));
        ins.translate(Vector2::new(1.0, 1.0));
        assert_eq!(ins.attribute("W").unwrap().text.base_point, Vector2::new(1.0, 1.0));
    }
}
