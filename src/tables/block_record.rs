//! Block definitions (BLOCK_RECORD table entries plus their BLOCKS bodies)

use super::impl_table_entry;
use crate::entities::{EntityList, EntityType};
use crate::types::{Handle, Vector2};

/// A named, reusable group of entities
///
/// Owns its entities exclusively, so a block record cannot be cloned.
#[derive(Debug, PartialEq)]
pub struct BlockRecord {
    /// Block record handle, assigned on write
    pub handle: Handle,
    /// Block name
    pub name: String,
    /// Insertion origin
    pub base_point: Vector2,
    /// Entities owned by this block
    pub entities: EntityList,
}

impl BlockRecord {
    /// Create an empty block
    pub fn new(name: impl Into<String>, base_point: Vector2) -> Self {
        BlockRecord {
            handle: Handle::NULL,
            name: name.into(),
            base_point,
            entities: EntityList::new(),
        }
    }

    /// Append an entity to the block body
    pub fn add_entity(&mut self, entity: impl Into<EntityType>) {
        self.entities.push(entity.into());
    }

    /// Layout blocks are `*Paper_Space...` and `*Model_Space`
    pub fn is_layout_block(&self) -> bool {
        is_paper_space_name(&self.name) || self.name.eq_ignore_ascii_case("*Model_Space")
    }
}

/// True for `*Paper_Space`, `*Paper_Space0`, ... (case-insensitive)
pub fn is_paper_space_name(name: &str) -> bool {
    const PREFIX: &str = "*PAPER_SPACE";
    name.len() >= PREFIX.len()
        && name.is_char_boundary(PREFIX.len())
        && name[..PREFIX.len()].eq_ignore_ascii_case(PREFIX)
}

impl_table_entry!(BlockRecord);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;

    #[test]
    fn test_block_record_entities() {
        let mut block = BlockRecord::new("DOOR", Vector2::new(1.0, 2.0));
        block.add_entity(Line::from_coords(0.0, 0.0, 1.0, 0.0));
        assert_eq!(block.entities.len(), 1);
        assert_eq!(block.base_point, Vector2::new(1.0, 2.0));
        assert!(!block.is_layout_block());
    }

    #[test]
    fn test_paper_space_names() {
        assert!(is_paper_space_name("*Paper_Space"));
        assert!(is_paper_space_name("*PAPER_SPACE3"));
        assert!(!is_paper_space_name("*Model_Space"));
        assert!(!is_paper_space_name("*Paper"));
    }
}
