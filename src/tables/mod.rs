//! Named style tables (layers, line types, text and dimension styles)

use crate::types::Handle;
use indexmap::IndexMap;

pub mod block_record;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;

pub use block_record::BlockRecord;
pub use dimstyle::{
    ArrowHeadType, CenterMarkType, DimStyle, DimensionTextMovement, FitMode,
    HorizontalTextPosition, LinearUnitFormat, VerticalTextPosition,
};
pub use layer::Layer;
pub use linetype::{LineType, LineTypeElement};
pub use textstyle::TextStyle;

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's handle (assigned by the writer, read back by the reader)
    fn handle(&self) -> Handle;

    /// Set the entry's handle
    fn set_handle(&mut self, handle: Handle);

    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);
}

/// Generic table for storing named entries
///
/// Lookup is case-insensitive; iteration follows insertion order, which is
/// also the order entries are emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
        }
    }

    fn key(name: &str) -> String {
        name.to_uppercase()
    }

    /// Add an entry to the table
    pub fn add(&mut self, entry: T) -> Result<(), String> {
        let key = Self::key(entry.name());
        if self.entries.contains_key(&key) {
            return Err(format!("Entry '{}' already exists in table", entry.name()));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Insert or replace the entry with the same name, keeping its position
    pub fn set(&mut self, entry: T) {
        self.entries.insert(Self::key(entry.name()), entry);
    }

    /// Add `entry` unless an entry of that name already exists
    pub fn add_if_absent(&mut self, entry: T) -> bool {
        let key = Self::key(entry.name());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    /// Get the entry named `name`, creating it with `make` when absent
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        self.entries.entry(Self::key(name)).or_insert_with(make)
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&Self::key(name))
    }

    /// Get a mutable entry by name (case-insensitive)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&Self::key(name))
    }

    /// Remove an entry by name (case-insensitive)
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(&Self::key(name))
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::key(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterate over all entries mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implement [`TableEntry`] for a struct with `handle` and `name` fields
macro_rules! impl_table_entry {
    ($ty:ty) => {
        impl $crate::tables::TableEntry for $ty {
            fn handle(&self) -> $crate::types::Handle {
                self.handle
            }

            fn set_handle(&mut self, handle: $crate::types::Handle) {
                self.handle = handle;
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }
        }
    };
}
pub(crate) use impl_table_entry;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct MockEntry {
        handle: Handle,
        name: String,
        value: i32,
    }

    impl_table_entry!(MockEntry);

    fn entry(name: &str, value: i32) -> MockEntry {
        MockEntry {
            handle: Handle::NULL,
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_table_add_and_get() {
        let mut table = Table::new();
        assert!(table.add(entry("Test", 1)).is_ok());
        assert!(table.contains("Test"));
        assert!(table.contains("test"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_entry() {
        let mut table = Table::new();
        assert!(table.add(entry("Test", 1)).is_ok());
        assert!(table.add(entry("test", 2)).is_err());
        assert!(!table.add_if_absent(entry("TEST", 3)));
        assert_eq!(table.get("test").unwrap().value, 1);
    }

    #[test]
    fn test_table_set_keeps_order() {
        let mut table = Table::new();
        table.set(entry("A", 1));
        table.set(entry("B", 2));
        table.set(entry("a", 3));
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["a", "B"]);
        assert_eq!(table.get("A").unwrap().value, 3);
    }

    #[test]
    fn test_table_remove() {
        let mut table = Table::new();
        table.add(entry("Test", 1)).unwrap();
        assert!(table.remove("test").is_some());
        assert!(table.is_empty());
    }
}
