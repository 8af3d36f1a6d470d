//! Layer table entry

use super::impl_table_entry;
use crate::types::{Color, Handle, LineWeight};
use bitflags::bitflags;

bitflags! {
    /// Layer state flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 1;
        const LOCKED = 4;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Handle, assigned on write
    pub handle: Handle,
    /// Layer name
    pub name: String,
    pub flags: LayerFlags,
    /// Layer color; written as index 7 when ByBlock
    pub color: Color,
    /// Layer is off (written as a negative color index)
    pub is_off: bool,
    /// Line type name
    pub line_type: String,
    pub line_weight: LineWeight,
    /// Is this layer plotted
    pub is_plottable: bool,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: Handle::NULL,
            name: name.into(),
            flags: LayerFlags::empty(),
            color: Color::WHITE,
            is_off: false,
            line_type: "Continuous".to_string(),
            line_weight: LineWeight::Default,
            is_plottable: false,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Layer {
            is_plottable: true,
            ..Self::new("0")
        }
    }

    /// Create a layer with a specific color
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }
}

impl_table_entry!(Layer);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableEntry;

    #[test]
    fn test_layer_defaults() {
        let layer = Layer::new("WALLS");
        assert_eq!(layer.name(), "WALLS");
        assert_eq!(layer.color, Color::WHITE);
        assert_eq!(layer.line_type, "Continuous");
        assert_eq!(layer.line_weight, LineWeight::Default);
        assert!(!layer.is_plottable);
    }

    #[test]
    fn test_layer_flags() {
        let mut layer = Layer::layer_0();
        layer.flags |= LayerFlags::LOCKED;
        assert!(layer.is_locked());
        assert!(!layer.is_frozen());
    }
}
