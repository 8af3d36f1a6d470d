//! Color representation for entities and styles

use std::fmt;

/// Represents a drawing color
///
/// - By index (1-255): Color Index (ACI)
/// - By layer (256) / by block (0)
/// - True color, written as group code 420 next to an approximated index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// Color Index (1-255)
    Index(u8),
    /// True color with RGB values
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a color from a color index as read from group code 62
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            // Negative means the layer is off; keep the color.
            _ if index < 0 => Color::Index((-index).min(255) as u8),
            _ => Color::WHITE,
        }
    }

    /// Create a true color from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Decode a packed 0x00RRGGBB value (group code 420)
    pub fn from_true_color(value: i32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed 0x00RRGGBB value for true colors
    pub fn true_color(&self) -> Option<i32> {
        match self {
            Color::Rgb { r, g, b } => Some(((*r as i32) << 16) | ((*g as i32) << 8) | (*b as i32)),
            _ => None,
        }
    }

    /// Get the color index (if applicable)
    pub fn index(&self) -> Option<u16> {
        match self {
            Color::ByBlock => Some(0),
            Color::Index(i) => Some(*i as u16),
            Color::ByLayer => Some(256),
            Color::Rgb { .. } => None,
        }
    }

    /// Common color constants
    pub const RED: Color = Color::Index(1);
    pub const YELLOW: Color = Color::Index(2);
    pub const GREEN: Color = Color::Index(3);
    pub const CYAN: Color = Color::Index(4);
    pub const BLUE: Color = Color::Index(5);
    pub const MAGENTA: Color = Color::Index(6);
    pub const WHITE: Color = Color::Index(7);
    pub const GRAY: Color = Color::Index(8);
    pub const LIGHT_GRAY: Color = Color::Index(9);

    /// Index written under group code 62; true colors map to the nearest
    /// of the seven primary indices.
    pub fn dxf_index(&self) -> i16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i16,
            Color::Rgb { r, g, b } => {
                const PRIMARIES: [(i16, (i32, i32, i32)); 7] = [
                    (1, (255, 0, 0)),
                    (2, (255, 255, 0)),
                    (3, (0, 255, 0)),
                    (4, (0, 255, 255)),
                    (5, (0, 0, 255)),
                    (6, (255, 0, 255)),
                    (7, (255, 255, 255)),
                ];
                let (r, g, b) = (*r as i32, *g as i32, *b as i32);
                PRIMARIES
                    .iter()
                    .min_by_key(|(_, (pr, pg, pb))| {
                        (r - pr).pow(2) + (g - pg).pow(2) + (b - pb).pow(2)
                    })
                    .map(|(i, _)| *i)
                    .unwrap_or(7)
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_index() {
        assert_eq!(Color::from_index(0), Color::ByBlock);
        assert_eq!(Color::from_index(256), Color::ByLayer);
        assert_eq!(Color::from_index(1), Color::Index(1));
        assert_eq!(Color::from_index(-3), Color::Index(3));
    }

    #[test]
    fn test_true_color_packing() {
        let color = Color::from_rgb(255, 128, 64);
        let packed = color.true_color().unwrap();
        assert_eq!(packed, 0xFF8040);
        assert_eq!(Color::from_true_color(packed), color);
    }

    #[test]
    fn test_dxf_index() {
        assert_eq!(Color::ByLayer.dxf_index(), 256);
        assert_eq!(Color::ByBlock.dxf_index(), 0);
        assert_eq!(Color::Index(5).dxf_index(), 5);
        assert_eq!(Color::from_rgb(250, 10, 10).dxf_index(), 1);
        assert_eq!(Color::from_rgb(240, 240, 240).dxf_index(), 7);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::ByLayer.to_string(), "ByLayer");
        assert_eq!(Color::from_rgb(255, 0, 0).to_string(), "RGB(255, 0, 0)");
    }

    #[test]
    fn test_default_color() {
        assert_eq!(Color::default(), Color::ByLayer);
    }
}
