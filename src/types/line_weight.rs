//! Line weight representation

use std::fmt;

/// Line weight in 1/100 mm, or one of the inherited values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LineWeight {
    /// Use the layer's line weight (-1)
    #[default]
    ByLayer,
    /// Use the block's line weight (-2)
    ByBlock,
    /// Drawing default line weight (-3)
    Default,
    /// Specific line weight in 1/100 mm (0-211)
    Value(i16),
}

impl LineWeight {
    /// Create a line weight from the raw group code 370 value
    pub fn from_value(value: i16) -> Self {
        match value {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            -3 => LineWeight::Default,
            v => LineWeight::Value(v),
        }
    }

    /// Get the raw value
    pub fn value(&self) -> i16 {
        match self {
            LineWeight::ByLayer => -1,
            LineWeight::ByBlock => -2,
            LineWeight::Default => -3,
            LineWeight::Value(v) => *v,
        }
    }

    /// Get the line weight in millimeters
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            LineWeight::Value(v) => Some(*v as f64 / 100.0),
            _ => None,
        }
    }

    pub const W0_00: LineWeight = LineWeight::Value(0);
    pub const W0_13: LineWeight = LineWeight::Value(13);
    pub const W0_18: LineWeight = LineWeight::Value(18);
    pub const W0_25: LineWeight = LineWeight::Value(25);
    pub const W0_35: LineWeight = LineWeight::Value(35);
    pub const W0_50: LineWeight = LineWeight::Value(50);
    pub const W0_70: LineWeight = LineWeight::Value(70);
    pub const W1_00: LineWeight = LineWeight::Value(100);
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => write!(f, "ByLayer"),
            LineWeight::ByBlock => write!(f, "ByBlock"),
            LineWeight::Default => write!(f, "Default"),
            LineWeight::Value(v) => write!(f, "{:.2}mm", *v as f64 / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_weight_from_value() {
        assert_eq!(LineWeight::from_value(-1), LineWeight::ByLayer);
        assert_eq!(LineWeight::from_value(-2), LineWeight::ByBlock);
        assert_eq!(LineWeight::from_value(-3), LineWeight::Default);
        assert_eq!(LineWeight::from_value(25), LineWeight::Value(25));
    }

    #[test]
    fn test_line_weight_value_round_trips() {
        for lw in [LineWeight::ByLayer, LineWeight::ByBlock, LineWeight::Default, LineWeight::W0_35] {
            assert_eq!(LineWeight::from_value(lw.value()), lw);
        }
    }

    #[test]
    fn test_line_weight_display() {
        assert_eq!(LineWeight::ByBlock.to_string(), "ByBlock");
        assert_eq!(LineWeight::W0_25.to_string(), "0.25mm");
        assert_eq!(LineWeight::W0_25.millimeters(), Some(0.25));
    }
}
