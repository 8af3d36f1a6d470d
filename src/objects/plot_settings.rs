//! PlotSettings - page setup carried by every layout

use crate::types::Vector2;

/// Plot rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotRotation {
    /// No rotation (0 degrees)
    None = 0,
    /// 90 degrees counter-clockwise
    #[default]
    Degrees90 = 1,
    /// 180 degrees
    Degrees180 = 2,
    /// 270 degrees counter-clockwise (90 clockwise)
    Degrees270 = 3,
}

impl PlotRotation {
    /// Create from DXF code
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => PlotRotation::None,
            2 => PlotRotation::Degrees180,
            3 => PlotRotation::Degrees270,
            _ => PlotRotation::Degrees90,
        }
    }

    /// Convert to DXF code
    pub fn to_code(self) -> i16 {
        self as i16
    }
}

/// Paper margins in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperMargin {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

/// Plot configuration for a layout
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    /// Printer or plot configuration file name
    pub plot_config_file: String,
    /// Paper size name
    pub paper_name: String,
    pub margin: PaperMargin,
    /// Paper width in millimeters
    pub paper_width: f64,
    /// Paper height in millimeters
    pub paper_height: f64,
    pub plot_origin: Vector2,
    pub rotation: PlotRotation,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            plot_config_file: "none_device".to_string(),
            paper_name: "ISO_A4_(210.00_x_297.00_MM)".to_string(),
            margin: PaperMargin { left: 7.5, bottom: 20.0, right: 7.5, top: 20.0 },
            paper_width: 210.0,
            paper_height: 297.0,
            plot_origin: Vector2::ZERO,
            rotation: PlotRotation::Degrees90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_settings_defaults() {
        let p = PlotSettings::default();
        assert_eq!(p.plot_config_file, "none_device");
        assert_eq!(p.margin.bottom, 20.0);
        assert_eq!(p.rotation.to_code(), 1);
        assert_eq!(PlotRotation::from_code(3), PlotRotation::Degrees270);
    }
}
