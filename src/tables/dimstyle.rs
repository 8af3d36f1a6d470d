//! Dimension style table entry

use super::impl_table_entry;
use crate::types::{Color, Handle, LineWeight};

/// Arrowhead kind; every kind but `UserDefined` names a predefined block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum ArrowHeadType {
    #[default]
    Default = 0,
    ClosedBlank = 1,
    Closed = 2,
    Dot = 3,
    ArchTick = 4,
    Oblique = 5,
    Open = 6,
    Origin = 7,
    Origin2 = 8,
    Open90 = 9,
    Open30 = 10,
    DotSmall = 11,
    DotBlank = 12,
    Small = 13,
    BoxBlank = 14,
    BoxFilled = 15,
    DatumBlank = 16,
    DatumFilled = 17,
    Integral = 18,
    None = 19,
    /// Arrow drawn from a named user block
    UserDefined = 20,
}

impl ArrowHeadType {
    /// All predefined kinds, in index order
    pub const PREDEFINED: [ArrowHeadType; 20] = [
        ArrowHeadType::Default,
        ArrowHeadType::ClosedBlank,
        ArrowHeadType::Closed,
        ArrowHeadType::Dot,
        ArrowHeadType::ArchTick,
        ArrowHeadType::Oblique,
        ArrowHeadType::Open,
        ArrowHeadType::Origin,
        ArrowHeadType::Origin2,
        ArrowHeadType::Open90,
        ArrowHeadType::Open30,
        ArrowHeadType::DotSmall,
        ArrowHeadType::DotBlank,
        ArrowHeadType::Small,
        ArrowHeadType::BoxBlank,
        ArrowHeadType::BoxFilled,
        ArrowHeadType::DatumBlank,
        ArrowHeadType::DatumFilled,
        ArrowHeadType::Integral,
        ArrowHeadType::None,
    ];

    pub fn from_value(value: i16) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::PREDEFINED.get(i).copied())
            .unwrap_or(ArrowHeadType::UserDefined)
    }

    pub fn value(self) -> i16 {
        self as i16
    }
}

/// Center mark drawn for radial and diametric dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CenterMarkType {
    #[default]
    Mark,
    Line,
    None,
}

/// What moves outside the extension lines when space is short (DIMATFIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum FitMode {
    TextAndArrows = 0,
    ArrowsOnly = 1,
    TextOnly = 2,
    #[default]
    BestFit = 3,
}

impl FitMode {
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => FitMode::TextAndArrows,
            1 => FitMode::ArrowsOnly,
            2 => FitMode::TextOnly,
            _ => FitMode::BestFit,
        }
    }
}

/// Horizontal text justification (DIMJUST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum HorizontalTextPosition {
    #[default]
    Centered = 0,
    FirstExtensionLine = 1,
    SecondExtensionLine = 2,
    OverFirstExtension = 3,
    OverSecondExtension = 4,
}

impl HorizontalTextPosition {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => HorizontalTextPosition::FirstExtensionLine,
            2 => HorizontalTextPosition::SecondExtensionLine,
            3 => HorizontalTextPosition::OverFirstExtension,
            4 => HorizontalTextPosition::OverSecondExtension,
            _ => HorizontalTextPosition::Centered,
        }
    }
}

/// Vertical text justification (DIMTAD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum VerticalTextPosition {
    #[default]
    Centered = 0,
    Above = 1,
    Outside = 2,
    Jis = 3,
}

impl VerticalTextPosition {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => VerticalTextPosition::Above,
            2 => VerticalTextPosition::Outside,
            3 => VerticalTextPosition::Jis,
            _ => VerticalTextPosition::Centered,
        }
    }
}

/// How the dimension line follows moved text (DIMTMOVE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum DimensionTextMovement {
    DimLineWithText = 0,
    MoveTextAddLeader = 1,
    #[default]
    MoveTextNoLeader = 2,
}

impl DimensionTextMovement {
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => DimensionTextMovement::DimLineWithText,
            1 => DimensionTextMovement::MoveTextAddLeader,
            _ => DimensionTextMovement::MoveTextNoLeader,
        }
    }
}

/// Unit format for linear dimensions (DIMLUNIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum LinearUnitFormat {
    Scientific = 1,
    #[default]
    Decimal = 2,
    Engineering = 3,
    Architectural = 4,
    Fractional = 5,
    WindowsDesktop = 6,
}

impl LinearUnitFormat {
    pub fn from_value(value: i16) -> Self {
        match value {
            1 => LinearUnitFormat::Scientific,
            3 => LinearUnitFormat::Engineering,
            4 => LinearUnitFormat::Architectural,
            5 => LinearUnitFormat::Fractional,
            6 => LinearUnitFormat::WindowsDesktop,
            _ => LinearUnitFormat::Decimal,
        }
    }
}

/// A dimension style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    /// Handle, assigned on write
    pub handle: Handle,
    pub name: String,

    // Dimension line
    pub dimension_line_color: Color,
    pub dimension_line_weight: LineWeight,
    pub dim_line1_suppress: bool,
    pub dim_line2_suppress: bool,
    /// Keep the dimension line between extension lines even when text is outside
    pub force_line_inside: bool,

    // Extension lines
    pub extension_line_color: Color,
    pub extension_line_weight: LineWeight,
    /// Distance extension lines extend past the dimension line
    pub extension_line_extend: f64,
    /// Offset of extension lines from their origin points
    pub extension_line_offset: f64,
    pub ext_line1_suppress: bool,
    pub ext_line2_suppress: bool,

    // Arrows
    pub arrow_head1_type: ArrowHeadType,
    pub arrow_head2_type: ArrowHeadType,
    /// Block name used when `arrow_head1_type` is user defined
    pub arrow_head1_block: String,
    /// Block name used when `arrow_head2_type` is user defined
    pub arrow_head2_block: String,
    pub arrow_head_size: f64,
    pub center_type: CenterMarkType,
    pub center_mark_size: f64,

    // Text
    pub text_style: String,
    /// Ignored when the text style has a fixed height
    pub text_height: f64,
    pub text_color: Color,
    pub vertical_text_position: VerticalTextPosition,
    pub horizontal_text_position: HorizontalTextPosition,
    /// true: horizontal text; false: aligned with the dimension line
    pub text_align: bool,
    pub text_gap: f64,
    /// Text template; `<>` stands for the measurement, a single space hides it
    pub text: String,

    // Fit
    pub fit: FitMode,
    pub text_movement: DimensionTextMovement,
    /// Force text between extension lines
    pub text_inside: bool,

    // Primary units
    pub units_format: LinearUnitFormat,
    /// Decimal places for linear dimensions (0-8)
    pub units_precision: i16,
    pub suppress_leading_zeros: bool,
    pub suppress_trailing_zeros: bool,
    pub angle_suppress_leading_zeros: bool,
    pub angle_suppress_trailing_zeros: bool,
    /// Angle unit format; 0 is decimal degrees
    pub angle_format: i16,
    /// Decimal places for angular dimensions (0-8)
    pub angle_precision: i16,
    pub linear_scale_factor: f64,
}

impl DimStyle {
    /// Create a style with the format's base defaults
    pub fn new(name: impl Into<String>) -> Self {
        DimStyle {
            handle: Handle::NULL,
            name: name.into(),
            dimension_line_color: Color::ByBlock,
            dimension_line_weight: LineWeight::ByBlock,
            dim_line1_suppress: false,
            dim_line2_suppress: false,
            force_line_inside: true,
            extension_line_color: Color::ByBlock,
            extension_line_weight: LineWeight::ByBlock,
            extension_line_extend: 0.0,
            extension_line_offset: 0.0,
            ext_line1_suppress: false,
            ext_line2_suppress: false,
            arrow_head1_type: ArrowHeadType::Default,
            arrow_head2_type: ArrowHeadType::Default,
            arrow_head1_block: String::new(),
            arrow_head2_block: String::new(),
            arrow_head_size: 0.18,
            center_type: CenterMarkType::Mark,
            center_mark_size: 0.18,
            text_style: String::new(),
            text_height: 0.18,
            text_color: Color::ByBlock,
            vertical_text_position: VerticalTextPosition::Centered,
            horizontal_text_position: HorizontalTextPosition::Centered,
            text_align: false,
            text_gap: 0.045,
            text: String::new(),
            fit: FitMode::BestFit,
            text_movement: DimensionTextMovement::MoveTextNoLeader,
            text_inside: false,
            units_format: LinearUnitFormat::Decimal,
            units_precision: 2,
            suppress_leading_zeros: false,
            suppress_trailing_zeros: true,
            angle_suppress_leading_zeros: false,
            angle_suppress_trailing_zeros: true,
            angle_format: 0,
            angle_precision: 1,
            linear_scale_factor: 1.0,
        }
    }

    /// The metric "ISO-25" style injected into every written document
    pub fn iso_25() -> Self {
        DimStyle {
            extension_line_extend: 1.25,
            extension_line_offset: 0.625,
            arrow_head_size: 2.5,
            center_mark_size: 2.5,
            text_style: "Standard".to_string(),
            text_height: 2.5,
            text_color: Color::WHITE,
            vertical_text_position: VerticalTextPosition::Above,
            text_gap: 0.625,
            text_movement: DimensionTextMovement::DimLineWithText,
            angle_suppress_trailing_zeros: false,
            ..Self::new("ISO-25")
        }
    }

    /// Block name for the first arrowhead
    pub fn arrow_head1_block_name(&self) -> String {
        arrow_block_name(self.arrow_head1_type, &self.arrow_head1_block)
    }

    /// Block name for the second arrowhead
    pub fn arrow_head2_block_name(&self) -> String {
        arrow_block_name(self.arrow_head2_type, &self.arrow_head2_block)
    }

    /// Signed center mark size as stored under group code 141
    pub fn signed_center_mark_size(&self) -> f64 {
        match self.center_type {
            CenterMarkType::Mark => self.center_mark_size,
            CenterMarkType::None => 0.0,
            CenterMarkType::Line => -self.center_mark_size,
        }
    }

    /// Set center type and size from a signed group code 141 value
    pub fn set_signed_center_mark_size(&mut self, value: f64) {
        if value > 0.0 {
            self.center_type = CenterMarkType::Mark;
            self.center_mark_size = value;
        } else if value == 0.0 {
            self.center_type = CenterMarkType::None;
            self.center_mark_size = 0.0;
        } else {
            self.center_type = CenterMarkType::Line;
            self.center_mark_size = -value;
        }
    }
}

/// Resolve an arrowhead kind plus user block into a block name
pub(crate) fn arrow_block_name(kind: ArrowHeadType, user_block: &str) -> String {
    crate::predefined::predefined_block_name(kind)
        .map(str::to_string)
        .unwrap_or_else(|| user_block.to_string())
}

impl_table_entry!(DimStyle);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_defaults() {
        let style = DimStyle::new("Base");
        assert_eq!(style.arrow_head_size, 0.18);
        assert_eq!(style.text_gap, 0.045);
        assert_eq!(style.vertical_text_position, VerticalTextPosition::Centered);
        assert!(style.force_line_inside);
        assert_eq!(style.units_precision, 2);
    }

    #[test]
    fn test_iso_25() {
        let iso = DimStyle::iso_25();
        assert_eq!(iso.name, "ISO-25");
        assert_eq!(iso.extension_line_extend, 1.25);
        assert_eq!(iso.extension_line_offset, 0.625);
        assert_eq!(iso.text_height, 2.5);
        assert_eq!(iso.text_color, Color::WHITE);
        assert_eq!(iso.vertical_text_position, VerticalTextPosition::Above);
        assert_eq!(iso.text_movement, DimensionTextMovement::DimLineWithText);
        assert!(!iso.angle_suppress_trailing_zeros);
    }

    #[test]
    fn test_signed_center_mark() {
        let mut style = DimStyle::new("C");
        style.set_signed_center_mark_size(-1.5);
        assert_eq!(style.center_type, CenterMarkType::Line);
        assert_eq!(style.center_mark_size, 1.5);
        assert_eq!(style.signed_center_mark_size(), -1.5);
        style.set_signed_center_mark_size(0.0);
        assert_eq!(style.center_type, CenterMarkType::None);
    }

    #[test]
    fn test_arrow_head_values() {
        assert_eq!(ArrowHeadType::from_value(3), ArrowHeadType::Dot);
        assert_eq!(ArrowHeadType::from_value(20), ArrowHeadType::UserDefined);
        assert_eq!(ArrowHeadType::from_value(-1), ArrowHeadType::UserDefined);
        assert_eq!(ArrowHeadType::None.value(), 19);
    }

    #[test]
    fn test_arrow_block_name() {
        let mut style = DimStyle::new("A");
        assert_eq!(style.arrow_head1_block_name(), "_Solid");
        style.arrow_head2_type = ArrowHeadType::UserDefined;
        style.arrow_head2_block = "MyArrow".to_string();
        assert_eq!(style.arrow_head2_block_name(), "MyArrow");
    }
}
