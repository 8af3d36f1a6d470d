//! Dimension entity and its per-instance style overrides
//!
//! A dimension names a dimension style and may override any of its
//! properties. Every property getter resolves in three steps: the instance
//! override if set, else the named style's value, else a fixed default for
//! that property when the style does not exist.

use super::{AttachmentPoint, Entity, EntityCommon};
use crate::document::CadDocument;
use crate::tables::dimstyle::arrow_block_name;
use crate::types::{Color, LineWeight, Vector2};

pub use crate::tables::dimstyle::{
    ArrowHeadType, CenterMarkType, DimStyle, DimensionTextMovement, FitMode,
    HorizontalTextPosition, LinearUnitFormat, VerticalTextPosition,
};

/// Geometry of the seven dimension kinds
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionKind {
    /// Linear dimension measured along a fixed direction
    Rotated {
        ext_line1_point: Vector2,
        ext_line2_point: Vector2,
        /// Dimension line angle in degrees
        rotation: f64,
    },
    /// Linear dimension parallel to the measured points
    Aligned {
        ext_line1_point: Vector2,
        ext_line2_point: Vector2,
        /// Oblique angle of the extension lines in degrees
        rotation: f64,
    },
    /// Angle between two lines; the second line's end is the definition point
    Angular2Line {
        first_start: Vector2,
        first_end: Vector2,
        second_start: Vector2,
    },
    Diametric {
        chord_point: Vector2,
        leader_length: f64,
    },
    Radial {
        chord_point: Vector2,
        leader_length: f64,
    },
    /// Angle at a vertex between two points
    Angular3Point {
        first_end: Vector2,
        second_end: Vector2,
        angle_vertex: Vector2,
    },
    Ordinate {
        feature_point: Vector2,
        leader_end_point: Vector2,
        /// Measures along X rather than Y
        is_x_type: bool,
    },
}

impl DimensionKind {
    /// Low nibble of group code 70
    pub fn type_code(&self) -> i16 {
        match self {
            DimensionKind::Rotated { .. } => 0,
            DimensionKind::Aligned { .. } => 1,
            DimensionKind::Angular2Line { .. } => 2,
            DimensionKind::Diametric { .. } => 3,
            DimensionKind::Radial { .. } => 4,
            DimensionKind::Angular3Point { .. } => 5,
            DimensionKind::Ordinate { .. } => 6,
        }
    }

    /// Empty geometry for a type code, `None` for unknown codes
    pub fn from_type_code(code: i16) -> Option<Self> {
        let p = Vector2::ZERO;
        Some(match code & 0x0F {
            0 => DimensionKind::Rotated { ext_line1_point: p, ext_line2_point: p, rotation: 0.0 },
            1 => DimensionKind::Aligned { ext_line1_point: p, ext_line2_point: p, rotation: 0.0 },
            2 => DimensionKind::Angular2Line { first_start: p, first_end: p, second_start: p },
            3 => DimensionKind::Diametric { chord_point: p, leader_length: 0.0 },
            4 => DimensionKind::Radial { chord_point: p, leader_length: 0.0 },
            5 => DimensionKind::Angular3Point { first_end: p, second_end: p, angle_vertex: p },
            6 => DimensionKind::Ordinate {
                feature_point: p,
                leader_end_point: p,
                is_x_type: code & 64 != 0,
            },
            _ => return None,
        })
    }

    fn translate(&mut self, offset: Vector2) {
        match self {
            DimensionKind::Rotated { ext_line1_point, ext_line2_point, .. }
            | DimensionKind::Aligned { ext_line1_point, ext_line2_point, .. } => {
                *ext_line1_point = *ext_line1_point + offset;
                *ext_line2_point = *ext_line2_point + offset;
            }
            DimensionKind::Angular2Line { first_start, first_end, second_start } => {
                *first_start = *first_start + offset;
                *first_end = *first_end + offset;
                *second_start = *second_start + offset;
            }
            DimensionKind::Diametric { chord_point, .. } | DimensionKind::Radial { chord_point, .. } => {
                *chord_point = *chord_point + offset;
            }
            DimensionKind::Angular3Point { first_end, second_end, angle_vertex } => {
                *first_end = *first_end + offset;
                *second_end = *second_end + offset;
                *angle_vertex = *angle_vertex + offset;
            }
            DimensionKind::Ordinate { feature_point, leader_end_point, .. } => {
                *feature_point = *feature_point + offset;
                *leader_end_point = *leader_end_point + offset;
            }
        }
    }
}

/// Instance-level overrides of a dimension style; `None` inherits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimStyleOverride {
    pub dimension_line_color: Option<Color>,
    pub dimension_line_weight: Option<LineWeight>,
    pub dim_line1_suppress: Option<bool>,
    pub dim_line2_suppress: Option<bool>,
    pub force_line_inside: Option<bool>,
    pub extension_line_color: Option<Color>,
    pub extension_line_weight: Option<LineWeight>,
    pub extension_line_extend: Option<f64>,
    pub extension_line_offset: Option<f64>,
    pub ext_line1_suppress: Option<bool>,
    pub ext_line2_suppress: Option<bool>,
    pub arrow_head1_type: Option<ArrowHeadType>,
    pub arrow_head2_type: Option<ArrowHeadType>,
    /// Only meaningful with a user-defined arrow type
    pub arrow_head1_block: Option<String>,
    /// Only meaningful with a user-defined arrow type
    pub arrow_head2_block: Option<String>,
    pub arrow_head_size: Option<f64>,
    pub center_type: Option<CenterMarkType>,
    pub center_mark_size: Option<f64>,
    pub text_style: Option<String>,
    pub text_height: Option<f64>,
    pub text_color: Option<Color>,
    pub vertical_text_position: Option<VerticalTextPosition>,
    pub horizontal_text_position: Option<HorizontalTextPosition>,
    pub text_align: Option<bool>,
    pub text_gap: Option<f64>,
    pub text: Option<String>,
    pub fit: Option<FitMode>,
    pub text_movement: Option<DimensionTextMovement>,
    pub text_inside: Option<bool>,
    pub units_format: Option<LinearUnitFormat>,
    pub units_precision: Option<i16>,
    pub suppress_leading_zeros: Option<bool>,
    pub suppress_trailing_zeros: Option<bool>,
    pub angle_suppress_leading_zeros: Option<bool>,
    pub angle_suppress_trailing_zeros: Option<bool>,
    pub angle_format: Option<i16>,
    pub angle_precision: Option<i16>,
    pub linear_scale_factor: Option<f64>,
}

impl DimStyleOverride {
    /// True when no property is overridden
    pub fn is_empty(&self) -> bool {
        *self == DimStyleOverride::default()
    }
}

/// A dimension entity
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub common: EntityCommon,
    pub kind: DimensionKind,
    /// Name of the anonymous block holding the rendered geometry, if any
    pub block_name: String,
    /// Definition point; its meaning depends on the kind
    pub definition_point: Vector2,
    /// Middle point of the dimension text
    pub text_position: Vector2,
    pub attachment: AttachmentPoint,
    /// Dimension style name
    pub style_name: String,
    pub overrides: DimStyleOverride,
    /// Text rotation in degrees relative to the dimension line
    pub text_rotation: Option<f64>,
}

impl Dimension {
    /// Create a dimension of `kind` using the "ISO-25" style
    pub fn new(kind: DimensionKind) -> Self {
        Dimension {
            common: EntityCommon::new(),
            kind,
            block_name: String::new(),
            definition_point: Vector2::ZERO,
            text_position: Vector2::ZERO,
            attachment: AttachmentPoint::MiddleCenter,
            style_name: "ISO-25".to_string(),
            overrides: DimStyleOverride::default(),
            text_rotation: None,
        }
    }

    /// Aligned dimension between two points with the dimension line through `line_point`
    pub fn aligned(first: Vector2, second: Vector2, line_point: Vector2) -> Self {
        let mut dim = Self::new(DimensionKind::Aligned {
            ext_line1_point: first,
            ext_line2_point: second,
            rotation: 0.0,
        });
        dim.definition_point = line_point;
        dim.text_position = (first + second) / 2.0;
        dim
    }

    /// Linear dimension along `rotation` degrees
    pub fn rotated(first: Vector2, second: Vector2, line_point: Vector2, rotation: f64) -> Self {
        let mut dim = Self::new(DimensionKind::Rotated {
            ext_line1_point: first,
            ext_line2_point: second,
            rotation,
        });
        dim.definition_point = line_point;
        dim.text_position = (first + second) / 2.0;
        dim
    }

    /// Radius dimension of a circle
    pub fn radial(center: Vector2, chord_point: Vector2) -> Self {
        let mut dim = Self::new(DimensionKind::Radial { chord_point, leader_length: 0.0 });
        dim.definition_point = center;
        dim.text_position = (center + chord_point) / 2.0;
        dim
    }

    /// Diameter dimension between opposite chord points
    pub fn diametric(far_chord_point: Vector2, chord_point: Vector2) -> Self {
        let mut dim = Self::new(DimensionKind::Diametric { chord_point, leader_length: 0.0 });
        dim.definition_point = far_chord_point;
        dim.text_position = (far_chord_point + chord_point) / 2.0;
        dim
    }

    /// Named style, when present in the document
    pub fn style<'a>(&self, document: &'a CadDocument) -> Option<&'a DimStyle> {
        document.dim_styles.get(&self.style_name)
    }

    pub fn override_text_rotation(&mut self, degrees: f64) {
        self.text_rotation = Some(degrees);
    }

    /// Use a user block as the first arrowhead
    pub fn override_arrow_head1_block(&mut self, name: impl Into<String>) {
        self.overrides.arrow_head1_type = Some(ArrowHeadType::UserDefined);
        self.overrides.arrow_head1_block = Some(name.into());
    }

    /// Use a user block as the second arrowhead
    pub fn override_arrow_head2_block(&mut self, name: impl Into<String>) {
        self.overrides.arrow_head2_type = Some(ArrowHeadType::UserDefined);
        self.overrides.arrow_head2_block = Some(name.into());
    }

    /// Block name drawn as the first arrowhead
    pub fn arrow_head1_block(&self, document: &CadDocument) -> String {
        if let Some(kind) = self.overrides.arrow_head1_type {
            return arrow_block_name(kind, self.overrides.arrow_head1_block.as_deref().unwrap_or(""));
        }
        match self.style(document) {
            Some(style) => style.arrow_head1_block_name(),
            None => arrow_block_name(ArrowHeadType::Default, ""),
        }
    }

    /// Block name drawn as the second arrowhead
    pub fn arrow_head2_block(&self, document: &CadDocument) -> String {
        if let Some(kind) = self.overrides.arrow_head2_type {
            return arrow_block_name(kind, self.overrides.arrow_head2_block.as_deref().unwrap_or(""));
        }
        match self.style(document) {
            Some(style) => style.arrow_head2_block_name(),
            None => arrow_block_name(ArrowHeadType::Default, ""),
        }
    }
}

/// Generate a resolving getter and an override setter per property
macro_rules! resolved_properties {
    ($($field:ident, $setter:ident: $ty:ty = $default:expr;)*) => {
        impl Dimension {
            $(
                pub fn $field(&self, document: &CadDocument) -> $ty {
                    if let Some(value) = &self.overrides.$field {
                        return value.clone();
                    }
                    match self.style(document) {
                        Some(style) => style.$field.clone(),
                        None => $default,
                    }
                }

                pub fn $setter(&mut self, value: $ty) {
                    self.overrides.$field = Some(value);
                }
            )*
        }
    };
}

resolved_properties! {
    dimension_line_color, override_dimension_line_color: Color = Color::ByBlock;
    dimension_line_weight, override_dimension_line_weight: LineWeight = LineWeight::ByBlock;
    dim_line1_suppress, override_dim_line1_suppress: bool = false;
    dim_line2_suppress, override_dim_line2_suppress: bool = false;
    force_line_inside, override_force_line_inside: bool = false;
    extension_line_color, override_extension_line_color: Color = Color::ByBlock;
    extension_line_weight, override_extension_line_weight: LineWeight = LineWeight::ByBlock;
    extension_line_extend, override_extension_line_extend: f64 = 1.25;
    extension_line_offset, override_extension_line_offset: f64 = 0.625;
    ext_line1_suppress, override_ext_line1_suppress: bool = false;
    ext_line2_suppress, override_ext_line2_suppress: bool = false;
    arrow_head1_type, override_arrow_head1_type: ArrowHeadType = ArrowHeadType::Default;
    arrow_head2_type, override_arrow_head2_type: ArrowHeadType = ArrowHeadType::Default;
    arrow_head_size, override_arrow_head_size: f64 = 2.5;
    center_type, override_center_type: CenterMarkType = CenterMarkType::Mark;
    center_mark_size, override_center_mark_size: f64 = 2.5;
    text_style, override_text_style: String = "Standard".to_string();
    text_height, override_text_height: f64 = 2.5;
    text_color, override_text_color: Color = Color::ByBlock;
    vertical_text_position, override_vertical_text_position: VerticalTextPosition = VerticalTextPosition::Above;
    horizontal_text_position, override_horizontal_text_position: HorizontalTextPosition = HorizontalTextPosition::Centered;
    text_align, override_text_align: bool = false;
    text_gap, override_text_gap: f64 = 0.625;
    text, override_text: String = String::new();
    fit, override_fit: FitMode = FitMode::BestFit;
    text_movement, override_text_movement: DimensionTextMovement = DimensionTextMovement::MoveTextNoLeader;
    text_inside, override_text_inside: bool = false;
    units_format, override_units_format: LinearUnitFormat = LinearUnitFormat::Decimal;
    units_precision, override_units_precision: i16 = 2;
    suppress_leading_zeros, override_suppress_leading_zeros: bool = false;
    suppress_trailing_zeros, override_suppress_trailing_zeros: bool = true;
    angle_suppress_leading_zeros, override_angle_suppress_leading_zeros: bool = false;
    angle_suppress_trailing_zeros, override_angle_suppress_trailing_zeros: bool = true;
    angle_format, override_angle_format: i16 = 0;
    angle_precision, override_angle_precision: i16 = 1;
    linear_scale_factor, override_linear_scale_factor: f64 = 1.0;
}

impl Entity for Dimension {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "DIMENSION"
    }

    fn translate(&mut self, offset: Vector2) {
        self.definition_point = self.definition_point + offset;
        self.text_position = self.text_position + offset;
        self.kind.translate(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim() -> Dimension {
        Dimension::aligned(Vector2::ZERO, Vector2::new(10.0, 0.0), Vector2::new(0.0, 5.0))
    }

    #[test]
    fn test_getters_follow_named_style() {
        let mut doc = CadDocument::new();
        let mut style = DimStyle::iso_25();
        style.arrow_head_size = 7.0;
        style.text_color = Color::RED;
        doc.set_dim_style(style);

        let d = dim();
        assert_eq!(d.arrow_head_size(&doc), 7.0);
        assert_eq!(d.text_color(&doc), Color::RED);
        assert_eq!(d.text_movement(&doc), DimensionTextMovement::DimLineWithText);
        assert!(!d.angle_suppress_trailing_zeros(&doc));
    }

    #[test]
    fn test_override_wins_over_style() {
        let mut doc = CadDocument::new();
        doc.set_dim_style(DimStyle::iso_25());

        let mut d = dim();
        d.override_arrow_head_size(1.0);
        d.override_text(String::from("<> mm"));
        assert_eq!(d.arrow_head_size(&doc), 1.0);
        assert_eq!(d.text(&doc), "<> mm");
        assert_eq!(d.text_height(&doc), 2.5);
    }

    #[test]
    fn test_missing_style_uses_fixed_defaults() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.style_name = "Nope".to_string();
        assert_eq!(d.force_line_inside(&doc), false);
        assert_eq!(d.extension_line_extend(&doc), 1.25);
        assert_eq!(d.vertical_text_position(&doc), VerticalTextPosition::Above);
        assert_eq!(d.text_style(&doc), "Standard");
        assert_eq!(d.units_precision(&doc), 2);
        assert_eq!(d.angle_precision(&doc), 1);
        assert_eq!(d.arrow_head1_block(&doc), "_Solid");
    }

    #[test]
    fn test_arrow_block_override() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.override_arrow_head2_block("Tick");
        assert_eq!(d.arrow_head2_type(&doc), ArrowHeadType::UserDefined);
        assert_eq!(d.arrow_head2_block(&doc), "Tick");
        d.override_arrow_head1_type(ArrowHeadType::Dot);
        assert_eq!(d.arrow_head1_block(&doc), "_Dot");
    }

    #[test]
    fn test_type_codes() {
        for code in 0..=6 {
            assert_eq!(DimensionKind::from_type_code(code | 32).unwrap().type_code(), code);
        }
        assert!(DimensionKind::from_type_code(7).is_none());
        assert!(DimStyleOverride::default().is_empty());
    }
}
