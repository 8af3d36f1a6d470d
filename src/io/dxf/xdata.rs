//! Extended data (XDATA) records
//!
//! Extended data is application data appended to an entity under group codes
//! 1000-1071. The codec uses it for the `ACAD` application's `DSTYLE` list,
//! which carries per-dimension style overrides as `(1070 code, value)` pairs,
//! and for the arrow size override of leaders.

use crate::document::CadDocument;
use crate::entities::{DimStyleOverride, Dimension};
use crate::predefined::arrow_head_type;
use crate::tables::dimstyle::{
    ArrowHeadType, CenterMarkType, DimensionTextMovement, FitMode, HorizontalTextPosition,
    LinearUnitFormat, VerticalTextPosition,
};
use crate::types::{Color, Handle, LineWeight};

/// Application that owns the dimension override list
pub const ACAD_APP: &str = "ACAD";
/// Marker string that opens the dimension override list
pub const DSTYLE: &str = "DSTYLE";

/// Extended data value types
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// String value (group code 1000)
    String(String),
    /// Control string (group code 1002), `{` or `}`
    ControlString(String),
    /// Database handle (group code 1005)
    Handle(Handle),
    /// Real value (group code 1040)
    Real(f64),
    /// 16-bit integer (group code 1070)
    Integer16(i16),
    /// 32-bit integer (group code 1071)
    Integer32(i32),
}

impl XDataValue {
    /// Group code this value is written under
    pub fn code(&self) -> i32 {
        match self {
            XDataValue::String(_) => 1000,
            XDataValue::ControlString(_) => 1002,
            XDataValue::Handle(_) => 1005,
            XDataValue::Real(_) => 1040,
            XDataValue::Integer16(_) => 1070,
            XDataValue::Integer32(_) => 1071,
        }
    }

    /// Decode a value read under `code`; `None` for codes not kept or
    /// malformed numbers
    pub fn parse(code: i32, text: &str) -> Option<Self> {
        let token = text.trim();
        match code {
            1000 => Some(XDataValue::String(text.to_string())),
            1002 => Some(XDataValue::ControlString(token.to_string())),
            1005 => Handle::parse_hex(token).map(XDataValue::Handle),
            1040 => token.parse().ok().map(XDataValue::Real),
            1070 => token.parse().ok().map(XDataValue::Integer16),
            1071 => token.parse().ok().map(XDataValue::Integer32),
            _ => None,
        }
    }
}

/// Extended data for a single application
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Application name (group code 1001)
    pub application_name: String,
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Start a `DSTYLE { ... }` list
    fn dstyle() -> Self {
        let mut record = Self::new(ACAD_APP);
        record.add_value(XDataValue::String(DSTYLE.to_string()));
        record.add_value(XDataValue::ControlString("{".to_string()));
        record
    }

    fn int(&mut self, code: i16, value: i16) {
        self.add_value(XDataValue::Integer16(code));
        self.add_value(XDataValue::Integer16(value));
    }

    fn real(&mut self, code: i16, value: f64) {
        self.add_value(XDataValue::Integer16(code));
        self.add_value(XDataValue::Real(value));
    }

    fn handle(&mut self, code: i16, value: Handle) {
        self.add_value(XDataValue::Integer16(code));
        self.add_value(XDataValue::Handle(value));
    }

    fn close(mut self) -> Self {
        self.add_value(XDataValue::ControlString("}".to_string()));
        self
    }

    /// `(code, value)` pairs between the braces of a `DSTYLE` list
    pub fn dstyle_pairs(&self) -> Vec<(i16, XDataValue)> {
        let mut values = self.values.iter();
        let opened = matches!(values.next(), Some(XDataValue::String(s)) if s == DSTYLE)
            && matches!(values.next(), Some(XDataValue::ControlString(s)) if s == "{");
        if self.application_name != ACAD_APP || !opened {
            return Vec::new();
        }
        let mut pairs = Vec::new();
        while let Some(value) = values.next() {
            match value {
                XDataValue::Integer16(code) => match values.next() {
                    Some(value) => pairs.push((*code, value.clone())),
                    None => break,
                },
                XDataValue::ControlString(s) if s == "}" => break,
                _ => {}
            }
        }
        pairs
    }
}

/// Name to handle lookups needed while writing override references
pub trait OverrideHandles {
    fn text_style_handle(&self, name: &str) -> Handle;
    fn block_handle(&self, name: &str) -> Handle;
}

fn flag(value: bool) -> i16 {
    i16::from(value)
}

/// Linear zero suppression as stored under DIMZIN (bit 4 leading, bit 8 trailing)
fn linear_zero_flags(leading: bool, trailing: bool) -> i16 {
    (flag(leading) | flag(trailing) << 1) << 2
}

/// Angular zero suppression as stored under DIMAZIN (bit 1 leading, bit 2 trailing)
fn angular_zero_flags(leading: bool, trailing: bool) -> i16 {
    flag(leading) | flag(trailing) << 1
}

/// Build the `DSTYLE` list for the overridden properties of `dim`;
/// `None` when nothing is overridden. The override text is not part of the
/// list, it is written under group code 1.
pub fn dimension_overrides(
    dim: &Dimension,
    document: &CadDocument,
    handles: &impl OverrideHandles,
) -> Option<ExtendedDataRecord> {
    let o = &dim.overrides;
    let mut record = ExtendedDataRecord::dstyle();

    if o.extension_line_offset.is_some() {
        record.real(42, dim.extension_line_offset(document));
    }
    if o.horizontal_text_position.is_some() {
        record.int(280, dim.horizontal_text_position(document) as i16);
    }
    if o.dimension_line_color.is_some() {
        record.int(176, dim.dimension_line_color(document).dxf_index());
    }
    if o.dimension_line_weight.is_some() {
        record.int(371, dim.dimension_line_weight(document).value());
    }
    if o.arrow_head_size.is_some() {
        record.real(41, dim.arrow_head_size(document));
    }
    if o.text_height.is_some() {
        record.real(140, dim.text_height(document));
    }
    if o.text_style.is_some() {
        record.handle(340, handles.text_style_handle(&dim.text_style(document)));
    }
    if o.text_color.is_some() {
        record.int(178, dim.text_color(document).dxf_index());
    }
    if o.vertical_text_position.is_some() {
        record.int(145, dim.vertical_text_position(document) as i16);
    }
    if o.text_align.is_some() {
        let align = flag(dim.text_align(document));
        record.int(73, align);
        record.int(74, align);
    }
    if o.text_gap.is_some() {
        record.real(147, dim.text_gap(document));
    }
    if o.fit.is_some() {
        record.int(289, dim.fit(document) as i16);
    }
    if o.text_movement.is_some() {
        record.int(279, dim.text_movement(document) as i16);
    }
    if o.text_inside.is_some() {
        record.int(174, flag(dim.text_inside(document)));
    }
    if o.force_line_inside.is_some() {
        record.int(172, flag(dim.force_line_inside(document)));
    }
    if o.suppress_leading_zeros.is_some() || o.suppress_trailing_zeros.is_some() {
        record.int(
            78,
            linear_zero_flags(dim.suppress_leading_zeros(document), dim.suppress_trailing_zeros(document)),
        );
    }
    if o.angle_suppress_leading_zeros.is_some() || o.angle_suppress_trailing_zeros.is_some() {
        record.int(
            79,
            angular_zero_flags(
                dim.angle_suppress_leading_zeros(document),
                dim.angle_suppress_trailing_zeros(document),
            ),
        );
    }
    if o.dim_line1_suppress.is_some() {
        record.int(281, flag(dim.dim_line1_suppress(document)));
    }
    if o.dim_line2_suppress.is_some() {
        record.int(282, flag(dim.dim_line2_suppress(document)));
    }
    if o.extension_line_color.is_some() {
        record.int(177, dim.extension_line_color(document).dxf_index());
    }
    if o.extension_line_weight.is_some() {
        record.int(372, dim.extension_line_weight(document).value());
    }
    if o.extension_line_extend.is_some() {
        record.real(44, dim.extension_line_extend(document));
    }
    if o.ext_line1_suppress.is_some() {
        record.int(75, flag(dim.ext_line1_suppress(document)));
    }
    if o.ext_line2_suppress.is_some() {
        record.int(76, flag(dim.ext_line2_suppress(document)));
    }
    if o.center_type.is_some() || o.center_mark_size.is_some() {
        let size = dim.center_mark_size(document);
        let signed = match dim.center_type(document) {
            CenterMarkType::Mark => size,
            CenterMarkType::Line => -size,
            CenterMarkType::None => 0.0,
        };
        record.real(141, signed);
    }
    if o.arrow_head1_type.is_some() || o.arrow_head1_block.is_some() {
        record.int(173, 1);
        record.handle(343, handles.block_handle(&dim.arrow_head1_block(document)));
    }
    if o.arrow_head2_type.is_some() || o.arrow_head2_block.is_some() {
        record.int(173, 1);
        record.handle(344, handles.block_handle(&dim.arrow_head2_block(document)));
    }
    if o.units_format.is_some() {
        record.int(277, dim.units_format(document) as i16);
    }
    if o.units_precision.is_some() {
        record.int(271, dim.units_precision(document));
    }
    if o.angle_format.is_some() {
        record.int(275, dim.angle_format(document));
    }
    if o.angle_precision.is_some() {
        record.int(179, dim.angle_precision(document));
    }
    if o.linear_scale_factor.is_some() {
        record.real(144, dim.linear_scale_factor(document));
    }

    // String and brace only: nothing was overridden
    if record.len() == 2 {
        return None;
    }
    Some(record.close())
}

/// A handle-valued override whose target name is only known once the
/// whole stream has been read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideReference {
    TextStyle(Handle),
    ArrowHead1(Handle),
    ArrowHead2(Handle),
}

fn int_of(value: &XDataValue) -> Option<i16> {
    match value {
        XDataValue::Integer16(v) => Some(*v),
        XDataValue::Integer32(v) => i16::try_from(*v).ok(),
        XDataValue::Real(v) => Some(*v as i16),
        _ => None,
    }
}

fn real_of(value: &XDataValue) -> Option<f64> {
    match value {
        XDataValue::Real(v) => Some(*v),
        XDataValue::Integer16(v) => Some(f64::from(*v)),
        XDataValue::Integer32(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Install the overrides of a `DSTYLE` list. Handle-valued entries are
/// returned for later resolution.
pub fn apply_dimension_overrides(
    record: &ExtendedDataRecord,
    overrides: &mut DimStyleOverride,
) -> Vec<OverrideReference> {
    let mut references = Vec::new();
    for (code, value) in record.dstyle_pairs() {
        if let XDataValue::Handle(handle) = value {
            match code {
                340 => references.push(OverrideReference::TextStyle(handle)),
                343 => references.push(OverrideReference::ArrowHead1(handle)),
                344 => references.push(OverrideReference::ArrowHead2(handle)),
                _ => tracing::debug!(code, "ignoring handle override"),
            }
            continue;
        }
        let int = int_of(&value);
        let real = real_of(&value);
        match (code, int, real) {
            (42, _, Some(v)) => overrides.extension_line_offset = Some(v),
            (280, Some(v), _) => overrides.horizontal_text_position = Some(HorizontalTextPosition::from_value(v)),
            (176, Some(v), _) => overrides.dimension_line_color = Some(Color::from_index(v)),
            (371, Some(v), _) => overrides.dimension_line_weight = Some(LineWeight::from_value(v)),
            (41, _, Some(v)) => overrides.arrow_head_size = Some(v),
            (140, _, Some(v)) => overrides.text_height = Some(v),
            (178, Some(v), _) => overrides.text_color = Some(Color::from_index(v)),
            (145, Some(v), _) => overrides.vertical_text_position = Some(VerticalTextPosition::from_value(v)),
            (73, Some(v), _) | (74, Some(v), _) => overrides.text_align = Some(v != 0),
            (147, _, Some(v)) => overrides.text_gap = Some(v),
            (289, Some(v), _) => overrides.fit = Some(FitMode::from_value(v)),
            (279, Some(v), _) => overrides.text_movement = Some(DimensionTextMovement::from_value(v)),
            (174, Some(v), _) => overrides.text_inside = Some(v != 0),
            (172, Some(v), _) => overrides.force_line_inside = Some(v != 0),
            (78, Some(v), _) => {
                overrides.suppress_leading_zeros = Some(v & 4 != 0);
                overrides.suppress_trailing_zeros = Some(v & 8 != 0);
            }
            (79, Some(v), _) => {
                overrides.angle_suppress_leading_zeros = Some(v & 1 != 0);
                overrides.angle_suppress_trailing_zeros = Some(v & 2 != 0);
            }
            (281, Some(v), _) => overrides.dim_line1_suppress = Some(v != 0),
            (282, Some(v), _) => overrides.dim_line2_suppress = Some(v != 0),
            (177, Some(v), _) => overrides.extension_line_color = Some(Color::from_index(v)),
            (372, Some(v), _) => overrides.extension_line_weight = Some(LineWeight::from_value(v)),
            (44, _, Some(v)) => overrides.extension_line_extend = Some(v),
            (75, Some(v), _) => overrides.ext_line1_suppress = Some(v != 0),
            (76, Some(v), _) => overrides.ext_line2_suppress = Some(v != 0),
            (141, _, Some(v)) => {
                let (kind, size) = if v > 0.0 {
                    (CenterMarkType::Mark, v)
                } else if v == 0.0 {
                    (CenterMarkType::None, 0.0)
                } else {
                    (CenterMarkType::Line, -v)
                };
                overrides.center_type = Some(kind);
                overrides.center_mark_size = Some(size);
            }
            (173, _, _) => {}
            (277, Some(v), _) => overrides.units_format = Some(LinearUnitFormat::from_value(v)),
            (271, Some(v), _) => overrides.units_precision = Some(v),
            (275, Some(v), _) => overrides.angle_format = Some(v),
            (179, Some(v), _) => overrides.angle_precision = Some(v),
            (144, _, Some(v)) => overrides.linear_scale_factor = Some(v),
            _ => tracing::debug!(code, "ignoring unknown dimension override"),
        }
    }
    references
}

/// Zero suppression overrides travel as packed DIMZIN/DIMAZIN values, so
/// reading one back yields both halves. Drop each half that matches what the
/// dimension inherits anyway; the resolved values are unchanged.
pub fn narrow_zero_suppression(dim: &mut Dimension, document: &CadDocument) {
    type Getter = fn(&Dimension, &CadDocument) -> bool;
    type Slot = fn(&mut DimStyleOverride) -> &mut Option<bool>;
    let halves: [(Getter, Slot); 4] = [
        (Dimension::suppress_leading_zeros, |o| &mut o.suppress_leading_zeros),
        (Dimension::suppress_trailing_zeros, |o| &mut o.suppress_trailing_zeros),
        (Dimension::angle_suppress_leading_zeros, |o| &mut o.angle_suppress_leading_zeros),
        (Dimension::angle_suppress_trailing_zeros, |o| &mut o.angle_suppress_trailing_zeros),
    ];
    for (inherited, slot) in halves {
        let Some(value) = slot(&mut dim.overrides).take() else {
            continue;
        };
        if inherited(dim, document) != value {
            *slot(&mut dim.overrides) = Some(value);
        }
    }
}

/// Arrowhead override for a block name: predefined names map to their kind,
/// anything else is a user block
pub fn arrow_override(block_name: &str) -> (ArrowHeadType, Option<String>) {
    match arrow_head_type(block_name) {
        ArrowHeadType::UserDefined => (ArrowHeadType::UserDefined, Some(block_name.to_string())),
        kind => (kind, None),
    }
}

/// `ACAD DSTYLE { 41 size }` as written after a leader with its own arrow size
pub fn leader_arrow_size(size: f64) -> ExtendedDataRecord {
    let mut record = ExtendedDataRecord::dstyle();
    record.real(41, size);
    record.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector2;

    struct FixedHandles;

    impl OverrideHandles for FixedHandles {
        fn text_style_handle(&self, _name: &str) -> Handle {
            Handle::new(0x30)
        }
        fn block_handle(&self, name: &str) -> Handle {
            if name == "_Dot" {
                Handle::new(0x40)
            } else {
                Handle::new(0x41)
            }
        }
    }

    fn dim() -> Dimension {
        Dimension::aligned(Vector2::ZERO, Vector2::new(10.0, 0.0), Vector2::new(0.0, 5.0))
    }

    #[test]
    fn test_no_overrides_no_record() {
        let doc = CadDocument::new();
        assert!(dimension_overrides(&dim(), &doc, &FixedHandles).is_none());
    }

    #[test]
    fn test_override_pairs() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.override_arrow_head_size(3.5);
        d.override_fit(FitMode::TextOnly);
        d.override_text_style("Romans".to_string());
        let record = dimension_overrides(&d, &doc, &FixedHandles).unwrap();
        let pairs = record.dstyle_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (41, XDataValue::Real(3.5)));
        assert_eq!(pairs[1], (340, XDataValue::Handle(Handle::new(0x30))));
        assert_eq!(pairs[2], (289, XDataValue::Integer16(2)));
        assert_eq!(record.values.last(), Some(&XDataValue::ControlString("}".into())));
    }

    #[test]
    fn test_zero_suppression_bits() {
        assert_eq!(linear_zero_flags(true, false), 4);
        assert_eq!(linear_zero_flags(false, true), 8);
        assert_eq!(angular_zero_flags(true, true), 3);
    }

    #[test]
    fn test_apply_restores_overrides() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.override_suppress_leading_zeros(true);
        d.override_center_type(CenterMarkType::Line);
        d.override_dimension_line_color(Color::RED);
        d.override_arrow_head1_type(ArrowHeadType::Dot);
        let record = dimension_overrides(&d, &doc, &FixedHandles).unwrap();

        let mut restored = DimStyleOverride::default();
        let refs = apply_dimension_overrides(&record, &mut restored);
        assert_eq!(refs, vec![OverrideReference::ArrowHead1(Handle::new(0x40))]);
        assert_eq!(restored.suppress_leading_zeros, Some(true));
        assert_eq!(restored.suppress_trailing_zeros, Some(true));
        assert_eq!(restored.center_type, Some(CenterMarkType::Line));
        assert_eq!(restored.center_mark_size, Some(2.5));
        assert_eq!(restored.dimension_line_color, Some(Color::RED));
    }

    #[test]
    fn test_narrowing_keeps_only_the_overridden_half() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.override_suppress_leading_zeros(true);
        let record = dimension_overrides(&d, &doc, &FixedHandles).unwrap();

        let mut restored = dim();
        apply_dimension_overrides(&record, &mut restored.overrides);
        narrow_zero_suppression(&mut restored, &doc);
        assert_eq!(restored.overrides.suppress_leading_zeros, Some(true));
        assert_eq!(restored.overrides.suppress_trailing_zeros, None);
        assert!(restored.suppress_trailing_zeros(&doc));
    }

    #[test]
    fn test_narrowing_keeps_a_false_override_of_a_true_default() {
        let doc = CadDocument::new();
        let mut d = dim();
        d.override_angle_suppress_trailing_zeros(false);
        let record = dimension_overrides(&d, &doc, &FixedHandles).unwrap();

        let mut restored = dim();
        apply_dimension_overrides(&record, &mut restored.overrides);
        narrow_zero_suppression(&mut restored, &doc);
        assert_eq!(restored.overrides.angle_suppress_trailing_zeros, Some(false));
        assert_eq!(restored.overrides.angle_suppress_leading_zeros, None);
    }

    #[test]
    fn test_foreign_record_has_no_pairs() {
        let mut record = ExtendedDataRecord::new("OTHER");
        record.add_value(XDataValue::String(DSTYLE.into()));
        assert!(record.dstyle_pairs().is_empty());
    }

    #[test]
    fn test_arrow_override() {
        assert_eq!(arrow_override("_Open"), (ArrowHeadType::Open, None));
        assert_eq!(
            arrow_override("MyArrow"),
            (ArrowHeadType::UserDefined, Some("MyArrow".to_string()))
        );
    }
}
