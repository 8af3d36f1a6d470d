//! Entity decoders
//!
//! Every decoder reads the common prefix first, then its own fields until
//! the next record keyword. Handle references found on the way are recorded
//! as pending links against the entity's own handle; nothing is looked up
//! here, so forward references cost nothing.

use crate::entities::{
    Arc, AttachmentPoint, AttributeDefinition, AttributeEntity, AttributeFlags, AttributeText, BlockContent,
    BoundaryEdge, BoundaryLoop, BoundaryPath, BoundaryPathFlags, Cell, CellContent, CellKind, Circle, Dimension,
    DimensionKind, DrawingDirection, Ellipse, EntityCommon, EntityType, Hatch, HatchPatternType, HatchStyle, Insert,
    Leader, LeaderPathType, Line, LwPolyline, MText, MTextContent, MultiLeader, MultiLeaderContent, Point, Polyline,
    PolylineFlags, PolylineVertex, Solid, Spline, SplineFlags, Table, Text, TextHorizontalAlignment,
    TextVerticalAlignment, Viewport, XLine,
};
use crate::entities::viewport::status;
use crate::error::{DxfError, Result};
use crate::types::{Color, Handle, LineWeight, Vector2};

use super::super::xdata::{apply_dimension_overrides, narrow_zero_suppression, XDataValue};
use super::pending::EntityLink;
use super::section_reader::{color_of, SectionReader};
use super::stream_reader::DxfCodePair;

/// Count field that must not be negative
fn count_of(pair: &DxfCodePair) -> Result<usize> {
    usize::try_from(pair.as_i32()?)
        .map_err(|_| DxfError::Parse(format!("line {}: negative count {}", pair.line, pair.value.trim())))
}

/// Where a MULTILEADER decoder is in its nested record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeaderSection {
    Head,
    Context,
    Branch,
    Line,
    Trailer,
}

/// Where an ACAD_TABLE decoder is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableSection {
    Header,
    /// Cell properties, then its value once `301 CELL_VALUE` is seen
    Cell { value: bool },
    /// Between cells and after the last one
    Trailer,
}

impl SectionReader<'_> {
    /// Decode the entity whose keyword was just read.
    ///
    /// `None` when the record is not kept: an unsupported kind, a stray
    /// owned record, or (in failsafe mode) a record that failed to decode.
    pub(super) fn read_entity(&mut self, keyword: &DxfCodePair) -> Result<Option<EntityType>> {
        let kind = keyword.value.trim().to_ascii_uppercase();
        let result = self.decode_entity(&kind);
        Ok(self.recover(&kind, keyword.line, result)?.flatten())
    }

    fn decode_entity(&mut self, kind: &str) -> Result<Option<EntityType>> {
        let entity = match kind {
            "LINE" => self.read_line()?,
            "CIRCLE" => self.read_circle()?,
            "ARC" => self.read_arc()?,
            "ELLIPSE" => self.read_ellipse()?,
            "POINT" => self.read_point()?,
            "SOLID" => self.read_solid()?,
            "XLINE" => self.read_xline()?,
            "SPLINE" => self.read_spline()?,
            "LWPOLYLINE" => self.read_lwpolyline()?,
            "POLYLINE" => self.read_polyline()?,
            "MTEXT" => self.read_mtext()?,
            "TEXT" => self.read_text()?,
            "INSERT" => self.read_insert()?,
            "ATTDEF" => self.read_attribute_definition()?,
            "DIMENSION" => self.read_dimension()?,
            "LEADER" => self.read_leader()?,
            "MULTILEADER" => self.read_multileader()?,
            "HATCH" => self.read_hatch()?,
            "ACAD_TABLE" => self.read_acad_table()?,
            "VIEWPORT" => self.read_viewport()?,
            "VERTEX" | "SEQEND" | "ATTRIB" => {
                tracing::debug!(kind, "owned record without an owner skipped");
                self.skip_owned_record()?;
                return Ok(None);
            }
            _ => {
                self.report_unsupported(kind);
                self.skip_owned_record()?;
                return Ok(None);
            }
        };
        Ok(Some(entity))
    }

    // ------------------------------------------------------------------
    // Simple geometry
    // ------------------------------------------------------------------

    fn read_line(&mut self) -> Result<EntityType> {
        let mut line = Line::new();
        self.read_common(&mut line.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => line.start = self.point(&pair)?,
                11 => line.end = self.point(&pair)?,
                _ => {}
            }
        }
        Ok(line.into())
    }

    fn read_circle(&mut self) -> Result<EntityType> {
        let mut circle = Circle::new();
        self.read_common(&mut circle.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => circle.center = self.point(&pair)?,
                40 => circle.radius = pair.as_double()?,
                _ => {}
            }
        }
        Ok(circle.into())
    }

    fn read_arc(&mut self) -> Result<EntityType> {
        let mut arc = Arc::new();
        self.read_common(&mut arc.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => arc.center = self.point(&pair)?,
                40 => arc.radius = pair.as_double()?,
                50 => arc.start_angle = pair.as_double()?,
                51 => arc.end_angle = pair.as_double()?,
                _ => {}
            }
        }
        Ok(arc.into())
    }

    fn read_ellipse(&mut self) -> Result<EntityType> {
        let mut ellipse = Ellipse::new();
        self.read_common(&mut ellipse.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => ellipse.center = self.point(&pair)?,
                11 => ellipse.major_axis = self.point(&pair)?,
                40 => ellipse.minor_axis_ratio = pair.as_double()?,
                41 => ellipse.start_parameter = pair.as_double()?,
                42 => ellipse.end_parameter = pair.as_double()?,
                _ => {}
            }
        }
        Ok(ellipse.into())
    }

    fn read_point(&mut self) -> Result<EntityType> {
        let mut point = Point::new();
        self.read_common(&mut point.common)?;
        while let Some(pair) = self.next_field()? {
            if pair.code == 10 {
                point.location = self.point(&pair)?;
            }
        }
        Ok(point.into())
    }

    fn read_solid(&mut self) -> Result<EntityType> {
        let mut solid = Solid::new();
        self.read_common(&mut solid.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => solid.first_corner = self.point(&pair)?,
                11 => solid.second_corner = self.point(&pair)?,
                12 => solid.third_corner = self.point(&pair)?,
                13 => solid.fourth_corner = self.point(&pair)?,
                _ => {}
            }
        }
        Ok(solid.into())
    }

    fn read_xline(&mut self) -> Result<EntityType> {
        let mut xline = XLine::new();
        self.read_common(&mut xline.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => xline.base_point = self.point(&pair)?,
                11 => xline.direction = self.point(&pair)?,
                _ => {}
            }
        }
        Ok(xline.into())
    }

    fn read_spline(&mut self) -> Result<EntityType> {
        let mut spline = Spline::new();
        self.read_common(&mut spline.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                70 => spline.flags = SplineFlags::from_bits_truncate(pair.as_i16()?),
                71 => spline.degree = pair.as_i32()?,
                12 => spline.start_tangent = self.point(&pair)?,
                13 => spline.end_tangent = self.point(&pair)?,
                40 => spline.knots.push(pair.as_double()?),
                41 => spline.weights.push(pair.as_double()?),
                10 => spline.control_points.push(self.point(&pair)?),
                11 => spline.fit_points.push(self.point(&pair)?),
                _ => {}
            }
        }
        Ok(spline.into())
    }

    // ------------------------------------------------------------------
    // Polylines
    // ------------------------------------------------------------------

    fn read_lwpolyline(&mut self) -> Result<EntityType> {
        let mut pline = LwPolyline::new();
        self.read_common(&mut pline.common)?;
        let mut start_widths = Vec::new();
        let mut end_widths = Vec::new();
        let mut bulges = Vec::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                70 => pline.is_closed = pair.as_i16()? & 1 != 0,
                43 => pline.constant_width = Some(pair.as_double()?),
                10 => {
                    pline.vertices.push(self.point(&pair)?);
                    start_widths.push(0.0);
                    end_widths.push(0.0);
                    bulges.push(0.0);
                }
                40 => {
                    if let Some(width) = start_widths.last_mut() {
                        *width = pair.as_double()?;
                    }
                }
                41 => {
                    if let Some(width) = end_widths.last_mut() {
                        *width = pair.as_double()?;
                    }
                }
                42 => {
                    if let Some(bulge) = bulges.last_mut() {
                        *bulge = pair.as_double()?;
                    }
                }
                _ => {}
            }
        }

        // Keep the sparse form when every value is zero
        if start_widths.iter().chain(&end_widths).any(|w| *w != 0.0) {
            pline.start_widths = start_widths;
            pline.end_widths = end_widths;
        }
        if bulges.iter().any(|b| *b != 0.0) {
            pline.set_bulges(bulges);
        }
        Ok(pline.into())
    }

    fn read_polyline(&mut self) -> Result<EntityType> {
        let mut pline = Polyline::new();
        self.read_common(&mut pline.common)?;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                70 => pline.flags = PolylineFlags::from_bits_truncate(pair.as_i16()?),
                40 => pline.default_start_width = pair.as_double()?,
                41 => pline.default_end_width = pair.as_double()?,
                _ => {}
            }
        }

        loop {
            let Some(next) = self.peek()? else {
                break;
            };
            if next.is(0, "VERTEX") {
                self.raw_pair()?;
                let vertex = self.read_vertex()?;
                pline.vertices.push(vertex);
            } else if next.is(0, "SEQEND") {
                self.raw_pair()?;
                pline.seqend_handle = self.skip_owned_record()?;
                break;
            } else {
                tracing::debug!(handle = %pline.common.handle, "polyline without SEQEND");
                break;
            }
        }
        Ok(pline.into())
    }

    fn read_vertex(&mut self) -> Result<PolylineVertex> {
        let mut vertex = PolylineVertex::default();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => vertex.handle = self.handle_of(&pair)?,
                10 => vertex.location = self.point(&pair)?,
                40 => vertex.start_width = pair.as_double()?,
                41 => vertex.end_width = pair.as_double()?,
                42 => vertex.bulge = pair.as_double()?,
                _ => {}
            }
        }
        Ok(vertex)
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn read_mtext(&mut self) -> Result<EntityType> {
        let mut mtext = MText::new();
        self.read_common(&mut mtext.common)?;
        let mut direction = None;
        let mut rotation = 0.0;
        let mut spacing_style = None;
        let mut spacing = 0.0;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => mtext.insertion_point = self.point(&pair)?,
                40 => mtext.height = pair.as_double()?,
                41 => mtext.rectangle_width = pair.as_double()?,
                71 => mtext.attachment_point = AttachmentPoint::from_value(pair.as_i16()?),
                72 => mtext.drawing_direction = DrawingDirection::from_value(pair.as_i16()?),
                1 | 3 => mtext.value.push_str(&pair.value),
                7 => mtext.style = pair.value.clone(),
                11 => direction = Some(self.point(&pair)?),
                50 => rotation = pair.as_double()?,
                73 => spacing_style = Some(pair.as_i16()?),
                44 => spacing = pair.as_double()?,
                _ => {}
            }
        }

        // The direction vector wins over the rotation angle
        mtext.rotation = match direction {
            Some(d) if d.x != 0.0 || d.y != 0.0 => d.y.atan2(d.x).to_degrees(),
            _ => rotation,
        };
        // 1: "at least" spacing, stored as a zero factor
        mtext.line_spacing_factor = if spacing_style == Some(1) { 0.0 } else { spacing };
        Ok(mtext.into())
    }

    fn read_text(&mut self) -> Result<EntityType> {
        let mut text = Text::new();
        self.read_common(&mut text.common)?;
        let mut alignment_point = None;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => text.base_point = self.point(&pair)?,
                11 => alignment_point = Some(self.point(&pair)?),
                40 => text.height = pair.as_double()?,
                1 => text.value = pair.value.clone(),
                50 => text.rotation = pair.as_double()?,
                41 => text.width_factor = pair.as_double()?,
                51 => text.oblique_angle = Some(pair.as_double()?),
                7 => text.style = pair.value.clone(),
                72 => text.horizontal_alignment = TextHorizontalAlignment::from_value(pair.as_i16()?),
                73 => text.vertical_alignment = TextVerticalAlignment::from_value(pair.as_i16()?),
                _ => {}
            }
        }
        text.alignment_point = alignment_point.unwrap_or(text.base_point);
        Ok(text.into())
    }

    /// Text and tag fields shared by ATTDEF and ATTRIB; returns the prompt
    fn read_attribute_fields(&mut self, text: &mut AttributeText) -> Result<String> {
        let mut prompt = String::new();
        let mut alignment_point = None;
        let mut tagged = false;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => text.base_point = self.point(&pair)?,
                11 => alignment_point = Some(self.point(&pair)?),
                40 => text.height = pair.as_double()?,
                1 => text.value = pair.value.clone(),
                50 => text.rotation = pair.as_double()?,
                7 => text.style = pair.value.clone(),
                72 => text.horizontal_alignment = TextHorizontalAlignment::from_value(pair.as_i16()?),
                74 => text.vertical_alignment = TextVerticalAlignment::from_value(pair.as_i16()?),
                3 => prompt = pair.value.clone(),
                2 => {
                    text.tag = pair.value.clone();
                    tagged = true;
                }
                70 => text.flags = AttributeFlags::from_bits_truncate(pair.as_i16()?),
                // Before the tag 280 is the record version
                280 if tagged => text.duplicate_flag = pair.as_i16()?,
                _ => {}
            }
        }
        text.alignment_point = alignment_point.unwrap_or(text.base_point);
        Ok(prompt)
    }

    fn read_attribute_definition(&mut self) -> Result<EntityType> {
        let mut definition = AttributeDefinition::new();
        self.read_common(&mut definition.common)?;
        definition.prompt = self.read_attribute_fields(&mut definition.text)?;
        Ok(definition.into())
    }

    fn read_insert(&mut self) -> Result<EntityType> {
        let mut insert = Insert::new("", Vector2::ZERO);
        self.read_common(&mut insert.common)?;
        let mut has_attributes = false;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                66 => has_attributes = pair.as_bool()?,
                2 => insert.block_name = pair.value.clone(),
                10 => insert.insert_point = self.point(&pair)?,
                41 => insert.x_scale = pair.as_double()?,
                42 => insert.y_scale = pair.as_double()?,
                43 => insert.z_scale = pair.as_double()?,
                50 => insert.rotation = pair.as_double()?,
                _ => {}
            }
        }
        if !has_attributes {
            return Ok(insert.into());
        }

        loop {
            let Some(next) = self.peek()? else {
                break;
            };
            if next.is(0, "ATTRIB") {
                self.raw_pair()?;
                let mut attribute = AttributeEntity::new();
                self.read_common(&mut attribute.common)?;
                self.read_attribute_fields(&mut attribute.text)?;
                insert.attributes.push(attribute);
            } else if next.is(0, "SEQEND") {
                self.raw_pair()?;
                insert.seqend_handle = self.skip_owned_record()?;
                break;
            } else {
                tracing::debug!(handle = %insert.common.handle, "attribute list without SEQEND");
                break;
            }
        }
        Ok(insert.into())
    }

    // ------------------------------------------------------------------
    // Annotation
    // ------------------------------------------------------------------

    fn read_dimension(&mut self) -> Result<EntityType> {
        let mut common = EntityCommon::new();
        self.read_common(&mut common)?;
        let owner = common.handle;

        let mut type_code = None;
        let (mut p13, mut p14, mut p15) = (Vector2::ZERO, Vector2::ZERO, Vector2::ZERO);
        let mut leader_length = 0.0;
        let mut rotation = 0.0;
        // Geometry is filled in once the type is known
        let mut dim = Dimension::new(DimensionKind::Radial {
            chord_point: Vector2::ZERO,
            leader_length: 0.0,
        });
        let mut references = Vec::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                2 => dim.block_name = pair.value.clone(),
                10 => dim.definition_point = self.point(&pair)?,
                11 => dim.text_position = self.point(&pair)?,
                1 => dim.overrides.text = Some(pair.value.clone()),
                3 => dim.style_name = pair.value.clone(),
                53 => dim.text_rotation = Some(pair.as_double()?),
                70 => type_code = Some(pair.as_i16()?),
                71 => dim.attachment = AttachmentPoint::from_value(pair.as_i16()?),
                13 => p13 = self.point(&pair)?,
                14 => p14 = self.point(&pair)?,
                15 => p15 = self.point(&pair)?,
                40 => leader_length = pair.as_double()?,
                50 => rotation = pair.as_double()?,
                1001 => {
                    let record = self.read_xdata(&pair)?;
                    references.extend(apply_dimension_overrides(&record, &mut dim.overrides));
                }
                _ => {}
            }
        }

        let code = type_code.ok_or_else(|| DxfError::Parse("dimension without a type (group code 70)".to_string()))?;
        let mut kind = DimensionKind::from_type_code(code)
            .ok_or_else(|| DxfError::Parse(format!("unknown dimension type {}", code & 0x0F)))?;
        match &mut kind {
            DimensionKind::Rotated { ext_line1_point, ext_line2_point, rotation: angle }
            | DimensionKind::Aligned { ext_line1_point, ext_line2_point, rotation: angle } => {
                *ext_line1_point = p13;
                *ext_line2_point = p14;
                *angle = rotation;
            }
            DimensionKind::Angular2Line { first_start, first_end, second_start } => {
                *first_start = p13;
                *first_end = p14;
                *second_start = p15;
            }
            DimensionKind::Diametric { chord_point, leader_length: length }
            | DimensionKind::Radial { chord_point, leader_length: length } => {
                *chord_point = p15;
                *length = leader_length;
            }
            DimensionKind::Angular3Point { first_end, second_end, angle_vertex } => {
                *first_end = p13;
                *second_end = p14;
                *angle_vertex = p15;
            }
            DimensionKind::Ordinate { feature_point, leader_end_point, .. } => {
                *feature_point = p13;
                *leader_end_point = p14;
            }
        }
        dim.kind = kind;
        dim.common = common;
        narrow_zero_suppression(&mut dim, &self.document);

        for reference in references {
            self.link(owner, EntityLink::DimensionOverride(reference));
        }
        Ok(dim.into())
    }

    fn read_leader(&mut self) -> Result<EntityType> {
        let mut leader = Leader::new();
        // Zero inherits the style; only an override record sets it
        leader.arrow_size = 0.0;
        self.read_common(&mut leader.common)?;
        let owner = leader.common.handle;
        let (mut has_arrow, mut is_spline) = (true, false);
        while let Some(pair) = self.next_field()? {
            match pair.code {
                3 => leader.style_name = pair.value.clone(),
                71 => has_arrow = pair.as_bool()?,
                72 => is_spline = pair.as_bool()?,
                74 => leader.baseline_direction = pair.as_bool()?,
                75 => leader.has_baseline = pair.as_bool()?,
                40 => leader.char_height = pair.as_double()?,
                41 => leader.text_width = pair.as_double()?,
                10 => leader.vertices.push(self.point(&pair)?),
                340 => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::Annotation(target));
                }
                1001 => {
                    let record = self.read_xdata(&pair)?;
                    for (code, value) in record.dstyle_pairs() {
                        if let (41, XDataValue::Real(size)) = (code, value) {
                            leader.arrow_size = size;
                        }
                    }
                }
                _ => {}
            }
        }
        leader.path_type = LeaderPathType::from_flags(has_arrow, is_spline);
        Ok(leader.into())
    }

    fn read_multileader(&mut self) -> Result<EntityType> {
        let mut leader = MultiLeader::new();
        self.read_common(&mut leader.common)?;
        let owner = leader.common.handle;
        let mut section = LeaderSection::Head;
        let mut line = Vec::new();

        while let Some(pair) = self.next_field()? {
            match (section, pair.code) {
                (LeaderSection::Head, 300) => section = LeaderSection::Context,

                (LeaderSection::Context, 10) => leader.context.landing_position = self.point(&pair)?,
                (LeaderSection::Context, 41) => leader.context.text_height = pair.as_double()?,
                (LeaderSection::Context, 140) => leader.context.arrow_size = pair.as_double()?,
                (LeaderSection::Context, 145) => leader.context.landing_gap = pair.as_double()?,
                (LeaderSection::Context, 290) => {
                    if pair.as_bool()? {
                        leader.context.content = Some(MultiLeaderContent::MText(MTextContent::new("", Vector2::ZERO)));
                    }
                }
                (LeaderSection::Context, 296) => {
                    if pair.as_bool()? {
                        leader.context.content = Some(MultiLeaderContent::Block(BlockContent::new("", Vector2::ZERO)));
                    }
                }
                (LeaderSection::Context, 302) => section = LeaderSection::Branch,
                (LeaderSection::Context, 301) => section = LeaderSection::Trailer,
                (LeaderSection::Context, code) => self.read_mleader_content(&mut leader, owner, code, &pair)?,

                (LeaderSection::Branch, 10) => leader.context.leader.common_point = self.point(&pair)?,
                (LeaderSection::Branch, 40) => leader.context.leader.dogleg_length = pair.as_double()?,
                (LeaderSection::Branch, 304) => {
                    line = Vec::new();
                    section = LeaderSection::Line;
                }
                (LeaderSection::Branch, 303) => section = LeaderSection::Context,

                (LeaderSection::Line, 10) => line.push(self.point(&pair)?),
                (LeaderSection::Line, 305) => {
                    leader.context.leader.lines.push(std::mem::take(&mut line));
                    section = LeaderSection::Branch;
                }

                (LeaderSection::Trailer, 340) => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::MultiLeaderStyle(target));
                }
                (LeaderSection::Trailer, 170) => leader.path_type = pair.as_i16()?.into(),
                (LeaderSection::Trailer, 341) => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::MultiLeaderLineType(target));
                }
                (LeaderSection::Trailer, 171) => leader.leader_line_weight = LineWeight::from_value(pair.as_i16()?),
                (LeaderSection::Trailer, 290) => leader.enable_landing = pair.as_bool()?,
                (LeaderSection::Trailer, 291) => leader.enable_dogleg = pair.as_bool()?,
                (LeaderSection::Trailer, 330) => {
                    let target = pair.as_handle()?;
                    let index = leader.attribute_definitions.len();
                    leader.attribute_definitions.push(Handle::NULL);
                    self.link(owner, EntityLink::MultiLeaderAttribute { index, target });
                }
                (LeaderSection::Trailer, 302) => leader.attribute_values.push(pair.value.clone()),
                _ => {}
            }
        }

        if section != LeaderSection::Trailer {
            tracing::debug!(handle = %owner, ?section, "multileader ended inside its context data");
        }
        Ok(leader.into())
    }

    /// Content fields of the context data: text or block, whichever was opened
    fn read_mleader_content(&mut self, leader: &mut MultiLeader, owner: Handle, code: i32, pair: &DxfCodePair) -> Result<()> {
        match &mut leader.context.content {
            Some(MultiLeaderContent::MText(text)) => match code {
                304 => text.text = pair.value.clone(),
                340 => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::MultiLeaderTextStyle(target));
                }
                12 => text.location = self.point(pair)?,
                42 => text.rotation = pair.as_double()?,
                43 => text.width = pair.as_double()?,
                90 => text.color = color_of(pair.as_i32()?),
                171 => text.attachment = AttachmentPoint::from_value(pair.as_i16()?),
                _ => {}
            },
            Some(MultiLeaderContent::Block(block)) => match code {
                341 => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::MultiLeaderBlock(target));
                }
                15 => block.position = self.point(pair)?,
                16 => block.scale = self.point(pair)?,
                46 => block.rotation = pair.as_double()?,
                93 => block.color = color_of(pair.as_i32()?),
                _ => {}
            },
            None => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // HATCH
    // ------------------------------------------------------------------

    fn read_hatch(&mut self) -> Result<EntityType> {
        let mut hatch = Hatch::new();
        self.read_common(&mut hatch.common)?;
        let owner = hatch.common.handle;
        let mut loops = Vec::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                // The style suffix (",_O", ",_I") is carried by group 75 as well
                2 => {
                    let name = pair.value.split(',').next().unwrap_or_default();
                    hatch.pattern_name = name.trim().to_string();
                }
                70 => hatch.solid_fill = pair.as_bool()?,
                91 => {
                    for index in 0..count_of(&pair)? {
                        loops.push(self.read_boundary_loop(owner, index)?);
                    }
                }
                75 => hatch.style = HatchStyle::from_value(pair.as_i16()?),
                76 => hatch.pattern_type = HatchPatternType::from_value(pair.as_i16()?),
                52 => hatch.pattern_angle = pair.as_double()?,
                41 => hatch.pattern_scale = pair.as_double()?,
                47 => hatch.pixel_size = pair.as_double()?,
                _ => {}
            }
        }

        let mut loops = loops.into_iter();
        if let Some(outer) = loops.next() {
            hatch.outer = outer;
        }
        hatch.inner = loops.collect();
        Ok(hatch.into())
    }

    fn read_boundary_loop(&mut self, owner: Handle, index: usize) -> Result<BoundaryLoop> {
        let flags = BoundaryPathFlags::from_bits_truncate(self.expect_code(92)?.as_i32()?);
        let mut boundary = BoundaryLoop::new(flags);

        if flags.contains(BoundaryPathFlags::POLYLINE) {
            let has_bulges = self.expect_code(72)?.as_bool()?;
            let mut pline = LwPolyline::new();
            pline.is_closed = self.expect_code(73)?.as_bool()?;
            let vertex_count = count_of(&self.expect_code(93)?)?;
            let mut bulges = Vec::new();
            for _ in 0..vertex_count {
                pline.vertices.push(self.expect_point(10)?);
                bulges.push(match self.optional_field(42)? {
                    Some(bulge) => bulge.as_double()?,
                    None => 0.0,
                });
            }
            if has_bulges || bulges.iter().any(|b| *b != 0.0) {
                pline.set_bulges(bulges);
            }
            boundary.path = BoundaryPath::Polyline(pline);
        } else {
            let edge_count = count_of(&self.expect_code(93)?)?;
            let mut edges = Vec::new();
            for _ in 0..edge_count {
                edges.push(self.read_boundary_edge()?);
            }
            boundary.path = BoundaryPath::Edges(edges);
        }

        if let Some(pair) = self.optional_field(97)? {
            for _ in 0..count_of(&pair)? {
                let target = self.expect_code(330)?.as_handle()?;
                self.link(owner, EntityLink::HatchAssociated { loop_index: index, target });
            }
        }
        Ok(boundary)
    }

    fn read_boundary_edge(&mut self) -> Result<BoundaryEdge> {
        let kind = self.expect_code(72)?;
        let edge = match kind.as_i16()? {
            1 => {
                let mut line = Line::new();
                line.start = self.expect_point(10)?;
                line.end = self.expect_point(11)?;
                BoundaryEdge::Line(line)
            }
            2 => {
                let mut arc = Arc::new();
                arc.center = self.expect_point(10)?;
                arc.radius = self.expect_code(40)?.as_double()?;
                arc.start_angle = self.expect_code(50)?.as_double()?;
                arc.end_angle = self.expect_code(51)?.as_double()?;
                self.optional_field(73)?;
                BoundaryEdge::Arc(arc)
            }
            3 => {
                let mut ellipse = Ellipse::new();
                ellipse.center = self.expect_point(10)?;
                ellipse.major_axis = self.expect_point(11)?;
                ellipse.minor_axis_ratio = self.expect_code(40)?.as_double()?;
                // Edge parameters are stored in degrees
                ellipse.start_parameter = self.expect_code(50)?.as_double()?.to_radians();
                ellipse.end_parameter = self.expect_code(51)?.as_double()?.to_radians();
                self.optional_field(73)?;
                BoundaryEdge::Ellipse(ellipse)
            }
            4 => BoundaryEdge::Spline(self.read_spline_edge()?),
            other => {
                return Err(DxfError::Parse(format!(
                    "line {}: unknown hatch edge type {}",
                    kind.line, other
                )))
            }
        };
        Ok(edge)
    }

    fn read_spline_edge(&mut self) -> Result<Spline> {
        let mut spline = Spline::new();
        spline.degree = self.expect_code(94)?.as_i32()?;
        let rational = self.expect_code(73)?.as_bool()?;
        let periodic = self.expect_code(74)?.as_bool()?;
        spline.flags.set(SplineFlags::RATIONAL, rational);
        spline.flags.set(SplineFlags::PERIODIC, periodic);
        let knot_count = count_of(&self.expect_code(95)?)?;
        let control_count = count_of(&self.expect_code(96)?)?;
        for _ in 0..knot_count {
            spline.knots.push(self.expect_code(40)?.as_double()?);
        }
        for _ in 0..control_count {
            spline.control_points.push(self.expect_point(10)?);
            if let Some(weight) = self.optional_field(42)? {
                spline.weights.push(weight.as_double()?);
            }
        }
        if let Some(pair) = self.optional_field(97)? {
            for _ in 0..count_of(&pair)? {
                spline.fit_points.push(self.expect_point(11)?);
            }
            if let Some(pair) = self.optional_field(12)? {
                spline.start_tangent = self.point(&pair)?;
            }
            if let Some(pair) = self.optional_field(13)? {
                spline.end_tangent = self.point(&pair)?;
            }
        }
        Ok(spline)
    }

    // ------------------------------------------------------------------
    // ACAD_TABLE
    // ------------------------------------------------------------------

    fn read_acad_table(&mut self) -> Result<EntityType> {
        let mut table = Table::new(Vector2::ZERO);
        self.read_common(&mut table.common)?;
        let owner = table.common.handle;
        let mut section = TableSection::Header;

        while let Some(pair) = self.next_field()? {
            if pair.code == 171 {
                let kind = CellKind::from_value(pair.as_i16()?).unwrap_or(CellKind::Text);
                table.cells.push(Cell::new(kind));
                section = TableSection::Cell { value: false };
                continue;
            }
            let index = table.cells.len().saturating_sub(1);
            match section {
                TableSection::Header => match pair.code {
                    2 => table.block_name = pair.value.clone(),
                    10 => table.insertion_point = self.point(&pair)?,
                    342 => {
                        let target = pair.as_handle()?;
                        self.link(owner, EntityLink::TableStyle(target));
                    }
                    91 => table.row_count = count_of(&pair)?,
                    92 => table.column_count = count_of(&pair)?,
                    141 => table.row_heights.push(pair.as_double()?),
                    142 => table.column_widths.push(pair.as_double()?),
                    _ => {}
                },
                TableSection::Cell { value: false } => {
                    if pair.code == 301 {
                        section = TableSection::Cell { value: true };
                        continue;
                    }
                    if let Some(cell) = table.cells.last_mut() {
                        if let Some(link) = read_cell_property(cell, index, &pair)? {
                            self.link(owner, link);
                        }
                    }
                }
                TableSection::Cell { value: true } => {
                    if pair.code == 304 {
                        section = TableSection::Trailer;
                        continue;
                    }
                    if let Some(cell) = table.cells.last_mut() {
                        read_cell_value(cell, &pair)?;
                    }
                }
                TableSection::Trailer => match pair.code {
                    40 => table.horizontal_margin = pair.as_double()?,
                    41 => table.vertical_margin = pair.as_double()?,
                    288 => table.borders.left = false,
                    285 => table.borders.right = false,
                    289 => table.borders.top = false,
                    286 => table.borders.bottom = false,
                    _ => {}
                },
            }
        }

        if let Some(reason) = table.invalid_reason() {
            tracing::debug!(
                handle = %owner,
                cells = table.cells.len(),
                rows = table.row_count,
                columns = table.column_count,
                reason,
                "table grid is incomplete"
            );
        }
        Ok(table.into())
    }

    fn read_viewport(&mut self) -> Result<EntityType> {
        let mut viewport = Viewport::new();
        // Only an explicit 67 places the record in paper space
        viewport.common.paperspace = false;
        self.read_common(&mut viewport.common)?;
        let owner = viewport.common.handle;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                10 => viewport.center = self.point(&pair)?,
                40 => viewport.width = pair.as_double()?,
                41 => viewport.height = pair.as_double()?,
                12 => viewport.view_center = self.point(&pair)?,
                45 => viewport.view_height = pair.as_double()?,
                51 => viewport.twist_angle = pair.as_double()?,
                90 => viewport.locked = pair.as_i32()? & status::LOCKED != 0,
                340 => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::ClipEntity(target));
                }
                _ => {}
            }
        }
        Ok(viewport.into())
    }
}

/// One cell property field; handle references come back as links
fn read_cell_property(cell: &mut Cell, index: usize, pair: &DxfCodePair) -> Result<Option<EntityLink>> {
    match pair.code {
        172 => cell.flag = pair.as_i32()?,
        173 => cell.merged = pair.as_bool()?,
        174 => cell.auto_fit = pair.as_bool()?,
        175 => cell.column_span = pair.as_i32()?,
        176 => cell.row_span = pair.as_i32()?,
        91 => cell.override_flag = pair.as_i32()?,
        178 => cell.virtual_edge_flag = pair.as_i32()?,
        145 => cell.rotation = pair.as_double()?,
        170 => cell.alignment = pair.as_i16()?.into(),
        63 => cell.background_color = Color::from_index(pair.as_i16()?),
        64 => cell.text_color = Color::from_index(pair.as_i16()?),
        283 => cell.background_enabled = pair.as_bool()?,
        140 => cell.text_height = pair.as_double()?,
        340 => {
            let target = pair.as_handle()?;
            return Ok(Some(EntityLink::CellBlock { cell: index, target }));
        }
        144 | 331 | 300 => {
            let CellContent::Block(block) = &mut cell.content else {
                return Ok(None);
            };
            match pair.code {
                144 => block.scale = pair.as_double()?,
                331 => {
                    let target = pair.as_handle()?;
                    let slot = block.attribute_definitions.len();
                    block.attribute_definitions.push(Handle::NULL);
                    return Ok(Some(EntityLink::CellAttribute { cell: index, index: slot, target }));
                }
                _ => block.attribute_values.push(pair.value.clone()),
            }
        }
        _ => {}
    }
    Ok(None)
}

/// One field of a cell's value record
fn read_cell_value(cell: &mut Cell, pair: &DxfCodePair) -> Result<()> {
    match pair.code {
        93 => cell.value_flags = pair.as_i32()?,
        90 => cell.value_data_type = pair.as_i32()?,
        91 => cell.value_override_flag = pair.as_i32()?,
        288 => cell.borders.left = false,
        285 => cell.borders.right = false,
        289 => cell.borders.top = false,
        286 => cell.borders.bottom = false,
        // The text is repeated under 303/302; the 2/1 copy is kept
        2 | 1 | 7 => {
            if let CellContent::Text(text) = &mut cell.content {
                match pair.code {
                    7 => text.style = pair.value.clone(),
                    _ => text.text.push_str(&pair.value),
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CadDocument;
    use crate::io::dxf::reader::{DxfReaderConfiguration, DxfTextReader};

    fn body(pairs: &[(i32, &str)]) -> Vec<u8> {
        let mut text = String::new();
        for (code, value) in pairs {
            text.push_str(&format!("{}\n{}\n", code, value));
        }
        text.into_bytes()
    }

    /// Read `pairs` as the content of the ENTITIES section
    fn read_entities(pairs: &[(i32, &str)]) -> CadDocument {
        let mut all = vec![
            (0, "SECTION"),
            (2, "HEADER"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "TABLES"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "BLOCKS"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "ENTITIES"),
        ];
        all.extend_from_slice(pairs);
        all.extend_from_slice(&[(0, "ENDSEC"), (0, "EOF")]);
        let mut reader = DxfTextReader::new(body(&all));
        SectionReader::new(&mut reader, DxfReaderConfiguration::default())
            .read()
            .unwrap()
    }

    fn only(doc: &CadDocument) -> &EntityType {
        assert_eq!(doc.model_space.len(), 1);
        doc.model_space.iter().next().unwrap()
    }

    #[test]
    fn test_lwpolyline_keeps_sparse_widths() {
        let doc = read_entities(&[
            (0, "LWPOLYLINE"),
            (5, "A0"),
            (100, "AcDbEntity"),
            (8, "0"),
            (100, "AcDbPolyline"),
            (90, "2"),
            (70, "129"),
            (10, "0"),
            (20, "0"),
            (40, "0"),
            (41, "0"),
            (42, "1"),
            (10, "2"),
            (20, "0"),
            (40, "0"),
            (41, "0"),
            (42, "1"),
        ]);
        let EntityType::LwPolyline(pline) = only(&doc) else {
            panic!("expected a polyline");
        };
        assert!(pline.is_closed);
        assert_eq!(pline.vertices.len(), 2);
        assert!(pline.start_widths.is_empty());
        assert_eq!(pline.bulges, vec![1.0, 1.0]);
    }

    #[test]
    fn test_mtext_rotation_from_direction() {
        let doc = read_entities(&[
            (0, "MTEXT"),
            (5, "A1"),
            (100, "AcDbMText"),
            (10, "1"),
            (20, "2"),
            (3, "first "),
            (1, "second"),
            (11, "0"),
            (21, "1"),
            (73, "1"),
            (44, "1.5"),
        ]);
        let EntityType::MText(mtext) = only(&doc) else {
            panic!("expected mtext");
        };
        assert_eq!(mtext.value, "first second");
        assert!((mtext.rotation - 90.0).abs() < 1e-9);
        assert_eq!(mtext.line_spacing_factor, 0.0);
    }

    #[test]
    fn test_text_alignment_defaults_to_base_point() {
        let doc = read_entities(&[(0, "TEXT"), (5, "A2"), (10, "3"), (20, "4"), (1, "hello")]);
        let EntityType::Text(text) = only(&doc) else {
            panic!("expected text");
        };
        assert_eq!(text.alignment_point, Vector2::new(3.0, 4.0));
        assert_eq!(text.oblique_angle, None);
    }

    #[test]
    fn test_insert_with_attributes() {
        let doc = read_entities(&[
            (0, "INSERT"),
            (5, "B0"),
            (100, "AcDbBlockReference"),
            (66, "1"),
            (2, "TAG_BLOCK"),
            (10, "5"),
            (20, "5"),
            (0, "ATTRIB"),
            (5, "B1"),
            (330, "B0"),
            (100, "AcDbEntity"),
            (8, "0"),
            (100, "AcDbText"),
            (10, "5"),
            (20, "5"),
            (40, "2.5"),
            (1, "42"),
            (100, "AcDbAttribute"),
            (280, "0"),
            (2, "NUMBER"),
            (70, "0"),
            (280, "1"),
            (0, "SEQEND"),
            (5, "B2"),
            (330, "B0"),
        ]);
        let EntityType::Insert(insert) = only(&doc) else {
            panic!("expected insert");
        };
        assert_eq!(insert.block_name, "TAG_BLOCK");
        assert_eq!(insert.attributes.len(), 1);
        assert_eq!(insert.attributes[0].tag(), "NUMBER");
        assert_eq!(insert.attributes[0].value(), "42");
        assert_eq!(insert.seqend_handle, Handle::new(0xB2));
    }

    #[test]
    fn test_dimension_geometry_and_overrides() {
        let doc = read_entities(&[
            (0, "DIMENSION"),
            (5, "C0"),
            (100, "AcDbDimension"),
            (10, "0"),
            (20, "5"),
            (11, "5"),
            (21, "6"),
            (3, "ISO-25"),
            (70, "32"),
            (100, "AcDbAlignedDimension"),
            (13, "0"),
            (23, "0"),
            (14, "10"),
            (24, "0"),
            (50, "0"),
            (100, "AcDbRotatedDimension"),
            (1001, "ACAD"),
            (1000, "DSTYLE"),
            (1002, "{"),
            (1070, "140"),
            (1040, "3.5"),
            (1002, "}"),
        ]);
        let EntityType::Dimension(dim) = only(&doc) else {
            panic!("expected dimension");
        };
        assert!(matches!(
            dim.kind,
            DimensionKind::Rotated { ext_line2_point, .. } if ext_line2_point == Vector2::new(10.0, 0.0)
        ));
        assert_eq!(dim.overrides.text_height, Some(3.5));
    }

    #[test]
    fn test_hatch_edges_and_forward_association() {
        let doc = read_entities(&[
            (0, "HATCH"),
            (5, "D0"),
            (100, "AcDbHatch"),
            (2, "SOLID"),
            (70, "1"),
            (71, "1"),
            (91, "1"),
            (92, "1"),
            (93, "2"),
            (72, "1"),
            (10, "0"),
            (20, "0"),
            (11, "1"),
            (21, "0"),
            (72, "3"),
            (10, "0"),
            (20, "0"),
            (11, "2"),
            (21, "0"),
            (40, "0.5"),
            (50, "0"),
            (51, "180"),
            (73, "1"),
            (97, "1"),
            (330, "D1"),
            (75, "0"),
            (76, "1"),
            (0, "CIRCLE"),
            (5, "D1"),
            (10, "0"),
            (20, "0"),
            (40, "1"),
        ]);
        let Some(EntityType::Hatch(hatch)) = doc.entity(Handle::new(0xD0)) else {
            panic!("expected hatch");
        };
        assert!(hatch.solid_fill);
        assert_eq!(hatch.outer.associated, vec![Handle::new(0xD1)]);
        let BoundaryPath::Edges(edges) = &hatch.outer.path else {
            panic!("expected edges");
        };
        let BoundaryEdge::Ellipse(ellipse) = &edges[1] else {
            panic!("expected an ellipse edge");
        };
        assert!((ellipse.end_parameter - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_hatch_edge_is_an_error() {
        let pairs = [
            (0, "SECTION"),
            (2, "HEADER"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "TABLES"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "BLOCKS"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "ENTITIES"),
            (0, "HATCH"),
            (5, "E0"),
            (91, "1"),
            (92, "0"),
            (93, "1"),
            (72, "9"),
            (0, "ENDSEC"),
            (0, "EOF"),
        ];
        let mut reader = DxfTextReader::new(body(&pairs));
        let result = SectionReader::new(&mut reader, DxfReaderConfiguration::default()).read();
        assert!(matches!(result, Err(DxfError::Parse(message)) if message.contains("edge type")));
    }

    #[test]
    fn test_oversized_boundary_count_fails_the_load() {
        let pairs = [
            (0, "SECTION"),
            (2, "HEADER"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "TABLES"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "BLOCKS"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "ENTITIES"),
            (0, "HATCH"),
            (5, "E0"),
            (91, "1"),
            (92, "0"),
            (93, "2147483647"),
            (72, "1"),
            (10, "0"),
            (20, "0"),
            (11, "1"),
            (21, "1"),
            (0, "POINT"),
            (5, "E1"),
            (10, "2"),
            (20, "2"),
            (0, "ENDSEC"),
            (0, "EOF"),
        ];
        let mut reader = DxfTextReader::new(body(&pairs));
        let result = SectionReader::new(&mut reader, DxfReaderConfiguration::default()).read();
        assert!(matches!(result, Err(DxfError::Parse(_))));

        // Failsafe drops the hatch and keeps reading
        let mut reader = DxfTextReader::new(body(&pairs));
        let config = DxfReaderConfiguration::default().with_failsafe(true);
        let doc = SectionReader::new(&mut reader, config).read().unwrap();
        assert!(matches!(only(&doc), EntityType::Point(_)));
    }

    #[test]
    fn test_oversized_polyline_loop_count_fails_the_load() {
        let mut reader = DxfTextReader::new(body(&[
            (0, "SECTION"),
            (2, "HEADER"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "TABLES"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "BLOCKS"),
            (0, "ENDSEC"),
            (0, "SECTION"),
            (2, "ENTITIES"),
            (0, "HATCH"),
            (5, "E0"),
            (91, "1"),
            (92, "2"),
            (72, "0"),
            (73, "1"),
            (93, "2147483647"),
            (10, "0"),
            (20, "0"),
            (0, "ENDSEC"),
            (0, "EOF"),
        ]));
        let result = SectionReader::new(&mut reader, DxfReaderConfiguration::default()).read();
        assert!(result.is_err());
    }

    #[test]
    fn test_viewport_clip_link_is_dropped_when_dangling() {
        let doc = read_entities(&[
            (0, "VIEWPORT"),
            (5, "F0"),
            (100, "AcDbViewport"),
            (10, "1"),
            (20, "1"),
            (90, "16384"),
            (340, "FFFF"),
        ]);
        let EntityType::Viewport(viewport) = only(&doc) else {
            panic!("expected viewport");
        };
        assert!(viewport.locked);
        assert_eq!(viewport.clip_entity, None);
        assert!(!doc.notifications.is_empty());
    }

    #[test]
    fn test_multileader_text_content() {
        let doc = read_entities(&[
            (0, "MULTILEADER"),
            (5, "110"),
            (100, "AcDbMLeader"),
            (270, "2"),
            (300, "CONTEXT_DATA{"),
            (40, "1.0"),
            (10, "5"),
            (20, "5"),
            (41, "2.5"),
            (290, "1"),
            (304, "Note"),
            (12, "6"),
            (22, "5"),
            (42, "0.5"),
            (302, "LEADER{"),
            (10, "5"),
            (20, "5"),
            (40, "1.5"),
            (304, "LEADER_LINE{"),
            (10, "0"),
            (20, "0"),
            (10, "4"),
            (20, "4"),
            (305, "}"),
            (303, "}"),
            (301, "}"),
            (170, "2"),
            (290, "0"),
        ]);
        let EntityType::MultiLeader(leader) = only(&doc) else {
            panic!("expected multileader");
        };
        let text = leader.text_content().unwrap();
        assert_eq!(text.text, "Note");
        assert_eq!(text.location, Vector2::new(6.0, 5.0));
        assert_eq!(leader.context.leader.lines, vec![vec![Vector2::ZERO, Vector2::new(4.0, 4.0)]]);
        assert_eq!(leader.context.leader.dogleg_length, 1.5);
        assert!(!leader.enable_landing);
    }

    #[test]
    fn test_table_cells() {
        let doc = read_entities(&[
            (0, "ACAD_TABLE"),
            (5, "120"),
            (160, "3512"),
            (100, "AcDbBlockReference"),
            (10, "0"),
            (20, "0"),
            (100, "AcDbTable"),
            (91, "1"),
            (92, "2"),
            (141, "10"),
            (142, "30"),
            (142, "40"),
            (171, "1"),
            (175, "1"),
            (91, "32"),
            (301, "CELL_VALUE"),
            (93, "6"),
            (1, "A1"),
            (303, "A1"),
            (288, "0.0"),
            (304, "ACVALUE_END"),
            (171, "2"),
            (144, "2"),
            (301, "CELL_VALUE"),
            (304, "ACVALUE_END"),
            (40, "1.5"),
        ]);
        let EntityType::Table(table) = only(&doc) else {
            panic!("expected table");
        };
        assert_eq!((table.row_count, table.column_count), (1, 2));
        assert_eq!(table.cells.len(), 2);
        assert_eq!(table.cells[0].override_flag, 32);
        assert!(matches!(&table.cells[0].content, CellContent::Text(t) if t.text == "A1"));
        assert!(!table.cells[0].borders.left);
        assert!(matches!(&table.cells[1].content, CellContent::Block(b) if b.scale == 2.0));
        assert_eq!(table.horizontal_margin, 1.5);
    }

    #[test]
    fn test_count_of_rejects_negative() {
        assert!(count_of(&DxfCodePair::new(93, "-1", 1)).is_err());
        assert_eq!(count_of(&DxfCodePair::new(93, "3", 1)).unwrap(), 3);
    }
}
