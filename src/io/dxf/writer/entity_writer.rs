//! Entity encoders
//!
//! Each entity kind is written as its common prefix (handle, reactors, owner,
//! layer and the non-default display properties) followed by its own
//! subclass payload. Entities that cannot be encoded are skipped with a
//! warning; the rest of the document is still written.

use crate::entities::{
    Arc, AttributeDefinition, AttributeEntity, AttributeText, BlockContent, Borders, BoundaryEdge, BoundaryLoop, BoundaryPath,
    BoundaryPathFlags, Cell, CellAlignment, CellContent, CellText, Circle, Dimension, DimensionKind, Ellipse,
    EntityCommon, EntityType, Hatch, Insert, Leader, LeaderBranch, Line, LwPolyline, MText, MTextContent, MultiLeader,
    MultiLeaderContent, Point, Polyline, Solid, Spline, Table, Text, Viewport, XLine,
};
use crate::error::Result;
use crate::types::{Color, Handle, LineWeight, Vector2};

use super::super::xdata::{dimension_overrides, leader_arrow_size};
use super::section_writer::{count, write_ucs_axes, SectionWriter};
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};

/// Background color value meaning "no background"
const NO_BACKGROUND: i32 = -1_073_741_824;
/// Multileader color meaning "by block"
const MLEADER_BY_BLOCK: i32 = -1_056_964_608;

impl<W: DxfStreamWriter> SectionWriter<'_, W> {
    /// Write one entity in the current owner context
    pub(super) fn write_entity(&mut self, entity: &EntityType) -> Result<()> {
        match entity {
            EntityType::Line(e) => self.write_line(e),
            EntityType::Circle(e) => self.write_circle(e),
            EntityType::Arc(e) => self.write_arc(e),
            EntityType::Ellipse(e) => self.write_ellipse(e),
            EntityType::Point(e) => self.write_point(e),
            EntityType::Solid(e) => self.write_solid(e),
            EntityType::Spline(e) => self.write_spline(e),
            EntityType::LwPolyline(e) => self.write_lwpolyline(e),
            EntityType::Polyline(e) => self.write_polyline(e),
            EntityType::MText(e) => self.write_mtext(e),
            EntityType::Text(e) => self.write_text(e),
            EntityType::Insert(e) => self.write_insert(e),
            EntityType::AttributeDefinition(e) => self.write_attribute_definition(e),
            EntityType::Dimension(e) => self.write_dimension(e),
            EntityType::Leader(e) => self.write_leader(e),
            EntityType::MultiLeader(e) => self.write_multileader(e),
            EntityType::Hatch(e) => self.write_hatch(e),
            EntityType::Table(e) => self.write_table(e),
            EntityType::Viewport(e) => self.write_viewport(e),
            EntityType::XLine(e) => self.write_xline(e),
        }
    }

    fn skip(&mut self, entity: &str, handle: Handle, reason: &str) {
        tracing::warn!(handle = %handle, entity, reason, "skipping entity");
        self.notifications.warn(format!("{} {} skipped: {}", entity, handle, reason));
    }

    /// Entity keyword plus the common attribute prefix
    fn write_common(&mut self, kind: &str, common: &EntityCommon) -> Result<()> {
        let owner = self.owner;
        let paper_space = self.paper_space;
        let w = &mut *self.writer;
        w.write_entity_type(kind)?;
        w.write_handle(5, common.handle)?;
        if !common.reactors.is_empty() {
            w.write_reactors(&common.reactors)?;
        }
        w.write_handle(330, owner)?;
        w.write_subclass("AcDbEntity")?;
        if paper_space {
            w.write_i16(67, 1)?;
        }
        w.write_string(8, &common.layer)?;
        if !common.line_type.is_empty() && !common.line_type.eq_ignore_ascii_case("ByLayer") {
            w.write_string(6, &common.line_type)?;
        }
        if common.color != Color::ByLayer {
            w.write_color(62, common.color)?;
        }
        if common.line_weight != LineWeight::ByLayer {
            w.write_i16(370, common.line_weight.value())?;
        }
        if common.line_type_scale != 1.0 {
            w.write_double(48, common.line_type_scale)?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &Line) -> Result<()> {
        self.write_common("LINE", &line.common)?;
        self.writer.write_subclass("AcDbLine")?;
        self.writer.write_point2d(10, line.start)?;
        self.writer.write_point2d(11, line.end)
    }

    fn write_circle(&mut self, circle: &Circle) -> Result<()> {
        self.write_common("CIRCLE", &circle.common)?;
        self.writer.write_subclass("AcDbCircle")?;
        self.writer.write_point2d(10, circle.center)?;
        self.writer.write_double(40, circle.radius)
    }

    fn write_arc(&mut self, arc: &Arc) -> Result<()> {
        self.write_common("ARC", &arc.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbCircle")?;
        w.write_point2d(10, arc.center)?;
        w.write_double(40, arc.radius)?;
        w.write_subclass("AcDbArc")?;
        w.write_double(50, arc.start_angle)?;
        w.write_double(51, arc.end_angle)
    }

    fn write_ellipse(&mut self, ellipse: &Ellipse) -> Result<()> {
        self.write_common("ELLIPSE", &ellipse.common)?;
        let (axis, ratio, start, end) = ellipse.normalized();
        let w = &mut *self.writer;
        w.write_subclass("AcDbEllipse")?;
        w.write_point2d(10, ellipse.center)?;
        w.write_point2d(11, axis)?;
        w.write_double(40, ratio)?;
        w.write_double(41, start)?;
        w.write_double(42, end)
    }

    fn write_point(&mut self, point: &Point) -> Result<()> {
        self.write_common("POINT", &point.common)?;
        self.writer.write_subclass("AcDbPoint")?;
        self.writer.write_point2d(10, point.location)
    }

    fn write_solid(&mut self, solid: &Solid) -> Result<()> {
        self.write_common("SOLID", &solid.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbTrace")?;
        w.write_point2d(10, solid.first_corner)?;
        w.write_point2d(11, solid.second_corner)?;
        w.write_point2d(12, solid.third_corner)?;
        w.write_point2d(13, solid.fourth_corner)
    }

    fn write_xline(&mut self, xline: &XLine) -> Result<()> {
        self.write_common("XLINE", &xline.common)?;
        self.writer.write_subclass("AcDbXline")?;
        self.writer.write_point2d(10, xline.base_point)?;
        self.writer.write_point2d(11, xline.direction)
    }

    fn write_spline(&mut self, spline: &Spline) -> Result<()> {
        self.write_common("SPLINE", &spline.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbSpline")?;
        w.write_i16(70, spline.flags.bits())?;
        w.write_i32(71, spline.degree)?;
        w.write_i32(72, count(spline.knots.len()))?;
        w.write_i32(73, count(spline.control_points.len()))?;
        w.write_i32(74, count(spline.fit_points.len()))?;
        w.write_point2d(12, spline.start_tangent)?;
        w.write_point2d(13, spline.end_tangent)?;
        for knot in &spline.knots {
            w.write_double(40, *knot)?;
        }
        for weight in &spline.weights {
            w.write_double(41, *weight)?;
        }
        for point in &spline.control_points {
            w.write_point2d(10, *point)?;
        }
        for point in &spline.fit_points {
            w.write_point2d(11, *point)?;
        }
        Ok(())
    }

    fn write_lwpolyline(&mut self, pline: &LwPolyline) -> Result<()> {
        self.write_common("LWPOLYLINE", &pline.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbPolyline")?;
        w.write_i32(90, count(pline.vertices.len()))?;
        // 128: linetype generated across vertices
        w.write_i16(70, i16::from(pline.is_closed) | 128)?;
        if let Some(width) = pline.constant_width {
            w.write_double(43, width)?;
        }
        for (i, vertex) in pline.vertices.iter().enumerate() {
            w.write_point2d(10, *vertex)?;
            if pline.constant_width.is_none() {
                w.write_double(40, pline.start_width(i))?;
                w.write_double(41, pline.end_width(i))?;
            }
            let bulge = pline.bulge(i);
            if bulge != 0.0 {
                w.write_double(42, bulge)?;
            }
        }
        Ok(())
    }

    fn write_polyline(&mut self, pline: &Polyline) -> Result<()> {
        self.write_common("POLYLINE", &pline.common)?;
        {
            let w = &mut *self.writer;
            w.write_subclass("AcDb2dPolyline")?;
            w.write_i16(66, 1)?;
            w.write_point_z0(10, Vector2::ZERO)?;
            w.write_i16(70, pline.flags.bits())?;
            if pline.default_start_width != 0.0 {
                w.write_double(40, pline.default_start_width)?;
            }
            if pline.default_end_width != 0.0 {
                w.write_double(41, pline.default_end_width)?;
            }
        }
        let parent = pline.common.handle;
        for vertex in &pline.vertices {
            self.write_owned_head("VERTEX", vertex.handle, parent, &pline.common.layer)?;
            let w = &mut *self.writer;
            w.write_subclass("AcDbVertex")?;
            w.write_subclass("AcDb2dVertex")?;
            w.write_point2d(10, vertex.location)?;
            if vertex.start_width != 0.0 {
                w.write_double(40, vertex.start_width)?;
            }
            if vertex.end_width != 0.0 {
                w.write_double(41, vertex.end_width)?;
            }
            if vertex.bulge != 0.0 {
                w.write_double(42, vertex.bulge)?;
            }
            w.write_i16(70, 0)?;
        }
        self.write_owned_head("SEQEND", pline.seqend_handle, parent, &pline.common.layer)
    }

    /// Prefix of a record owned by another entity (VERTEX, ATTRIB, SEQEND)
    fn write_owned_head(&mut self, kind: &str, handle: Handle, parent: Handle, layer: &str) -> Result<()> {
        let paper_space = self.paper_space;
        let w = &mut *self.writer;
        w.write_entity_type(kind)?;
        w.write_handle(5, handle)?;
        w.write_handle(330, parent)?;
        w.write_subclass("AcDbEntity")?;
        if paper_space {
            w.write_i16(67, 1)?;
        }
        w.write_string(8, layer)
    }

    fn write_mtext(&mut self, mtext: &MText) -> Result<()> {
        self.write_common("MTEXT", &mtext.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbMText")?;
        w.write_point2d(10, mtext.insertion_point)?;
        if mtext.height != 0.0 {
            w.write_double(40, mtext.height)?;
        }
        w.write_double(41, mtext.rectangle_width)?;
        w.write_i16(71, mtext.attachment_point.value())?;
        w.write_i16(72, mtext.drawing_direction.value())?;
        w.write_text_chunks(3, 1, &mtext.value)?;
        if !mtext.style.is_empty() {
            w.write_string(7, &mtext.style)?;
        }
        let direction = Vector2::from_angle(mtext.rotation.to_radians());
        w.write_double(11, direction.x)?;
        w.write_double(21, direction.y)?;
        if mtext.line_spacing_factor != 0.0 {
            // Exact spacing
            w.write_i16(73, 2)?;
            w.write_double(44, mtext.line_spacing_factor)
        } else {
            w.write_i16(73, 1)
        }
    }

    fn write_text(&mut self, text: &Text) -> Result<()> {
        self.write_common("TEXT", &text.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbText")?;
        w.write_point2d(10, text.base_point)?;
        if text.uses_alignment_point() {
            w.write_point2d(11, text.alignment_point)?;
        }
        if text.height != 0.0 {
            w.write_double(40, text.height)?;
        }
        w.write_string(1, &text.value)?;
        if text.rotation != 0.0 {
            w.write_double(50, text.rotation)?;
        }
        if text.width_factor != 0.0 {
            w.write_double(41, text.width_factor)?;
        }
        if let Some(oblique) = text.oblique_angle.filter(|a| *a != 0.0) {
            w.write_double(51, oblique)?;
        }
        if !text.style.is_empty() {
            w.write_string(7, &text.style)?;
        }
        if text.horizontal_alignment.value() != 0 {
            w.write_i16(72, text.horizontal_alignment.value())?;
        }
        w.write_subclass("AcDbText")?;
        if text.vertical_alignment.value() != 0 {
            w.write_i16(73, text.vertical_alignment.value())?;
        }
        Ok(())
    }

    /// The AcDbText part shared by ATTDEF and ATTRIB
    fn write_attribute_text(&mut self, text: &AttributeText) -> Result<()> {
        let w = &mut *self.writer;
        w.write_subclass("AcDbText")?;
        w.write_point2d(10, text.base_point)?;
        if text.uses_alignment_point() {
            w.write_point2d(11, text.alignment_point)?;
        }
        w.write_double(40, text.height)?;
        w.write_string(1, &text.value)?;
        if text.rotation != 0.0 {
            w.write_double(50, text.rotation)?;
        }
        if !text.style.is_empty() {
            w.write_string(7, &text.style)?;
        }
        if text.horizontal_alignment.value() != 0 {
            w.write_i16(72, text.horizontal_alignment.value())?;
        }
        Ok(())
    }

    fn write_attribute_tail(&mut self, text: &AttributeText) -> Result<()> {
        let w = &mut *self.writer;
        w.write_string(2, &text.tag)?;
        w.write_i16(70, text.flags.bits())?;
        if text.vertical_alignment.value() != 0 {
            w.write_i16(74, text.vertical_alignment.value())?;
        }
        w.write_i16(280, text.duplicate_flag)
    }

    fn write_attribute_definition(&mut self, def: &AttributeDefinition) -> Result<()> {
        self.write_common("ATTDEF", &def.common)?;
        self.write_attribute_text(&def.text)?;
        self.writer.write_subclass("AcDbAttributeDefinition")?;
        // Version 0: AutoCAD 2010
        self.writer.write_i16(280, 0)?;
        self.writer.write_string(3, &def.prompt)?;
        self.write_attribute_tail(&def.text)
    }

    fn write_attribute(&mut self, attribute: &AttributeEntity, parent: Handle) -> Result<()> {
        self.write_owned_head("ATTRIB", attribute.common.handle, parent, &attribute.common.layer)?;
        self.write_attribute_text(&attribute.text)?;
        self.writer.write_subclass("AcDbAttribute")?;
        self.writer.write_i16(280, 0)?;
        self.write_attribute_tail(&attribute.text)
    }

    fn write_insert(&mut self, insert: &Insert) -> Result<()> {
        self.write_common("INSERT", &insert.common)?;
        {
            let w = &mut *self.writer;
            w.write_subclass("AcDbBlockReference")?;
            if !insert.attributes.is_empty() {
                w.write_i16(66, 1)?;
            }
            w.write_string(2, &insert.block_name)?;
            w.write_point2d(10, insert.insert_point)?;
            w.write_double(41, insert.x_scale)?;
            w.write_double(42, insert.y_scale)?;
            w.write_double(43, insert.z_scale)?;
            if insert.rotation != 0.0 {
                w.write_double(50, insert.rotation)?;
            }
        }
        if insert.attributes.is_empty() {
            return Ok(());
        }
        let parent = insert.common.handle;
        for attribute in &insert.attributes {
            self.write_attribute(attribute, parent)?;
        }
        self.write_owned_head("SEQEND", insert.seqend_handle, parent, &insert.common.layer)
    }

    fn write_dimension(&mut self, dim: &Dimension) -> Result<()> {
        let document = self.document;
        let overrides = dimension_overrides(dim, document, &*self);

        self.write_common("DIMENSION", &dim.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbDimension")?;
        w.write_i16(280, 0)?;
        if !dim.block_name.is_empty() {
            w.write_string(2, &dim.block_name)?;
        }
        w.write_point2d(10, dim.definition_point)?;
        w.write_point2d(11, dim.text_position)?;
        if let Some(text) = &dim.overrides.text {
            w.write_string(1, text)?;
        }
        w.write_string(3, &dim.style_name)?;
        if let Some(rotation) = dim.text_rotation {
            w.write_double(53, rotation)?;
        }

        // 32: the block is referenced by this dimension only
        let mut type_flags = dim.kind.type_code() | 32;
        if matches!(dim.kind, DimensionKind::Ordinate { is_x_type: true, .. }) {
            type_flags |= 64;
        }
        w.write_i16(70, type_flags)?;
        w.write_i16(71, dim.attachment.value())?;

        match &dim.kind {
            DimensionKind::Aligned { ext_line1_point, ext_line2_point, rotation } => {
                w.write_subclass("AcDbAlignedDimension")?;
                w.write_point2d(13, *ext_line1_point)?;
                w.write_point2d(14, *ext_line2_point)?;
                if *rotation != 0.0 {
                    w.write_double(50, *rotation)?;
                }
            }
            DimensionKind::Rotated { ext_line1_point, ext_line2_point, rotation } => {
                w.write_subclass("AcDbAlignedDimension")?;
                w.write_point2d(13, *ext_line1_point)?;
                w.write_point2d(14, *ext_line2_point)?;
                w.write_double(50, *rotation)?;
                w.write_subclass("AcDbRotatedDimension")?;
            }
            DimensionKind::Angular3Point { first_end, second_end, angle_vertex } => {
                w.write_subclass("AcDb3PointAngularDimension")?;
                w.write_point2d(13, *first_end)?;
                w.write_point2d(14, *second_end)?;
                w.write_point2d(15, *angle_vertex)?;
            }
            DimensionKind::Angular2Line { first_start, first_end, second_start } => {
                w.write_subclass("AcDb2LineAngularDimension")?;
                w.write_point2d(13, *first_start)?;
                w.write_point2d(14, *first_end)?;
                w.write_point2d(15, *second_start)?;
            }
            DimensionKind::Diametric { chord_point, leader_length } => {
                w.write_subclass("AcDbDiametricDimension")?;
                w.write_point2d(15, *chord_point)?;
                w.write_double(40, *leader_length)?;
            }
            DimensionKind::Radial { chord_point, leader_length } => {
                w.write_subclass("AcDbRadialDimension")?;
                w.write_point2d(15, *chord_point)?;
                w.write_double(40, *leader_length)?;
            }
            DimensionKind::Ordinate { feature_point, leader_end_point, .. } => {
                w.write_subclass("AcDbOrdinateDimension")?;
                w.write_point2d(13, *feature_point)?;
                w.write_point2d(14, *leader_end_point)?;
            }
        }

        match overrides {
            Some(record) => self.write_xdata(&record),
            None => Ok(()),
        }
    }

    fn write_leader(&mut self, leader: &Leader) -> Result<()> {
        // 0: text annotation, 2: block reference, 3: none
        let annotation_type = match leader.annotation.and_then(|h| self.document.entity(h)) {
            Some(EntityType::MText(_)) => 0,
            Some(EntityType::Insert(_)) => 2,
            _ => 3,
        };

        self.write_common("LEADER", &leader.common)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbLeader")?;
        w.write_string(3, &leader.style_name)?;
        w.write_bool(71, leader.path_type.has_arrow())?;
        w.write_bool(72, leader.path_type.is_spline())?;
        w.write_i16(73, annotation_type)?;
        w.write_bool(74, leader.baseline_direction)?;
        w.write_bool(75, leader.has_baseline)?;
        w.write_double(40, leader.char_height)?;
        w.write_double(41, leader.text_width)?;
        w.write_i32(76, count(leader.vertices.len()))?;
        for vertex in &leader.vertices {
            w.write_point2d(10, *vertex)?;
        }
        if let Some(annotation) = leader.annotation.filter(|h| h.is_valid()) {
            w.write_handle(340, annotation)?;
        }
        if leader.arrow_size != 0.0 {
            self.write_xdata(&leader_arrow_size(leader.arrow_size))?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // HATCH
    // ------------------------------------------------------------------

    fn write_hatch(&mut self, hatch: &Hatch) -> Result<()> {
        if hatch.outer.is_empty() {
            self.skip("HATCH", hatch.common.handle, "outer loop is empty");
            return Ok(());
        }
        let solid = hatch.is_solid();
        let loops: Vec<&BoundaryLoop> = hatch.loops().filter(|lp| !lp.is_empty()).collect();
        let associative = loops.iter().any(|lp| !lp.associated.is_empty());

        self.write_common("HATCH", &hatch.common)?;
        {
            let w = &mut *self.writer;
            w.write_subclass("AcDbHatch")?;
            w.write_point_z0(10, Vector2::ZERO)?;
            w.write_double(210, 0.0)?;
            w.write_double(220, 0.0)?;
            w.write_double(230, 1.0)?;
            w.write_string(2, &format!("{}{}", hatch.pattern_name, hatch.style.name_suffix()))?;
            w.write_bool(70, solid)?;
            w.write_bool(71, associative)?;
            w.write_i32(91, count(loops.len()))?;
        }
        for boundary in loops {
            self.write_boundary_loop(boundary)?;
        }
        self.writer.write_i16(75, hatch.style as i16)?;
        self.writer.write_i16(76, hatch.pattern_type as i16)?;
        if !solid {
            self.write_pattern_lines(hatch)?;
        }
        let w = &mut *self.writer;
        w.write_double(47, hatch.pixel_size)?;
        // One seed point
        w.write_i32(98, 1)?;
        w.write_point2d(10, Vector2::ZERO)
    }

    fn write_boundary_loop(&mut self, boundary: &BoundaryLoop) -> Result<()> {
        let w = &mut *self.writer;
        match &boundary.path {
            BoundaryPath::Polyline(pline) => {
                let has_bulges = pline.has_bulges();
                w.write_i32(92, (boundary.flags | BoundaryPathFlags::POLYLINE).bits())?;
                w.write_bool(72, has_bulges)?;
                w.write_bool(73, pline.is_closed)?;
                w.write_i32(93, count(pline.vertices.len()))?;
                for (i, vertex) in pline.vertices.iter().enumerate() {
                    w.write_point2d(10, *vertex)?;
                    if has_bulges {
                        w.write_double(42, pline.bulge(i))?;
                    }
                }
            }
            BoundaryPath::Edges(edges) => {
                w.write_i32(92, boundary.flags.bits())?;
                w.write_i32(93, count(edges.len()))?;
                for edge in edges {
                    write_boundary_edge(w, edge)?;
                }
            }
        }
        w.write_i32(97, count(boundary.associated.len()))?;
        for handle in &boundary.associated {
            w.write_handle(330, *handle)?;
        }
        Ok(())
    }

    /// Pattern line families, scaled and rotated into the hatch frame
    fn write_pattern_lines(&mut self, hatch: &Hatch) -> Result<()> {
        {
            let w = &mut *self.writer;
            w.write_double(52, hatch.pattern_angle)?;
            w.write_double(41, hatch.pattern_scale)?;
            w.write_i16(77, 0)?;
        }
        let patterns = self.options.patterns.as_ref();
        let Some(pattern) = patterns.and_then(|p| p.find(&hatch.pattern_name)) else {
            tracing::warn!(handle = %hatch.common.handle, pattern = %hatch.pattern_name, "hatch pattern not found");
            self.notifications
                .warn(format!("hatch {} pattern {} not found", hatch.common.handle, hatch.pattern_name));
            return Ok(());
        };

        let scale = hatch.pattern_scale;
        let w = &mut *self.writer;
        w.write_i16(78, i16::try_from(pattern.lines.len()).unwrap_or(i16::MAX))?;
        for line in &pattern.lines {
            let angle = line.angle + hatch.pattern_angle;
            let origin = (line.origin * scale).rotate(hatch.pattern_angle.to_radians());
            let offset = (line.offset * scale).rotate(angle.to_radians());
            w.write_double(53, angle)?;
            w.write_double(43, origin.x)?;
            w.write_double(44, origin.y)?;
            w.write_double(45, offset.x)?;
            w.write_double(46, offset.y)?;
            w.write_i16(79, i16::try_from(line.dashes.len()).unwrap_or(i16::MAX))?;
            for dash in &line.dashes {
                w.write_double(49, dash * scale)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // MULTILEADER
    // ------------------------------------------------------------------

    fn write_multileader(&mut self, leader: &MultiLeader) -> Result<()> {
        if let Some(reason) = leader.invalid_reason() {
            self.skip("MULTILEADER", leader.common.handle, reason);
            return Ok(());
        }
        let Some(content) = &leader.context.content else {
            return Ok(());
        };
        self.register_mleader_user(&leader.style_name, leader.common.handle);
        let style = self.mleader_style_handle_of(&leader.style_name);
        let line_type = self.line_type_handle_of(&leader.leader_line_type);

        self.write_common("MULTILEADER", &leader.common)?;
        self.writer.write_subclass("AcDbMLeader")?;
        self.writer.write_i16(270, 2)?;
        self.write_mleader_context(leader, content)?;

        let block = match content {
            MultiLeaderContent::Block(block) => Some(self.block_handle_of(&block.block_name)),
            MultiLeaderContent::MText(_) => None,
        };
        let w = &mut *self.writer;
        w.write_handle(340, style)?;
        // Property override flags
        w.write_i32(90, 279_552)?;
        w.write_i16(170, leader.path_type as i16)?;
        w.write_i32(91, MLEADER_BY_BLOCK)?;
        w.write_handle(341, line_type)?;
        w.write_i16(171, leader.leader_line_weight.value())?;
        w.write_bool(290, leader.enable_landing)?;
        w.write_bool(291, leader.enable_dogleg)?;
        w.write_i16(172, content.type_code())?;
        w.write_i16(173, 1)?;
        w.write_i32(95, 1)?;
        w.write_i16(174, 1)?;
        w.write_i16(175, 0)?;
        w.write_i32(92, MLEADER_BY_BLOCK)?;
        w.write_i16(292, 0)?;
        if let Some(block) = block {
            w.write_handle(344, block)?;
        }
        w.write_i32(93, MLEADER_BY_BLOCK)?;
        w.write_point2d(10, Vector2::new(1.0, 1.0))?;
        w.write_double(43, 0.0)?;
        w.write_i16(176, 0)?;
        w.write_i16(293, 0)?;
        for (i, (definition, value)) in leader.attribute_definitions.iter().zip(&leader.attribute_values).enumerate() {
            w.write_handle(330, *definition)?;
            w.write_i16(177, i16::try_from(i + 1).unwrap_or(i16::MAX))?;
            w.write_double(44, 0.0)?;
            w.write_string(302, value)?;
        }
        w.write_i16(294, 0)?;
        w.write_i16(178, 0)?;
        w.write_i16(179, 1)?;
        w.write_double(45, 1.0)?;
        w.write_i16(271, 0)?;
        w.write_i16(272, 9)?;
        w.write_i16(273, 9)
    }

    fn write_mleader_context(&mut self, leader: &MultiLeader, content: &MultiLeaderContent) -> Result<()> {
        let context = &leader.context;
        {
            let w = &mut *self.writer;
            w.write_string(300, "CONTEXT_DATA{")?;
            w.write_double(40, 1.0)?;
            w.write_point2d(10, context.landing_position)?;
            w.write_double(41, context.text_height)?;
            w.write_double(140, context.arrow_size)?;
            w.write_double(145, context.landing_gap)?;
            // Text angle, alignment, block connection, block attribute index
            w.write_i16(174, 1)?;
            w.write_i16(175, 1)?;
            w.write_i16(176, 0)?;
            w.write_i16(177, 0)?;
        }
        match content {
            MultiLeaderContent::MText(text) => self.write_mleader_text(text)?,
            MultiLeaderContent::Block(block) => self.write_mleader_block(block)?,
        }
        let origin = context.leader.first_point().unwrap_or(context.landing_position);
        let w = &mut *self.writer;
        w.write_point2d(110, origin)?;
        w.write_point2d(111, Vector2::UNIT_X)?;
        w.write_point2d(112, Vector2::UNIT_Y)?;
        w.write_i16(297, 0)?;
        write_leader_branch(w, &context.leader)?;
        w.write_i16(272, 9)?;
        w.write_i16(273, 9)?;
        w.write_string(301, "}")
    }

    fn write_mleader_text(&mut self, text: &MTextContent) -> Result<()> {
        let style = self.text_style_handle_of(&text.style);
        let w = &mut *self.writer;
        w.write_bool(290, true)?;
        w.write_string(304, &text.text)?;
        w.write_point_z0(11, Vector2::ZERO)?;
        w.write_double(31, 1.0)?;
        w.write_handle(340, style)?;
        w.write_point2d(12, text.location)?;
        w.write_point2d(13, Vector2::from_angle(text.rotation))?;
        w.write_double(42, text.rotation)?;
        w.write_double(43, text.width)?;
        w.write_double(44, 0.0)?;
        w.write_double(45, 1.0)?;
        w.write_i16(170, 1)?;
        w.write_i32(90, i32::from(text.color.dxf_index()))?;
        w.write_i16(171, text.attachment.value())?;
        // Flow direction: by style
        w.write_i16(172, 5)?;
        w.write_i32(91, NO_BACKGROUND)?;
        w.write_double(141, 0.0)?;
        w.write_i32(92, 0)?;
        w.write_i16(291, 0)?;
        w.write_i16(292, 0)?;
        w.write_i16(173, 0)?;
        w.write_i16(293, 0)?;
        w.write_double(142, 0.0)?;
        w.write_double(143, 0.0)?;
        w.write_i16(294, 0)?;
        w.write_i16(295, 0)?;
        w.write_bool(296, false)
    }

    fn write_mleader_block(&mut self, block: &BlockContent) -> Result<()> {
        let handle = self.block_handle_of(&block.block_name);
        let w = &mut *self.writer;
        w.write_bool(290, false)?;
        w.write_bool(296, true)?;
        w.write_handle(341, handle)?;
        w.write_double(14, 0.0)?;
        w.write_double(24, 0.0)?;
        w.write_double(34, 1.0)?;
        w.write_point2d(15, block.position)?;
        w.write_point2d(16, block.scale)?;
        w.write_double(46, block.rotation)?;
        w.write_i32(93, i32::from(block.color.dxf_index()))?;
        let p = block.position;
        let transform = [1.0, 0.0, 0.0, p.x, 0.0, 1.0, 0.0, p.y, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        for value in transform {
            w.write_double(47, value)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // ACAD_TABLE
    // ------------------------------------------------------------------

    fn write_table(&mut self, table: &Table) -> Result<()> {
        if let Some(reason) = table.invalid_reason() {
            self.skip("ACAD_TABLE", table.common.handle, reason);
            return Ok(());
        }
        self.register_table_user(&table.style_name, table.common.handle);
        let style = self.table_style_handle_of(&table.style_name);
        let block = (!table.block_name.is_empty()).then(|| self.block_handle_of(&table.block_name));

        self.write_common("ACAD_TABLE", &table.common)?;
        {
            let w = &mut *self.writer;
            w.write_i32(160, 3512)?;
            w.write_subclass("AcDbBlockReference")?;
            if !table.block_name.is_empty() {
                w.write_string(2, &table.block_name)?;
            }
            w.write_point2d(10, table.insertion_point)?;
            w.write_subclass("AcDbTable")?;
            w.write_i16(280, 0)?;
            w.write_handle(342, style)?;
            if let Some(block) = block {
                w.write_handle(343, block)?;
            }
            w.write_point2d(11, Vector2::UNIT_X)?;
            w.write_i32(90, 22)?;
            w.write_i32(91, count(table.row_count))?;
            w.write_i32(92, count(table.column_count))?;
            for code in 93..=96 {
                w.write_i32(code, 0)?;
            }
            for height in &table.row_heights {
                w.write_double(141, *height)?;
            }
            for width in &table.column_widths {
                w.write_double(142, *width)?;
            }
        }
        for cell in &table.cells {
            self.write_cell(cell)?;
        }
        let w = &mut *self.writer;
        if table.horizontal_margin != 0.0 {
            w.write_double(40, table.horizontal_margin)?;
        }
        if table.vertical_margin != 0.0 {
            w.write_double(41, table.vertical_margin)?;
        }
        write_hidden_borders(w, &table.borders)
    }

    fn write_cell(&mut self, cell: &Cell) -> Result<()> {
        {
            let w = &mut *self.writer;
            w.write_i16(171, cell.kind() as i16)?;
            w.write_i32(172, cell.flag)?;
            w.write_bool(173, cell.merged)?;
            w.write_bool(174, cell.auto_fit)?;
            w.write_i32(175, cell.column_span)?;
            w.write_i32(176, cell.row_span)?;
            w.write_i32(91, cell.override_flag)?;
            w.write_i32(178, cell.virtual_edge_flag)?;
            w.write_double(145, cell.rotation)?;
        }
        if let CellContent::Block(block) = &cell.content {
            let handle = self.block_handle_of(&block.block_name);
            let w = &mut *self.writer;
            w.write_handle(340, handle)?;
            w.write_double(144, block.scale)?;
            w.write_i32(179, count(block.attribute_definitions.len()))?;
            for (definition, value) in block.attribute_definitions.iter().zip(&block.attribute_values) {
                w.write_handle(331, *definition)?;
                w.write_string(300, value)?;
            }
        }

        let w = &mut *self.writer;
        if cell.alignment != CellAlignment::Invalid {
            w.write_i16(170, cell.alignment as i16)?;
        }
        if cell.background_color != Color::ByBlock {
            w.write_i16(63, cell.background_color.dxf_index())?;
        }
        if cell.text_color != Color::ByBlock {
            w.write_i16(64, cell.text_color.dxf_index())?;
        }
        if cell.background_color != Color::ByBlock {
            w.write_bool(283, cell.background_enabled)?;
        }
        if cell.text_height != 0.0 {
            w.write_double(140, cell.text_height)?;
        }
        // Extended cell flags
        w.write_i32(92, 0)?;
        w.write_string(301, "CELL_VALUE")?;
        w.write_i32(93, cell.value_flags)?;
        w.write_i32(90, cell.value_data_type)?;
        if cell.value_override_flag != 0 {
            w.write_i32(91, cell.value_override_flag)?;
        }
        match &cell.content {
            CellContent::Text(text) => write_cell_text(w, text)?,
            CellContent::Block(_) => write_cell_text(w, &CellText::default())?,
        }
        write_hidden_borders(w, &cell.borders)?;
        w.write_string(304, "ACVALUE_END")
    }

    // ------------------------------------------------------------------
    // VIEWPORT
    // ------------------------------------------------------------------

    fn write_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport_id = self.viewport_id.saturating_add(1);
        let id = self.viewport_id;
        let owner = self.owner;
        let w = &mut *self.writer;
        w.write_entity_type("VIEWPORT")?;
        w.write_handle(5, viewport.common.handle)?;
        w.write_handle(330, owner)?;
        w.write_subclass("AcDbEntity")?;
        w.write_i16(67, 1)?;
        w.write_string(8, &viewport.common.layer)?;
        w.write_subclass("AcDbViewport")?;
        w.write_point_z0(10, viewport.center)?;
        w.write_double(40, viewport.width)?;
        w.write_double(41, viewport.height)?;
        w.write_i16(68, id)?;
        w.write_i16(69, id)?;
        w.write_point2d(12, viewport.view_center)?;
        w.write_point2d(13, Vector2::ZERO)?;
        w.write_point2d(14, Vector2::new(10.0, 10.0))?;
        w.write_point2d(15, Vector2::new(10.0, 10.0))?;
        w.write_point2d(16, Vector2::ZERO)?;
        w.write_double(36, 1.0)?;
        w.write_point2d(17, Vector2::ZERO)?;
        w.write_double(37, 0.0)?;
        w.write_double(42, 50.0)?;
        w.write_double(43, 0.0)?;
        w.write_double(44, 0.0)?;
        w.write_double(45, viewport.view_height)?;
        w.write_double(50, 0.0)?;
        w.write_double(51, viewport.twist_angle)?;
        // Circle zoom percent
        w.write_i16(72, 1000)?;
        w.write_i32(90, viewport.status_flags())?;
        if let Some(clip) = viewport.clip_entity {
            w.write_handle(340, clip)?;
        }
        w.write_string(1, "")?;
        w.write_i16(281, 0)?;
        w.write_i16(71, 1)?;
        w.write_i16(74, 0)?;
        write_ucs_axes(w)?;
        w.write_i16(79, 0)?;
        w.write_double(146, 0.0)?;
        w.write_i16(170, 0)
    }
}

fn write_boundary_edge<W: DxfStreamWriter>(w: &mut W, edge: &BoundaryEdge) -> Result<()> {
    w.write_i16(72, edge.type_code())?;
    match edge {
        BoundaryEdge::Line(line) => {
            w.write_point2d(10, line.start)?;
            w.write_point2d(11, line.end)
        }
        BoundaryEdge::Arc(arc) => {
            w.write_point2d(10, arc.center)?;
            w.write_double(40, arc.radius)?;
            w.write_double(50, arc.start_angle)?;
            w.write_double(51, arc.end_angle)?;
            // Counterclockwise
            w.write_i16(73, 1)
        }
        BoundaryEdge::Ellipse(ellipse) => {
            w.write_point2d(10, ellipse.center)?;
            w.write_point2d(11, ellipse.major_axis)?;
            w.write_double(40, ellipse.minor_axis_ratio)?;
            w.write_double(50, ellipse.start_parameter.to_degrees())?;
            w.write_double(51, ellipse.end_parameter.to_degrees())?;
            w.write_i16(73, 1)
        }
        BoundaryEdge::Spline(spline) => {
            w.write_i32(94, spline.degree)?;
            w.write_bool(73, spline.flags.contains(crate::entities::SplineFlags::RATIONAL))?;
            w.write_bool(74, spline.flags.contains(crate::entities::SplineFlags::PERIODIC))?;
            w.write_i32(95, count(spline.knots.len()))?;
            w.write_i32(96, count(spline.control_points.len()))?;
            for knot in &spline.knots {
                w.write_double(40, *knot)?;
            }
            for point in &spline.control_points {
                w.write_point2d(10, *point)?;
            }
            w.write_i32(97, count(spline.fit_points.len()))?;
            for point in &spline.fit_points {
                w.write_point2d(11, *point)?;
            }
            w.write_point2d(12, spline.start_tangent)?;
            w.write_point2d(13, spline.end_tangent)
        }
    }
}

fn write_leader_branch<W: DxfStreamWriter>(w: &mut W, branch: &LeaderBranch) -> Result<()> {
    w.write_string(302, "LEADER{")?;
    // Last leader line point and dogleg vector are set
    w.write_i16(290, 1)?;
    w.write_i16(291, 1)?;
    w.write_point2d(10, branch.common_point)?;
    w.write_point2d(11, Vector2::UNIT_X)?;
    w.write_i32(90, 0)?;
    w.write_double(40, branch.dogleg_length)?;
    for (i, line) in branch.lines.iter().enumerate() {
        w.write_string(304, "LEADER_LINE{")?;
        for point in line {
            w.write_point2d(10, *point)?;
        }
        w.write_i32(91, count(i))?;
        w.write_string(305, "}")?;
    }
    w.write_i16(271, 0)?;
    w.write_string(303, "}")
}

fn write_cell_text<W: DxfStreamWriter>(w: &mut W, text: &CellText) -> Result<()> {
    if !text.text.is_empty() {
        w.write_text_chunks(2, 1, &text.text)?;
    }
    if !text.style.is_empty() {
        w.write_string(7, &text.style)?;
    }
    w.write_i32(94, 0)?;
    w.write_string(300, "")?;
    w.write_text_chunks(303, 302, &text.text)
}

/// Hidden borders are written as a zero under their own code
fn write_hidden_borders<W: DxfStreamWriter>(w: &mut W, borders: &Borders) -> Result<()> {
    for (visible, code) in [(borders.left, 288), (borders.right, 285), (borders.top, 289), (borders.bottom, 286)] {
        if !visible {
            w.write_double(code, 0.0)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CadDocument;
    use crate::entities::CellKind;
    use crate::io::dxf::writer::{DxfTextWriter, WriteOptions};

    fn encode(document: &CadDocument, entity: &EntityType) -> (String, usize) {
        let options = WriteOptions::default();
        let mut buf = Vec::new();
        let warnings = {
            let mut text = DxfTextWriter::new(&mut buf);
            let mut writer = SectionWriter::new(&mut text, document, &options, &[]);
            writer.owner = Handle::new(0x1F);
            writer.write_entity(entity).unwrap();
            writer.into_notifications().len()
        };
        (String::from_utf8(buf).unwrap(), warnings)
    }

    fn with_handle<E: Into<EntityType>>(entity: E, handle: u64) -> EntityType {
        let mut entity = entity.into();
        entity.common_mut().handle = Handle::new(handle);
        entity
    }

    #[test]
    fn test_common_prefix_omits_defaults() {
        let doc = CadDocument::new();
        let line = with_handle(Line::from_points(Vector2::ZERO, Vector2::new(3.0, 4.0)), 0x2711);
        let (out, _) = encode(&doc, &line);
        assert!(out.starts_with("  0\nLINE\n  5\n2711\n330\n1F\n100\nAcDbEntity\n  8\n0\n100\nAcDbLine\n"));
        assert!(!out.contains("\n 62\n"));
        assert!(!out.contains("\n370\n"));
    }

    #[test]
    fn test_common_prefix_with_overrides() {
        let doc = CadDocument::new();
        let mut circle = Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0);
        circle.common.color = Color::RED;
        circle.common.line_type = "DASHED".to_string();
        circle.common.line_type_scale = 2.0;
        circle.common.reactors.push(Handle::new(0x2712));
        let (out, _) = encode(&doc, &with_handle(circle, 0x2711));
        assert!(out.contains("102\n{ACAD_REACTORS\n330\n2712\n102\n}\n"));
        assert!(out.contains("  6\nDASHED\n 62\n1\n 48\n2.0\n"));
        assert!(out.ends_with(" 10\n10.0\n 20\n10.0\n 40\n50.0\n"));
    }

    #[test]
    fn test_lwpolyline_bulges_and_widths() {
        let doc = CadDocument::new();
        let mut pline = LwPolyline::from_points(vec![Vector2::ZERO, Vector2::new(1.0, 0.0)], true);
        pline.set_bulges(vec![0.0, 1.0]);
        let (out, _) = encode(&doc, &with_handle(pline, 0x2711));
        assert!(out.contains(" 90\n2\n 70\n129\n"));
        assert!(out.contains(" 40\n0.0\n 41\n0.0\n 42\n1.0\n"));
        assert_eq!(out.matches("\n 42\n").count(), 1);
    }

    #[test]
    fn test_empty_hatch_is_skipped() {
        let doc = CadDocument::new();
        let (out, warnings) = encode(&doc, &with_handle(Hatch::solid(), 0x2711));
        assert!(out.is_empty());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_circle_hatch_compact_loop() {
        let doc = CadDocument::new();
        let mut hatch = Hatch::solid();
        assert!(hatch.add_boundary(Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0), None));
        hatch.add_associated_entity(Handle::new(0x2711), None);
        let (out, warnings) = encode(&doc, &with_handle(hatch, 0x2712));
        assert_eq!(warnings, 0);
        assert!(out.contains("  2\nSOLID\n 70\n1\n 71\n1\n 91\n1\n 92\n7\n 72\n1\n 73\n1\n 93\n2\n"));
        assert!(out.contains(" 10\n-40.0\n 20\n10.0\n 42\n1.0\n 10\n60.0\n 20\n10.0\n 42\n1.0\n 97\n1\n330\n2711\n"));
    }

    #[test]
    fn test_unknown_pattern_warns() {
        let doc = CadDocument::new();
        let mut hatch = Hatch::with_pattern("NOPE", 1.0, 0.0);
        hatch.add_boundary(Circle::from_center_radius(Vector2::ZERO, 1.0), None);
        let (out, warnings) = encode(&doc, &with_handle(hatch, 0x2711));
        assert_eq!(warnings, 1);
        assert!(out.contains(" 52\n0.0\n 41\n1.0\n 77\n0\n 47\n"));
    }

    #[test]
    fn test_invalid_table_is_skipped() {
        let doc = CadDocument::new();
        let mut table = Table::new(Vector2::ZERO);
        table.initialize_cells(2, 2, CellKind::Text);
        table.cells.pop();
        let (out, warnings) = encode(&doc, &with_handle(table, 0x2711));
        assert!(out.is_empty());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_multileader_without_content_is_skipped() {
        let doc = CadDocument::new();
        let (out, warnings) = encode(&doc, &with_handle(MultiLeader::new(), 0x2711));
        assert!(out.is_empty());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_insert_attributes_and_seqend() {
        let doc = CadDocument::new();
        let mut insert = Insert::new("PART", Vector2::new(1.0, 2.0));
        let mut attribute = AttributeEntity::new();
        attribute.text.tag = "NO".to_string();
        attribute.common.handle = Handle::new(0x2712);
        insert.add_attribute(attribute);
        insert.seqend_handle = Handle::new(0x2713);
        let (out, _) = encode(&doc, &with_handle(insert, 0x2711));
        assert!(out.contains(" 66\n1\n  2\nPART\n"));
        assert!(out.contains("  0\nATTRIB\n  5\n2712\n330\n2711\n"));
        assert!(out.contains("  0\nSEQEND\n  5\n2713\n330\n2711\n"));
    }

    #[test]
    fn test_viewport_ids_increment() {
        let doc = CadDocument::new();
        let options = WriteOptions::default();
        let mut buf = Vec::new();
        {
            let mut text = DxfTextWriter::new(&mut buf);
            let mut writer = SectionWriter::new(&mut text, &doc, &options, &[]);
            writer.write_entity(&with_handle(Viewport::new(), 0x2711)).unwrap();
            writer.write_entity(&with_handle(Viewport::new(), 0x2712)).unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains(" 68\n1\n 69\n1\n"));
        assert!(out.contains(" 68\n2\n 69\n2\n"));
    }

    #[test]
    fn test_dimension_override_xdata() {
        let doc = CadDocument::new();
        let mut dim = Dimension::aligned(Vector2::ZERO, Vector2::new(10.0, 0.0), Vector2::new(0.0, 5.0));
        dim.overrides.arrow_head_size = Some(3.5);
        dim.overrides.text = Some("<>".to_string());
        let (out, _) = encode(&doc, &with_handle(dim, 0x2711));
        assert!(out.contains("  1\n<>\n  3\nISO-25\n"));
        assert!(out.contains(" 70\n33\n"));
        assert!(out.contains("1001\nACAD\n1000\nDSTYLE\n1002\n{\n1070\n41\n1040\n3.5\n1002\n}\n"));
    }
}
