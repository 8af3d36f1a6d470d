//! DXF section readers
//!
//! One [`SectionReader`] walks the whole stream. Table entries, blocks and
//! entities are decoded into the document as they are met; every handle
//! reference is recorded in [`PendingLinks`] and installed by
//! [`SectionReader::finish`] once the last section has been read.

use ahash::AHashSet;
use indexmap::IndexMap;

use crate::document::{CadDocument, DEFAULT_PAPER_SPACE};
use crate::entities::{EntityCommon, EntityType};
use crate::error::{DxfError, Result};
use crate::notification::NotificationType;
use crate::objects::{
    BlockConnectionType, Layout, MultiLeaderStyle, MultiLeaderStyleContent, PlotRotation, RowCellStyle,
    StyleBlockContent, StyleMTextContent, TableStyle, TextAngleType,
};
use crate::predefined::predefined_blocks;
use crate::tables::block_record::is_paper_space_name;
use crate::tables::layer::LayerFlags;
use crate::tables::{
    BlockRecord, DimStyle, DimensionTextMovement, FitMode, HorizontalTextPosition, Layer, LineType,
    LineTypeElement, LinearUnitFormat, TextStyle, VerticalTextPosition,
};
use crate::types::{Color, Handle, LineWeight, Vector2};

use super::super::code_page::stream_encoding;
use super::super::xdata::{ExtendedDataRecord, OverrideReference, XDataValue};
use super::pending::{EntityLink, MultiLeaderStyleLink, NameKind, PendingLinks};
use super::stream_reader::{DxfCodePair, DxfStreamReader};
use super::DxfReaderConfiguration;

const MODEL_SPACE: &str = "*Model_Space";

/// Sections a document cannot be loaded without
const REQUIRED_SECTIONS: [&str; 4] = ["HEADER", "TABLES", "BLOCKS", "ENTITIES"];

/// Where the entities of the block being read go
enum BlockTarget {
    Skip,
    /// Key of a paper space layout in `SectionReader::layouts`
    Layout(String),
    Block(BlockRecord),
}

/// Reader state shared by every section
pub(super) struct SectionReader<'a> {
    reader: &'a mut dyn DxfStreamReader,
    config: DxfReaderConfiguration,
    pub(super) document: CadDocument,
    pub(super) pending: PendingLinks,
    /// Paper space layouts keyed by their uppercase block name
    layouts: IndexMap<String, Layout>,
    max_handle: Handle,
    /// Set once the stream itself is unusable; failsafe mode stops recovering
    corrupt: bool,
    version: String,
    code_page: Option<String>,
    /// Unsupported keywords already reported
    reported: AHashSet<String>,
}

impl<'a> SectionReader<'a> {
    pub(super) fn new(reader: &'a mut dyn DxfStreamReader, config: DxfReaderConfiguration) -> Self {
        Self {
            reader,
            config,
            document: CadDocument::new(),
            pending: PendingLinks::new(),
            layouts: IndexMap::new(),
            max_handle: Handle::NULL,
            corrupt: false,
            version: String::new(),
            code_page: None,
            reported: AHashSet::new(),
        }
    }

    /// Read every section up to EOF and resolve the recorded links
    pub(super) fn read(mut self) -> Result<CadDocument> {
        self.detect_encoding()?;

        let mut sections = AHashSet::new();
        while let Some(pair) = self.raw_pair()? {
            if pair.is(0, "EOF") {
                break;
            }
            if !pair.is(0, "SECTION") {
                continue;
            }
            let name = self.expect()?;
            if name.code != 2 {
                return Err(DxfError::Parse(format!(
                    "line {}: expected a section name, found group code {}",
                    name.line, name.code
                )));
            }
            let section = name.value.trim().to_ascii_uppercase();
            tracing::debug!(section = %section, "reading section");
            match section.as_str() {
                "HEADER" => self.read_header()?,
                "TABLES" => self.read_tables()?,
                "BLOCKS" => self.read_blocks()?,
                "ENTITIES" => self.read_entities()?,
                "OBJECTS" => self.read_objects()?,
                _ => self.skip_section(&section)?,
            }
            sections.insert(section);
        }

        if let Some(missing) = REQUIRED_SECTIONS.iter().find(|s| !sections.contains(**s)) {
            return Err(DxfError::MissingSection(missing.to_string()));
        }
        Ok(self.finish())
    }

    /// Pre-scan the header for `$ACADVER` and `$DWGCODEPAGE` so strings of
    /// legacy streams decode with the right code page from the first line
    fn detect_encoding(&mut self) -> Result<()> {
        let start = self.reader.tell();
        let mut variable = String::new();
        let mut in_header = false;
        while let Some(pair) = self.raw_pair()? {
            if pair.code == 0 {
                if in_header || pair.is(0, "EOF") {
                    break;
                }
                continue;
            }
            if pair.code == 2 && pair.value.trim().eq_ignore_ascii_case("HEADER") {
                in_header = true;
                continue;
            }
            if !in_header {
                // Anything but a HEADER first: leave the defaults
                if pair.code == 2 {
                    break;
                }
                continue;
            }
            match (variable.as_str(), pair.code) {
                (_, 9) => variable = pair.value.trim().to_ascii_uppercase(),
                ("$ACADVER", 1) => self.version = pair.value.trim().to_string(),
                ("$DWGCODEPAGE", 3) => self.code_page = Some(pair.value.trim().to_string()),
                _ => {}
            }
        }
        self.reader.seek(start);

        let encoding = stream_encoding(&self.version, self.code_page.as_deref());
        if let Some(encoding) = encoding {
            tracing::debug!(version = %self.version, encoding = encoding.name(), "legacy code page");
        }
        self.reader.set_encoding(encoding);
        Ok(())
    }

    /// Move the collected layouts into the document, install the pending
    /// links and hand out handles to entities that had none
    fn finish(mut self) -> CadDocument {
        let mut layouts: Vec<Layout> = std::mem::take(&mut self.layouts).into_values().collect();
        layouts.sort_by_key(|layout| layout.tab_order);
        for (i, mut layout) in layouts.into_iter().enumerate() {
            if layout.name.is_empty() || layout.name.starts_with('*') {
                layout.name = format!("Layout{}", i + 1);
            }
            if self.document.layouts.contains_key(&layout.name) {
                tracing::warn!(layout = %layout.name, "duplicate layout name, layout dropped");
                self.document.notifications.warn(format!("duplicate layout {} dropped", layout.name));
                continue;
            }
            self.document.layouts.insert(layout.name.clone(), layout);
        }

        let links = self.pending.len();
        let dropped = std::mem::take(&mut self.pending).resolve(&mut self.document);
        self.document.observe_handle(self.max_handle);
        let claimed = self.document.claim_missing_handles();
        tracing::debug!(links, dropped, claimed, max_handle = %self.max_handle, "references resolved");
        self.document
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    /// Next pair of the stream; a stream error makes the stream unusable
    pub(super) fn raw_pair(&mut self) -> Result<Option<DxfCodePair>> {
        self.reader.read_pair().map_err(|err| {
            self.corrupt = true;
            err
        })
    }

    /// Next pair, which must exist
    pub(super) fn expect(&mut self) -> Result<DxfCodePair> {
        let line = self.reader.line_number();
        match self.raw_pair()? {
            Some(pair) => Ok(pair),
            None => {
                self.corrupt = true;
                Err(DxfError::Parse(format!("unexpected end of stream after line {}", line)))
            }
        }
    }

    /// Next pair of the current record; `None` once the next record starts
    pub(super) fn next_field(&mut self) -> Result<Option<DxfCodePair>> {
        let mark = self.reader.tell();
        match self.raw_pair()? {
            Some(pair) if pair.code == 0 => {
                self.reader.seek(mark);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Next pair without consuming it
    pub(super) fn peek(&mut self) -> Result<Option<DxfCodePair>> {
        let mark = self.reader.tell();
        let pair = self.raw_pair()?;
        self.reader.seek(mark);
        Ok(pair)
    }

    /// Next pair of the current record only when it has `code`
    pub(super) fn optional_field(&mut self, code: i32) -> Result<Option<DxfCodePair>> {
        let mark = self.reader.tell();
        match self.raw_pair()? {
            Some(pair) if pair.code == code => Ok(Some(pair)),
            _ => {
                self.reader.seek(mark);
                Ok(None)
            }
        }
    }

    /// Next pair of the current record, which must have `code`
    pub(super) fn expect_code(&mut self, code: i32) -> Result<DxfCodePair> {
        let line = self.reader.line_number();
        match self.next_field()? {
            Some(pair) if pair.code == code => Ok(pair),
            Some(pair) => Err(DxfError::Parse(format!(
                "line {}: expected group code {}, found {}",
                pair.line, code, pair.code
            ))),
            None => Err(DxfError::Parse(format!(
                "line {}: record ended before group code {}",
                line, code
            ))),
        }
    }

    /// Point whose x is `x`; the y under `x.code + 10` follows when present
    pub(super) fn point(&mut self, x: &DxfCodePair) -> Result<Vector2> {
        let y = match self.optional_field(x.code + 10)? {
            Some(pair) => pair.as_double()?,
            None => 0.0,
        };
        Ok(Vector2::new(x.as_double()?, y))
    }

    /// Point that must start with `code`
    pub(super) fn expect_point(&mut self, code: i32) -> Result<Vector2> {
        let x = self.expect_code(code)?;
        self.point(&x)
    }

    /// Skip the rest of the current record
    pub(super) fn skip_record(&mut self) -> Result<()> {
        while self.next_field()?.is_some() {}
        Ok(())
    }

    /// Skip the rest of a record, keeping only its handle
    pub(super) fn skip_owned_record(&mut self) -> Result<Handle> {
        let mut handle = Handle::NULL;
        while let Some(pair) = self.next_field()? {
            if pair.code == 5 {
                handle = self.handle_of(&pair)?;
            }
        }
        Ok(handle)
    }

    /// Skip the rest of a `102 {...` group
    fn skip_group(&mut self) -> Result<()> {
        while let Some(pair) = self.next_field()? {
            if pair.code == 102 {
                break;
            }
        }
        Ok(())
    }

    /// Next record keyword of `section`; `None` at ENDSEC
    fn next_record(&mut self, section: &str) -> Result<Option<DxfCodePair>> {
        loop {
            let Some(pair) = self.raw_pair()? else {
                self.corrupt = true;
                return Err(DxfError::Parse(format!("{} section is not terminated", section)));
            };
            if pair.is(0, "ENDSEC") {
                return Ok(None);
            }
            if pair.code == 0 {
                return Ok(Some(pair));
            }
            tracing::trace!(line = pair.line, code = pair.code, "stray pair");
        }
    }

    fn skip_section(&mut self, section: &str) -> Result<()> {
        tracing::debug!(section, "skipping section");
        while self.next_record(section)?.is_some() {}
        Ok(())
    }

    /// The record's own handle; a malformed one cannot be recovered from
    pub(super) fn handle_of(&mut self, pair: &DxfCodePair) -> Result<Handle> {
        match pair.as_handle() {
            Ok(handle) => {
                if handle > self.max_handle {
                    self.max_handle = handle;
                }
                Ok(handle)
            }
            Err(err) => {
                self.corrupt = true;
                Err(err)
            }
        }
    }

    /// Record a link from entity `owner`
    pub(super) fn link(&mut self, owner: Handle, link: EntityLink) {
        if owner.is_null() {
            tracing::debug!(?link, "link from an entity without handle ignored");
            return;
        }
        self.pending.link(owner, link);
    }

    /// Values of an extended data record up to the next application name
    pub(super) fn read_xdata(&mut self, application: &DxfCodePair) -> Result<ExtendedDataRecord> {
        let mut record = ExtendedDataRecord::new(application.value.trim());
        loop {
            let mark = self.reader.tell();
            match self.raw_pair()? {
                Some(pair) if (1000..=1071).contains(&pair.code) && pair.code != 1001 => {
                    match XDataValue::parse(pair.code, &pair.value) {
                        Some(value) => record.add_value(value),
                        None => tracing::debug!(line = pair.line, code = pair.code, "extended data value skipped"),
                    }
                }
                _ => {
                    self.reader.seek(mark);
                    return Ok(record);
                }
            }
        }
    }

    /// Shared entity prefix: handle, reactors, owner, layer and display
    /// properties. Stops at the first subclass marker other than AcDbEntity.
    pub(super) fn read_common(&mut self, common: &mut EntityCommon) -> Result<()> {
        loop {
            let mark = self.reader.tell();
            let Some(pair) = self.raw_pair()? else {
                return Ok(());
            };
            match pair.code {
                5 => common.handle = self.handle_of(&pair)?,
                102 => self.read_reactors(&pair, common.handle)?,
                330 | 360 | 347 => {}
                100 if pair.value.trim() == "AcDbEntity" => {}
                100 => return Ok(()),
                67 => common.paperspace = pair.as_i16()? == 1,
                8 => common.layer = pair.value.clone(),
                6 => common.line_type = pair.value.clone(),
                62 => common.color = Color::from_index(pair.as_i16()?),
                420 => common.color = Color::from_true_color(pair.as_i32()?),
                370 => common.line_weight = LineWeight::from_value(pair.as_i16()?),
                48 => common.line_type_scale = pair.as_double()?,
                60 | 284 | 390 | 440 => {}
                _ => {
                    self.reader.seek(mark);
                    return Ok(());
                }
            }
        }
    }

    /// `102 {ACAD_REACTORS` group; other 102 groups are skipped
    fn read_reactors(&mut self, group: &DxfCodePair, owner: Handle) -> Result<()> {
        let reactors = group.value.trim().eq_ignore_ascii_case("{ACAD_REACTORS");
        while let Some(pair) = self.next_field()? {
            match pair.code {
                102 => break,
                330 if reactors => {
                    let target = pair.as_handle()?;
                    self.link(owner, EntityLink::Reactor(target));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// In failsafe mode a record that fails to decode is dropped and
    /// reading goes on with the next record
    pub(super) fn recover<T>(&mut self, kind: &str, line: usize, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(DxfError::Parse(message)) if self.config.failsafe && !self.corrupt => {
                tracing::warn!(kind, line, error = %message, "record skipped");
                self.document
                    .notifications
                    .notify(NotificationType::Error, format!("{} at line {} skipped: {}", kind, line, message));
                self.skip_record()?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Report an unsupported keyword once per load
    pub(super) fn report_unsupported(&mut self, kind: &str) {
        if self.reported.insert(kind.to_string()) {
            tracing::debug!(kind, "unsupported record skipped");
            self.document
                .notifications
                .notify(NotificationType::NotImplemented, format!("{} records are not supported", kind));
        }
    }

    // ------------------------------------------------------------------
    // HEADER
    // ------------------------------------------------------------------

    fn read_header(&mut self) -> Result<()> {
        let mut variable = String::new();
        loop {
            let Some(pair) = self.raw_pair()? else {
                self.corrupt = true;
                return Err(DxfError::Parse("HEADER section is not terminated".to_string()));
            };
            if pair.is(0, "ENDSEC") {
                return Ok(());
            }
            match (variable.as_str(), pair.code) {
                (_, 9) => variable = pair.value.trim().to_ascii_uppercase(),
                ("$LTSCALE", 40) => self.document.linetype_scale = pair.as_double()?,
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // TABLES
    // ------------------------------------------------------------------

    fn read_tables(&mut self) -> Result<()> {
        while let Some(record) = self.next_record("TABLES")? {
            if record.is(0, "TABLE") {
                self.read_table()?;
            } else {
                self.skip_record()?;
            }
        }
        Ok(())
    }

    fn read_table(&mut self) -> Result<()> {
        let mut name = String::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                2 => name = pair.value.trim().to_ascii_uppercase(),
                5 => {
                    self.handle_of(&pair)?;
                }
                _ => {}
            }
        }

        loop {
            let pair = self.expect()?;
            if pair.code != 0 {
                continue;
            }
            if pair.is(0, "ENDTAB") {
                return self.skip_record();
            }
            if pair.is(0, "ENDSEC") {
                self.corrupt = true;
                return Err(DxfError::Parse(format!("table {} is not terminated", name)));
            }
            let kind = pair.value.trim().to_ascii_uppercase();
            let result = match kind.as_str() {
                "LTYPE" => self.read_line_type(),
                "LAYER" => self.read_layer(),
                "STYLE" => self.read_text_style(),
                "BLOCK_RECORD" => self.read_block_record(),
                "DIMSTYLE" => self.read_dim_style(),
                _ => self.skip_owned_record().map(|_| ()),
            };
            self.recover(&kind, pair.line, result)?;
        }
    }

    fn read_line_type(&mut self) -> Result<()> {
        let mut line_type = LineType::new("");
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => line_type.handle = self.handle_of(&pair)?,
                2 => line_type.name = pair.value.clone(),
                3 => line_type.description = pair.value.clone(),
                49 => line_type.elements.push(LineTypeElement {
                    length: pair.as_double()?,
                }),
                _ => {}
            }
        }
        self.pending.record_name(NameKind::LineType, line_type.handle, &line_type.name);
        if !line_type.name.is_empty() && !LineType::is_reserved_name(&line_type.name) {
            self.document.set_line_type(line_type);
        }
        Ok(())
    }

    fn read_layer(&mut self) -> Result<()> {
        let mut layer = Layer::new("");
        // Both are only written when they differ from these
        layer.is_plottable = true;
        layer.line_weight = LineWeight::ByLayer;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => layer.handle = self.handle_of(&pair)?,
                2 => layer.name = pair.value.clone(),
                70 => layer.flags = LayerFlags::from_bits_truncate(pair.as_i16()?),
                62 => {
                    let index = pair.as_i16()?;
                    layer.is_off = index < 0;
                    layer.color = Color::from_index(index.saturating_abs());
                }
                420 => layer.color = Color::from_true_color(pair.as_i32()?),
                6 => layer.line_type = pair.value.clone(),
                290 => layer.is_plottable = pair.as_bool()?,
                370 => layer.line_weight = LineWeight::from_value(pair.as_i16()?),
                _ => {}
            }
        }
        if !layer.name.is_empty() {
            self.document.set_layer(layer);
        }
        Ok(())
    }

    fn read_text_style(&mut self) -> Result<()> {
        let mut style = TextStyle::new("");
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => style.handle = self.handle_of(&pair)?,
                2 => style.name = pair.value.clone(),
                3 => style.font_file = pair.value.clone(),
                4 => style.big_font_file = pair.value.clone(),
                40 => style.height = pair.as_double()?,
                41 => style.width_factor = pair.as_double()?,
                50 => style.oblique_angle = pair.as_double()?,
                // TrueType family name, from the ACAD extended data
                1000 => style.true_type_font = pair.value.clone(),
                _ => {}
            }
        }
        self.pending.record_name(NameKind::TextStyle, style.handle, &style.name);
        if !style.name.is_empty() {
            self.document.set_text_style(style);
        }
        Ok(())
    }

    fn read_block_record(&mut self) -> Result<()> {
        let mut handle = Handle::NULL;
        let mut name = String::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => handle = self.handle_of(&pair)?,
                2 => name = pair.value.clone(),
                _ => {}
            }
        }
        self.pending.record_name(NameKind::Block, handle, &name);
        Ok(())
    }

    fn read_dim_style(&mut self) -> Result<()> {
        let mut style = DimStyle::new("");
        let mut references = Vec::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                105 | 5 => style.handle = self.handle_of(&pair)?,
                2 => style.name = pair.value.clone(),
                3 => style.text = pair.value.clone(),
                41 => style.arrow_head_size = pair.as_double()?,
                42 => style.extension_line_offset = pair.as_double()?,
                44 => style.extension_line_extend = pair.as_double()?,
                140 => style.text_height = pair.as_double()?,
                141 => style.set_signed_center_mark_size(pair.as_double()?),
                144 => style.linear_scale_factor = pair.as_double()?,
                77 => {
                    if pair.as_i16()? == 1 {
                        style.vertical_text_position = VerticalTextPosition::Above;
                    }
                }
                145 => style.vertical_text_position = VerticalTextPosition::from_value(pair.as_i16()?),
                147 => style.text_gap = pair.as_double()?,
                73 => style.text_align = pair.as_bool()?,
                75 => style.ext_line1_suppress = pair.as_bool()?,
                76 => style.ext_line2_suppress = pair.as_bool()?,
                78 => {
                    let zeros = pair.as_i16()?;
                    style.suppress_leading_zeros = zeros & 4 != 0;
                    style.suppress_trailing_zeros = zeros & 8 != 0;
                }
                79 => {
                    let zeros = pair.as_i16()?;
                    style.angle_suppress_leading_zeros = zeros & 1 != 0;
                    style.angle_suppress_trailing_zeros = zeros & 2 != 0;
                }
                172 => style.force_line_inside = pair.as_bool()?,
                174 => style.text_inside = pair.as_bool()?,
                176 => style.dimension_line_color = Color::from_index(pair.as_i16()?),
                177 => style.extension_line_color = Color::from_index(pair.as_i16()?),
                178 => style.text_color = Color::from_index(pair.as_i16()?),
                179 => style.angle_precision = pair.as_i16()?,
                271 => style.units_precision = pair.as_i16()?,
                275 => style.angle_format = pair.as_i16()?,
                277 => style.units_format = LinearUnitFormat::from_value(pair.as_i16()?),
                279 => style.text_movement = DimensionTextMovement::from_value(pair.as_i16()?),
                280 => style.horizontal_text_position = HorizontalTextPosition::from_value(pair.as_i16()?),
                281 => style.dim_line1_suppress = pair.as_bool()?,
                282 => style.dim_line2_suppress = pair.as_bool()?,
                289 => style.fit = FitMode::from_value(pair.as_i16()?),
                340 => references.push(OverrideReference::TextStyle(pair.as_handle()?)),
                343 => references.push(OverrideReference::ArrowHead1(pair.as_handle()?)),
                344 => references.push(OverrideReference::ArrowHead2(pair.as_handle()?)),
                371 => style.dimension_line_weight = LineWeight::from_value(pair.as_i16()?),
                372 => style.extension_line_weight = LineWeight::from_value(pair.as_i16()?),
                _ => {}
            }
        }
        if style.name.is_empty() {
            return Ok(());
        }
        for reference in references {
            self.pending.link_dim_style(&style.name, reference);
        }
        self.document.set_dim_style(style);
        Ok(())
    }

    // ------------------------------------------------------------------
    // BLOCKS
    // ------------------------------------------------------------------

    fn read_blocks(&mut self) -> Result<()> {
        while let Some(record) = self.next_record("BLOCKS")? {
            if record.is(0, "BLOCK") {
                self.read_block()?;
            } else {
                self.skip_owned_record()?;
            }
        }
        Ok(())
    }

    fn read_block(&mut self) -> Result<()> {
        let mut name = String::new();
        let mut base_point = Vector2::ZERO;
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => {
                    self.handle_of(&pair)?;
                }
                2 => name = pair.value.clone(),
                10 => base_point = self.point(&pair)?,
                _ => {}
            }
        }

        let mut target = self.block_target(&name, base_point);
        loop {
            let pair = self.expect()?;
            if pair.code != 0 {
                continue;
            }
            if pair.is(0, "ENDBLK") {
                self.skip_owned_record()?;
                break;
            }
            if pair.is(0, "ENDSEC") {
                self.corrupt = true;
                return Err(DxfError::Parse(format!("block {} is not terminated", name)));
            }
            let Some(entity) = self.read_entity(&pair)? else {
                continue;
            };
            match &mut target {
                BlockTarget::Skip => {}
                BlockTarget::Layout(key) => {
                    if let Some(layout) = self.layouts.get_mut(key.as_str()) {
                        layout.add_entity(entity);
                    }
                }
                BlockTarget::Block(block) => block.add_entity(entity),
            }
        }

        if let BlockTarget::Block(block) = target {
            if is_predefined_copy(&block) {
                tracing::trace!(block = %block.name, "predefined arrowhead block dropped");
            } else {
                self.document.blocks.set(block);
            }
        }
        Ok(())
    }

    fn block_target(&mut self, name: &str, base_point: Vector2) -> BlockTarget {
        if name.is_empty() || name.eq_ignore_ascii_case(MODEL_SPACE) {
            return BlockTarget::Skip;
        }
        if is_paper_space_name(name) {
            if self.config.model_space_only {
                return BlockTarget::Skip;
            }
            let key = name.to_ascii_uppercase();
            self.layouts.entry(key.clone()).or_insert_with(|| {
                let mut layout = Layout::new(name);
                layout.block_name = name.to_string();
                layout
            });
            return BlockTarget::Layout(key);
        }
        BlockTarget::Block(BlockRecord::new(name, base_point))
    }

    // ------------------------------------------------------------------
    // ENTITIES
    // ------------------------------------------------------------------

    fn read_entities(&mut self) -> Result<()> {
        let paper_space = DEFAULT_PAPER_SPACE.to_ascii_uppercase();
        while let Some(record) = self.next_record("ENTITIES")? {
            let Some(entity) = self.read_entity(&record)? else {
                continue;
            };
            if !entity.common().paperspace {
                self.document.model_space.push(entity);
                continue;
            }
            if self.config.model_space_only {
                continue;
            }
            match self.layouts.get_mut(&paper_space) {
                Some(layout) => layout.add_entity(entity),
                None => {
                    tracing::warn!(handle = %entity.handle(), "paper space entity without a paper space layout");
                    self.document.notifications.warn(format!(
                        "{} {} dropped: no {} layout",
                        entity.type_name(),
                        entity.handle(),
                        DEFAULT_PAPER_SPACE
                    ));
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // OBJECTS
    // ------------------------------------------------------------------

    fn read_objects(&mut self) -> Result<()> {
        while let Some(record) = self.next_record("OBJECTS")? {
            let kind = record.value.trim().to_ascii_uppercase();
            let result = match kind.as_str() {
                "LAYOUT" => self.read_layout(),
                "MLEADERSTYLE" => self.read_mleader_style(),
                "TABLESTYLE" => self.read_table_style(),
                _ => self.skip_owned_record().map(|_| ()),
            };
            self.recover(&kind, record.line, result)?;
        }
        Ok(())
    }

    fn read_layout(&mut self) -> Result<()> {
        let mut layout = Layout::new("");
        let mut subclass = String::new();
        let mut record = Handle::NULL;
        while let Some(pair) = self.next_field()? {
            let plot = &mut layout.plot_settings;
            match (subclass.as_str(), pair.code) {
                (_, 100) => subclass = pair.value.trim().to_string(),
                (_, 5) => layout.handle = self.handle_of(&pair)?,
                (_, 102) => self.skip_group()?,
                ("AcDbPlotSettings", 2) => plot.plot_config_file = pair.value.clone(),
                ("AcDbPlotSettings", 4) => plot.paper_name = pair.value.clone(),
                ("AcDbPlotSettings", 40) => plot.margin.left = pair.as_double()?,
                ("AcDbPlotSettings", 41) => plot.margin.bottom = pair.as_double()?,
                ("AcDbPlotSettings", 42) => plot.margin.right = pair.as_double()?,
                ("AcDbPlotSettings", 43) => plot.margin.top = pair.as_double()?,
                ("AcDbPlotSettings", 44) => plot.paper_width = pair.as_double()?,
                ("AcDbPlotSettings", 45) => plot.paper_height = pair.as_double()?,
                ("AcDbPlotSettings", 46) => plot.plot_origin.x = pair.as_double()?,
                ("AcDbPlotSettings", 47) => plot.plot_origin.y = pair.as_double()?,
                ("AcDbPlotSettings", 73) => plot.rotation = PlotRotation::from_code(pair.as_i16()?),
                ("AcDbLayout", 1) => layout.name = pair.value.clone(),
                ("AcDbLayout", 71) => layout.tab_order = pair.as_i32()?,
                ("AcDbLayout", 10) => layout.min_limits = self.point(&pair)?,
                ("AcDbLayout", 11) => layout.max_limits = self.point(&pair)?,
                ("AcDbLayout", 14) => layout.min_extents = self.point(&pair)?,
                ("AcDbLayout", 15) => layout.max_extents = self.point(&pair)?,
                ("AcDbLayout", 330) => record = pair.as_handle()?,
                _ => {}
            }
        }

        let block_name = self.pending.name_of(NameKind::Block, record).map(str::to_string);
        let is_model = layout.name.eq_ignore_ascii_case("Model")
            || block_name.as_deref().is_some_and(|name| name.eq_ignore_ascii_case(MODEL_SPACE));
        if is_model || self.config.model_space_only {
            return Ok(());
        }

        let key = match &block_name {
            Some(name) => name.to_ascii_uppercase(),
            None => {
                tracing::debug!(layout = %layout.name, record = %record, "layout block record not found");
                layout.name.to_ascii_uppercase()
            }
        };
        match self.layouts.get_mut(&key) {
            Some(existing) => {
                existing.handle = layout.handle;
                existing.name = layout.name;
                existing.plot_settings = layout.plot_settings;
                existing.min_limits = layout.min_limits;
                existing.max_limits = layout.max_limits;
                existing.min_extents = layout.min_extents;
                existing.max_extents = layout.max_extents;
                existing.tab_order = layout.tab_order;
            }
            None => {
                layout.block_name = block_name.unwrap_or_default();
                self.layouts.insert(key, layout);
            }
        }
        Ok(())
    }

    fn read_mleader_style(&mut self) -> Result<()> {
        let mut style = MultiLeaderStyle::new("");
        let mut content_type = 2;
        let mut text = StyleMTextContent::default();
        let mut block = StyleBlockContent::default();
        let mut links = Vec::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                5 => style.handle = self.handle_of(&pair)?,
                102 => self.skip_group()?,
                3 => style.name = pair.value.clone(),
                170 => content_type = pair.as_i16()?,
                90 => style.max_leader_points = pair.as_i32()?,
                40 => style.first_segment_angle = pair.as_double()?,
                41 => style.second_segment_angle = pair.as_double()?,
                173 => style.path_type = pair.as_i16()?.into(),
                91 => style.line_color = color_of(pair.as_i32()?),
                340 => links.push(MultiLeaderStyleLink::LineType(pair.as_handle()?)),
                92 => style.line_weight = LineWeight::from_value(pair.as_i16()?),
                290 => style.enable_landing = pair.as_bool()?,
                42 => style.landing_gap = pair.as_double()?,
                291 => style.enable_dogleg = pair.as_bool()?,
                43 => style.dogleg_length = pair.as_double()?,
                341 => links.push(MultiLeaderStyleLink::ArrowHead(pair.as_handle()?)),
                44 => style.arrow_size = pair.as_double()?,
                342 => links.push(MultiLeaderStyleLink::TextStyle(pair.as_handle()?)),
                175 => text.angle_type = TextAngleType::from(pair.as_i16()?),
                93 => text.color = color_of(pair.as_i32()?),
                45 => text.height = pair.as_double()?,
                46 => text.align_space = pair.as_double()?,
                343 => links.push(MultiLeaderStyleLink::Block(pair.as_handle()?)),
                94 => block.color = color_of(pair.as_i32()?),
                47 => block.scale.x = pair.as_double()?,
                49 => block.scale.y = pair.as_double()?,
                177 => block.connection = BlockConnectionType::from(pair.as_i16()?),
                296 => style.is_annotative = pair.as_bool()?,
                143 => style.break_gap_size = pair.as_double()?,
                _ => {}
            }
        }

        style.content = if content_type == 1 {
            MultiLeaderStyleContent::Block(block)
        } else {
            MultiLeaderStyleContent::MText(text)
        };
        self.pending.record_name(NameKind::MultiLeaderStyle, style.handle, &style.name);
        if style.name.is_empty() {
            return Ok(());
        }
        for link in links {
            self.pending.link_mleader_style(&style.name, link);
        }
        self.document.set_multileader_style(style);
        Ok(())
    }

    fn read_table_style(&mut self) -> Result<()> {
        let mut style = TableStyle::new("");
        let mut cells: Vec<RowCellStyle> = Vec::new();
        let mut named = false;
        while let Some(pair) = self.next_field()? {
            if pair.code == 140 {
                cells.push(RowCellStyle::default());
            }
            match pair.code {
                5 => style.handle = self.handle_of(&pair)?,
                102 => self.skip_group()?,
                3 => {
                    style.name = pair.value.clone();
                    named = true;
                }
                // Before the name 280 is the record version
                280 if named => style.no_title = pair.as_bool()?,
                281 => style.no_column_heading = pair.as_bool()?,
                40 => style.horizontal_margin = pair.as_double()?,
                41 => style.vertical_margin = pair.as_double()?,
                7 => style.text_style = pair.value.clone(),
                code => {
                    if let Some(cell) = cells.last_mut() {
                        read_cell_style_field(cell, code, &pair)?;
                    }
                }
            }
        }

        if !cells.is_empty() {
            style.cell_styles = cells;
        }
        self.pending.record_name(NameKind::TableStyle, style.handle, &style.name);
        if !style.name.is_empty() {
            self.document.set_table_style(style);
        }
        Ok(())
    }
}

/// One field of a table style's cell style
fn read_cell_style_field(cell: &mut RowCellStyle, code: i32, pair: &DxfCodePair) -> Result<()> {
    match code {
        140 => cell.text_height = pair.as_double()?,
        170 => cell.alignment = pair.as_i16()?.into(),
        62 => cell.text_color = Color::from_index(pair.as_i16()?),
        63 => cell.background_color = Color::from_index(pair.as_i16()?),
        283 => cell.background_enabled = pair.as_bool()?,
        90 => cell.data_type = pair.as_i32()?,
        91 => cell.unit_type = pair.as_i32()?,
        274..=279 => cell.border_weights[(code - 274) as usize] = LineWeight::from_value(pair.as_i16()?),
        284..=289 => cell.border_visible[(code - 284) as usize] = pair.as_bool()?,
        64..=69 => cell.border_colors[(code - 64) as usize] = Color::from_index(pair.as_i16()?),
        _ => {}
    }
    Ok(())
}

/// Color from a 32-bit color index field; out of range values read as ByBlock
pub(super) fn color_of(value: i32) -> Color {
    i16::try_from(value).map(Color::from_index).unwrap_or(Color::ByBlock)
}

/// A block that only repeats one of the predefined arrowheads
fn is_predefined_copy(block: &BlockRecord) -> bool {
    predefined_blocks()
        .iter()
        .find(|predefined| predefined.name.eq_ignore_ascii_case(&block.name))
        .is_some_and(|predefined| {
            predefined
                .entities
                .iter()
                .map(EntityType::type_name)
                .eq(block.entities.iter().map(EntityType::type_name))
        })
}
