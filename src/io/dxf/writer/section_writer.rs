//! DXF section writers
//!
//! [`SectionWriter`] emits the HEADER, TABLES, BLOCKS, ENTITIES and OBJECTS
//! sections of a document whose entity handles have already been assigned.
//! Table entries, block begin/end records and layouts are numbered here from
//! a separate counter starting at `0x300`; built-in tables and dictionaries
//! use fixed well-known handles.
//!
//! Named references are written as handles through per-kind name maps that
//! are filled while the tables are emitted. Style records in OBJECTS list the
//! entities using them; those lists are collected while entities are written.

use ahash::AHashMap;

use crate::document::CadDocument;
use crate::entities::{EntityList, EntityType};
use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::objects::{Layout, MultiLeaderStyle, MultiLeaderStyleContent, TableStyle};
use crate::tables::block_record::is_paper_space_name;
use crate::tables::{DimStyle, Layer, TextStyle, VerticalTextPosition};
use crate::types::{Handle, Vector2};

use super::super::xdata::{ExtendedDataRecord, OverrideHandles, XDataValue};
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use super::WriteOptions;

/// Well-known handles of built-in tables and dictionaries
pub(crate) mod fixed {
    pub const BLOCK_RECORD_TABLE: u64 = 0x1;
    pub const LAYER_TABLE: u64 = 0x2;
    pub const STYLE_TABLE: u64 = 0x3;
    pub const LTYPE_TABLE: u64 = 0x5;
    pub const VIEW_TABLE: u64 = 0x6;
    pub const UCS_TABLE: u64 = 0x7;
    pub const VPORT_TABLE: u64 = 0x8;
    pub const APPID_TABLE: u64 = 0x9;
    pub const DIMSTYLE_TABLE: u64 = 0xA;
    pub const ROOT_DICTIONARY: u64 = 0xC;
    pub const GROUP_DICTIONARY: u64 = 0xD;
    pub const PLOT_STYLE_DICTIONARY: u64 = 0xE;
    pub const PLOT_STYLE_PLACEHOLDER: u64 = 0xF;
    pub const ACAD_APPID: u64 = 0x12;
    pub const LTYPE_BYBLOCK: u64 = 0x14;
    pub const LTYPE_BYLAYER: u64 = 0x15;
    pub const LTYPE_CONTINUOUS: u64 = 0x16;
    pub const MLINE_STYLE_DICTIONARY: u64 = 0x17;
    pub const PLOT_SETTINGS_DICTIONARY: u64 = 0x19;
    pub const LAYOUT_DICTIONARY: u64 = 0x1A;
    pub const MODEL_SPACE_RECORD: u64 = 0x1F;
    pub const MODEL_SPACE_BLOCK: u64 = 0x20;
    pub const MODEL_SPACE_BLOCK_END: u64 = 0x21;
    pub const MODEL_LAYOUT: u64 = 0x22;
    pub const VARIABLE_DICTIONARY: u64 = 0x5E;
    pub const MATERIAL_DICTIONARY: u64 = 0x6A;
    pub const COLOR_DICTIONARY: u64 = 0x6B;
    pub const TABLE_STYLE_DICTIONARY: u64 = 0x7E;
    pub const VISUAL_STYLE_DICTIONARY: u64 = 0xEF;
    pub const SCALE_LIST_DICTIONARY: u64 = 0x10C;
    pub const MLEADER_STYLE_DICTIONARY: u64 = 0x12D;
    /// Table entry numbering starts after this value
    pub const TABLE_ENTRY_BASE: u64 = 0x2FF;
}

/// Model space block record name
pub(crate) const MODEL_SPACE: &str = "*Model_Space";

/// A predefined arrowhead block, re-handled for one write
#[derive(Debug, Clone)]
pub struct ArrowBlock {
    pub name: &'static str,
    pub entities: Vec<EntityType>,
}

/// Case-insensitive name to handle map; unknown names read as the null handle
#[derive(Debug, Default)]
struct NameHandles(AHashMap<String, Handle>);

impl NameHandles {
    fn insert(&mut self, name: &str, handle: Handle) {
        self.0.insert(name.to_uppercase(), handle);
    }

    fn get(&self, name: &str) -> Handle {
        self.0.get(&name.to_uppercase()).copied().unwrap_or(Handle::NULL)
    }
}

/// Count as written under an integer group code
pub(super) fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Writes all DXF sections
pub struct SectionWriter<'a, W: DxfStreamWriter> {
    pub(super) writer: &'a mut W,
    pub(super) document: &'a CadDocument,
    pub(super) options: &'a WriteOptions,
    predefined: &'a [ArrowBlock],
    next_table_handle: u64,
    text_styles: NameHandles,
    dim_styles: NameHandles,
    blocks: NameHandles,
    /// Layout object handles, keyed by layout block name
    layouts: NameHandles,
    mleader_styles: NameHandles,
    table_styles: NameHandles,
    line_types: NameHandles,
    mleader_users: AHashMap<String, Vec<Handle>>,
    table_users: AHashMap<String, Vec<Handle>>,
    /// Block record owning the entities being written
    pub(super) owner: Handle,
    pub(super) paper_space: bool,
    /// Viewport ids restart at 1 in every layout
    pub(super) viewport_id: i16,
    pub(super) notifications: NotificationCollection,
}

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Create a section writer over a prepared document
    pub fn new(
        writer: &'a mut W,
        document: &'a CadDocument,
        options: &'a WriteOptions,
        predefined: &'a [ArrowBlock],
    ) -> Self {
        let mut mleader_styles = NameHandles::default();
        for style in document.multileader_styles.values() {
            mleader_styles.insert(&style.name, style.handle);
        }
        let mut table_styles = NameHandles::default();
        for style in document.table_styles.values() {
            table_styles.insert(&style.name, style.handle);
        }
        Self {
            writer,
            document,
            options,
            predefined,
            next_table_handle: fixed::TABLE_ENTRY_BASE,
            text_styles: NameHandles::default(),
            dim_styles: NameHandles::default(),
            blocks: NameHandles::default(),
            layouts: NameHandles::default(),
            mleader_styles,
            table_styles,
            line_types: NameHandles::default(),
            mleader_users: AHashMap::new(),
            table_users: AHashMap::new(),
            owner: Handle::NULL,
            paper_space: false,
            viewport_id: 0,
            notifications: NotificationCollection::new(),
        }
    }

    /// Write every section followed by the end-of-file marker
    pub fn write_document(&mut self) -> Result<()> {
        self.write_header()?;
        self.write_tables()?;
        self.write_blocks()?;
        self.write_entities()?;
        self.write_objects()?;
        self.writer.write_eof()?;
        self.writer.flush()
    }

    /// Diagnostics raised while writing
    pub fn into_notifications(self) -> NotificationCollection {
        self.notifications
    }

    fn next_handle(&mut self) -> Handle {
        self.next_table_handle += 1;
        Handle::new(self.next_table_handle)
    }

    // ------------------------------------------------------------------
    // Lookups used by the entity encoders
    // ------------------------------------------------------------------

    pub(super) fn text_style_handle_of(&self, name: &str) -> Handle {
        self.text_styles.get(name)
    }

    pub(super) fn block_handle_of(&self, name: &str) -> Handle {
        self.blocks.get(name)
    }

    pub(super) fn line_type_handle_of(&self, name: &str) -> Handle {
        self.line_types.get(name)
    }

    pub(super) fn mleader_style_handle_of(&self, name: &str) -> Handle {
        self.mleader_styles.get(name)
    }

    pub(super) fn table_style_handle_of(&self, name: &str) -> Handle {
        self.table_styles.get(name)
    }

    /// Record a multileader in its style's reactor list
    pub(super) fn register_mleader_user(&mut self, style: &str, handle: Handle) {
        if !style.is_empty() {
            self.mleader_users.entry(style.to_uppercase()).or_default().push(handle);
        }
    }

    /// Record a table in its style's reactor list
    pub(super) fn register_table_user(&mut self, style: &str, handle: Handle) {
        if !style.is_empty() {
            self.table_users.entry(style.to_uppercase()).or_default().push(handle);
        }
    }

    fn users(map: &AHashMap<String, Vec<Handle>>, style: &str) -> Vec<Handle> {
        map.get(&style.to_uppercase()).cloned().unwrap_or_default()
    }

    /// Write an extended data record: `1001` application name, then values
    pub(super) fn write_xdata(&mut self, record: &ExtendedDataRecord) -> Result<()> {
        self.writer.write_string(1001, &record.application_name)?;
        for value in &record.values {
            let code = value.code();
            match value {
                XDataValue::String(s) | XDataValue::ControlString(s) => self.writer.write_string(code, s)?,
                XDataValue::Handle(h) => self.writer.write_handle(code, *h)?,
                XDataValue::Real(v) => self.writer.write_double(code, *v)?,
                XDataValue::Integer16(v) => self.writer.write_i16(code, *v)?,
                XDataValue::Integer32(v) => self.writer.write_i32(code, *v)?,
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // HEADER
    // ------------------------------------------------------------------

    /// Write the HEADER section
    pub fn write_header(&mut self) -> Result<()> {
        tracing::debug!("writing HEADER");
        let linetype_scale = self.document.linetype_scale;
        self.writer.write_section_start("HEADER")?;

        // AutoCAD 2010; the stream is UTF-8
        self.write_header_variable("$ACADVER", |w| w.write_string(1, "AC1024"))?;
        self.write_header_variable("$DWGCODEPAGE", |w| w.write_string(3, "ANSI_936"))?;
        self.write_header_variable("$DIMASSOC", |w| w.write_i16(280, 1))?;
        self.write_header_variable("$LTSCALE", |w| w.write_double(40, linetype_scale))?;
        self.write_header_variable("$PSLTSCALE", |w| w.write_i16(70, 0))?;
        // Metric
        self.write_header_variable("$MEASUREMENT", |w| w.write_i16(70, 1))?;
        self.write_header_variable("$HANDSEED", |w| w.write_handle(5, Handle::new(0xFFFFF)))?;

        self.writer.write_section_end()
    }

    /// Write a header variable
    fn write_header_variable<F>(&mut self, name: &str, write_value: F) -> Result<()>
    where
        F: FnOnce(&mut W) -> Result<()>,
    {
        self.writer.write_string(9, name)?;
        write_value(&mut *self.writer)
    }

    // ------------------------------------------------------------------
    // TABLES
    // ------------------------------------------------------------------

    /// Write the TABLES section
    pub fn write_tables(&mut self) -> Result<()> {
        tracing::debug!("writing TABLES");
        self.writer.write_section_start("TABLES")?;

        self.write_vport_table()?;
        self.write_ltype_table()?;
        self.write_layer_table()?;
        self.write_style_table()?;

        self.write_table_header("VIEW", fixed::VIEW_TABLE, 0)?;
        self.write_table_end()?;
        self.write_table_header("UCS", fixed::UCS_TABLE, 0)?;
        self.write_table_end()?;

        self.write_appid_table()?;
        self.write_block_record_table()?;
        self.write_dimstyle_table()?;

        self.writer.write_section_end()
    }

    fn write_table_header(&mut self, name: &str, handle: u64, entries: usize) -> Result<()> {
        self.writer.write_string(0, "TABLE")?;
        self.writer.write_string(2, name)?;
        self.writer.write_handle(5, Handle::new(handle))?;
        self.writer.write_handle(330, Handle::NULL)?;
        self.writer.write_subclass("AcDbSymbolTable")?;
        self.writer.write_i32(70, count(entries))
    }

    fn write_table_end(&mut self) -> Result<()> {
        self.writer.write_string(0, "ENDTAB")
    }

    /// `0 kind`, handle (105 for dimension styles), owner table, record marker
    fn write_table_entry_head(&mut self, kind: &str, handle: Handle, table: u64) -> Result<()> {
        self.writer.write_entity_type(kind)?;
        let code = if kind == "DIMSTYLE" { 105 } else { 5 };
        self.writer.write_handle(code, handle)?;
        self.writer.write_handle(330, Handle::new(table))?;
        self.writer.write_subclass("AcDbSymbolTableRecord")
    }

    /// Single `*Active` viewport centered on the requested view
    fn write_vport_table(&mut self) -> Result<()> {
        self.write_table_header("VPORT", fixed::VPORT_TABLE, 1)?;
        let handle = self.next_handle();
        self.write_table_entry_head("VPORT", handle, fixed::VPORT_TABLE)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbViewportTableRecord")?;
        w.write_string(2, "*Active")?;
        w.write_i16(70, 0)?;
        w.write_point2d(10, Vector2::ZERO)?;
        w.write_point2d(11, Vector2::new(1.0, 1.0))?;
        w.write_point2d(12, self.options.view_center)?;
        w.write_point2d(13, Vector2::ZERO)?;
        w.write_point2d(14, Vector2::new(10.0, 10.0))?;
        w.write_point2d(15, Vector2::new(10.0, 10.0))?;
        w.write_point2d(16, Vector2::ZERO)?;
        w.write_double(36, 1.0)?;
        w.write_point2d(17, Vector2::ZERO)?;
        w.write_double(37, 0.0)?;
        w.write_double(40, self.options.view_height)?;
        w.write_double(41, 1.928)?;
        w.write_double(42, 50.0)?;
        w.write_double(43, 0.0)?;
        w.write_double(44, 0.0)?;
        w.write_double(50, 0.0)?;
        w.write_double(51, 0.0)?;
        w.write_i16(71, 0)?;
        w.write_i16(72, 100)?;
        w.write_i16(73, 1)?;
        w.write_i16(74, 3)?;
        // Snap off
        w.write_i16(75, 0)?;
        w.write_i16(76, 1)?;
        w.write_i16(77, 0)?;
        w.write_i16(78, 0)?;
        w.write_i16(281, 0)?;
        w.write_i16(65, 1)?;
        write_ucs_axes(w)?;
        w.write_i16(79, 0)?;
        w.write_double(146, 0.0)?;
        self.write_table_end()
    }

    fn write_ltype_table(&mut self) -> Result<()> {
        let doc = self.document;
        self.write_table_header("LTYPE", fixed::LTYPE_TABLE, 3 + doc.line_types.len())?;
        self.write_ltype_entry("ByBlock", "", &[], Handle::new(fixed::LTYPE_BYBLOCK))?;
        self.write_ltype_entry("ByLayer", "", &[], Handle::new(fixed::LTYPE_BYLAYER))?;
        self.write_ltype_entry("Continuous", "Solid line", &[], Handle::new(fixed::LTYPE_CONTINUOUS))?;

        for line_type in doc.line_types.iter() {
            let handle = self.next_handle();
            let catalog = self.options.line_types.as_ref();
            match catalog.and_then(|c| c.find(&line_type.name)) {
                Some(descriptor) => {
                    let lengths: Vec<f64> = descriptor.segments.iter().map(|s| s.length).collect();
                    self.write_ltype_entry(&line_type.name, &descriptor.description, &lengths, handle)?;
                }
                None => {
                    let lengths: Vec<f64> = line_type.elements.iter().map(|e| e.length).collect();
                    self.write_ltype_entry(&line_type.name, &line_type.description, &lengths, handle)?;
                }
            }
        }
        self.write_table_end()
    }

    fn write_ltype_entry(&mut self, name: &str, description: &str, lengths: &[f64], handle: Handle) -> Result<()> {
        self.line_types.insert(name, handle);
        self.write_table_entry_head("LTYPE", handle, fixed::LTYPE_TABLE)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbLinetypeTableRecord")?;
        w.write_string(2, name)?;
        w.write_i16(70, 0)?;
        w.write_string(3, description)?;
        w.write_i16(72, 65)?;
        w.write_i32(73, count(lengths.len()))?;
        w.write_double(40, lengths.iter().map(|l| l.abs()).sum())?;
        for length in lengths {
            w.write_double(49, *length)?;
            w.write_i16(74, 0)?;
        }
        Ok(())
    }

    fn write_layer_table(&mut self) -> Result<()> {
        let doc = self.document;
        self.write_table_header("LAYER", fixed::LAYER_TABLE, doc.layers.len())?;
        for layer in doc.layers.iter() {
            let handle = self.next_handle();
            self.write_layer_entry(layer, handle)?;
        }
        self.write_table_end()
    }

    fn write_layer_entry(&mut self, layer: &Layer, handle: Handle) -> Result<()> {
        self.write_table_entry_head("LAYER", handle, fixed::LAYER_TABLE)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbLayerTableRecord")?;
        w.write_string(2, &layer.name)?;
        w.write_i16(70, layer.flags.bits())?;

        let index = match layer.color.dxf_index() {
            0 | 256 => 7,
            index => index,
        };
        w.write_i16(62, if layer.is_off { -index } else { index })?;
        if let Some(true_color) = layer.color.true_color() {
            w.write_i32(420, true_color)?;
        }
        let line_type = if layer.line_type.is_empty() { "CONTINUOUS" } else { layer.line_type.as_str() };
        w.write_string(6, line_type)?;
        if !layer.is_plottable {
            w.write_i16(290, 0)?;
        }
        if layer.line_weight != crate::types::LineWeight::ByLayer {
            w.write_i16(370, layer.line_weight.value())?;
        }
        w.write_handle(390, Handle::new(fixed::PLOT_STYLE_PLACEHOLDER))
    }

    fn write_style_table(&mut self) -> Result<()> {
        let doc = self.document;
        self.write_table_header("STYLE", fixed::STYLE_TABLE, doc.text_styles.len())?;
        for style in doc.text_styles.iter() {
            let handle = self.next_handle();
            self.write_style_entry(style, handle)?;
        }
        self.write_table_end()
    }

    fn write_style_entry(&mut self, style: &TextStyle, handle: Handle) -> Result<()> {
        self.text_styles.insert(&style.name, handle);
        self.write_table_entry_head("STYLE", handle, fixed::STYLE_TABLE)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbTextStyleTableRecord")?;
        w.write_string(2, &style.name)?;
        w.write_i16(70, 0)?;
        w.write_double(40, style.height)?;
        w.write_double(41, style.width_factor)?;
        w.write_double(50, style.oblique_angle)?;
        w.write_i16(71, 0)?;
        w.write_double(42, 2.5)?;
        if style.is_true_type() {
            w.write_string(3, "")?;
            w.write_string(4, "")?;
            w.write_string(1001, "ACAD")?;
            w.write_string(1000, &style.true_type_font)?;
            w.write_i32(1071, 257)
        } else {
            w.write_string(3, &style.font_file)?;
            w.write_string(4, &style.big_font_file)
        }
    }

    fn write_appid_table(&mut self) -> Result<()> {
        self.write_table_header("APPID", fixed::APPID_TABLE, 2)?;
        self.write_appid_entry("ACAD", Handle::new(fixed::ACAD_APPID))?;
        let handle = self.next_handle();
        self.write_appid_entry("ACADLL", handle)?;
        self.write_table_end()
    }

    fn write_appid_entry(&mut self, name: &str, handle: Handle) -> Result<()> {
        self.write_table_entry_head("APPID", handle, fixed::APPID_TABLE)?;
        self.writer.write_subclass("AcDbRegAppTableRecord")?;
        self.writer.write_string(2, name)?;
        self.writer.write_i16(70, 0)
    }

    fn write_block_record_table(&mut self) -> Result<()> {
        let doc = self.document;
        let predefined = self.predefined;
        let entries = 1 + doc.layouts.len() + doc.blocks.len() + predefined.len();
        self.write_table_header("BLOCK_RECORD", fixed::BLOCK_RECORD_TABLE, entries)?;

        self.write_block_record_entry(
            MODEL_SPACE,
            Handle::new(fixed::MODEL_SPACE_RECORD),
            Handle::new(fixed::MODEL_LAYOUT),
        )?;
        for layout in doc.layouts.values() {
            let record = self.next_handle();
            let layout_handle = self.next_handle();
            self.write_block_record_entry(&layout.block_name, record, layout_handle)?;
        }
        for block in doc.blocks.iter() {
            let record = self.next_handle();
            self.write_block_record_entry(&block.name, record, Handle::NULL)?;
        }
        for block in predefined {
            let record = self.next_handle();
            self.write_block_record_entry(block.name, record, Handle::NULL)?;
        }
        self.write_table_end()
    }

    fn write_block_record_entry(&mut self, name: &str, handle: Handle, layout: Handle) -> Result<()> {
        if layout.is_valid() {
            self.layouts.insert(name, layout);
        }
        self.blocks.insert(name, handle);
        self.write_table_entry_head("BLOCK_RECORD", handle, fixed::BLOCK_RECORD_TABLE)?;
        self.writer.write_subclass("AcDbBlockTableRecord")?;
        self.writer.write_string(2, name)?;
        self.writer.write_handle(340, layout)
    }

    fn write_dimstyle_table(&mut self) -> Result<()> {
        let doc = self.document;
        let handles: Vec<Handle> = doc.dim_styles.iter().map(|_| self.next_handle()).collect();
        let current = doc
            .dim_styles
            .iter()
            .zip(&handles)
            .find(|(style, _)| style.name.eq_ignore_ascii_case("ISO-25"))
            .map(|(_, h)| *h)
            .unwrap_or(Handle::NULL);

        self.write_table_header("DIMSTYLE", fixed::DIMSTYLE_TABLE, doc.dim_styles.len())?;
        self.writer.write_subclass("AcDbDimStyleTable")?;
        self.writer.write_i16(71, 0)?;
        self.writer.write_handle(340, current)?;
        for (style, handle) in doc.dim_styles.iter().zip(handles) {
            self.write_dimstyle_entry(style, handle)?;
        }
        self.write_table_end()
    }

    fn write_dimstyle_entry(&mut self, style: &DimStyle, handle: Handle) -> Result<()> {
        self.dim_styles.insert(&style.name, handle);
        let text_style = self.text_styles.get(&style.text_style);
        let arrow1 = self.blocks.get(&style.arrow_head1_block_name());
        let arrow2 = self.blocks.get(&style.arrow_head2_block_name());

        self.write_table_entry_head("DIMSTYLE", handle, fixed::DIMSTYLE_TABLE)?;
        let w = &mut *self.writer;
        w.write_subclass("AcDbDimStyleTableRecord")?;
        w.write_string(2, &style.name)?;
        w.write_i16(70, 0)?;
        if !style.text.is_empty() {
            w.write_string(3, &style.text)?;
            w.write_string(4, &style.text)?;
        }
        w.write_double(41, style.arrow_head_size)?;
        w.write_double(42, style.extension_line_offset)?;
        // Baseline spacing
        w.write_double(43, 3.75)?;
        w.write_double(44, style.extension_line_extend)?;
        w.write_double(140, style.text_height)?;
        w.write_double(141, style.signed_center_mark_size())?;
        if style.linear_scale_factor != 1.0 {
            w.write_double(144, style.linear_scale_factor)?;
        }
        if style.vertical_text_position == VerticalTextPosition::Above {
            w.write_i16(77, 1)?;
        } else {
            w.write_i16(145, style.vertical_text_position as i16)?;
        }
        w.write_double(147, style.text_gap)?;
        w.write_bool(73, style.text_align)?;
        w.write_bool(74, style.text_align)?;
        w.write_bool(75, style.ext_line1_suppress)?;
        w.write_bool(76, style.ext_line2_suppress)?;
        let linear_zeros = (i16::from(style.suppress_leading_zeros) << 2) | (i16::from(style.suppress_trailing_zeros) << 3);
        w.write_i16(78, linear_zeros)?;
        let angular_zeros =
            i16::from(style.angle_suppress_leading_zeros) | (i16::from(style.angle_suppress_trailing_zeros) << 1);
        w.write_i16(79, angular_zeros)?;
        w.write_i16(171, style.units_precision)?;
        w.write_bool(172, style.force_line_inside)?;
        // Separate arrow blocks
        w.write_i16(173, 1)?;
        w.write_bool(174, style.text_inside)?;
        w.write_i16(176, style.dimension_line_color.dxf_index())?;
        w.write_i16(177, style.extension_line_color.dxf_index())?;
        w.write_i16(178, style.text_color.dxf_index())?;
        w.write_i16(179, style.angle_precision)?;
        w.write_i16(271, style.units_precision)?;
        w.write_i16(273, style.units_format as i16)?;
        w.write_i16(275, style.angle_format)?;
        w.write_i16(277, style.units_format as i16)?;
        w.write_i16(278, i16::from(b'.'))?;
        w.write_i16(279, style.text_movement as i16)?;
        w.write_i16(280, style.horizontal_text_position as i16)?;
        w.write_bool(281, style.dim_line1_suppress)?;
        w.write_bool(282, style.dim_line2_suppress)?;
        w.write_i16(289, style.fit as i16)?;
        w.write_handle(340, text_style)?;
        w.write_handle(343, arrow1)?;
        w.write_handle(344, arrow2)?;
        w.write_i16(371, style.dimension_line_weight.value())?;
        w.write_i16(372, style.extension_line_weight.value())
    }

    // ------------------------------------------------------------------
    // BLOCKS
    // ------------------------------------------------------------------

    /// Write the BLOCKS section
    pub fn write_blocks(&mut self) -> Result<()> {
        tracing::debug!("writing BLOCKS");
        let doc = self.document;
        let predefined = self.predefined;
        self.writer.write_section_start("BLOCKS")?;

        self.write_block_begin(MODEL_SPACE, Vector2::ZERO, Handle::new(fixed::MODEL_SPACE_BLOCK))?;
        self.write_block_end(MODEL_SPACE, Handle::new(fixed::MODEL_SPACE_BLOCK_END))?;

        for layout in doc.layouts.values() {
            let begin = self.next_handle();
            self.write_block_begin(&layout.block_name, Vector2::ZERO, begin)?;
            // The first layout's entities go to ENTITIES
            if !layout.block_name.eq_ignore_ascii_case(crate::document::DEFAULT_PAPER_SPACE) {
                self.write_layout_entities(layout)?;
            }
            let end = self.next_handle();
            self.write_block_end(&layout.block_name, end)?;
        }

        for block in doc.blocks.iter() {
            let begin = self.next_handle();
            self.write_block_begin(&block.name, block.base_point, begin)?;
            let owner = self.blocks.get(&block.name);
            self.write_entity_list(&block.entities, owner, false)?;
            let end = self.next_handle();
            self.write_block_end(&block.name, end)?;
        }

        for block in predefined {
            let begin = self.next_handle();
            self.write_block_begin(block.name, Vector2::ZERO, begin)?;
            self.owner = self.blocks.get(block.name);
            self.paper_space = false;
            for entity in &block.entities {
                self.write_entity(entity)?;
            }
            let end = self.next_handle();
            self.write_block_end(block.name, end)?;
        }

        self.writer.write_section_end()
    }

    fn write_block_begin(&mut self, name: &str, base_point: Vector2, handle: Handle) -> Result<()> {
        let owner = self.blocks.get(name);
        let w = &mut *self.writer;
        w.write_entity_type("BLOCK")?;
        w.write_handle(5, handle)?;
        w.write_handle(330, owner)?;
        w.write_subclass("AcDbEntity")?;
        if is_paper_space_name(name) {
            w.write_i16(67, 1)?;
        }
        w.write_string(8, "0")?;
        w.write_subclass("AcDbBlockBegin")?;
        w.write_string(2, name)?;
        w.write_i16(70, 0)?;
        w.write_point2d(10, base_point)?;
        w.write_string(3, name)?;
        w.write_string(1, "")
    }

    fn write_block_end(&mut self, name: &str, handle: Handle) -> Result<()> {
        let owner = self.blocks.get(name);
        let w = &mut *self.writer;
        w.write_entity_type("ENDBLK")?;
        w.write_handle(5, handle)?;
        w.write_handle(330, owner)?;
        w.write_subclass("AcDbEntity")?;
        if is_paper_space_name(name) {
            w.write_i16(67, 1)?;
        }
        w.write_string(8, "0")?;
        w.write_subclass("AcDbBlockEnd")
    }

    fn write_entity_list(&mut self, entities: &EntityList, owner: Handle, paper_space: bool) -> Result<()> {
        self.owner = owner;
        self.paper_space = paper_space;
        for entity in entities.iter() {
            self.write_entity(entity)?;
        }
        Ok(())
    }

    fn write_layout_entities(&mut self, layout: &Layout) -> Result<()> {
        self.viewport_id = 0;
        let owner = self.blocks.get(&layout.block_name);
        self.write_entity_list(&layout.entities, owner, true)
    }

    // ------------------------------------------------------------------
    // ENTITIES
    // ------------------------------------------------------------------

    /// Write the ENTITIES section: model space, then the default layout
    pub fn write_entities(&mut self) -> Result<()> {
        tracing::debug!(count = self.document.model_space.len(), "writing ENTITIES");
        let doc = self.document;
        self.writer.write_section_start("ENTITIES")?;

        self.write_entity_list(&doc.model_space, Handle::new(fixed::MODEL_SPACE_RECORD), false)?;
        for layout in doc.layouts.values() {
            if layout.block_name.eq_ignore_ascii_case(crate::document::DEFAULT_PAPER_SPACE) {
                self.write_layout_entities(layout)?;
            }
        }

        self.writer.write_section_end()
    }

    // ------------------------------------------------------------------
    // OBJECTS
    // ------------------------------------------------------------------

    /// Write the OBJECTS section: dictionaries, layouts, then style records
    pub fn write_objects(&mut self) -> Result<()> {
        tracing::debug!("writing OBJECTS");
        let doc = self.document;
        self.writer.write_section_start("OBJECTS")?;

        self.write_dictionaries()?;

        let mut model = Layout::new("Model");
        model.block_name = MODEL_SPACE.to_string();
        self.write_layout(&model)?;
        for layout in doc.layouts.values() {
            self.write_layout(layout)?;
        }

        for style in doc.multileader_styles.values() {
            self.write_mleader_style(style)?;
        }
        for style in doc.table_styles.values() {
            self.write_table_style(style)?;
        }

        self.writer.write_section_end()
    }

    fn write_dictionary(&mut self, handle: u64, parent: u64) -> Result<()> {
        let w = &mut *self.writer;
        w.write_entity_type("DICTIONARY")?;
        w.write_handle(5, Handle::new(handle))?;
        if parent != 0 {
            w.write_reactors(&[Handle::new(parent)])?;
        }
        w.write_handle(330, Handle::new(parent))?;
        w.write_subclass("AcDbDictionary")?;
        w.write_i16(281, 1)
    }

    fn write_dictionary_entry(&mut self, name: &str, handle: Handle) -> Result<()> {
        self.writer.write_string(3, name)?;
        self.writer.write_handle(350, handle)
    }

    fn write_dictionaries(&mut self) -> Result<()> {
        let doc = self.document;
        let root = fixed::ROOT_DICTIONARY;

        self.write_dictionary(root, 0)?;
        for (name, handle) in [
            ("ACAD_COLOR", fixed::COLOR_DICTIONARY),
            ("ACAD_GROUP", fixed::GROUP_DICTIONARY),
            ("ACAD_LAYOUT", fixed::LAYOUT_DICTIONARY),
            ("ACAD_MATERIAL", fixed::MATERIAL_DICTIONARY),
            ("ACAD_MLEADERSTYLE", fixed::MLEADER_STYLE_DICTIONARY),
            ("ACAD_MLINESTYLE", fixed::MLINE_STYLE_DICTIONARY),
            ("ACAD_PLOTSETTINGS", fixed::PLOT_SETTINGS_DICTIONARY),
            ("ACAD_PLOTSTYLENAME", fixed::PLOT_STYLE_DICTIONARY),
            ("ACAD_SCALELIST", fixed::SCALE_LIST_DICTIONARY),
            ("ACAD_TABLESTYLE", fixed::TABLE_STYLE_DICTIONARY),
            ("ACAD_VISUALSTYLE", fixed::VISUAL_STYLE_DICTIONARY),
            ("AcDbVariableDictionary", fixed::VARIABLE_DICTIONARY),
        ] {
            self.write_dictionary_entry(name, Handle::new(handle))?;
        }

        self.write_dictionary(fixed::COLOR_DICTIONARY, root)?;
        self.write_dictionary(fixed::GROUP_DICTIONARY, root)?;

        self.write_dictionary(fixed::LAYOUT_DICTIONARY, root)?;
        let model = self.layouts.get(MODEL_SPACE);
        self.write_dictionary_entry("Model", model)?;
        for layout in doc.layouts.values() {
            let handle = self.layouts.get(&layout.block_name);
            self.write_dictionary_entry(&layout.name, handle)?;
        }

        self.write_dictionary(fixed::MATERIAL_DICTIONARY, root)?;

        self.write_dictionary(fixed::MLEADER_STYLE_DICTIONARY, root)?;
        for style in doc.multileader_styles.values() {
            self.write_dictionary_entry(&style.name, style.handle)?;
        }

        self.write_dictionary(fixed::MLINE_STYLE_DICTIONARY, root)?;
        self.write_dictionary(fixed::PLOT_SETTINGS_DICTIONARY, root)?;

        let w = &mut *self.writer;
        w.write_entity_type("ACDBDICTIONARYWDFLT")?;
        w.write_handle(5, Handle::new(fixed::PLOT_STYLE_DICTIONARY))?;
        w.write_subclass("AcDbDictionary")?;
        w.write_i16(281, 1)?;
        w.write_string(3, "Normal")?;
        w.write_handle(350, Handle::new(fixed::PLOT_STYLE_PLACEHOLDER))?;
        w.write_subclass("AcDbDictionaryWithDefault")?;
        w.write_handle(340, Handle::new(fixed::PLOT_STYLE_PLACEHOLDER))?;
        w.write_entity_type("ACDBPLACEHOLDER")?;
        w.write_handle(5, Handle::new(fixed::PLOT_STYLE_PLACEHOLDER))?;

        self.write_dictionary(fixed::SCALE_LIST_DICTIONARY, root)?;

        self.write_dictionary(fixed::TABLE_STYLE_DICTIONARY, root)?;
        for style in doc.table_styles.values() {
            self.write_dictionary_entry(&style.name, style.handle)?;
        }

        self.write_dictionary(fixed::VISUAL_STYLE_DICTIONARY, root)?;
        self.write_dictionary(fixed::VARIABLE_DICTIONARY, root)
    }

    fn write_layout(&mut self, layout: &Layout) -> Result<()> {
        let is_paper_space = !layout.block_name.eq_ignore_ascii_case(MODEL_SPACE);
        let handle = self.layouts.get(&layout.block_name);
        let record = self.blocks.get(&layout.block_name);
        let plot = &layout.plot_settings;
        let dictionary = Handle::new(fixed::LAYOUT_DICTIONARY);

        let w = &mut *self.writer;
        w.write_entity_type("LAYOUT")?;
        w.write_handle(5, handle)?;
        w.write_reactors(&[dictionary])?;
        w.write_handle(330, dictionary)?;

        w.write_subclass("AcDbPlotSettings")?;
        w.write_string(1, "")?;
        w.write_string(2, &plot.plot_config_file)?;
        w.write_string(4, &plot.paper_name)?;
        w.write_string(6, "")?;
        w.write_double(40, plot.margin.left)?;
        w.write_double(41, plot.margin.bottom)?;
        w.write_double(42, plot.margin.right)?;
        w.write_double(43, plot.margin.top)?;
        w.write_double(44, plot.paper_width)?;
        w.write_double(45, plot.paper_height)?;
        w.write_double(46, plot.plot_origin.x)?;
        w.write_double(47, plot.plot_origin.y)?;
        w.write_double(48, 0.0)?;
        w.write_double(49, 0.0)?;
        w.write_double(140, 0.0)?;
        w.write_double(141, 0.0)?;
        w.write_double(142, 1.0)?;
        w.write_double(143, 1.0)?;
        w.write_i16(70, if is_paper_space { 640 } else { 1712 })?;
        w.write_i16(72, 1)?;
        w.write_i16(73, plot.rotation.to_code())?;
        w.write_i16(74, if is_paper_space { 5 } else { 0 })?;
        w.write_string(7, "")?;
        w.write_i16(75, 0)?;
        w.write_bool(76, is_paper_space)?;
        w.write_i16(77, 2)?;
        w.write_i16(78, 300)?;
        w.write_double(147, 1.0)?;
        w.write_double(148, 0.0)?;
        w.write_double(149, 0.0)?;

        w.write_subclass("AcDbLayout")?;
        w.write_string(1, &layout.name)?;
        w.write_i16(70, 0)?;
        w.write_i32(71, layout.tab_order)?;
        w.write_point2d(10, layout.min_limits)?;
        w.write_point2d(11, layout.max_limits)?;
        w.write_point2d(12, Vector2::ZERO)?;
        w.write_point2d(14, layout.min_extents)?;
        w.write_point2d(15, layout.max_extents)?;
        w.write_double(146, 0.0)?;
        w.write_point2d(13, Vector2::ZERO)?;
        w.write_point2d(16, Vector2::UNIT_X)?;
        w.write_point2d(17, Vector2::UNIT_Y)?;
        w.write_i16(76, 0)?;
        w.write_handle(330, record)?;
        w.write_handle(331, Handle::NULL)
    }

    fn write_mleader_style(&mut self, style: &MultiLeaderStyle) -> Result<()> {
        let dictionary = Handle::new(fixed::MLEADER_STYLE_DICTIONARY);
        let mut reactors = vec![dictionary];
        reactors.extend(Self::users(&self.mleader_users, &style.name));
        let line_type = self.line_types.get(&style.line_type);
        let arrow = (!style.arrow_head.is_empty()).then(|| self.blocks.get(&style.arrow_head));
        let content_handle = match &style.content {
            MultiLeaderStyleContent::MText(text) => self.text_styles.get(&text.text_style),
            MultiLeaderStyleContent::Block(block) => self.blocks.get(&block.block_name),
        };

        let w = &mut *self.writer;
        w.write_entity_type("MLEADERSTYLE")?;
        w.write_handle(5, style.handle)?;
        w.write_reactors(&reactors)?;
        w.write_handle(330, dictionary)?;
        w.write_subclass("AcDbMLeaderStyle")?;

        w.write_i16(179, 2)?;
        w.write_i16(170, style.content.type_code())?;
        // Draw order: content first, leader head first
        w.write_i16(171, 1)?;
        w.write_i16(172, 0)?;
        w.write_i32(90, style.max_leader_points)?;
        w.write_double(40, style.first_segment_angle)?;
        w.write_double(41, style.second_segment_angle)?;
        w.write_i16(173, style.path_type as i16)?;
        w.write_i32(91, i32::from(style.line_color.dxf_index()))?;
        w.write_handle(340, line_type)?;
        w.write_i32(92, i32::from(style.line_weight.value()))?;
        w.write_bool(290, style.enable_landing)?;
        w.write_double(42, style.landing_gap)?;
        w.write_bool(291, style.enable_dogleg)?;
        w.write_double(43, style.dogleg_length)?;
        w.write_string(3, &style.name)?;
        if let Some(arrow) = arrow {
            w.write_handle(341, arrow)?;
        }
        w.write_double(44, style.arrow_size)?;
        w.write_string(300, "")?;

        match &style.content {
            MultiLeaderStyleContent::MText(text) => {
                w.write_handle(342, content_handle)?;
                w.write_i16(174, 1)?;
                w.write_i16(178, 1)?;
                w.write_i16(175, text.angle_type as i16)?;
                w.write_i16(176, 0)?;
                w.write_i32(93, i32::from(text.color.dxf_index()))?;
                w.write_double(45, text.height)?;
                w.write_i16(292, 0)?;
                w.write_i16(297, 0)?;
                w.write_double(46, text.align_space)?;
            }
            MultiLeaderStyleContent::Block(block) => {
                w.write_handle(343, content_handle)?;
                w.write_i32(94, i32::from(block.color.dxf_index()))?;
                w.write_double(47, block.scale.x)?;
                w.write_double(49, block.scale.y)?;
                w.write_double(140, 1.0)?;
                w.write_i16(293, 1)?;
                w.write_double(141, 0.0)?;
                w.write_i16(294, 1)?;
                w.write_i16(177, block.connection as i16)?;
                w.write_double(142, 1.0)?;
                w.write_i16(295, 1)?;
            }
        }

        w.write_i16(295, 0)?;
        w.write_bool(296, style.is_annotative)?;
        w.write_double(143, style.break_gap_size)?;
        // Horizontal attachment, centered top and bottom
        w.write_i16(271, 0)?;
        w.write_i16(272, 9)?;
        w.write_i16(273, 9)
    }

    fn write_table_style(&mut self, style: &TableStyle) -> Result<()> {
        let dictionary = Handle::new(fixed::TABLE_STYLE_DICTIONARY);
        let mut reactors = vec![dictionary];
        reactors.extend(Self::users(&self.table_users, &style.name));

        let w = &mut *self.writer;
        w.write_entity_type("TABLESTYLE")?;
        w.write_handle(5, style.handle)?;
        w.write_reactors(&reactors)?;
        w.write_handle(330, dictionary)?;
        w.write_subclass("AcDbTableStyle")?;
        w.write_i16(280, 0)?;
        w.write_string(3, &style.name)?;
        // Flow down, no flags
        w.write_i16(70, 0)?;
        w.write_i16(71, 0)?;
        w.write_double(40, style.horizontal_margin)?;
        w.write_double(41, style.vertical_margin)?;
        w.write_bool(280, style.no_title)?;
        w.write_bool(281, style.no_column_heading)?;
        w.write_string(7, &style.text_style)?;

        for cell in &style.cell_styles {
            w.write_double(140, cell.text_height)?;
            w.write_i16(170, cell.alignment as i16)?;
            w.write_i16(62, cell.text_color.dxf_index())?;
            w.write_i16(63, cell.background_color.dxf_index())?;
            w.write_bool(283, cell.background_enabled)?;
            w.write_i32(90, cell.data_type)?;
            w.write_i32(91, cell.unit_type)?;
            w.write_string(1, "")?;
            for i in 0..6 {
                let offset = i as i32;
                w.write_i16(274 + offset, cell.border_weights[i].value())?;
                w.write_bool(284 + offset, cell.border_visible[i])?;
                w.write_i16(64 + offset, cell.border_colors[i].dxf_index())?;
            }
        }
        Ok(())
    }
}

/// UCS origin and axes written by viewport records (110..132)
pub(super) fn write_ucs_axes<W: DxfStreamWriter>(w: &mut W) -> Result<()> {
    w.write_double(110, 0.0)?;
    w.write_double(120, 0.0)?;
    w.write_double(130, 0.0)?;
    w.write_double(111, 1.0)?;
    w.write_double(121, 0.0)?;
    w.write_double(131, 0.0)?;
    w.write_double(112, 0.0)?;
    w.write_double(122, 1.0)?;
    w.write_double(132, 0.0)
}

impl<W: DxfStreamWriter> OverrideHandles for SectionWriter<'_, W> {
    fn text_style_handle(&self, name: &str) -> Handle {
        self.text_styles.get(name)
    }

    fn block_handle(&self, name: &str) -> Handle {
        self.blocks.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::writer::DxfTextWriter;

    fn sections(document: &CadDocument, f: impl FnOnce(&mut SectionWriter<'_, DxfTextWriter<&mut Vec<u8>>>)) -> String {
        let options = WriteOptions::default();
        let mut buf = Vec::new();
        {
            let mut text = DxfTextWriter::new(&mut buf);
            let mut writer = SectionWriter::new(&mut text, document, &options, &[]);
            f(&mut writer);
        }
        String::from_utf8(buf).unwrap()
    }

    fn prepared() -> CadDocument {
        let mut doc = CadDocument::new();
        doc.prepare_before_write();
        doc
    }

    #[test]
    fn test_header_variables() {
        let doc = prepared();
        let out = sections(&doc, |w| w.write_header().unwrap());
        assert!(out.starts_with("  0\nSECTION\n  2\nHEADER\n"));
        assert!(out.contains("$ACADVER\n  1\nAC1024\n"));
        assert!(out.contains("$LTSCALE\n 40\n1.0\n"));
        assert!(out.contains("$HANDSEED\n  5\nFFFFF\n"));
        assert!(out.ends_with("  0\nENDSEC\n"));
    }

    #[test]
    fn test_table_handles_start_after_base() {
        let doc = prepared();
        let out = sections(&doc, |w| w.write_tables().unwrap());
        // The *Active viewport takes the first table handle
        assert!(out.contains("  0\nVPORT\n  5\n300\n330\n8\n"));
        assert!(out.contains("  2\nContinuous\n"));
        assert!(out.contains("  0\nDIMSTYLE\n105\n"));
        assert!(out.contains("  2\n*Model_Space\n340\n22\n"));
    }

    #[test]
    fn test_layer_color_and_off_state() {
        let mut doc = prepared();
        let mut layer = Layer::with_color("Hidden", crate::types::Color::RED);
        layer.is_off = true;
        doc.set_layer(layer);
        let out = sections(&doc, |w| w.write_tables().unwrap());
        assert!(out.contains("  2\nHidden\n 70\n0\n 62\n-1\n"));
    }

    #[test]
    fn test_name_lookups_are_case_insensitive() {
        let doc = prepared();
        let out_handle = {
            let options = WriteOptions::default();
            let mut buf = Vec::new();
            let mut text = DxfTextWriter::new(&mut buf);
            let mut writer = SectionWriter::new(&mut text, &doc, &options, &[]);
            writer.write_tables().unwrap();
            (writer.text_style_handle("standard"), writer.block_handle("*MODEL_SPACE"))
        };
        assert!(out_handle.0.is_valid());
        assert_eq!(out_handle.1, Handle::new(fixed::MODEL_SPACE_RECORD));
    }

    #[test]
    fn test_objects_list_layouts_and_styles() {
        let doc = prepared();
        let out = sections(&doc, |w| {
            w.write_tables().unwrap();
            w.write_objects().unwrap();
        });
        assert!(out.contains("  3\nModel\n350\n22\n"));
        assert!(out.contains("  1\nLayout1\n"));
        assert!(out.contains("MLEADERSTYLE"));
        assert!(out.contains("TABLESTYLE"));
    }

    #[test]
    fn test_xdata_record() {
        let doc = prepared();
        let out = sections(&doc, |w| {
            let record = crate::io::dxf::xdata::leader_arrow_size(2.5);
            w.write_xdata(&record).unwrap();
        });
        assert_eq!(out, "1001\nACAD\n1000\nDSTYLE\n1002\n{\n1070\n41\n1040\n2.5\n1002\n}\n");
    }
}
