//! CAD document structure

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::entities::{EntityList, EntityType};
use crate::error::{DxfError, Result};
use crate::notification::NotificationCollection;
use crate::objects::{Layout, MultiLeaderStyle, TableStyle};
use crate::tables::{BlockRecord, DimStyle, Layer, LineType, Table, TextStyle};
use crate::types::{Handle, HandleSeed, Vector2};

/// First handle handed out to entities; lower values are left to table
/// entries and the fixed dictionary handles.
pub(crate) const ENTITY_HANDLE_BASE: u64 = 10000;

/// Name of the layout block whose entities go to the ENTITIES section
pub const DEFAULT_PAPER_SPACE: &str = "*Paper_Space";

/// A CAD document: the entity graph plus its named styles, blocks and layouts
///
/// Entities are owned by exactly one container (model space, a block or a
/// layout). Cross references between entities are weak [`Handle`]s resolved
/// with [`CadDocument::entity`]; styles are referenced by name.
#[derive(Debug)]
pub struct CadDocument {
    /// Global line type scale ($LTSCALE)
    pub linetype_scale: f64,

    pub line_types: Table<LineType>,
    pub layers: Table<Layer>,
    pub text_styles: Table<TextStyle>,
    pub dim_styles: Table<DimStyle>,
    /// Multileader styles, keyed by name
    pub multileader_styles: IndexMap<String, MultiLeaderStyle>,
    /// Table styles, keyed by name
    pub table_styles: IndexMap<String, TableStyle>,

    /// Model space entities
    pub model_space: EntityList,
    /// Paper space layouts in tab order
    pub layouts: IndexMap<String, Layout>,
    /// Named block definitions
    pub blocks: Table<BlockRecord>,

    /// Diagnostics collected while reading
    pub notifications: NotificationCollection,

    handle_seed: HandleSeed,
}

impl CadDocument {
    /// Create an empty document
    pub fn new() -> Self {
        CadDocument {
            linetype_scale: 1.0,
            line_types: Table::new(),
            layers: Table::new(),
            text_styles: Table::new(),
            dim_styles: Table::new(),
            multileader_styles: IndexMap::new(),
            table_styles: IndexMap::new(),
            model_space: EntityList::new(),
            layouts: IndexMap::new(),
            blocks: Table::new(),
            notifications: NotificationCollection::new(),
            handle_seed: HandleSeed::starting_after(ENTITY_HANDLE_BASE),
        }
    }

    /// Drop every entity, style, block and layout
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Handle the next [`CadDocument::add_entity`] call will assign
    pub fn next_handle(&self) -> Handle {
        Handle::new(self.handle_seed.peek())
    }

    /// Keep fresh handles above `handle`
    pub(crate) fn observe_handle(&mut self, handle: Handle) {
        self.handle_seed.observe(handle);
    }

    fn claim_handle(&mut self, entity: &mut EntityType) -> Handle {
        let common = entity.common_mut();
        if common.handle.is_null() {
            common.handle = self.handle_seed.allocate();
        } else {
            self.handle_seed.observe(common.handle);
        }
        common.handle
    }

    /// Append an entity to model space, returning its handle
    pub fn add_entity(&mut self, entity: impl Into<EntityType>) -> Handle {
        let mut entity = entity.into();
        let handle = self.claim_handle(&mut entity);
        entity.common_mut().paperspace = false;
        self.model_space.push(entity);
        handle
    }

    /// Append an entity to a named block
    pub fn add_entity_to_block(&mut self, name: &str, entity: impl Into<EntityType>) -> Result<Handle> {
        let mut entity = entity.into();
        if !self.blocks.contains(name) {
            return Err(DxfError::ContainerNotFound(name.to_string()));
        }
        let handle = self.claim_handle(&mut entity);
        if let Some(block) = self.blocks.get_mut(name) {
            block.add_entity(entity);
        }
        Ok(handle)
    }

    /// Append an entity to a named layout
    pub fn add_entity_to_layout(&mut self, name: &str, entity: impl Into<EntityType>) -> Result<Handle> {
        let mut entity = entity.into();
        if !self.layouts.contains_key(name) {
            return Err(DxfError::ContainerNotFound(name.to_string()));
        }
        let handle = self.claim_handle(&mut entity);
        if let Some(layout) = self.layouts.get_mut(name) {
            layout.add_entity(entity);
        }
        Ok(handle)
    }

    /// Define a block, or move the base point of an existing one
    pub fn define_block(&mut self, name: &str, base_point: Vector2) -> &mut BlockRecord {
        let block = self
            .blocks
            .get_or_insert_with(name, || BlockRecord::new(name, base_point));
        block.base_point = base_point;
        block
    }

    pub fn block(&self, name: &str) -> Option<&BlockRecord> {
        self.blocks.get(name)
    }

    pub fn block_mut(&mut self, name: &str) -> Option<&mut BlockRecord> {
        self.blocks.get_mut(name)
    }

    /// Get or create a layout
    pub fn add_layout(&mut self, name: &str) -> &mut Layout {
        self.layouts
            .entry(name.to_string())
            .or_insert_with(|| Layout::new(name))
    }

    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn layout_mut(&mut self, name: &str) -> Option<&mut Layout> {
        self.layouts.get_mut(name)
    }

    // ------------------------------------------------------------------
    // Named styles
    // ------------------------------------------------------------------

    /// Define or replace a layer
    pub fn set_layer(&mut self, layer: Layer) {
        self.layers.set(layer);
    }

    /// Define or replace a line type
    pub fn set_line_type(&mut self, line_type: LineType) {
        self.line_types.set(line_type);
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.text_styles.set(style);
    }

    pub fn set_dim_style(&mut self, style: DimStyle) {
        self.dim_styles.set(style);
    }

    pub fn set_multileader_style(&mut self, style: MultiLeaderStyle) {
        self.multileader_styles.insert(style.name.clone(), style);
    }

    pub fn set_table_style(&mut self, style: TableStyle) {
        self.table_styles.insert(style.name.clone(), style);
    }

    // ------------------------------------------------------------------
    // Entity lookup
    // ------------------------------------------------------------------

    fn containers(&self) -> impl Iterator<Item = &EntityList> {
        std::iter::once(&self.model_space)
            .chain(self.blocks.iter().map(|b| &b.entities))
            .chain(self.layouts.values().map(|l| &l.entities))
    }

    fn containers_mut(&mut self) -> impl Iterator<Item = &mut EntityList> {
        std::iter::once(&mut self.model_space)
            .chain(self.blocks.iter_mut().map(|b| &mut b.entities))
            .chain(self.layouts.values_mut().map(|l| &mut l.entities))
    }

    /// Find an entity by handle in model space, the blocks, then the layouts
    pub fn entity(&self, handle: Handle) -> Option<&EntityType> {
        if handle.is_null() {
            return None;
        }
        self.containers().find_map(|list| list.find(handle))
    }

    pub fn entity_mut(&mut self, handle: Handle) -> Option<&mut EntityType> {
        if handle.is_null() {
            return None;
        }
        self.containers_mut().find_map(|list| list.find_mut(handle))
    }

    /// Detach an entity from its container.
    ///
    /// Weak references to it are left in place and read as absent.
    pub fn remove_entity(&mut self, handle: Handle) -> Option<EntityType> {
        if handle.is_null() {
            return None;
        }
        self.containers_mut().find_map(|list| list.remove(handle))
    }

    /// Every entity of every container
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.containers().flat_map(|list| list.iter())
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut EntityType> {
        self.containers_mut().flat_map(|list| list.iter_mut())
    }

    /// Give entities read without a handle one from the seed
    pub(crate) fn claim_missing_handles(&mut self) -> usize {
        let mut seed = self.handle_seed;
        let mut claimed = 0;
        for entity in self.entities_mut() {
            if entity.handle().is_null() {
                entity.common_mut().handle = seed.allocate();
                claimed += 1;
            }
        }
        self.handle_seed = seed;
        claimed
    }

    pub fn entity_count(&self) -> usize {
        self.containers().map(|list| list.len()).sum()
    }

    // ------------------------------------------------------------------
    // Viewports
    // ------------------------------------------------------------------

    /// See [`Layout::add_polygonal_viewport`]
    pub fn add_polygonal_viewport(
        &mut self,
        layout: &str,
        polygon_ps: Vec<Vector2>,
        center_ms: Vector2,
        height_ms: f64,
        twist_deg: f64,
    ) -> Result<Handle> {
        let Self { layouts, handle_seed, .. } = self;
        let layout = layouts
            .get_mut(layout)
            .ok_or_else(|| DxfError::ContainerNotFound(layout.to_string()))?;
        Ok(layout.add_polygonal_viewport(handle_seed, polygon_ps, center_ms, height_ms, twist_deg))
    }

    /// See [`Layout::add_polygonal_viewport_by_width`]
    pub fn add_polygonal_viewport_by_width(
        &mut self,
        layout: &str,
        polygon_ms: &[Vector2],
        center_ps: Vector2,
        width_ps: f64,
        twist_deg: f64,
    ) -> Result<Handle> {
        let Self { layouts, handle_seed, .. } = self;
        let layout = layouts
            .get_mut(layout)
            .ok_or_else(|| DxfError::ContainerNotFound(layout.to_string()))?;
        Ok(layout.add_polygonal_viewport_by_width(handle_seed, polygon_ms, center_ps, width_ps, twist_deg))
    }

    /// See [`Layout::add_polygonal_viewport_by_scale`]
    pub fn add_polygonal_viewport_by_scale(
        &mut self,
        layout: &str,
        polygon_ms: &[Vector2],
        center_ps: Vector2,
        scale: f64,
        twist_deg: f64,
    ) -> Result<Handle> {
        let Self { layouts, handle_seed, .. } = self;
        let layout = layouts
            .get_mut(layout)
            .ok_or_else(|| DxfError::ContainerNotFound(layout.to_string()))?;
        Ok(layout.add_polygonal_viewport_by_scale(handle_seed, polygon_ms, center_ps, scale, twist_deg))
    }

    // ------------------------------------------------------------------
    // Write preparation
    // ------------------------------------------------------------------

    /// Inject the styles and layout every written document must carry.
    ///
    /// Reserved line types are dropped (the writer emits its own), layer
    /// `0`, text style `Standard`, dimension style `ISO-25`, multileader
    /// styles `Standard`/`Annotative` and table style `Standard` are added
    /// when missing, and `Layout1` is created when there is no layout.
    /// Layout block names and tab orders are assigned here.
    pub fn prepare_before_write(&mut self) {
        let reserved: Vec<String> = self
            .line_types
            .names()
            .filter(|n| LineType::is_reserved_name(n))
            .map(str::to_string)
            .collect();
        for name in reserved {
            self.line_types.remove(&name);
        }

        self.layers.add_if_absent(Layer::layer_0());
        self.text_styles.add_if_absent(TextStyle::standard());
        self.dim_styles.add_if_absent(DimStyle::iso_25());
        self.multileader_styles
            .entry("Standard".to_string())
            .or_insert_with(MultiLeaderStyle::standard);
        self.multileader_styles
            .entry("Annotative".to_string())
            .or_insert_with(MultiLeaderStyle::annotative);
        self.table_styles
            .entry("Standard".to_string())
            .or_insert_with(TableStyle::standard);

        if self.layouts.is_empty() {
            self.add_layout("Layout1");
        }
        for (i, layout) in self.layouts.values_mut().enumerate() {
            layout.block_name = if i == 0 {
                DEFAULT_PAPER_SPACE.to_string()
            } else {
                format!("{}{}", DEFAULT_PAPER_SPACE, i - 1)
            };
            layout.tab_order = i as i32 + 1;
        }
    }

    /// Re-handle every entity in write order and rewrite weak references.
    ///
    /// Order: model space, block definitions, then layouts. Block references
    /// take one extra handle per attribute plus one for their SEQEND; heavy
    /// polylines one per vertex plus one for their SEQEND. References whose
    /// target is not in the document are dropped.
    pub(crate) fn reassign_handles(&mut self, seed: &mut HandleSeed) {
        let mut map: AHashMap<Handle, Handle> = AHashMap::new();
        for list in self.containers_mut() {
            for entity in list.iter_mut() {
                let old = entity.handle();
                let new = assign_entity_handles(entity, seed);
                if old.is_valid() {
                    map.insert(old, new);
                }
            }
        }
        for list in self.containers_mut() {
            for entity in list.iter_mut() {
                entity.remap_references(&mut |h| map.get(&h).copied());
            }
        }
        self.handle_seed = HandleSeed::starting_after(seed.last());
    }
}

/// Give `entity` and its sub-records fresh handles from `seed`
pub(crate) fn assign_entity_handles(entity: &mut EntityType, seed: &mut HandleSeed) -> Handle {
    let handle = seed.allocate();
    entity.common_mut().handle = handle;
    match entity {
        EntityType::Insert(insert) => {
            for attrib in insert.attributes.iter_mut() {
                attrib.common.handle = seed.allocate();
            }
            insert.seqend_handle = seed.allocate();
        }
        EntityType::Polyline(polyline) => {
            for vertex in polyline.vertices.iter_mut() {
                vertex.handle = seed.allocate();
            }
            polyline.seqend_handle = seed.allocate();
        }
        _ => {}
    }
    handle
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Hatch, Line, Viewport};

    #[test]
    fn test_new_document_is_empty() {
        let doc = CadDocument::new();
        assert_eq!(doc.entity_count(), 0);
        assert!(doc.layers.is_empty());
        assert_eq!(doc.linetype_scale, 1.0);
        assert_eq!(doc.next_handle(), Handle::new(10001));
    }

    #[test]
    fn test_add_entity_assigns_handles() {
        let mut doc = CadDocument::new();
        let a = doc.add_entity(Line::from_coords(0.0, 0.0, 1.0, 1.0));
        let b = doc.add_entity(Circle::from_center_radius(Vector2::ZERO, 5.0));
        assert_eq!(a, Handle::new(10001));
        assert_eq!(b, Handle::new(10002));
        assert!(matches!(doc.entity(b), Some(EntityType::Circle(_))));
    }

    #[test]
    fn test_add_entity_keeps_existing_handle() {
        let mut doc = CadDocument::new();
        let mut line = Line::from_coords(0.0, 0.0, 1.0, 1.0);
        line.common.handle = Handle::new(20000);
        assert_eq!(doc.add_entity(line), Handle::new(20000));
        assert_eq!(doc.next_handle(), Handle::new(20001));
    }

    #[test]
    fn test_add_to_missing_container_fails() {
        let mut doc = CadDocument::new();
        let line = Line::from_coords(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            doc.add_entity_to_block("NOPE", line.clone()),
            Err(DxfError::ContainerNotFound(_))
        ));
        assert!(doc.add_entity_to_layout("Layout9", line).is_err());
    }

    #[test]
    fn test_block_and_layout_entities_are_found() {
        let mut doc = CadDocument::new();
        doc.define_block("DOOR", Vector2::ZERO);
        doc.add_layout("Sheet");
        let b = doc.add_entity_to_block("door", Line::from_coords(0.0, 0.0, 1.0, 0.0)).unwrap();
        let l = doc.add_entity_to_layout("Sheet", Viewport::new()).unwrap();
        assert_eq!(doc.entity_count(), 2);
        assert!(doc.entity(b).is_some());
        assert!(doc.entity(l).unwrap().common().paperspace);
        assert_eq!(doc.entities().count(), 2);
    }

    #[test]
    fn test_remove_entity_leaves_weak_links_absent() {
        let mut doc = CadDocument::new();
        let circle = doc.add_entity(Circle::from_center_radius(Vector2::new(10.0, 10.0), 50.0));
        let mut hatch = Hatch::solid();
        hatch.add_associated_entity(circle, None);
        let hatch = doc.add_entity(hatch);

        assert!(doc.remove_entity(circle).is_some());
        match doc.entity(hatch) {
            Some(EntityType::Hatch(h)) => assert!(!h.has_associated_entity(&doc)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_prepare_before_write_injects_defaults() {
        let mut doc = CadDocument::new();
        doc.set_line_type(LineType::new("Continuous"));
        doc.set_line_type(LineType::new("DASHED"));
        doc.prepare_before_write();

        assert!(doc.layers.contains("0"));
        assert!(doc.text_styles.contains("Standard"));
        assert!(doc.dim_styles.contains("ISO-25"));
        assert!(doc.multileader_styles["Annotative"].is_annotative);
        assert!(doc.table_styles.contains_key("Standard"));
        assert!(!doc.line_types.contains("Continuous"));
        assert!(doc.line_types.contains("DASHED"));

        let layout = doc.layout("Layout1").unwrap();
        assert_eq!(layout.block_name, "*Paper_Space");
        assert_eq!(layout.tab_order, 1);
    }

    #[test]
    fn test_layout_block_names() {
        let mut doc = CadDocument::new();
        doc.add_layout("A");
        doc.add_layout("B");
        doc.add_layout("C");
        doc.prepare_before_write();
        let names: Vec<_> = doc.layouts.values().map(|l| l.block_name.as_str()).collect();
        assert_eq!(names, ["*Paper_Space", "*Paper_Space0", "*Paper_Space1"]);
        assert_eq!(doc.layout("C").unwrap().tab_order, 3);
    }

    #[test]
    fn test_reassign_handles_remaps_links() {
        let mut doc = CadDocument::new();
        doc.add_layout("Layout1");
        let outline = doc
            .add_polygonal_viewport(
                "Layout1",
                vec![Vector2::ZERO, Vector2::new(10.0, 0.0), Vector2::new(10.0, 10.0)],
                Vector2::ZERO,
                10.0,
                0.0,
            )
            .unwrap();
        let mut seed = HandleSeed::starting_after(ENTITY_HANDLE_BASE + 100);
        doc.reassign_handles(&mut seed);

        let layout = doc.layout("Layout1").unwrap();
        let poly = layout.entities.get(0).unwrap().handle();
        assert_eq!(poly, Handle::new(10101));
        assert!(doc.entity(outline).is_none());
        match layout.entities.get(1) {
            Some(EntityType::Viewport(vp)) => assert_eq!(vp.clip_entity, Some(poly)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut doc = CadDocument::new();
        doc.add_entity(Line::from_coords(0.0, 0.0, 1.0, 1.0));
        doc.set_layer(Layer::new("WALLS"));
        doc.reset();
        assert_eq!(doc.entity_count(), 0);
        assert!(doc.layers.is_empty());
    }
}
