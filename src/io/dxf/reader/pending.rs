//! Links recorded while decoding and installed once the whole stream is read
//!
//! A record may refer by handle to something declared later in the stream
//! (a hatch to its source entities, a viewport to its clip outline, any
//! entity to a style record from OBJECTS). Decoders only record the raw
//! handle here. [`PendingLinks::resolve`] runs once at the end of a load,
//! installs every link whose target exists and drops the others with a
//! warning.

use std::fmt;

use ahash::{AHashMap, AHashSet};

use crate::document::CadDocument;
use crate::entities::{CellContent, EntityType, MultiLeaderContent};
use crate::objects::MultiLeaderStyleContent;
use crate::types::Handle;

use super::super::xdata::{arrow_override, OverrideReference};

/// Kinds of named records whose handles are remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NameKind {
    TextStyle,
    LineType,
    Block,
    MultiLeaderStyle,
    TableStyle,
}

impl NameKind {
    fn label(self) -> &'static str {
        match self {
            NameKind::TextStyle => "text style",
            NameKind::LineType => "line type",
            NameKind::Block => "block",
            NameKind::MultiLeaderStyle => "multileader style",
            NameKind::TableStyle => "table style",
        }
    }
}

/// A link from an entity, keyed by the entity's own handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum EntityLink {
    Reactor(Handle),
    ClipEntity(Handle),
    Annotation(Handle),
    HatchAssociated { loop_index: usize, target: Handle },
    MultiLeaderAttribute { index: usize, target: Handle },
    CellAttribute { cell: usize, index: usize, target: Handle },
    MultiLeaderStyle(Handle),
    MultiLeaderLineType(Handle),
    MultiLeaderTextStyle(Handle),
    MultiLeaderBlock(Handle),
    TableStyle(Handle),
    CellBlock { cell: usize, target: Handle },
    DimensionOverride(OverrideReference),
}

impl EntityLink {
    fn role(&self) -> &'static str {
        match self {
            EntityLink::Reactor(_) => "reactor",
            EntityLink::ClipEntity(_) => "clip entity",
            EntityLink::Annotation(_) => "leader annotation",
            EntityLink::HatchAssociated { .. } => "hatch associated entity",
            EntityLink::MultiLeaderAttribute { .. } => "multileader attribute definition",
            EntityLink::CellAttribute { .. } => "cell attribute definition",
            EntityLink::MultiLeaderStyle(_) => "multileader style",
            EntityLink::MultiLeaderLineType(_) => "multileader line type",
            EntityLink::MultiLeaderTextStyle(_) => "multileader text style",
            EntityLink::MultiLeaderBlock(_) => "multileader block",
            EntityLink::TableStyle(_) => "table style",
            EntityLink::CellBlock { .. } => "cell block",
            EntityLink::DimensionOverride(_) => "dimension override",
        }
    }

    fn target(&self) -> Handle {
        match *self {
            EntityLink::Reactor(h)
            | EntityLink::ClipEntity(h)
            | EntityLink::Annotation(h)
            | EntityLink::MultiLeaderStyle(h)
            | EntityLink::MultiLeaderLineType(h)
            | EntityLink::MultiLeaderTextStyle(h)
            | EntityLink::MultiLeaderBlock(h)
            | EntityLink::TableStyle(h) => h,
            EntityLink::HatchAssociated { target, .. }
            | EntityLink::MultiLeaderAttribute { target, .. }
            | EntityLink::CellAttribute { target, .. }
            | EntityLink::CellBlock { target, .. } => target,
            EntityLink::DimensionOverride(reference) => match reference {
                OverrideReference::TextStyle(h)
                | OverrideReference::ArrowHead1(h)
                | OverrideReference::ArrowHead2(h) => h,
            },
        }
    }
}

/// A handle on a multileader style record, keyed by the style name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MultiLeaderStyleLink {
    LineType(Handle),
    ArrowHead(Handle),
    TextStyle(Handle),
    Block(Handle),
}

/// A link that could not be installed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Unresolved {
    pub owner: String,
    pub role: &'static str,
    pub target: Handle,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} not found, link dropped", self.owner, self.role, self.target)
    }
}

/// Everything recorded during the decode pass
#[derive(Debug, Default)]
pub(crate) struct PendingLinks {
    names: AHashMap<(NameKind, Handle), String>,
    entity_links: Vec<(Handle, EntityLink)>,
    dim_style_links: Vec<(String, OverrideReference)>,
    mleader_style_links: Vec<(String, MultiLeaderStyleLink)>,
}

impl PendingLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the name of the record declared with `handle`
    pub fn record_name(&mut self, kind: NameKind, handle: Handle, name: &str) {
        if handle.is_valid() {
            self.names.insert((kind, handle), name.to_string());
        }
    }

    pub fn name_of(&self, kind: NameKind, handle: Handle) -> Option<&str> {
        self.names.get(&(kind, handle)).map(String::as_str)
    }

    /// Record a link from entity `owner`; null targets are ignored
    pub fn link(&mut self, owner: Handle, link: EntityLink) {
        if link.target().is_valid() {
            self.entity_links.push((owner, link));
        }
    }

    pub fn link_dim_style(&mut self, style: &str, reference: OverrideReference) {
        let (OverrideReference::TextStyle(h) | OverrideReference::ArrowHead1(h) | OverrideReference::ArrowHead2(h)) =
            reference;
        if h.is_valid() {
            self.dim_style_links.push((style.to_string(), reference));
        }
    }

    pub fn link_mleader_style(&mut self, style: &str, link: MultiLeaderStyleLink) {
        let (MultiLeaderStyleLink::LineType(h)
        | MultiLeaderStyleLink::ArrowHead(h)
        | MultiLeaderStyleLink::TextStyle(h)
        | MultiLeaderStyleLink::Block(h)) = link;
        if h.is_valid() {
            self.mleader_style_links.push((style.to_string(), link));
        }
    }

    pub fn len(&self) -> usize {
        self.entity_links.len() + self.dim_style_links.len() + self.mleader_style_links.len()
    }

    /// Install every recorded link into `document`.
    ///
    /// Links whose target is missing are dropped; each one gives a
    /// `warn!` event and a warning in `document.notifications`. Returns the
    /// number of links dropped.
    pub fn resolve(self, document: &mut CadDocument) -> usize {
        let mut live: AHashSet<Handle> = AHashSet::new();
        for entity in document.entities() {
            live.insert(entity.handle());
            if let EntityType::Insert(insert) = entity {
                live.extend(insert.attributes.iter().map(|a| a.common.handle));
            }
        }

        let mut by_owner: AHashMap<Handle, Vec<EntityLink>> = AHashMap::new();
        for (owner, link) in &self.entity_links {
            by_owner.entry(*owner).or_default().push(*link);
        }

        let mut dropped = Vec::new();
        for entity in document.entities_mut() {
            let Some(links) = by_owner.remove(&entity.handle()) else {
                continue;
            };
            for link in links {
                if let Err(unresolved) = self.install(entity, link, &live) {
                    dropped.push(unresolved);
                }
            }
        }
        for (owner, links) in by_owner {
            tracing::debug!(owner = %owner, links = links.len(), "links of an entity that was not kept");
        }

        for (style, reference) in &self.dim_style_links {
            if let Err(unresolved) = self.install_dim_style(document, style, *reference) {
                dropped.push(unresolved);
            }
        }
        for (style, link) in &self.mleader_style_links {
            if let Err(unresolved) = self.install_mleader_style(document, style, *link) {
                dropped.push(unresolved);
            }
        }

        let count = dropped.len();
        for unresolved in dropped {
            tracing::warn!(owner = %unresolved.owner, target = %unresolved.target, role = unresolved.role, "unresolved link");
            document.notifications.warn(unresolved.to_string());
        }
        count
    }

    fn lookup(&self, kind: NameKind, target: Handle, owner: impl Fn() -> String) -> Result<String, Unresolved> {
        self.name_of(kind, target).map(str::to_string).ok_or_else(|| Unresolved {
            owner: owner(),
            role: kind.label(),
            target,
        })
    }

    fn install(&self, entity: &mut EntityType, link: EntityLink, live: &AHashSet<Handle>) -> Result<(), Unresolved> {
        let handle = entity.handle();
        let label = entity.type_name();
        let owner = || format!("{} {}", label, handle);
        let missing = || Unresolved {
            owner: owner(),
            role: link.role(),
            target: link.target(),
        };
        let require = |target: Handle| if live.contains(&target) { Ok(target) } else { Err(missing()) };

        match (link, entity) {
            (EntityLink::Reactor(target), entity) => {
                let target = require(target)?;
                entity.common_mut().reactors.push(target);
            }
            (EntityLink::ClipEntity(target), EntityType::Viewport(viewport)) => {
                viewport.clip_entity = Some(require(target)?);
            }
            (EntityLink::Annotation(target), EntityType::Leader(leader)) => {
                leader.annotation = Some(require(target)?);
            }
            (EntityLink::HatchAssociated { loop_index, target }, EntityType::Hatch(hatch)) => {
                let target = require(target)?;
                if let Some(boundary) = hatch.loops_mut().nth(loop_index) {
                    boundary.associated.push(target);
                }
            }
            (EntityLink::MultiLeaderAttribute { index, target }, EntityType::MultiLeader(leader)) => {
                let target = require(target)?;
                if let Some(slot) = leader.attribute_definitions.get_mut(index) {
                    *slot = target;
                }
            }
            (EntityLink::CellAttribute { cell, index, target }, EntityType::Table(table)) => {
                let target = require(target)?;
                if let Some(CellContent::Block(block)) = table.cells.get_mut(cell).map(|c| &mut c.content) {
                    if let Some(slot) = block.attribute_definitions.get_mut(index) {
                        *slot = target;
                    }
                }
            }
            (EntityLink::MultiLeaderStyle(target), EntityType::MultiLeader(leader)) => {
                leader.style_name = self.lookup(NameKind::MultiLeaderStyle, target, owner)?;
            }
            (EntityLink::MultiLeaderLineType(target), EntityType::MultiLeader(leader)) => {
                leader.leader_line_type = self.lookup(NameKind::LineType, target, owner)?;
            }
            (EntityLink::MultiLeaderTextStyle(target), EntityType::MultiLeader(leader)) => {
                let name = self.lookup(NameKind::TextStyle, target, owner)?;
                if let Some(MultiLeaderContent::MText(text)) = &mut leader.context.content {
                    text.style = name;
                }
            }
            (EntityLink::MultiLeaderBlock(target), EntityType::MultiLeader(leader)) => {
                let name = self.lookup(NameKind::Block, target, owner)?;
                if let Some(MultiLeaderContent::Block(block)) = &mut leader.context.content {
                    block.block_name = name;
                }
            }
            (EntityLink::TableStyle(target), EntityType::Table(table)) => {
                table.style_name = self.lookup(NameKind::TableStyle, target, owner)?;
            }
            (EntityLink::CellBlock { cell, target }, EntityType::Table(table)) => {
                let name = self.lookup(NameKind::Block, target, owner)?;
                if let Some(CellContent::Block(block)) = table.cells.get_mut(cell).map(|c| &mut c.content) {
                    block.block_name = name;
                }
            }
            (EntityLink::DimensionOverride(reference), EntityType::Dimension(dim)) => {
                let overrides = &mut dim.overrides;
                match reference {
                    OverrideReference::TextStyle(target) => {
                        overrides.text_style = Some(self.lookup(NameKind::TextStyle, target, owner)?);
                    }
                    OverrideReference::ArrowHead1(target) => {
                        let (kind, block) = arrow_override(&self.lookup(NameKind::Block, target, owner)?);
                        overrides.arrow_head1_type = Some(kind);
                        overrides.arrow_head1_block = block;
                    }
                    OverrideReference::ArrowHead2(target) => {
                        let (kind, block) = arrow_override(&self.lookup(NameKind::Block, target, owner)?);
                        overrides.arrow_head2_type = Some(kind);
                        overrides.arrow_head2_block = block;
                    }
                }
            }
            (link, entity) => {
                tracing::debug!(handle = %handle, entity = entity.type_name(), role = link.role(), "link does not apply");
            }
        }
        Ok(())
    }

    fn install_dim_style(
        &self,
        document: &mut CadDocument,
        style: &str,
        reference: OverrideReference,
    ) -> Result<(), Unresolved> {
        let owner = || format!("dimension style {}", style);
        let Some(record) = document.dim_styles.get_mut(style) else {
            return Ok(());
        };
        match reference {
            OverrideReference::TextStyle(target) => {
                record.text_style = self.lookup(NameKind::TextStyle, target, owner)?;
            }
            OverrideReference::ArrowHead1(target) => {
                let (kind, block) = arrow_override(&self.lookup(NameKind::Block, target, owner)?);
                record.arrow_head1_type = kind;
                record.arrow_head1_block = block.unwrap_or_default();
            }
            OverrideReference::ArrowHead2(target) => {
                let (kind, block) = arrow_override(&self.lookup(NameKind::Block, target, owner)?);
                record.arrow_head2_type = kind;
                record.arrow_head2_block = block.unwrap_or_default();
            }
        }
        Ok(())
    }

    fn install_mleader_style(
        &self,
        document: &mut CadDocument,
        style: &str,
        link: MultiLeaderStyleLink,
    ) -> Result<(), Unresolved> {
        let owner = || format!("multileader style {}", style);
        let Some(record) = document.multileader_styles.get_mut(style) else {
            return Ok(());
        };
        match link {
            MultiLeaderStyleLink::LineType(target) => {
                record.line_type = self.lookup(NameKind::LineType, target, owner)?;
            }
            MultiLeaderStyleLink::ArrowHead(target) => {
                record.arrow_head = self.lookup(NameKind::Block, target, owner)?;
            }
            MultiLeaderStyleLink::TextStyle(target) => {
                let name = self.lookup(NameKind::TextStyle, target, owner)?;
                if let MultiLeaderStyleContent::MText(text) = &mut record.content {
                    text.text_style = name;
                }
            }
            MultiLeaderStyleLink::Block(target) => {
                let name = self.lookup(NameKind::Block, target, owner)?;
                if let MultiLeaderStyleContent::Block(block) = &mut record.content {
                    block.block_name = name;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Hatch, MultiLeader, Viewport};
    use crate::notification::NotificationType;
    use crate::types::Vector2;

    fn with_handle(entity: impl Into<EntityType>, handle: u64) -> EntityType {
        let mut entity = entity.into();
        entity.common_mut().handle = Handle::new(handle);
        entity
    }

    #[test]
    fn test_forward_hatch_association_is_installed() {
        let mut doc = CadDocument::new();
        let mut hatch = Hatch::solid();
        hatch.add_boundary(Circle::from_center_radius(Vector2::ZERO, 1.0), None);
        doc.add_entity(with_handle(hatch, 0x100));
        doc.add_entity(with_handle(Circle::from_center_radius(Vector2::ZERO, 1.0), 0x101));

        let mut pending = PendingLinks::new();
        pending.link(Handle::new(0x100), EntityLink::HatchAssociated { loop_index: 0, target: Handle::new(0x101) });
        assert_eq!(pending.resolve(&mut doc), 0);

        let Some(EntityType::Hatch(hatch)) = doc.entity(Handle::new(0x100)) else {
            panic!("expected hatch");
        };
        assert_eq!(hatch.outer.associated, vec![Handle::new(0x101)]);
    }

    #[test]
    fn test_dangling_clip_is_dropped_with_warning() {
        let mut doc = CadDocument::new();
        doc.add_entity(with_handle(Viewport::new(), 0x200));
        let mut pending = PendingLinks::new();
        pending.link(Handle::new(0x200), EntityLink::ClipEntity(Handle::new(0xDEAD)));
        assert_eq!(pending.resolve(&mut doc), 1);

        let Some(EntityType::Viewport(viewport)) = doc.entity(Handle::new(0x200)) else {
            panic!("expected viewport");
        };
        assert_eq!(viewport.clip_entity, None);
        assert!(doc.notifications.has_type(NotificationType::Warning));
    }

    #[test]
    fn test_style_names_come_from_handles() {
        let mut doc = CadDocument::new();
        doc.add_entity(with_handle(MultiLeader::with_text("x", Vector2::ZERO, vec![Vector2::ZERO]), 0x300));
        let mut pending = PendingLinks::new();
        pending.record_name(NameKind::MultiLeaderStyle, Handle::new(0x40), "Annotative");
        pending.record_name(NameKind::TextStyle, Handle::new(0x41), "Notes");
        pending.link(Handle::new(0x300), EntityLink::MultiLeaderStyle(Handle::new(0x40)));
        pending.link(Handle::new(0x300), EntityLink::MultiLeaderTextStyle(Handle::new(0x41)));
        pending.resolve(&mut doc);

        let Some(EntityType::MultiLeader(leader)) = doc.entity(Handle::new(0x300)) else {
            panic!("expected multileader");
        };
        assert_eq!(leader.style_name, "Annotative");
        assert_eq!(leader.text_content().map(|t| t.style.as_str()), Some("Notes"));
    }

    #[test]
    fn test_null_targets_are_not_recorded() {
        let mut pending = PendingLinks::new();
        pending.link(Handle::new(1), EntityLink::Reactor(Handle::NULL));
        pending.link_dim_style("ISO-25", OverrideReference::TextStyle(Handle::NULL));
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_dim_style_arrow_block() {
        let mut doc = CadDocument::new();
        doc.set_dim_style(crate::tables::DimStyle::iso_25());
        let mut pending = PendingLinks::new();
        pending.record_name(NameKind::Block, Handle::new(0x50), "MYARROW");
        pending.link_dim_style("ISO-25", OverrideReference::ArrowHead1(Handle::new(0x50)));
        pending.resolve(&mut doc);
        let style = doc.dim_styles.get("ISO-25").unwrap();
        assert_eq!(style.arrow_head1_block, "MYARROW");
        assert_eq!(style.arrow_head1_type, crate::tables::ArrowHeadType::UserDefined);
    }
}
