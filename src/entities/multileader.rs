//! MultiLeader entity implementation.
//!
//! A MULTILEADER carries one annotation (multiline text or a block
//! reference) plus one or more leader lines that meet at a common landing
//! point. The geometry lives in a nested `CONTEXT_DATA` record on the wire.

use crate::entities::{AttachmentPoint, Entity, EntityCommon};
use crate::types::{Color, Handle, LineWeight, Vector2};

// ============================================================================
// Enums
// ============================================================================

/// Leader path type (line style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum MultiLeaderPathType {
    /// Leader is invisible.
    Invisible = 0,
    /// Straight line segments.
    #[default]
    Straight = 1,
    /// Spline curve.
    Spline = 2,
}

impl From<i16> for MultiLeaderPathType {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::Invisible,
            2 => Self::Spline,
            _ => Self::Straight,
        }
    }
}

// ============================================================================
// Content
// ============================================================================

/// Multiline text annotation
#[derive(Debug, Clone, PartialEq)]
pub struct MTextContent {
    pub text: String,
    pub width: f64,
    /// Text style name
    pub style: String,
    pub color: Color,
    pub location: Vector2,
    /// Rotation in radians
    pub rotation: f64,
    pub attachment: AttachmentPoint,
}

impl MTextContent {
    pub fn new(text: impl Into<String>, location: Vector2) -> Self {
        MTextContent {
            text: text.into(),
            width: 0.0,
            style: "Standard".to_string(),
            color: Color::ByBlock,
            location,
            rotation: 0.0,
            attachment: AttachmentPoint::TopLeft,
        }
    }
}

/// Block reference annotation
#[derive(Debug, Clone, PartialEq)]
pub struct BlockContent {
    pub block_name: String,
    pub color: Color,
    pub position: Vector2,
    pub scale: Vector2,
    /// Rotation in radians
    pub rotation: f64,
}

impl BlockContent {
    pub fn new(block_name: impl Into<String>, position: Vector2) -> Self {
        BlockContent {
            block_name: block_name.into(),
            color: Color::ByLayer,
            position,
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

/// Annotation payload; a multileader holds exactly one kind
#[derive(Debug, Clone, PartialEq)]
pub enum MultiLeaderContent {
    MText(MTextContent),
    Block(BlockContent),
}

impl MultiLeaderContent {
    /// Content type code (group 172)
    pub fn type_code(&self) -> i16 {
        match self {
            MultiLeaderContent::Block(_) => 1,
            MultiLeaderContent::MText(_) => 2,
        }
    }
}

/// Leader lines fanning out from one landing point
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderBranch {
    pub common_point: Vector2,
    /// Each line is a vertex path ending near the annotation
    pub lines: Vec<Vec<Vector2>>,
    pub dogleg_length: f64,
}

impl LeaderBranch {
    pub fn new(common_point: Vector2) -> Self {
        LeaderBranch {
            common_point,
            lines: Vec::new(),
            dogleg_length: 8.0,
        }
    }

    pub fn add_line(&mut self, points: Vec<Vector2>) {
        self.lines.push(points);
    }

    /// First vertex of the first line
    pub fn first_point(&self) -> Option<Vector2> {
        self.lines.first().and_then(|l| l.first()).copied()
    }
}

impl Default for LeaderBranch {
    fn default() -> Self {
        Self::new(Vector2::ZERO)
    }
}

/// Geometry record written as `CONTEXT_DATA{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLeaderContext {
    pub landing_position: Vector2,
    pub text_height: f64,
    pub arrow_size: f64,
    pub landing_gap: f64,
    pub content: Option<MultiLeaderContent>,
    pub leader: LeaderBranch,
}

impl Default for MultiLeaderContext {
    fn default() -> Self {
        MultiLeaderContext {
            landing_position: Vector2::ZERO,
            text_height: 4.0,
            arrow_size: 4.0,
            landing_gap: 0.09,
            content: None,
            leader: LeaderBranch::default(),
        }
    }
}

// ============================================================================
// MultiLeader
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLeader {
    pub common: EntityCommon,
    /// Multileader style name
    pub style_name: String,
    pub path_type: MultiLeaderPathType,
    /// Leader line type name
    pub leader_line_type: String,
    pub leader_line_weight: LineWeight,
    pub enable_landing: bool,
    pub enable_dogleg: bool,
    pub context: MultiLeaderContext,
    /// Weak links to the block's attribute definitions, paired by position
    /// with `attribute_values`
    pub attribute_definitions: Vec<Handle>,
    pub attribute_values: Vec<String>,
}

impl MultiLeader {
    pub fn new() -> Self {
        MultiLeader {
            common: EntityCommon::new(),
            style_name: "Standard".to_string(),
            path_type: MultiLeaderPathType::Straight,
            leader_line_type: "ByBlock".to_string(),
            leader_line_weight: LineWeight::ByBlock,
            enable_landing: true,
            enable_dogleg: true,
            context: MultiLeaderContext::default(),
            attribute_definitions: Vec::new(),
            attribute_values: Vec::new(),
        }
    }

    /// Text multileader with a single leader line
    pub fn with_text(text: &str, location: Vector2, leader_points: Vec<Vector2>) -> Self {
        let mut ml = Self::new();
        ml.context.landing_position = location;
        ml.context.content = Some(MultiLeaderContent::MText(MTextContent::new(text, location)));
        ml.context.leader = LeaderBranch::new(location);
        ml.context.leader.add_line(leader_points);
        ml
    }

    /// Block multileader with a single leader line
    pub fn with_block(block_name: &str, position: Vector2, leader_points: Vec<Vector2>) -> Self {
        let mut ml = Self::new();
        ml.context.landing_position = position;
        ml.context.content = Some(MultiLeaderContent::Block(BlockContent::new(block_name, position)));
        ml.context.leader = LeaderBranch::new(position);
        ml.context.leader.add_line(leader_points);
        ml
    }

    /// Pair an attribute definition with its value
    pub fn add_attribute(&mut self, definition: Handle, value: impl Into<String>) {
        self.attribute_definitions.push(definition);
        self.attribute_values.push(value.into());
    }

    pub fn block_content(&self) -> Option<&BlockContent> {
        match &self.context.content {
            Some(MultiLeaderContent::Block(b)) => Some(b),
            _ => None,
        }
    }

    pub fn text_content(&self) -> Option<&MTextContent> {
        match &self.context.content {
            Some(MultiLeaderContent::MText(t)) => Some(t),
            _ => None,
        }
    }

    /// Reason this multileader cannot be written, if any
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.context.content.is_none() {
            return Some("multileader has no content");
        }
        if self.context.leader.lines.is_empty() || self.context.leader.lines.iter().any(|l| l.is_empty()) {
            return Some("multileader has no leader line");
        }
        if self.attribute_definitions.len() != self.attribute_values.len() {
            return Some("attribute definition and value counts differ");
        }
        None
    }
}

impl Default for MultiLeader {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for MultiLeader {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "MULTILEADER"
    }

    fn translate(&mut self, offset: Vector2) {
        let ctx = &mut self.context;
        ctx.landing_position = ctx.landing_position + offset;
        ctx.leader.common_point = ctx.leader.common_point + offset;
        for line in &mut ctx.leader.lines {
            for p in line.iter_mut() {
                *p = *p + offset;
            }
        }
        match &mut ctx.content {
            Some(MultiLeaderContent::MText(t)) => t.location = t.location + offset,
            Some(MultiLeaderContent::Block(b)) => b.position = b.position + offset,
            None => {}
        }
    }
}
