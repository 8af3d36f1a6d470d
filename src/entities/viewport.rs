//! Paper space viewport entity

use super::{Entity, EntityCommon};
use crate::types::{Handle, Vector2};

/// Status flag bits (group code 90)
pub mod status {
    pub const BASE: i32 = 0x8060;
    pub const LOCKED: i32 = 0x4000;
    pub const NON_RECTANGULAR_CLIP: i32 = 0x10000;
}

/// A window from a paper space layout into model space
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub common: EntityCommon,
    /// Center in paper space
    pub center: Vector2,
    /// Width in paper space
    pub width: f64,
    /// Height in paper space
    pub height: f64,
    /// Model space point shown at the viewport center
    pub view_center: Vector2,
    /// Model space height shown by the viewport
    pub view_height: f64,
    /// Twist angle in degrees
    pub twist_angle: f64,
    pub locked: bool,
    /// Weak link to the outline clipping this viewport
    pub clip_entity: Option<Handle>,
}

impl Viewport {
    pub fn new() -> Self {
        let mut common = EntityCommon::new();
        common.paperspace = true;
        Viewport {
            common,
            center: Vector2::new(128.5, 97.5),
            width: 205.6,
            height: 156.0,
            view_center: Vector2::new(100.0, 100.0),
            view_height: 100.0,
            twist_angle: 0.0,
            locked: false,
            clip_entity: None,
        }
    }

    /// Model space units per paper space unit
    pub fn scale(&self) -> f64 {
        if self.view_height == 0.0 {
            0.0
        } else {
            self.height / self.view_height
        }
    }

    /// Status flags written under group code 90
    pub fn status_flags(&self) -> i32 {
        let mut flags = status::BASE;
        if self.clip_entity.is_some() {
            flags |= status::NON_RECTANGULAR_CLIP;
        }
        if self.locked {
            flags |= status::LOCKED;
        }
        flags
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Viewport {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn entity_type(&self) -> &'static str {
        "VIEWPORT"
    }

    fn translate(&mut self, offset: Vector2) {
        self.center = self.center + offset;
    }
}
