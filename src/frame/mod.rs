//! Cross-frame coordinate normalization
//!
//! Tracked documents may be nested in frames, so all positions crossing
//! the crate boundary are expressed in a document-wide (screen-relative)
//! space: local coordinates are offset by the embedding frame's screen
//! origin on the way out, and offset back when consumed from a parent
//! context.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Screen origin of an embedding frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameOffset {
    pub x: f64,
    pub y: f64,
}

impl FrameOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A top-level document has no offset
    pub fn top_level() -> Self {
        Self::default()
    }

    /// Translate a local viewport point into the document-wide space
    pub fn to_global(&self, local: Point) -> Point {
        Point::new(local.x + self.x, local.y + self.y)
    }

    /// Translate a document-wide point back into local viewport space
    pub fn to_local(&self, global: Point) -> Point {
        Point::new(global.x - self.x, global.y - self.y)
    }

    /// Combine with the offset of a nested frame
    pub fn compose(&self, nested: FrameOffset) -> FrameOffset {
        FrameOffset::new(self.x + nested.x, self.y + nested.y)
    }
}
