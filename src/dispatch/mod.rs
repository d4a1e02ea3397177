//! Dispatch payloads and sink interfaces
//!
//! The recognition core hands its results to two external collaborators:
//! a command dispatcher and an on-screen trace overlay. Both are pure
//! sinks; nothing they return affects recognition. Payload positions are
//! always in the document-wide coordinate space.

use crate::detect::rocker::RockerDirection;
use crate::detect::wheel::WheelDirection;
use crate::geometry::Point;
use crate::pattern::GesturePattern;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptive metadata about the element a gesture was performed over
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Media source URL (img/video/audio)
    pub src: Option<String>,
    /// Element title attribute
    pub title: Option<String>,
    /// Image alt text
    pub alt: Option<String>,
    /// Visible text content of the element
    pub text_content: Option<String>,
    /// Nearest enclosing link's destination
    pub link_href: Option<String>,
    /// Nearest enclosing link's title
    pub link_title: Option<String>,
    /// Nearest enclosing link's text
    pub link_text: Option<String>,
    /// Active text selection, if any
    pub selection: Option<String>,
}

/// What was recognized: a drag pattern or a fixed wheel/rocker subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum GestureSubject {
    Pattern(GesturePattern),
    Wheel(WheelDirection),
    Rocker(RockerDirection),
}

/// Which lifecycle event a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Start,
    Update,
    Abort,
    End,
}

/// Everything the command layer needs per gesture-lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GesturePayload {
    /// The recognized subject
    pub subject: GestureSubject,
    /// Metadata of the interaction target
    pub target: TargetInfo,
    /// Cursor position in the document-wide space
    pub position: Point,
    /// Id of the gesture attempt this payload belongs to
    pub attempt_id: Uuid,
}

/// Command-execution collaborator. Receives one payload per lifecycle
/// event; purely a sink.
pub trait GestureDispatcher {
    fn dispatch(&mut self, phase: GesturePhase, payload: &GesturePayload);
}

/// On-screen trace/command overlay collaborator. Purely a sink; no
/// return value affects recognition.
pub trait TraceOverlay {
    /// Called once at gesture start with the document-wide origin
    fn initialize(&mut self, x: f64, y: f64);
    /// Progressive trace rendering: a batch of document-wide points
    fn push_points(&mut self, points: &[Point]);
    /// Update the matched-command label
    fn set_label(&mut self, label: &str);
    /// Tear the overlay down (gesture ended or aborted)
    fn terminate(&mut self);
}
