//! # Pointer Gestures
//!
//! A gesture-recognition engine that turns raw pointer input (mouse-drag
//! strokes, wheel flicks, button "rocker" combos) performed over arbitrary
//! host content into a compact, matchable directional pattern plus
//! contextual target data, ready for dispatch to a command-execution layer.
//!
//! ## Overview
//!
//! Raw input samples enter the detectors; the [`PointerGestureStateMachine`]
//! feeds coalesced points into the [`PatternConstructor`], and lifecycle
//! callbacks (start/update/abort/end) carry the running pattern and target
//! metadata outward. The wheel and rocker detectors produce single discrete
//! gesture events directly. Everything runs single-threaded on the host's
//! event-dispatch thread; the host supplies pointer capture, selection
//! clearing, and timer scheduling through small capability traits.
//!
//! ## Quick Start
//!
//! ```
//! use pointer_gestures::config::GestureConfig;
//! use pointer_gestures::detect::drag::PointerGestureStateMachine;
//! use pointer_gestures::event::types::{GestureSample, MouseButton};
//! use pointer_gestures::geometry::Point;
//!
//! let config = GestureConfig::default().into_shared();
//! let mut machine = PointerGestureStateMachine::new(config);
//! machine.on_start("log", |initial, _buffer| {
//!     println!("gesture started at {:?}", initial.position);
//! });
//! machine.enable();
//!
//! // Feed samples as the host delivers them:
//! let press = GestureSample::press(0, Point::new(10.0, 10.0), MouseButton::Right);
//! machine.on_button_press(&press);
//! ```
//!
//! ## Architecture
//!
//! - [`geometry`]: pure distance and angle math
//! - [`event`]: input samples, the per-attempt buffer, callback sets
//! - [`pattern`]: incremental stroke-to-pattern compression
//! - [`detect`]: the drag state machine plus wheel and rocker detectors
//! - [`frame`]: cross-frame coordinate normalization
//! - [`config`]: tunables, TOML persistence, URL blacklist
//! - [`dispatch`]: payload types and sink interfaces for the command layer
//! - [`engine`]: per-document coordinator wiring it all together

pub mod geometry;
pub mod event;
pub mod pattern;
pub mod detect;
pub mod frame;
pub mod config;
pub mod dispatch;
pub mod engine;

// Re-export commonly used types
pub use config::{GestureConfig, SharedGestureConfig};
pub use detect::drag::PointerGestureStateMachine;
pub use detect::rocker::RockerGestureDetector;
pub use detect::wheel::WheelGestureDetector;
pub use detect::LifecycleState;
pub use dispatch::{GestureDispatcher, GesturePayload, GesturePhase, GestureSubject, TargetInfo, TraceOverlay};
pub use engine::GestureEngine;
pub use event::buffer::GestureEventBuffer;
pub use event::types::{GestureSample, MouseButton};
pub use geometry::Point;
pub use pattern::{DirectionVector, GesturePattern, PatternConstructor};

/// Result type alias for the gesture engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the gesture engine.
///
/// The recognition paths themselves never fail: malformed or untrusted
/// input is filtered by predicate and silently dropped. Errors exist only
/// for configuration misuse, which indicates a programming error and must
/// surface immediately.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
