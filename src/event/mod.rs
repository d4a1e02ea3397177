//! Input event model
//!
//! Samples as delivered by the host, the per-attempt event buffer, and
//! the keyed callback sets used for lifecycle subscriptions.

pub mod types;
pub mod buffer;
pub mod listeners;

pub use buffer::GestureEventBuffer;
pub use listeners::CallbackSet;
pub use types::{ButtonMask, GestureSample, Modifiers, ModifierKey, MouseButton, WheelSample};
