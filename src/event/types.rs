//! Core input sample types
//!
//! Defines the button/modifier model and the samples the detectors
//! consume. Samples carry a `trusted` flag: only input originating from
//! a genuine user action may drive recognition, and untrusted samples
//! are filtered by predicate rather than reported as errors.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Mouse buttons the detectors can be configured to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button
    Left = 0,
    /// Wheel/middle button
    Middle = 1,
    /// Secondary button
    Right = 2,
    /// Thumb "back" button
    Back = 3,
    /// Thumb "forward" button
    Forward = 4,
}

impl MouseButton {
    /// Bit for this button in a [`ButtonMask`]
    pub fn bit(&self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
            MouseButton::Back => 8,
            MouseButton::Forward => 16,
        }
    }

    /// Check if this is the primary button
    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }
}

/// Bitmask of simultaneously held mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);

    /// Mask holding a single button
    pub fn only(button: MouseButton) -> Self {
        Self(button.bit())
    }

    /// Check whether `button` is held in this mask
    pub fn contains(&self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    /// Mask with `button` added
    pub fn with(self, button: MouseButton) -> Self {
        Self(self.0 | button.bit())
    }

    /// Mask with `button` removed
    pub fn without(self, button: MouseButton) -> Self {
        Self(self.0 & !button.bit())
    }

    /// Check if no button is held
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Keyboard modifier used to suppress or abort gesture tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    /// No suppression key configured
    #[default]
    None,
    Shift,
    Control,
    Alt,
}

impl ModifierKey {
    /// Key name as reported by host key events
    pub fn key_name(&self) -> Option<&'static str> {
        match self {
            ModifierKey::None => None,
            ModifierKey::Shift => Some("Shift"),
            ModifierKey::Control => Some("Control"),
            ModifierKey::Alt => Some("Alt"),
        }
    }

    /// Check whether a host key name refers to this modifier
    pub fn matches(&self, key: &str) -> bool {
        self.key_name() == Some(key)
    }
}

/// Modifier keys held during an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Check whether the given suppression key is currently held.
    ///
    /// [`ModifierKey::None`] is never held.
    pub fn holds(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::None => false,
            ModifierKey::Shift => self.shift,
            ModifierKey::Control => self.control,
            ModifierKey::Alt => self.alt,
        }
    }

    /// Check if any modifier is active
    pub fn any_active(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// One observed pointer input event.
///
/// Positions are in local viewport space; the [`frame`](crate::frame)
/// module translates to the document-wide space at the crate boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureSample {
    /// Host event timestamp (milliseconds, host timebase)
    pub timestamp: u64,
    /// Position in local viewport coordinates
    pub position: Point,
    /// Buttons held after this event
    pub buttons: ButtonMask,
    /// The button that just transitioned (press/release samples)
    pub button: Option<MouseButton>,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
    /// Whether this sample originates from genuine user input
    pub trusted: bool,
    /// Coalesced intermediate positions delivered with this sample,
    /// in chronological order, ending before `position`
    pub coalesced: Vec<Point>,
}

impl GestureSample {
    /// Create a trusted press sample
    pub fn press(timestamp: u64, position: Point, button: MouseButton) -> Self {
        Self {
            timestamp,
            position,
            buttons: ButtonMask::only(button),
            button: Some(button),
            modifiers: Modifiers::default(),
            trusted: true,
            coalesced: Vec::new(),
        }
    }

    /// Create a trusted release sample
    pub fn release(timestamp: u64, position: Point, button: MouseButton) -> Self {
        Self {
            timestamp,
            position,
            buttons: ButtonMask::NONE,
            button: Some(button),
            modifiers: Modifiers::default(),
            trusted: true,
            coalesced: Vec::new(),
        }
    }

    /// Create a trusted movement sample
    pub fn movement(timestamp: u64, position: Point, buttons: ButtonMask) -> Self {
        Self {
            timestamp,
            position,
            buttons,
            button: None,
            modifiers: Modifiers::default(),
            trusted: true,
            coalesced: Vec::new(),
        }
    }

    /// Attach coalesced intermediate positions
    pub fn with_coalesced(mut self, coalesced: Vec<Point>) -> Self {
        self.coalesced = coalesced;
        self
    }

    /// Override the held modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override the held-buttons mask
    pub fn with_buttons(mut self, buttons: ButtonMask) -> Self {
        self.buttons = buttons;
        self
    }

    /// Mark the sample as synthesized (not genuine user input)
    pub fn untrusted(mut self) -> Self {
        self.trusted = false;
        self
    }

    /// All positions carried by this sample in chronological order:
    /// coalesced intermediates first, then the delivered position.
    pub fn flattened_positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.coalesced.iter().copied().chain(std::iter::once(self.position))
    }
}

/// One observed wheel event
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelSample {
    /// Host event timestamp (milliseconds)
    pub timestamp: u64,
    /// Position in local viewport coordinates
    pub position: Point,
    /// Signed scroll delta (positive = down)
    pub delta: f64,
    /// Buttons held during the event
    pub buttons: ButtonMask,
    /// Whether this sample originates from genuine user input
    pub trusted: bool,
}

impl WheelSample {
    /// Create a trusted wheel sample
    pub fn new(timestamp: u64, position: Point, delta: f64, buttons: ButtonMask) -> Self {
        Self {
            timestamp,
            position,
            delta,
            buttons,
            trusted: true,
        }
    }

    /// Mark the sample as synthesized
    pub fn untrusted(mut self) -> Self {
        self.trusted = false;
        self
    }
}
