//! Gesture detectors
//!
//! The drag-gesture state machine plus the simpler wheel and rocker
//! detectors. All three share the same discipline: untrusted or
//! non-matching input is filtered by predicate, and handlers tell the
//! host via an [`EventDisposition`](host::EventDisposition) whether the
//! native behavior for an event must be suppressed.

pub mod host;
pub mod drag;
pub mod wheel;
pub mod rocker;

pub use host::{EventDisposition, InputRouter, SelectionHost, TimeoutScheduler};

/// Click/context-menu suppression shared by the wheel and rocker
/// detectors.
///
/// A fired gesture arms the suppressor; the following context menu is
/// swallowed while armed, and exactly one click is swallowed — the one
/// whose timestamp matches the triggering release, which is how a
/// genuine mouse click is told apart from a synthetic (e.g.
/// keyboard-activated) one. Ordinary presses disarm it so normal clicks
/// stay unaffected; a visibility change re-arms it defensively, because
/// the gesture and the page whose click must be suppressed can live in
/// different tabs.
#[derive(Debug, Default)]
pub(crate) struct ClickSuppressor {
    armed: bool,
    release_timestamp: Option<u64>,
}

impl ClickSuppressor {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.release_timestamp = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Record the release that a genuine click will share a timestamp with
    pub fn note_release(&mut self, timestamp: u64) {
        if self.armed {
            self.release_timestamp = Some(timestamp);
        }
    }

    /// Decide the fate of a click event
    pub fn on_click(&mut self, timestamp: u64) -> EventDisposition {
        if self.armed && self.release_timestamp == Some(timestamp) {
            self.disarm();
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }

    /// Decide the fate of a context-menu event
    pub fn on_context_menu(&self) -> EventDisposition {
        if self.armed {
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }
}

/// Lifecycle state of the drag-gesture state machine.
///
/// Owned exclusively by [`drag::PointerGestureStateMachine`]; never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No gesture tracked (initial and terminal)
    Passive,
    /// Trigger pressed, distance threshold not yet exceeded
    Pending,
    /// Gesture in progress, updates firing
    Active,
    /// Transient: abort fired, full reset follows immediately
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressor_matches_release_timestamp() {
        let mut sup = ClickSuppressor::default();
        sup.arm();
        sup.note_release(500);

        // Unrelated click (different timestamp) is never suppressed
        assert_eq!(sup.on_click(123), EventDisposition::Propagate);
        // The correlated click is suppressed exactly once
        assert_eq!(sup.on_click(500), EventDisposition::Suppress);
        assert_eq!(sup.on_click(500), EventDisposition::Propagate);
    }

    #[test]
    fn test_suppressor_ignores_release_while_disarmed() {
        let mut sup = ClickSuppressor::default();
        sup.note_release(500);
        assert_eq!(sup.on_click(500), EventDisposition::Propagate);
    }

    #[test]
    fn test_suppressor_context_menu_follows_armed_flag() {
        let mut sup = ClickSuppressor::default();
        assert_eq!(sup.on_context_menu(), EventDisposition::Propagate);
        sup.arm();
        assert_eq!(sup.on_context_menu(), EventDisposition::Suppress);
        sup.disarm();
        assert_eq!(sup.on_context_menu(), EventDisposition::Propagate);
        assert!(!sup.is_armed());
    }
}
