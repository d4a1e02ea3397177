//! Host capability interfaces
//!
//! The recognition core is host-agnostic: pointer capture, selection
//! clearing, and timer scheduling are environment concerns injected as
//! small object-safe traits. Tests supply plain recording doubles.

/// What the host must do with the native behavior of a handled event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Let the native behavior proceed
    Propagate,
    /// Cancel the native behavior (default action and propagation)
    Suppress,
}

impl EventDisposition {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, EventDisposition::Suppress)
    }
}

/// Routes subsequent input to one controller regardless of the visual
/// target, so a gesture is never lost by crossing a frame boundary.
pub trait InputRouter {
    /// Begin redirecting move/key/release events to the originating
    /// controller
    fn capture_input(&mut self);
    /// Stop redirecting; must be idempotent
    fn release_input(&mut self);
}

/// Clears any active text selection in the host document
pub trait SelectionHost {
    fn clear_selection(&mut self);
}

/// Schedules the inactivity-abort callback.
///
/// `arm` replaces any pending timer, implementing "abort after N ms of
/// inactivity" rather than "abort N ms after start". When the timer
/// fires the host calls
/// [`PointerGestureStateMachine::on_timeout`](crate::detect::drag::PointerGestureStateMachine::on_timeout).
pub trait TimeoutScheduler {
    /// Schedule a fire after `duration_ms`, canceling any pending timer
    fn arm(&mut self, duration_ms: u64);
    /// Cancel any pending timer; must be idempotent
    fn disarm(&mut self);
}

/// No-op host for setups without a given capability
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl InputRouter for NullHost {
    fn capture_input(&mut self) {}
    fn release_input(&mut self) {}
}

impl SelectionHost for NullHost {
    fn clear_selection(&mut self) {}
}

impl TimeoutScheduler for NullHost {
    fn arm(&mut self, _duration_ms: u64) {}
    fn disarm(&mut self) {}
}
