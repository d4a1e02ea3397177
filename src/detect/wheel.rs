//! Wheel gesture detector
//!
//! Accumulates signed wheel delta while the trigger button is held and
//! fires a discrete `wheel_up`/`wheel_down` event once the accumulated
//! magnitude reaches the configured sensitivity. A direction reversal
//! resets the accumulator before the new delta is added, so reversals
//! never partially cancel; the order reset -> add -> threshold-check is
//! load-bearing for sensitivity-boundary behavior and must not change.

use super::host::EventDisposition;
use super::ClickSuppressor;
use crate::config::SharedGestureConfig;
use crate::event::listeners::CallbackSet;
use crate::event::types::{GestureSample, WheelSample};
use tracing::{debug, trace};

/// Direction of a fired wheel gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WheelDirection {
    Up,
    Down,
}

/// Callback signature for wheel gesture events
pub type WheelCallback = dyn FnMut(&WheelSample);

/// Discrete wheel-flick detector.
///
/// Stateless apart from the accumulator and the click suppressor; the
/// configuration is read at decision points through the shared handle.
pub struct WheelGestureDetector {
    config: SharedGestureConfig,
    enabled: bool,
    /// Signed running delta; reset on press, on visibility change, on
    /// direction reversal, and after every fire
    accumulator: f64,
    suppressor: ClickSuppressor,
    up_listeners: CallbackSet<WheelCallback>,
    down_listeners: CallbackSet<WheelCallback>,
}

impl WheelGestureDetector {
    pub fn new(config: SharedGestureConfig) -> Self {
        Self {
            config,
            enabled: false,
            accumulator: 0.0,
            suppressor: ClickSuppressor::default(),
            up_listeners: CallbackSet::new(),
            down_listeners: CallbackSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.accumulator = 0.0;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.accumulator = 0.0;
        self.suppressor.disarm();
    }

    /// Subscribe to `wheel_up`. Returns `false` on a duplicate key.
    pub fn on_wheel_up<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&WheelSample) + 'static,
    {
        self.up_listeners.add(key, Box::new(callback))
    }

    /// Subscribe to `wheel_down`. Returns `false` on a duplicate key.
    pub fn on_wheel_down<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&WheelSample) + 'static,
    {
        self.down_listeners.add(key, Box::new(callback))
    }

    /// Current accumulated delta (for diagnostics and tests)
    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    /// Handle a wheel event.
    ///
    /// Only trusted samples with the trigger button held are considered;
    /// those are always suppressed so the page never scrolls underneath a
    /// wheel gesture, whether or not the threshold is reached.
    pub fn on_wheel(&mut self, sample: &WheelSample) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        let wheel = self.config.read().wheel.clone();
        if !wheel.enabled || !sample.trusted || !sample.buttons.contains(wheel.trigger_button) {
            return EventDisposition::Propagate;
        }

        // Direction reversal must not partially cancel: reset first,
        // then add, then check. The just-arrived delta still counts
        // toward the new direction.
        if self.accumulator != 0.0 && sample.delta.signum() != self.accumulator.signum() {
            trace!("wheel direction reversed, accumulator reset");
            self.accumulator = 0.0;
        }
        self.accumulator += sample.delta;

        if self.accumulator.abs() >= wheel.sensitivity {
            let direction = if self.accumulator < 0.0 {
                WheelDirection::Up
            } else {
                WheelDirection::Down
            };
            debug!(?direction, "wheel gesture fired");
            self.accumulator = 0.0;
            self.suppressor.arm();
            match direction {
                WheelDirection::Up => self.up_listeners.emit(|cb| cb(sample)),
                WheelDirection::Down => self.down_listeners.emit(|cb| cb(sample)),
            }
        }

        EventDisposition::Suppress
    }

    /// Any button press resets the accumulator; an ordinary press also
    /// disarms click suppression so normal clicks stay unaffected.
    pub fn on_button_press(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled || !sample.trusted {
            return EventDisposition::Propagate;
        }
        self.accumulator = 0.0;
        self.suppressor.disarm();
        EventDisposition::Propagate
    }

    /// Record the release a genuine follow-up click will correlate with
    pub fn on_button_release(&mut self, sample: &GestureSample) {
        if self.enabled && sample.trusted {
            self.suppressor.note_release(sample.timestamp);
        }
    }

    /// Decide the fate of a click following a fired gesture
    pub fn on_click(&mut self, timestamp: u64) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        self.suppressor.on_click(timestamp)
    }

    /// Decide the fate of a context-menu event
    pub fn on_context_menu(&mut self) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        self.suppressor.on_context_menu()
    }

    /// Tab switch: stale accumulation must not leak into the next
    /// interaction, and suppression re-arms defensively.
    pub fn on_visibility_change(&mut self) {
        self.accumulator = 0.0;
        self.suppressor.arm();
    }
}

impl std::fmt::Debug for WheelGestureDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelGestureDetector")
            .field("enabled", &self.enabled)
            .field("accumulator", &self.accumulator)
            .finish()
    }
}
