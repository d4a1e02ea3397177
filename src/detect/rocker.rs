//! Rocker gesture detector
//!
//! Fires a discrete `rocker_left`/`rocker_right` event when the left and
//! right mouse buttons are reported held together, and suppresses the
//! native click/context-menu for that interaction using the same
//! timestamp-correlated discipline as the wheel detector.

use super::host::EventDisposition;
use super::ClickSuppressor;
use crate::config::SharedGestureConfig;
use crate::event::listeners::CallbackSet;
use crate::event::types::{GestureSample, MouseButton};
use tracing::debug;

/// Direction of a fired rocker gesture: the just-transitioned button
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RockerDirection {
    Left,
    Right,
}

/// Callback signature for rocker gesture events
pub type RockerCallback = dyn FnMut(&GestureSample);

/// Left+right button combo detector
pub struct RockerGestureDetector {
    config: SharedGestureConfig,
    enabled: bool,
    suppressor: ClickSuppressor,
    left_listeners: CallbackSet<RockerCallback>,
    right_listeners: CallbackSet<RockerCallback>,
}

impl RockerGestureDetector {
    pub fn new(config: SharedGestureConfig) -> Self {
        Self {
            config,
            enabled: false,
            suppressor: ClickSuppressor::default(),
            left_listeners: CallbackSet::new(),
            right_listeners: CallbackSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.suppressor.disarm();
    }

    /// Subscribe to `rocker_left`. Returns `false` on a duplicate key.
    pub fn on_rocker_left<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureSample) + 'static,
    {
        self.left_listeners.add(key, Box::new(callback))
    }

    /// Subscribe to `rocker_right`. Returns `false` on a duplicate key.
    pub fn on_rocker_right<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureSample) + 'static,
    {
        self.right_listeners.add(key, Box::new(callback))
    }

    /// Handle a button press.
    ///
    /// A trusted press with both left and right held, where the
    /// just-transitioned button is one of them, fires the matching rocker
    /// event, arms click/context-menu suppression, and suppresses the
    /// press itself. Any other press disarms suppression so ordinary
    /// clicks remain unaffected.
    pub fn on_button_press(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled || !sample.trusted {
            return EventDisposition::Propagate;
        }
        if !self.config.read().rocker.enabled {
            return EventDisposition::Propagate;
        }

        let both_held = sample.buttons.contains(MouseButton::Left)
            && sample.buttons.contains(MouseButton::Right);
        let direction = match sample.button {
            Some(MouseButton::Left) if both_held => Some(RockerDirection::Left),
            Some(MouseButton::Right) if both_held => Some(RockerDirection::Right),
            _ => None,
        };

        match direction {
            Some(direction) => {
                debug!(?direction, "rocker gesture fired");
                self.suppressor.arm();
                match direction {
                    RockerDirection::Left => self.left_listeners.emit(|cb| cb(sample)),
                    RockerDirection::Right => self.right_listeners.emit(|cb| cb(sample)),
                }
                EventDisposition::Suppress
            }
            None => {
                self.suppressor.disarm();
                EventDisposition::Propagate
            }
        }
    }

    /// Record the release a genuine follow-up click will correlate with.
    ///
    /// A press-only signal is not sufficient to identify the click to
    /// suppress: the click carries the release's timestamp, which is how
    /// a genuine mouse click is told apart from a synthetic one.
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

    /// Tab switch: re-arm suppression defensively, since the gesture and
    /// the page whose click must be suppressed can be different tabs.
    pub fn on_visibility_change(&mut self) {
        self.suppressor.arm();
    }
}

impl std::fmt::Debug for RockerGestureDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RockerGestureDetector")
            .field("enabled", &self.enabled)
            .field("suppression_armed", &self.suppressor.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureConfig;
    use crate::event::types::ButtonMask;
    use crate::geometry::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn detector() -> RockerGestureDetector {
        let mut detector = RockerGestureDetector::new(GestureConfig::default().into_shared());
        detector.enable();
        detector
    }

    fn both_held(transitioned: MouseButton, timestamp: u64) -> GestureSample {
        GestureSample::press(timestamp, Point::new(0.0, 0.0), transitioned).with_buttons(
            ButtonMask::only(MouseButton::Left).with(MouseButton::Right),
        )
    }

    #[test]
    fn test_left_transition_fires_rocker_left_once() {
        let mut det = detector();
        let lefts = Rc::new(RefCell::new(0));
        let rights = Rc::new(RefCell::new(0));
        let l = lefts.clone();
        det.on_rocker_left("count", move |_| *l.borrow_mut() += 1);
        let r = rights.clone();
        det.on_rocker_right("count", move |_| *r.borrow_mut() += 1);

        let disposition = det.on_button_press(&both_held(MouseButton::Left, 100));
        assert_eq!(disposition, EventDisposition::Suppress);
        assert_eq!(*lefts.borrow(), 1);
        assert_eq!(*rights.borrow(), 0);
    }

    #[test]
    fn test_right_transition_fires_rocker_right() {
        let mut det = detector();
        let rights = Rc::new(RefCell::new(0));
        let r = rights.clone();
        det.on_rocker_right("count", move |_| *r.borrow_mut() += 1);

        det.on_button_press(&both_held(MouseButton::Right, 100));
        assert_eq!(*rights.borrow(), 1);
    }

    #[test]
    fn test_single_button_press_is_ordinary() {
        let mut det = detector();
        let lefts = Rc::new(RefCell::new(0));
        let l = lefts.clone();
        det.on_rocker_left("count", move |_| *l.borrow_mut() += 1);

        let press = GestureSample::press(0, Point::new(0.0, 0.0), MouseButton::Left);
        assert_eq!(det.on_button_press(&press), EventDisposition::Propagate);
        assert_eq!(*lefts.borrow(), 0);
    }

    #[test]
    fn test_untrusted_press_ignored() {
        let mut det = detector();
        let lefts = Rc::new(RefCell::new(0));
        let l = lefts.clone();
        det.on_rocker_left("count", move |_| *l.borrow_mut() += 1);

        det.on_button_press(&both_held(MouseButton::Left, 0).untrusted());
        assert_eq!(*lefts.borrow(), 0);
    }

    #[test]
    fn test_middle_transition_with_both_held_is_ordinary() {
        let mut det = detector();
        let sample = GestureSample::press(0, Point::new(0.0, 0.0), MouseButton::Middle)
            .with_buttons(
                ButtonMask::only(MouseButton::Left)
                    .with(MouseButton::Right)
                    .with(MouseButton::Middle),
            );
        assert_eq!(det.on_button_press(&sample), EventDisposition::Propagate);
    }

    #[test]
    fn test_suppresses_exactly_the_correlated_click() {
        let mut det = detector();
        det.on_button_press(&both_held(MouseButton::Left, 100));

        let release = GestureSample::release(250, Point::new(0.0, 0.0), MouseButton::Left);
        det.on_button_release(&release);

        // An unrelated click (different timestamp) is never suppressed
        assert_eq!(det.on_click(999), EventDisposition::Propagate);
        // The correlated one is suppressed, exactly once
        assert_eq!(det.on_click(250), EventDisposition::Suppress);
        assert_eq!(det.on_click(250), EventDisposition::Propagate);
    }

    #[test]
    fn test_context_menu_suppressed_while_armed() {
        let mut det = detector();
        det.on_button_press(&both_held(MouseButton::Right, 100));
        assert_eq!(det.on_context_menu(), EventDisposition::Suppress);
    }

    #[test]
    fn test_ordinary_press_disarms() {
        let mut det = detector();
        det.on_button_press(&both_held(MouseButton::Left, 100));
        det.on_button_press(&GestureSample::press(
            200,
            Point::new(0.0, 0.0),
            MouseButton::Left,
        ));
        assert_eq!(det.on_context_menu(), EventDisposition::Propagate);
    }

    #[test]
    fn test_visibility_change_rearms() {
        let mut det = detector();
        assert_eq!(det.on_context_menu(), EventDisposition::Propagate);
        det.on_visibility_change();
        assert_eq!(det.on_context_menu(), EventDisposition::Suppress);
    }

    #[test]
    fn test_disabled_config_ignores_presses() {
        let config = GestureConfig::default().into_shared();
        config.write().rocker.enabled = false;
        let mut det = RockerGestureDetector::new(config);
        det.enable();
        assert_eq!(
            det.on_button_press(&both_held(MouseButton::Left, 0)),
            EventDisposition::Propagate
        );
    }
}
