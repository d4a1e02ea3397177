//! Pointer drag-gesture state machine
//!
//! Turns raw pointer events into a start/update/abort/end lifecycle with
//! distance, timeout, and suppression gating. The machine owns its
//! [`LifecycleState`] exclusively and never shares it; the host injects
//! pointer capture, selection clearing, and timer scheduling through the
//! capability traits in [`host`](super::host).
//!
//! None of the entry points can fail: malformed input (wrong button,
//! untrusted event) is silently ignored by predicate checks.

use super::host::{EventDisposition, InputRouter, NullHost, SelectionHost, TimeoutScheduler};
use super::LifecycleState;
use crate::config::SharedGestureConfig;
use crate::event::buffer::GestureEventBuffer;
use crate::event::listeners::CallbackSet;
use crate::event::types::GestureSample;
use crate::geometry::distance;
use tracing::{debug, trace};

/// Callback signature for `start`, `update`, and `end`
pub type SampleCallback = dyn FnMut(&GestureSample, &GestureEventBuffer);
/// Callback signature for `abort`
pub type AbortCallback = dyn FnMut(&GestureEventBuffer);

/// Primary drag-gesture lifecycle detector.
///
/// State transitions:
///
/// ```text
/// Passive --trigger press--> Pending --distance exceeded--> Active
/// Pending --release--> Passive
/// Active --qualifying release--> Passive          (fires end)
/// Active --suppression key / timeout--> Aborted   (fires abort)
/// Aborted --> Passive                              (immediate)
/// ```
pub struct PointerGestureStateMachine {
    config: SharedGestureConfig,
    state: LifecycleState,
    enabled: bool,
    /// Owned by exactly one gesture attempt, discarded on reset
    buffer: Option<GestureEventBuffer>,
    /// Context-menu suppression; armed by default, released only after a
    /// full press/move/release cycle (menus can fire without a preceding
    /// press on some platforms)
    context_menu_armed: bool,

    router: Box<dyn InputRouter>,
    selection: Box<dyn SelectionHost>,
    timer: Box<dyn TimeoutScheduler>,

    start_listeners: CallbackSet<SampleCallback>,
    update_listeners: CallbackSet<SampleCallback>,
    abort_listeners: CallbackSet<AbortCallback>,
    end_listeners: CallbackSet<SampleCallback>,
}

impl PointerGestureStateMachine {
    /// Create a machine with inert host capabilities.
    ///
    /// Real hosts should install their capabilities with
    /// [`set_input_router`](Self::set_input_router),
    /// [`set_selection_host`](Self::set_selection_host), and
    /// [`set_timeout_scheduler`](Self::set_timeout_scheduler).
    pub fn new(config: SharedGestureConfig) -> Self {
        Self {
            config,
            state: LifecycleState::Passive,
            enabled: false,
            buffer: None,
            context_menu_armed: true,
            router: Box::new(NullHost),
            selection: Box::new(NullHost),
            timer: Box::new(NullHost),
            start_listeners: CallbackSet::new(),
            update_listeners: CallbackSet::new(),
            abort_listeners: CallbackSet::new(),
            end_listeners: CallbackSet::new(),
        }
    }

    /// Install the pointer-capture capability
    pub fn set_input_router(&mut self, router: Box<dyn InputRouter>) {
        self.router = router;
    }

    /// Install the selection-clearing capability
    pub fn set_selection_host(&mut self, selection: Box<dyn SelectionHost>) {
        self.selection = selection;
    }

    /// Install the timeout-scheduling capability
    pub fn set_timeout_scheduler(&mut self, timer: Box<dyn TimeoutScheduler>) {
        self.timer = timer;
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the machine reacts to input
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start reacting to input. Resets any stale state.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.reset();
        debug!("drag gesture machine enabled");
    }

    /// Stop reacting to input and release all resources.
    ///
    /// Safe to call from any state: capture is released, the timer
    /// disarmed, and the buffer dropped.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.reset();
        debug!("drag gesture machine disabled");
    }

    /// Force a reset without firing `end`. Safe from any state.
    pub fn cancel(&mut self) {
        trace!(state = ?self.state, "drag gesture canceled");
        self.reset();
    }

    // -- lifecycle subscriptions ------------------------------------------

    /// Subscribe to `start(initial_sample, buffer)`.
    /// Returns `false` if `key` is already registered.
    pub fn on_start<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureSample, &GestureEventBuffer) + 'static,
    {
        self.start_listeners.add(key, Box::new(callback))
    }

    /// Subscribe to `update(latest_sample, buffer)`
    pub fn on_update<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureSample, &GestureEventBuffer) + 'static,
    {
        self.update_listeners.add(key, Box::new(callback))
    }

    /// Subscribe to `abort(buffer)`
    pub fn on_abort<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureEventBuffer) + 'static,
    {
        self.abort_listeners.add(key, Box::new(callback))
    }

    /// Subscribe to `end(latest_sample, buffer)`
    pub fn on_end<F>(&mut self, key: &'static str, callback: F) -> bool
    where
        F: FnMut(&GestureSample, &GestureEventBuffer) + 'static,
    {
        self.end_listeners.add(key, Box::new(callback))
    }

    /// Remove a subscription from every lifecycle event
    pub fn remove_listener(&mut self, key: &str) {
        self.start_listeners.remove(key);
        self.update_listeners.remove(key);
        self.abort_listeners.remove(key);
        self.end_listeners.remove(key);
    }

    // -- event entry points -----------------------------------------------

    /// Handle a button press.
    ///
    /// A trusted press of the configured trigger button, with the
    /// suppression modifier not held, moves Passive to Pending, seeds the
    /// buffer, and requests pointer capture so cross-frame motion keeps
    /// arriving.
    pub fn on_button_press(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        let drag = self.config.read().drag.clone();
        if !drag.enabled
            || !sample.trusted
            || self.state != LifecycleState::Passive
            || sample.button != Some(drag.trigger_button)
            || sample.modifiers.holds(drag.suppression_key)
        {
            return EventDisposition::Propagate;
        }

        trace!(position = ?sample.position, "trigger press, tracking pending");
        self.state = LifecycleState::Pending;
        self.buffer = Some(GestureEventBuffer::new(sample.clone()));
        self.context_menu_armed = true;
        self.router.capture_input();
        EventDisposition::Propagate
    }

    /// Handle a pointer move.
    ///
    /// Pending: buffers the sample and fires `start` once the distance
    /// threshold from the initiating sample is exceeded. Active: buffers,
    /// fires `update`, re-arms the inactivity timer, and clears any text
    /// selection when the trigger is the primary button.
    pub fn on_pointer_move(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled || !sample.trusted {
            return EventDisposition::Propagate;
        }

        match self.state {
            LifecycleState::Pending => {
                let drag = self.config.read().drag.clone();
                let Some(mut buffer) = self.buffer.take() else {
                    return EventDisposition::Propagate;
                };
                buffer.push(sample.clone());

                let travelled = distance(buffer.initial().position, sample.position);
                if travelled <= drag.distance_threshold_px {
                    // Below the threshold no page behavior is suppressed
                    self.buffer = Some(buffer);
                    return EventDisposition::Propagate;
                }

                debug!(travelled, "distance threshold exceeded, gesture active");
                self.state = LifecycleState::Active;
                if drag.timeout_enabled {
                    self.timer.arm(drag.timeout_ms);
                }
                if drag.trigger_button.is_primary() {
                    self.selection.clear_selection();
                }

                // `start` carries the initiating sample and the full buffer
                let initial = buffer.initial().clone();
                self.start_listeners.emit(|cb| cb(&initial, &buffer));
                self.buffer = Some(buffer);
                EventDisposition::Suppress
            }
            LifecycleState::Active => {
                let drag = self.config.read().drag.clone();
                let Some(mut buffer) = self.buffer.take() else {
                    return EventDisposition::Propagate;
                };
                buffer.push(sample.clone());

                // Re-arm on every qualifying update: abort after N ms of
                // inactivity, not N ms after start
                if drag.timeout_enabled {
                    self.timer.arm(drag.timeout_ms);
                }
                if drag.trigger_button.is_primary() {
                    self.selection.clear_selection();
                }

                self.update_listeners.emit(|cb| cb(sample, &buffer));
                self.buffer = Some(buffer);
                EventDisposition::Suppress
            }
            _ => EventDisposition::Propagate,
        }
    }

    /// Handle a button release.
    ///
    /// A qualifying release during Active fires `end` and resets; during
    /// Pending (press and release without movement) it resets silently,
    /// leaving context-menu suppression armed.
    pub fn on_button_release(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        let drag = self.config.read().drag.clone();
        if !sample.trusted || sample.button != Some(drag.trigger_button) {
            return EventDisposition::Propagate;
        }

        match self.state {
            LifecycleState::Active => {
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.push(sample.clone());
                }
                let buffer = self.buffer.take();
                // Full press/move/release cycle completed: the context
                // menu may fire normally again
                self.context_menu_armed = false;
                debug!("gesture ended");
                if let Some(buffer) = &buffer {
                    self.end_listeners.emit(|cb| cb(sample, buffer));
                }
                self.reset();
                EventDisposition::Suppress
            }
            LifecycleState::Pending => {
                // Press without movement: no gesture; the immediately
                // following context-menu event stays suppressed
                trace!("trigger released without movement");
                self.reset();
                EventDisposition::Propagate
            }
            _ => EventDisposition::Propagate,
        }
    }

    /// Handle a key press.
    ///
    /// A trusted, non-repeat press of the configured suppression key
    /// during Active aborts the gesture.
    pub fn on_key_down(&mut self, key: &str, repeat: bool, trusted: bool) -> EventDisposition {
        if !self.enabled || !trusted || repeat || self.state != LifecycleState::Active {
            return EventDisposition::Propagate;
        }
        let suppression_key = self.config.read().drag.suppression_key;
        if !suppression_key.matches(key) {
            return EventDisposition::Propagate;
        }

        debug!(key, "suppression key pressed, aborting gesture");
        self.abort();
        EventDisposition::Suppress
    }

    /// Handle the inactivity timer firing. Only meaningful while Active.
    pub fn on_timeout(&mut self) {
        if !self.enabled || self.state != LifecycleState::Active {
            return;
        }
        debug!("inactivity timeout, aborting gesture");
        self.abort();
    }

    /// Handle a native drag-start.
    ///
    /// Suppressed whenever the trigger button is held and the suppression
    /// key is not, so native drag-and-drop never competes with tracking.
    pub fn on_drag_start(&mut self, sample: &GestureSample) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        let drag = self.config.read().drag.clone();
        if sample.buttons.contains(drag.trigger_button)
            && !sample.modifiers.holds(drag.suppression_key)
        {
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }

    /// Handle a context-menu event.
    ///
    /// Suppression is armed by default and only released once a full
    /// press/move/release cycle completes, protecting against menus that
    /// fire without a preceding press.
    pub fn on_context_menu(&mut self) -> EventDisposition {
        if !self.enabled {
            return EventDisposition::Propagate;
        }
        if self.context_menu_armed {
            trace!("context menu suppressed");
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }

    /// Handle a visibility change (tab switch): defensively cancel any
    /// tracking in progress.
    pub fn on_visibility_change(&mut self) {
        if self.state != LifecycleState::Passive {
            trace!("visibility change, canceling tracking");
            self.reset();
        }
    }

    // -- internals ---------------------------------------------------------

    /// Abort path: fire `abort`, pass through Aborted, reset.
    fn abort(&mut self) {
        self.state = LifecycleState::Aborted;
        if let Some(buffer) = self.buffer.take() {
            self.abort_listeners.emit(|cb| cb(&buffer));
        }
        // Aborted is transient: immediately reset to Passive
        self.reset();
    }

    /// Full reset: Passive state, capture released, timer disarmed,
    /// buffer discarded. Matches every enable/initiate path.
    fn reset(&mut self) {
        self.state = LifecycleState::Passive;
        self.buffer = None;
        self.router.release_input();
        self.timer.disarm();
    }
}

impl std::fmt::Debug for PointerGestureStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerGestureStateMachine")
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("buffered", &self.buffer.as_ref().map(|b| b.len()))
            .field("context_menu_armed", &self.context_menu_armed)
            .finish()
    }
}
