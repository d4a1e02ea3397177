//! Per-document gesture engine
//!
//! [`GestureEngine`] owns one instance of each detector, routes raw host
//! events to them in a fixed order, and forwards their output to the
//! registered dispatcher and overlay sinks. One engine per document;
//! engines share nothing but the config handle, so any number of them
//! coexist without cross-talk.
//!
//! Positions handed to sinks are normalized into the document-wide
//! coordinate space through the engine's current [`FrameOffset`].

use crate::config::{GestureConfig, SharedGestureConfig};
use crate::detect::drag::PointerGestureStateMachine;
use crate::detect::host::{EventDisposition, InputRouter, SelectionHost, TimeoutScheduler};
use crate::detect::rocker::{RockerDirection, RockerGestureDetector};
use crate::detect::wheel::{WheelDirection, WheelGestureDetector};
use crate::dispatch::{GestureDispatcher, GesturePayload, GesturePhase, GestureSubject, TargetInfo, TraceOverlay};
use crate::event::types::{GestureSample, WheelSample};
use crate::frame::FrameOffset;
use crate::geometry::Point;
use crate::pattern::PatternConstructor;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};
use uuid::Uuid;

/// Sink-side state shared between the engine and the detector callbacks.
///
/// The detectors hold `'static` callbacks, so everything those callbacks
/// touch lives behind one `Rc<RefCell<..>>` handle. Single-threaded by
/// construction.
struct SinkState {
    dispatcher: Option<Box<dyn GestureDispatcher>>,
    overlay: Option<Box<dyn TraceOverlay>>,
    constructor: PatternConstructor,
    frame_offset: FrameOffset,
    target: TargetInfo,
}

impl SinkState {
    fn dispatch(&mut self, phase: GesturePhase, payload: GesturePayload) {
        if let Some(dispatcher) = self.dispatcher.as_mut() {
            dispatcher.dispatch(phase, &payload);
        }
    }
}

/// Per-document coordinator for the three gesture detectors.
pub struct GestureEngine {
    config: SharedGestureConfig,
    url: String,
    blacklisted: bool,
    enabled: bool,
    drag: PointerGestureStateMachine,
    wheel: WheelGestureDetector,
    rocker: RockerGestureDetector,
    sinks: Rc<RefCell<SinkState>>,
}

impl GestureEngine {
    /// Build an engine for the document at `url`.
    ///
    /// The blacklist is consulted once here and again on
    /// [`apply_config`](Self::apply_config); a blacklisted engine refuses
    /// [`enable_all`](Self::enable_all).
    pub fn new(config: SharedGestureConfig, url: impl Into<String>) -> Self {
        let url = url.into();
        let snapshot = config.read().clone();
        let blacklisted = snapshot.compile_blacklist().is_blacklisted(&url);

        let sinks = Rc::new(RefCell::new(SinkState {
            dispatcher: None,
            overlay: None,
            constructor: PatternConstructor::with_thresholds(
                snapshot.pattern.distance_threshold_px,
                snapshot.pattern.angle_threshold,
            ),
            frame_offset: FrameOffset::top_level(),
            target: TargetInfo::default(),
        }));

        let mut drag = PointerGestureStateMachine::new(config.clone());
        Self::wire_drag(&mut drag, &sinks);
        let mut wheel = WheelGestureDetector::new(config.clone());
        Self::wire_wheel(&mut wheel, &sinks);
        let mut rocker = RockerGestureDetector::new(config.clone());
        Self::wire_rocker(&mut rocker, &sinks);

        debug!(url = %url, blacklisted, "gesture engine created");
        Self {
            config,
            url,
            blacklisted,
            enabled: false,
            drag,
            wheel,
            rocker,
            sinks,
        }
    }

    fn wire_drag(drag: &mut PointerGestureStateMachine, sinks: &Rc<RefCell<SinkState>>) {
        let handle = sinks.clone();
        drag.on_start("engine", move |initial, buffer| {
            let state = &mut *handle.borrow_mut();
            state.constructor.clear();
            for sample in buffer.samples() {
                for point in sample.flattened_positions() {
                    state.constructor.add_point(state.frame_offset.to_global(point));
                }
            }
            let origin = state.frame_offset.to_global(initial.position);
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.initialize(origin.x, origin.y);
                let trail: Vec<_> = buffer
                    .samples()
                    .iter()
                    .flat_map(|s| s.flattened_positions())
                    .map(|p| state.frame_offset.to_global(p))
                    .collect();
                overlay.push_points(&trail);
            }
            let payload = GesturePayload {
                subject: GestureSubject::Pattern(state.constructor.pattern()),
                target: state.target.clone(),
                position: origin,
                attempt_id: buffer.id(),
            };
            state.dispatch(GesturePhase::Start, payload);
        });

        let handle = sinks.clone();
        drag.on_update("engine", move |latest, buffer| {
            let state = &mut *handle.borrow_mut();
            let points: Vec<_> = latest
                .flattened_positions()
                .map(|p| state.frame_offset.to_global(p))
                .collect();
            for point in &points {
                state.constructor.add_point(*point);
            }
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.push_points(&points);
            }
            let payload = GesturePayload {
                subject: GestureSubject::Pattern(state.constructor.pattern()),
                target: state.target.clone(),
                position: state.frame_offset.to_global(latest.position),
                attempt_id: buffer.id(),
            };
            state.dispatch(GesturePhase::Update, payload);
        });

        let handle = sinks.clone();
        drag.on_end("engine", move |latest, buffer| {
            let state = &mut *handle.borrow_mut();
            for point in latest.flattened_positions() {
                state.constructor.add_point(state.frame_offset.to_global(point));
            }
            let payload = GesturePayload {
                subject: GestureSubject::Pattern(state.constructor.pattern()),
                target: state.target.clone(),
                position: state.frame_offset.to_global(latest.position),
                attempt_id: buffer.id(),
            };
            state.dispatch(GesturePhase::End, payload);
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.terminate();
            }
            state.constructor.clear();
        });

        let handle = sinks.clone();
        drag.on_abort("engine", move |buffer| {
            let state = &mut *handle.borrow_mut();
            let payload = GesturePayload {
                subject: GestureSubject::Pattern(state.constructor.pattern()),
                target: state.target.clone(),
                position: state.frame_offset.to_global(buffer.latest().position),
                attempt_id: buffer.id(),
            };
            state.dispatch(GesturePhase::Abort, payload);
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.terminate();
            }
            state.constructor.clear();
        });
    }

    fn wire_wheel(wheel: &mut WheelGestureDetector, sinks: &Rc<RefCell<SinkState>>) {
        let handle = sinks.clone();
        wheel.on_wheel_up("engine", move |sample| {
            Self::emit_instant(
                &handle,
                GestureSubject::Wheel(WheelDirection::Up),
                sample.position,
            );
        });
        let handle = sinks.clone();
        wheel.on_wheel_down("engine", move |sample| {
            Self::emit_instant(
                &handle,
                GestureSubject::Wheel(WheelDirection::Down),
                sample.position,
            );
        });
    }

    fn wire_rocker(rocker: &mut RockerGestureDetector, sinks: &Rc<RefCell<SinkState>>) {
        let handle = sinks.clone();
        rocker.on_rocker_left("engine", move |sample| {
            Self::emit_instant(
                &handle,
                GestureSubject::Rocker(RockerDirection::Left),
                sample.position,
            );
        });
        let handle = sinks.clone();
        rocker.on_rocker_right("engine", move |sample| {
            Self::emit_instant(
                &handle,
                GestureSubject::Rocker(RockerDirection::Right),
                sample.position,
            );
        });
    }

    /// Wheel and rocker gestures complete in a single event; they get one
    /// `End`-phase payload and a fresh attempt id.
    fn emit_instant(sinks: &Rc<RefCell<SinkState>>, subject: GestureSubject, position: Point) {
        let state = &mut *sinks.borrow_mut();
        let payload = GesturePayload {
            subject,
            target: state.target.clone(),
            position: state.frame_offset.to_global(position),
            attempt_id: Uuid::new_v4(),
        };
        state.dispatch(GesturePhase::End, payload);
    }

    // -- sinks and host capabilities ---------------------------------------

    /// Install the command-dispatch sink
    pub fn set_dispatcher(&mut self, dispatcher: Box<dyn GestureDispatcher>) {
        self.sinks.borrow_mut().dispatcher = Some(dispatcher);
    }

    /// Install the trace-overlay sink
    pub fn set_overlay(&mut self, overlay: Box<dyn TraceOverlay>) {
        self.sinks.borrow_mut().overlay = Some(overlay);
    }

    /// Install the pointer-capture capability on the drag machine
    pub fn set_input_router(&mut self, router: Box<dyn InputRouter>) {
        self.drag.set_input_router(router);
    }

    /// Install the selection-clearing capability on the drag machine
    pub fn set_selection_host(&mut self, selection: Box<dyn SelectionHost>) {
        self.drag.set_selection_host(selection);
    }

    /// Install the timeout-scheduling capability on the drag machine
    pub fn set_timeout_scheduler(&mut self, timer: Box<dyn TimeoutScheduler>) {
        self.drag.set_timeout_scheduler(timer);
    }

    /// Set this document's offset inside the top-level document.
    /// Top-level documents keep the default zero offset.
    pub fn set_frame_offset(&mut self, offset: FrameOffset) {
        self.sinks.borrow_mut().frame_offset = offset;
    }

    /// Update the interaction-target metadata attached to outgoing
    /// payloads. Hosts refresh this on every press.
    pub fn set_target_info(&mut self, target: TargetInfo) {
        self.sinks.borrow_mut().target = target;
    }

    // -- lifecycle ----------------------------------------------------------

    /// Document URL this engine was built for
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the URL matched the blacklist at the last config read
    pub fn is_blacklisted(&self) -> bool {
        self.blacklisted
    }

    /// Whether the detectors currently react to input
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable every detector whose feature is switched on in the config.
    ///
    /// Returns `false` without enabling anything when the document URL is
    /// blacklisted.
    pub fn enable_all(&mut self) -> bool {
        if self.blacklisted {
            debug!(url = %self.url, "engine enable refused, url blacklisted");
            return false;
        }
        let snapshot = self.config.read().clone();
        self.apply_feature_toggles(&snapshot);
        self.enabled = true;
        debug!(url = %self.url, "gesture engine enabled");
        true
    }

    /// Disable every detector and drop all in-flight gesture state
    pub fn disable_all(&mut self) {
        self.drag.disable();
        self.wheel.disable();
        self.rocker.disable();
        self.enabled = false;
        debug!(url = %self.url, "gesture engine disabled");
    }

    /// Re-read the shared config: refresh pattern thresholds, re-test the
    /// blacklist, and toggle detectors to match the feature switches.
    pub fn apply_config(&mut self) {
        let snapshot = self.config.read().clone();
        {
            let state = &mut *self.sinks.borrow_mut();
            state.constructor = PatternConstructor::with_thresholds(
                snapshot.pattern.distance_threshold_px,
                snapshot.pattern.angle_threshold,
            );
        }
        self.blacklisted = snapshot.compile_blacklist().is_blacklisted(&self.url);
        if self.blacklisted {
            if self.enabled {
                self.disable_all();
            }
            return;
        }
        if self.enabled {
            self.apply_feature_toggles(&snapshot);
        }
    }

    fn apply_feature_toggles(&mut self, snapshot: &GestureConfig) {
        if snapshot.drag.enabled {
            self.drag.enable();
        } else {
            self.drag.disable();
        }
        if snapshot.wheel.enabled {
            self.wheel.enable();
        } else {
            self.wheel.disable();
        }
        if snapshot.rocker.enabled {
            self.rocker.enable();
        } else {
            self.rocker.disable();
        }
    }

    // -- event routing ------------------------------------------------------

    /// Route a button press.
    ///
    /// The rocker gets first claim: a press completing a left+right combo
    /// suppresses the event and cancels any pending drag attempt on the
    /// same trigger hold.
    pub fn on_button_press(&mut self, sample: &GestureSample) -> EventDisposition {
        self.wheel.on_button_press(sample);
        if self.rocker.on_button_press(sample).is_suppressed() {
            self.drag.cancel();
            return EventDisposition::Suppress;
        }
        self.drag.on_button_press(sample)
    }

    /// Route pointer motion to the drag machine
    pub fn on_pointer_move(&mut self, sample: &GestureSample) -> EventDisposition {
        self.drag.on_pointer_move(sample)
    }

    /// Route a button release
    pub fn on_button_release(&mut self, sample: &GestureSample) -> EventDisposition {
        self.wheel.on_button_release(sample);
        self.rocker.on_button_release(sample);
        self.drag.on_button_release(sample)
    }

    /// Route a wheel event. A consumed wheel gesture cancels any pending
    /// drag attempt riding the same trigger hold.
    pub fn on_wheel(&mut self, sample: &WheelSample) -> EventDisposition {
        let disposition = self.wheel.on_wheel(sample);
        if disposition.is_suppressed() {
            self.drag.cancel();
        }
        disposition
    }

    /// Route a synthesized click; suppressed when it correlates with a
    /// just-completed wheel or rocker gesture
    pub fn on_click(&mut self, timestamp: u64) -> EventDisposition {
        let wheel = self.wheel.on_click(timestamp);
        let rocker = self.rocker.on_click(timestamp);
        if wheel.is_suppressed() || rocker.is_suppressed() {
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }

    /// Route a context-menu request
    pub fn on_context_menu(&mut self) -> EventDisposition {
        let drag = self.drag.on_context_menu();
        let wheel = self.wheel.on_context_menu();
        let rocker = self.rocker.on_context_menu();
        if drag.is_suppressed() || wheel.is_suppressed() || rocker.is_suppressed() {
            EventDisposition::Suppress
        } else {
            EventDisposition::Propagate
        }
    }

    /// Route a key press to the drag machine (suppression key aborts)
    pub fn on_key_down(&mut self, key: &str, repeat: bool, trusted: bool) -> EventDisposition {
        self.drag.on_key_down(key, repeat, trusted)
    }

    /// Host timer fired
    pub fn on_timeout(&mut self) {
        self.drag.on_timeout();
    }

    /// Native drag-and-drop started
    pub fn on_drag_start(&mut self, sample: &GestureSample) -> EventDisposition {
        self.drag.on_drag_start(sample)
    }

    /// Document hidden or shown; every detector drops transient state
    pub fn on_visibility_change(&mut self) {
        trace!(url = %self.url, "visibility change, resetting detectors");
        self.drag.on_visibility_change();
        self.wheel.on_visibility_change();
        self.rocker.on_visibility_change();
    }
}
