//! Gesture state machine: turns raw touch input into synthetic mouse and
//! drag-and-drop events.
//!
//! Lifecycle of one contact:
//!
//! ```text
//! Idle --start on draggable--> Pressed --moved past threshold--> Dragging
//!   ^                             |                                 |
//!   +------- release (click) -----+------ release (drop/dragend) ---+
//! ```
//!
//! The engine never sleeps or polls. Long-press timers and deferred proxy
//! moves are queued as [`HostRequest`]s; the host schedules them and calls
//! back [`TouchDragEngine::fire_long_press`] / [`TouchDragEngine::run_frame`].

use crate::config::EngineConfig;
use crate::data_transfer::DataTransfer;
use crate::dom::Dom;
use crate::drag_image::DragImage;
use crate::error::ConfigError;
use crate::event::{EventKind, SharedDataTransfer, dispatch};
use crate::input::{Instant, TouchInput, TouchPhase};
use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

/// Observable phase of the current gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No contact, or the contact did not start on a drag source.
    Idle,
    /// Contact on a drag source, threshold not yet exceeded.
    Pressed,
    /// Threshold exceeded, drag lifecycle events are flowing.
    Dragging,
}

/// Identifies the session a long-press timer was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongPressToken(u64);

/// Work the host must schedule on the engine's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Call [`TouchDragEngine::fire_long_press`] with `token` after `delay`.
    LongPress { token: LongPressToken, delay: Duration },
    /// Call [`TouchDragEngine::run_frame`] on the next animation frame.
    AnimationFrame,
}

/// What the host should do with the raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Leave default handling alone.
    Pass,
    /// Call `preventDefault()` (blocks scrolling and compatibility mouse events).
    PreventDefault,
}

impl Disposition {
    pub fn is_prevent_default(self) -> bool {
        self == Self::PreventDefault
    }
}

#[derive(Debug, Clone)]
enum Phase<N> {
    Idle,
    Pressed {
        source: N,
        /// Client point of the initial contact.
        origin: Point,
        press: TouchInput,
    },
    Dragging {
        source: N,
        /// Element that last received `dragenter`.
        target: Option<N>,
    },
}

#[derive(Debug, Clone)]
struct Session<N> {
    id: u64,
    phase: Phase<N>,
    /// Most recent touch carrying coordinates; release events reuse it.
    last_touch: Option<TouchInput>,
}

/// Emulates mouse and HTML drag-and-drop events from single-finger touch.
pub struct TouchDragEngine<D: Dom> {
    dom: D,
    config: EngineConfig,
    session: Session<D::Node>,
    drag_image: DragImage<D::Node>,
    data_transfer: SharedDataTransfer,
    /// Survives session resets; drives double-click detection.
    last_click: Option<Instant>,
    requests: Vec<HostRequest>,
    frame_requested: bool,
}

impl<D: Dom> TouchDragEngine<D> {
    /// Create an engine bound to `dom`.
    pub fn new(dom: D, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(dom, config))
    }

    /// Create an engine with the default thresholds and timings.
    pub fn with_defaults(dom: D) -> Self {
        Self::build(dom, EngineConfig::default())
    }

    fn build(dom: D, config: EngineConfig) -> Self {
        Self {
            dom,
            config,
            session: Session {
                id: 0,
                phase: Phase::Idle,
                last_touch: None,
            },
            drag_image: DragImage::new(),
            data_transfer: Rc::new(RefCell::new(DataTransfer::new())),
            last_click: None,
            requests: Vec::new(),
            frame_requested: false,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> GesturePhase {
        match self.session.phase {
            Phase::Idle => GesturePhase::Idle,
            Phase::Pressed { .. } => GesturePhase::Pressed,
            Phase::Dragging { .. } => GesturePhase::Dragging,
        }
    }

    pub fn drag_source(&self) -> Option<&D::Node> {
        match &self.session.phase {
            Phase::Idle => None,
            Phase::Pressed { source, .. } | Phase::Dragging { source, .. } => Some(source),
        }
    }

    /// The floating proxy, while a drag is in progress.
    pub fn drag_proxy(&self) -> Option<&D::Node> {
        self.drag_image.proxy()
    }

    /// Payload shared by the drag events of the current session.
    pub fn data_transfer(&self) -> SharedDataTransfer {
        Rc::clone(&self.data_transfer)
    }

    pub fn last_click(&self) -> Option<Instant> {
        self.last_click
    }

    /// Drain the scheduling requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Route a raw touch event to the matching handler.
    ///
    /// `target` is the element the touch event was dispatched at (for
    /// move events the engine hit-tests on its own).
    pub fn handle_touch(&mut self, phase: TouchPhase, input: &TouchInput, target: Option<D::Node>) -> Disposition {
        match phase {
            TouchPhase::Start => self.on_contact_start(input, target),
            TouchPhase::Move => self.on_contact_move(input),
            TouchPhase::End => self.on_contact_end(target, input, false),
            TouchPhase::Cancel => self.on_contact_end(target, input, true),
        }
    }

    /// A finger touched the surface.
    pub fn on_contact_start(&mut self, input: &TouchInput, target: Option<D::Node>) -> Disposition {
        if !self.accepts(input) {
            return Disposition::Pass;
        }

        if let Some(last_click) = self.last_click {
            let elapsed = input.time.saturating_duration_since(last_click);
            if elapsed < self.config.double_click_window()
                && self.emit(Some(input), EventKind::DoubleClick, target.as_ref())
            {
                log::debug!("double-click handled after {:?}", elapsed);
                self.reset();
                return Disposition::PreventDefault;
            }
        }

        self.reset();

        let Some(target) = target else {
            return Disposition::Pass;
        };
        let Some(source) = self.closest_draggable(&target) else {
            return Disposition::Pass;
        };
        let Some(origin) = input.client_point() else {
            return Disposition::Pass;
        };

        // Give the page a chance to run its own pointer interaction.
        if self.emit(Some(input), EventKind::MouseMove, Some(&target))
            || self.emit(Some(input), EventKind::MouseDown, Some(&target))
        {
            return Disposition::Pass;
        }

        log::debug!("pressed on drag source {:?}", source);
        self.session.phase = Phase::Pressed {
            source,
            origin,
            press: input.clone(),
        };
        self.session.last_touch = Some(input.clone());
        self.requests.push(HostRequest::LongPress {
            token: LongPressToken(self.session.id),
            delay: self.config.long_press_delay(),
        });
        Disposition::PreventDefault
    }

    /// The finger moved.
    pub fn on_contact_move(&mut self, input: &TouchInput) -> Disposition {
        if !self.accepts(input) {
            return Disposition::Pass;
        }

        let target = self.resolve_target(input);
        if self.emit(Some(input), EventKind::MouseMove, target.as_ref()) {
            self.session.last_touch = Some(input.clone());
            return Disposition::PreventDefault;
        }

        match &self.session.phase {
            Phase::Idle => Disposition::Pass,
            Phase::Pressed { source, origin, .. } => {
                let Some(point) = input.client_point() else {
                    return Disposition::Pass;
                };
                let delta = (point.x - origin.x).abs() + (point.y - origin.y).abs();
                if delta <= self.config.drag_threshold {
                    return Disposition::Pass;
                }
                let source = source.clone();
                self.begin_drag(input, source, target);
                Disposition::PreventDefault
            }
            Phase::Dragging { source, target: entered } => {
                if !self.dom.is_connected(source) {
                    log::debug!("drag source left the document, cancelling");
                    self.finish_drag(true);
                    return Disposition::PreventDefault;
                }
                let entered = entered.clone();
                self.continue_drag(input, entered, target);
                Disposition::PreventDefault
            }
        }
    }

    /// The finger lifted (`cancelled == false`) or the platform aborted the
    /// contact (`cancelled == true`).
    pub fn on_contact_end(&mut self, target: Option<D::Node>, input: &TouchInput, cancelled: bool) -> Disposition {
        if !self.accepts(input) {
            return Disposition::Pass;
        }

        if self.emit(self.session.last_touch.as_ref(), EventKind::MouseUp, target.as_ref()) {
            return Disposition::PreventDefault;
        }

        match &self.session.phase {
            Phase::Dragging { source, .. } => {
                let cancelled = cancelled || !self.dom.is_connected(source);
                self.finish_drag(cancelled);
            }
            Phase::Idle | Phase::Pressed { .. } => {
                // Plain tap: no drag happened.
                self.session.phase = Phase::Idle;
                self.emit(self.session.last_touch.as_ref(), EventKind::Click, target.as_ref());
                self.last_click = Some(input.time);
                self.reset();
            }
        }
        Disposition::Pass
    }

    /// Long-press timer callback.
    ///
    /// Raises `contextmenu` at the source if `token` still names the current
    /// session and no drag has started; cancels the session when handled.
    pub fn fire_long_press(&mut self, token: LongPressToken) {
        if token.0 != self.session.id {
            return;
        }
        let Phase::Pressed { source, press, .. } = &self.session.phase else {
            return;
        };
        if self.drag_image.is_active() {
            return;
        }
        if self.emit(Some(press), EventKind::ContextMenu, Some(source)) {
            log::debug!("context menu handled, cancelling gesture");
            self.reset();
        }
    }

    /// Animation-frame callback: apply the latest proxy position.
    pub fn run_frame(&mut self) {
        self.frame_requested = false;
        self.drag_image.flush(&self.dom, &self.config);
    }

    fn begin_drag(&mut self, input: &TouchInput, source: D::Node, target: Option<D::Node>) {
        log::debug!("drag started from {:?}", source);
        self.session.last_touch = Some(input.clone());
        self.emit(Some(input), EventKind::DragStart, Some(&source));

        if let Some(touch) = input.primary() {
            if let Err(e) = self.drag_image.create(&self.dom, &self.config, &source, touch) {
                log::warn!("Failed to create drag image: {}", e);
            }
        }

        self.emit(Some(input), EventKind::DragEnter, target.as_ref());
        self.session.phase = Phase::Dragging { source, target };
    }

    fn continue_drag(&mut self, input: &TouchInput, entered: Option<D::Node>, target: Option<D::Node>) {
        self.session.last_touch = Some(input.clone());

        if let Some(page) = input.page_point() {
            if self.drag_image.move_to(page) {
                self.request_frame();
            }
        }

        if target != entered {
            self.emit(Some(input), EventKind::DragLeave, entered.as_ref());
            self.emit(Some(input), EventKind::DragEnter, target.as_ref());
            if let Phase::Dragging { target: tracked, .. } = &mut self.session.phase {
                *tracked = target.clone();
            }
        }

        self.emit(Some(input), EventKind::DragOver, target.as_ref());
    }

    fn finish_drag(&mut self, cancelled: bool) {
        self.drag_image.destroy(&self.dom);

        let phase = std::mem::replace(&mut self.session.phase, Phase::Idle);
        if let Phase::Dragging { source, target } = phase {
            let last_touch = self.session.last_touch.take();
            if !cancelled {
                self.emit(last_touch.as_ref(), EventKind::Drop, target.as_ref());
            }
            self.emit(last_touch.as_ref(), EventKind::DragEnd, Some(&source));
            log::debug!("drag finished (cancelled: {})", cancelled);
        }
        self.reset();
    }

    /// Ignore already-handled input; abort the session on multi-touch.
    fn accepts(&mut self, input: &TouchInput) -> bool {
        if input.default_prevented {
            log::trace!("ignoring touch already handled upstream");
            return false;
        }
        if !input.is_single_contact() {
            if !matches!(self.session.phase, Phase::Idle) {
                log::debug!("multi-touch detected, discarding gesture");
            }
            self.reset();
            return false;
        }
        true
    }

    /// Start a fresh session: no source, no proxy, new payload.
    fn reset(&mut self) {
        self.drag_image.destroy(&self.dom);
        self.session.id += 1;
        self.session.phase = Phase::Idle;
        self.session.last_touch = None;
        self.data_transfer = Rc::new(RefCell::new(DataTransfer::new()));
        // A frame the host never delivered must not block the next gesture.
        self.frame_requested = false;
    }

    fn request_frame(&mut self) {
        if !self.frame_requested {
            self.frame_requested = true;
            self.requests.push(HostRequest::AnimationFrame);
        }
    }

    fn emit(&self, source: Option<&TouchInput>, kind: EventKind, target: Option<&D::Node>) -> bool {
        dispatch(&self.dom, source, kind, target, &self.data_transfer)
    }

    /// Nearest ancestor-or-self carrying the draggable marker.
    fn closest_draggable(&self, node: &D::Node) -> Option<D::Node> {
        let mut current = Some(node.clone());
        while let Some(node) = current {
            if self.dom.has_attribute(&node, &self.config.draggable_attribute) {
                return Some(node);
            }
            current = self.dom.parent(&node);
        }
        None
    }

    /// Element under the contact, skipping pointer-transparent ancestors.
    fn resolve_target(&self, input: &TouchInput) -> Option<D::Node> {
        let mut current = self.dom.element_from_point(input.client_point()?);
        while let Some(node) = current {
            if self.dom.computed_property(&node, "pointer-events").as_deref() != Some("none") {
                return Some(node);
            }
            current = self.dom.parent(&node);
        }
        None
    }
}
