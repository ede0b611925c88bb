//! Synthetic pointer and drag events, and the dispatcher that fires them.

use crate::data_transfer::DataTransfer;
use crate::dom::Dom;
use crate::input::{Modifiers, TouchInput, TouchPoint};
use kurbo::Point;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared handle to the session's drag payload.
pub type SharedDataTransfer = Rc<RefCell<DataTransfer>>;

/// Every event type the engine emulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Hover (`mousemove`).
    MouseMove,
    /// Press (`mousedown`).
    MouseDown,
    /// Release (`mouseup`).
    MouseUp,
    Click,
    DoubleClick,
    ContextMenu,
    DragStart,
    DragEnter,
    DragLeave,
    DragOver,
    Drop,
    DragEnd,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseMove => "mousemove",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::ContextMenu => "contextmenu",
            Self::DragStart => "dragstart",
            Self::DragEnter => "dragenter",
            Self::DragLeave => "dragleave",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }

    pub fn is_drag_lifecycle(self) -> bool {
        matches!(
            self,
            Self::DragStart
                | Self::DragEnter
                | Self::DragLeave
                | Self::DragOver
                | Self::Drop
                | Self::DragEnd
        )
    }
}

/// An emulated event, shaped like a native mouse/drag event.
#[derive(Debug)]
pub struct SyntheticEvent {
    pub kind: EventKind,
    pub modifiers: Modifiers,
    pub page: Point,
    pub client: Point,
    pub screen: Point,
    /// Always 0 (primary button).
    pub button: i16,
    /// Always 1 (primary button held).
    pub buttons: u16,
    pub data_transfer: SharedDataTransfer,
    default_prevented: Cell<bool>,
}

impl SyntheticEvent {
    /// Build an event of `kind` from the originating touch input.
    pub fn from_touch(kind: EventKind, source: &TouchInput, data_transfer: SharedDataTransfer) -> Self {
        let point = source.primary().copied().unwrap_or_default();
        Self::new(kind, source.modifiers, point, data_transfer)
    }

    pub fn new(
        kind: EventKind,
        modifiers: Modifiers,
        point: TouchPoint,
        data_transfer: SharedDataTransfer,
    ) -> Self {
        Self {
            kind,
            modifiers,
            page: point.page,
            client: point.client,
            screen: point.screen,
            button: 0,
            buttons: 1,
            data_transfer,
            default_prevented: Cell::new(false),
        }
    }

    /// Mark the event as handled; the engine skips its own default behavior.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Fire `kind` at `target`, built from `source`.
///
/// Returns true iff a listener suppressed the default action. Does nothing
/// and returns false when either the source input or the target is absent.
pub fn dispatch<D: Dom>(
    dom: &D,
    source: Option<&TouchInput>,
    kind: EventKind,
    target: Option<&D::Node>,
    data_transfer: &SharedDataTransfer,
) -> bool {
    let (Some(source), Some(target)) = (source, target) else {
        return false;
    };

    let event = SyntheticEvent::from_touch(kind, source, Rc::clone(data_transfer));
    let handled = dom.dispatch(target, &event) || event.default_prevented();
    log::trace!("dispatched {} at {:?} (handled: {})", kind.as_str(), target, handled);
    handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Instant;
    use crate::memory::MemoryDom;

    fn shared() -> SharedDataTransfer {
        Rc::new(RefCell::new(DataTransfer::new()))
    }

    #[test]
    fn test_event_copies_touch_fields() {
        let dom = MemoryDom::new();
        let el = dom.create_element("div");
        dom.append_child(&dom.body(), &el);

        let seen = Rc::new(RefCell::new(None));
        let seen_in = seen.clone();
        dom.add_listener(&el, EventKind::MouseDown, move |e| {
            *seen_in.borrow_mut() = Some((e.page, e.client, e.screen, e.modifiers, e.button, e.buttons));
        });

        let input = TouchInput::new(
            vec![TouchPoint {
                page: Point::new(1.0, 2.0),
                client: Point::new(3.0, 4.0),
                screen: Point::new(5.0, 6.0),
            }],
            Instant::now(),
        )
        .with_modifiers(Modifiers {
            shift: true,
            alt: true,
            ..Default::default()
        });

        let handled = dispatch(&dom, Some(&input), EventKind::MouseDown, Some(&el), &shared());
        assert!(!handled);

        let (page, client, screen, modifiers, button, buttons) = seen.borrow().unwrap();
        assert_eq!(page, Point::new(1.0, 2.0));
        assert_eq!(client, Point::new(3.0, 4.0));
        assert_eq!(screen, Point::new(5.0, 6.0));
        assert!(modifiers.shift && modifiers.alt && !modifiers.ctrl && !modifiers.meta);
        assert_eq!(button, 0);
        assert_eq!(buttons, 1);
    }

    #[test]
    fn test_prevent_default_is_reported() {
        let dom = MemoryDom::new();
        let el = dom.create_element("div");
        dom.append_child(&dom.body(), &el);
        dom.add_listener(&el, EventKind::Click, |e| e.prevent_default());

        let input = TouchInput::new(vec![TouchPoint::at(0.0, 0.0)], Instant::now());
        assert!(dispatch(&dom, Some(&input), EventKind::Click, Some(&el), &shared()));
        assert!(!dispatch(&dom, Some(&input), EventKind::DoubleClick, Some(&el), &shared()));
    }

    #[test]
    fn test_missing_source_or_target_is_noop() {
        let dom = MemoryDom::new();
        let el = dom.create_element("div");
        dom.add_listener(&el, EventKind::Click, |e| e.prevent_default());
        let input = TouchInput::new(vec![TouchPoint::at(0.0, 0.0)], Instant::now());

        assert!(!dispatch(&dom, None, EventKind::Click, Some(&el), &shared()));
        assert!(!dispatch::<MemoryDom>(&dom, Some(&input), EventKind::Click, None, &shared()));
        assert!(dom.dispatched().is_empty());
    }

    #[test]
    fn test_listeners_share_payload() {
        let dom = MemoryDom::new();
        let src = dom.create_element("li");
        dom.append_child(&dom.body(), &src);
        dom.add_listener(&src, EventKind::DragStart, |e| {
            e.data_transfer.borrow_mut().set_data("text/plain", "2");
        });

        let payload = shared();
        let input = TouchInput::new(vec![TouchPoint::at(0.0, 0.0)], Instant::now());
        dispatch(&dom, Some(&input), EventKind::DragStart, Some(&src), &payload);

        assert_eq!(payload.borrow().get_data("text/plain"), "2");
    }

    #[test]
    fn test_release_without_contacts_uses_origin() {
        let event = SyntheticEvent::from_touch(
            EventKind::MouseUp,
            &TouchInput::new(Vec::new(), Instant::now()),
            shared(),
        );
        assert_eq!(event.client, Point::ZERO);
        assert!(!event.kind.is_drag_lifecycle());
        assert!(EventKind::Drop.is_drag_lifecycle());
    }
}
