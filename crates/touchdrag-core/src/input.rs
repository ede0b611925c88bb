//! Raw touch input as delivered by the host.

use kurbo::Point;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Which touch listener delivered the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    pub const ALL: [TouchPhase; 4] = [Self::Start, Self::Move, Self::End, Self::Cancel];

    /// DOM event type name.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Start => "touchstart",
            Self::Move => "touchmove",
            Self::End => "touchend",
            Self::Cancel => "touchcancel",
        }
    }
}

/// One contact point, in the three coordinate spaces a pointer event exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Relative to the document.
    pub page: Point,
    /// Relative to the viewport.
    pub client: Point,
    pub screen: Point,
}

impl TouchPoint {
    /// A contact whose page, client and screen coordinates coincide
    /// (unscrolled document, viewport at the screen origin).
    pub fn at(x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        Self {
            page: p,
            client: p,
            screen: p,
        }
    }
}

/// A touch event snapshot.
#[derive(Debug, Clone)]
pub struct TouchInput {
    /// Contacts currently on the surface. Usually empty on release.
    pub touches: Vec<TouchPoint>,
    pub modifiers: Modifiers,
    /// Whether an upstream listener already suppressed default handling.
    pub default_prevented: bool,
    pub time: Instant,
}

impl TouchInput {
    pub fn new(touches: Vec<TouchPoint>, time: Instant) -> Self {
        Self {
            touches,
            modifiers: Modifiers::default(),
            default_prevented: false,
            time,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn primary(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Viewport position of the first contact.
    pub fn client_point(&self) -> Option<Point> {
        self.primary().map(|t| t.client)
    }

    /// Document position of the first contact.
    pub fn page_point(&self) -> Option<Point> {
        self.primary().map(|t| t.page)
    }

    /// At most one contact on the surface.
    pub fn is_single_contact(&self) -> bool {
        self.touches.len() < 2
    }
}
