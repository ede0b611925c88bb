//! Host document abstraction.
//!
//! The engine only touches the document through this trait. The browser
//! binding implements it over `web-sys`; [`MemoryDom`](crate::MemoryDom)
//! implements it in memory for tests and headless use.
//!
//! Hosts are single-threaded, so no `Send + Sync` bounds are required.

use crate::error::DomResult;
use crate::event::SyntheticEvent;
use kurbo::{Point, Rect};
use std::fmt::Debug;

/// Operations the engine needs from the document it is installed on.
pub trait Dom {
    /// Cheap, cloneable element handle. Equality is node identity.
    type Node: Clone + PartialEq + Debug;

    /// Parent element, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Child elements in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool;

    fn remove_attribute(&self, node: &Self::Node, name: &str);

    /// Topmost element under a viewport (client) point.
    fn element_from_point(&self, point: Point) -> Option<Self::Node>;

    /// Every computed style property of `node` as `(name, value)` pairs.
    fn computed_style(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// One computed style property.
    fn computed_property(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Write an inline style property.
    fn set_style(&self, node: &Self::Node, name: &str, value: &str);

    /// Border box in viewport coordinates.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Deep copy of `node` and its subtree, not attached to the document.
    fn deep_clone(&self, node: &Self::Node) -> DomResult<Self::Node>;

    fn append_to_body(&self, node: &Self::Node) -> DomResult<()>;

    /// Remove `node` from its parent. No-op when already detached.
    fn detach(&self, node: &Self::Node);

    /// Whether `node` is attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Deliver a bubbling, cancelable event to `target`.
    ///
    /// Returns true when a listener suppressed the default action.
    fn dispatch(&self, target: &Self::Node, event: &SyntheticEvent) -> bool;
}
