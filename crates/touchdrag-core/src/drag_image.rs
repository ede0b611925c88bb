//! Floating drag proxy that follows the finger.

use crate::config::EngineConfig;
use crate::dom::Dom;
use crate::error::DomResult;
use crate::input::TouchPoint;
use kurbo::{Point, Vec2};

/// Owns the visual clone of the drag source for one gesture session.
#[derive(Debug, Clone)]
pub struct DragImage<N> {
    proxy: Option<N>,
    /// Grab point relative to the source's top-left corner.
    offset: Vec2,
    /// Page position waiting for the next animation frame.
    pending: Option<Point>,
}

impl<N> Default for DragImage<N> {
    fn default() -> Self {
        Self {
            proxy: None,
            offset: Vec2::ZERO,
            pending: None,
        }
    }
}

impl<N: Clone + PartialEq + std::fmt::Debug> DragImage<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.proxy.is_some()
    }

    pub fn proxy(&self) -> Option<&N> {
        self.proxy.as_ref()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Clone `source`, style the clone and insert it under `touch`.
    ///
    /// Any previous proxy is destroyed first.
    pub fn create<D: Dom<Node = N>>(
        &mut self,
        dom: &D,
        config: &EngineConfig,
        source: &N,
        touch: &TouchPoint,
    ) -> DomResult<()> {
        self.destroy(dom);

        let proxy = dom.deep_clone(source)?;
        copy_style(dom, config, source, &proxy);

        let rect = dom.bounding_rect(source);
        self.offset = touch.client - rect.origin();

        dom.set_style(&proxy, "opacity", &config.proxy_opacity.to_string());
        place(dom, config, &proxy, touch.page - self.offset);
        dom.append_to_body(&proxy)?;

        log::debug!("drag image created for {:?} (offset {:?})", source, self.offset);
        self.proxy = Some(proxy);
        Ok(())
    }

    /// Queue a reposition to `page`, applied by [`flush`](Self::flush).
    ///
    /// Returns false when there is no proxy to move.
    pub fn move_to(&mut self, page: Point) -> bool {
        if self.proxy.is_none() {
            return false;
        }
        self.pending = Some(page);
        true
    }

    /// Apply the latest queued position. No-op once the proxy is gone.
    pub fn flush<D: Dom<Node = N>>(&mut self, dom: &D, config: &EngineConfig) {
        let Some(page) = self.pending.take() else {
            return;
        };
        if let Some(proxy) = &self.proxy {
            place(dom, config, proxy, page - self.offset);
        }
    }

    /// Remove the proxy from the document. Safe to call repeatedly.
    pub fn destroy<D: Dom<Node = N>>(&mut self, dom: &D) {
        self.pending = None;
        if let Some(proxy) = self.proxy.take() {
            dom.detach(&proxy);
            log::debug!("drag image destroyed");
        }
    }
}

fn place<D: Dom>(dom: &D, config: &EngineConfig, proxy: &D::Node, at: Point) {
    dom.set_style(proxy, "position", "absolute");
    dom.set_style(proxy, "pointer-events", "none");
    dom.set_style(proxy, "z-index", &config.proxy_z_index.to_string());
    dom.set_style(proxy, "left", &format!("{}px", at.x.round()));
    dom.set_style(proxy, "top", &format!("{}px", at.y.round()));
}

/// Copy computed styles from `src` onto `dst`, node by node, depth-first.
fn copy_style<D: Dom>(dom: &D, config: &EngineConfig, src: &D::Node, dst: &D::Node) {
    for attr in &config.stripped_attributes {
        dom.remove_attribute(dst, attr);
    }
    for (name, value) in dom.computed_style(src) {
        dom.set_style(dst, &name, &value);
    }
    dom.set_style(dst, "pointer-events", "none");

    for (src_child, dst_child) in dom.children(src).iter().zip(dom.children(dst).iter()) {
        copy_style(dom, config, src_child, dst_child);
    }
}
