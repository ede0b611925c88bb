//! `web-sys` implementation of the engine's host trait.

use crate::data_transfer::JsDataTransfer;
use kurbo::{Point, Rect};
use touchdrag_core::{Dom, DomError, DomResult, SyntheticEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, Event, EventInit, Window};

/// The live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Bind to the current window's document.
    pub fn new() -> DomResult<Self> {
        let window = web_sys::window().ok_or_else(|| DomError::Other("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Other("no document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether the environment exposes touch events at all.
    pub fn supports_touch(&self) -> bool {
        js_sys::Reflect::has(&self.document, &JsValue::from_str("ontouchstart")).unwrap_or(false)
    }

    fn computed(&self, node: &Element) -> Option<CssStyleDeclaration> {
        self.window.get_computed_style(node).ok().flatten()
    }
}

/// Inline style object of any element (HTML or SVG).
fn inline_style(node: &Element) -> Option<CssStyleDeclaration> {
    js_sys::Reflect::get(node, &JsValue::from_str("style"))
        .ok()?
        .dyn_into::<CssStyleDeclaration>()
        .ok()
}

fn set_prop(target: &JsValue, name: &str, value: &JsValue) {
    if let Err(e) = js_sys::Reflect::set(target, &JsValue::from_str(name), value) {
        log::warn!("Failed to set event field {}: {:?}", name, e);
    }
}

fn set_point(target: &JsValue, prefix: &str, point: Point) {
    set_prop(target, &format!("{}X", prefix), &JsValue::from_f64(point.x));
    set_prop(target, &format!("{}Y", prefix), &JsValue::from_f64(point.y));
}

impl Dom for WebDom {
    type Node = Element;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        if let Err(e) = node.remove_attribute(name) {
            log::warn!("Failed to remove attribute {}: {:?}", name, e);
        }
    }

    fn element_from_point(&self, point: Point) -> Option<Element> {
        self.document.element_from_point(point.x as f32, point.y as f32)
    }

    fn computed_style(&self, node: &Element) -> Vec<(String, String)> {
        let Some(style) = self.computed(node) else {
            return Vec::new();
        };
        (0..style.length())
            .map(|i| style.item(i))
            .filter_map(|name| {
                let value = style.get_property_value(&name).ok()?;
                Some((name, value))
            })
            .collect()
    }

    fn computed_property(&self, node: &Element, name: &str) -> Option<String> {
        self.computed(node)?.get_property_value(name).ok()
    }

    fn set_style(&self, node: &Element, name: &str, value: &str) {
        let Some(style) = inline_style(node) else {
            return;
        };
        if let Err(e) = style.set_property(name, value) {
            log::warn!("Failed to set style {}: {:?}", name, e);
        }
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    fn deep_clone(&self, node: &Element) -> DomResult<Element> {
        node.clone_node_with_deep(true)
            .map_err(|e| DomError::Clone(format!("{:?}", e)))?
            .dyn_into::<Element>()
            .map_err(|_| DomError::Clone("clone is not an element".to_string()))
    }

    fn append_to_body(&self, node: &Element) -> DomResult<()> {
        let body = self.document.body().ok_or(DomError::NoBody)?;
        body.append_child(node)
            .map_err(|e| DomError::Insert(format!("{:?}", e)))?;
        Ok(())
    }

    fn detach(&self, node: &Element) {
        node.remove();
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn dispatch(&self, target: &Element, event: &SyntheticEvent) -> bool {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let evt = match Event::new_with_event_init_dict(event.kind.as_str(), &init) {
            Ok(evt) => evt,
            Err(e) => {
                log::warn!("Failed to create {} event: {:?}", event.kind.as_str(), e);
                return false;
            }
        };

        let js: &JsValue = evt.as_ref();
        set_prop(js, "button", &JsValue::from(event.button));
        set_prop(js, "buttons", &JsValue::from(event.buttons));
        set_prop(js, "altKey", &JsValue::from_bool(event.modifiers.alt));
        set_prop(js, "ctrlKey", &JsValue::from_bool(event.modifiers.ctrl));
        set_prop(js, "metaKey", &JsValue::from_bool(event.modifiers.meta));
        set_prop(js, "shiftKey", &JsValue::from_bool(event.modifiers.shift));
        set_point(js, "page", event.page);
        set_point(js, "client", event.client);
        set_point(js, "screen", event.screen);
        set_prop(
            js,
            "dataTransfer",
            &JsValue::from(JsDataTransfer::new(&event.data_transfer)),
        );

        if let Err(e) = target.dispatch_event(&evt) {
            log::warn!("Listener for {} threw: {:?}", event.kind.as_str(), e);
        }
        evt.default_prevented()
    }
}
