//! JS view of the shared drag payload, exposed as `event.dataTransfer`.

use std::rc::Rc;
use touchdrag_core::SharedDataTransfer;
use wasm_bindgen::prelude::*;

/// Mirrors the subset of the native `DataTransfer` API that drag-and-drop
/// handlers use. Every wrapper handed out during one gesture points at the
/// same payload.
#[wasm_bindgen(js_name = TouchDataTransfer)]
pub struct JsDataTransfer {
    inner: SharedDataTransfer,
}

impl JsDataTransfer {
    pub fn new(inner: &SharedDataTransfer) -> Self {
        Self {
            inner: Rc::clone(inner),
        }
    }
}

#[wasm_bindgen(js_class = TouchDataTransfer)]
impl JsDataTransfer {
    #[wasm_bindgen(getter = dropEffect)]
    pub fn drop_effect(&self) -> String {
        self.inner.borrow().drop_effect().to_string()
    }

    /// Throws on values outside `copy | move | link | none`.
    #[wasm_bindgen(setter = dropEffect)]
    pub fn set_drop_effect(&self, value: String) -> Result<(), JsError> {
        self.inner.borrow_mut().set_drop_effect_str(&value)?;
        Ok(())
    }

    #[wasm_bindgen(getter = effectAllowed)]
    pub fn effect_allowed(&self) -> String {
        self.inner.borrow().effect_allowed().to_string()
    }

    #[wasm_bindgen(setter = effectAllowed)]
    pub fn set_effect_allowed(&self, value: String) -> Result<(), JsError> {
        self.inner.borrow_mut().set_effect_allowed_str(&value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getData)]
    pub fn get_data(&self, format: &str) -> String {
        self.inner.borrow().get_data(format)
    }

    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&self, format: &str, value: &str) {
        self.inner.borrow_mut().set_data(format, value);
    }

    #[wasm_bindgen(js_name = clearData)]
    pub fn clear_data(&self, format: Option<String>) {
        self.inner.borrow_mut().clear_data(format.as_deref());
    }

    #[wasm_bindgen(getter)]
    pub fn types(&self) -> js_sys::Array {
        self.inner
            .borrow()
            .types()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }
}
