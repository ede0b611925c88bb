//! Touchdrag Web Binding
//!
//! Runs the touchdrag engine against the live browser document: a `web-sys`
//! implementation of the engine's host trait, the JS-visible drag payload,
//! and the install entry points exported to JavaScript.
//!
//! Everything here is `wasm32`-only; on other targets the crate only
//! re-exports the core.

pub use touchdrag_core as core;

#[cfg(target_arch = "wasm32")]
mod data_transfer;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod install;

#[cfg(target_arch = "wasm32")]
pub use data_transfer::JsDataTransfer;
#[cfg(target_arch = "wasm32")]
pub use host::WebDom;
#[cfg(target_arch = "wasm32")]
pub use install::{init_logging, install, install_with_config, is_installed, uninstall};
