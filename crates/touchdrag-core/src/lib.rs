//! Touchdrag Core Library
//!
//! Platform-agnostic touch-to-pointer gesture emulation: observes single-finger
//! touch input and synthesizes the mouse and HTML drag-and-drop event
//! sequence (press, click, double-click, context menu, dragstart through
//! dragend) that pointer-only drag-and-drop code expects.

pub mod config;
pub mod data_transfer;
pub mod dom;
pub mod drag_image;
pub mod error;
pub mod event;
pub mod gesture;
pub mod input;
pub mod memory;
pub mod slot;

pub use config::EngineConfig;
pub use data_transfer::{DataTransfer, DropEffect, EffectAllowed};
pub use dom::Dom;
pub use drag_image::DragImage;
pub use error::{ConfigError, DataTransferError, DomError, DomResult};
pub use event::{EventKind, SharedDataTransfer, SyntheticEvent, dispatch};
pub use gesture::{Disposition, GesturePhase, HostRequest, LongPressToken, TouchDragEngine};
pub use input::{Instant, Modifiers, TouchInput, TouchPhase, TouchPoint};
pub use memory::{DispatchRecord, MemoryDom, NodeId};
pub use slot::{EngineSlot, SharedEngine};
