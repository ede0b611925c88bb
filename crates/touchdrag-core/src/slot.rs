//! Install-once holder for the per-document engine.

use crate::dom::Dom;
use crate::gesture::TouchDragEngine;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to an installed engine.
pub type SharedEngine<D> = Rc<RefCell<TouchDragEngine<D>>>;

/// Holds at most one engine. Installing into an occupied slot is a no-op.
pub struct EngineSlot<D: Dom> {
    engine: RefCell<Option<SharedEngine<D>>>,
}

impl<D: Dom> Default for EngineSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dom> EngineSlot<D> {
    pub const fn new() -> Self {
        Self {
            engine: RefCell::new(None),
        }
    }

    /// Build and store an engine unless one is already installed.
    ///
    /// Returns `Ok(Some(engine))` when a new engine was installed and
    /// `Ok(None)` when the slot was already occupied (`build` is not called).
    pub fn install_with<E>(
        &self,
        build: impl FnOnce() -> Result<TouchDragEngine<D>, E>,
    ) -> Result<Option<SharedEngine<D>>, E> {
        if self.is_installed() {
            log::debug!("touch drag engine already installed");
            return Ok(None);
        }
        let engine = Rc::new(RefCell::new(build()?));
        *self.engine.borrow_mut() = Some(Rc::clone(&engine));
        log::info!("touch drag engine installed");
        Ok(Some(engine))
    }

    pub fn is_installed(&self) -> bool {
        self.engine.borrow().is_some()
    }

    pub fn get(&self) -> Option<SharedEngine<D>> {
        self.engine.borrow().clone()
    }

    /// Drop the installed engine, allowing a later reinstall.
    pub fn uninstall(&self) -> Option<SharedEngine<D>> {
        self.engine.borrow_mut().take()
    }
}
