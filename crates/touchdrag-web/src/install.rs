//! JS entry points: install/uninstall the engine on the current document.

use crate::host::WebDom;
use kurbo::Point;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use touchdrag_core::{
    EngineConfig, EngineSlot, HostRequest, Instant, Modifiers, SharedEngine, TouchDragEngine, TouchInput,
    TouchPhase, TouchPoint,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, Touch, TouchEvent};

type TouchListener = Closure<dyn FnMut(TouchEvent)>;

thread_local! {
    static SLOT: EngineSlot<WebDom> = const { EngineSlot::new() };
    // Store closures to keep the listeners alive while installed
    static LISTENERS: RefCell<Vec<(TouchPhase, TouchListener)>> = const { RefCell::new(Vec::new()) };
}

/// Set up panic reporting and console logging.
///
/// `level` is a `log` level name (`"debug"`, `"info"`, ...); defaults to info.
#[wasm_bindgen(js_name = initTouchDragLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();
    let level = level
        .and_then(|l| l.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already initialized");
    }
}

/// Install touch drag-and-drop emulation with the default settings.
///
/// Returns false when an engine was already installed.
#[wasm_bindgen(js_name = installTouchDragDrop)]
pub fn install() -> Result<bool, JsValue> {
    install_with_config(None)
}

/// Install with a JSON configuration (see `EngineConfig`); missing fields
/// take their defaults.
#[wasm_bindgen(js_name = installTouchDragDropWithConfig)]
pub fn install_with_config(config_json: Option<String>) -> Result<bool, JsValue> {
    let installed = SLOT.with(|slot| {
        slot.install_with(|| -> Result<_, JsValue> {
            let config = match config_json.as_deref() {
                Some(json) => EngineConfig::from_json(json).map_err(JsError::from)?,
                None => EngineConfig::default(),
            };
            let dom = WebDom::new().map_err(JsError::from)?;
            Ok(TouchDragEngine::new(dom, config).map_err(JsError::from)?)
        })
    })?;

    let Some(engine) = installed else {
        return Ok(false);
    };

    let dom = engine.borrow().dom().clone();
    if dom.supports_touch() {
        if let Err(e) = register_listeners(&dom) {
            // Leave nothing half-installed so a later install can retry.
            uninstall();
            return Err(e);
        }
    } else {
        log::info!("touch input not available, listeners not registered");
    }
    Ok(true)
}

/// Remove the listeners and drop the engine. A later install starts fresh.
#[wasm_bindgen(js_name = uninstallTouchDragDrop)]
pub fn uninstall() {
    // May run from inside a synthetic event listener, so the engine itself
    // is never borrowed here.
    if SLOT.with(|slot| slot.uninstall()).is_none() {
        return;
    }
    let listeners = LISTENERS.with(|listeners| std::mem::take(&mut *listeners.borrow_mut()));
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        for (phase, listener) in &listeners {
            if let Err(e) =
                document.remove_event_listener_with_callback(phase.event_type(), listener.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", phase.event_type(), e);
            }
        }
    }
    log::info!("touch drag engine uninstalled");
}

#[wasm_bindgen(js_name = isTouchDragDropInstalled)]
pub fn is_installed() -> bool {
    SLOT.with(|slot| slot.is_installed())
}

fn register_listeners(dom: &WebDom) -> Result<(), JsValue> {
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    for phase in TouchPhase::ALL {
        let listener = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            on_touch(phase, event);
        });
        dom.document().add_event_listener_with_callback_and_add_event_listener_options(
            phase.event_type(),
            listener.as_ref().unchecked_ref(),
            &options,
        )?;
        LISTENERS.with(|listeners| listeners.borrow_mut().push((phase, listener)));
    }
    Ok(())
}

fn on_touch(phase: TouchPhase, event: TouchEvent) {
    let Some(engine) = SLOT.with(|slot| slot.get()) else {
        return;
    };
    let input = touch_input(&event);
    let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());

    let disposition = {
        let Ok(mut engine) = engine.try_borrow_mut() else {
            log::warn!("{} received while the engine is busy, ignoring", phase.event_type());
            return;
        };
        engine.handle_touch(phase, &input, target)
    };
    if disposition.is_prevent_default() {
        event.prevent_default();
    }
    schedule(&engine);
}

fn touch_input(event: &TouchEvent) -> TouchInput {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| TouchPoint {
            page: touch_coords(&t, "page"),
            client: touch_coords(&t, "client"),
            screen: touch_coords(&t, "screen"),
        })
        .collect();

    TouchInput {
        touches,
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
        default_prevented: event.default_prevented(),
        time: Instant::now(),
    }
}

/// Read `<prefix>X`/`<prefix>Y` as doubles; the typed getters truncate to integers.
fn touch_coords(touch: &Touch, prefix: &str) -> Point {
    let axis = |name: &str| {
        js_sys::Reflect::get(touch, &JsValue::from_str(&format!("{}{}", prefix, name)))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    };
    Point::new(axis("X"), axis("Y"))
}

/// Hand the engine's pending timer and frame requests to the browser.
fn schedule(engine: &SharedEngine<WebDom>) {
    let Ok(mut guard) = engine.try_borrow_mut() else {
        return;
    };
    let requests = guard.take_requests();
    let window = guard.dom().window().clone();
    drop(guard);

    for request in requests {
        let weak = Rc::downgrade(engine);
        let result = match request {
            HostRequest::LongPress { token, delay } => {
                let callback = Closure::once_into_js(move || {
                    with_engine(&weak, |engine| engine.fire_long_press(token));
                });
                let delay = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
                    .map(|_| ())
            }
            HostRequest::AnimationFrame => {
                let callback = Closure::once_into_js(move |_timestamp: f64| {
                    with_engine(&weak, |engine| engine.run_frame());
                });
                window
                    .request_animation_frame(callback.unchecked_ref())
                    .map(|_| ())
            }
        };
        if let Err(e) = result {
            log::warn!("Failed to schedule {:?}: {:?}", request, e);
        }
    }
}

/// Run `f` on a still-installed engine, then flush whatever it scheduled.
fn with_engine(weak: &Weak<RefCell<TouchDragEngine<WebDom>>>, f: impl FnOnce(&mut TouchDragEngine<WebDom>)) {
    let Some(engine) = weak.upgrade() else {
        return;
    };
    match engine.try_borrow_mut() {
        Ok(mut guard) => f(&mut guard),
        Err(_) => {
            log::warn!("engine busy, dropping deferred callback");
            return;
        }
    }
    schedule(&engine);
}
