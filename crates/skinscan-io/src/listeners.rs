//! Scoped DOM event listeners.
//!
//! An [`EventListener`] registers a Rust closure on an `EventTarget` and
//! removes it again when dropped. [`PointerListeners`] bundles the
//! document-level move/end listeners a crop gesture needs, so ending the
//! gesture (dropping the guard) detaches all of them at once.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::cell::RefCell;
use std::rc::Rc;

use skinscan_core::Point;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;

/// Errors that can occur when registering listeners.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// A browser API call returned an error or a required object was
    /// missing.
    #[error("event listener error: {0}")]
    JsError(String),
}

impl From<JsValue> for ListenerError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

type Callback = Closure<dyn FnMut(web_sys::Event)>;

/// One registered listener, removed on drop.
pub struct EventListener {
    target: web_sys::EventTarget,
    kind: &'static str,
    callback: Option<Callback>,
}

impl EventListener {
    /// Listen for `kind` events on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::JsError`] if registration fails.
    pub fn new(
        target: &web_sys::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, ListenerError> {
        let callback: Callback = Closure::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback: Some(callback),
        })
    }

    /// Like [`new`](Self::new) but registered as non-passive, so the
    /// handler may call `preventDefault` (needed to stop touch scrolling).
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::JsError`] if registration fails.
    pub fn new_active(
        target: &web_sys::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, ListenerError> {
        let callback: Callback = Closure::new(handler);
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback: Some(callback),
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, callback.as_ref().unchecked_ref());
        // The listener may be dropped from inside its own callback (e.g.
        // a mouseup handler ending the gesture). Freeing a closure while
        // it runs is an error in wasm-bindgen, so free it on the next
        // microtask instead.
        wasm_bindgen_futures::spawn_local(async move {
            drop(callback);
        });
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Document-level pointer listeners for one crop gesture.
///
/// Mouse and touch input are unified: both report client coordinates,
/// touch using its first touch point.
#[derive(Debug)]
pub struct PointerListeners {
    _listeners: Vec<EventListener>,
}

impl PointerListeners {
    /// Attach `mousemove`/`touchmove` → `on_move` and `mouseup`/`touchend`
    /// → `on_end` to the document.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::JsError`] if the document is unavailable
    /// or registration fails. Listeners registered before the failure
    /// are removed.
    pub fn attach(
        on_move: impl FnMut(Point) + 'static,
        on_end: impl FnMut() + 'static,
    ) -> Result<Self, ListenerError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ListenerError::JsError("no document".into()))?;
        let target: &web_sys::EventTarget = document.as_ref();

        let on_move = Rc::new(RefCell::new(on_move));
        let on_end = Rc::new(RefCell::new(on_end));

        let mouse_move = Rc::clone(&on_move);
        let touch_move = on_move;
        let mouse_end = Rc::clone(&on_end);
        let touch_end = on_end;

        let listeners = vec![
            EventListener::new(target, "mousemove", move |event| {
                if let Some(point) = event_point(&event) {
                    (&mut *mouse_move.borrow_mut())(point);
                }
            })?,
            EventListener::new_active(target, "touchmove", move |event| {
                event.prevent_default();
                if let Some(point) = event_point(&event) {
                    (&mut *touch_move.borrow_mut())(point);
                }
            })?,
            EventListener::new(target, "mouseup", move |_| (&mut *mouse_end.borrow_mut())())?,
            EventListener::new(target, "touchend", move |_| (&mut *touch_end.borrow_mut())())?,
        ];

        Ok(Self {
            _listeners: listeners,
        })
    }
}

/// Client coordinates of a mouse event, or of the first touch of a touch
/// event.
#[must_use]
pub fn event_point(event: &web_sys::Event) -> Option<Point> {
    if let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() {
        return Some(Point::new(
            f64::from(mouse.client_x()),
            f64::from(mouse.client_y()),
        ));
    }
    let touch = event.dyn_ref::<web_sys::TouchEvent>()?.touches().get(0)?;
    Some(Point::new(
        f64::from(touch.client_x()),
        f64::from(touch.client_y()),
    ))
}
