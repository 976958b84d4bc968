//! Small helpers around the page itself.

use crate::listeners::{EventListener, ListenerError};

/// The page origin, e.g. `https://scan.example`, used as the classifier
/// base URL.
#[must_use]
pub fn origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// Ask the user to confirm an action with a native dialog.
///
/// Returns `false` if the dialog cannot be shown.
#[must_use]
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Call `on_hidden` whenever the document becomes hidden (tab switched,
/// app backgrounded). Stops when the returned listener is dropped.
///
/// # Errors
///
/// Returns [`ListenerError::JsError`] if the document is unavailable or
/// registration fails.
pub fn on_hidden(mut on_hidden: impl FnMut() + 'static) -> Result<EventListener, ListenerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ListenerError::JsError("no document".into()))?;
    let watched = document.clone();
    EventListener::new(document.as_ref(), "visibilitychange", move |_| {
        if watched.hidden() {
            on_hidden();
        }
    })
}
