//! Transient confirmation message.

use dioxus::prelude::*;

/// Props for the [`Toast`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ToastProps {
    /// Text to show; nothing is rendered while `None`.
    message: Option<String>,
}

/// A small floating message near the bottom of the screen. The caller
/// decides when to clear it.
#[component]
pub fn Toast(props: ToastProps) -> Element {
    let Some(message) = props.message else {
        return rsx! {};
    };
    rsx! {
        div { class: "toast", role: "status", "{message}" }
    }
}
