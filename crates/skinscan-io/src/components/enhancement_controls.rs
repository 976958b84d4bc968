//! Brightness and contrast sliders.

use dioxus::prelude::*;
use skinscan_core::Enhancement;
use skinscan_core::types::ENHANCEMENT_MAX;

/// Props for the [`EnhancementControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EnhancementControlsProps {
    /// Current settings.
    enhancement: Enhancement,
    /// Fired on every slider movement with the new settings.
    on_change: EventHandler<Enhancement>,
    /// Fired by the reset button.
    on_reset: EventHandler<()>,
}

/// Brightness and contrast sliders, 0-200%, with a reset button.
///
/// Changes apply to the live preview only; pixels are touched when the
/// image is baked for analysis.
#[component]
pub fn EnhancementControls(props: EnhancementControlsProps) -> Element {
    let enhancement = props.enhancement;
    let on_change = props.on_change;
    let on_reset = props.on_reset;

    rsx! {
        div { class: "enhance-controls",
            {render_slider(
                "brightness",
                "Brightness",
                enhancement.brightness(),
                move |v| {
                    let mut e = enhancement;
                    e.set_brightness(v);
                    on_change.call(e);
                },
            )}
            {render_slider(
                "contrast",
                "Contrast",
                enhancement.contrast(),
                move |v| {
                    let mut e = enhancement;
                    e.set_contrast(v);
                    on_change.call(e);
                },
            )}
            if !enhancement.is_identity() {
                button {
                    class: "btn btn-link",
                    onclick: move |_| on_reset.call(()),
                    "Reset"
                }
            }
        }
    }
}

/// Render a labeled percentage slider.
fn render_slider(id: &str, label: &str, value: u32, on_input: impl Fn(u32) + 'static) -> Element {
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        div { class: "slider-group",
            div { class: "slider-header",
                label { r#for: "{id}", "{label}" }
                span { class: "slider-value", "{value}%" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "0",
                max: "{ENHANCEMENT_MAX}",
                step: "1",
                value: "{value}",
                class: "slider",
                oninput: move |e| {
                    match e.value().parse::<u32>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            tracing::warn!("slider parse failure: {err:?} from {:?}", e.value());
                        }
                    }
                },
            }
        }
    }
}
