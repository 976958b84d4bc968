//! Classification result display.

use dioxus::prelude::*;
use skinscan_core::Classification;

/// Props for the [`ResultCard`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultCardProps {
    /// The classification to show.
    result: Classification,
    /// The exported image that was classified, if still available.
    thumbnail: Option<String>,
    /// Whether the save button is offered (false when viewing a saved
    /// record).
    #[props(default = true)]
    can_save: bool,
    /// Save the result to history.
    on_save: EventHandler<()>,
    /// Discard everything and start a new scan.
    on_scan_again: EventHandler<()>,
}

/// Verdict badge, detail text, confidence bar, and disclaimer.
#[component]
pub fn ResultCard(props: ResultCardProps) -> Element {
    let result = &props.result;
    let verdict = result.verdict().css_class();
    let confidence = result.confidence_label();
    let bar_width = format!("width: {:.1}%;", result.confidence_fraction() * 100.0);

    rsx! {
        div { class: "result-card",
            if let Some(ref thumbnail) = props.thumbnail {
                img { class: "result-image", src: "{thumbnail}", alt: "Analyzed photo" }
            }

            div { class: "result-badge {verdict}", "{result.label}" }
            p { class: "result-detail", "{result.detail}" }

            div { class: "confidence",
                div { class: "confidence-header",
                    span { "Confidence" }
                    span { class: "confidence-value", "{confidence}" }
                }
                div { class: "confidence-track",
                    div { class: "confidence-fill {verdict}", style: "{bar_width}" }
                }
            }

            if let Some(ref disclaimer) = result.disclaimer {
                p { class: "result-disclaimer", "{disclaimer}" }
            }

            div { class: "button-row",
                if props.can_save {
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| props.on_save.call(()),
                        "Save"
                    }
                }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| props.on_scan_again.call(()),
                    "Scan again"
                }
            }
        }
    }
}
