use dioxus::prelude::*;
use skinscan_core::{History, Verdict};

/// Props for the [`HistoryList`] component.
#[derive(Props, Clone, PartialEq)]
pub struct HistoryListProps {
    /// Saved records, newest first.
    history: History,
    /// Fired with the index of the record to view.
    on_view: EventHandler<usize>,
    /// Fired when the user asks to clear everything. Confirmation is the
    /// caller's job.
    on_clear: EventHandler<()>,
}

/// Saved results with thumbnail, label, date, and confidence.
#[component]
pub fn HistoryList(props: HistoryListProps) -> Element {
    if props.history.is_empty() {
        return rsx! {
            div { class: "history-empty",
                p { "No scans saved yet." }
                p { class: "muted", "Results you save will appear here." }
            }
        };
    }

    rsx! {
        div { class: "history-list",
            for (index, record) in props.history.records().iter().enumerate() {
                button {
                    key: "{index}",
                    class: "history-item",
                    onclick: move |_| props.on_view.call(index),
                    img { class: "history-thumbnail", src: "{record.thumbnail}", alt: "" }
                    div { class: "history-info",
                        div { class: "history-result {Verdict::from_label(&record.result).css_class()}",
                            "{record.result}"
                        }
                        div { class: "history-date", "{record.formatted_date()}" }
                    }
                    div { class: "history-confidence", "{record.confidence}%" }
                }
            }
        }
        button {
            class: "btn btn-danger",
            onclick: move |_| props.on_clear.call(()),
            "Clear history"
        }
    }
}
