//! Static screens: landing, progress and about.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCamera, LdUpload};

/// Props for the [`Home`] screen.
#[derive(Props, Clone, PartialEq)]
pub struct HomeProps {
    /// Open the camera.
    on_camera: EventHandler<()>,
    /// Open the upload screen.
    on_upload: EventHandler<()>,
}

/// Landing screen with the two ways to provide a photo.
#[component]
pub fn Home(props: HomeProps) -> Element {
    rsx! {
        div { class: "home-screen",
            div { class: "hero",
                h2 { "Check a skin spot" }
                p { class: "muted",
                    "Take or upload a close-up photo, frame the spot, and get an instant assessment."
                }
            }
            div { class: "home-actions",
                button {
                    class: "btn btn-primary btn-wide",
                    onclick: move |_| props.on_camera.call(()),
                    Icon { icon: LdCamera, width: 20, height: 20 }
                    span { "Take photo" }
                }
                button {
                    class: "btn btn-secondary btn-wide",
                    onclick: move |_| props.on_upload.call(()),
                    Icon { icon: LdUpload, width: 20, height: 20 }
                    span { "Upload photo" }
                }
            }
            p { class: "muted small",
                "For best results, use good lighting and keep the spot in focus."
            }
        }
    }
}

/// Shown while the classifier works.
#[component]
pub fn Loading() -> Element {
    rsx! {
        div { class: "loading-screen",
            div { class: "spinner" }
            p { "Analyzing image..." }
        }
    }
}

/// About the app and its limits.
#[component]
pub fn Info() -> Element {
    rsx! {
        div { class: "info-screen",
            section {
                h2 { "How it works" }
                ol {
                    li { "Take a photo or upload one." }
                    li { "Drag the box over the spot and resize it from the corners." }
                    li { "Adjust brightness and contrast if the spot is hard to see." }
                    li { "Tap Analyze to get a classification." }
                }
            }
            section { class: "disclaimer",
                h2 { "Disclaimer" }
                p {
                    "This tool is for educational purposes only and is not a medical diagnosis. "
                    "Always consult a dermatologist about any skin concern."
                }
            }
        }
    }
}
