//! Live camera viewfinder with capture and flash buttons.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdArrowLeft, LdZap};
use skinscan_core::{SourceImage, Torch};
use wasm_bindgen::JsCast;

use crate::camera::{CameraStream, capture_frame};

/// Props for the [`CameraView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CameraViewProps {
    /// The active stream, owned by the app. `None` while acquiring or
    /// after release.
    stream: Signal<Option<CameraStream>>,
    /// Acquisition failure to show instead of the viewfinder.
    error: Option<String>,
    /// Fired with the captured frame.
    on_capture: EventHandler<SourceImage>,
    /// Fired when the user backs out.
    on_close: EventHandler<()>,
}

/// Full-screen viewfinder.
///
/// Attaches the stream to its `<video>` whenever either changes. The flash
/// button is enabled only when the video track supports the torch.
#[component]
pub fn CameraView(props: CameraViewProps) -> Element {
    let stream = props.stream;
    let mut video = use_signal(|| Option::<Rc<web_sys::HtmlVideoElement>>::None);
    let mut torch = use_signal(Torch::default);
    let mut capture_error = use_signal(|| Option::<String>::None);

    use_effect(move || {
        let Some(video) = video() else {
            return;
        };
        let stream = stream.read();
        if let Some(stream) = stream.as_ref() {
            stream.attach(&video);
            torch.set(stream.torch());
        } else {
            video.set_src_object(None);
            torch.set(Torch::default());
        }
    });

    let capture = move |_: MouseEvent| {
        let Some(video) = video() else {
            return;
        };
        match capture_frame(&video) {
            Ok(source) => {
                capture_error.set(None);
                props.on_capture.call(source);
            }
            Err(e) => {
                tracing::warn!("capture failed: {e}");
                capture_error.set(Some(e.to_string()));
            }
        }
    };

    let toggle_flash = move |_: MouseEvent| {
        let mut next = torch();
        let Some(enabled) = next.toggle() else {
            return;
        };
        if let Some(stream) = stream.read().as_ref() {
            match stream.set_torch(enabled) {
                Ok(()) => torch.set(next),
                Err(e) => tracing::warn!("{e}"),
            }
        }
    };

    let flash_class = if torch().is_enabled() {
        "btn-icon flash-on"
    } else {
        "btn-icon"
    };

    rsx! {
        div { class: "camera-screen",
            div { class: "camera-toolbar",
                button {
                    class: "btn-icon",
                    aria_label: "Back",
                    onclick: move |_| props.on_close.call(()),
                    Icon { icon: LdArrowLeft, width: 24, height: 24 }
                }
                button {
                    class: "{flash_class}",
                    aria_label: "Toggle flash",
                    disabled: !torch().is_supported(),
                    onclick: toggle_flash,
                    Icon { icon: LdZap, width: 24, height: 24 }
                }
            }

            if let Some(ref err) = props.error {
                div { class: "camera-error",
                    p { "Camera access is unavailable." }
                    p { class: "muted", "{err}" }
                    p { class: "muted", "Allow camera access or upload a photo instead." }
                }
            } else {
                video {
                    class: "camera-preview",
                    autoplay: true,
                    playsinline: true,
                    muted: true,
                    onmounted: move |evt| {
                        let element = evt
                            .data()
                            .downcast::<web_sys::Element>()
                            .and_then(|e| e.clone().dyn_into::<web_sys::HtmlVideoElement>().ok());
                        video.set(element.map(Rc::new));
                    },
                }
                div { class: "camera-guide" }
            }

            if let Some(ref err) = capture_error() {
                p { class: "error-text", "{err}" }
            }

            div { class: "camera-controls",
                button {
                    class: "btn-capture",
                    aria_label: "Capture photo",
                    disabled: stream.read().is_none(),
                    onclick: capture,
                }
            }
        }
    }
}
