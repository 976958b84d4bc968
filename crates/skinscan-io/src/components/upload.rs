//! Photo upload with drag-and-drop, file picker, and preview.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use skinscan_core::SourceImage;
use skinscan_core::source::mime_from_filename;

/// Shown when the picked file is not a usable image.
const INVALID_FILE_MESSAGE: &str = "Please select a valid image file.";

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the accepted photo when the user continues.
    on_continue: EventHandler<SourceImage>,
}

/// A drop zone and file picker that previews the chosen photo.
///
/// The file's type is taken from its extension; anything that is not a
/// known image format is rejected. "Choose different" clears the preview
/// without leaving the screen.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut selected = use_signal(|| Option::<SourceImage>::None);
    let mut error = use_signal(|| Option::<String>::None);

    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        let Some(mime) = mime_from_filename(&name) else {
            error.set(Some(INVALID_FILE_MESSAGE.to_owned()));
            return;
        };
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error.set(Some(format!("Failed to read file: {e}")));
                return;
            }
        };
        match SourceImage::from_file(&bytes, mime) {
            Ok(source) => {
                tracing::debug!("accepted upload {name} ({} bytes)", bytes.len());
                error.set(None);
                selected.set(Some(source));
            }
            Err(e) => {
                tracing::warn!("rejected upload {name}: {e}");
                error.set(Some(INVALID_FILE_MESSAGE.to_owned()));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "drop-zone dragging"
    } else {
        "drop-zone"
    };

    rsx! {
        div { class: "upload-screen",
            if let Some(source) = selected() {
                div { class: "upload-preview",
                    img { src: "{source.data_url()}", alt: "Selected photo" }
                }
                div { class: "button-row",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| selected.set(None),
                        "Choose different"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| {
                            if let Some(source) = selected() {
                                props.on_continue.call(source);
                            }
                        },
                        "Continue"
                    }
                }
            } else {
                div {
                    class: "{zone_class}",
                    ondragover: move |evt| {
                        evt.prevent_default();
                        dragging.set(true);
                    },
                    ondragleave: move |_| dragging.set(false),
                    ondrop: handle_drop,

                    p { class: "muted", "Drop a photo here or" }
                    label { class: "btn btn-primary",
                        input {
                            r#type: "file",
                            accept: "image/*",
                            class: "hidden",
                            onchange: handle_files,
                        }
                        "Choose photo"
                    }
                    p { class: "muted small", "PNG, JPEG, BMP, WebP" }
                }
            }

            if let Some(ref err) = error() {
                p { class: "error-text", "{err}" }
            }
        }
    }
}
