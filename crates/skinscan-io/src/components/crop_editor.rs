//! Interactive crop box over the source photo.
//!
//! The photo is shown letterboxed inside a wrapper. Once it has loaded,
//! the wrapper and image sizes are measured and published through the
//! `model` signal. A model already present for the same layout is kept, so
//! remounting the editor does not discard edits. Dragging the
//! box body moves it; dragging a corner handle resizes it. Move and
//! release events are tracked on the document for the duration of a
//! gesture, so the pointer may leave the box while dragging.

use std::rc::Rc;

use dioxus::prelude::*;
use skinscan_core::filter::preview_css;
use skinscan_core::{
    GeometryModel, GestureController, GestureError, GestureTarget, Handle, Point, Size,
};

use crate::listeners::PointerListeners;

/// Props for the [`CropEditor`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CropEditorProps {
    /// The source photo as a `data:` URL.
    image_url: String,
    /// Crop and enhancement state, `None` until the photo is laid out.
    model: Signal<Option<GeometryModel>>,
}

/// The crop editor: letterboxed photo with a draggable, resizable box.
#[component]
pub fn CropEditor(props: CropEditorProps) -> Element {
    let mut model = props.model;
    let mut wrapper = use_signal(|| Option::<Rc<MountedData>>::None);
    let mut image = use_signal(|| Option::<Rc<MountedData>>::None);
    let mut gestures = use_signal(GestureController::<PointerListeners>::new);

    // Measure the layout. A new source arrives with the model cleared.
    let measure = move || async move {
        let (Some(wrapper), Some(image)) = (wrapper(), image()) else {
            return;
        };
        let (Ok(viewport), Ok(displayed)) =
            (wrapper.get_client_rect().await, image.get_client_rect().await)
        else {
            tracing::warn!("failed to measure crop layout");
            return;
        };
        gestures.write().end();
        let previous = (*model.peek()).clone();
        model.set(Some(GeometryModel::relayout(
            previous,
            Size::new(viewport.width(), viewport.height()),
            Size::new(displayed.width(), displayed.height()),
        )));
    };

    let mut start_gesture = move |target: GestureTarget, at: Point| {
        let Some(current) = (*model.peek()).clone() else {
            return;
        };
        let mut gestures_handle = gestures;
        let began = gestures_handle.write().try_begin(target, at, &current, || {
            PointerListeners::attach(
                move |point| {
                    if let Some(m) = model.write().as_mut() {
                        gestures.peek().update(point, m);
                    }
                },
                move || {
                    gestures.write().end();
                },
            )
        });
        match began {
            Ok(()) => {}
            Err(e @ GestureError::Untracked(_)) => tracing::warn!("{e}"),
            Err(e) => tracing::debug!("{e}"),
        }
    };

    let current = model();
    let filter = current
        .as_ref()
        .map(|m| preview_css(m.enhancement()))
        .unwrap_or_default();
    let box_style = current.as_ref().map(|m| {
        let crop = m.crop();
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px;",
            crop.x, crop.y, crop.width, crop.height
        )
    });

    rsx! {
        div {
            class: "crop-wrapper",
            onmounted: move |evt| wrapper.set(Some(evt.data())),

            img {
                class: "crop-image",
                src: "{props.image_url}",
                alt: "Photo to crop",
                draggable: "false",
                style: "filter: {filter};",
                onmounted: move |evt| image.set(Some(evt.data())),
                onload: move |_| async move { measure().await },
            }

            if let Some(box_style) = box_style {
                div {
                    class: "crop-box",
                    style: "{box_style}",
                    onmousedown: move |evt| {
                        evt.prevent_default();
                        let at = evt.client_coordinates();
                        start_gesture(GestureTarget::Body, Point::new(at.x, at.y));
                    },
                    ontouchstart: move |evt| {
                        evt.prevent_default();
                        if let Some(touch) = evt.touches().first() {
                            let at = touch.client_coordinates();
                            start_gesture(GestureTarget::Body, Point::new(at.x, at.y));
                        }
                    },

                    for handle in Handle::ALL {
                        div {
                            key: "{handle}",
                            class: "crop-handle {handle}",
                            onmousedown: move |evt| {
                                evt.prevent_default();
                                evt.stop_propagation();
                                let at = evt.client_coordinates();
                                start_gesture(GestureTarget::Handle(handle), Point::new(at.x, at.y));
                            },
                            ontouchstart: move |evt| {
                                evt.prevent_default();
                                evt.stop_propagation();
                                if let Some(touch) = evt.touches().first() {
                                    let at = touch.client_coordinates();
                                    start_gesture(GestureTarget::Handle(handle), Point::new(at.x, at.y));
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}
