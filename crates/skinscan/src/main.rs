use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdArrowLeft, LdX};
use skinscan_client::{ClassifierClient, ClassifierConfig, ClientError};
use skinscan_core::{
    CameraConstraints, GeometryModel, History, HistoryStore, Navigator, Screen, ScreenEffect,
    SourceImage, SubmissionFlow,
};
use skinscan_io::{
    CameraStream, CameraView, CropEditor, EnhancementControls, FileUpload, HistoryList,
    LocalStorageHistory, NavBar, ResultCard, Toast, page,
};

mod screens;

/// How long the save confirmation stays up.
const TOAST_MILLIS: u32 = 2_000;

fn main() {
    if let Err(e) = dioxus::logger::init(dioxus::logger::tracing::Level::INFO) {
        web_sys::console::warn_1(&format!("logging unavailable: {e}").into());
    }
    dioxus::launch(app);
}

/// Classifier for the page's own origin.
fn classifier() -> Result<ClassifierClient, ClientError> {
    let config = page::origin().map_or_else(ClassifierConfig::default, ClassifierConfig::with_base_url);
    ClassifierClient::new(config)
}

/// Root application component.
///
/// Owns the navigation, source photo, crop model, submission flow, camera
/// stream and history signals, and runs the side effects of moving between
/// screens.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut navigator = use_signal(Navigator::new);
    let mut source = use_signal(|| Option::<SourceImage>::None);
    let mut model = use_signal(|| Option::<GeometryModel>::None);
    let mut flow = use_signal(SubmissionFlow::new);
    let mut history = use_signal(History::new);
    let mut camera = use_signal(|| Option::<CameraStream>::None);
    let mut camera_error = use_signal(|| Option::<String>::None);
    let mut camera_generation = use_signal(|| 0u64);
    let mut error = use_signal(|| Option::<String>::None);
    let mut toast = use_signal(|| Option::<String>::None);
    let mut toast_generation = use_signal(|| 0u64);
    let mut viewing_saved = use_signal(|| false);

    // --- Screen effects ---
    let mut run_effect = move |effect: ScreenEffect| match effect {
        ScreenEffect::StopCamera => {
            // Invalidate any acquisition still in flight.
            camera_generation += 1;
            camera.set(None);
        }
        ScreenEffect::StartCamera => {
            let my_generation = *camera_generation.peek();
            camera_error.set(None);
            spawn(async move {
                let outcome = CameraStream::acquire(&CameraConstraints::default()).await;
                if *camera_generation.peek() != my_generation
                    || navigator.peek().current() != Screen::Camera
                {
                    // Dropping a late stream stops it.
                    tracing::debug!("discarding stale camera stream");
                    return;
                }
                match outcome {
                    Ok(stream) => camera.set(Some(stream)),
                    Err(e) => {
                        tracing::error!("camera access error: {e}");
                        camera_error.set(Some(e.to_string()));
                    }
                }
            });
        }
        ScreenEffect::LoadHistory => {
            history.set(LocalStorageHistory::default().load());
        }
    };

    let mut go = move |to: Screen| {
        let effects = navigator.write().show(to);
        for effect in effects {
            run_effect(effect);
        }
    };

    // Release the camera when the page is backgrounded.
    let _visibility = use_hook(|| {
        Rc::new(
            page::on_hidden(move || {
                let effect = navigator.peek().on_hidden();
                if let Some(effect) = effect {
                    tracing::debug!(?effect, "page hidden");
                    run_effect(effect);
                }
            })
            .map_err(|e| tracing::warn!("cannot watch page visibility: {e}"))
            .ok(),
        )
    });

    // --- Source handlers ---
    let mut accept_source = move |image: SourceImage| {
        flow.write().reset();
        error.set(None);
        model.set(None);
        source.set(Some(image));
        go(Screen::Preprocess);
    };

    // --- Analysis ---
    let analyze = move |_: MouseEvent| {
        let (Some(image), Some(geometry)) = (source(), model()) else {
            return;
        };
        if let Err(e) = flow.write().begin_bake() {
            tracing::debug!("{e}");
            return;
        }
        error.set(None);
        viewing_saved.set(false);

        spawn(async move {
            // Let the busy state paint before the synchronous bake.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let baked = skinscan_core::bake(&image, &geometry);
            let payload = flow.write().finish_bake(baked);
            if let Some(payload) = payload {
                go(Screen::Loading);
                let outcome = match classifier() {
                    Ok(client) => client.predict(&payload).await,
                    Err(e) => Err(e),
                };
                flow.write()
                    .finish_submit(outcome.map_err(ClientError::into_submit_error));
            }

            let state = flow.peek().state().clone();
            if let Some(screen) = state.screen() {
                go(screen);
            }
            error.set(flow.peek().failure_message());
        });
    };

    // --- Results ---
    let save_result = move |()| {
        match flow.peek().save(&mut LocalStorageHistory::default(), chrono::Utc::now()) {
            Ok(true) => {
                toast_generation += 1;
                let my_generation = *toast_generation.peek();
                toast.set(Some("Saved to history!".to_owned()));
                spawn(async move {
                    gloo_timers::future::TimeoutFuture::new(TOAST_MILLIS).await;
                    if *toast_generation.peek() == my_generation {
                        toast.set(None);
                    }
                });
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("failed to save result: {e}");
                toast.set(Some(format!("Could not save: {e}")));
            }
        }
    };

    let scan_again = move |()| {
        flow.write().reset();
        source.set(None);
        model.set(None);
        error.set(None);
        viewing_saved.set(false);
        go(Screen::Home);
    };

    // --- History ---
    let view_record = move |index: usize| {
        let Some(record) = history.peek().get(index).cloned() else {
            return;
        };
        flow.write().restore(&record);
        viewing_saved.set(true);
        go(Screen::Results);
    };

    let clear_history = move |()| {
        if !page::confirm("Are you sure you want to clear all history?") {
            return;
        }
        if let Err(e) = LocalStorageHistory::default().clear() {
            tracing::error!("failed to clear history: {e}");
        }
        history.set(History::new());
    };

    let current = navigator.read().current();
    let busy = flow.read().state().is_busy();
    let (shown_result, shown_thumbnail) = {
        let current_flow = flow.read();
        (
            current_flow.result().cloned(),
            current_flow.thumbnail().map(str::to_owned),
        )
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            if current.shows_nav() {
                header { class: "app-header",
                    if matches!(current, Screen::Upload | Screen::Results) {
                        button {
                            class: "btn-icon",
                            aria_label: "Back",
                            onclick: move |_| go(Screen::Home),
                            Icon { icon: LdArrowLeft, width: 22, height: 22 }
                        }
                    }
                    h1 { "{current.title()}" }
                }
            }

            main { class: "screen",
                match current {
                    Screen::Home => rsx! {
                        screens::Home {
                            on_camera: move |()| go(Screen::Camera),
                            on_upload: move |()| go(Screen::Upload),
                        }
                    },
                    Screen::Camera => rsx! {
                        CameraView {
                            stream: camera,
                            error: camera_error(),
                            on_capture: move |image: SourceImage| accept_source(image),
                            on_close: move |()| go(Screen::Home),
                        }
                    },
                    Screen::Upload => rsx! {
                        FileUpload { on_continue: move |image: SourceImage| accept_source(image) }
                    },
                    Screen::Preprocess => rsx! {
                        div { class: "preprocess-screen",
                            div { class: "preprocess-toolbar",
                                button {
                                    class: "btn-icon",
                                    aria_label: "Cancel",
                                    disabled: busy,
                                    onclick: move |_| go(Screen::Home),
                                    Icon { icon: LdX, width: 22, height: 22 }
                                }
                                h2 { "{current.title()}" }
                            }

                            if let Some(image) = source() {
                                CropEditor { image_url: image.data_url().to_owned(), model: model }
                            }

                            if let Some(geometry) = model() {
                                EnhancementControls {
                                    enhancement: geometry.enhancement(),
                                    on_change: move |e: skinscan_core::Enhancement| {
                                        if let Some(m) = model.write().as_mut() {
                                            m.set_brightness(e.brightness());
                                            m.set_contrast(e.contrast());
                                        }
                                    },
                                    on_reset: move |()| {
                                        if let Some(m) = model.write().as_mut() {
                                            m.reset();
                                        }
                                    },
                                }
                            }

                            if let Some(ref message) = error() {
                                div { class: "error-banner",
                                    p { "{message}" }
                                    button {
                                        class: "btn btn-link",
                                        onclick: move |_| {
                                            flow.write().dismiss();
                                            error.set(None);
                                        },
                                        "Dismiss"
                                    }
                                }
                            }

                            button {
                                class: "btn btn-primary btn-wide",
                                disabled: model.read().is_none() || busy,
                                onclick: analyze,
                                if busy { "Preparing..." } else { "Analyze" }
                            }
                        }
                    },
                    Screen::Loading => rsx! {
                        screens::Loading {}
                    },
                    Screen::Results => match shown_result.clone() {
                        Some(result) => rsx! {
                            ResultCard {
                                result,
                                thumbnail: shown_thumbnail.clone(),
                                can_save: !viewing_saved(),
                                on_save: save_result,
                                on_scan_again: scan_again,
                            }
                        },
                        None => rsx! {
                            p { class: "muted", "No result to show." }
                        },
                    },
                    Screen::History => rsx! {
                        HistoryList {
                            history: history(),
                            on_view: view_record,
                            on_clear: clear_history,
                        }
                    },
                    Screen::Info => rsx! {
                        screens::Info {}
                    },
                }
            }

            if current.shows_nav() {
                NavBar { current: current, on_navigate: move |screen: Screen| go(screen) }
            }

            Toast { message: toast() }
        }
    }
}
