//! Camera access via `getUserMedia`.
//!
//! [`CameraStream`] owns an acquired `MediaStream`. Dropping it stops
//! every track, which releases the camera hardware (and turns off the
//! indicator light) immediately.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use skinscan_core::{CameraConstraints, SourceImage, Torch};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// JPEG quality of captured frames.
const CAPTURE_QUALITY: f64 = 0.9;

/// Errors that can occur when using the camera.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The browser has no camera API (e.g. insecure context).
    #[error("camera API not available")]
    Unavailable,

    /// The video element has no frame to capture yet.
    #[error("camera is not ready")]
    NotReady,

    /// A browser API call returned an error (including permission
    /// denial).
    #[error("camera error: {0}")]
    JsError(String),
}

impl From<JsValue> for CameraError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// An acquired camera stream. Stops all tracks on drop.
#[derive(Debug)]
pub struct CameraStream {
    stream: web_sys::MediaStream,
}

impl CameraStream {
    /// Request the camera with the given constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::Unavailable`] if the browser has no
    /// `mediaDevices`, and [`CameraError::JsError`] if the request is
    /// denied or fails.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; MediaStream is !Send
    pub async fn acquire(constraints: &CameraConstraints) -> Result<Self, CameraError> {
        let window = web_sys::window().ok_or(CameraError::Unavailable)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| CameraError::Unavailable)?;

        let constraints: web_sys::MediaStreamConstraints =
            js_sys::JSON::parse(&constraints.to_json())?.unchecked_into();
        let promise = devices.get_user_media_with_constraints(&constraints)?;
        let stream = JsFuture::from(promise)
            .await?
            .dyn_into::<web_sys::MediaStream>()
            .map_err(|_| CameraError::JsError("getUserMedia did not return a stream".into()))?;

        tracing::debug!("camera stream acquired");
        Ok(Self { stream })
    }

    /// Show the stream in a `<video>` element.
    pub fn attach(&self, video: &web_sys::HtmlVideoElement) {
        video.set_src_object(Some(&self.stream));
    }

    /// Torch state for the stream's video track.
    ///
    /// The torch is supported only when the track reports a truthy
    /// `torch` capability.
    #[must_use]
    pub fn torch(&self) -> Torch {
        let supported = self
            .video_track()
            .and_then(|track| call_method(&track, "getCapabilities", None).ok())
            .and_then(|caps| js_sys::Reflect::get(&caps, &JsValue::from_str("torch")).ok())
            .is_some_and(|torch| torch.is_truthy());
        Torch::new(supported)
    }

    /// Turn the torch on or off.
    ///
    /// The constraint is applied in the background; a rejection is only
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::JsError`] if the stream has no video track or
    /// `applyConstraints` is unavailable.
    pub fn set_torch(&self, enabled: bool) -> Result<(), CameraError> {
        let track = self
            .video_track()
            .ok_or_else(|| CameraError::JsError("no video track".into()))?;
        let constraints = js_sys::JSON::parse(&Torch::constraints_json(enabled))?;
        let promise = js_sys::Promise::resolve(&call_method(
            &track,
            "applyConstraints",
            Some(&constraints),
        )?);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::warn!("failed to set torch: {e:?}");
            }
        });
        Ok(())
    }

    fn video_track(&self) -> Option<web_sys::MediaStreamTrack> {
        self.stream
            .get_video_tracks()
            .get(0)
            .dyn_into::<web_sys::MediaStreamTrack>()
            .ok()
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                track.stop();
            }
        }
        tracing::debug!("camera stream stopped");
    }
}

/// Capture the current frame of `video` as a JPEG source image.
///
/// # Errors
///
/// Returns [`CameraError::NotReady`] if the video has no dimensions yet
/// and [`CameraError::JsError`] if canvas operations fail.
pub fn capture_frame(video: &web_sys::HtmlVideoElement) -> Result<SourceImage, CameraError> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(CameraError::NotReady);
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CameraError::JsError("no document".into()))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| CameraError::JsError("failed to create canvas".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| CameraError::JsError("no 2d context".into()))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| CameraError::JsError("unexpected context type".into()))?;
    context.draw_image_with_html_video_element(video, 0.0, 0.0)?;

    let data_url = canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(CAPTURE_QUALITY))?;
    Ok(SourceImage::from_data_url(data_url))
}

/// Call an optional method on a JS object.
///
/// Fails if the method is missing, which is how capability APIs absent in
/// some browsers (`getCapabilities`) are detected.
fn call_method(
    target: &JsValue,
    name: &str,
    arg: Option<&JsValue>,
) -> Result<JsValue, CameraError> {
    let func = js_sys::Reflect::get(target, &JsValue::from_str(name))?;
    if !func.is_function() {
        return Err(CameraError::JsError(format!("{name} is not supported")));
    }
    let func: js_sys::Function = func.unchecked_into();
    let result = match arg {
        Some(arg) => func.call1(target, arg)?,
        None => func.call0(target)?,
    };
    Ok(result)
}
