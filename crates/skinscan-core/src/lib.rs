//! skinscan-core: Pure crop, enhancement, bake and submission logic
//! (sans-IO).
//!
//! Models the photo editing and analysis flow of the skinscan app:
//! a crop box over a letterboxed image, brightness/contrast settings,
//! baking the crop into a JPEG, interpreting classifier responses and a
//! bounded result history.
//!
//! This crate has **no I/O dependencies**. Camera, DOM events, local
//! storage and HTTP live in `skinscan-io` and `skinscan-client`, which
//! drive the state machines defined here.

pub mod bake;
pub mod classify;
pub mod data_url;
pub mod filter;
pub mod flow;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod screen;
pub mod source;
pub mod types;

pub use bake::{BakeError, ExportedImage, JPEG_QUALITY, bake, bake_with};
pub use classify::{
    Classification, HealthResponse, PredictRequest, PredictResponse, SubmitError, Verdict,
};
pub use flow::{FlowError, FlowState, SubmissionFlow};
pub use geometry::GeometryModel;
pub use gesture::{GestureController, GestureError, GestureState, GestureTarget, Handle};
pub use history::{
    HISTORY_CAPACITY, HISTORY_STORAGE_KEY, History, HistoryRecord, HistoryStore, MemoryStore,
};
pub use screen::{Navigator, Screen, ScreenEffect};
pub use source::{CameraConstraints, FacingMode, SourceError, SourceImage, Torch};
pub use types::{CropRect, Dimensions, Enhancement, MIN_CROP_SIZE, Point, Size};
