//! skinscan-io: Browser I/O and Dioxus component library.
//!
//! Handles camera capture, DOM pointer listeners, local storage of the
//! result history and page lifecycle events, and provides the UI
//! components of the skinscan web app.

pub mod camera;
pub mod components;
pub mod listeners;
pub mod page;
pub mod storage;

pub use camera::{CameraError, CameraStream, capture_frame};
pub use components::{
    CameraView, CropEditor, EnhancementControls, FileUpload, HistoryList, NavBar, ResultCard, Toast,
};
pub use listeners::{EventListener, ListenerError, PointerListeners};
pub use storage::{LocalStorageHistory, StorageError};
