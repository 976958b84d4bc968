//! Dioxus UI components for skinscan.
//!
//! Provides the camera viewfinder, upload drop zone, crop editor,
//! enhancement sliders, result card, history list, navigation bar and
//! toast.

mod camera_view;
mod crop_editor;
mod enhancement_controls;
mod history_list;
mod nav_bar;
mod result_card;
mod toast;
mod upload;

pub use camera_view::CameraView;
pub use crop_editor::CropEditor;
pub use enhancement_controls::EnhancementControls;
pub use history_list::HistoryList;
pub use nav_bar::NavBar;
pub use result_card::ResultCard;
pub use toast::Toast;
pub use upload::FileUpload;
