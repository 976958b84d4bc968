//! Crop box and enhancement state for the editor.
//!
//! [`GeometryModel`] owns the single crop rectangle and enhancement
//! pair. It is constructed whenever a new source image has been laid out
//! and is afterwards mutated only by the gesture controller (crop box) and
//! by slider input (enhancement).

use crate::types::{CropRect, Enhancement, INITIAL_CROP_FRACTION, Size};

/// Gap between the displayed image and its viewport on each axis.
///
/// The image is rendered centered inside the viewport, so the offset is
/// half of the size difference. Negative values mean the image overflows
/// the viewport on that axis.
#[must_use]
pub fn letterbox_offset(viewport: Size, displayed: Size) -> (f64, f64) {
    (
        (viewport.width - displayed.width) / 2.0,
        (viewport.height - displayed.height) / 2.0,
    )
}

/// The initial crop box: a square of side `0.6 * min(w, h)` of the
/// displayed image, centered on the image (not on the viewport).
#[must_use]
pub fn initial_crop(viewport: Size, displayed: Size) -> CropRect {
    let (offset_x, offset_y) = letterbox_offset(viewport, displayed);
    let side = displayed.min_side() * INITIAL_CROP_FRACTION;
    CropRect::new(
        offset_x + (displayed.width - side) / 2.0,
        offset_y + (displayed.height - side) / 2.0,
        side,
        side,
    )
}

/// Layout-relative crop and enhancement state for one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryModel {
    viewport: Size,
    displayed: Size,
    crop: CropRect,
    enhancement: Enhancement,
}

impl GeometryModel {
    /// Build the model for a freshly laid-out source image.
    ///
    /// `viewport` is the crop container; `displayed` is the rendered size
    /// of the image inside it.
    #[must_use]
    pub fn initialize(viewport: Size, displayed: Size) -> Self {
        Self {
            viewport,
            displayed,
            crop: initial_crop(viewport, displayed),
            enhancement: Enhancement::default(),
        }
    }

    /// Model for a layout measured after the editor (re)mounts.
    ///
    /// `previous` survives unchanged when it was built for the same layout,
    /// so returning to the editor keeps the user's edits. Under a different
    /// layout the enhancement is kept and the crop box starts over, since
    /// display coordinates no longer line up. With no previous model this
    /// is [`GeometryModel::initialize`].
    #[must_use]
    pub fn relayout(previous: Option<Self>, viewport: Size, displayed: Size) -> Self {
        match previous {
            Some(model) if model.viewport == viewport && model.displayed == displayed => model,
            Some(model) => Self {
                enhancement: model.enhancement,
                ..Self::initialize(viewport, displayed)
            },
            None => Self::initialize(viewport, displayed),
        }
    }

    /// Restore brightness and contrast to 100%.
    pub fn reset(&mut self) {
        self.enhancement = Enhancement::default();
    }

    /// Size of the crop viewport.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Rendered size of the image inside the viewport.
    #[must_use]
    pub const fn displayed(&self) -> Size {
        self.displayed
    }

    /// The current crop box.
    #[must_use]
    pub const fn crop(&self) -> CropRect {
        self.crop
    }

    /// The current enhancement settings.
    #[must_use]
    pub const fn enhancement(&self) -> Enhancement {
        self.enhancement
    }

    /// Set brightness from slider input.
    pub fn set_brightness(&mut self, percent: u32) {
        self.enhancement.set_brightness(percent);
    }

    /// Set contrast from slider input.
    pub fn set_contrast(&mut self, percent: u32) {
        self.enhancement.set_contrast(percent);
    }

    /// Letterbox offset of the image within the viewport.
    #[must_use]
    pub fn image_offset(&self) -> (f64, f64) {
        letterbox_offset(self.viewport, self.displayed)
    }

    pub(crate) fn set_crop(&mut self, crop: CropRect) {
        self.crop = crop;
    }
}
