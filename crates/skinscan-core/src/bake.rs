//! Export ("bake") of the cropped and enhanced image.
//!
//! The crop box lives in display coordinates of the viewport while the
//! source image has its own natural resolution. Baking maps the box into
//! natural pixels, cuts that region out 1:1, applies the brightness and
//! contrast filter, and encodes the result as a JPEG `data:` URL.
//!
//! Baking is deterministic: identical inputs produce byte-identical
//! output.

use image::{ImageEncoder, RgbImage, RgbaImage};

use crate::data_url::{self, DataUrlError};
use crate::filter;
use crate::geometry::{GeometryModel, letterbox_offset};
use crate::source::SourceImage;
use crate::types::{CropRect, Dimensions, Enhancement, Size};

/// JPEG quality of exported images.
pub const JPEG_QUALITY: u8 = 90;

/// MIME type of exported images.
pub const EXPORT_MIME: &str = "image/jpeg";

/// Errors that can occur while baking.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    /// The source payload could not be decoded for resampling.
    #[error("failed to load image for cropping: {0}")]
    Decode(String),

    /// The image has no laid-out area to map the crop from, or encoding
    /// produced no data.
    #[error("cropped image is empty")]
    EmptyExport,

    /// JPEG encoding failed.
    #[error("failed to encode cropped image: {0}")]
    Encode(#[from] image::ImageError),
}

/// The final cropped, filtered and encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    data_url: String,
    dimensions: Dimensions,
}

impl ExportedImage {
    /// The JPEG as a `data:` URL.
    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Consume the export and return its `data:` URL.
    #[must_use]
    pub fn into_data_url(self) -> String {
        self.data_url
    }

    /// Pixel dimensions of the export.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The raw JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`DataUrlError`] only if the stored URL was corrupted,
    /// which baking never produces.
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>, DataUrlError> {
        data_url::decode(&self.data_url).map(|d| d.bytes)
    }
}

/// A rectangle in natural source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, zero when the crop covers less than one pixel horizontally.
    pub width: u32,
    /// Height, zero when the crop covers less than one pixel vertically.
    pub height: u32,
}

impl SourceRegion {
    /// Size of the exported image: the region size, at least 1x1.
    #[must_use]
    pub fn output_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }

    /// Whether the region's origin lies on the natural image.
    #[must_use]
    pub const fn starts_inside(&self, natural: Dimensions) -> bool {
        self.x < natural.width && self.y < natural.height
    }
}

/// Map a display-space crop box to the natural-pixel region it covers.
///
/// The letterbox offset is removed first, then position and size are
/// scaled by `natural / displayed` independently per axis. The origin is
/// floored at 0 and the size is truncated so the region never extends past
/// the natural image, possibly down to zero. Returns `None` only when the
/// image has no displayed area.
#[must_use]
pub fn source_region(
    crop: CropRect,
    viewport: Size,
    displayed: Size,
    natural: Dimensions,
) -> Option<SourceRegion> {
    if !(displayed.width > 0.0 && displayed.height > 0.0) {
        return None;
    }

    let (offset_x, offset_y) = letterbox_offset(viewport, displayed);
    let natural_w = f64::from(natural.width);
    let natural_h = f64::from(natural.height);
    let scale_x = natural_w / displayed.width;
    let scale_y = natural_h / displayed.height;

    let src_x = ((crop.x - offset_x) * scale_x).max(0.0).floor();
    let src_y = ((crop.y - offset_y) * scale_y).max(0.0).floor();
    let src_w = (crop.width * scale_x).min(natural_w - src_x).max(0.0).floor();
    let src_h = (crop.height * scale_y).min(natural_h - src_y).max(0.0).floor();

    // Float to int casts saturate, and every value is non-negative here.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(SourceRegion {
        x: src_x as u32,
        y: src_y as u32,
        width: src_w as u32,
        height: src_h as u32,
    })
}

/// Bake the model's crop and enhancement against `source`.
///
/// # Errors
///
/// See [`bake_with`].
pub fn bake(source: &SourceImage, model: &GeometryModel) -> Result<ExportedImage, BakeError> {
    bake_with(
        source,
        model.crop(),
        model.viewport(),
        model.displayed(),
        model.enhancement(),
    )
}

/// Bake an explicit crop and enhancement against `source`.
///
/// # Errors
///
/// Returns [`BakeError::Decode`] if the source cannot be decoded,
/// [`BakeError::EmptyExport`] if `displayed` has no area, and
/// [`BakeError::Encode`] if JPEG encoding fails.
///
/// A crop covering less than one source pixel still exports a 1x1 image:
/// the pixel at the region origin, or black when the origin is off the
/// image.
pub fn bake_with(
    source: &SourceImage,
    crop: CropRect,
    viewport: Size,
    displayed: Size,
    enhancement: Enhancement,
) -> Result<ExportedImage, BakeError> {
    let decoded =
        data_url::decode(source.data_url()).map_err(|e| BakeError::Decode(e.to_string()))?;
    let image = image::load_from_memory(&decoded.bytes)
        .map_err(|e| BakeError::Decode(e.to_string()))?
        .to_rgba8();
    let natural = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    let region =
        source_region(crop, viewport, displayed, natural).ok_or(BakeError::EmptyExport)?;
    tracing::debug!(?region, ?natural, "baking crop");

    let size = region.output_dimensions();
    let mut cropped = if region.starts_inside(natural) {
        image::imageops::crop_imm(&image, region.x, region.y, size.width, size.height).to_image()
    } else {
        // Transparent, so it flattens to black.
        RgbaImage::new(size.width, size.height)
    };
    filter::apply(&mut cropped, enhancement);

    let rgb = flatten_onto_black(&cropped);
    let mut jpeg = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    if jpeg.is_empty() {
        return Err(BakeError::EmptyExport);
    }

    Ok(ExportedImage {
        data_url: data_url::encode(EXPORT_MIME, &jpeg),
        dimensions: Dimensions {
            width: rgb.width(),
            height: rgb.height(),
        },
    })
}

/// Composite RGBA over opaque black, as a canvas does when exporting to a
/// format without alpha.
fn flatten_onto_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let scale = |c: u8| {
            let v = u16::from(c) * u16::from(a) / 255;
            #[allow(clippy::cast_possible_truncation)]
            {
                v as u8
            }
        };
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}
