//! Source images and their providers' plain-data configuration.
//!
//! A [`SourceImage`] is the encoded photo the user picked or captured,
//! held as a `data:` URL. It is replaced wholesale on each new capture or
//! upload and never edited in place; edits live in the geometry model and
//! are applied only when baking.

use std::io::Cursor;

use serde::Serialize;

use crate::data_url;
use crate::types::Dimensions;

/// Errors from accepting a source image.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file's MIME type is not `image/*`.
    #[error("please select a valid image file (got {0:?})")]
    InvalidFileType(String),

    /// The file had no content.
    #[error("the selected file is empty")]
    EmptyFile,

    /// The payload could not be decoded far enough to read its size.
    #[error("could not read image: {0}")]
    Unreadable(String),
}

/// Check that a declared MIME type is an image type this build can bake.
///
/// # Errors
///
/// Returns [`SourceError::InvalidFileType`] unless `mime` starts with
/// `image/` and names a format with decoding enabled.
pub fn validate_mime(mime: &str) -> Result<(), SourceError> {
    let decodable = mime.starts_with("image/")
        && image::ImageFormat::from_mime_type(mime).is_some_and(|f| f.reading_enabled());
    if decodable {
        Ok(())
    } else {
        Err(SourceError::InvalidFileType(mime.to_owned()))
    }
}

/// MIME type implied by a filename's extension, if it is an image format
/// this build can decode.
#[must_use]
pub fn mime_from_filename(name: &str) -> Option<&'static str> {
    image::ImageFormat::from_path(name)
        .ok()
        .filter(image::ImageFormat::reading_enabled)
        .map(|format| format.to_mime_type())
}

/// An encoded source photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    data_url: String,
}

impl SourceImage {
    /// Accept an uploaded file's bytes with its declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidFileType`] for non-image MIME types
    /// and [`SourceError::EmptyFile`] for empty files.
    pub fn from_file(bytes: &[u8], mime: &str) -> Result<Self, SourceError> {
        validate_mime(mime)?;
        if bytes.is_empty() {
            return Err(SourceError::EmptyFile);
        }
        Ok(Self {
            data_url: data_url::encode(mime, bytes),
        })
    }

    /// Wrap an already-encoded `data:` URL (e.g. a captured camera frame).
    #[must_use]
    pub const fn from_data_url(data_url: String) -> Self {
        Self { data_url }
    }

    /// The `data:` URL, suitable for an `<img src>`.
    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Natural pixel dimensions, read from the image header.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unreadable`] if the payload is not a
    /// recognizable image.
    pub fn dimensions(&self) -> Result<Dimensions, SourceError> {
        let decoded =
            data_url::decode(&self.data_url).map_err(|e| SourceError::Unreadable(e.to_string()))?;
        let (width, height) = image::ImageReader::new(Cursor::new(decoded.bytes))
            .with_guessed_format()
            .map_err(|e| SourceError::Unreadable(e.to_string()))?
            .into_dimensions()
            .map_err(|e| SourceError::Unreadable(e.to_string()))?;
        Ok(Dimensions { width, height })
    }
}

/// Which camera to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Rear camera.
    Environment,
}

/// Video constraints for camera acquisition.
///
/// Serializes to the shape `getUserMedia` expects:
/// `{"video":{"facingMode":"environment","width":{"ideal":1280},"height":{"ideal":720}},"audio":false}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Preferred camera.
    pub facing_mode: FacingMode,
    /// Ideal frame width in pixels.
    pub ideal_width: u32,
    /// Ideal frame height in pixels.
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

#[derive(Serialize)]
struct Ideal {
    ideal: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    facing_mode: FacingMode,
    width: Ideal,
    height: Ideal,
}

#[derive(Serialize)]
struct MediaConstraints {
    video: VideoConstraints,
    audio: bool,
}

impl CameraConstraints {
    /// JSON form of the `getUserMedia` constraints object.
    #[must_use]
    pub fn to_json(&self) -> String {
        let constraints = MediaConstraints {
            video: VideoConstraints {
                facing_mode: self.facing_mode,
                width: Ideal {
                    ideal: self.ideal_width,
                },
                height: Ideal {
                    ideal: self.ideal_height,
                },
            },
            audio: false,
        };
        // Plain structs of strings and integers always serialize.
        serde_json::to_string(&constraints).unwrap_or_default()
    }
}

/// Flash (torch) state for the active camera track.
///
/// Toggling is only possible when the track reports the `torch`
/// capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Torch {
    supported: bool,
    enabled: bool,
}

impl Torch {
    /// Torch state for a freshly acquired track.
    #[must_use]
    pub const fn new(supported: bool) -> Self {
        Self {
            supported,
            enabled: false,
        }
    }

    /// Whether the track supports the torch.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.supported
    }

    /// Whether the torch is currently on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the torch. Returns the new desired state, or `None` if the
    /// track has no torch.
    pub const fn toggle(&mut self) -> Option<bool> {
        if !self.supported {
            return None;
        }
        self.enabled = !self.enabled;
        Some(self.enabled)
    }

    /// JSON for `MediaStreamTrack.applyConstraints` to set the torch.
    #[must_use]
    pub fn constraints_json(enabled: bool) -> String {
        format!(r#"{{"advanced":[{{"torch":{enabled}}}]}}"#)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([9, 8, 7, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn decodable_mime_types_are_accepted() {
        for mime in ["image/png", "image/jpeg", "image/bmp", "image/webp"] {
            assert!(validate_mime(mime).is_ok(), "{mime:?} should be accepted");
        }
    }

    #[test]
    fn undecodable_image_types_are_rejected() {
        for mime in ["image/gif", "image/tiff", "image/heic", "image/avif"] {
            assert!(
                matches!(validate_mime(mime), Err(SourceError::InvalidFileType(_))),
                "{mime:?} should be rejected"
            );
        }
    }

    #[test]
    fn gif_upload_is_rejected_before_editing() {
        // GIF89a header of a 1x1 image.
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        assert_eq!(mime_from_filename("spot.gif"), None);
        assert!(matches!(
            SourceImage::from_file(gif, "image/gif"),
            Err(SourceError::InvalidFileType(_))
        ));
    }

    #[test]
    fn non_image_mime_types_are_rejected() {
        for mime in ["", "text/plain", "application/pdf", "video/mp4", "IMAGE/png"] {
            assert!(
                matches!(validate_mime(mime), Err(SourceError::InvalidFileType(_))),
                "{mime:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_file_validates_before_encoding() {
        assert!(matches!(
            SourceImage::from_file(b"hello", "text/plain"),
            Err(SourceError::InvalidFileType(_))
        ));
        assert!(matches!(
            SourceImage::from_file(&[], "image/png"),
            Err(SourceError::EmptyFile)
        ));
    }

    #[test]
    fn from_file_produces_data_url_with_dimensions() {
        let png = tiny_png(7, 5);
        let source = SourceImage::from_file(&png, "image/png").unwrap();
        assert!(source.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(
            source.dimensions().unwrap(),
            Dimensions {
                width: 7,
                height: 5
            }
        );
    }

    #[test]
    fn dimensions_of_garbage_is_unreadable() {
        let source = SourceImage::from_data_url("data:image/png;base64,AAAA".into());
        assert!(matches!(source.dimensions(), Err(SourceError::Unreadable(_))));
    }

    #[test]
    fn mime_from_known_extensions() {
        assert_eq!(mime_from_filename("mole.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_filename("scan.png"), Some("image/png"));
        assert_eq!(mime_from_filename("scan.webp"), Some("image/webp"));
        assert_eq!(mime_from_filename("scan.tiff"), None);
        assert_eq!(mime_from_filename("notes.txt"), None);
        assert_eq!(mime_from_filename("no_extension"), None);
    }

    #[test]
    fn camera_constraints_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&CameraConstraints::default().to_json()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "video": {
                    "facingMode": "environment",
                    "width": { "ideal": 1280 },
                    "height": { "ideal": 720 },
                },
                "audio": false,
            })
        );
    }

    #[test]
    fn torch_toggles_only_when_supported() {
        let mut none = Torch::new(false);
        assert_eq!(none.toggle(), None);
        assert!(!none.is_enabled());

        let mut torch = Torch::new(true);
        assert_eq!(torch.toggle(), Some(true));
        assert!(torch.is_enabled());
        assert_eq!(torch.toggle(), Some(false));
    }

    #[test]
    fn torch_constraints_json() {
        let json: serde_json::Value =
            serde_json::from_str(&Torch::constraints_json(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "advanced": [{ "torch": true }] }));
    }
}
