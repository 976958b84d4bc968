//! Shared types for the skinscan crop and enhancement model.

use serde::{Deserialize, Serialize};

/// Smallest allowed crop box side, in display pixels.
pub const MIN_CROP_SIZE: f64 = 50.0;

/// Fraction of the displayed image's shorter side used for the initial
/// crop box.
pub const INITIAL_CROP_FRACTION: f64 = 0.6;

/// Neutral value for both enhancement sliders (identity filter).
pub const ENHANCEMENT_DEFAULT: u32 = 100;

/// Upper bound of the enhancement sliders.
pub const ENHANCEMENT_MAX: u32 = 200;

/// A 2D point in display (client) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in display pixels (fractional, as reported by layout).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in display pixels.
    pub width: f64,
    /// Height in display pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The shorter of the two sides.
    #[must_use]
    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }
}

/// Image dimensions in natural (intrinsic) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The crop box, in display pixels relative to the crop viewport.
///
/// Invariants maintained by the gesture controller:
/// `width >= MIN_CROP_SIZE`, `height >= MIN_CROP_SIZE`, and the box lies
/// entirely inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl CropRect {
    /// Create a new crop rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle lies fully inside a viewport of the given
    /// size, allowing for floating-point noise.
    #[must_use]
    pub fn fits_within(&self, viewport: Size) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= viewport.width + EPS
            && self.bottom() <= viewport.height + EPS
    }
}

/// Brightness and contrast settings, as integer percentages.
///
/// `100` is the identity for both. Values are clamped to
/// `0..=ENHANCEMENT_MAX` on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enhancement {
    brightness: u32,
    contrast: u32,
}

impl Enhancement {
    /// Create settings from brightness and contrast percentages.
    #[must_use]
    pub fn new(brightness: u32, contrast: u32) -> Self {
        Self {
            brightness: brightness.min(ENHANCEMENT_MAX),
            contrast: contrast.min(ENHANCEMENT_MAX),
        }
    }

    /// Brightness percentage.
    #[must_use]
    pub const fn brightness(&self) -> u32 {
        self.brightness
    }

    /// Contrast percentage.
    #[must_use]
    pub const fn contrast(&self) -> u32 {
        self.contrast
    }

    /// Set the brightness percentage.
    pub fn set_brightness(&mut self, percent: u32) {
        self.brightness = percent.min(ENHANCEMENT_MAX);
    }

    /// Set the contrast percentage.
    pub fn set_contrast(&mut self, percent: u32) {
        self.contrast = percent.min(ENHANCEMENT_MAX);
    }

    /// Brightness as a fractional multiplier (`1.0` = unchanged).
    #[must_use]
    pub fn brightness_factor(&self) -> f64 {
        f64::from(self.brightness) / 100.0
    }

    /// Contrast as a fractional multiplier (`1.0` = unchanged).
    #[must_use]
    pub fn contrast_factor(&self) -> f64 {
        f64::from(self.contrast) / 100.0
    }

    /// Whether these settings leave pixels unchanged.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.brightness == ENHANCEMENT_DEFAULT && self.contrast == ENHANCEMENT_DEFAULT
    }
}

impl Default for Enhancement {
    fn default() -> Self {
        Self {
            brightness: ENHANCEMENT_DEFAULT,
            contrast: ENHANCEMENT_DEFAULT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn enhancement_defaults_are_identity() {
        let e = Enhancement::default();
        assert_eq!(e.brightness(), 100);
        assert_eq!(e.contrast(), 100);
        assert!(e.is_identity());
        assert!((e.brightness_factor() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn enhancement_clamps_to_slider_range() {
        let mut e = Enhancement::new(500, 150);
        assert_eq!(e.brightness(), ENHANCEMENT_MAX);
        assert_eq!(e.contrast(), 150);

        e.set_contrast(1000);
        assert_eq!(e.contrast(), ENHANCEMENT_MAX);
        e.set_brightness(0);
        assert_eq!(e.brightness(), 0);
        assert!(!e.is_identity());
    }

    #[test]
    fn crop_rect_edges() {
        let r = CropRect::new(10.0, 20.0, 30.0, 40.0);
        assert!((r.right() - 40.0).abs() < f64::EPSILON);
        assert!((r.bottom() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn crop_rect_fits_within_viewport() {
        let viewport = Size::new(100.0, 100.0);
        assert!(CropRect::new(0.0, 0.0, 100.0, 100.0).fits_within(viewport));
        assert!(!CropRect::new(-1.0, 0.0, 50.0, 50.0).fits_within(viewport));
        assert!(!CropRect::new(60.0, 0.0, 50.0, 50.0).fits_within(viewport));
        assert!(!CropRect::new(0.0, 51.0, 50.0, 50.0).fits_within(viewport));
    }

    #[test]
    fn size_min_side() {
        assert!((Size::new(640.0, 480.0).min_side() - 480.0).abs() < f64::EPSILON);
    }

    #[test]
    fn enhancement_serde_round_trip() {
        let e = Enhancement::new(120, 80);
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"brightness":120,"contrast":80}"#);
        let back: Enhancement = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
