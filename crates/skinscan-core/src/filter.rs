//! Brightness/contrast filter, in two forms.
//!
//! - [`preview_css`] produces the CSS `filter` value applied live to the
//!   on-screen image. It costs nothing and is reapplied on every slider
//!   change.
//! - [`apply`] bakes the same filter into pixels for export, following the
//!   CSS filter function definitions: `brightness(b)` multiplies each
//!   color channel by `b`, then `contrast(c)` maps `v` to
//!   `(v - 0.5) * c + 0.5`. Each step clamps to `[0, 1]`. Alpha is left
//!   unchanged.

use image::RgbaImage;

use crate::types::Enhancement;

/// CSS `filter` value for the live preview, e.g.
/// `"brightness(1.2) contrast(0.85)"`.
#[must_use]
pub fn preview_css(enhancement: Enhancement) -> String {
    format!(
        "brightness({}) contrast({})",
        enhancement.brightness_factor(),
        enhancement.contrast_factor(),
    )
}

/// Per-channel lookup table for the given settings.
///
/// Every 8-bit channel value maps through the same function, so the
/// whole filter collapses to 256 entries.
#[must_use]
pub fn lookup_table(enhancement: Enhancement) -> [u8; 256] {
    let b = enhancement.brightness_factor();
    let c = enhancement.contrast_factor();
    let mut table = [0u8; 256];
    for (value, slot) in (0u8..=255).zip(table.iter_mut()) {
        let v = f64::from(value) / 255.0;
        let v = (v * b).clamp(0.0, 1.0);
        let v = (v - 0.5).mul_add(c, 0.5).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *slot = (v * 255.0).round() as u8;
        }
    }
    table
}

/// Apply brightness and contrast to every pixel of `image` in place.
///
/// Identity settings leave the image untouched.
pub fn apply(image: &mut RgbaImage, enhancement: Enhancement) {
    if enhancement.is_identity() {
        return;
    }
    let table = lookup_table(enhancement);
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            table[usize::from(r)],
            table[usize::from(g)],
            table[usize::from(b)],
            a,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_css_for_defaults() {
        assert_eq!(
            preview_css(Enhancement::default()),
            "brightness(1) contrast(1)"
        );
    }

    #[test]
    fn preview_css_uses_fractions() {
        assert_eq!(
            preview_css(Enhancement::new(120, 85)),
            "brightness(1.2) contrast(0.85)"
        );
        assert_eq!(
            preview_css(Enhancement::new(0, 200)),
            "brightness(0) contrast(2)"
        );
    }

    #[test]
    fn identity_table_is_identity() {
        let table = lookup_table(Enhancement::default());
        for (i, v) in table.iter().enumerate() {
            assert_eq!(usize::from(*v), i);
        }
    }

    #[test]
    fn zero_brightness_is_black_at_unit_contrast() {
        let table = lookup_table(Enhancement::new(0, 100));
        assert!(table.iter().all(|&v| v == 0));
    }

    #[test]
    fn zero_contrast_is_mid_gray() {
        let table = lookup_table(Enhancement::new(100, 0));
        assert!(table.iter().all(|&v| v == 128));
    }

    #[test]
    fn brightness_saturates_before_contrast() {
        // 200% brightness pushes 200 past 1.0; contrast then sees 1.0.
        let table = lookup_table(Enhancement::new(200, 100));
        assert_eq!(table[200], 255);
        assert_eq!(table[50], 100);
    }

    #[test]
    fn contrast_spreads_around_midpoint() {
        let table = lookup_table(Enhancement::new(100, 200));
        assert!(table[64] < 64);
        assert!(table[192] > 192);
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
    }

    #[test]
    fn apply_preserves_alpha() {
        let mut img = RgbaImage::from_pixel(2, 2, image::Rgba([100, 150, 200, 42]));
        apply(&mut img, Enhancement::new(50, 100));
        for p in img.pixels() {
            assert_eq!(p.0, [50, 75, 100, 42]);
        }
    }

    #[test]
    fn apply_identity_is_noop() {
        let mut img = RgbaImage::from_pixel(3, 1, image::Rgba([1, 2, 3, 4]));
        let before = img.clone();
        apply(&mut img, Enhancement::default());
        assert_eq!(img.as_raw(), before.as_raw());
    }
}
