//! Preview working copies of large images.
//!
//! Very large sources are resampled once, at load time, so that per-frame
//! preview rendering cost stays bounded. Only the preview uses the working
//! copy; the wallpaper that gets applied is always the original file.

use std::borrow::Cow;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use num_traits::ToPrimitive;

use crate::geometry::Size;

/// Longest side, in pixels, of the preview working copy.
pub const PREVIEW_CAP: u32 = 1000;

/// Dimensions of the working copy for an image of `size`.
///
/// Returns `size` unchanged when its longer side is within `cap` (or `cap` is
/// zero). Otherwise scales by `cap / max(w, h)`: the longer side becomes
/// exactly `cap`, the shorter one is rounded and never drops below 1.
pub fn downscaled_size(size: Size, cap: u32) -> Size {
    let longest = size.max_side();
    if cap == 0 || longest <= cap {
        return size;
    }
    let factor = cap as f64 / longest as f64;
    let shrink = |v: u32| {
        (v as f64 * factor)
            .round()
            .to_u32()
            .unwrap_or(cap)
            .clamp(1, cap)
    };
    if size.width >= size.height {
        Size::new(cap, shrink(size.height))
    } else {
        Size::new(shrink(size.width), cap)
    }
}

/// Working copy of `pixels` whose longer side is at most `cap`.
///
/// Borrows the input when no downscale is needed.
pub fn working_copy(pixels: &RgbaImage, cap: u32) -> Cow<'_, RgbaImage> {
    let (w, h) = pixels.dimensions();
    let target = downscaled_size(Size::new(w, h), cap);
    if target == Size::new(w, h) {
        return Cow::Borrowed(pixels);
    }
    log::debug!("downscaling preview copy {w}x{h} -> {target}");
    Cow::Owned(imageops::resize(
        pixels,
        target.width,
        target.height,
        FilterType::Triangle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    // ── downscaled_size ─────────────────────────────────────────────────

    #[test]
    fn small_images_untouched() {
        assert_eq!(downscaled_size(Size::new(800, 600), 1000), Size::new(800, 600));
        assert_eq!(downscaled_size(Size::new(1000, 1000), 1000), Size::new(1000, 1000));
    }

    #[test]
    fn landscape_long_side_hits_cap() {
        assert_eq!(downscaled_size(Size::new(4000, 2000), 1000), Size::new(1000, 500));
        assert_eq!(downscaled_size(Size::new(1920, 1080), 1000), Size::new(1000, 563));
    }

    #[test]
    fn portrait_long_side_hits_cap() {
        assert_eq!(downscaled_size(Size::new(1080, 1920), 1000), Size::new(563, 1000));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(downscaled_size(Size::new(100_000, 10), 1000), Size::new(1000, 1));
    }

    #[test]
    fn zero_cap_disables() {
        assert_eq!(downscaled_size(Size::new(5000, 5000), 0), Size::new(5000, 5000));
    }

    #[test]
    fn aspect_preserved_within_rounding() {
        for (w, h) in [(1001, 999), (4096, 3072), (12345, 678), (2000, 7001), (3000, 3000)] {
            let out = downscaled_size(Size::new(w, h), PREVIEW_CAP);
            assert_eq!(out.max_side(), PREVIEW_CAP, "{w}x{h} -> {out}");
            // One pixel of rounding on the short side bounds the aspect error.
            let short_in = w.min(h) as f64 * PREVIEW_CAP as f64 / w.max(h) as f64;
            let short_out = out.width.min(out.height) as f64;
            assert!((short_in - short_out).abs() <= 0.5 + 1e-9, "{w}x{h} -> {out}");
        }
    }

    // ── working_copy ────────────────────────────────────────────────────

    #[test]
    fn working_copy_borrows_small_images() {
        let img = RgbaImage::from_pixel(20, 10, Rgba([1, 2, 3, 255]));
        assert!(matches!(working_copy(&img, 100), Cow::Borrowed(_)));
    }

    #[test]
    fn working_copy_resamples_large_images() {
        let img = RgbaImage::from_pixel(400, 100, Rgba([10, 200, 30, 255]));
        let copy = working_copy(&img, 100);
        assert_eq!(copy.dimensions(), (100, 25));
        let px = copy.get_pixel(50, 12).0;
        for (got, want) in px.iter().zip([10u8, 200, 30, 255]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }
}
