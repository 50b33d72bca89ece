//! Placement geometry for wallpaper previews.
//!
//! Computes where, and at what scale, an image lands on a preview surface
//! when a [`PlacementStyle`] is applied. Every style is first resolved at
//! full screen resolution and then projected down into the preview, so the
//! preview is a miniature of the real desktop rather than an independent
//! fit of the image into the preview widget.
//!
//! Pure geometry: no pixel operations, no I/O, no state.
//!
//! # Example
//!
//! ```
//! use betterpaper::{PlacementStyle, RenderPlan, Size, compute_plan};
//!
//! let plan = compute_plan(
//!     Size::new(4000, 2000),
//!     Size::new(1920, 1080),
//!     Size::new(800, 450),
//!     PlacementStyle::Scaled,
//! );
//!
//! let RenderPlan::Placement(p) = plan else { unreachable!() };
//! let rect = p.placed_rect(Size::new(4000, 2000));
//! assert!((rect.width - 800.0).abs() < 1e-9);
//! assert!((rect.height - 400.0).abs() < 1e-9);
//! assert!((p.offset_y - 25.0).abs() < 1e-9);
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::downscale::{PREVIEW_CAP, downscaled_size};
use crate::style::PlacementStyle;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Pixel dimensions of a full-resolution source image.
pub type ImageDimensions = Size;

/// Pixel dimensions of a rendering target (preview canvas or real screen).
pub type SurfaceDimensions = Size;

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The longer side.
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error returned when a `WxH` string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid size {input:?}: expected WIDTHxHEIGHT")]
pub struct ParseSizeError {
    input: String,
}

impl FromStr for Size {
    type Err = ParseSizeError;

    /// Parse `1920x1080` (also accepts `X` and `×` as separator).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError {
            input: s.to_string(),
        };
        let (w, h) = s
            .trim()
            .split_once(['x', 'X', '×'])
            .ok_or_else(err)?;
        let width = w.trim().parse::<u32>().map_err(|_| err())?;
        let height = h.trim().parse::<u32>().map_err(|_| err())?;
        Ok(Self { width, height })
    }
}

/// Axis-aligned rectangle in surface coordinates.
///
/// Fractional, and allowed to extend past the surface: placements that
/// overflow (zoom, centered large images) are clipped by the canvas, not here.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect covering a whole surface, anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Overlap of two rects, or `None` when they do not overlap.
    pub fn intersect(&self, other: &RectF) -> Option<RectF> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(RectF::new(x, y, right - x, bottom - y))
    }
}

/// Draw the source once, scaled and translated.
///
/// `scale_x == scale_y` for every style except [`PlacementStyle::Stretched`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Horizontal scale applied to the source.
    pub scale_x: f64,
    /// Vertical scale applied to the source.
    pub scale_y: f64,
    /// Left edge of the scaled source in surface coordinates.
    pub offset_x: f64,
    /// Top edge of the scaled source in surface coordinates.
    pub offset_y: f64,
}

impl Placement {
    /// Placement with the same scale on both axes.
    pub const fn uniform(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            offset_x,
            offset_y,
        }
    }

    /// The uniform scale, or `None` when the axes differ (stretched).
    pub fn source_scale(&self) -> Option<f64> {
        (self.scale_x == self.scale_y).then_some(self.scale_x)
    }

    /// Where the whole source image ends up on the surface.
    pub fn placed_rect(&self, image: Size) -> RectF {
        RectF::new(
            self.offset_x,
            self.offset_y,
            image.width as f64 * self.scale_x,
            image.height as f64 * self.scale_y,
        )
    }

    /// Re-express this placement for a different-resolution copy of the same
    /// image (e.g. the preview working copy), keeping the placed rect intact.
    pub fn rebase(&self, from: Size, to: Size) -> Self {
        Self {
            scale_x: self.scale_x * from.width as f64 / to.width as f64,
            scale_y: self.scale_y * from.height as f64 / to.height as f64,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    fn is_drawable(&self) -> bool {
        [self.scale_x, self.scale_y]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0)
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }
}

/// Repeat the source edge-to-edge from the surface origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tiling {
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Tiling {
    /// Tiles needed per row to cover `surface` (last one may be partial).
    pub fn columns(&self, surface: Size) -> u32 {
        if self.tile_width == 0 {
            return 0;
        }
        surface.width.div_ceil(self.tile_width)
    }

    /// Rows needed to cover `surface` (last one may be partial).
    pub fn rows(&self, surface: Size) -> u32 {
        if self.tile_height == 0 {
            return 0;
        }
        surface.height.div_ceil(self.tile_height)
    }

    /// Total tile count for `surface`.
    pub fn tile_count(&self, surface: Size) -> u64 {
        self.columns(surface) as u64 * self.rows(surface) as u64
    }
}

/// Output of the geometry engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderPlan {
    /// Single scaled, translated instance.
    Placement(Placement),
    /// Repeated instances at a fixed tile size.
    Tiling(Tiling),
}

impl RenderPlan {
    /// Whether there is anything to draw.
    ///
    /// False for the zero or non-finite scales produced by an empty preview
    /// (or screen); callers skip the frame.
    pub fn is_drawable(&self) -> bool {
        match self {
            Self::Placement(p) => p.is_drawable(),
            Self::Tiling(t) => t.tile_width > 0 && t.tile_height > 0,
        }
    }
}

/// Compute the render plan for `image` shown with `style` on `screen`,
/// projected into a `preview` surface.
///
/// Total for positive dimensions. `image` must be non-empty (callers
/// guarantee this); an empty `preview` or `screen` yields a plan for which
/// [`RenderPlan::is_drawable`] is false.
pub fn compute_plan(
    image: ImageDimensions,
    screen: SurfaceDimensions,
    preview: SurfaceDimensions,
    style: PlacementStyle,
) -> RenderPlan {
    let (iw, ih) = (image.width as f64, image.height as f64);
    let (sw, sh) = (screen.width as f64, screen.height as f64);
    let (pw, ph) = (preview.width as f64, preview.height as f64);

    use PlacementStyle::*;
    let plan = match style {
        Centered => {
            // Native size on screen, so only the screen→preview projection scales it.
            let scale = fit_scale(sw, sh, pw, ph);
            RenderPlan::Placement(centered(iw, ih, pw, ph, scale))
        }

        Scaled => {
            let screen_scale = fit_scale(iw, ih, sw, sh);
            let widget_scale = fit_scale(iw * screen_scale, ih * screen_scale, pw, ph);
            RenderPlan::Placement(centered(iw, ih, pw, ph, screen_scale * widget_scale))
        }

        Stretched => RenderPlan::Placement(Placement {
            scale_x: pw / iw,
            scale_y: ph / ih,
            offset_x: 0.0,
            offset_y: 0.0,
        }),

        Spanned | Zoom => {
            let screen_scale = fill_scale(iw, ih, sw, sh);
            let widget_scale = fit_scale(sw, sh, pw, ph);
            RenderPlan::Placement(centered(iw, ih, pw, ph, screen_scale * widget_scale))
        }

        Tiled => {
            // Repetition is scale-invariant; preview tiles at working-copy size.
            let tile = downscaled_size(image, PREVIEW_CAP);
            RenderPlan::Tiling(Tiling {
                tile_width: tile.width,
                tile_height: tile.height,
            })
        }
    };

    log::debug!("plan {style:?}: image {image}, screen {screen}, preview {preview} -> {plan:?}");
    plan
}

/// Largest uniform scale at which `w`×`h` fits inside `tw`×`th`.
fn fit_scale(w: f64, h: f64, tw: f64, th: f64) -> f64 {
    (tw / w).min(th / h)
}

/// Smallest uniform scale at which `w`×`h` covers `tw`×`th`.
fn fill_scale(w: f64, h: f64, tw: f64, th: f64) -> f64 {
    (tw / w).max(th / h)
}

/// Uniform placement of a `w`×`h` image at `scale`, centered on a `cw`×`ch` surface.
fn centered(w: f64, h: f64, cw: f64, ch: f64, scale: f64) -> Placement {
    let offset_x = (cw - w * scale) / 2.0;
    let offset_y = (ch - h * scale) / 2.0;
    Placement::uniform(scale, offset_x, offset_y)
}
