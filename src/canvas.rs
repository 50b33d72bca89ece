//! Display surfaces.
//!
//! [`Canvas`] is the seam between the engine and whatever actually puts
//! pixels on screen. [`RasterCanvas`] renders into an RGBA buffer, which is
//! what the command-line front-end saves as the preview image.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::color::FillColor;
use crate::error::RenderError;
use crate::geometry::{RectF, Size};
use crate::plan::DrawCommand;

/// A 2D immediate-mode drawing target.
pub trait Canvas {
    /// Current surface size, queried once per frame.
    fn size(&self) -> Size;

    /// Fill `rect` (clipped to the surface) with `color`.
    fn fill_rect(&mut self, rect: RectF, color: FillColor);

    /// Draw `image` scaled by `scale` with its top-left corner at `offset`.
    /// Whatever falls outside the surface is clipped.
    fn draw_image(
        &mut self,
        image: &RgbaImage,
        offset: (f64, f64),
        scale: (f64, f64),
    ) -> Result<(), RenderError>;

    /// Finish the frame.
    fn commit(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Issue `commands` against `canvas`, drawing `image` for each image command,
/// then commit.
pub fn execute<C: Canvas + ?Sized>(
    canvas: &mut C,
    commands: &[DrawCommand],
    image: &RgbaImage,
) -> Result<(), RenderError> {
    for cmd in commands {
        match *cmd {
            DrawCommand::Fill { rect, color } => canvas.fill_rect(rect, color),
            DrawCommand::Image {
                offset_x,
                offset_y,
                scale_x,
                scale_y,
            } => canvas.draw_image(image, (offset_x, offset_y), (scale_x, scale_y))?,
        }
    }
    canvas.commit()
}

/// In-memory RGBA canvas.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    target: RgbaImage,
}

impl RasterCanvas {
    /// Transparent canvas of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            target: RgbaImage::new(size.width, size.height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_image(self) -> RgbaImage {
        self.target
    }

    /// Write the canvas as an image file; format follows the extension.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.target
            .save(path)
            .map_err(|e| RenderError::Canvas(format!("{}: {e}", path.display())))
    }

    /// Integer pixel span `[start, end)` covered by `rect`, clipped to the surface.
    ///
    /// A pixel is covered when its center lies inside the rect.
    fn pixel_span(&self, rect: &RectF) -> Option<(u32, u32, u32, u32)> {
        let surface = RectF::from_size(Size::new(self.target.width(), self.target.height()));
        let r = surface.intersect(rect)?;
        let x0 = (r.x - 0.5).ceil().max(0.0) as u32;
        let y0 = (r.y - 0.5).ceil().max(0.0) as u32;
        let x1 = ((r.right() - 0.5).ceil().max(0.0) as u32).min(self.target.width());
        let y1 = ((r.bottom() - 0.5).ceil().max(0.0) as u32).min(self.target.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> Size {
        Size::new(self.target.width(), self.target.height())
    }

    fn fill_rect(&mut self, rect: RectF, color: FillColor) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(&rect) else {
            return;
        };
        let src = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                blend_over(self.target.get_pixel_mut(x, y), src);
            }
        }
    }

    fn draw_image(
        &mut self,
        image: &RgbaImage,
        offset: (f64, f64),
        scale: (f64, f64),
    ) -> Result<(), RenderError> {
        let (sx, sy) = scale;
        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return Err(RenderError::DegenerateScale {
                scale_x: sx,
                scale_y: sy,
            });
        }
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 {
            return Ok(());
        }

        let placed = RectF::new(offset.0, offset.1, iw as f64 * sx, ih as f64 * sy);
        let Some((x0, y0, x1, y1)) = self.pixel_span(&placed) else {
            return Ok(());
        };

        // Nearest-neighbour inverse mapping from destination pixel centers.
        for y in y0..y1 {
            let src_y = ((y as f64 + 0.5 - offset.1) / sy).floor().clamp(0.0, (ih - 1) as f64) as u32;
            for x in x0..x1 {
                let src_x =
                    ((x as f64 + 0.5 - offset.0) / sx).floor().clamp(0.0, (iw - 1) as f64) as u32;
                blend_over(self.target.get_pixel_mut(x, y), *image.get_pixel(src_x, src_y));
            }
        }
        Ok(())
    }
}

/// Source-over compositing of straight-alpha `src` onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let da = dst[3] as u32;
    // Output alpha in 0..=255*255 units.
    let out_a = sa * 255 + da * (255 - sa);
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        dst[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
