//! Draw-command expansion of a render plan.
//!
//! A [`RenderPlan`] says *where* the image goes; this module turns it into
//! the concrete, ordered calls a [`Canvas`](crate::Canvas) receives for one
//! frame.

use crate::color::FillColor;
use crate::error::RenderError;
use crate::geometry::{Placement, RectF, RenderPlan, Size};

/// Upper bound on tiles issued for one preview frame.
pub const MAX_TILES: u64 = 65_536;

/// A single canvas operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle with a solid color.
    Fill { rect: RectF, color: FillColor },
    /// Draw the image scaled by `(scale_x, scale_y)` with its top-left at
    /// `(offset_x, offset_y)`.
    Image {
        offset_x: f64,
        offset_y: f64,
        scale_x: f64,
        scale_y: f64,
    },
}

impl DrawCommand {
    fn image(p: &Placement) -> Self {
        Self::Image {
            offset_x: p.offset_x,
            offset_y: p.offset_y,
            scale_x: p.scale_x,
            scale_y: p.scale_y,
        }
    }
}

/// Expand `plan` for a `surface`, drawing a `pixels`-sized image.
///
/// `pixels` is the size of the buffer actually drawn (the working copy), which
/// tiling needs to scale each tile to the plan's tile size. The first command
/// always fills the whole surface with `background`.
pub fn commands(
    plan: &RenderPlan,
    surface: Size,
    pixels: Size,
    background: FillColor,
) -> Result<Vec<DrawCommand>, RenderError> {
    let mut out = vec![DrawCommand::Fill {
        rect: RectF::from_size(surface),
        color: background,
    }];

    match plan {
        RenderPlan::Placement(p) => {
            if !plan.is_drawable() {
                return Err(RenderError::DegenerateScale {
                    scale_x: p.scale_x,
                    scale_y: p.scale_y,
                });
            }
            out.push(DrawCommand::image(p));
        }

        RenderPlan::Tiling(t) => {
            if t.tile_width == 0 || t.tile_height == 0 || pixels.is_empty() {
                return Err(RenderError::DegenerateTile {
                    width: t.tile_width,
                    height: t.tile_height,
                });
            }
            let count = t.tile_count(surface);
            if count > MAX_TILES {
                return Err(RenderError::TooManyTiles {
                    count,
                    limit: MAX_TILES,
                });
            }
            let scale_x = t.tile_width as f64 / pixels.width as f64;
            let scale_y = t.tile_height as f64 / pixels.height as f64;
            out.reserve(count as usize);
            for row in 0..t.rows(surface) {
                for col in 0..t.columns(surface) {
                    out.push(DrawCommand::Image {
                        offset_x: col as f64 * t.tile_width as f64,
                        offset_y: row as f64 * t.tile_height as f64,
                        scale_x,
                        scale_y,
                    });
                }
            }
        }
    }

    Ok(out)
}
