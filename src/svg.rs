//! SVG display surface.
//!
//! Records the preview frame as an SVG document instead of pixels. Images are
//! referenced, not embedded: the caller supplies the `href` (usually the
//! `file://` URI of the selected image) and the document scales it to the
//! placed rect. Overflow is clipped by the root viewport, matching what a
//! raster canvas does.
//!
//! # Example
//!
//! ```
//! use betterpaper::{PlacementStyle, Size, compute_plan, plan, svg::SvgCanvas};
//!
//! let image = Size::new(400, 200);
//! let preview = Size::new(640, 360);
//! let render = compute_plan(image, Size::new(1920, 1080), preview, PlacementStyle::Scaled);
//! let cmds = plan::commands(&render, preview, image, Default::default()).unwrap();
//!
//! let mut canvas = SvgCanvas::new(preview, "file:///tmp/wall.png");
//! betterpaper::execute(&mut canvas, &cmds, &image::RgbaImage::new(400, 200)).unwrap();
//! let svg = canvas.finish();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("<image"));
//! ```

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::color::FillColor;
use crate::error::RenderError;
use crate::geometry::{RectF, Size};

/// Canvas that accumulates SVG elements.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    size: Size,
    href: String,
    body: String,
}

impl SvgCanvas {
    /// Empty document of `size`; image commands reference `href`.
    pub fn new(size: Size, href: impl Into<String>) -> Self {
        Self {
            size,
            href: href.into(),
            body: String::with_capacity(1024),
        }
    }

    /// Complete SVG document.
    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" overflow="hidden">"#,
            w = self.size.width,
            h = self.size.height,
        ));
        svg.push('\n');
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_rect(&mut self, rect: RectF, color: FillColor) {
        let Some(r) = RectF::from_size(self.size).intersect(&rect) else {
            return;
        };
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
            r.x,
            r.y,
            r.width,
            r.height,
            FillColor { a: 255, ..color }.to_hex(),
            opacity_attr(color),
        ));
        self.body.push('\n');
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
        let placed = RectF::new(offset.0, offset.1, iw as f64 * sx, ih as f64 * sy);
        if RectF::from_size(self.size).intersect(&placed).is_none() {
            return Ok(());
        }
        self.body.push_str(&format!(
            r#"<image href="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="none"/>"#,
            escape_xml(&self.href),
            placed.x,
            placed.y,
            placed.width,
            placed.height,
        ));
        self.body.push('\n');
        Ok(())
    }
}

fn opacity_attr(color: FillColor) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" fill-opacity="{:.3}""#, color.a as f64 / 255.0)
    }
}

/// Escape special characters for XML attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
