//! Opening images for preview.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use num_traits::ToPrimitive;

use crate::downscale::working_copy;
use crate::error::LoadError;
use crate::geometry::{RenderPlan, Size, compute_plan};
use crate::style::PlacementStyle;

/// Bounds of the "original image" thumbnail panel.
pub const THUMBNAIL_BOUNDS: Size = Size::new(640, 360);

/// A decoded image ready for previewing.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    path: PathBuf,
    dimensions: Size,
    working: RgbaImage,
}

impl LoadedImage {
    /// Absolute path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full-resolution dimensions, used for all placement geometry.
    pub fn dimensions(&self) -> Size {
        self.dimensions
    }

    /// Preview working copy (possibly downscaled).
    pub fn pixels(&self) -> &RgbaImage {
        &self.working
    }

    pub fn working_size(&self) -> Size {
        Size::new(self.working.width(), self.working.height())
    }

    /// The image fitted inside `bounds`, aspect preserved.
    pub fn thumbnail(&self, bounds: Size) -> RgbaImage {
        if bounds.is_empty() {
            return RgbaImage::new(0, 0);
        }
        let RenderPlan::Placement(p) =
            compute_plan(self.dimensions, bounds, bounds, PlacementStyle::Scaled)
        else {
            return RgbaImage::new(0, 0);
        };
        let rect = p.placed_rect(self.dimensions);
        let side = |v: f64, max: u32| v.round().to_u32().unwrap_or(max).clamp(1, max);
        let (w, h) = (side(rect.width, bounds.width), side(rect.height, bounds.height));
        imageops::resize(&self.working, w, h, FilterType::Triangle)
    }
}

/// Decode `path` and build its preview working copy, longest side at most
/// `cap` pixels.
pub fn load_image(path: &Path, cap: u32) -> Result<LoadedImage, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let abs = std::path::absolute(path).map_err(io_err)?;

    let decoded = ImageReader::open(&abs)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| LoadError::Decode {
            path: abs.clone(),
            source,
        })?;

    let full = decoded.to_rgba8();
    let dimensions = Size::new(full.width(), full.height());
    if dimensions.is_empty() {
        return Err(LoadError::Empty { path: abs });
    }

    let working = working_copy(&full, cap).into_owned();
    log::info!(
        "loaded {} ({dimensions}, preview copy {}x{})",
        abs.display(),
        working.width(),
        working.height()
    );

    Ok(LoadedImage {
        path: abs,
        dimensions,
        working,
    })
}
