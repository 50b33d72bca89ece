//! Wallpaper previews that match what the desktop will actually show.
//!
//! Every placement style (centered, scaled, stretched, spanned, zoom, tiled)
//! is resolved at full screen resolution first and then projected into the
//! preview surface, so a small preview is a faithful miniature of the real
//! desktop.
//!
//! # Modules
//!
//! - [`geometry`]: the placement engine ([`compute_plan`]) and its value types
//! - [`style`]: placement styles and the settings-store token vocabulary
//! - [`plan`]: expansion of a render plan into draw commands
//! - [`canvas`]: the [`Canvas`] drawing seam and an in-memory raster canvas
//! - [`session`]: selection state and event handlers
//! - [`settings`]: reading and writing the desktop wallpaper keys
//! - [`picker`]: asynchronous file selection
//! - [`loader`], [`downscale`]: decoding and preview working copies
//! - [`config`], [`color`]: user configuration

#![forbid(unsafe_code)]

pub mod canvas;
pub mod color;
pub mod config;
pub mod downscale;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod picker;
pub mod plan;
pub mod session;
pub mod settings;
pub mod style;

#[cfg(feature = "svg")]
pub mod svg;

pub use canvas::{Canvas, RasterCanvas, execute};
pub use color::FillColor;
pub use config::Config;
pub use downscale::{PREVIEW_CAP, downscaled_size};
pub use error::{ConfigError, Error, LoadError, RenderError, SettingsError};
pub use geometry::{
    ImageDimensions, Placement, RectF, RenderPlan, Size, SurfaceDimensions, Tiling, compute_plan,
};
pub use loader::{LoadedImage, load_image};
pub use picker::{FileFilter, FilePicker, PathPicker, PickOutcome};
pub use plan::DrawCommand;
pub use session::{AppliedWallpaper, DrawStatus, PickEvent, Session};
pub use settings::{GSettings, MemorySettings, SettingsBackend, WallpaperSettings};
pub use style::PlacementStyle;
