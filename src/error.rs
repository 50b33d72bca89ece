//! Error types.
//!
//! One enum per failure domain, aggregated into [`Error`] for callers that
//! drive a whole session.

use std::path::PathBuf;

/// An image could not be opened for preview.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a decodable image.
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The image decoded to zero width or height.
    #[error("{} has no pixels", path.display())]
    Empty { path: PathBuf },
}

/// A preview frame could not be rendered.
///
/// Recovered per frame; never blocks applying the wallpaper.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// Scale factors that are zero, negative or not finite.
    #[error("degenerate scale {scale_x}x{scale_y}")]
    DegenerateScale { scale_x: f64, scale_y: f64 },
    /// A tile with no area.
    #[error("degenerate tile size {width}x{height}")]
    DegenerateTile { width: u32, height: u32 },
    /// Tiling would issue more draw calls than a preview frame allows.
    #[error("tiling needs {count} tiles (limit {limit})")]
    TooManyTiles { count: u64, limit: u64 },
    /// The canvas itself failed (e.g. writing its output).
    #[error("canvas error: {0}")]
    Canvas(String),
}

/// The desktop settings store rejected or failed a request.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings tool could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The settings tool ran but reported failure.
    #[error("{program} failed for {key}: {message}")]
    Command {
        program: String,
        key: String,
        message: String,
    },
    /// The key does not exist in the schema.
    #[error("settings key {0:?} is not supported")]
    UnsupportedKey(String),
    /// A stored value could not be interpreted.
    #[error("malformed value for {key}: {value:?}")]
    Malformed { key: String, value: String },
    /// Paths must be absolute to become `file://` URIs.
    #[error("cannot build a file URI from {}", .0.display())]
    NotAbsolute(PathBuf),
}

/// The configuration file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure surfaced by a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The file picker reported an error (not a cancellation).
    #[error("file picker failed: {0}")]
    Picker(String),
    /// Apply was requested before any image was opened.
    #[error("no image selected")]
    NothingToApply,
}
