//! User configuration.
//!
//! Stored as JSON at `<config_dir>/betterpaper/config.json`. Every field is
//! optional; a missing file means all defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::FillColor;
use crate::downscale::PREVIEW_CAP;
use crate::error::ConfigError;
use crate::geometry::Size;
use crate::settings::BACKGROUND_SCHEMA;
use crate::style::PlacementStyle;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Resolution the wallpaper is previewed for.
    #[serde(default = "default_screen")]
    pub screen: Size,
    /// Preview surface size used when no surface is given explicitly.
    #[serde(default = "default_preview")]
    pub preview: Size,
    /// Longest side of the preview working copy; 0 disables downscaling.
    #[serde(default = "default_preview_cap")]
    pub preview_cap: u32,
    /// Preview background.
    #[serde(default)]
    pub background: FillColor,
    #[serde(default)]
    pub default_style: PlacementStyle,
    /// Settings schema holding the wallpaper keys.
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_screen() -> Size {
    Size::new(1920, 1080)
}

fn default_preview() -> Size {
    Size::new(640, 360)
}

fn default_preview_cap() -> u32 {
    PREVIEW_CAP
}

fn default_schema() -> String {
    BACKGROUND_SCHEMA.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: default_screen(),
            preview: default_preview(),
            preview_cap: default_preview_cap(),
            background: FillColor::default(),
            default_style: PlacementStyle::default(),
            schema: default_schema(),
        }
    }
}

impl Config {
    /// Default location, `None` when the platform has no config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("betterpaper").join("config.json"))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}
