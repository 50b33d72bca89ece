//! Desktop settings store.
//!
//! The wallpaper lives in two string keys of the desktop's background schema:
//! a `file://` URI and a placement token. [`WallpaperSettings`] implements
//! that contract on top of any [`SettingsBackend`]: [`GSettings`] talks to the
//! real GNOME store, [`MemorySettings`] keeps everything in a map (dry runs,
//! tests).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::Command;

use url::Url;

use crate::error::SettingsError;
use crate::style::{NO_PICTURE_TOKEN, PlacementStyle};

/// GNOME's desktop background schema.
pub const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
/// Key holding the wallpaper URI.
pub const PICTURE_URI: &str = "picture-uri";
/// Dark-style variant of [`PICTURE_URI`] (GNOME 42+). Written best-effort.
pub const PICTURE_URI_DARK: &str = "picture-uri-dark";
/// Key holding the placement token.
pub const PICTURE_OPTIONS: &str = "picture-options";

/// Key-value access to a settings schema.
pub trait SettingsBackend {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    fn get_string(&self, key: &str) -> Result<String, SettingsError>;

    /// Flush pending writes.
    fn sync(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }
}

/// Wallpaper keys on top of a [`SettingsBackend`].
#[derive(Clone, Debug, Default)]
pub struct WallpaperSettings<B> {
    backend: B,
}

impl<B: SettingsBackend> WallpaperSettings<B> {
    /// Wrap `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying store.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Persist a style token and image URI.
    ///
    /// The dark-style URI is attempted too; failures there (typically an
    /// older schema without the key) are ignored. Failures on the primary
    /// keys are returned.
    pub fn set(&mut self, style_token: &str, image_uri: &str) -> Result<(), SettingsError> {
        self.backend.set_string(PICTURE_URI, image_uri)?;

        if let Err(err) = self.backend.set_string(PICTURE_URI_DARK, image_uri) {
            log::debug!("skipping {PICTURE_URI_DARK}: {err}");
        }

        self.backend.set_string(PICTURE_OPTIONS, style_token)?;
        self.backend.sync()
    }

    /// Persist `style` for the image at `path`, returning the written URI.
    ///
    /// Relative paths are resolved against the current directory.
    pub fn apply(&mut self, style: PlacementStyle, path: &Path) -> Result<String, SettingsError> {
        let abs =
            std::path::absolute(path).map_err(|_| SettingsError::NotAbsolute(path.to_path_buf()))?;
        let uri = file_uri(&abs)?;
        self.set(style.settings_token(), &uri)?;
        log::info!("wallpaper set to {uri} ({})", style.settings_token());
        Ok(uri)
    }

    /// Stored placement token.
    pub fn get_style(&self) -> Result<String, SettingsError> {
        self.backend.get_string(PICTURE_OPTIONS)
    }

    /// Stored wallpaper URI.
    pub fn get_image_uri(&self) -> Result<String, SettingsError> {
        self.backend.get_string(PICTURE_URI)
    }

    /// Stored placement, `None` when the store says "no picture".
    pub fn current_style(&self) -> Result<Option<PlacementStyle>, SettingsError> {
        let token = self.get_style()?;
        if token == NO_PICTURE_TOKEN {
            return Ok(None);
        }
        PlacementStyle::from_settings_token(&token)
            .map(Some)
            .ok_or_else(|| SettingsError::Malformed {
                key: PICTURE_OPTIONS.to_string(),
                value: token,
            })
    }

    /// Stored wallpaper as a local path.
    ///
    /// `file://` URIs are decoded; anything else is returned verbatim.
    /// `None` when no wallpaper is set.
    pub fn current_image_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        let uri = self.get_image_uri()?;
        if uri.is_empty() {
            return Ok(None);
        }
        if uri.starts_with("file://") {
            let path = Url::parse(&uri)
                .ok()
                .and_then(|u| u.to_file_path().ok())
                .ok_or_else(|| SettingsError::Malformed {
                    key: PICTURE_URI.to_string(),
                    value: uri.clone(),
                })?;
            return Ok(Some(path));
        }
        Ok(Some(PathBuf::from(uri)))
    }
}

/// `file://` URI for an absolute path, percent-encoded.
pub fn file_uri(path: &Path) -> Result<String, SettingsError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| SettingsError::NotAbsolute(path.to_path_buf()))
}

// ============================================================================
// gsettings
// ============================================================================

/// Backend driving the `gsettings` command-line tool.
#[derive(Clone, Debug)]
pub struct GSettings {
    program: String,
    schema: String,
}

impl Default for GSettings {
    fn default() -> Self {
        Self::new(BACKGROUND_SCHEMA)
    }
}

impl GSettings {
    /// Talk to `schema` through the `gsettings` tool.
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            program: "gsettings".to_string(),
            schema: schema.into(),
        }
    }

    /// Use a different executable (e.g. a wrapper inside a sandbox).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Schema the keys are read from and written to.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn run(&self, key: &str, args: &[&str]) -> Result<String, SettingsError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| SettingsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if message.contains("No such key") {
                return Err(SettingsError::UnsupportedKey(key.to_string()));
            }
            return Err(SettingsError::Command {
                program: self.program.clone(),
                key: key.to_string(),
                message: if message.is_empty() {
                    output.status.to_string()
                } else {
                    message
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SettingsBackend for GSettings {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        log::debug!("gsettings set {} {key} {value}", self.schema);
        self.run(key, &["set", &self.schema, key, &quote_gvariant(value)])
            .map(|_| ())
    }

    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        let raw = self.run(key, &["get", &self.schema, key])?;
        unquote_gvariant(&raw).ok_or_else(|| SettingsError::Malformed {
            key: key.to_string(),
            value: raw.trim().to_string(),
        })
    }
}

/// GVariant text form of a string: single-quoted, `\` and `'` escaped.
fn quote_gvariant(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Parse a GVariant string literal as printed by `gsettings get`.
fn unquote_gvariant(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.strip_prefix("@s ").unwrap_or(s);
    let quote = s.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = s.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            other => out.push(other),
        }
    }
    Some(out)
}

// ============================================================================
// In-memory store
// ============================================================================

/// Settings kept in a map.
///
/// Keys marked unsupported reject writes the way a schema without them would.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
    unsupported: BTreeSet<String>,
    writes: Vec<(String, String)>,
    syncs: usize,
}

impl MemorySettings {
    /// Empty store accepting every key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes to `key`.
    pub fn without_key(mut self, key: &str) -> Self {
        self.unsupported.insert(key.to_string());
        self
    }

    /// Pre-populate `key`.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Successful writes, in order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    /// Number of [`sync`](SettingsBackend::sync) calls so far.
    pub fn sync_count(&self) -> usize {
        self.syncs
    }
}

impl SettingsBackend for MemorySettings {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        if self.unsupported.contains(key) {
            return Err(SettingsError::UnsupportedKey(key.to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        if self.unsupported.contains(key) {
            return Err(SettingsError::UnsupportedKey(key.to_string()));
        }
        Ok(self.values.get(key).cloned().unwrap_or_default())
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        self.syncs += 1;
        Ok(())
    }
}
