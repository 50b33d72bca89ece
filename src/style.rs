//! Wallpaper placement styles and their settings-store vocabulary.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the wallpaper image is mapped onto the screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStyle {
    /// Native size, centered; may be cropped or letterboxed.
    Centered,
    /// Fit inside the screen preserving aspect ratio; letterboxed.
    #[default]
    Scaled,
    /// Fill the screen exactly, distorting aspect ratio.
    Stretched,
    /// Fill the screen preserving aspect ratio, cropping overflow.
    /// Same geometry as [`Zoom`](Self::Zoom).
    Spanned,
    /// Fill the screen preserving aspect ratio, cropping overflow.
    Zoom,
    /// Repeat the image at its own size.
    Tiled,
}

/// Settings token meaning "no picture".
pub const NO_PICTURE_TOKEN: &str = "none";

impl PlacementStyle {
    /// All styles, in the order a style selector lists them.
    pub const ALL: [Self; 6] = [
        Self::Centered,
        Self::Scaled,
        Self::Stretched,
        Self::Spanned,
        Self::Zoom,
        Self::Tiled,
    ];

    /// Human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Centered => "Centered",
            Self::Scaled => "Scaled",
            Self::Stretched => "Stretched",
            Self::Spanned => "Spanned",
            Self::Zoom => "Zoom",
            Self::Tiled => "Tiled",
        }
    }

    /// Token the desktop settings store expects for this style.
    ///
    /// `Tiled` keeps the store's historical name.
    pub const fn settings_token(self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::Scaled => "scaled",
            Self::Stretched => "stretched",
            Self::Spanned => "spanned",
            Self::Zoom => "zoom",
            Self::Tiled => "wallpaper",
        }
    }

    /// Reverse of [`settings_token`](Self::settings_token).
    ///
    /// `None` for unknown tokens and for [`NO_PICTURE_TOKEN`].
    pub fn from_settings_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.settings_token() == token)
    }

    /// Case-insensitive lookup by display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.display_name().eq_ignore_ascii_case(name))
    }

    /// Whether both styles produce the same geometry.
    pub fn is_alias_of(self, other: Self) -> bool {
        use PlacementStyle::*;
        self == other || matches!((self, other), (Spanned, Zoom) | (Zoom, Spanned))
    }
}

impl fmt::Display for PlacementStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned for an unrecognized style name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown wallpaper style {0:?}")]
pub struct ParseStyleError(String);

impl FromStr for PlacementStyle {
    type Err = ParseStyleError;

    /// Accepts display names (any case) and settings tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display_name(s)
            .or_else(|| Self::from_settings_token(&s.trim().to_ascii_lowercase()))
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}
