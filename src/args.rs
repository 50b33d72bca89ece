//! CLI argument definitions.

use std::path::PathBuf;

use betterpaper::{PlacementStyle, Size};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "betterpaper")]
#[command(about = "Preview and apply desktop wallpapers", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a preview of how the image would look on the desktop.
    Preview {
        /// Image file (JPEG or PNG).
        image: PathBuf,

        /// Placement style (display name or settings token).
        #[arg(long, short)]
        style: Option<PlacementStyle>,

        /// Preview size, e.g. 640x360.
        #[arg(long, value_parser = parse_area)]
        size: Option<Size>,

        /// Screen resolution to simulate, e.g. 1920x1080.
        #[arg(long, value_parser = parse_area)]
        screen: Option<Size>,

        /// Output file; `.svg` writes a vector preview when built with SVG support.
        #[arg(long, short, default_value = "preview.png")]
        out: PathBuf,
    },

    /// Set the image as the desktop wallpaper.
    Apply {
        /// Image file (JPEG or PNG).
        image: PathBuf,

        /// Placement style (display name or settings token).
        #[arg(long, short)]
        style: Option<PlacementStyle>,

        /// Show the settings that would be written without touching the desktop.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the current wallpaper and style.
    Current,

    /// List placement styles and their settings tokens.
    Styles,
}

/// A `WxH` size with both sides non-zero.
fn parse_area(s: &str) -> Result<Size, String> {
    let size = s.parse::<Size>().map_err(|e| e.to_string())?;
    if size.is_empty() {
        return Err(format!("{size} has no area"));
    }
    Ok(size)
}
