//! CLI output formatting.

use std::ffi::OsString;

use betterpaper::{DrawStatus, PlacementStyle, RenderPlan};

const DEBUG_VAR: &str = "BETTERPAPER_DEBUG";

pub fn debug_enabled() -> bool {
    flag_set(std::env::var_os(DEBUG_VAR))
}

fn flag_set(value: Option<OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{}", format_error(err, debug_enabled()));
}

/// The error with its causes on one line, or the full report with
/// backtrace when `debug` is set.
fn format_error(err: &anyhow::Error, debug: bool) -> String {
    if debug {
        format!("{err:?}")
    } else {
        format!("{err:#}")
    }
}

/// One-line summary of a render plan.
pub fn describe_plan(plan: &RenderPlan) -> String {
    match plan {
        RenderPlan::Placement(p) => {
            let scale = match p.source_scale() {
                Some(s) => format!("{s:.4}"),
                None => format!("{:.4}x{:.4}", p.scale_x, p.scale_y),
            };
            format!("scale {scale} at ({:.1}, {:.1})", p.offset_x, p.offset_y)
        }
        RenderPlan::Tiling(t) => format!("tiles of {}x{}", t.tile_width, t.tile_height),
    }
}

pub fn describe_status(status: DrawStatus) -> &'static str {
    match status {
        DrawStatus::Blank => "blank",
        DrawStatus::Skipped => "skipped",
        DrawStatus::Drawn => "drawn",
        DrawStatus::Fallback => "drawn (fallback)",
        DrawStatus::Failed => "failed",
    }
}

/// `Name  token` table of all styles.
pub fn style_table() -> String {
    PlacementStyle::ALL
        .iter()
        .map(|s| format!("{:<10} {}\n", s.display_name(), s.settings_token()))
        .collect()
}
