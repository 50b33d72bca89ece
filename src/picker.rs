//! File selection.
//!
//! A [`FilePicker`] is asynchronous: it receives a one-shot [`PickResponder`]
//! and answers whenever the user is done. The session keeps the matching
//! [`PendingPick`] and polls it from its event loop.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use image::ImageFormat;

/// Named set of accepted files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub mime_types: Vec<String>,
    /// Glob patterns of the form `*.ext`.
    pub patterns: Vec<String>,
}

impl FileFilter {
    /// JPEG and PNG images.
    pub fn images() -> Self {
        Self {
            name: "Image files".to_string(),
            mime_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            patterns: vec!["*.jpg".to_string(), "*.jpeg".to_string(), "*.png".to_string()],
        }
    }

    /// Whether `path` is accepted, by extension pattern or by the MIME type
    /// its extension implies.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let by_pattern = self.patterns.iter().any(|p| {
            p.strip_prefix("*.")
                .is_some_and(|want| want.eq_ignore_ascii_case(ext))
        });
        by_pattern
            || ImageFormat::from_extension(ext)
                .is_some_and(|f| self.mime_types.iter().any(|m| m == f.to_mime_type()))
    }
}

/// How a pick request ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(PathBuf),
    Cancelled,
    /// The picker itself failed; the message is shown to the user.
    Failed(String),
}

/// Answering half of a pick request. Consumed by [`PickResponder::respond`];
/// dropping it unanswered reads as [`PickOutcome::Cancelled`].
#[derive(Debug)]
pub struct PickResponder {
    tx: Sender<PickOutcome>,
}

impl PickResponder {
    pub fn respond(self, outcome: PickOutcome) {
        // The requester may have gone away; nothing left to notify.
        let _ = self.tx.send(outcome);
    }
}

/// Waiting half of a pick request.
#[derive(Debug)]
pub struct PendingPick {
    rx: Receiver<PickOutcome>,
}

impl PendingPick {
    /// `None` while the picker has not answered yet.
    pub fn try_resolve(&self) -> Option<PickOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(PickOutcome::Cancelled),
        }
    }
}

/// Create a linked responder / pending pair.
pub fn pick_channel() -> (PickResponder, PendingPick) {
    let (tx, rx) = mpsc::channel();
    (PickResponder { tx }, PendingPick { rx })
}

/// Something that lets the user choose a file.
pub trait FilePicker {
    /// Start a pick restricted to `filters`. The answer goes to `responder`,
    /// now or later.
    fn open(&mut self, filters: &[FileFilter], responder: PickResponder);
}

/// Picker that answers immediately with a path chosen up front (command
/// line, drag and drop).
#[derive(Clone, Debug, Default)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Picker whose every request is cancelled.
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

impl FilePicker for PathPicker {
    fn open(&mut self, filters: &[FileFilter], responder: PickResponder) {
        let outcome = match &self.path {
            None => PickOutcome::Cancelled,
            Some(path) if !path.is_file() => {
                PickOutcome::Failed(format!("{}: no such file", path.display()))
            }
            Some(path) if !filters.is_empty() && !filters.iter().any(|f| f.matches(path)) => {
                PickOutcome::Failed(format!("{}: not a supported image file", path.display()))
            }
            Some(path) => PickOutcome::Selected(path.clone()),
        };
        responder.respond(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── FileFilter ──────────────────────────────────────────────────────

    #[test]
    fn image_filter_accepts_jpeg_and_png() {
        let f = FileFilter::images();
        for name in ["a.jpg", "a.JPEG", "dir/b.png", "c.Png"] {
            assert!(f.matches(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn image_filter_rejects_others() {
        let f = FileFilter::images();
        for name in ["a.gif", "a.webp", "README", "png", "a.png.txt"] {
            assert!(!f.matches(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn mime_only_filter() {
        let f = FileFilter {
            name: "PNG".to_string(),
            mime_types: vec!["image/png".to_string()],
            patterns: vec![],
        };
        assert!(f.matches(Path::new("x.png")));
        assert!(!f.matches(Path::new("x.jpg")));
    }

    // ── channel ─────────────────────────────────────────────────────────

    #[test]
    fn pending_until_answered() {
        let (responder, pending) = pick_channel();
        assert_eq!(pending.try_resolve(), None);
        responder.respond(PickOutcome::Selected(PathBuf::from("/a.png")));
        assert_eq!(
            pending.try_resolve(),
            Some(PickOutcome::Selected(PathBuf::from("/a.png")))
        );
    }

    #[test]
    fn dropped_responder_is_cancel() {
        let (responder, pending) = pick_channel();
        drop(responder);
        assert_eq!(pending.try_resolve(), Some(PickOutcome::Cancelled));
    }

    #[test]
    fn responder_survives_dropped_pending() {
        let (responder, pending) = pick_channel();
        drop(pending);
        responder.respond(PickOutcome::Cancelled);
    }

    // ── PathPicker ──────────────────────────────────────────────────────

    fn pick(mut picker: PathPicker) -> PickOutcome {
        let (responder, pending) = pick_channel();
        picker.open(&[FileFilter::images()], responder);
        pending.try_resolve().unwrap()
    }

    #[test]
    fn path_picker_without_path_cancels() {
        assert_eq!(pick(PathPicker::cancelled()), PickOutcome::Cancelled);
    }

    #[test]
    fn path_picker_missing_file_fails() {
        let out = pick(PathPicker::new("/definitely/not/here.png"));
        assert!(matches!(out, PickOutcome::Failed(m) if m.contains("no such file")));
    }

    #[test]
    fn path_picker_filters() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"hi").unwrap();
        assert!(matches!(pick(PathPicker::new(&txt)), PickOutcome::Failed(_)));

        let png = dir.path().join("a.png");
        std::fs::write(&png, b"not really").unwrap();
        assert_eq!(pick(PathPicker::new(&png)), PickOutcome::Selected(png));
    }
}
