//! Selection state and the handlers a front-end wires to its events.
//!
//! A [`Session`] is created once at startup and owns everything that changes
//! while the user works: the chosen style, the loaded image and at most one
//! outstanding file-picker request. Geometry itself is stateless and lives in
//! [`compute_plan`].

use std::path::Path;

use image::RgbaImage;

use crate::canvas::{Canvas, execute};
use crate::config::Config;
use crate::error::{Error, LoadError, RenderError};
use crate::geometry::{RectF, RenderPlan, Size, Tiling, compute_plan};
use crate::loader::{LoadedImage, THUMBNAIL_BOUNDS, load_image};
use crate::picker::{FileFilter, FilePicker, PendingPick, PickOutcome, pick_channel};
use crate::plan::commands;
use crate::settings::{SettingsBackend, WallpaperSettings};
use crate::style::PlacementStyle;

/// Result of [`Session::draw`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawStatus {
    /// No image selected; only the background was painted.
    Blank,
    /// The surface has no area; nothing was drawn.
    Skipped,
    /// The plan for the selected style was drawn.
    Drawn,
    /// The style's plan failed; a single fitted, centered instance was drawn.
    Fallback,
    /// Even the fallback failed; the frame shows the background at most.
    Failed,
}

/// Result of [`Session::poll_pick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickEvent {
    /// No request outstanding.
    Idle,
    /// Still waiting for the picker.
    Pending,
    /// A new image was selected and loaded.
    Loaded,
    /// The user backed out; selection unchanged.
    Cancelled,
}

/// What [`Session::apply`] handed to the settings store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedWallpaper {
    pub style: PlacementStyle,
    pub uri: String,
}

/// Selection state behind one preview window.
#[derive(Debug)]
pub struct Session {
    config: Config,
    style: PlacementStyle,
    image: Option<LoadedImage>,
    pending: Option<PendingPick>,
}

impl Session {
    /// Empty session starting in the configured default style.
    pub fn new(config: Config) -> Self {
        Self {
            style: config.default_style,
            config,
            image: None,
            pending: None,
        }
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Currently selected style.
    pub fn style(&self) -> PlacementStyle {
        self.style
    }

    /// Currently selected image, if any.
    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Whether [`apply`](Self::apply) has something to apply.
    pub fn can_apply(&self) -> bool {
        self.image.is_some()
    }

    /// Whether a file-picker request is outstanding.
    pub fn is_picking(&self) -> bool {
        self.pending.is_some()
    }

    /// Ask `picker` for an image. Ignored (returns `false`) while an earlier
    /// request is still outstanding.
    pub fn open<P: FilePicker + ?Sized>(&mut self, picker: &mut P) -> bool {
        if self.pending.is_some() {
            log::debug!("file picker already open");
            return false;
        }
        let (responder, pending) = pick_channel();
        self.pending = Some(pending);
        picker.open(&[FileFilter::images()], responder);
        true
    }

    /// Check on the outstanding pick request.
    ///
    /// A selection is loaded right away. Picker and load failures are
    /// returned; in every failure case the previous selection stays.
    pub fn poll_pick(&mut self) -> Result<PickEvent, Error> {
        let Some(pending) = &self.pending else {
            return Ok(PickEvent::Idle);
        };
        let Some(outcome) = pending.try_resolve() else {
            return Ok(PickEvent::Pending);
        };
        self.pending = None;

        match outcome {
            PickOutcome::Selected(path) => {
                self.load(&path)?;
                Ok(PickEvent::Loaded)
            }
            PickOutcome::Cancelled => Ok(PickEvent::Cancelled),
            PickOutcome::Failed(message) => {
                log::warn!("file picker failed: {message}");
                Err(Error::Picker(message))
            }
        }
    }

    /// Load `path` as the selected image. On failure the previous selection
    /// is kept.
    pub fn load(&mut self, path: &Path) -> Result<&LoadedImage, LoadError> {
        let loaded = load_image(path, self.config.preview_cap)?;
        Ok(self.image.insert(loaded))
    }

    /// Select a style; returns whether the preview needs a redraw.
    pub fn set_style(&mut self, style: PlacementStyle) -> bool {
        let changed = self.style != style;
        self.style = style;
        changed && self.image.is_some()
    }

    /// Plan for the current selection on a `preview` surface, `None`
    /// without an image.
    ///
    /// Placements use full-resolution geometry; tiles are the working copy.
    pub fn plan(&self, preview: Size) -> Option<RenderPlan> {
        let image = self.image.as_ref()?;
        Some(self.plan_for(image, preview))
    }

    fn plan_for(&self, image: &LoadedImage, surface: Size) -> RenderPlan {
        match compute_plan(image.dimensions(), self.config.screen, surface, self.style) {
            RenderPlan::Tiling(_) => {
                let tile = image.working_size();
                RenderPlan::Tiling(Tiling {
                    tile_width: tile.width,
                    tile_height: tile.height,
                })
            }
            placement => placement,
        }
    }

    /// Render one preview frame. Never fails: render errors are logged and
    /// answered with a fallback drawing.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> DrawStatus {
        let surface = canvas.size();
        if surface.is_empty() {
            return DrawStatus::Skipped;
        }

        let Some(image) = &self.image else {
            canvas.fill_rect(RectF::from_size(surface), self.config.background);
            return match canvas.commit() {
                Ok(()) => DrawStatus::Blank,
                Err(err) => {
                    log::warn!("preview background failed: {err}");
                    DrawStatus::Failed
                }
            };
        };

        let plan = self.plan_for(image, surface);
        if !plan.is_drawable() {
            log::debug!("nothing to draw for {plan:?}");
            return DrawStatus::Skipped;
        }

        match self.render(canvas, image, plan, surface) {
            Ok(()) => DrawStatus::Drawn,
            Err(err) => {
                log::warn!("{} preview failed ({err}), drawing fitted", self.style);
                let fitted = compute_plan(image.dimensions(), surface, surface, PlacementStyle::Scaled);
                match self.render(canvas, image, fitted, surface) {
                    Ok(()) => DrawStatus::Fallback,
                    Err(err) => {
                        log::warn!("fallback preview failed: {err}");
                        DrawStatus::Failed
                    }
                }
            }
        }
    }

    fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        image: &LoadedImage,
        plan: RenderPlan,
        surface: Size,
    ) -> Result<(), RenderError> {
        // Placements are computed on full-size dimensions; draw the working copy.
        let plan = match plan {
            RenderPlan::Placement(p) => {
                RenderPlan::Placement(p.rebase(image.dimensions(), image.working_size()))
            }
            tiling @ RenderPlan::Tiling(_) => tiling,
        };
        let cmds = commands(&plan, surface, image.working_size(), self.config.background)?;
        execute(canvas, &cmds, image.pixels())
    }

    /// Persist the current selection as the desktop wallpaper.
    pub fn apply<B: SettingsBackend>(
        &self,
        settings: &mut WallpaperSettings<B>,
    ) -> Result<AppliedWallpaper, Error> {
        let image = self.image.as_ref().ok_or(Error::NothingToApply)?;
        let uri = settings.apply(self.style, image.path())?;
        Ok(AppliedWallpaper {
            style: self.style,
            uri,
        })
    }

    /// The selected image fitted into the thumbnail panel.
    pub fn thumbnail(&self) -> Option<RgbaImage> {
        self.image.as_ref().map(|i| i.thumbnail(THUMBNAIL_BOUNDS))
    }
}
