mod args;
mod output;

use std::path::Path;

use anyhow::{Context as _, bail};
use betterpaper::{
    Config, DrawStatus, GSettings, MemorySettings, PathPicker, PickEvent, PlacementStyle,
    RasterCanvas, Session, Size, WallpaperSettings,
};

fn main() {
    if let Err(err) = real_main() {
        output::print_error(&err);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    use clap::Parser as _;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = args::Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    match cli.cmd {
        args::Command::Preview {
            image,
            style,
            size,
            screen,
            out,
        } => preview(config, &image, style, size, screen, &out),
        args::Command::Apply {
            image,
            style,
            dry_run,
        } => apply(config, &image, style, dry_run),
        args::Command::Current => current(&config),
        args::Command::Styles => {
            print!("{}", output::style_table());
            Ok(())
        }
    }
}

/// Build a session with `image` selected through the picker.
fn open_session(
    config: Config,
    image: &Path,
    style: Option<PlacementStyle>,
) -> anyhow::Result<Session> {
    let mut session = Session::new(config);
    if let Some(style) = style {
        session.set_style(style);
    }
    session.open(&mut PathPicker::new(image));
    match session.poll_pick()? {
        PickEvent::Loaded => Ok(session),
        other => bail!("no image selected ({other:?})"),
    }
}

fn preview(
    mut config: Config,
    image: &Path,
    style: Option<PlacementStyle>,
    size: Option<Size>,
    screen: Option<Size>,
    out: &Path,
) -> anyhow::Result<()> {
    if let Some(screen) = screen {
        config.screen = screen;
    }
    let size = size.unwrap_or(config.preview);
    let session = open_session(config, image, style)?;

    let status = draw_to_file(&session, size, out)?;
    match status {
        DrawStatus::Failed => bail!("could not render a preview for {}", image.display()),
        DrawStatus::Skipped => {
            println!("nothing to draw at {size}, skipped {}", out.display());
            return Ok(());
        }
        _ => {}
    }

    if let Some(plan) = session.plan(size) {
        println!(
            "{} preview {size} for screen {}: {} [{}]",
            session.style(),
            session.config().screen,
            output::describe_plan(&plan),
            output::describe_status(status),
        );
    }
    println!("wrote {}", out.display());
    Ok(())
}

/// Draw a preview into `out`. Nothing is written for a skipped frame.
fn draw_to_file(session: &Session, size: Size, out: &Path) -> anyhow::Result<DrawStatus> {
    #[cfg(feature = "svg")]
    if out.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg")) {
        let href = session
            .image()
            .map(|i| betterpaper::settings::file_uri(i.path()))
            .transpose()?
            .unwrap_or_default();
        let mut canvas = betterpaper::svg::SvgCanvas::new(size, href);
        let status = session.draw(&mut canvas);
        if status == DrawStatus::Skipped {
            return Ok(status);
        }
        std::fs::write(out, canvas.finish())
            .with_context(|| format!("writing {}", out.display()))?;
        return Ok(status);
    }

    let mut canvas = RasterCanvas::new(size);
    let status = session.draw(&mut canvas);
    if status != DrawStatus::Skipped {
        canvas.save(out)?;
    }
    Ok(status)
}

fn apply(
    config: Config,
    image: &Path,
    style: Option<PlacementStyle>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let schema = config.schema.clone();
    let session = open_session(config, image, style)?;

    if dry_run {
        let mut settings = WallpaperSettings::new(MemorySettings::new());
        session.apply(&mut settings)?;
        for (key, value) in settings.backend().writes() {
            println!("{schema} {key} {value}");
        }
        return Ok(());
    }

    let mut settings = WallpaperSettings::new(GSettings::new(schema));
    let applied = session
        .apply(&mut settings)
        .context("applying wallpaper")?;
    println!("Wallpaper Applied: {} ({})", applied.uri, applied.style);
    Ok(())
}

fn current(config: &Config) -> anyhow::Result<()> {
    let settings = WallpaperSettings::new(GSettings::new(config.schema.clone()));
    let style = settings
        .current_style()
        .context("reading wallpaper style")?;
    let path = settings
        .current_image_path()
        .context("reading wallpaper image")?;

    match style {
        Some(style) => println!("style: {style} ({})", style.settings_token()),
        None => println!("style: none"),
    }
    match path {
        Some(path) => println!("image: {}", path.display()),
        None => println!("image: none"),
    }
    Ok(())
}
