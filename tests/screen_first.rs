//! Screen-first simulation vs direct preview plan.
//!
//! "Screen first" = place the image on a full-resolution screen exactly the
//! way the desktop would, then shrink the whole screen into the preview.
//!
//! "Direct" = `compute_plan()` for the preview surface, drawn in one shot.
//!
//! For previews with the screen's aspect ratio the two must agree: geometry
//! exactly (up to float error), pixels up to nearest-neighbour rounding.
//! Every source pixel is tagged with its own coordinates so a wrong scale or
//! offset shows up as mismatched coordinates.

use betterpaper::plan::commands;
use betterpaper::*;
use image::{Rgba, RgbaImage};

// ---- Reference geometry ----

/// Where the desktop puts the image, in screen pixels.
fn screen_placement(image: Size, screen: Size, style: PlacementStyle) -> Placement {
    let (iw, ih) = (image.width as f64, image.height as f64);
    let (sw, sh) = (screen.width as f64, screen.height as f64);
    let centered = |s: f64| Placement::uniform(s, (sw - iw * s) / 2.0, (sh - ih * s) / 2.0);
    match style {
        PlacementStyle::Centered => centered(1.0),
        PlacementStyle::Scaled => centered((sw / iw).min(sh / ih)),
        PlacementStyle::Stretched => Placement {
            scale_x: sw / iw,
            scale_y: sh / ih,
            offset_x: 0.0,
            offset_y: 0.0,
        },
        PlacementStyle::Spanned | PlacementStyle::Zoom => centered((sw / iw).max(sh / ih)),
        PlacementStyle::Tiled => unreachable!("tiling is not screen-relative"),
    }
}

/// Shrink a screen placement into a preview with the same aspect ratio.
fn project(p: Placement, screen: Size, preview: Size) -> Placement {
    assert_eq!(
        preview.width as u64 * screen.height as u64,
        preview.height as u64 * screen.width as u64,
        "{preview} is not proportional to {screen}"
    );
    let k = preview.width as f64 / screen.width as f64;
    Placement {
        scale_x: p.scale_x * k,
        scale_y: p.scale_y * k,
        offset_x: p.offset_x * k,
        offset_y: p.offset_y * k,
    }
}

fn direct(image: Size, screen: Size, preview: Size, style: PlacementStyle) -> Placement {
    match compute_plan(image, screen, preview, style) {
        RenderPlan::Placement(p) => p,
        RenderPlan::Tiling(t) => panic!("{style:?}: unexpected {t:?}"),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn assert_rect_eq(name: &str, a: RectF, b: RectF) {
    assert!(
        close(a.x, b.x) && close(a.y, b.y) && close(a.width, b.width) && close(a.height, b.height),
        "{name}: direct {a:?} != screen-first {b:?}"
    );
}

const SCREENS: [Size; 4] = [
    Size::new(1920, 1080),
    Size::new(2560, 1440),
    Size::new(1280, 720),
    Size::new(1920, 1200),
];

const IMAGES: [Size; 9] = [
    Size::new(4000, 2000),
    Size::new(1000, 1000),
    Size::new(640, 480),
    Size::new(1920, 1080),
    Size::new(300, 900),
    Size::new(7000, 1000),
    Size::new(1, 1),
    Size::new(2000, 2),
    Size::new(5120, 2880),
];

/// Preview sizes proportional to `screen`: 1/8, 1/4, 1/2, 1 and 2 times.
fn previews(screen: Size) -> impl Iterator<Item = Size> {
    [(1, 8), (1, 4), (1, 2), (1, 1), (2, 1)]
        .into_iter()
        .map(move |(n, d)| Size::new(screen.width * n / d, screen.height * n / d))
}

const RELATIVE: [PlacementStyle; 5] = [
    PlacementStyle::Centered,
    PlacementStyle::Scaled,
    PlacementStyle::Stretched,
    PlacementStyle::Spanned,
    PlacementStyle::Zoom,
];

// ---- Geometry sweep ----

#[test]
fn direct_matches_screen_first_geometry() {
    for screen in SCREENS {
        for preview in previews(screen) {
            for image in IMAGES {
                for style in RELATIVE {
                    let name = format!("{style:?} {image} on {screen} in {preview}");
                    let got = direct(image, screen, preview, style).placed_rect(image);
                    let want = project(screen_placement(image, screen, style), screen, preview)
                        .placed_rect(image);
                    assert_rect_eq(&name, got, want);
                }
            }
        }
    }
}

#[test]
fn spanned_and_zoom_identical() {
    for screen in SCREENS {
        for image in IMAGES {
            let preview = Size::new(800, 450);
            assert_eq!(
                compute_plan(image, screen, preview, PlacementStyle::Spanned),
                compute_plan(image, screen, preview, PlacementStyle::Zoom),
            );
        }
    }
}

// ---- Properties that hold for any preview shape ----

const ODD_PREVIEWS: [Size; 5] = [
    Size::new(640, 360),
    Size::new(800, 450),
    Size::new(300, 500),
    Size::new(1000, 100),
    Size::new(17, 13),
];

#[test]
fn scaled_keeps_aspect_and_stays_inside() {
    for screen in SCREENS {
        for preview in ODD_PREVIEWS {
            for image in IMAGES {
                let p = direct(image, screen, preview, PlacementStyle::Scaled);
                let r = p.placed_rect(image);
                let name = format!("{image} on {screen} in {preview}");
                assert!(close(r.width / r.height, image.aspect()), "{name}: {r:?}");
                assert!(r.x >= -1e-9 && r.y >= -1e-9, "{name}: {r:?}");
                assert!(r.right() <= preview.width as f64 + 1e-9, "{name}: {r:?}");
                assert!(r.bottom() <= preview.height as f64 + 1e-9, "{name}: {r:?}");
            }
        }
    }
}

#[test]
fn stretched_fills_preview_exactly() {
    for screen in SCREENS {
        for preview in ODD_PREVIEWS {
            for image in IMAGES {
                let r = direct(image, screen, preview, PlacementStyle::Stretched).placed_rect(image);
                assert_rect_eq(&format!("{image}"), r, RectF::from_size(preview));
            }
        }
    }
}

#[test]
fn centered_is_centered() {
    for screen in SCREENS {
        for preview in ODD_PREVIEWS {
            for image in IMAGES {
                let p = direct(image, screen, preview, PlacementStyle::Centered);
                let r = p.placed_rect(image);
                assert!(close(r.x + r.width / 2.0, preview.width as f64 / 2.0));
                assert!(close(r.y + r.height / 2.0, preview.height as f64 / 2.0));
            }
        }
    }
}

#[test]
fn zoom_covers_preview_when_proportional() {
    for screen in SCREENS {
        for preview in previews(screen) {
            for image in IMAGES {
                let r = direct(image, screen, preview, PlacementStyle::Zoom).placed_rect(image);
                assert!(r.x <= 1e-9 && r.y <= 1e-9, "{image} {preview}: {r:?}");
                assert!(r.right() >= preview.width as f64 - 1e-9, "{image} {preview}: {r:?}");
                assert!(r.bottom() >= preview.height as f64 - 1e-9, "{image} {preview}: {r:?}");
            }
        }
    }
}

#[test]
fn tiling_ignores_screen_and_preview() {
    for image in IMAGES {
        let expected = downscaled_size(image, PREVIEW_CAP);
        for screen in SCREENS {
            for preview in ODD_PREVIEWS {
                let plan = compute_plan(image, screen, preview, PlacementStyle::Tiled);
                assert_eq!(
                    plan,
                    RenderPlan::Tiling(Tiling {
                        tile_width: expected.width,
                        tile_height: expected.height,
                    })
                );
            }
        }
    }
}

#[test]
fn downscale_hits_cap_and_keeps_aspect() {
    for image in IMAGES {
        let out = downscaled_size(image, PREVIEW_CAP);
        if image.max_side() > PREVIEW_CAP {
            assert_eq!(out.max_side(), PREVIEW_CAP, "{image}");
            let expected_short = image.width.min(image.height) as f64 * PREVIEW_CAP as f64
                / image.max_side() as f64;
            let short = out.width.min(out.height) as f64;
            assert!((short - expected_short).abs() <= 1.0, "{image} -> {out}");
        } else {
            assert_eq!(out, image);
        }
    }
}

// ---- Pixel simulation ----

const FILL: FillColor = FillColor::opaque(0, 200, 0);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pixel {
    Source(u32, u32),
    Fill,
}

/// Image whose pixel at (x, y) encodes (x, y). Both sides must be < 256.
fn tagged(w: u32, h: u32) -> RgbaImage {
    assert!(w < 256 && h < 256);
    RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, 0, y as u8, 255]))
}

fn decode(p: &Rgba<u8>) -> Pixel {
    if p[1] == 200 {
        Pixel::Fill
    } else {
        Pixel::Source(p[0] as u32, p[2] as u32)
    }
}

fn render(surface: Size, placement: Placement, src: &RgbaImage) -> RasterCanvas {
    let image = Size::new(src.width(), src.height());
    let cmds = commands(&RenderPlan::Placement(placement), surface, image, FILL).unwrap();
    let mut canvas = RasterCanvas::new(surface);
    execute(&mut canvas, &cmds, src).unwrap();
    canvas
}

/// Render at screen resolution, then sample the screen at preview pixel centers.
fn screen_first_pixels(
    src: &RgbaImage,
    screen: Size,
    preview: Size,
    style: PlacementStyle,
) -> Vec<Pixel> {
    let image = Size::new(src.width(), src.height());
    let full = render(screen, screen_placement(image, screen, style), src);
    let k = screen.width as f64 / preview.width as f64;
    let mut out = Vec::with_capacity((preview.width * preview.height) as usize);
    for y in 0..preview.height {
        for x in 0..preview.width {
            let sx = ((x as f64 + 0.5) * k) as u32;
            let sy = ((y as f64 + 0.5) * k) as u32;
            out.push(decode(full.image().get_pixel(sx, sy)));
        }
    }
    out
}

fn direct_pixels(src: &RgbaImage, screen: Size, preview: Size, style: PlacementStyle) -> Vec<Pixel> {
    let image = Size::new(src.width(), src.height());
    let canvas = render(preview, direct(image, screen, preview, style), src);
    canvas.image().pixels().map(decode).collect()
}

fn compare_pixels(src: &RgbaImage, screen: Size, preview: Size, style: PlacementStyle) {
    let name = format!("{style:?} {}x{} on {screen} in {preview}", src.width(), src.height());
    let a = direct_pixels(src, screen, preview, style);
    let b = screen_first_pixels(src, screen, preview, style);

    let mut edge_mismatches = 0;
    for (i, (p, q)) in a.iter().zip(&b).enumerate() {
        match (p, q) {
            (Pixel::Source(x0, y0), Pixel::Source(x1, y1)) => {
                assert!(
                    x0.abs_diff(*x1) <= 1 && y0.abs_diff(*y1) <= 1,
                    "{name}: pixel {i}: direct {p:?} vs screen-first {q:?}"
                );
            }
            (Pixel::Fill, Pixel::Fill) => {}
            _ => edge_mismatches += 1,
        }
    }
    // Coverage may only differ along the placed rect's border.
    let perimeter = 2 * (preview.width + preview.height);
    assert!(
        edge_mismatches <= perimeter,
        "{name}: {edge_mismatches} coverage mismatches"
    );
}

#[test]
fn pixels_agree_for_every_screen_relative_style() {
    let screen = Size::new(384, 216);
    for (w, h) in [(48, 27), (64, 64), (120, 40), (30, 90), (200, 150)] {
        let src = tagged(w, h);
        for preview in [Size::new(192, 108), Size::new(96, 54)] {
            for style in RELATIVE {
                compare_pixels(&src, screen, preview, style);
            }
        }
    }
}

#[test]
fn reference_example_pixels() {
    // The 2:1 image letterboxed on a 16:9 screen: bars of 25 px top and
    // bottom in an 800×450 preview.
    let src = tagged(200, 100);
    let plan = direct(Size::new(200, 100), Size::new(1920, 1080), Size::new(800, 450), PlacementStyle::Scaled);
    let canvas = render(Size::new(800, 450), plan, &src);
    assert_eq!(decode(canvas.image().get_pixel(400, 24)), Pixel::Fill);
    assert_eq!(decode(canvas.image().get_pixel(0, 25)), Pixel::Source(0, 0));
    assert_eq!(decode(canvas.image().get_pixel(799, 424)), Pixel::Source(199, 99));
    assert_eq!(decode(canvas.image().get_pixel(400, 425)), Pixel::Fill);
}
