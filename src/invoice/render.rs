//! Text rasterization onto the template canvas.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

use super::layout::Placement;
use super::GeneratorError;

pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID_LINE_COLOR: Rgb<u8> = Rgb([211, 211, 211]);
pub const GRID_LABEL_COLOR: Rgb<u8> = Rgb([128, 128, 128]);
pub const GRID_STEP: u32 = 50;
const LINE_SPACING: f32 = 1.2;

/// Searched when the configured font cannot be loaded.
pub const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font(path: &Path) -> Result<Font<'static>, GeneratorError> {
    let bytes = std::fs::read(path).map_err(|source| GeneratorError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| GeneratorError::FontParse(path.to_path_buf()))
}

/// Load `preferred`, falling back to the first usable system font.
pub fn load_font_with_fallback(preferred: &Path) -> Result<Font<'static>, GeneratorError> {
    match load_font(preferred) {
        Ok(font) => return Ok(font),
        Err(e) => log::warn!("Font loading failed: {}", e),
    }

    for candidate in FALLBACK_FONTS {
        if let Ok(font) = load_font(Path::new(candidate)) {
            log::info!("Using fallback font {}", candidate);
            return Ok(font);
        }
    }

    let mut tried: Vec<PathBuf> = vec![preferred.to_path_buf()];
    tried.extend(FALLBACK_FONTS.iter().map(PathBuf::from));
    Err(GeneratorError::NoFont(
        tried
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        pixel[i] = (color[i] as f32 * coverage + pixel[i] as f32 * (1.0 - coverage)).round() as u8;
    }
}

/// Draw `text` with its top-left corner at (x, y). Lines split on `\n`;
/// anything outside the canvas is clipped.
pub fn draw_text(
    canvas: &mut RgbImage,
    font: &Font<'_>,
    scale: Scale,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
) {
    let ascent = font.v_metrics(scale).ascent;
    let line_height = scale.y * LINE_SPACING;

    for (line_index, line) in text.lines().enumerate() {
        let baseline = y as f32 + ascent + line_index as f32 * line_height;
        for glyph in font.layout(line, scale, point(x as f32, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    blend(
                        canvas,
                        bb.min.x + gx as i32,
                        bb.min.y + gy as i32,
                        color,
                        coverage,
                    );
                });
            }
        }
    }
}

pub fn draw_placements(canvas: &mut RgbImage, font: &Font<'_>, scale: Scale, placements: &[Placement]) {
    for placement in placements {
        draw_text(
            canvas,
            font,
            scale,
            placement.x,
            placement.y,
            &placement.text,
            TEXT_COLOR,
        );
    }
}

pub fn draw_grid_lines(canvas: &mut RgbImage) {
    let (width, height) = canvas.dimensions();
    for x in (0..width).step_by(GRID_STEP as usize) {
        for y in 0..height {
            canvas.put_pixel(x, y, GRID_LINE_COLOR);
        }
    }
    for y in (0..height).step_by(GRID_STEP as usize) {
        for x in 0..width {
            canvas.put_pixel(x, y, GRID_LINE_COLOR);
        }
    }
}

/// Coordinate grid used when calibrating field positions on a new template.
pub fn draw_grid(canvas: &mut RgbImage, font: &Font<'_>, scale: Scale) {
    draw_grid_lines(canvas);
    let (width, height) = canvas.dimensions();
    for x in (0..width).step_by(GRID_STEP as usize) {
        draw_text(canvas, font, scale, x as i32 + 2, 2, &x.to_string(), GRID_LABEL_COLOR);
    }
    for y in (0..height).step_by(GRID_STEP as usize) {
        draw_text(canvas, font, scale, 2, y as i32 + 2, &y.to_string(), GRID_LABEL_COLOR);
    }
}
