//! Glyph layout and rasterization for caption text.
//!
//! Captions may span several lines. Lines are laid out as one block placed
//! by gravity; each line is aligned horizontally by the same gravity.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use tracing::debug;

use crate::geometry::{Gravity, Size};

/// Coverage at or above this value counts as inside a glyph when stroking.
const STROKE_THRESHOLD: u8 = 128;

/// Pixel scale for a point size at 72 dpi, so one point maps to one pixel
/// of em height.
pub fn point_scale(font: &FontArc, point_size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(point_size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(point_size),
    }
}

/// Measure the pixel width of a single line at the given font and scale.
pub fn measure_text_width(font: &FontArc, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height(font: &FontArc, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Natural size of a (possibly multi-line) caption.
///
/// Never returns a zero extent so the result can back a real canvas.
pub fn measure_block(font: &FontArc, scale: PxScale, text: &str) -> Size {
    let lh = line_height(font, scale);
    let lines: Vec<&str> = text.lines().collect();
    let count = lines.len().max(1) as u32;
    let width = lines
        .iter()
        .map(|line| measure_text_width(font, scale, line))
        .max()
        .unwrap_or(0);
    Size::new(width.max(1), (lh * count).max(1))
}

/// Rasterize glyph coverage for `text` onto a mask of `canvas` size.
pub fn coverage_mask(
    font: &FontArc,
    scale: PxScale,
    text: &str,
    canvas: Size,
    gravity: Gravity,
) -> GrayImage {
    let mut mask = GrayImage::new(canvas.width, canvas.height);
    let scaled = font.as_scaled(scale);
    let lh = line_height(font, scale);
    let block = measure_block(font, scale, text);
    let (_, block_y) = gravity.place(canvas, block, (0, 0));

    for (i, line) in text.lines().enumerate() {
        let line_w = measure_text_width(font, scale, line);
        let (line_x, _) = gravity.place(canvas, Size::new(line_w, block.height), (0, 0));
        let baseline = block_y as f32 + (i as u32 * lh) as f32 + scaled.ascent();
        let mut caret = line_x as f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for ch in line.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev_glyph {
                caret += scaled.kern(prev, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = bounds.min.x as i64 + i64::from(px);
                    let y = bounds.min.y as i64 + i64::from(py);
                    if x < 0 || y < 0 || x >= i64::from(canvas.width) || y >= i64::from(canvas.height)
                    {
                        return;
                    }
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let pixel = mask.get_pixel_mut(x as u32, y as u32);
                    pixel.0[0] = pixel.0[0].max(value);
                });
            }
            caret += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
    }

    mask
}

/// Ring of pixels covered by a stroke of `width` pixels along the glyph edges.
///
/// Half the stroke lies outside the glyph and half inside, like a centred
/// path stroke.
pub fn stroke_band(mask: &GrayImage, width: u32) -> GrayImage {
    let radius = width.div_ceil(2).min(u32::from(u8::MAX)) as u8;
    let mut solid = mask.clone();
    for pixel in solid.pixels_mut() {
        pixel.0[0] = if pixel.0[0] >= STROKE_THRESHOLD { 255 } else { 0 };
    }

    let outer = dilate(&solid, Norm::L2, radius);
    let inner = erode(&solid, Norm::L2, radius);
    let mut band = GrayImage::new(mask.width(), mask.height());
    for (x, y, pixel) in band.enumerate_pixels_mut() {
        if outer.get_pixel(x, y).0[0] > 0 && inner.get_pixel(x, y).0[0] == 0 {
            *pixel = Luma([255]);
        }
    }
    band
}

/// Blend `color` onto `canvas` using `mask` as per-pixel coverage.
pub fn paint_mask(canvas: &mut RgbaImage, mask: &GrayImage, color: Rgba<u8>) {
    if color.0[3] == 0 {
        return;
    }
    for (x, y, coverage) in mask.enumerate_pixels() {
        let c = coverage.0[0];
        if c == 0 || x >= canvas.width() || y >= canvas.height() {
            continue;
        }
        let mut src = color;
        src.0[3] = ((u16::from(color.0[3]) * u16::from(c) + 127) / 255) as u8;
        canvas.get_pixel_mut(x, y).blend(&src);
    }
}

/// Draw filled and optionally stroked text onto an existing canvas.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontArc,
    scale: PxScale,
    text: &str,
    gravity: Gravity,
    fill: Rgba<u8>,
    stroke: Option<(Rgba<u8>, u32)>,
) {
    let size = Size::new(canvas.width(), canvas.height());
    let mask = coverage_mask(font, scale, text, size, gravity);
    paint_mask(canvas, &mask, fill);

    if let Some((stroke_color, width)) = stroke {
        if width > 0 && stroke_color.0[3] > 0 {
            debug!(width, "Stroking text outline");
            let band = stroke_band(&mask, width);
            paint_mask(canvas, &band, stroke_color);
        }
    }
}
