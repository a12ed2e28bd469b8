//! Layer placement and strip concatenation.

use image::RgbaImage;
use image::imageops;
use tracing::debug;

use crate::geometry::{Gravity, Size};

/// Overlay `top` onto `base` placed by `gravity` with a geometry offset.
///
/// `top` is alpha-composited over the base; parts falling outside the base
/// are clipped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, gravity: Gravity, offset: (i64, i64)) {
    let canvas = Size::new(base.width(), base.height());
    let layer = Size::new(top.width(), top.height());
    let (x, y) = gravity.place(canvas, layer, offset);
    debug!(x, y, ?gravity, "Overlaying layer");
    imageops::overlay(base, top, x, y);
}

/// Concatenate images horizontally (left to right).
///
/// All images are top-aligned. The output height equals the maximum height;
/// uncovered pixels stay transparent. Pixels are copied, not blended.
pub fn concat_horizontal(images: &[RgbaImage]) -> RgbaImage {
    let total_width: u32 = images.iter().map(|i| i.width()).sum();
    let max_height = images.iter().map(|i| i.height()).max().unwrap_or(0);

    let mut result = RgbaImage::new(total_width, max_height);
    let mut x_offset = 0i64;
    for img in images {
        if img.width() > 0 && img.height() > 0 {
            imageops::replace(&mut result, img, x_offset, 0);
        }
        x_offset += i64::from(img.width());
    }

    result
}

/// Concatenate images vertically (top to bottom).
///
/// All images are left-aligned. The output width equals the maximum width.
pub fn concat_vertical(images: &[RgbaImage]) -> RgbaImage {
    let max_width = images.iter().map(|i| i.width()).max().unwrap_or(0);
    let total_height: u32 = images.iter().map(|i| i.height()).sum();

    let mut result = RgbaImage::new(max_width, total_height);
    let mut y_offset = 0i64;
    for img in images {
        if img.width() > 0 && img.height() > 0 {
            imageops::replace(&mut result, img, 0, y_offset);
        }
        y_offset += i64::from(img.height());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn concat_vertical_sums_heights() {
        let result = concat_vertical(&[solid(100, 50, 1), solid(100, 30, 2)]);
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 80);
        assert_eq!(result.get_pixel(0, 49).0[0], 1);
        assert_eq!(result.get_pixel(0, 50).0[0], 2);
    }

    #[test]
    fn concat_vertical_uses_max_width() {
        let result = concat_vertical(&[solid(200, 50, 1), solid(100, 30, 2)]);
        assert_eq!(result.width(), 200);
        assert_eq!(result.get_pixel(150, 60).0, [0, 0, 0, 0]);
    }

    #[test]
    fn concat_horizontal_sums_widths() {
        let result = concat_horizontal(&[solid(10, 40, 1), solid(180, 40, 2), solid(10, 40, 3)]);
        assert_eq!(result.dimensions(), (200, 40));
        assert_eq!(result.get_pixel(9, 0).0[0], 1);
        assert_eq!(result.get_pixel(10, 0).0[0], 2);
        assert_eq!(result.get_pixel(190, 39).0[0], 3);
    }

    #[test]
    fn concat_horizontal_skips_empty_strips() {
        let result = concat_horizontal(&[solid(10, 10, 1), RgbaImage::new(0, 10), solid(10, 10, 3)]);
        assert_eq!(result.dimensions(), (20, 10));
        assert_eq!(result.get_pixel(10, 0).0[0], 3);
    }

    #[test]
    fn concat_copies_translucent_pixels_verbatim() {
        let strip = RgbaImage::from_pixel(2, 2, Rgba([9, 8, 7, 6]));
        let result = concat_horizontal(&[strip.clone(), strip]);
        assert!(result.pixels().all(|p| p.0 == [9, 8, 7, 6]));
    }

    #[test]
    fn overlay_centres_layer() {
        let mut base = solid(10, 10, 0);
        overlay(&mut base, &solid(2, 2, 200), Gravity::Center, (0, 0));
        assert_eq!(base.get_pixel(4, 4).0[0], 200);
        assert_eq!(base.get_pixel(5, 5).0[0], 200);
        assert_eq!(base.get_pixel(3, 3).0[0], 0);
    }

    #[test]
    fn overlay_does_not_panic_on_out_of_bounds() {
        let mut base = RgbaImage::new(100, 100);
        let top = RgbaImage::new(50, 50);
        overlay(&mut base, &top, Gravity::NorthWest, (80, 80)); // partially out of bounds
        overlay(&mut base, &top, Gravity::SouthWest, (-60, 200));
    }
}
