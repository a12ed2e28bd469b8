//! Whole-image pixel filters: flat recolor and Gaussian blur.

use image::{Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

/// Replace the color of every visible pixel, keeping the alpha channel.
///
/// Equivalent to a 100% strength colorize: shape and translucency survive,
/// only the hue/brightness is forced to `color`.
pub fn colorize(img: &mut RgbaImage, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    debug!(width, height, ?color, "Applying flat recolor");

    for pixel in img.pixels_mut() {
        if pixel.0[3] > 0 {
            pixel.0[0] = color.0[0];
            pixel.0[1] = color.0[1];
            pixel.0[2] = color.0[2];
        }
    }
}

/// Gaussian blur with standard deviation `sigma`.
///
/// Color is premultiplied by alpha before blurring so fully transparent
/// neighbours fade the halo out instead of darkening it. A non-positive
/// sigma returns the image unchanged.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma > 0.0) {
        return img.clone();
    }
    let (width, height) = img.dimensions();
    debug!(width, height, sigma, "Applying Gaussian blur");

    let mut premultiplied = img.clone();
    for pixel in premultiplied.pixels_mut() {
        let a = u16::from(pixel.0[3]);
        for c in 0..3 {
            pixel.0[c] = ((u16::from(pixel.0[c]) * a + 127) / 255) as u8;
        }
    }

    let mut blurred = gaussian_blur_f32(&premultiplied, sigma);
    for pixel in blurred.pixels_mut() {
        let a = u32::from(pixel.0[3]);
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            pixel.0[c] = ((u32::from(pixel.0[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    blurred
}
