//! Exact (non-proportional) resizing used to stretch nine-slice cells.
//!
//! Uses Lanczos3 filtering. Zero-sized requests produce empty strips instead
//! of resampling so a cell can collapse when the target leaves it no room.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Resize to exactly `width` x `height`, ignoring aspect ratio.
///
/// Returns the image unchanged if it already has the requested size.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Image already at target size, skipping resize");
        return img.clone();
    }

    if width == 0 || height == 0 || orig_w == 0 || orig_h == 0 {
        debug!(orig_w, orig_h, width, height, "Degenerate resize, returning empty strip");
        return RgbaImage::new(width, height);
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Stretching image"
    );

    imageops::resize(img, width, height, FilterType::Lanczos3)
}
