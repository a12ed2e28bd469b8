//! The raster toolchain seam.
//!
//! [`RasterOps`] lists every primitive the bubble pipeline needs. Default
//! method bodies run in-process on `image`/`imageproc`; backends override
//! the operations they delegate elsewhere.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::color::Color;
use crate::font::FontLibrary;
use crate::geometry::{Gravity, Rect, Size};
use crate::{BubbleError, Result, compose, filter, resize, text};

/// One text drawing call.
#[derive(Debug, Clone, Copy)]
pub struct TextDraw<'a> {
    pub text: &'a str,
    pub font: &'a str,
    pub point_size: f32,
    pub fill: &'a Color,
    /// Stroke color and width in pixels; `None` draws no stroke.
    pub stroke: Option<(&'a Color, u32)>,
    pub gravity: Gravity,
}

/// Primitive raster and text operations.
pub trait RasterOps {
    /// Natural size of `text` rendered on a transparent background.
    fn measure_text(&self, text: &str, font: &str, point_size: f32) -> Result<Size>;

    /// Draw text onto `canvas` and return the result.
    fn draw_text(&self, canvas: RgbaImage, draw: &TextDraw<'_>) -> Result<RgbaImage>;

    /// Gaussian blur of the whole canvas.
    fn blur(&self, canvas: RgbaImage, sigma: f32) -> Result<RgbaImage> {
        Ok(filter::gaussian_blur(&canvas, sigma))
    }

    fn crop(&self, image: &RgbaImage, rect: Rect) -> Result<RgbaImage> {
        let fits_x = u64::from(rect.x) + u64::from(rect.w) <= u64::from(image.width());
        let fits_y = u64::from(rect.y) + u64::from(rect.h) <= u64::from(image.height());
        if !fits_x || !fits_y {
            return Err(BubbleError::Geometry(format!(
                "crop {rect:?} exceeds image {}x{}",
                image.width(),
                image.height()
            )));
        }
        if rect.is_empty() {
            return Ok(RgbaImage::new(rect.w, rect.h));
        }
        Ok(image::imageops::crop_imm(image, rect.x, rect.y, rect.w, rect.h).to_image())
    }

    /// Resize to exactly `width` x `height`.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
        Ok(resize::resize_exact(image, width, height))
    }

    fn concat_horizontal(&self, images: &[RgbaImage]) -> Result<RgbaImage> {
        Ok(compose::concat_horizontal(images))
    }

    fn concat_vertical(&self, images: &[RgbaImage]) -> Result<RgbaImage> {
        Ok(compose::concat_vertical(images))
    }

    /// Full-strength colorize preserving alpha.
    fn colorize(&self, mut image: RgbaImage, color: &Color) -> Result<RgbaImage> {
        filter::colorize(&mut image, color.rgba()?);
        Ok(image)
    }

    /// Composite `foreground` over `background` placed by gravity and offset.
    fn composite(
        &self,
        foreground: &RgbaImage,
        mut background: RgbaImage,
        gravity: Gravity,
        offset: (i64, i64),
    ) -> Result<RgbaImage> {
        compose::overlay(&mut background, foreground, gravity, offset);
        Ok(background)
    }

    /// Dimensions of an image file, read from its header.
    fn image_size(&self, path: &Path) -> Result<Size> {
        let (width, height) = image::image_dimensions(path)?;
        Ok(Size::new(width, height))
    }

    fn load(&self, path: &Path) -> Result<RgbaImage> {
        Ok(image::open(path)?.to_rgba8())
    }

    /// Write `image` as PNG.
    ///
    /// Data goes to a sibling `.part` file first and is renamed into place,
    /// so a failed write never leaves a truncated image at `path`.
    fn save(&self, image: &RgbaImage, path: &Path) -> Result<()> {
        let partial = partial_path(path);
        if let Err(e) = image.save_with_format(&partial, ImageFormat::Png) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, path)?;
        debug!(path = %path.display(), "Image written");
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// In-process backend: glyphs via `ab_glyph`, pixels via `image`/`imageproc`.
#[derive(Clone, Default)]
pub struct NativeRaster {
    fonts: FontLibrary,
}

impl NativeRaster {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }
}

impl RasterOps for NativeRaster {
    fn measure_text(&self, caption: &str, font: &str, point_size: f32) -> Result<Size> {
        let face = self.fonts.load(font)?;
        let scale = text::point_scale(&face, point_size);
        let size = text::measure_block(&face, scale, caption);
        debug!(font, point_size, width = size.width, height = size.height, "Measured text");
        Ok(size)
    }

    fn draw_text(&self, mut canvas: RgbaImage, draw: &TextDraw<'_>) -> Result<RgbaImage> {
        let face = self.fonts.load(draw.font)?;
        let scale = text::point_scale(&face, draw.point_size);
        let stroke = match draw.stroke {
            Some((color, width)) => Some((color.rgba()?, width)),
            None => None,
        };
        text::draw_text(
            &mut canvas,
            &face,
            scale,
            draw.text,
            draw.gravity,
            draw.fill.rgba()?,
            stroke,
        );
        Ok(canvas)
    }
}
