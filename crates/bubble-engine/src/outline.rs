//! Outlined caption layers.
//!
//! A caption layer is drawn in two passes with identical gravity: a stroked
//! pass in the outline color, optionally blurred, then a crisp fill pass on
//! top. The fill pass is always the last operation on the canvas.

use image::RgbaImage;
use tracing::debug;

use crate::color::Color;
use crate::geometry::{Gravity, Size};
use crate::raster::{RasterOps, TextDraw};
use crate::{BubbleError, Result};

/// Anchor shared by both text passes.
pub const TEXT_GRAVITY: Gravity = Gravity::West;

/// How caption text is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub point_size: u32,
    pub fill: Color,
    pub outline: Color,
    /// Outline width as a fraction of the point size.
    pub outline_percentage: f32,
    /// Gaussian sigma for the outline pass; 0 disables blurring.
    pub blur: f32,
}

impl TextStyle {
    /// Stroke width in pixels for this style.
    pub fn outline_width(&self) -> u32 {
        outline_width(self.point_size, self.outline_percentage)
    }

    /// Extra pixels added on each axis so the stroke is not clipped.
    pub fn outline_allowance(&self) -> u32 {
        let allowance = (self.point_size as f32 * self.outline_percentage.max(0.0)).ceil();
        allowance as u32
    }
}

/// Stroke width: `max(1, ceil(point_size * outline_percentage))`.
pub fn outline_width(point_size: u32, outline_percentage: f32) -> u32 {
    let width = (point_size as f32 * outline_percentage.max(0.0)).ceil() as u32;
    width.max(1)
}

/// Renders caption text with an outline through a [`RasterOps`] backend.
pub struct OutlineTextRenderer<'r, R: RasterOps + ?Sized> {
    raster: &'r R,
}

impl<'r, R: RasterOps + ?Sized> OutlineTextRenderer<'r, R> {
    pub fn new(raster: &'r R) -> Self {
        Self { raster }
    }

    /// Natural size of the caption, before the outline allowance.
    pub fn measure(&self, caption: &str, style: &TextStyle) -> Result<Size> {
        self.raster
            .measure_text(caption, &style.font, style.point_size as f32)
    }

    /// Measure the caption and render it on a canvas expanded by the outline allowance.
    pub fn render(&self, caption: &str, style: &TextStyle) -> Result<RgbaImage> {
        let measured = self.measure(caption, style)?;
        let canvas = measured.expand(style.outline_allowance());
        self.render_on(caption, style, canvas)
    }

    /// Render the outlined caption on a transparent canvas of `canvas` size.
    pub fn render_on(&self, caption: &str, style: &TextStyle, canvas: Size) -> Result<RgbaImage> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(BubbleError::Render(format!(
                "text canvas {}x{} is empty",
                canvas.width, canvas.height
            )));
        }
        let stroke_width = style.outline_width();
        debug!(
            width = canvas.width,
            height = canvas.height,
            stroke_width,
            blur = style.blur,
            "Rendering outlined text"
        );

        let layer = RgbaImage::new(canvas.width, canvas.height);
        let outline_pass = TextDraw {
            text: caption,
            font: &style.font,
            point_size: style.point_size as f32,
            fill: &style.outline,
            stroke: Some((&style.outline, stroke_width)),
            gravity: TEXT_GRAVITY,
        };
        let mut layer = self.raster.draw_text(layer, &outline_pass)?;

        if style.blur > 0.0 {
            layer = self.raster.blur(layer, style.blur)?;
        }

        let fill_pass = TextDraw {
            fill: &style.fill,
            stroke: None,
            ..outline_pass
        };
        self.raster.draw_text(layer, &fill_pass)
    }
}
