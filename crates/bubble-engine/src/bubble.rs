//! Bubble assembly: text layer centred over a stretched background.

use std::path::PathBuf;

use image::RgbaImage;
use tracing::{debug, info};

use crate::Result;
use crate::color::Color;
use crate::geometry::{Gravity, NineSliceSpec, Size};
use crate::nine_slice::NineSliceCompositor;
use crate::outline::{OutlineTextRenderer, TextStyle};
use crate::raster::RasterOps;

/// Everything needed to render and persist one bubble.
#[derive(Debug, Clone)]
pub struct BubbleJob {
    pub caption: String,
    pub style: TextStyle,
    pub template: PathBuf,
    pub slices: NineSliceSpec,
    pub recolor: Option<Color>,
    pub output: PathBuf,
}

/// Composite `text_layer` centred over `background`.
///
/// The result has the background's size; neither input is scaled.
pub fn compose_bubble<R: RasterOps + ?Sized>(
    raster: &R,
    text_layer: &RgbaImage,
    background: RgbaImage,
) -> Result<RgbaImage> {
    raster.composite(text_layer, background, Gravity::Center, (0, 0))
}

/// Render a bubble image for `caption` on an already loaded template.
///
/// The background is sized so its stretched centre matches the text layer
/// and the template border frames it.
pub fn render_bubble_image<R: RasterOps + ?Sized>(
    raster: &R,
    caption: &str,
    style: &TextStyle,
    template: &RgbaImage,
    slices: &NineSliceSpec,
    recolor: Option<&Color>,
) -> Result<RgbaImage> {
    let text_layer = OutlineTextRenderer::new(raster).render(caption, style)?;
    let content = Size::new(text_layer.width(), text_layer.height());

    let source = Size::new(template.width(), template.height());
    slices.validate(source)?;
    let target = slices.framed_size(source, content);
    debug!(
        text_w = content.width,
        text_h = content.height,
        bubble_w = target.width,
        bubble_h = target.height,
        "Sized bubble background"
    );

    let background = NineSliceCompositor::new(raster).compose(template, slices, target, recolor)?;
    compose_bubble(raster, &text_layer, background)
}

/// Run one job end to end: load the template, render, and write the output.
pub fn render_bubble<R: RasterOps + ?Sized>(raster: &R, job: &BubbleJob) -> Result<()> {
    let template = raster.load(&job.template)?;
    let bubble = render_bubble_image(
        raster,
        &job.caption,
        &job.style,
        &template,
        &job.slices,
        job.recolor.as_ref(),
    )?;
    raster.save(&bubble, &job.output)?;
    info!(
        output = %job.output.display(),
        width = bubble.width(),
        height = bubble.height(),
        "Bubble written"
    );
    Ok(())
}
