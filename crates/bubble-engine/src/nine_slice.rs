//! Nine-slice background synthesis.
//!
//! The template is cut into a 3x3 grid. Corners are copied as-is, edge cells
//! stretch along one axis, the centre stretches along both, and the cells are
//! reassembled row by row at the requested size.

use image::RgbaImage;
use tracing::debug;

use crate::Result;
use crate::color::Color;
use crate::geometry::{NineSliceSpec, Size};
use crate::raster::RasterOps;

/// Stretches a nine-slice template through a [`RasterOps`] backend.
pub struct NineSliceCompositor<'r, R: RasterOps + ?Sized> {
    raster: &'r R,
}

impl<'r, R: RasterOps + ?Sized> NineSliceCompositor<'r, R> {
    pub fn new(raster: &'r R) -> Self {
        Self { raster }
    }

    /// Build a background of exactly `target` size from `template`.
    ///
    /// Fails with a geometry error when the cut lines do not fit the template
    /// or the target is smaller than the fixed border.
    pub fn compose(
        &self,
        template: &RgbaImage,
        spec: &NineSliceSpec,
        target: Size,
        recolor: Option<&Color>,
    ) -> Result<RgbaImage> {
        let source = Size::new(template.width(), template.height());
        let stretch = spec.stretch_size(source, target)?;
        debug!(
            template_w = source.width,
            template_h = source.height,
            target_w = target.width,
            target_h = target.height,
            stretch_w = stretch.width,
            stretch_h = stretch.height,
            "Composing nine-slice background"
        );

        let grid = spec.grid(source);
        let mut bands = Vec::with_capacity(3);
        for (row, cells) in grid.iter().enumerate() {
            let mut strips = Vec::with_capacity(3);
            for (col, rect) in cells.iter().enumerate() {
                let cell = self.raster.crop(template, *rect)?;
                let width = if col == 1 { stretch.width } else { rect.w };
                let height = if row == 1 { stretch.height } else { rect.h };
                let cell = if (width, height) == (rect.w, rect.h) {
                    cell
                } else {
                    self.raster.resize(&cell, width, height)?
                };
                strips.push(cell);
            }
            bands.push(self.raster.concat_horizontal(&strips)?);
        }
        let background = self.raster.concat_vertical(&bands)?;

        match recolor {
            Some(color) => self.raster.colorize(background, color),
            None => Ok(background),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::BubbleError;
    use crate::geometry::Rect;
    use crate::outline::tests::FakeRaster;

    /// Template whose pixels encode their own coordinates, with alpha varying
    /// so the recolor tests can check the mask.
    fn create_template(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let alpha = if (x + y) % 7 == 0 { 0 } else { 100 + ((x * 3 + y) % 156) as u8 };
            Rgba([x as u8, y as u8, ((x * y) % 256) as u8, alpha])
        })
    }

    fn region(img: &RgbaImage, rect: Rect) -> Vec<Rgba<u8>> {
        let mut out = Vec::new();
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                out.push(*img.get_pixel(x, y));
            }
        }
        out
    }

    fn compose(template: &RgbaImage, spec: NineSliceSpec, target: Size) -> Result<RgbaImage> {
        let raster = FakeRaster::default();
        NineSliceCompositor::new(&raster).compose(template, &spec, target, None)
    }

    #[test]
    fn test_scenario_wide_target() {
        let template = create_template(100, 60);
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let out = compose(&template, spec, Size::new(200, 60)).unwrap();

        assert_eq!(out.dimensions(), (200, 60));

        // Corners are copied verbatim.
        assert_eq!(region(&out, Rect::new(0, 0, 10, 10)), region(&template, Rect::new(0, 0, 10, 10)));
        assert_eq!(
            region(&out, Rect::new(190, 0, 10, 10)),
            region(&template, Rect::new(90, 0, 10, 10))
        );
        assert_eq!(
            region(&out, Rect::new(0, 50, 10, 10)),
            region(&template, Rect::new(0, 50, 10, 10))
        );
        assert_eq!(
            region(&out, Rect::new(190, 50, 10, 10)),
            region(&template, Rect::new(90, 50, 10, 10))
        );

        // Height matches the template, so the left/right edges are not resampled.
        assert_eq!(
            region(&out, Rect::new(0, 10, 10, 40)),
            region(&template, Rect::new(0, 10, 10, 40))
        );
        assert_eq!(
            region(&out, Rect::new(190, 10, 10, 40)),
            region(&template, Rect::new(90, 10, 10, 40))
        );
    }

    #[test]
    fn test_dimensions_match_target_for_many_sizes() {
        let template = create_template(48, 32);
        let spec = NineSliceSpec::new(8, 6, 40, 24);
        let fixed = (8 + 8, 6 + 8);
        for (w, h) in [(16, 14), (17, 15), (48, 32), (120, 33), (300, 200), (16, 90)] {
            let out = compose(&template, spec, Size::new(w, h)).unwrap();
            assert_eq!(out.dimensions(), (w, h), "target {w}x{h}");
            assert!(w >= fixed.0 && h >= fixed.1);
        }
    }

    #[test]
    fn test_corners_identical_for_any_target() {
        let template = create_template(48, 32);
        let spec = NineSliceSpec::new(8, 6, 40, 24);
        for (w, h) in [(16, 14), (31, 77), (250, 40)] {
            let out = compose(&template, spec, Size::new(w, h)).unwrap();
            assert_eq!(region(&out, Rect::new(0, 0, 8, 6)), region(&template, Rect::new(0, 0, 8, 6)));
            assert_eq!(
                region(&out, Rect::new(w - 8, h - 8, 8, 8)),
                region(&template, Rect::new(40, 24, 8, 8))
            );
            assert_eq!(
                region(&out, Rect::new(w - 8, 0, 8, 6)),
                region(&template, Rect::new(40, 0, 8, 6))
            );
            assert_eq!(
                region(&out, Rect::new(0, h - 8, 8, 8)),
                region(&template, Rect::new(0, 24, 8, 8))
            );
        }
    }

    #[test]
    fn test_target_equal_to_border_collapses_centre() {
        let template = create_template(100, 60);
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let out = compose(&template, spec, Size::new(20, 20)).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(
            region(&out, Rect::new(10, 10, 10, 10)),
            region(&template, Rect::new(90, 50, 10, 10))
        );
    }

    #[test]
    fn test_cut_at_template_edge() {
        let template = create_template(40, 40);
        let spec = NineSliceSpec::new(0, 0, 40, 40);
        let out = compose(&template, spec, Size::new(80, 10)).unwrap();
        assert_eq!(out.dimensions(), (80, 10));
    }

    #[test]
    fn test_target_too_narrow_is_geometry_error() {
        let template = create_template(100, 60);
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let result = compose(&template, spec, Size::new(19, 60));
        assert!(matches!(result, Err(BubbleError::Geometry(_))));
    }

    #[test]
    fn test_target_too_short_is_geometry_error() {
        let template = create_template(100, 60);
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let result = compose(&template, spec, Size::new(200, 19));
        assert!(matches!(result, Err(BubbleError::Geometry(_))));
    }

    #[test]
    fn test_cuts_outside_template_are_geometry_error() {
        let template = create_template(100, 60);
        let spec = NineSliceSpec::new(10, 10, 120, 50);
        let result = compose(&template, spec, Size::new(200, 100));
        assert!(matches!(result, Err(BubbleError::Geometry(_))));
    }

    #[test]
    fn test_recolor_keeps_mask_and_sets_color() {
        let template = create_template(48, 32);
        let spec = NineSliceSpec::new(8, 6, 40, 24);
        let target = Size::new(100, 50);
        let raster = FakeRaster::default();
        let compositor = NineSliceCompositor::new(&raster);
        let color: Color = "#3366cc".parse().unwrap();

        let plain = compositor.compose(&template, &spec, target, None).unwrap();
        let tinted = compositor.compose(&template, &spec, target, Some(&color)).unwrap();

        assert_eq!(plain.dimensions(), tinted.dimensions());
        for (a, b) in plain.pixels().zip(tinted.pixels()) {
            assert_eq!(a.0[3], b.0[3]);
            if b.0[3] > 0 {
                assert_eq!(&b.0[..3], &[0x33, 0x66, 0xcc]);
            }
        }
    }
}
