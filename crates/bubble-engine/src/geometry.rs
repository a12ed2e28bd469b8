//! Sizes, rectangles, gravity placement and nine-slice cut geometry.

use crate::{BubbleError, Result};

/// Integer width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Grow both axes by the same number of pixels.
    pub fn expand(self, by: u32) -> Self {
        Self::new(self.width + by, self.height + by)
    }
}

/// Crop or paste region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Reference point used to place a layer on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    /// Top-left position of a `layer` placed on a `canvas` with a geometry offset.
    ///
    /// Offsets push away from the anchored edge: on east/south anchored axes a
    /// positive offset moves the layer left/up.
    pub fn place(self, canvas: Size, layer: Size, offset: (i64, i64)) -> (i64, i64) {
        let (cw, ch) = (i64::from(canvas.width), i64::from(canvas.height));
        let (lw, lh) = (i64::from(layer.width), i64::from(layer.height));
        let (dx, dy) = offset;

        let x = match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => dx,
            Gravity::North | Gravity::Center | Gravity::South => (cw - lw) / 2 + dx,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => cw - lw - dx,
        };
        let y = match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => dy,
            Gravity::West | Gravity::Center | Gravity::East => (ch - lh) / 2 + dy,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => ch - lh - dy,
        };
        (x, y)
    }

    /// Name understood by ImageMagick's `-gravity` option.
    pub fn magick_name(self) -> &'static str {
        match self {
            Gravity::NorthWest => "NorthWest",
            Gravity::North => "North",
            Gravity::NorthEast => "NorthEast",
            Gravity::West => "West",
            Gravity::Center => "Center",
            Gravity::East => "East",
            Gravity::SouthWest => "SouthWest",
            Gravity::South => "South",
            Gravity::SouthEast => "SouthEast",
        }
    }
}

/// Cut lines splitting a template into a 3x3 grid.
///
/// `left`/`right` are x coordinates and `top`/`bottom` y coordinates in the
/// template. Cells left of `left`, right of `right`, above `top` and below
/// `bottom` form the fixed border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NineSliceSpec {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// The nine source rectangles, row-major from the top-left cell.
pub type SliceGrid = [[Rect; 3]; 3];

impl NineSliceSpec {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Check `0 <= left < right <= W` and `0 <= top < bottom <= H`.
    pub fn validate(&self, template: Size) -> Result<()> {
        if self.left >= self.right || self.right > template.width {
            return Err(BubbleError::Geometry(format!(
                "horizontal cuts left={} right={} do not fit template width {}",
                self.left, self.right, template.width
            )));
        }
        if self.top >= self.bottom || self.bottom > template.height {
            return Err(BubbleError::Geometry(format!(
                "vertical cuts top={} bottom={} do not fit template height {}",
                self.top, self.bottom, template.height
            )));
        }
        Ok(())
    }

    /// Total width of the left and right border columns.
    pub fn fixed_width(&self, template: Size) -> u32 {
        self.left + (template.width - self.right)
    }

    /// Total height of the top and bottom border rows.
    pub fn fixed_height(&self, template: Size) -> u32 {
        self.top + (template.height - self.bottom)
    }

    /// Size of the stretched centre cell for a given output size.
    pub fn stretch_size(&self, template: Size, target: Size) -> Result<Size> {
        self.validate(template)?;
        let fixed_w = self.fixed_width(template);
        let fixed_h = self.fixed_height(template);
        if target.width < fixed_w || target.height < fixed_h {
            return Err(BubbleError::Geometry(format!(
                "target {}x{} is smaller than the fixed border {}x{}",
                target.width, target.height, fixed_w, fixed_h
            )));
        }
        Ok(Size::new(target.width - fixed_w, target.height - fixed_h))
    }

    /// Output size whose stretched centre is exactly `content`.
    pub fn framed_size(&self, template: Size, content: Size) -> Size {
        Size::new(
            content.width + self.fixed_width(template),
            content.height + self.fixed_height(template),
        )
    }

    /// Source rectangles for the nine cells.
    pub fn grid(&self, template: Size) -> SliceGrid {
        let xs = [
            (0, self.left),
            (self.left, self.right - self.left),
            (self.right, template.width - self.right),
        ];
        let ys = [
            (0, self.top),
            (self.top, self.bottom - self.top),
            (self.bottom, template.height - self.bottom),
        ];
        ys.map(|(y, h)| xs.map(|(x, w)| Rect::new(x, y, w, h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_center_places_layer_in_middle() {
        let pos = Gravity::Center.place(Size::new(100, 60), Size::new(20, 10), (0, 0));
        assert_eq!(pos, (40, 25));
    }

    #[test]
    fn test_gravity_southwest_offsets_from_bottom_left() {
        let pos = Gravity::SouthWest.place(Size::new(1920, 1080), Size::new(200, 100), (30, 40));
        assert_eq!(pos, (30, 1080 - 100 - 40));
    }

    #[test]
    fn test_gravity_west_centres_vertically() {
        let pos = Gravity::West.place(Size::new(50, 30), Size::new(40, 10), (0, 0));
        assert_eq!(pos, (0, 10));
    }

    #[test]
    fn test_gravity_southeast_moves_inward() {
        let pos = Gravity::SouthEast.place(Size::new(100, 100), Size::new(10, 10), (5, 5));
        assert_eq!(pos, (85, 85));
    }

    #[test]
    fn test_cut_validation() {
        let template = Size::new(100, 60);
        assert!(NineSliceSpec::new(10, 10, 90, 50).validate(template).is_ok());
        assert!(NineSliceSpec::new(0, 0, 100, 60).validate(template).is_ok());
        assert!(NineSliceSpec::new(50, 10, 50, 50).validate(template).is_err());
        assert!(NineSliceSpec::new(10, 10, 101, 50).validate(template).is_err());
        assert!(NineSliceSpec::new(10, 40, 90, 30).validate(template).is_err());
    }

    #[test]
    fn test_grid_cells_cover_template() {
        let template = Size::new(100, 60);
        let grid = NineSliceSpec::new(10, 10, 90, 50).grid(template);
        assert_eq!(grid[0][0], Rect::new(0, 0, 10, 10));
        assert_eq!(grid[0][1], Rect::new(10, 0, 80, 10));
        assert_eq!(grid[0][2], Rect::new(90, 0, 10, 10));
        assert_eq!(grid[1][0], Rect::new(0, 10, 10, 40));
        assert_eq!(grid[1][1], Rect::new(10, 10, 80, 40));
        assert_eq!(grid[2][2], Rect::new(90, 50, 10, 10));

        let area: u32 = grid.iter().flatten().map(|r| r.w * r.h).sum();
        assert_eq!(area, 100 * 60);
    }

    #[test]
    fn test_stretch_size_rejects_small_target() {
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let template = Size::new(100, 60);
        assert_eq!(
            spec.stretch_size(template, Size::new(200, 60)).unwrap(),
            Size::new(180, 40)
        );
        assert_eq!(
            spec.stretch_size(template, Size::new(20, 20)).unwrap(),
            Size::new(0, 0)
        );
        assert!(matches!(
            spec.stretch_size(template, Size::new(19, 60)),
            Err(BubbleError::Geometry(_))
        ));
    }

    #[test]
    fn test_framed_size_adds_border() {
        let spec = NineSliceSpec::new(10, 10, 90, 50);
        let size = spec.framed_size(Size::new(100, 60), Size::new(64, 32));
        assert_eq!(size, Size::new(84, 52));
    }
}
