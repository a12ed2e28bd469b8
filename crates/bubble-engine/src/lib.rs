//! Speech-bubble rendering engine.
//!
//! Measures and outlines caption text, stretches nine-slice border templates
//! to fit it, and composites the two into a bubble image. All raster work goes
//! through the [`RasterOps`] trait so the in-process backend and the
//! ImageMagick backend are interchangeable.

pub mod bubble;
pub mod color;
pub mod compose;
pub mod filter;
pub mod font;
pub mod geometry;
pub mod magick;
pub mod nine_slice;
pub mod outline;
pub mod raster;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use bubble::{BubbleJob, compose_bubble, render_bubble, render_bubble_image};
pub use color::Color;
pub use font::FontLibrary;
pub use geometry::{Gravity, NineSliceSpec, Rect, Size};
pub use image::RgbaImage;
pub use magick::MagickRaster;
pub use nine_slice::NineSliceCompositor;
pub use outline::{OutlineTextRenderer, TextStyle, outline_width};
pub use raster::{NativeRaster, RasterOps, TextDraw};

/// Width of the full-HD overlay canvas.
pub const FHD_WIDTH: u32 = 1920;

/// Height of the full-HD overlay canvas.
pub const FHD_HEIGHT: u32 = 1080;

/// Errors that can occur while rendering a bubble.
#[derive(Debug, thiserror::Error)]
pub enum BubbleError {
    #[error("Font '{0}' could not be resolved")]
    FontNotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("{program} exited with {status}: {stderr}")]
    ExternalTool {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to start {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bubble rendering operations.
pub type Result<T> = std::result::Result<T, BubbleError>;
