//! Full-HD overlay frames: an icon and a bubble frame placed on a transparent
//! 1920x1080 canvas, one output per bubble frame.

use std::path::{Path, PathBuf};

use bubble_engine::{FHD_HEIGHT, FHD_WIDTH, Gravity, RasterOps, RgbaImage};
use tracing::{debug, info};

use super::batch::BatchReport;
use crate::config::defaults::overlay_output_name;

/// Both layers are anchored to the bottom-left corner of the canvas.
const OVERLAY_GRAVITY: Gravity = Gravity::SouthWest;

/// Icon and frame placement for the overlay.
#[derive(Debug, Clone)]
pub struct IconOverlay {
    pub icon: PathBuf,
    /// Offset from the left edge and up from the bottom edge.
    pub icon_offset: (i64, i64),
    pub frame_offset: (i64, i64),
}

/// Sequential frame-to-overlay pipeline.
pub struct OverlayPipeline<'r, R: RasterOps + ?Sized> {
    raster: &'r R,
}

impl<'r, R: RasterOps + ?Sized> OverlayPipeline<'r, R> {
    pub fn new(raster: &'r R) -> Self {
        Self { raster }
    }

    /// Composite the icon and `frame` onto a transparent full-HD canvas.
    pub fn compose_frame(
        &self,
        icon: &RgbaImage,
        frame: &RgbaImage,
        overlay: &IconOverlay,
    ) -> bubble_engine::Result<RgbaImage> {
        let canvas = RgbaImage::new(FHD_WIDTH, FHD_HEIGHT);
        let canvas = self
            .raster
            .composite(icon, canvas, OVERLAY_GRAVITY, overlay.icon_offset)?;
        self.raster
            .composite(frame, canvas, OVERLAY_GRAVITY, overlay.frame_offset)
    }

    /// Overlay every `.png` under `frames_dir` and write `output_{name}` files
    /// into `output_dir`.
    ///
    /// The icon is loaded once; failing to load it aborts the run. Per-frame
    /// failures are recorded and the run continues.
    pub fn run(
        &self,
        overlay: &IconOverlay,
        frames_dir: &Path,
        output_dir: &Path,
    ) -> bubble_engine::Result<BatchReport> {
        let icon = self.raster.load(&overlay.icon)?;
        let frames = discover_frames(frames_dir)?;
        info!(
            count = frames.len(),
            frames_dir = %frames_dir.display(),
            output_dir = %output_dir.display(),
            "Starting overlay batch"
        );

        let mut report = BatchReport::default();
        for (index, frame_path) in frames.iter().enumerate() {
            let file_name = frame_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = output_dir.join(overlay_output_name(&file_name));
            debug!(index, frame = %frame_path.display(), "Overlaying frame");

            let result = self
                .raster
                .load(frame_path)
                .and_then(|frame| self.compose_frame(&icon, &frame, overlay))
                .and_then(|image| self.raster.save(&image, &output));
            report.record(index, output, result);
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "Overlay batch finished"
        );
        Ok(report)
    }
}

/// Collect `.png` files under `dir`.
///
/// Each directory's files come first in name order, followed by its
/// subdirectories in name order. Symlinked directories are not descended.
pub fn discover_frames(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            subdirs.push(path);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".png"))
        {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    for sub in subdirs {
        files.extend(discover_frames(&sub)?);
    }
    Ok(files)
}
