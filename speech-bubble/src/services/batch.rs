//! Caption batches: one bubble image per caption, numbered in input order.

use std::path::{Path, PathBuf};

use bubble_engine::{
    BubbleJob, Color, NineSliceSpec, RasterOps, RgbaImage, Size, TextStyle, render_bubble,
    render_bubble_image,
};
use tracing::{error, info};

use crate::config::defaults::caption_output_name;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written, in input order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<JobFailure>,
}

/// A job that failed; the batch moved on without writing its output.
#[derive(Debug)]
pub struct JobFailure {
    pub index: usize,
    pub output: PathBuf,
    pub error: String,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    pub(crate) fn record(&mut self, index: usize, output: PathBuf, result: bubble_engine::Result<()>) {
        match result {
            Ok(()) => {
                info!(index, output = %output.display(), "Job finished");
                self.written.push(output);
            }
            Err(e) => {
                error!(index, output = %output.display(), "Job failed: {e}");
                self.failures.push(JobFailure {
                    index,
                    output,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Bubble appearance shared by every job in a batch.
#[derive(Debug, Clone)]
pub struct BubbleSettings {
    pub style: TextStyle,
    pub template: PathBuf,
    pub slices: NineSliceSpec,
    pub recolor: Option<Color>,
}

impl BubbleSettings {
    /// Job for a single caption written to `output`.
    pub fn job(&self, caption: &str, output: PathBuf) -> BubbleJob {
        BubbleJob {
            caption: caption.to_string(),
            style: self.style.clone(),
            template: self.template.clone(),
            slices: self.slices,
            recolor: self.recolor.clone(),
            output,
        }
    }
}

/// Sequential caption-to-bubble pipeline.
pub struct BatchPipeline<'r, R: RasterOps + ?Sized> {
    raster: &'r R,
}

impl<'r, R: RasterOps + ?Sized> BatchPipeline<'r, R> {
    pub fn new(raster: &'r R) -> Self {
        Self { raster }
    }

    /// Render one bubble to `output`.
    pub fn render_one(
        &self,
        caption: &str,
        settings: &BubbleSettings,
        output: &Path,
    ) -> bubble_engine::Result<()> {
        render_bubble(self.raster, &settings.job(caption, output.to_path_buf()))
    }

    /// Render every caption into `output_dir` as `000.png`, `001.png`, ...
    ///
    /// The template is loaded and checked once; a failure there aborts the
    /// batch. Failures of individual captions are recorded and the batch
    /// continues.
    pub fn run_captions(
        &self,
        captions: &[String],
        settings: &BubbleSettings,
        output_dir: &Path,
    ) -> bubble_engine::Result<BatchReport> {
        let template = self.raster.load(&settings.template)?;
        settings
            .slices
            .validate(Size::new(template.width(), template.height()))?;
        info!(
            count = captions.len(),
            template = %settings.template.display(),
            output_dir = %output_dir.display(),
            "Starting caption batch"
        );

        let mut report = BatchReport::default();
        for (index, caption) in captions.iter().enumerate() {
            let output = output_dir.join(caption_output_name(index));
            let result = self.render_caption(caption, settings, &template, &output);
            report.record(index, output, result);
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "Caption batch finished"
        );
        Ok(report)
    }

    fn render_caption(
        &self,
        caption: &str,
        settings: &BubbleSettings,
        template: &RgbaImage,
        output: &Path,
    ) -> bubble_engine::Result<()> {
        let bubble = render_bubble_image(
            self.raster,
            caption,
            &settings.style,
            template,
            &settings.slices,
            settings.recolor.as_ref(),
        )?;
        self.raster.save(&bubble, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_engine::BubbleError;

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::default();
        report.record(0, PathBuf::from("000.png"), Ok(()));
        report.record(
            1,
            PathBuf::from("001.png"),
            Err(BubbleError::Render("boom".into())),
        );
        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].error, "Render error: boom");
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BatchReport::default().is_success());
    }
}
