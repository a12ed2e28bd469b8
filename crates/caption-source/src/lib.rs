//! Caption sources for batch bubble rendering.
//!
//! Reads subtitle files (SRT or WebVTT) and yields the cue texts in file
//! order. Timing is parsed and validated but only the text drives rendering.

pub mod subtitles;

use std::path::{Path, PathBuf};

pub use subtitles::{Cue, SubtitleFormat, parse_srt, parse_vtt};

/// Errors that can occur while reading captions.
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type alias for caption operations.
pub type Result<T> = std::result::Result<T, CaptionError>;

/// Load all cues from a subtitle file, choosing the format by extension.
pub fn load_cues(path: &Path) -> Result<Vec<Cue>> {
    let bytes = std::fs::read(path).map_err(|source| CaptionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| CaptionError::Encoding {
        path: path.to_path_buf(),
    })?;

    let format = SubtitleFormat::from_path(path);
    let cues = match format {
        SubtitleFormat::Srt => parse_srt(&content)?,
        SubtitleFormat::Vtt => parse_vtt(&content)?,
    };
    tracing::info!(path = %path.display(), ?format, count = cues.len(), "Captions loaded");
    Ok(cues)
}

/// Load the caption texts of a subtitle file, one per cue, in order.
pub fn load_captions(path: &Path) -> Result<Vec<String>> {
    Ok(load_cues(path)?.into_iter().map(|cue| cue.text).collect())
}
