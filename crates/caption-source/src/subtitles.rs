//! Subtitle parsing in SRT and VTT formats.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{CaptionError, Result};

static RE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(\d+):)?(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(?:(\d+):)?(\d{2}):(\d{2})[,.](\d{3})(?:\s.*)?$",
    )
    .unwrap()
});

/// A single timed caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Position in the file, starting at 1.
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Cue text; multi-line cues are joined with `\n`.
    pub text: String,
}

/// Supported subtitle file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Pick the format from the file extension, defaulting to SRT.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("vtt") => SubtitleFormat::Vtt,
            _ => SubtitleFormat::Srt,
        }
    }
}

/// Parse SRT content into cues.
///
/// Blocks are separated by blank lines; each has an optional numeric index,
/// a `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line, and text lines.
pub fn parse_srt(content: &str) -> Result<Vec<Cue>> {
    let lines = numbered_lines(content);
    let mut cues = Vec::new();

    for block in blocks(&lines) {
        let (first_no, first) = block[0];
        let timing_at = if RE_TIMING.is_match(first) {
            0
        } else if first.trim().parse::<u64>().is_ok() {
            1
        } else {
            return Err(parse_error(first_no, format!("expected cue index, found '{first}'")));
        };

        let (timing_no, timing) = *block
            .get(timing_at)
            .ok_or_else(|| parse_error(first_no, "cue has no timing line"))?;
        let (start_ms, end_ms) = parse_timing(timing_no, timing)?;

        cues.push(Cue {
            index: cues.len() + 1,
            start_ms,
            end_ms,
            text: join_text(&block[timing_at + 1..]),
        });
    }

    Ok(cues)
}

/// Parse WebVTT content into cues.
///
/// `NOTE`, `STYLE` and `REGION` blocks are skipped; cue identifiers are
/// optional.
pub fn parse_vtt(content: &str) -> Result<Vec<Cue>> {
    let lines = numbered_lines(content);
    let mut all_blocks = blocks(&lines).into_iter();

    match all_blocks.next() {
        Some(header) if header[0].1.starts_with("WEBVTT") => {}
        Some(header) => return Err(parse_error(header[0].0, "missing WEBVTT header")),
        None => return Err(parse_error(1, "missing WEBVTT header")),
    }

    let mut cues = Vec::new();
    for block in all_blocks {
        let (first_no, first) = block[0];
        if ["NOTE", "STYLE", "REGION"]
            .iter()
            .any(|kw| first == *kw || first.starts_with(&format!("{kw} ")))
        {
            continue;
        }

        let timing_at = if first.contains("-->") { 0 } else { 1 };
        let (timing_no, timing) = *block
            .get(timing_at)
            .ok_or_else(|| parse_error(first_no, "cue has no timing line"))?;
        let (start_ms, end_ms) = parse_timing(timing_no, timing)?;

        cues.push(Cue {
            index: cues.len() + 1,
            start_ms,
            end_ms,
            text: join_text(&block[timing_at + 1..]),
        });
    }

    Ok(cues)
}

/// Lines with their 1-based line numbers, BOM stripped.
fn numbered_lines(content: &str) -> Vec<(usize, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end()))
        .collect()
}

/// Split lines into runs of non-blank lines.
fn blocks<'a>(lines: &'a [(usize, &'a str)]) -> Vec<&'a [(usize, &'a str)]> {
    lines
        .split(|(_, line)| line.trim().is_empty())
        .filter(|block| !block.is_empty())
        .collect()
}

fn join_text(lines: &[(usize, &str)]) -> String {
    lines
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_timing(line_no: usize, line: &str) -> Result<(u64, u64)> {
    let caps = RE_TIMING
        .captures(line.trim())
        .ok_or_else(|| parse_error(line_no, format!("invalid timing line '{line}'")))?;

    let field = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let start = to_millis(field(1), field(2), field(3), field(4));
    let end = to_millis(field(5), field(6), field(7), field(8));

    if field(3) >= 60 || field(7) >= 60 || field(2) >= 60 || field(6) >= 60 {
        return Err(parse_error(line_no, format!("timestamp out of range in '{line}'")));
    }
    if end < start {
        return Err(parse_error(line_no, format!("cue ends before it starts in '{line}'")));
    }
    Ok((start, end))
}

fn to_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> u64 {
    ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis
}

fn parse_error(line: usize, message: impl Into<String>) -> CaptionError {
    CaptionError::Parse {
        line,
        message: message.into(),
    }
}
