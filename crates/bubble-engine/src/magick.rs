//! ImageMagick subprocess backend.
//!
//! Images travel as PNG over stdin/stdout, so concurrent jobs never share
//! scratch files. A non-zero exit status is reported as
//! [`BubbleError::ExternalTool`]. Crop, concatenation and compositing are
//! exact pixel copies and stay in-process.

use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::color::Color;
use crate::geometry::Size;
use crate::raster::{RasterOps, TextDraw};
use crate::{BubbleError, Result};

/// Default ImageMagick 7 entry point.
pub const DEFAULT_PROGRAM: &str = "magick";

/// Output specifier forcing 8-bit RGBA PNG on stdout.
const PNG_OUT: &str = "png32:-";
const PNG_IN: &str = "png:-";

/// Backend delegating text and resampling work to ImageMagick.
#[derive(Debug, Clone)]
pub struct MagickRaster {
    program: String,
}

impl Default for MagickRaster {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl MagickRaster {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run ImageMagick with `args`, feeding `input` as PNG on stdin, and
    /// decode the PNG it writes to stdout.
    fn run(&self, args: &[String], input: Option<&RgbaImage>) -> Result<RgbaImage> {
        debug!(command = %format_command(&self.program, args), "Running ImageMagick");

        let payload = match input {
            Some(img) => {
                let mut bytes = Vec::new();
                img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
                Some(bytes)
            }
            None => None,
        };

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if payload.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BubbleError::ToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let output = std::thread::scope(|s| {
            let writer = match (stdin, payload.as_deref()) {
                (Some(mut stdin), Some(bytes)) => Some(s.spawn(move || stdin.write_all(bytes))),
                _ => None,
            };
            let output = child.wait_with_output();
            if let Some(Ok(Err(e))) = writer.map(|w| w.join()) {
                debug!(program = %self.program, "Writing image to stdin failed: {e}");
            }
            output
        })?;

        if !output.status.success() {
            return Err(BubbleError::ExternalTool {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let img = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)?;
        Ok(img.to_rgba8())
    }
}

impl RasterOps for MagickRaster {
    fn measure_text(&self, text: &str, font: &str, point_size: f32) -> Result<Size> {
        let label = self.run(&measure_args(text, font, point_size), None)?;
        Ok(Size::new(label.width(), label.height()))
    }

    fn draw_text(&self, canvas: RgbaImage, draw: &TextDraw<'_>) -> Result<RgbaImage> {
        self.run(&annotate_args(draw), Some(&canvas))
    }

    fn blur(&self, canvas: RgbaImage, sigma: f32) -> Result<RgbaImage> {
        if !(sigma > 0.0) {
            return Ok(canvas);
        }
        self.run(&blur_args(sigma), Some(&canvas))
    }

    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return Ok(RgbaImage::new(width, height));
        }
        if image.dimensions() == (width, height) {
            return Ok(image.clone());
        }
        self.run(&resize_args(width, height), Some(image))
    }

    fn colorize(&self, image: RgbaImage, color: &Color) -> Result<RgbaImage> {
        self.run(&colorize_args(color), Some(&image))
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Render `text` as a label on a transparent background; its size is the measurement.
fn measure_args(text: &str, font: &str, point_size: f32) -> Vec<String> {
    let mut args = strings(&["-background", "none", "-font", font, "-pointsize"]);
    args.push(point_size.to_string());
    args.push(format!("label:{}", escape_text(text)));
    args.push(PNG_OUT.to_string());
    args
}

/// Annotate the canvas read from stdin.
fn annotate_args(draw: &TextDraw<'_>) -> Vec<String> {
    let mut args = strings(&[PNG_IN, "-font", draw.font, "-pointsize"]);
    args.push(draw.point_size.to_string());
    args.extend(strings(&["-fill", draw.fill.as_spec(), "-stroke"]));
    match draw.stroke {
        Some((color, width)) if width > 0 => {
            args.push(color.as_spec().to_string());
            args.push("-strokewidth".to_string());
            args.push(width.to_string());
        }
        _ => args.push("none".to_string()),
    }
    args.extend(strings(&["-gravity", draw.gravity.magick_name(), "-annotate", "0"]));
    args.push(escape_text(draw.text));
    args.push(PNG_OUT.to_string());
    args
}

fn blur_args(sigma: f32) -> Vec<String> {
    vec![
        PNG_IN.to_string(),
        "-gaussian-blur".to_string(),
        format!("0x{sigma}"),
        PNG_OUT.to_string(),
    ]
}

fn resize_args(width: u32, height: u32) -> Vec<String> {
    vec![
        PNG_IN.to_string(),
        "-resize".to_string(),
        format!("{width}x{height}!"),
        PNG_OUT.to_string(),
    ]
}

fn colorize_args(color: &Color) -> Vec<String> {
    strings(&[PNG_IN, "-fill", color.as_spec(), "-colorize", "100%", PNG_OUT])
}

/// Escape text so ImageMagick draws it literally.
///
/// `%` starts a property escape, `\` an escape sequence, and a leading `@`
/// would read the text from a file.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    if text.starts_with('@') {
        out.push('\\');
    }
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("%%"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shell-like rendering of a command line for logs.
fn format_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains(['(', ')']) {
            parts.push(format!("'{}'", arg.replace('\'', "'\\''")));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}
