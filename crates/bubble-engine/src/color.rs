//! Color parsing for ImageMagick-style color arguments.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::{BubbleError, Result};

/// A color together with the text it was parsed from.
///
/// The original text is kept so the subprocess backend can pass it through
/// unchanged. Colors only ImageMagick understands (X11 names such as
/// `grey50`) carry no RGBA value and cannot be used by in-process drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    rgba: Option<[u8; 4]>,
    spec: String,
}

impl Color {
    /// A color passed verbatim to an external tool without local resolution.
    pub fn tool_defined(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(BubbleError::InvalidColor(spec.to_string()));
        }
        Ok(Self {
            rgba: None,
            spec: spec.to_string(),
        })
    }

    /// RGBA value for in-process drawing.
    pub fn rgba(&self) -> Result<Rgba<u8>> {
        self.rgba
            .map(Rgba)
            .ok_or_else(|| BubbleError::InvalidColor(self.spec.clone()))
    }

    /// Text form accepted by ImageMagick.
    pub fn as_spec(&self) -> &str {
        &self.spec
    }
}

impl FromStr for Color {
    type Err = BubbleError;

    /// Parse CSS color syntax: named colors, hex, `rgb()`/`rgba()` with
    /// integer or percentage channels, `hsl()`, plus `none`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let rgba = if trimmed.eq_ignore_ascii_case("none") {
            [0, 0, 0, 0]
        } else {
            csscolorparser::parse(trimmed)
                .map_err(|_| BubbleError::InvalidColor(s.to_string()))?
                .to_rgba8()
        };

        Ok(Self {
            rgba: Some(rgba),
            spec: trimmed.to_string(),
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}
