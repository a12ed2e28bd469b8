//! Argument and setting validation.
//!
//! Checks run before any rendering so a bad invocation fails with a single
//! diagnostic instead of a half-written batch.

use std::path::Path;

use bubble_engine::{Color, NineSliceSpec, Size};

use super::{Backend, ConfigError};
use super::defaults::{ENV_BACKEND, ENV_MAGICK};

/// Validate an environment setting. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        ENV_BACKEND => {
            if !["native", "magick", "imagemagick"].contains(&value.trim().to_ascii_lowercase().as_str()) {
                return Err("must be 'native' or 'magick'".into());
            }
        }
        ENV_MAGICK => {
            if value.trim().is_empty() {
                return Err("program name must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn validate_point_size(value: u32) -> Result<(), String> {
    if value == 0 {
        return Err("must be at least 1".into());
    }
    Ok(())
}

pub fn validate_outline_percentage(value: f32) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err("must be a finite number >= 0".into());
    }
    Ok(())
}

pub fn validate_blur(value: f32) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err("must be a finite number >= 0".into());
    }
    Ok(())
}

/// Parse a color argument, naming `key` in the error.
///
/// The ImageMagick backend resolves colors itself, so strings outside CSS
/// syntax are passed through to it unchanged.
pub fn parse_color(key: &str, value: &str, backend: Backend) -> Result<Color, ConfigError> {
    let invalid = |e: bubble_engine::BubbleError| ConfigError::invalid(key, e.to_string());
    match value.parse::<Color>() {
        Ok(color) => Ok(color),
        Err(_) if backend == Backend::Magick => Color::tool_defined(value).map_err(invalid),
        Err(e) => Err(invalid(e)),
    }
}

pub fn require_directory(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() || !path.is_dir() {
        return Err(ConfigError::MissingDirectory(path.to_path_buf()));
    }
    Ok(())
}

pub fn require_file(path: &Path) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    Ok(())
}

/// Check the cut lines against the template dimensions.
pub fn validate_slices(spec: &NineSliceSpec, template: Size) -> Result<(), ConfigError> {
    spec.validate(template)
        .map_err(|e| ConfigError::invalid("nine-slice cuts", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_setting() {
        assert!(validate_setting(ENV_BACKEND, "native").is_ok());
        assert!(validate_setting(ENV_BACKEND, "MAGICK").is_ok());
        assert!(validate_setting(ENV_BACKEND, "cairo").is_err());
        assert!(validate_setting(ENV_MAGICK, "convert").is_ok());
        assert!(validate_setting(ENV_MAGICK, "  ").is_err());
        assert!(validate_setting("UNKNOWN_KEY", "anything").is_ok());
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(validate_point_size(1).is_ok());
        assert!(validate_point_size(0).is_err());
        assert!(validate_outline_percentage(0.0).is_ok());
        assert!(validate_outline_percentage(0.07).is_ok());
        assert!(validate_outline_percentage(-0.1).is_err());
        assert!(validate_outline_percentage(f32::NAN).is_err());
        assert!(validate_blur(0.0).is_ok());
        assert!(validate_blur(-1.0).is_err());
        assert!(validate_blur(f32::INFINITY).is_err());
    }

    #[test]
    fn test_parse_color() {
        let white = parse_color("font_color", "#ffffff", Backend::Native).unwrap();
        assert_eq!(white.rgba().unwrap().0, [255, 255, 255, 255]);
        let dark = parse_color("font_color", "darkred", Backend::Native).unwrap();
        assert_eq!(dark.rgba().unwrap().0, [139, 0, 0, 255]);
        assert!(parse_color("color", "rgb(50%,0%,0%)", Backend::Native).is_ok());
        match parse_color("font_color", "not-a-color", Backend::Native) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "font_color"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_magick_backend_accepts_tool_colors() {
        let color = parse_color("outline_color", "grey50", Backend::Magick).unwrap();
        assert_eq!(color.as_spec(), "grey50");
        let css = parse_color("outline_color", "orangered", Backend::Magick).unwrap();
        assert_eq!(css.rgba().unwrap().0, [255, 69, 0, 255]);
        assert!(parse_color("outline_color", " ", Backend::Magick).is_err());
    }

    #[test]
    fn test_require_directory() {
        assert!(require_directory(&std::env::temp_dir()).is_ok());
        assert!(matches!(
            require_directory(Path::new("/definitely/not/a/dir")),
            Err(ConfigError::MissingDirectory(_))
        ));
        assert!(matches!(
            require_directory(Path::new("")),
            Err(ConfigError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_require_file_rejects_directory() {
        assert!(matches!(
            require_file(&std::env::temp_dir()),
            Err(ConfigError::MissingFile(_))
        ));
    }

    #[test]
    fn test_validate_slices() {
        let template = Size::new(100, 60);
        assert!(validate_slices(&NineSliceSpec::new(10, 10, 90, 50), template).is_ok());
        assert!(validate_slices(&NineSliceSpec::new(10, 10, 101, 50), template).is_err());
        assert!(validate_slices(&NineSliceSpec::new(50, 10, 50, 50), template).is_err());
    }
}
