//! Configuration management: defaults, validation, loading from environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

use std::path::PathBuf;
use std::str::FromStr;

pub use app_config::AppConfig;

/// Errors detected before any rendering starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Does not exist directory. : {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Does not exist file. : {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Raster backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// In-process rendering with `ab_glyph` and `imageproc`.
    #[default]
    Native,
    /// ImageMagick subprocess.
    Magick,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Backend::Native),
            "magick" | "imagemagick" => Ok(Backend::Magick),
            _ => Err(ConfigError::invalid(
                defaults::ENV_BACKEND,
                "must be 'native' or 'magick'",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("native".parse::<Backend>().unwrap(), Backend::Native);
        assert_eq!(" Magick ".parse::<Backend>().unwrap(), Backend::Magick);
        assert_eq!("imagemagick".parse::<Backend>().unwrap(), Backend::Magick);
        assert!("gpu".parse::<Backend>().is_err());
    }

    #[test]
    fn test_missing_directory_message() {
        let err = ConfigError::MissingDirectory(PathBuf::from("out"));
        assert_eq!(err.to_string(), "Does not exist directory. : out");
    }
}
