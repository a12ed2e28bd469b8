//! Runtime configuration loaded from the environment, with CLI overrides.

use std::path::PathBuf;

use bubble_engine::magick::DEFAULT_PROGRAM;
use bubble_engine::{FontLibrary, MagickRaster, NativeRaster, RasterOps};

use super::defaults::{self, ENV_BACKEND, ENV_FONT_DIRS, ENV_MAGICK};
use super::validation::validate_setting;
use super::{Backend, ConfigError};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub magick_program: String,
    /// Font directories in search order.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Native,
            magick_program: DEFAULT_PROGRAM.into(),
            font_dirs: defaults::default_font_dirs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup; unset or empty keys keep defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let g = |key: &str| -> Result<Option<String>, ConfigError> {
            match get(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    validate_setting(key, &value).map_err(|reason| ConfigError::invalid(key, reason))?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        };

        let mut config = Self::default();
        if let Some(v) = g(ENV_BACKEND)? {
            config.backend = v.parse()?;
        }
        if let Some(v) = g(ENV_MAGICK)? {
            config.magick_program = v.trim().to_string();
        }
        if let Some(v) = g(ENV_FONT_DIRS)? {
            let mut dirs: Vec<PathBuf> = std::env::split_paths(&v).collect();
            dirs.append(&mut config.font_dirs);
            config.font_dirs = dirs;
        }

        tracing::debug!(
            backend = ?config.backend,
            magick = %config.magick_program,
            font_dirs = config.font_dirs.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Apply command-line overrides. Font directories given on the command
    /// line are searched before all others.
    pub fn with_overrides(mut self, backend: Option<Backend>, font_dirs: Vec<PathBuf>) -> Self {
        if let Some(backend) = backend {
            self.backend = backend;
        }
        if !font_dirs.is_empty() {
            let mut dirs = font_dirs;
            dirs.append(&mut self.font_dirs);
            self.font_dirs = dirs;
        }
        self
    }

    pub fn font_library(&self) -> FontLibrary {
        FontLibrary::new(self.font_dirs.clone())
    }

    /// Construct the configured raster backend.
    pub fn build_raster(&self) -> Box<dyn RasterOps> {
        match self.backend {
            Backend::Native => Box::new(NativeRaster::new(self.font_library())),
            Backend::Magick => Box::new(MagickRaster::new(self.magick_program.clone())),
        }
    }
}
