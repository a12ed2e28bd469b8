//! Speech-bubble batch tool: configuration and rendering pipelines shared by
//! the `speech-bubble` binary.

pub mod config;
pub mod services;

pub use config::{AppConfig, Backend, ConfigError};
pub use services::batch::{BatchPipeline, BatchReport, BubbleSettings, JobFailure};
pub use services::fhd::{IconOverlay, OverlayPipeline};

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
