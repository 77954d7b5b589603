//! Deployment configuration.
//!
//! Read from `config.yaml` in the working directory with `SOLOCAST_*`
//! environment variable overrides (`SOLOCAST_PORT`, `SOLOCAST_PASSWORD`,
//! `SOLOCAST_VIDEO_PATH`). Each deployment serves exactly one media file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration load failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared password gating the whole deployment.
    #[serde(default = "default_password")]
    pub password: String,

    /// Path of the single media file served.
    #[serde(default)]
    pub video_path: String,
}

fn default_port() -> u16 {
    3000
}

fn default_password() -> String {
    "password".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            password: default_password(),
            video_path: String::new(),
        }
    }
}

impl AppConfig {
    /// Load `./config.yaml`, falling back to defaults when it is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load a specific configuration file, with environment overrides.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::File::new(path, config::FileFormat::Yaml).required(false),
            )
            .add_source(config::Environment::with_prefix("SOLOCAST"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// Confirm the configured media resource exists and is a regular file.
///
/// The error string is shown to authenticated clients as `details`, so it
/// stays a deployment diagnostic, not an internal error dump.
pub async fn check_media_file(path: &str) -> Result<&Path, String> {
    if path.is_empty() {
        return Err("Video path not configured in config.yaml".to_string());
    }
    let resolved = Path::new(path);
    let metadata = tokio::fs::metadata(resolved)
        .await
        .map_err(|_| format!("Video file not found at path: {path}"))?;
    if !metadata.is_file() {
        return Err(format!("Path exists but is not a file: {path}"));
    }
    Ok(resolved)
}
