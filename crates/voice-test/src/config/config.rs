//! Configuration management for voice-test.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, BehaviourConfig, SubmitConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf, time::Duration};

use crate::config::{DEFAULT_CLOSE_DELAY_MS, DEFAULT_ENDPOINT_URL, DEFAULT_TIMEOUT_SECS};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Submission endpoint configuration.
    pub submit: SubmitConfig,
    /// Audio device configuration.
    pub audio: AudioConfig,
    /// Popup behavior settings.
    pub behaviour: BehaviourConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Note: This does NOT validate the endpoint URL. Call
    /// `validate_endpoint()` before relying on submissions, so the popup
    /// can open and collect a recording even before the endpoint is
    /// configured.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Validate that the submission endpoint URL is usable.
    ///
    /// Validation is lazy so the popup can start without a configured
    /// endpoint; the submission client re-checks at submit time.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate_endpoint(&self) -> AppResult<()> {
        let url = &self.submit.endpoint_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::ConfigError {
                reason: format!(
                    "Submission endpoint is not an http(s) URL: {:?}. Set [submit] endpoint_url in the config file.",
                    url
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Request timeout for the submission client.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.submit.timeout_secs)
    }

    /// Delay between the success confirmation and the popup closing.
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.behaviour.close_delay_ms)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "lingosubmit", "Voice-Test").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config {
            submit: SubmitConfig {
                endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            audio: AudioConfig {
                selected_device: None,
            },
            behaviour: BehaviourConfig {
                close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            },
        };

        config.save()?;

        Ok(config)
    }
}
