//! TOML Configuration File Support
//!
//! Centralized configuration loading for Dream Companion, supporting a TOML
//! configuration file at `~/.config/dream-companion/companion.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! request_timeout_secs = 60
//!
//! [models]
//! chat = "gemini-3-flash-preview"
//! image = "gemini-2.5-flash-image"
//!
//! [avatar]
//! aspect_ratio = "1:1"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::AspectRatio;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default conversational model
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";
/// Default image model
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// API section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// API root, without a trailing `/models`
    pub base_url: Option<String>,

    /// API key (usually left to `GEMINI_API_KEY`)
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Models section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsToml {
    /// Conversational model
    pub chat: Option<String>,

    /// Image generation model
    pub image: Option<String>,
}

/// Avatar section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarToml {
    /// Aspect ratio hint, e.g. `1:1`
    pub aspect_ratio: Option<AspectRatio>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionToml {
    /// API section
    pub api: ApiToml,

    /// Models section
    pub models: ModelsToml,

    /// Avatar section
    pub avatar: AvatarToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct CompanionConfig {
    /// API root
    pub base_url: String,

    /// API key, if any source provided one
    pub api_key: Option<String>,

    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,

    /// Conversational model
    pub chat_model: String,

    /// Image generation model
    pub image_model: String,

    /// Aspect ratio for avatar generation
    pub avatar_aspect_ratio: AspectRatio,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            avatar_aspect_ratio: AspectRatio::Square,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CompanionConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check values that would only fail later, at request time
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty model name or a
    /// base URL that is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "chat model name is empty".to_string(),
            ));
        }
        if self.image_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "image model name is empty".to_string(),
            ));
        }
        let url = self.base_url.trim();
        let has_scheme = url.starts_with("https://") || url.starts_with("http://");
        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.trim_matches('/').is_empty());
        if !has_scheme || !has_host {
            return Err(ConfigError::ValidationError(format!(
                "base URL '{url}' is not an http(s) URL"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/dream-companion/companion.toml` or
/// `~/.config/dream-companion/companion.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dream-companion").join("companion.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting values fail validation. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<CompanionConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CompanionConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment variables through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<CompanionConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CompanionConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CompanionToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CompanionConfig, toml: &CompanionToml) {
    if let Some(ref url) = toml.api.base_url {
        config.base_url = url.clone();
    }
    if toml.api.api_key.is_some() {
        config.api_key = toml.api.api_key.clone();
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.request_timeout = timeout_from_secs(secs);
    }

    if let Some(ref model) = toml.models.chat {
        config.chat_model = model.clone();
    }
    if let Some(ref model) = toml.models.image {
        config.image_model = model.clone();
    }

    if let Some(ratio) = toml.avatar.aspect_ratio {
        config.avatar_aspect_ratio = ratio;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut CompanionConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
        config.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Some(url) = non_empty("COMPANION_API_BASE") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = non_empty("COMPANION_CHAT_MODEL") {
        config.chat_model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = non_empty("COMPANION_IMAGE_MODEL") {
        config.image_model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = non_empty("COMPANION_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.trim().parse::<u64>() {
            config.request_timeout = timeout_from_secs(secs);
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %timeout, "Ignoring non-numeric COMPANION_REQUEST_TIMEOUT");
        }
    }
}

/// Zero means "no timeout"
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Conversational model override
    pub chat_model: Option<String>,

    /// Image model override
    pub image_model: Option<String>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chat model override
    #[must_use]
    pub fn with_chat_model(mut self, model: String) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Set image model override
    #[must_use]
    pub fn with_image_model(mut self, model: String) -> Self {
        self.image_model = Some(model);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut CompanionConfig) {
        if self.chat_model.is_some() || self.image_model.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref model) = self.chat_model {
            config.chat_model = model.clone();
        }

        if let Some(ref model) = self.image_model {
            config.image_model = model.clone();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
