//! Configuration management for Notes.
//!
//! Parses `notes.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `storage.base_url` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Example
//!
//! ```toml
//! [storage]
//! base_url = "${NOTES_STORAGE_BASE_URL}"
//!
//! [markdown]
//! gfm = false
//! strikethrough = true
//!
//! [preview]
//! max_chars = 200
//! max_blocks = 2
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override storage base URL.
    pub storage_base_url: Option<String>,
    /// Override GFM extensions flag.
    pub gfm: Option<bool>,
    /// Override preview length.
    pub max_chars: Option<usize>,
    /// Override preview block count.
    pub max_blocks: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "notes.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image storage configuration.
    pub storage: StorageConfig,
    /// Markdown dialect configuration.
    pub markdown: MarkdownConfig,
    /// Preview extraction configuration.
    pub preview: PreviewConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Image storage configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base URL that `[img]` paths are resolved against.
    pub base_url: Option<String>,
}

/// Markdown dialect configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable GFM tables and task lists.
    pub gfm: bool,
    /// Enable `~~strikethrough~~`.
    pub strikethrough: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: false,
            strikethrough: true,
        }
    }
}

/// Preview extraction configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Maximum preview length in characters.
    pub max_chars: usize,
    /// Maximum number of leading blocks to draw text from.
    pub max_blocks: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_chars: 200,
            max_blocks: 2,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`storage.base_url`").
        field: String,
        /// Error message (e.g., "${`NOTES_STORAGE_BASE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `notes.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, taking precedence over config
    /// file values. The merged configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.storage_base_url {
            self.storage.base_url = Some(base_url.clone());
        }
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
        if let Some(max_chars) = settings.max_chars {
            self.preview.max_chars = max_chars;
        }
        if let Some(max_blocks) = settings.max_blocks {
            self.preview.max_blocks = max_blocks;
        }
    }

    /// Get the storage base URL, required for rendering image tags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `storage.base_url` is not set.
    pub fn require_storage_base_url(&self) -> Result<&str, ConfigError> {
        self.storage.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "storage.base_url is required (set it in notes.toml or pass --storage-base-url)"
                    .to_owned(),
            )
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_storage()?;
        self.validate_preview()?;
        Ok(())
    }

    /// Validate storage configuration.
    fn validate_storage(&self) -> Result<(), ConfigError> {
        // Only validate base_url if set; commands that render require it separately
        if let Some(ref base_url) = self.storage.base_url {
            require_non_empty(base_url, "storage.base_url")?;
            require_http_url(base_url, "storage.base_url")?;
        }
        Ok(())
    }

    /// Validate preview configuration.
    fn validate_preview(&self) -> Result<(), ConfigError> {
        if self.preview.max_chars == 0 {
            return Err(ConfigError::Validation(
                "preview.max_chars must be greater than 0".to_owned(),
            ));
        }
        if self.preview.max_blocks == 0 {
            return Err(ConfigError::Validation(
                "preview.max_blocks must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.storage.base_url {
            self.storage.base_url = Some(expand::expand_env(url, "storage.base_url")?);
        }
        Ok(())
    }
}
