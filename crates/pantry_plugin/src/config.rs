//! User configuration, delivered to plugins once it has loaded.
//!
//! Configuration is a JSON document. Every field is optional; missing fields
//! take their defaults.
//!
//! ```json
//! {
//!   "debug_mode": true,
//!   "recipe_order": "by_identity",
//!   "logging": { "level": "debug", "format": "compact" }
//! }
//! ```

use crate::catalog::RecipeOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not valid configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very verbose tracing.
    Trace,
    /// Debugging detail.
    Debug,
    /// Normal operation (default).
    #[default]
    Info,
    /// Recoverable problems.
    Warn,
    /// Failures.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Logging section of [`PantryConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Target-specific filter, e.g. `"pantry_plugin=debug,pantry_platform=warn"`.
    pub env_filter: Option<String>,
    /// Whether span enter/exit events are logged.
    pub span_events: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// PantryConfig
// ─────────────────────────────────────────────────────────────────────────────

/// The configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PantryConfig {
    /// Reports recipes that are skipped silently otherwise, such as smithing
    /// recipes the host marks unsupported.
    pub debug_mode: bool,
    /// Display order of recipes within a category.
    pub recipe_order: RecipeOrder,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// Loaded configuration, handed to [`Plugin::on_config_manager_available`].
///
/// [`Plugin::on_config_manager_available`]: crate::Plugin::on_config_manager_available
///
/// # Example
///
/// ```
/// use pantry_plugin::{ConfigManager, LogLevel, RecipeOrder};
///
/// let manager = ConfigManager::from_json_str(r#"{ "recipe_order": "by_identity" }"#).unwrap();
/// assert_eq!(manager.config().recipe_order, RecipeOrder::ByIdentity);
/// assert_eq!(manager.config().logging.level, LogLevel::Info);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigManager {
    config: PantryConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Wraps an in-memory configuration.
    #[must_use]
    pub fn new(config: PantryConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(manager)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PantryConfig {
        &self.config
    }

    /// Returns the file the configuration came from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let manager = ConfigManager::from_json_str("{}").unwrap();
        assert_eq!(manager.config(), &PantryConfig::default());
        assert_eq!(manager.config().recipe_order, RecipeOrder::Registration);
        assert_eq!(manager.config().logging.format, LogFormat::Pretty);
        assert!(manager.source().is_none());
    }

    #[test]
    fn partial_logging_section() {
        let manager = ConfigManager::from_json_str(
            r#"{ "debug_mode": true, "logging": { "format": "json", "span_events": true } }"#,
        )
        .unwrap();
        let config = manager.config();
        assert!(config.debug_mode);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.span_events);
    }

    #[test]
    fn mistyped_field_is_a_parse_error() {
        let err = ConfigManager::from_json_str(r#"{ "debug_mode": "yes" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ConfigManager::load("/nonexistent/pantry.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/pantry.json"));
    }

    #[test]
    fn load_remembers_source() {
        let path = std::env::temp_dir().join(format!("pantry-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "logging": { "level": "trace" } }"#).unwrap();

        let manager = ConfigManager::load(&path).unwrap();
        assert_eq!(manager.config().logging.level, LogLevel::Trace);
        assert_eq!(manager.source(), Some(path.as_path()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn level_converts_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
    }
}
