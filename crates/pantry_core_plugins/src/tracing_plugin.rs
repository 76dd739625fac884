//! Tracing and logging plugin.
//!
//! Provides [`TracingPlugin`], which installs a `tracing` subscriber from the
//! `logging` section of the configuration.
//!
//! # Lifecycle
//!
//! - **`on_config_manager_available()`** installs the subscriber from the
//!   configured [`LoggingConfig`], with builder settings taking precedence.
//! - **`register_item_subtypes()`** installs it from builder settings alone
//!   when no configuration arrived before registration started.
//!
//! A process has one global subscriber; only the first installation wins.
//!
//! # Example
//!
//! ```
//! use pantry_core_plugins::TracingPlugin;
//! use pantry_plugin::{LogFormat, LogLevel, PluginHost};
//!
//! let mut host = PluginHost::new();
//! host.add_plugins(
//!     TracingPlugin::default()
//!         .with_level(LogLevel::Debug)
//!         .with_format(LogFormat::Compact),
//! );
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use pantry_model::Identifier;
use pantry_plugin::{ConfigManager, LogFormat, LogLevel, LoggingConfig, Plugin, SubtypeRegistration};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Tracing and logging plugin.
///
/// # Configuration Options
///
/// ```
/// use pantry_core_plugins::TracingPlugin;
/// use pantry_plugin::{LogFormat, LogLevel};
///
/// // Development: pretty output with span enter/exit
/// let dev_plugin = TracingPlugin::default()
///     .with_level(LogLevel::Debug)
///     .with_span_events(true);
///
/// // Production: JSON output for log aggregation
/// let prod_plugin = TracingPlugin::default()
///     .with_format(LogFormat::Json)
///     .with_env_filter("pantry_plugin=info,pantry_platform=warn");
/// ```
#[derive(Debug, Default)]
pub struct TracingPlugin {
    /// Maximum log level.
    level: Option<LogLevel>,
    /// Output format.
    format: Option<LogFormat>,
    /// Environment filter (e.g., "pantry_plugin=debug").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: Option<bool>,
    installed: AtomicBool,
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` that follows the configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level, overriding the configuration.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the output format, overriding the configuration.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets a target filter string, overriding the configuration.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output, overriding the configuration.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = Some(enabled);
        self
    }

    /// Merges builder settings over `configured`.
    #[must_use]
    pub fn settings(&self, configured: &LoggingConfig) -> LoggingConfig {
        LoggingConfig {
            level: self.level.unwrap_or(configured.level),
            format: self.format.unwrap_or(configured.format),
            env_filter: self
                .env_filter
                .clone()
                .or_else(|| configured.env_filter.clone()),
            span_events: self.span_events.unwrap_or(configured.span_events),
        }
    }

    /// Returns true once this plugin has installed (or tried to install) a subscriber.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    fn install(&self, settings: &LoggingConfig) {
        if self.installed.swap(true, Ordering::AcqRel) {
            return;
        }

        let level = tracing::Level::from(settings.level);
        let env_filter = match &settings.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
            }
            None => EnvFilter::new(level.as_str()),
        };
        let span_events = if settings.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init fails if a global subscriber is already set.
        match settings.format {
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::info!(
            level = %level,
            format = ?settings.format,
            "TracingPlugin initialized"
        );
    }
}

impl Plugin for TracingPlugin {
    fn uid(&self) -> Identifier {
        Identifier::from_static("pantry", "tracing")
    }

    fn register_item_subtypes(&self, _registration: &mut SubtypeRegistration<'_, '_>) {
        if !self.is_installed() {
            self.install(&self.settings(&LoggingConfig::default()));
        }
    }

    fn on_config_manager_available(&self, config: &ConfigManager) {
        self.install(&self.settings(&config.config().logging));
    }
}
