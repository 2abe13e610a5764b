//! Tracing subscriber configuration.
//!
//! # Example
//!
//! ```
//! use mpi_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! // Development: pretty output with debug level
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Pretty)
//!     .init();
//!
//! // Production: JSON output, quiet HTTP stack
//! let prod = TracingConfig::default()
//!     .with_format(TracingFormat::Json)
//!     .with_env_filter("mpi_domain=info,hyper=warn,reqwest=warn");
//! # let _ = prod;
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "MPI_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "MPI_LOG_FORMAT";

/// How log lines are rendered, selected by [`LOG_FORMAT_ENV`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line, colored.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event.
    Json,
}

/// A format name other than `pretty`, `compact` or `json`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format `{0}`")]
pub struct UnknownFormat(pub String);

impl core::str::FromStr for TracingFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Subscriber settings: level, format, filter directives and span events.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    level: Level,
    format: TracingFormat,
    /// Filter directives (e.g. `mpi_domain=debug,hyper=warn`).
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LOG_ENV`] and [`LOG_FORMAT_ENV`].
    ///
    /// Unset variables keep the defaults; an unknown format is reported and
    /// ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_ENV).ok().as_deref(),
            std::env::var(LOG_FORMAT_ENV).ok().as_deref(),
        )
    }

    fn from_vars(filter: Option<&str>, format: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            config = config.with_env_filter(filter);
        }
        match format.map(str::parse::<TracingFormat>) {
            Some(Ok(format)) => config = config.with_format(format),
            Some(Err(err)) => tracing::warn!(error = %err, "ignoring {LOG_FORMAT_ENV}"),
            None => {}
        }
        config
    }

    /// Sets the maximum log level used when no filter is given.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets filter directives, `target=level,target=level,...`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer();
        match self.format {
            TracingFormat::Pretty => layer.pretty().with_span_events(span_events).boxed(),
            TracingFormat::Compact => layer.compact().with_span_events(span_events).boxed(),
            TracingFormat::Json => layer.json().with_span_events(span_events).boxed(),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init(&self) {
        let installed = tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.filter())
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(level = %self.level, format = ?self.format, "tracing initialized");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_pretty_info() {
        let config = TracingConfig::default();
        assert_eq!(config.level(), Level::INFO);
        assert_eq!(config.format(), TracingFormat::Pretty);
        assert!(config.env_filter.is_none());
        assert!(!config.span_events);
    }

    #[test]
    fn builders_set_fields() {
        let config = TracingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("mpi_domain=debug")
            .with_span_events(true);
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format(), TracingFormat::Json);
        assert_eq!(config.env_filter.as_deref(), Some("mpi_domain=debug"));
        assert!(config.span_events);
    }

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("JSON".parse(), Ok(TracingFormat::Json));
        assert_eq!(" compact ".parse(), Ok(TracingFormat::Compact));
        assert_eq!(
            "xml".parse::<TracingFormat>(),
            Err(UnknownFormat("xml".to_string()))
        );
    }

    #[test]
    fn env_values_override_defaults() {
        let config = TracingConfig::from_vars(Some("mpi_remote=trace"), Some("compact"));
        assert_eq!(config.env_filter.as_deref(), Some("mpi_remote=trace"));
        assert_eq!(config.format(), TracingFormat::Compact);

        let config = TracingConfig::from_vars(Some("  "), Some("yaml"));
        assert!(config.env_filter.is_none());
        assert_eq!(config.format(), TracingFormat::Pretty);
    }

    #[test]
    fn init_twice_is_harmless() {
        TracingConfig::default().init();
        TracingConfig::default().with_format(TracingFormat::Json).init();
    }
}
