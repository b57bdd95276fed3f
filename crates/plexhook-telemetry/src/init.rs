//! Telemetry initialisation primitives and logging configuration.
//!
//! # Design
//! - Centralises logging setup behind a single entry point.
//! - `RUST_LOG` always overrides the configured level.
//! - Output goes to stdout, where the downloader collects script messages.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};
use crate::format::NzbgetFormat;

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Tag written after the severity marker on every downloader-format line.
pub const LOG_PREFIX: &str = "PLEXHOOK";

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config.level);
    let installed = match config.format {
        LogFormat::Nzbget => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .event_format(NzbgetFormat::default()),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Nzbget,
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Bracketed severity lines parsed by the downloader.
    #[default]
    Nzbget,
    /// Emit human-readable logs.
    Pretty,
    /// Emit logs as structured JSON objects.
    Json,
}

impl LogFormat {
    /// Canonical name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nzbget => "nzbget",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nzbget" => Ok(Self::Nzbget),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(TelemetryError::UnknownFormat {
                value: value.to_string(),
            }),
        }
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_variants() -> Result<()> {
        assert_eq!("nzbget".parse::<LogFormat>()?, LogFormat::Nzbget);
        assert_eq!("Pretty".parse::<LogFormat>()?, LogFormat::Pretty);
        assert_eq!(" json ".parse::<LogFormat>()?, LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
        for format in [LogFormat::Nzbget, LogFormat::Pretty, LogFormat::Json] {
            assert_eq!(format.as_str().parse::<LogFormat>()?, format);
        }
        Ok(())
    }

    #[test]
    fn default_config_targets_downloader() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.format, LogFormat::Nzbget);
    }

    #[test]
    fn init_logging_installs_subscriber_once() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::SubscriberInstall { .. })
        ));
    }
}
