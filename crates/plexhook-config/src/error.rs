//! # Design
//!
//! - Configuration failures are always fatal and surface before any network call.
//! - Fields are named after the invoker setting so operators know what to fix.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating the invoker-supplied settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was absent or blank.
    #[error("required setting '{field}' is missing")]
    MissingSetting {
        /// Name of the missing setting.
        field: &'static str,
    },
    /// A setting was present but could not be interpreted.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Name of the offending setting.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when it is safe to echo.
        value: Option<String>,
    },
}

impl ConfigError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingSetting { field }
    }

    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: &str) -> Self {
        Self::InvalidField {
            field,
            reason,
            value: Some(value.to_string()),
        }
    }

    /// Name of the setting that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingSetting { field } | Self::InvalidField { field, .. } => field,
        }
    }
}
