//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work. All problems are reported at once, not just the first.

use std::fmt;
use std::net::SocketAddr;
use crate::config::schema::SyncConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "reload.program").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.haproxy.config_path.file_name().is_none() {
        errors.push(ValidationError::new(
            "haproxy.config_path",
            format!("{:?} does not name a file", config.haproxy.config_path),
        ));
    }

    if config.reload.program.trim().is_empty() {
        errors.push(ValidationError::new("reload.program", "must not be empty"));
    }

    if config.reload.timeout_secs == 0 {
        errors.push(ValidationError::new("reload.timeout_secs", "must be greater than 0"));
    }

    if config.discovery.poll_interval_secs == 0 {
        errors.push(ValidationError::new("discovery.poll_interval_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
