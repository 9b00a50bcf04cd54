//! Configuration validation.
//!
//! Serde handles syntax; this pass checks semantics. It is a pure function
//! over [`ForwarderConfig`] and reports every problem found, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ForwarderConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstream.target_url {value:?} is invalid: {reason}")]
    InvalidTargetUrl { value: String, reason: String },

    #[error("upstream.target_url_env must not be empty")]
    EmptyTargetUrlEnv,

    #[error("route.path_prefixes entry {0:?} must start with '/'")]
    InvalidPathPrefix(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let target = config.upstream.target_url.trim();
    if !target.is_empty() {
        if let Err(reason) = check_origin(target) {
            errors.push(ValidationError::InvalidTargetUrl {
                value: target.to_string(),
                reason,
            });
        }
    }

    if config.upstream.target_url_env.trim().is_empty() {
        errors.push(ValidationError::EmptyTargetUrlEnv);
    }

    for prefix in &config.route.path_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that an upstream origin is an absolute http(s) URL with a host.
pub fn check_origin(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
