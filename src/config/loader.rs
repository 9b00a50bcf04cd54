//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::overrides::ConfigOverrides;
use crate::config::schema::ForwarderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ForwarderConfig, ConfigError> {
    load_config_with(path, &ConfigOverrides::default())
}

/// Load a TOML file, apply `overrides`, then validate the result.
pub fn load_config_with(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<ForwarderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ForwarderConfig = toml::from_str(&content)?;
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ForwarderConfig, ConfigError> {
    let config: ForwarderConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/edge-forwarder.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let result = parse_config("[upstream\ntarget_url = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn semantic_errors_are_joined() {
        let err = parse_config(
            r#"
            [listener]
            bind_address = "nope"

            [route]
            path_prefixes = ["v1"]
            "#,
        )
        .unwrap_err();

        let ConfigError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("\"nope\""));
        assert!(message.contains("\"v1\""));
    }

    #[test]
    fn loads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstream]
            target_url = "https://gateway.example.net"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.upstream.target_url, "https://gateway.example.net");
    }

    #[test]
    fn overrides_apply_before_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [upstream]
            target_url = "gateway-without-scheme"
            "#
        )
        .unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));

        let overrides = ConfigOverrides {
            target_url: Some("https://cli.example".into()),
            ..ConfigOverrides::default()
        };
        let config = load_config_with(file.path(), &overrides).unwrap();
        assert_eq!(config.upstream.target_url, "https://cli.example");
    }
}
