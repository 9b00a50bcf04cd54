//! Per-invocation forwarding environment.

use crate::config::ForwarderConfig;

/// Values the handler reads for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardEnv {
    /// Upstream origin override. `None` or blank selects the default origin.
    pub target_url: Option<String>,
}

impl ForwardEnv {
    pub fn new(target_url: Option<String>) -> Self {
        Self { target_url }
    }

    /// Build from config, letting the process environment override the file.
    pub fn from_config(config: &ForwarderConfig) -> Self {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Like [`from_config`](Self::from_config) with an injectable variable lookup.
    pub fn from_config_with<F>(config: &ForwarderConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(&config.upstream.target_url_env)
            .filter(|v| !v.trim().is_empty());

        let from_file = Some(config.upstream.target_url.clone())
            .filter(|v| !v.trim().is_empty());

        Self {
            target_url: from_env.or(from_file),
        }
    }
}
