//! Command-line overrides layered over the config file.
//!
//! Applied on every load, including hot reloads, so a flag keeps winning
//! over whatever the file says.

use crate::config::schema::ForwarderConfig;

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub target_url: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ForwarderConfig) {
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
        if let Some(target_url) = &self.target_url {
            config.upstream.target_url = target_url.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
