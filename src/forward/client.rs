//! Upstream HTTP client.

use reqwest::redirect::Policy;

use crate::config::UpstreamConfig;
use crate::forward::error::ForwardError;

/// Build the client used for every upstream call.
///
/// Redirects are followed up to `max_redirects`. No timeout is set and no
/// decompression is enabled, so bodies pass through byte-for-byte.
pub fn build_client(config: &UpstreamConfig) -> Result<reqwest::Client, ForwardError> {
    let policy = if config.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(config.max_redirects)
    };

    let mut builder = reqwest::Client::builder().redirect(policy);
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }

    builder.build().map_err(ForwardError::Client)
}

/// True when a client built from `a` behaves like one built from `b`.
///
/// The target URL is not a client setting; it lives in `ForwardEnv`.
pub fn same_client_settings(a: &UpstreamConfig, b: &UpstreamConfig) -> bool {
    a.max_redirects == b.max_redirects && a.use_system_proxy == b.use_system_proxy
}
