//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → ForwardEnv derived per load (env var override applied)
//!
//! On file change:
//!     watcher.rs detects change, waits for the burst of events to settle
//!     → loader.rs loads new config
//!     → overrides.rs re-applies command-line flags
//!     → validation.rs validates
//!     → sent to the server, which swaps its upstream and routes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with, parse_config, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::{
    ForwarderConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
