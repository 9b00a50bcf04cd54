//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handler and server produce:
//!     → logging.rs (structured log events, incl. target URL per request)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
