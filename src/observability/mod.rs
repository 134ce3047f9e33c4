//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, tracing)
//!     → metrics.rs (counters behind a Prometheus endpoint)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every lifecycle event carries a correlation id (UUID v4) and the
//!   transaction hash once one exists
//! - Raw errors are always logged in full before being translated into
//!   user-facing wording
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
