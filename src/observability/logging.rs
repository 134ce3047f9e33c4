//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Events carry structured fields (action, tx_hash, lifecycle_id) rather
//!   than formatted strings
//! - The environment wins over the config file when both set a level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `log_level` comes from validated configuration; `RUST_LOG` overrides it
/// when present. Call once at startup.
pub fn init_logging(log_level: &str) {
    let default_filter = format!("pet_relay={}", log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
