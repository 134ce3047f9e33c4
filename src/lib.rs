//! Pet Relay Library
//!
//! Thin client that relays chat commands into fee-bounded contract
//! transactions signed by a delegated wallet session.

pub mod bot;
pub mod chain;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use chain::{Action, ActionCall, ActionExecutor, TxOutcome};
pub use config::schema::RelayConfig;
pub use lifecycle::Shutdown;
