//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Connect session + chain → Start relay
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop polling updates → Drain outbound queue → Exit
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then chain and session, relay last
//! - Shutdown never cancels submitted transactions; in-flight lifecycles
//!   finish on their own timeout

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
