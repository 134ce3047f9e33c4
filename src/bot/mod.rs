//! Chat bot subsystem.
//!
//! # Data Flow
//! ```text
//! bot API (long poll)
//!     → api.rs (getUpdates / sendMessage, token from environment)
//!     → relay.rs (command parsing, busy guard)
//!         /feed /play /rest → chain::executor (one task per action)
//!         /stats            → chain::stats (read-only)
//!         anything else     → fixed fallback reply
//!     → outbound queue → api.rs (replies and notifications)
//! ```
//!
//! # Design Decisions
//! - The relay owns the only permit for submitting actions; a second command
//!   while one is in flight gets a busy reply instead of queueing
//! - Chat delivery failures are logged and dropped, never retried into the
//!   transaction path

pub mod api;
pub mod relay;

pub use api::{BotClient, BotError, BotIdentity, Chat, Message, Update, BOT_TOKEN_ENV_VAR};
pub use relay::{ChatNotifier, ChatRelay, Command, OutboundMessage};
