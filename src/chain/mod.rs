//! Transaction-submission subsystem.
//!
//! # Data Flow
//! ```text
//! ActionCall (typed, from chat or CLI)
//!     → contract.rs (allowlist + ABI check, selector-prefixed calldata)
//!     → fees.rs (resource bounds from config constants)
//!     → submitter.rs (session service signs & broadcasts, returns hash)
//!     → waiter.rs (poll receipts until Confirmed / Failed / TimedOut)
//!     → reporter.rs (bool + exactly one notification)
//!
//! executor.rs drives the whole pipeline as one task per action.
//! stats.rs reads get_stats via eth_call; no session, no signing.
//! ```
//!
//! # Security Constraints
//! - No private key material in this process; the session service signs
//! - Session token ONLY from an environment variable, never logged
//! - Fee exposure capped by static configuration on every submission
//! - All RPC and session calls have configurable timeouts

pub mod call;
pub mod client;
pub mod contract;
pub mod executor;
pub mod fees;
pub mod reporter;
pub mod session;
pub mod stats;
pub mod submitter;
pub mod types;
pub mod waiter;

pub use call::{Action, ActionCall, PopulatedCall};
pub use client::ChainClient;
pub use contract::PetContract;
pub use executor::ActionExecutor;
pub use fees::{ExecutionFees, FeePolicy, ResourceBounds, ResourceBoundsMapping};
pub use reporter::{LogNotifier, NotificationSink, ResultReporter};
pub use session::{DelegatedSession, MethodAllowlist, SessionAccount, SessionDescriptor};
pub use stats::{PetStats, StatsReader};
pub use submitter::TxSubmitter;
pub use types::{ChainError, ChainResult, SessionError, TxOutcome, TxReceipt};
pub use waiter::{ConfirmationWaiter, FinalityProvider};
