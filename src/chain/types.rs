//! Chain-specific types and error definitions.

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Errors that can occur on the transaction-submission pathway.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Method is not in the session allowlist or the contract ABI.
    #[error("Unknown method '{0}'")]
    UnknownMethod(String),

    /// Call arguments could not be encoded against the ABI.
    #[error("Encoding error for '{method}': {reason}")]
    Encoding { method: String, reason: String },

    /// Submission through the session account failed.
    #[error("Submission failed: {0}")]
    Submission(#[from] SessionError),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// On-chain data did not have the expected shape.
    #[error("Invalid chain data: {0}")]
    InvalidData(String),
}

/// Failure reasons surfaced by the wallet-session service.
///
/// The session service owns the signing key; this process only ever learns
/// whether the service accepted, refused, or could not be reached.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session's validity window has lapsed or the token is unknown.
    #[error("Session expired or invalid")]
    Expired,

    /// The service refused to sign the call.
    #[error("Signing rejected: {0}")]
    SigningRejected(String),

    /// The service could not be reached at all.
    #[error("Session service unreachable: {0}")]
    Unreachable(String),

    /// The service responded with an unexpected failure.
    #[error("Session service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// The session token environment variable is not set.
    #[error("Session token missing: set {0}")]
    MissingToken(&'static str),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Minimal owned receipt for a finalized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the transaction this receipt belongs to.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Whether execution succeeded on-chain.
    pub success: bool,
}

/// Lifecycle state of a submitted transaction.
///
/// `Pending` is the post-submission state; the confirmation waiter only ever
/// produces one of the three terminal variants, exactly once per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// Accepted by the network, not yet final.
    Pending(TxHash),
    /// Finalized successfully.
    Confirmed(TxReceipt),
    /// Rejected on-chain after inclusion.
    Failed { tx_hash: TxHash, reason: String },
    /// Not final within the waiting bound. The transaction may still land;
    /// this is not evidence of rejection.
    TimedOut { tx_hash: TxHash, waited: Duration },
}

impl TxOutcome {
    /// Transaction hash this outcome refers to.
    pub fn tx_hash(&self) -> TxHash {
        match self {
            TxOutcome::Pending(hash) => *hash,
            TxOutcome::Confirmed(receipt) => receipt.tx_hash,
            TxOutcome::Failed { tx_hash, .. } => *tx_hash,
            TxOutcome::TimedOut { tx_hash, .. } => *tx_hash,
        }
    }

    /// True only for a finalized, successful transaction.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxOutcome::Confirmed(_))
    }

    /// True once the waiter has produced a verdict (anything but Pending).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxOutcome::Pending(_))
    }
}
