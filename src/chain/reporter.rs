//! Result reporting.
//!
//! # Responsibilities
//! - Translate every terminal outcome into a boolean and exactly one
//!   user-facing notification
//! - Keep timeout wording distinct from rejection wording
//! - Preserve the raw outcome in structured logs and metrics
//!
//! # Design Decisions
//! - Single exit point: every lifecycle ends here, success or not
//! - Notifications are fire-and-forget through `NotificationSink`; a full or
//!   closed channel never fails the report

use std::sync::Arc;

use crate::chain::call::Action;
use crate::chain::types::{ChainError, TxOutcome};
use crate::observability::metrics;

/// Where user-facing action feedback goes.
///
/// Implementations must not block: the chat-backed sink enqueues onto a
/// channel, the log-backed sink writes a tracing event.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_failure(&self, message: &str);
}

/// Sink that writes notifications to the log only. Used headless and as the
/// default when no chat is attached.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(notification = %message, "Action succeeded");
    }

    fn notify_failure(&self, message: &str) {
        tracing::warn!(notification = %message, "Action failed");
    }
}

/// Turns outcomes into feedback. The single exit point of a lifecycle.
#[derive(Clone)]
pub struct ResultReporter {
    sink: Arc<dyn NotificationSink>,
}

impl ResultReporter {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Report a finished lifecycle.
    ///
    /// Returns true only for a confirmed transaction. Sends exactly one
    /// notification either way; the raw error or outcome is logged in full.
    pub fn report(&self, action: Action, result: &Result<TxOutcome, ChainError>) -> bool {
        match result {
            Ok(TxOutcome::Confirmed(receipt)) => {
                metrics::record_outcome(action.method(), "confirmed");
                tracing::info!(
                    action = %action,
                    tx_hash = %receipt.tx_hash,
                    block_number = receipt.block_number,
                    "Action confirmed"
                );
                self.sink.notify_success(action.success_message());
                true
            }
            Ok(TxOutcome::Failed { tx_hash, reason }) => {
                metrics::record_outcome(action.method(), "failed");
                tracing::error!(
                    action = %action,
                    tx_hash = %tx_hash,
                    reason = %reason,
                    "Action rejected on-chain"
                );
                self.sink.notify_failure(&format!(
                    "{} The transaction was rejected.",
                    action.failure_message()
                ));
                false
            }
            Ok(TxOutcome::TimedOut { tx_hash, waited }) => {
                metrics::record_outcome(action.method(), "timed_out");
                tracing::warn!(
                    action = %action,
                    tx_hash = %tx_hash,
                    waited_secs = waited.as_secs(),
                    "Action not final within the waiting bound"
                );
                self.sink.notify_failure(&format!(
                    "{} Still waiting on the network; it may yet complete.",
                    action.failure_message()
                ));
                false
            }
            Ok(TxOutcome::Pending(tx_hash)) => {
                // A lifecycle must end on a terminal outcome; reaching the
                // reporter while pending is a bug upstream.
                metrics::record_outcome(action.method(), "pending");
                tracing::error!(
                    action = %action,
                    tx_hash = %tx_hash,
                    "Reported outcome is not terminal"
                );
                self.sink.notify_failure(action.failure_message());
                false
            }
            Err(e) => {
                metrics::record_outcome(action.method(), "error");
                tracing::error!(
                    action = %action,
                    error = %e,
                    "Action failed before finality tracking"
                );
                self.sink.notify_failure(&format!(
                    "{} {}",
                    action.failure_message(),
                    failure_detail(e)
                ));
                false
            }
        }
    }
}

/// Human-readable reason phrase for a pre-finality failure.
fn failure_detail(error: &ChainError) -> &'static str {
    use crate::chain::types::SessionError;

    match error {
        ChainError::UnknownMethod(_) => "That action is not available.",
        ChainError::Encoding { .. } => "The request could not be prepared.",
        ChainError::Submission(SessionError::Expired) => {
            "Your session has expired; please reconnect your wallet."
        }
        ChainError::Submission(SessionError::SigningRejected(_)) => {
            "The wallet declined to sign the request."
        }
        ChainError::Submission(SessionError::Unreachable(_)) => {
            "The wallet service could not be reached."
        }
        ChainError::Submission(_) => "The wallet service reported an error.",
        ChainError::Rpc(_) | ChainError::ChainMismatch { .. } | ChainError::InvalidData(_) => {
            "The network could not be reached."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::{SessionError, TxReceipt};
    use alloy::primitives::b256;
    use std::sync::Mutex;
    use std::time::Duration;

    const HASH: alloy::primitives::TxHash =
        b256!("3333333333333333333333333333333333333333333333333333333333333333");

    #[derive(Default)]
    struct RecordingSink {
        successes: Mutex<Vec<String>>,
        failures: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify_success(&self, message: &str) {
            self.successes.lock().unwrap().push(message.to_string());
        }

        fn notify_failure(&self, message: &str) {
            self.failures.lock().unwrap().push(message.to_string());
        }
    }

    fn confirmed() -> Result<TxOutcome, ChainError> {
        Ok(TxOutcome::Confirmed(TxReceipt {
            tx_hash: HASH,
            block_number: 7,
            success: true,
        }))
    }

    #[test]
    fn test_confirmed_reports_true_with_one_success() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = ResultReporter::new(sink.clone());

        assert!(reporter.report(Action::Feed, &confirmed()));

        assert_eq!(sink.successes.lock().unwrap().len(), 1);
        assert!(sink.failures.lock().unwrap().is_empty());
        assert_eq!(
            sink.successes.lock().unwrap()[0],
            Action::Feed.success_message()
        );
    }

    #[test]
    fn test_every_non_confirmed_result_reports_false_with_one_failure() {
        let results: Vec<Result<TxOutcome, ChainError>> = vec![
            Ok(TxOutcome::Failed {
                tx_hash: HASH,
                reason: "Transaction reverted".to_string(),
            }),
            Ok(TxOutcome::TimedOut {
                tx_hash: HASH,
                waited: Duration::from_secs(120),
            }),
            Ok(TxOutcome::Pending(HASH)),
            Err(ChainError::UnknownMethod("unlock_admin".to_string())),
            Err(ChainError::Submission(SessionError::Expired)),
        ];

        for result in &results {
            let sink = Arc::new(RecordingSink::default());
            let reporter = ResultReporter::new(sink.clone());

            assert!(!reporter.report(Action::Play, result));
            assert!(sink.successes.lock().unwrap().is_empty());
            assert_eq!(sink.failures.lock().unwrap().len(), 1, "for {:?}", result);
        }
    }

    #[test]
    fn test_timeout_wording_differs_from_rejection_wording() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = ResultReporter::new(sink.clone());

        reporter.report(
            Action::Rest,
            &Ok(TxOutcome::Failed {
                tx_hash: HASH,
                reason: "Transaction reverted".to_string(),
            }),
        );
        reporter.report(
            Action::Rest,
            &Ok(TxOutcome::TimedOut {
                tx_hash: HASH,
                waited: Duration::from_secs(120),
            }),
        );

        let failures = sink.failures.lock().unwrap();
        assert_ne!(failures[0], failures[1]);
        assert!(failures[1].contains("may yet complete"));
    }

    #[test]
    fn test_expired_session_names_the_session_in_the_message() {
        let sink = Arc::new(RecordingSink::default());
        let reporter = ResultReporter::new(sink.clone());

        reporter.report(
            Action::Feed,
            &Err(ChainError::Submission(SessionError::Expired)),
        );

        let failures = sink.failures.lock().unwrap();
        assert!(failures[0].contains("session has expired"));
    }
}
