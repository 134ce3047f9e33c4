//! Action execution lifecycle.
//!
//! One lifecycle = build the call, attach fees, submit through the session
//! account, wait for finality, report. Every submission path in the binary
//! goes through here with the same fee constants and the same reporting.

use uuid::Uuid;

use crate::chain::call::ActionCall;
use crate::chain::contract::PetContract;
use crate::chain::fees::FeePolicy;
use crate::chain::reporter::ResultReporter;
use crate::chain::submitter::TxSubmitter;
use crate::chain::types::{ChainError, TxOutcome};
use crate::chain::waiter::ConfirmationWaiter;

/// Drives one action from call construction to reported outcome.
///
/// Cheap to clone; the relay builds one per incoming command so the reporter
/// can target the originating chat.
#[derive(Clone)]
pub struct ActionExecutor {
    contract: std::sync::Arc<PetContract>,
    fee_policy: FeePolicy,
    submitter: TxSubmitter,
    waiter: ConfirmationWaiter,
    reporter: ResultReporter,
}

impl ActionExecutor {
    pub fn new(
        contract: std::sync::Arc<PetContract>,
        fee_policy: FeePolicy,
        submitter: TxSubmitter,
        waiter: ConfirmationWaiter,
        reporter: ResultReporter,
    ) -> Self {
        Self {
            contract,
            fee_policy,
            submitter,
            waiter,
            reporter,
        }
    }

    /// Execute one action end to end and report it.
    ///
    /// Returns true only when the transaction was confirmed on-chain. Always
    /// sends exactly one notification through the reporter's sink.
    pub async fn execute(&self, call: &ActionCall) -> bool {
        let lifecycle_id = Uuid::new_v4();
        let action = call.action();

        tracing::info!(
            lifecycle_id = %lifecycle_id,
            action = %action,
            "Action lifecycle started"
        );

        let result = self.run(call).await;
        let confirmed = self.reporter.report(action, &result);

        tracing::info!(
            lifecycle_id = %lifecycle_id,
            action = %action,
            confirmed = confirmed,
            "Action lifecycle finished"
        );

        confirmed
    }

    /// Build, submit, and wait, without reporting.
    ///
    /// The error channel carries pre-finality failures only; once a hash
    /// exists the verdict arrives as a terminal `TxOutcome`.
    pub async fn run(&self, call: &ActionCall) -> Result<TxOutcome, ChainError> {
        let populated = self.contract.populate(call)?;
        let fees = self.fee_policy.execution_fees();

        let tx_hash = self.submitter.submit(&populated, &fees).await?;
        tracing::debug!(tx_hash = %tx_hash, "Awaiting finality");

        Ok(self.waiter.await_finality(tx_hash).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::call::PopulatedCall;
    use crate::chain::fees::ExecutionFees;
    use crate::chain::reporter::NotificationSink;
    use crate::chain::session::{MethodAllowlist, SessionAccount};
    use crate::chain::types::{ChainResult, SessionError, TxReceipt};
    use crate::chain::waiter::FinalityProvider;
    use crate::config::schema::{ConfirmationConfig, FeeConfig};
    use alloy::primitives::{Address, TxHash, B256};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    struct StubSession {
        executions: AtomicU64,
    }

    #[async_trait]
    impl SessionAccount for StubSession {
        fn account_address(&self) -> Address {
            Address::ZERO
        }

        async fn execute(
            &self,
            _call: &PopulatedCall,
            _fees: &ExecutionFees,
        ) -> Result<TxHash, SessionError> {
            let n = self.executions.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(B256::with_last_byte(n as u8))
        }
    }

    struct InstantFinality;

    #[async_trait]
    impl FinalityProvider for InstantFinality {
        async fn receipt(&self, tx_hash: TxHash) -> ChainResult<Option<TxReceipt>> {
            Ok(Some(TxReceipt {
                tx_hash,
                block_number: 1,
                success: true,
            }))
        }

        async fn block_number(&self) -> ChainResult<u64> {
            Ok(10)
        }
    }

    #[derive(Default)]
    struct CountingSink {
        successes: Mutex<u32>,
        failures: Mutex<u32>,
    }

    impl NotificationSink for CountingSink {
        fn notify_success(&self, _message: &str) {
            *self.successes.lock().unwrap() += 1;
        }

        fn notify_failure(&self, _message: &str) {
            *self.failures.lock().unwrap() += 1;
        }
    }

    fn executor(session: Arc<dyn SessionAccount>, sink: Arc<CountingSink>) -> ActionExecutor {
        let contract = Arc::new(
            PetContract::new(Address::ZERO, MethodAllowlist::new(["feed", "play"])).unwrap(),
        );
        let config = ConfirmationConfig {
            poll_interval_ms: 5,
            timeout_secs: 1,
            confirmation_blocks: 1,
        };
        ActionExecutor::new(
            contract,
            FeePolicy::new(&FeeConfig::default()),
            TxSubmitter::new(session),
            ConfirmationWaiter::new(Arc::new(InstantFinality), config),
            ResultReporter::new(sink),
        )
    }

    #[tokio::test]
    async fn test_confirmed_lifecycle_reports_success_once() {
        let sink = Arc::new(CountingSink::default());
        let exec = executor(
            Arc::new(StubSession {
                executions: AtomicU64::new(0),
            }),
            sink.clone(),
        );

        assert!(exec.execute(&ActionCall::Feed).await);
        assert_eq!(*sink.successes.lock().unwrap(), 1);
        assert_eq!(*sink.failures.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_disallowed_action_fails_without_submitting() {
        let session = Arc::new(StubSession {
            executions: AtomicU64::new(0),
        });
        let sink = Arc::new(CountingSink::default());
        // Allowlist excludes rest.
        let exec = executor(session.clone(), sink.clone());

        assert!(!exec.execute(&ActionCall::Rest).await);

        // The session was never consulted.
        assert_eq!(session.executions.load(Ordering::SeqCst), 0);
        assert_eq!(*sink.failures.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeating_an_action_submits_again() {
        let session = Arc::new(StubSession {
            executions: AtomicU64::new(0),
        });
        let sink = Arc::new(CountingSink::default());
        let exec = executor(session.clone(), sink.clone());

        assert!(exec.execute(&ActionCall::Feed).await);
        assert!(exec.execute(&ActionCall::Feed).await);

        assert_eq!(session.executions.load(Ordering::SeqCst), 2);
        assert_eq!(*sink.successes.lock().unwrap(), 2);
    }
}
