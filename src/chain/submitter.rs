//! Transaction submission.
//!
//! # Responsibilities
//! - Hand a built call plus fee bounds to the session account
//! - Surface distinct failure reasons from the signing service
//! - Record submission metrics
//!
//! # Design Decisions
//! - Exactly one network write per call; no retry, no deduplication. Calling
//!   twice submits two transactions with two hashes
//! - Resolves when the network assigns a hash, not when the transaction is
//!   final; finality is the waiter's job

use std::sync::Arc;

use alloy::primitives::TxHash;

use crate::chain::call::PopulatedCall;
use crate::chain::fees::ExecutionFees;
use crate::chain::session::SessionAccount;
use crate::chain::types::ChainResult;
use crate::observability::metrics;

/// Submits calls through a delegated session account.
#[derive(Clone)]
pub struct TxSubmitter {
    session: Arc<dyn SessionAccount>,
}

impl TxSubmitter {
    pub fn new(session: Arc<dyn SessionAccount>) -> Self {
        Self { session }
    }

    /// Submit one call. Suspends until the network has accepted the
    /// transaction and returns its hash.
    pub async fn submit(
        &self,
        call: &PopulatedCall,
        fees: &ExecutionFees,
    ) -> ChainResult<TxHash> {
        tracing::debug!(
            method = %call.method,
            target = %call.target,
            account = %self.session.account_address(),
            "Submitting transaction"
        );

        match self.session.execute(call, fees).await {
            Ok(tx_hash) => {
                metrics::record_submission(&call.method, true);
                tracing::info!(
                    method = %call.method,
                    tx_hash = %tx_hash,
                    "Transaction accepted by network"
                );
                Ok(tx_hash)
            }
            Err(e) => {
                metrics::record_submission(&call.method, false);
                tracing::error!(
                    method = %call.method,
                    error = %e,
                    "Submission failed"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fees::FeePolicy;
    use crate::chain::session::MethodAllowlist;
    use crate::chain::types::{ChainError, SessionError};
    use crate::chain::contract::PetContract;
    use crate::chain::call::ActionCall;
    use crate::config::schema::FeeConfig;
    use alloy::primitives::{Address, B256};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Session that assigns a fresh hash per execution.
    struct CountingSession {
        executions: AtomicU64,
    }

    #[async_trait]
    impl SessionAccount for CountingSession {
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

    struct RejectingSession;

    #[async_trait]
    impl SessionAccount for RejectingSession {
        fn account_address(&self) -> Address {
            Address::ZERO
        }

        async fn execute(
            &self,
            _call: &PopulatedCall,
            _fees: &ExecutionFees,
        ) -> Result<TxHash, SessionError> {
            Err(SessionError::SigningRejected("policy violation".to_string()))
        }
    }

    fn feed_call() -> PopulatedCall {
        PetContract::new(Address::ZERO, MethodAllowlist::new(["feed"]))
            .unwrap()
            .populate(&ActionCall::Feed)
            .unwrap()
    }

    #[tokio::test]
    async fn test_two_submissions_yield_two_hashes() {
        let submitter = TxSubmitter::new(Arc::new(CountingSession {
            executions: AtomicU64::new(0),
        }));
        let call = feed_call();
        let fees = FeePolicy::new(&FeeConfig::default()).execution_fees();

        let first = submitter.submit(&call, &fees).await.unwrap();
        let second = submitter.submit(&call, &fees).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_rejection_maps_into_submission_error() {
        let submitter = TxSubmitter::new(Arc::new(RejectingSession));
        let call = feed_call();
        let fees = FeePolicy::new(&FeeConfig::default()).execution_fees();

        let err = submitter.submit(&call, &fees).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Submission(SessionError::SigningRejected(_))
        ));
    }
}
