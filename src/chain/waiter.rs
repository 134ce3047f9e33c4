//! Confirmation waiting.
//!
//! # Responsibilities
//! - Poll the chain until a submitted transaction reaches finality
//! - Distinguish on-chain rejection from "still not final when we gave up"
//! - Absorb transient RPC errors; only the timeout bound ends the wait early
//!
//! # Design Decisions
//! - Returns a terminal `TxOutcome` instead of an error: a timeout is a
//!   statement about our patience, not about the transaction
//! - Never resubmits; cancelling the wait does not cancel the transaction

use std::time::Duration;

use alloy::primitives::TxHash;
use async_trait::async_trait;
use tokio::time::{interval, timeout, Instant};

use crate::chain::types::{ChainResult, TxOutcome, TxReceipt};
use crate::config::schema::ConfirmationConfig;

/// Read-only view of transaction finality, implemented by the chain client
/// in production and by mocks in tests.
#[async_trait]
pub trait FinalityProvider: Send + Sync {
    /// Receipt for a mined transaction, or None while it is pending.
    async fn receipt(&self, tx_hash: TxHash) -> ChainResult<Option<TxReceipt>>;

    /// Latest block number.
    async fn block_number(&self) -> ChainResult<u64>;
}

/// Polls a finality provider until a submission resolves.
#[derive(Clone)]
pub struct ConfirmationWaiter {
    provider: std::sync::Arc<dyn FinalityProvider>,
    config: ConfirmationConfig,
}

impl ConfirmationWaiter {
    pub fn new(provider: std::sync::Arc<dyn FinalityProvider>, config: ConfirmationConfig) -> Self {
        Self { provider, config }
    }

    /// Wait for a transaction to reach finality.
    ///
    /// Resolves exactly once with a terminal outcome: `Confirmed` with the
    /// receipt, `Failed` when the chain rejected the transaction, or
    /// `TimedOut` when the bound elapsed first.
    pub async fn await_finality(&self, tx_hash: TxHash) -> TxOutcome {
        let required_confirmations = self.config.confirmation_blocks;
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let started = Instant::now();

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.provider.receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        // Transient: congestion or a flaky provider is not a
                        // verdict on the transaction.
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt query failed, retrying");
                        continue;
                    }
                };

                if !receipt.success {
                    return TxOutcome::Failed {
                        tx_hash,
                        reason: "Transaction reverted".to_string(),
                    };
                }

                let current_block = match self.provider.block_number().await {
                    Ok(block) => block,
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Block query failed, retrying");
                        continue;
                    }
                };
                let confirmations = current_block.saturating_sub(receipt.block_number) as u32;

                if confirmations >= required_confirmations {
                    return TxOutcome::Confirmed(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => {
                let waited = started.elapsed();
                tracing::warn!(
                    tx_hash = %tx_hash,
                    waited_secs = waited.as_secs(),
                    "Gave up waiting for finality"
                );
                TxOutcome::TimedOut { tx_hash, waited }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const HASH: TxHash = b256!("2222222222222222222222222222222222222222222222222222222222222222");

    fn fast_config() -> ConfirmationConfig {
        ConfirmationConfig {
            poll_interval_ms: 10,
            timeout_secs: 1,
            confirmation_blocks: 1,
        }
    }

    /// Scripted provider: yields None for `pending_polls` receipt queries,
    /// then the given receipt forever.
    struct ScriptedProvider {
        pending_polls: u32,
        polls: AtomicU32,
        receipt: Option<TxReceipt>,
        block_number: u64,
    }

    #[async_trait]
    impl FinalityProvider for ScriptedProvider {
        async fn receipt(&self, _tx_hash: TxHash) -> ChainResult<Option<TxReceipt>> {
            let seen = self.polls.fetch_add(1, Ordering::SeqCst);
            if seen < self.pending_polls {
                return Ok(None);
            }
            Ok(self.receipt.clone())
        }

        async fn block_number(&self) -> ChainResult<u64> {
            Ok(self.block_number)
        }
    }

    #[tokio::test]
    async fn test_confirms_after_pending_polls() {
        let provider = Arc::new(ScriptedProvider {
            pending_polls: 3,
            polls: AtomicU32::new(0),
            receipt: Some(TxReceipt {
                tx_hash: HASH,
                block_number: 100,
                success: true,
            }),
            block_number: 105,
        });
        let waiter = ConfirmationWaiter::new(provider, fast_config());

        let outcome = waiter.await_finality(HASH).await;
        assert!(matches!(outcome, TxOutcome::Confirmed(ref r) if r.block_number == 100));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_failed_not_timed_out() {
        let provider = Arc::new(ScriptedProvider {
            pending_polls: 0,
            polls: AtomicU32::new(0),
            receipt: Some(TxReceipt {
                tx_hash: HASH,
                block_number: 100,
                success: false,
            }),
            block_number: 100,
        });
        let waiter = ConfirmationWaiter::new(provider, fast_config());

        let outcome = waiter.await_finality(HASH).await;
        assert!(matches!(outcome, TxOutcome::Failed { reason, .. } if reason.contains("reverted")));
    }

    #[tokio::test]
    async fn test_never_mined_is_timed_out_not_failed() {
        let provider = Arc::new(ScriptedProvider {
            pending_polls: u32::MAX,
            polls: AtomicU32::new(0),
            receipt: None,
            block_number: 100,
        });
        let waiter = ConfirmationWaiter::new(provider, fast_config());

        let outcome = waiter.await_finality(HASH).await;
        match outcome {
            TxOutcome::TimedOut { tx_hash, waited } => {
                assert_eq!(tx_hash, HASH);
                assert!(waited >= Duration::from_secs(1));
            }
            other => panic!("expected TimedOut, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insufficient_depth_keeps_waiting_until_timeout() {
        let provider = Arc::new(ScriptedProvider {
            pending_polls: 0,
            polls: AtomicU32::new(0),
            receipt: Some(TxReceipt {
                tx_hash: HASH,
                block_number: 100,
                success: true,
            }),
            // Same block as inclusion: zero confirmations forever.
            block_number: 100,
        });
        let mut config = fast_config();
        config.confirmation_blocks = 3;
        let waiter = ConfirmationWaiter::new(provider, config);

        let outcome = waiter.await_finality(HASH).await;
        assert!(matches!(outcome, TxOutcome::TimedOut { .. }));
    }

    /// Provider that always errors; the waiter should absorb the errors and
    /// time out rather than surface them.
    struct FailingProvider;

    #[async_trait]
    impl FinalityProvider for FailingProvider {
        async fn receipt(&self, _tx_hash: TxHash) -> ChainResult<Option<TxReceipt>> {
            Err(crate::chain::types::ChainError::Rpc("boom".to_string()))
        }

        async fn block_number(&self) -> ChainResult<u64> {
            Err(crate::chain::types::ChainError::Rpc("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_rpc_errors_do_not_become_failures() {
        let waiter = ConfirmationWaiter::new(Arc::new(FailingProvider), fast_config());

        let outcome = waiter.await_finality(HASH).await;
        assert!(matches!(outcome, TxOutcome::TimedOut { .. }));
    }
}
