//! The fulfillment coordinator — drives a lease from Active to Fulfilled
//! through the settlement sink.
//!
//! Ordering is load-bearing: external settlement happens first, the
//! ledger transition last. Transient sink failures are retried with
//! exponential backoff up to a bounded attempt count; fatal failures
//! surface immediately and leave the lease Active. A concurrent fulfill
//! that wins the ledger transition is reported as `AlreadyFulfilled`, not
//! as an error — fulfillment is idempotent from the caller's view.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use liqlease_ledger::LeaseLedger;
use liqlease_types::{
    AccountId, FulfillmentReceipt, LeaseId, LeaseStatus, LiqleaseError, Result, RetryConfig,
};

use crate::sink::SettlementSink;

/// Result of one fulfillment attempt. Both variants are successes.
#[derive(Debug, Clone)]
pub enum FulfillmentOutcome {
    /// This call performed the settlement and the transition.
    Fulfilled(FulfillmentReceipt),
    /// The lease was already Fulfilled (an earlier call, or a concurrent
    /// one that won the transition).
    AlreadyFulfilled,
}

/// Coordinates settlement and the ledger transition for one lease at a
/// time.
pub struct FulfillmentCoordinator<K: SettlementSink> {
    sink: K,
    ledger: Arc<LeaseLedger>,
    retry: RetryConfig,
}

impl<K: SettlementSink> FulfillmentCoordinator<K> {
    #[must_use]
    pub fn new(sink: K, ledger: Arc<LeaseLedger>, retry: RetryConfig) -> Self {
        Self {
            sink,
            ledger,
            retry,
        }
    }

    /// Settle and close the lease, idempotently.
    ///
    /// # Errors
    /// - `LeaseNotFound` if the lease does not exist for this account
    /// - `RetriesExhausted` after `RetryConfig.max_attempts` transient
    ///   sink failures
    /// - any fatal sink error, propagated on the first occurrence
    pub async fn fulfill(
        &self,
        account: AccountId,
        lease_id: LeaseId,
        now: DateTime<Utc>,
    ) -> Result<FulfillmentOutcome> {
        let lease = self.ledger.get(account, lease_id)?;
        if lease.status == LeaseStatus::Fulfilled {
            tracing::debug!(lease = %lease_id, "already fulfilled, nothing to do");
            return Ok(FulfillmentOutcome::AlreadyFulfilled);
        }

        let amount_due = lease.amount_due(now);
        self.with_retry("ensure_authorization", || {
            self.sink
                .ensure_authorization(lease.solver, &lease.token, amount_due)
        })
        .await?;
        self.with_retry("submit_settlement", || {
            self.sink.submit_settlement(&lease, amount_due)
        })
        .await?;

        match self.ledger.fulfill(account, lease_id, now) {
            Ok(receipt) => {
                tracing::info!(
                    lease = %lease_id,
                    account = %account.short(),
                    due = %amount_due,
                    "lease settled and fulfilled"
                );
                Ok(FulfillmentOutcome::Fulfilled(receipt))
            }
            // Lost the transition race to a concurrent fulfill. The
            // external side is idempotent, so this is a success.
            Err(LiqleaseError::InvalidTransition {
                status: LeaseStatus::Fulfilled,
                ..
            }) => Ok(FulfillmentOutcome::AlreadyFulfilled),
            Err(e) => Err(e),
        }
    }

    async fn with_retry<T, F, Fut>(&self, step: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    attempts += 1;
                    if attempts >= self.retry.max_attempts {
                        tracing::warn!(step, attempts, error = %e, "retry budget exhausted");
                        return Err(LiqleaseError::RetriesExhausted {
                            attempts,
                            last: e.to_string(),
                        });
                    }
                    let delay = self.retry.delay_ms(attempts - 1);
                    tracing::debug!(step, attempts, delay_ms = delay, "transient failure, backing off");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
