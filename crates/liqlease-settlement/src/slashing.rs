//! The slashing monitor — detects overdue leases and fires the outbound
//! slashing trigger.
//!
//! Default is a *derived* predicate over wall-clock time, never a stored
//! status: the monitor reads the ledger, decides per lease, and fires the
//! trigger for overdue ones. The trigger must be idempotent on the
//! external side, so an already-slashed lease showing up again in the
//! next scan is harmless. One lease's failure never halts the scan.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use liqlease_ledger::LeaseLedger;
use liqlease_types::{AccountId, ChainId, LeaseId, MonitorConfig};

/// Outbound trigger that initiates slashing of a defaulted lease on the
/// target network. Must be safe to call repeatedly for the same lease.
#[allow(async_fn_in_trait)]
pub trait SlashingTrigger: Send + Sync {
    async fn slash(
        &self,
        account: AccountId,
        target_network: ChainId,
        lease_id: LeaseId,
    ) -> liqlease_types::Result<()>;
}

/// What one scan pass saw and did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Leases examined.
    pub scanned: usize,
    /// Leases past their duration ceiling and still Active.
    pub defaulted: usize,
    /// Triggers fired successfully.
    pub slashed: usize,
    /// Triggers that failed; logged, not propagated.
    pub failures: usize,
}

/// Periodic scanner over the ledger's tracked leases.
///
/// The monitor never mutates lease status — a defaulted lease stays
/// Active in the ledger; consequences are the target network's business.
pub struct SlashingMonitor<T: SlashingTrigger> {
    trigger: T,
    ledger: Arc<LeaseLedger>,
    config: MonitorConfig,
}

impl<T: SlashingTrigger> SlashingMonitor<T> {
    #[must_use]
    pub fn new(trigger: T, ledger: Arc<LeaseLedger>, config: MonitorConfig) -> Self {
        Self {
            trigger,
            ledger,
            config,
        }
    }

    /// One scan pass, evaluating the default predicate at `now`.
    pub async fn scan_at(&self, now: DateTime<Utc>) -> ScanSummary {
        let mut summary = ScanSummary::default();
        for (account, lease_id) in self.ledger.tracked() {
            summary.scanned += 1;
            let Ok(lease) = self.ledger.get(account, lease_id) else {
                continue;
            };
            if !lease.is_defaulted(now) {
                continue;
            }
            summary.defaulted += 1;
            tracing::warn!(
                lease = %lease_id,
                account = %account.short(),
                elapsed_secs = lease.elapsed_secs(now),
                ceiling_secs = lease.max_duration_secs,
                "lease defaulted, firing slashing trigger"
            );
            match self
                .trigger
                .slash(account, self.config.target_network, lease_id)
                .await
            {
                Ok(()) => summary.slashed += 1,
                Err(e) => {
                    summary.failures += 1;
                    tracing::warn!(lease = %lease_id, error = %e, "slashing trigger failed");
                }
            }
        }
        tracing::info!(
            scanned = summary.scanned,
            defaulted = summary.defaulted,
            slashed = summary.slashed,
            failures = summary.failures,
            "slashing scan complete"
        );
        summary
    }

    /// Drive scans forever on the configured interval.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.scan_interval_secs));
        loop {
            ticker.tick().await;
            self.scan_at(Utc::now()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use liqlease_ledger::Reservation;
    use liqlease_types::{LeaseStatus, LiqleaseError, SolverId, Token};
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Default)]
    struct RecordingTrigger {
        calls: Mutex<Vec<(AccountId, ChainId, LeaseId)>>,
        fail_for: Option<LeaseId>,
    }

    impl SlashingTrigger for RecordingTrigger {
        async fn slash(
            &self,
            account: AccountId,
            target_network: ChainId,
            lease_id: LeaseId,
        ) -> liqlease_types::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((account, target_network, lease_id));
            if self.fail_for == Some(lease_id) {
                return Err(LiqleaseError::SlashingFailed {
                    lease_id,
                    reason: "rpc unavailable".into(),
                });
            }
            Ok(())
        }
    }

    fn reserve(ledger: &LeaseLedger, tag: u8, started_at: DateTime<Utc>) -> LeaseId {
        ledger
            .reserve(
                Reservation {
                    account: AccountId::dummy(tag),
                    token: Token::new("USDC"),
                    amount: Decimal::new(1000, 0),
                    apr_bps: 500,
                    max_duration_secs: 86_400,
                    solver: SolverId::dummy(9),
                },
                started_at,
            )
            .unwrap()
    }

    fn monitor(ledger: Arc<LeaseLedger>, trigger: RecordingTrigger) -> SlashingMonitor<RecordingTrigger> {
        SlashingMonitor::new(trigger, ledger, MonitorConfig::default())
    }

    #[tokio::test]
    async fn default_fires_only_past_the_ceiling() {
        let ledger = Arc::new(LeaseLedger::new());
        let t0 = Utc::now();
        let id = reserve(&ledger, 1, t0);
        let mon = monitor(Arc::clone(&ledger), RecordingTrigger::default());

        let early = mon.scan_at(t0 + chrono::TimeDelta::seconds(86_399)).await;
        assert_eq!(early.defaulted, 0);
        assert_eq!(early.scanned, 1);

        let late = mon.scan_at(t0 + chrono::TimeDelta::seconds(86_401)).await;
        assert_eq!(late.defaulted, 1);
        assert_eq!(late.slashed, 1);

        let calls = mon.trigger.calls.lock().unwrap();
        assert_eq!(*calls, vec![(AccountId::dummy(1), ChainId(30_110), id)]);
    }

    #[tokio::test]
    async fn fulfilled_lease_is_never_slashed() {
        let ledger = Arc::new(LeaseLedger::new());
        let t0 = Utc::now();
        let id = reserve(&ledger, 1, t0);
        ledger.fulfill(AccountId::dummy(1), id, t0).unwrap();
        let mon = monitor(Arc::clone(&ledger), RecordingTrigger::default());

        let summary = mon.scan_at(t0 + chrono::TimeDelta::seconds(200_000)).await;
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.defaulted, 0);
        assert!(mon.trigger.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_halt_the_scan() {
        let ledger = Arc::new(LeaseLedger::new());
        let t0 = Utc::now();
        let first = reserve(&ledger, 1, t0);
        let _second = reserve(&ledger, 2, t0);
        let mon = monitor(
            Arc::clone(&ledger),
            RecordingTrigger {
                fail_for: Some(first),
                ..RecordingTrigger::default()
            },
        );

        let summary = mon.scan_at(t0 + chrono::TimeDelta::seconds(90_000)).await;
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.defaulted, 2);
        assert_eq!(summary.slashed, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(mon.trigger.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn monitor_never_mutates_status_and_refires() {
        let ledger = Arc::new(LeaseLedger::new());
        let t0 = Utc::now();
        let id = reserve(&ledger, 1, t0);
        let mon = monitor(Arc::clone(&ledger), RecordingTrigger::default());

        let late = t0 + chrono::TimeDelta::seconds(90_000);
        mon.scan_at(late).await;
        assert_eq!(ledger.status(AccountId::dummy(1), id), LeaseStatus::Active);

        // The trigger is idempotent externally, so refiring is safe.
        let again = mon.scan_at(late).await;
        assert_eq!(again.slashed, 1);
        assert_eq!(mon.trigger.calls.lock().unwrap().len(), 2);
    }
}
