//! Full-pipeline tests: publish configs, serve demand through the engine,
//! settle through the coordinator, and catch defaults with the monitor.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};

use chrono::{TimeDelta, Utc};
use ed25519_dalek::SigningKey;
use liqlease_ingress::{
    AttestationGate, DemandEngine, LeaseConfigRegistry, LocalMatchProvider,
};
use liqlease_ledger::LeaseLedger;
use liqlease_settlement::{
    FulfillmentCoordinator, FulfillmentOutcome, ScanSummary, SettlementSink, SlashingMonitor,
    SlashingTrigger,
};
use liqlease_types::{
    AccountId, ChainId, Lease, LeaseConfig, LeaseId, LeaseStatus, LiqleaseError, Measurement,
    MonitorConfig, RetryConfig, SolverId, Token,
};
use rand::rngs::OsRng;
use rust_decimal::Decimal;

const MEASUREMENT: Measurement = [1u8; 32];

#[derive(Default)]
struct CountingSink {
    auth_calls: AtomicU32,
    submit_calls: AtomicU32,
}

impl SettlementSink for CountingSink {
    async fn ensure_authorization(
        &self,
        _solver: SolverId,
        _token: &Token,
        _amount: Decimal,
    ) -> liqlease_types::Result<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn submit_settlement(
        &self,
        _lease: &Lease,
        _amount_due: Decimal,
    ) -> liqlease_types::Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingTrigger {
    calls: Mutex<Vec<(AccountId, ChainId, LeaseId)>>,
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
        Ok(())
    }
}

fn engine_with_offers(
    ledger: Arc<LeaseLedger>,
) -> DemandEngine<LeaseConfigRegistry, LocalMatchProvider> {
    let registry = LeaseConfigRegistry::new();
    for (tag, amount) in [(1u8, 800i64), (2, 2000)] {
        registry
            .publish(
                AccountId::dummy(tag),
                LeaseConfig {
                    token: Token::new("USDC"),
                    max_amount: Decimal::new(amount, 0),
                    apr_bps: 500,
                    max_duration_secs: 86_400,
                },
            )
            .unwrap();
    }

    let key = SigningKey::generate(&mut OsRng);
    let verifying = key.verifying_key();
    DemandEngine::new(
        registry,
        LocalMatchProvider::new(key, MEASUREMENT),
        AttestationGate::new(vec![verifying], vec![MEASUREMENT]),
        ledger,
        liqlease_types::EngineConfig::default(),
    )
}

#[tokio::test]
async fn demand_splits_settles_and_frees_the_slots() {
    let ledger = Arc::new(LeaseLedger::new());
    let engine = engine_with_offers(Arc::clone(&ledger));
    let t0 = Utc::now();

    // Offers {A: 800, B: 2000}, demand 1000: all of A plus 200 from B.
    let outcome = engine
        .serve_simple(
            SolverId::dummy(9),
            Token::new("USDC"),
            Decimal::new(1000, 0),
            t0,
        )
        .unwrap();
    assert!(outcome.complete);
    assert_eq!(outcome.lease_ids.len(), 2);
    assert_eq!(ledger.active_count(), 2);

    let coordinator = FulfillmentCoordinator::new(
        CountingSink::default(),
        Arc::clone(&ledger),
        RetryConfig::default(),
    );
    let later = t0 + TimeDelta::seconds(43_200);
    for (&account, &lease_id) in outcome.accounts.iter().zip(&outcome.lease_ids) {
        let result = coordinator.fulfill(account, lease_id, later).await.unwrap();
        assert!(matches!(result, FulfillmentOutcome::Fulfilled(_)));
    }
    assert_eq!(ledger.active_count(), 0);

    // Slots are free again: the same demand can be served anew.
    let again = engine
        .serve_simple(
            SolverId::dummy(8),
            Token::new("USDC"),
            Decimal::new(1000, 0),
            later,
        )
        .unwrap();
    assert_eq!(again.lease_ids.len(), 2);
}

#[tokio::test]
async fn second_solver_is_served_while_first_lease_is_active() {
    let ledger = Arc::new(LeaseLedger::new());
    let engine = engine_with_offers(Arc::clone(&ledger));
    let t0 = Utc::now();

    let first = engine
        .serve_simple(
            SolverId::dummy(9),
            Token::new("USDC"),
            Decimal::new(200, 0),
            t0,
        )
        .unwrap();
    assert_eq!(first.accounts, vec![AccountId::dummy(1)]);

    // Account 1's USDC slot is occupied; account 2's free capacity
    // serves the next solver without settling anything first.
    let second = engine
        .serve_simple(
            SolverId::dummy(8),
            Token::new("USDC"),
            Decimal::new(200, 0),
            t0,
        )
        .unwrap();
    assert_eq!(second.accounts, vec![AccountId::dummy(2)]);
    assert_eq!(ledger.active_count(), 2);
}

#[tokio::test]
async fn oversized_demand_fails_clean_and_partial_is_opt_in() {
    let ledger = Arc::new(LeaseLedger::new());
    let engine = engine_with_offers(Arc::clone(&ledger));
    let t0 = Utc::now();

    // Demand 3000 against 2800 total capacity.
    let err = engine
        .serve_simple(
            SolverId::dummy(9),
            Token::new("USDC"),
            Decimal::new(3000, 0),
            t0,
        )
        .unwrap_err();
    assert!(matches!(err, LiqleaseError::InsufficientCapacity { .. }));
    assert_eq!(ledger.lease_count(), 0);

    let mut request = liqlease_types::DemandRequest::dummy(Decimal::new(3000, 0));
    request.max_apr_bps = 1_000;
    let outcome = engine
        .serve(&request, SolverId::dummy(9), true, t0)
        .unwrap();
    assert!(!outcome.complete);
    assert_eq!(outcome.total_drawn, Decimal::new(2800, 0));
    assert_eq!(ledger.active_count(), 2);
}

#[tokio::test]
async fn fulfillment_is_idempotent_end_to_end() {
    let ledger = Arc::new(LeaseLedger::new());
    let engine = engine_with_offers(Arc::clone(&ledger));
    let t0 = Utc::now();

    let outcome = engine
        .serve_simple(
            SolverId::dummy(9),
            Token::new("USDC"),
            Decimal::new(500, 0),
            t0,
        )
        .unwrap();
    let account = outcome.accounts[0];
    let lease_id = outcome.lease_ids[0];

    let coordinator = FulfillmentCoordinator::new(
        CountingSink::default(),
        Arc::clone(&ledger),
        RetryConfig::default(),
    );
    let first = coordinator.fulfill(account, lease_id, t0).await.unwrap();
    let second = coordinator.fulfill(account, lease_id, t0).await.unwrap();
    assert!(matches!(first, FulfillmentOutcome::Fulfilled(_)));
    assert!(matches!(second, FulfillmentOutcome::AlreadyFulfilled));
    assert_eq!(ledger.status(account, lease_id), LeaseStatus::Fulfilled);
}

#[tokio::test]
async fn overdue_lease_is_slashed_but_settled_one_is_not() {
    let ledger = Arc::new(LeaseLedger::new());
    let engine = engine_with_offers(Arc::clone(&ledger));
    let t0 = Utc::now();

    let outcome = engine
        .serve_simple(
            SolverId::dummy(9),
            Token::new("USDC"),
            Decimal::new(1000, 0),
            t0,
        )
        .unwrap();

    // Settle the first lease; leave the second one hanging.
    let coordinator = FulfillmentCoordinator::new(
        CountingSink::default(),
        Arc::clone(&ledger),
        RetryConfig::default(),
    );
    coordinator
        .fulfill(outcome.accounts[0], outcome.lease_ids[0], t0)
        .await
        .unwrap();

    let monitor = SlashingMonitor::new(
        RecordingTrigger::default(),
        Arc::clone(&ledger),
        MonitorConfig::default(),
    );

    // Within the 86_400s ceiling nothing is overdue.
    let early: ScanSummary = monitor.scan_at(t0 + TimeDelta::seconds(86_399)).await;
    assert_eq!(early.defaulted, 0);

    // Past the ceiling only the unsettled lease defaults.
    let late = monitor.scan_at(t0 + TimeDelta::seconds(86_401)).await;
    assert_eq!(late.scanned, 2);
    assert_eq!(late.defaulted, 1);
    assert_eq!(late.slashed, 1);
    assert_eq!(late.failures, 0);
}
