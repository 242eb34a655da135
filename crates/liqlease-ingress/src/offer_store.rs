//! The offer store seam — where the demand engine reads the current set
//! of materialized offers from.

use std::sync::Mutex;

use liqlease_types::{Offer, Token};
use rust_decimal::Decimal;

/// Source of materialized offers for a matching cycle.
///
/// Injected into the [`DemandEngine`](crate::DemandEngine) so production
/// can back it with the config registry while tests use a fixed in-memory
/// set.
pub trait OfferStore: Send + Sync {
    /// Current offers for `token`, deterministically ordered.
    fn offers_for(&self, token: &Token) -> Vec<Offer>;

    /// Total drawable capacity for `token` across all offers.
    fn capacity_of(&self, token: &Token) -> Decimal {
        self.offers_for(token)
            .iter()
            .map(|o| o.max_amount)
            .sum()
    }
}

/// Fixed in-memory offer set. Deterministic; intended for tests and for
/// replaying a captured offer snapshot.
#[derive(Default)]
pub struct InMemoryOfferStore {
    offers: Mutex<Vec<Offer>>,
}

impl InMemoryOfferStore {
    #[must_use]
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers: Mutex::new(offers),
        }
    }

    pub fn insert(&self, offer: Offer) {
        self.offers
            .lock()
            .expect("offer store lock poisoned")
            .push(offer);
    }
}

impl OfferStore for InMemoryOfferStore {
    fn offers_for(&self, token: &Token) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self
            .offers
            .lock()
            .expect("offer store lock poisoned")
            .iter()
            .filter(|o| &o.token == token)
            .cloned()
            .collect();
        offers.sort_by(|a, b| a.account.cmp(&b.account));
        offers
    }
}
