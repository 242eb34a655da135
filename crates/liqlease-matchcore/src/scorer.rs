//! Match scoring — compatibility filtering and ranking between one demand
//! request and one offer.
//!
//! Scoring is a pure function with no side effects. An offer that fails
//! any ceiling check is `Incompatible` — a filter outcome, not an error.
//!
//! ## Score
//!
//! Lower is better:
//!
//! ```text
//! score = amount_slack_pct + duration_slack_pct + 10 × apr_pct
//! ```
//!
//! Slack percentages are computed relative to the request's own amount and
//! duration — an offer that barely covers the request wastes the least
//! reserve capacity. The APR term is the annualized premium the solver
//! will actually pay, so among compatible offers the cheapest rate wins;
//! increasing an offer's APR strictly increases (worsens) its score.

use std::cmp::Ordering;

use liqlease_types::{DemandRequest, Offer, constants};
use rust_decimal::Decimal;

/// Outcome of scoring one (request, offer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Compatible, with a non-negative score (lower is better).
    Score(Decimal),
    /// Failed the token or a ceiling check. Not an error.
    Incompatible,
}

impl MatchOutcome {
    /// The score, if compatible.
    #[must_use]
    pub fn as_score(&self) -> Option<Decimal> {
        match self {
            Self::Score(s) => Some(*s),
            Self::Incompatible => None,
        }
    }
}

/// A compatible offer together with its score, produced by [`rank`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    pub offer: Offer,
    pub score: Decimal,
}

const PCT: Decimal = Decimal::ONE_HUNDRED;

fn slack_pct(ceiling: Decimal, wanted: Decimal) -> Decimal {
    if wanted.is_zero() {
        Decimal::ZERO
    } else {
        (ceiling - wanted) / wanted * PCT
    }
}

fn apr_pct(apr_bps: u32) -> Decimal {
    Decimal::from(apr_bps) / PCT
}

/// Score one (request, offer) pair.
///
/// Compatible iff: same token; `request.amount ≤ offer.max_amount`;
/// `request.duration ≤ offer.max_duration`; the solver's APR ceiling is at
/// least what the offer charges. Deterministic and pure.
#[must_use]
pub fn score(request: &DemandRequest, offer: &Offer) -> MatchOutcome {
    if request.token != offer.token
        || request.amount > offer.max_amount
        || request.duration_wanted_secs > offer.max_duration_secs
        || request.max_apr_bps < offer.max_apr_bps
    {
        return MatchOutcome::Incompatible;
    }

    let amount_slack = slack_pct(offer.max_amount, request.amount);
    let duration_slack = slack_pct(
        Decimal::from(offer.max_duration_secs),
        Decimal::from(request.duration_wanted_secs),
    );
    let apr_term = Decimal::from(constants::APR_SPREAD_WEIGHT) * apr_pct(offer.max_apr_bps);

    MatchOutcome::Score(amount_slack + duration_slack + apr_term)
}

/// The allocation-path filter: every compatibility check **except** the
/// whole-request amount ceiling. A greedy draw may take only part of the
/// demand from an offer, so the per-offer ceiling bounds the draw, not the
/// request.
#[must_use]
pub fn admissible_for_draw(request: &DemandRequest, offer: &Offer) -> bool {
    request.token == offer.token
        && request.duration_wanted_secs <= offer.max_duration_secs
        && request.max_apr_bps >= offer.max_apr_bps
        && offer.max_amount > Decimal::ZERO
}

/// Deterministic ordering of scored offers: ascending score, then larger
/// remaining capacity (reduces fragmentation), then lowest account id
/// (reproducible tests).
#[must_use]
pub fn compare_ranked(a: &RankedMatch, b: &RankedMatch) -> Ordering {
    a.score
        .cmp(&b.score)
        .then_with(|| b.offer.max_amount.cmp(&a.offer.max_amount))
        .then_with(|| a.offer.account.cmp(&b.offer.account))
}

/// Rank the compatible offers for a request, best first, truncated to
/// `max_matches`.
#[must_use]
pub fn rank(request: &DemandRequest, offers: &[Offer], max_matches: usize) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = offers
        .iter()
        .filter_map(|offer| {
            score(request, offer).as_score().map(|s| RankedMatch {
                offer: offer.clone(),
                score: s,
            })
        })
        .collect();
    ranked.sort_by(compare_ranked);
    ranked.truncate(max_matches);
    ranked
}
