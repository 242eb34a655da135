//! The lease-config registry — the standing authorizations accounts
//! publish, and the offer materialization that feeds each matching cycle.

use std::{collections::HashMap, sync::Mutex};

use liqlease_types::{AccountId, LeaseConfig, LiqleaseError, Offer, Result, Token};

use crate::offer_store::OfferStore;

/// Whether a publish call created a new registration or reconfigured an
/// existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// First config for this (account, token).
    Registered,
    /// Replaced a previously published config.
    Updated,
}

/// Registry of per-(account, token) lease configurations.
///
/// Configs change only through [`publish`](Self::publish); each matching
/// cycle materializes fresh [`Offer`]s from whatever is current, so a
/// reconfiguration takes effect on the next cycle without touching any
/// in-flight allocation.
#[derive(Default)]
pub struct LeaseConfigRegistry {
    configs: Mutex<HashMap<(AccountId, Token), LeaseConfig>>,
}

impl LeaseConfigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a config for `account`, validating it first.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the config fails structural validation;
    /// the previous registration, if any, is left untouched.
    pub fn publish(&self, account: AccountId, config: LeaseConfig) -> Result<RegistrationOutcome> {
        config.validate()?;
        let key = (account, config.token.clone());
        let previous = self
            .configs
            .lock()
            .expect("registry lock poisoned")
            .insert(key, config.clone());

        let outcome = if previous.is_some() {
            RegistrationOutcome::Updated
        } else {
            RegistrationOutcome::Registered
        };
        tracing::info!(
            account = %account.short(),
            token = %config.token,
            max_amount = %config.max_amount,
            apr_bps = config.apr_bps,
            ?outcome,
            "lease config published"
        );
        Ok(outcome)
    }

    /// The current config for (account, token).
    ///
    /// # Errors
    /// Returns `ConfigNotFound` if the account never published for this
    /// token.
    pub fn config_of(&self, account: AccountId, token: &Token) -> Result<LeaseConfig> {
        self.configs
            .lock()
            .expect("registry lock poisoned")
            .get(&(account, token.clone()))
            .cloned()
            .ok_or_else(|| LiqleaseError::ConfigNotFound {
                account,
                token: token.clone(),
            })
    }

    /// Number of published configs across all accounts and tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.lock().expect("registry lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OfferStore for LeaseConfigRegistry {
    fn offers_for(&self, token: &Token) -> Vec<Offer> {
        let mut offers: Vec<Offer> = self
            .configs
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .filter(|((_, t), _)| t == token)
            .map(|((account, _), config)| Offer::from_config(*account, config))
            .collect();
        offers.sort_by(|a, b| a.account.cmp(&b.account));
        offers
    }
}
