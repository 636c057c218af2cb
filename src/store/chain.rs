//! Ordered provider fallback
//!
//! A [`ProviderChain`] holds the store sources of one platform in priority
//! order and returns the first one that produces a baseline. Tiers are
//! never raced: each one only runs after every earlier tier failed or was
//! not configured.

use std::sync::Arc;
use std::time::Duration;

use crate::store::error::StoreError;
use crate::store::observer::{ComparisonEvent, ComparisonObserver};
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::types::{ProviderTier, StoreVersion};

/// Result of walking a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Resolved {
        store: StoreVersion,
        tier: ProviderTier,
        /// Failures of earlier tiers
        warnings: Vec<String>,
    },
    Exhausted {
        error: String,
        warnings: Vec<String>,
    },
}

pub struct ProviderChain {
    providers: Vec<Arc<dyn StoreProvider>>,
    timeout: Duration,
}

impl ProviderChain {
    /// Creates a chain; `providers` are consulted in the given order
    pub fn new(providers: Vec<Arc<dyn StoreProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn tiers(&self) -> Vec<ProviderTier> {
        self.providers.iter().map(|p| p.tier()).collect()
    }

    /// Walk the chain until a provider succeeds.
    ///
    /// Unconfigured tiers are skipped quietly. Failures and timeouts are
    /// collected as warnings and the next tier is tried.
    pub async fn first_success(
        &self,
        query: &StoreQuery,
        observer: &dyn ComparisonObserver,
    ) -> ChainOutcome {
        let mut warnings = Vec::new();
        let mut last_error = None;

        for provider in &self.providers {
            let result = tokio::time::timeout(self.timeout, provider.fetch_store_version(query))
                .await
                .unwrap_or_else(|_| Err(StoreError::Timeout(self.timeout.as_millis() as u64)));

            match result {
                Ok(store) => {
                    observer.notify(&ComparisonEvent::Resolved {
                        platform: query.platform,
                        provider: provider.name(),
                        store: store.clone(),
                    });
                    return ChainOutcome::Resolved {
                        store,
                        tier: provider.tier(),
                        warnings,
                    };
                }
                Err(e) if e.is_unavailable() => {
                    observer.notify(&ComparisonEvent::TierSkipped {
                        platform: query.platform,
                        provider: provider.name(),
                        reason: e.to_string(),
                    });
                    last_error = Some(e.to_string());
                }
                Err(e) => {
                    observer.notify(&ComparisonEvent::TierFailed {
                        platform: query.platform,
                        provider: provider.name(),
                        error: e.to_string(),
                    });
                    warnings.push(format!(
                        "{} {} failed: {}",
                        query.platform,
                        provider.name(),
                        e
                    ));
                    last_error = Some(e.to_string());
                }
            }
        }

        let error = match last_error {
            Some(error) => format!("No store version source succeeded (last: {})", error),
            None => "No store version sources configured".to_string(),
        };
        ChainOutcome::Exhausted { error, warnings }
    }
}
