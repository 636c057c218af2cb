//! Provider trait for looking up the version currently live in a store

#[cfg(test)]
use mockall::automock;

use crate::project::types::Platform;
use crate::store::error::StoreError;
use crate::store::types::{ProviderTier, StoreVersion};

/// What a provider is asked to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub platform: Platform,
    /// Android application id or iOS bundle id, when it could be resolved
    pub app_id: Option<String>,
}

impl StoreQuery {
    pub fn new(platform: Platform, app_id: Option<String>) -> Self {
        Self { platform, app_id }
    }
}

/// One tier of the store-version fallback chain
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait StoreProvider: Send + Sync {
    /// Returns the tier this provider occupies in the chain
    fn tier(&self) -> ProviderTier;

    /// Short label for logs and warnings
    fn name(&self) -> &'static str;

    /// Fetches the store version for the queried platform
    ///
    /// # Returns
    /// * `Ok(StoreVersion)` - The store baseline according to this source
    /// * `Err(StoreError::Unavailable)` - This source is not configured; the
    ///   next tier should be tried silently
    /// * `Err(_)` - The source failed; the next tier should be tried and the
    ///   failure reported
    async fn fetch_store_version(&self, query: &StoreQuery) -> Result<StoreVersion, StoreError>;
}
