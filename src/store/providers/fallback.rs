//! Last-resort tier

use crate::store::error::StoreError;
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::types::{ProviderTier, StoreVersion};

/// What to assume when no real store data could be obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Report this baseline so comparison can proceed
    AssumePublishable(StoreVersion),
    /// Report nothing; the platform ends up failed and blocks publishing
    Refuse,
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        DefaultPolicy::AssumePublishable(StoreVersion::unpublished())
    }
}

pub struct DefaultPolicyProvider {
    policy: DefaultPolicy,
}

impl DefaultPolicyProvider {
    pub fn new(policy: DefaultPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait::async_trait]
impl StoreProvider for DefaultPolicyProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Default
    }

    fn name(&self) -> &'static str {
        "default policy"
    }

    async fn fetch_store_version(&self, _query: &StoreQuery) -> Result<StoreVersion, StoreError> {
        match &self.policy {
            DefaultPolicy::AssumePublishable(baseline) => Ok(baseline.clone()),
            DefaultPolicy::Refuse => Err(StoreError::Unavailable(
                "strict policy refuses to assume a store version".to_string(),
            )),
        }
    }
}
