//! Store provider test utilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cap_version::store::{
    ComparisonEvent, ComparisonObserver, ProviderChain, ProviderTier, StoreError, StoreProvider,
    StoreQuery, StoreVersion,
};

/// What a [`StubProvider`] answers
#[derive(Debug, Clone)]
pub enum StubResponse {
    Version(StoreVersion),
    Unavailable,
    Fail(String),
}

/// Provider with a canned answer that counts its calls
pub struct StubProvider {
    tier: ProviderTier,
    name: &'static str,
    response: StubResponse,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(tier: ProviderTier, name: &'static str, response: StubResponse) -> Arc<Self> {
        Arc::new(Self {
            tier,
            name,
            response,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreProvider for StubProvider {
    fn tier(&self) -> ProviderTier {
        self.tier
    }

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_store_version(&self, _query: &StoreQuery) -> Result<StoreVersion, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            StubResponse::Version(version) => Ok(version.clone()),
            StubResponse::Unavailable => Err(StoreError::Unavailable("stub".to_string())),
            StubResponse::Fail(message) => Err(StoreError::InvalidResponse(message.clone())),
        }
    }
}

/// Observer that keeps every event
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ComparisonEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ComparisonEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ComparisonObserver for RecordingObserver {
    fn notify(&self, event: &ComparisonEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Chain over `providers` with a short timeout
pub fn chain(providers: Vec<Arc<dyn StoreProvider>>) -> ProviderChain {
    ProviderChain::new(providers, Duration::from_secs(5))
}
