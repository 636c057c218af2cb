//! Comparison events
//!
//! The comparator never logs directly; it reports what happens to an
//! observer. [`TracingObserver`] forwards events to `tracing`, tests plug in
//! a recorder.

use tracing::{debug, info, warn};

use crate::project::types::Platform;
use crate::store::types::StoreVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonEvent {
    /// Native project absent, platform left out of the result
    PlatformSkipped { platform: Platform },
    /// Provider not configured for this platform
    TierSkipped {
        platform: Platform,
        provider: &'static str,
        reason: String,
    },
    /// Provider failed; the chain moves on
    TierFailed {
        platform: Platform,
        provider: &'static str,
        error: String,
    },
    /// A provider produced the store baseline
    Resolved {
        platform: Platform,
        provider: &'static str,
        store: StoreVersion,
    },
    /// No provider produced a baseline
    PlatformFailed { platform: Platform, error: String },
}

pub trait ComparisonObserver: Send + Sync {
    fn notify(&self, event: &ComparisonEvent);
}

/// Observer that writes events to the tracing subscriber
pub struct TracingObserver;

impl ComparisonObserver for TracingObserver {
    fn notify(&self, event: &ComparisonEvent) {
        match event {
            ComparisonEvent::PlatformSkipped { platform } => {
                debug!("No {} project found, skipping", platform);
            }
            ComparisonEvent::TierSkipped {
                platform,
                provider,
                reason,
            } => {
                debug!("{} {} skipped: {}", platform, provider, reason);
            }
            ComparisonEvent::TierFailed {
                platform,
                provider,
                error,
            } => {
                warn!("{} {} failed: {}", platform, provider, error);
            }
            ComparisonEvent::Resolved {
                platform,
                provider,
                store,
            } => {
                info!(
                    "{} store version {} (build {}) from {}",
                    platform, store.version, store.build, provider
                );
            }
            ComparisonEvent::PlatformFailed { platform, error } => {
                warn!("Could not resolve {} store version: {}", platform, error);
            }
        }
    }
}
