//! Store comparison
//!
//! Looks up what is live on Google Play and the App Store and decides
//! whether the local version may be published.

pub mod chain;
pub mod comparator;
pub mod error;
pub mod observer;
pub mod provider;
pub mod providers;
pub mod types;

pub use chain::{ChainOutcome, ProviderChain};
pub use comparator::{CompareSettings, StoreComparator, is_newer};
pub use error::StoreError;
pub use observer::{ComparisonEvent, ComparisonObserver, TracingObserver};
pub use provider::{StoreProvider, StoreQuery};
pub use types::{ComparisonResult, ProviderTier, StoreVersion, StoreVersionInfo};
