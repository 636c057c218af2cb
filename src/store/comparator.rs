//! Publish gating against the stores
//!
//! For each platform with a native project, the comparator walks that
//! platform's [`ProviderChain`] and checks the local version against the
//! resulting store baseline. Android and iOS are evaluated concurrently;
//! a platform whose chain is exhausted is reported as failed and blocks
//! publishing, but never aborts the comparison.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join;

use crate::config::{FETCH_TIMEOUT_MS, STORE_VERSIONS_FILE};
use crate::project::Project;
use crate::project::types::{Platform, ProjectError};
use crate::store::chain::{ChainOutcome, ProviderChain};
use crate::store::observer::{ComparisonEvent, ComparisonObserver, TracingObserver};
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::providers::{
    AppStoreLookupProvider, Credentials, DefaultPolicy, DefaultPolicyProvider, GooglePlayProvider,
    ManualOverrideProvider, read_store_versions_file,
};
use crate::store::types::{ComparisonResult, StoreVersionInfo};
use crate::version::codec::encode_str;
use crate::version::semver::compare_versions;

/// Knobs for the default provider chains
#[derive(Debug, Clone)]
pub struct CompareSettings {
    /// Upper bound for each provider call
    pub timeout: Duration,
    pub default_policy: DefaultPolicy,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
            default_policy: DefaultPolicy::default(),
        }
    }
}

/// Compare build identifiers numerically; `None` when either is not an integer
pub fn build_ordering(local_build: &str, store_build: &str) -> Option<Ordering> {
    let local: u64 = local_build.trim().parse().ok()?;
    let store: u64 = store_build.trim().parse().ok()?;
    Some(local.cmp(&store))
}

/// Whether the local version/build is strictly newer than the store's.
///
/// Versions decide first. On equal versions the builds decide, and builds
/// that cannot both be read as integers count as local being newer.
pub fn is_newer(local_version: &str, local_build: &str, store_version: &str, store_build: &str) -> bool {
    match compare_versions(local_version, store_version) {
        Ordering::Equal => build_ordering(local_build, store_build)
            .map(Ordering::is_gt)
            .unwrap_or(true),
        ordering => ordering.is_gt(),
    }
}

/// Entry for one platform plus the messages it contributes to the result
struct PlatformEvaluation {
    info: StoreVersionInfo,
    warnings: Vec<String>,
    errors: Vec<String>,
}

pub struct StoreComparator {
    project: Project,
    chains: HashMap<Platform, ProviderChain>,
    observer: Arc<dyn ComparisonObserver>,
}

impl StoreComparator {
    /// Comparator with the standard chains, logging through `tracing`
    pub fn new(project: Project, settings: &CompareSettings) -> Self {
        let chains = Self::default_chains(&project, settings);
        Self::build(project, chains, Arc::new(TracingObserver))
    }

    /// Build a comparator with custom chains and observer
    pub fn build(
        project: Project,
        chains: HashMap<Platform, ProviderChain>,
        observer: Arc<dyn ComparisonObserver>,
    ) -> Self {
        Self {
            project,
            chains,
            observer,
        }
    }

    /// Android: manual, Google Play API, default.
    /// iOS: manual, iTunes lookup, default.
    fn default_chains(
        project: &Project,
        settings: &CompareSettings,
    ) -> HashMap<Platform, ProviderChain> {
        let root = project.root();
        let app_store_id = read_store_versions_file(&root.join(STORE_VERSIONS_FILE))
            .ok()
            .flatten()
            .and_then(|file| file.app_store_id);

        let manual: Arc<dyn StoreProvider> = Arc::new(ManualOverrideProvider::new(root));
        let fallback: Arc<dyn StoreProvider> =
            Arc::new(DefaultPolicyProvider::new(settings.default_policy.clone()));

        HashMap::from([
            (
                Platform::Android,
                ProviderChain::new(
                    vec![
                        manual.clone(),
                        Arc::new(GooglePlayProvider::with_credentials(Credentials::locate(
                            root,
                        ))),
                        fallback.clone(),
                    ],
                    settings.timeout,
                ),
            ),
            (
                Platform::Ios,
                ProviderChain::new(
                    vec![
                        manual,
                        Arc::new(AppStoreLookupProvider::with_app_store_id(app_store_id)),
                        fallback,
                    ],
                    settings.timeout,
                ),
            ),
        ])
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Compare the local version with every store that has a native project.
    ///
    /// Provider failures end up in the result's warnings; only an unreadable
    /// or malformed local manifest is an error.
    pub async fn compare_with_stores(&self) -> Result<ComparisonResult, ProjectError> {
        let local_version = self.project.read_local_version()?;
        let local_build = encode_str(&local_version, 0)?.to_string();

        let (android, ios) = join(
            self.evaluate(Platform::Android, &local_version, &local_build),
            self.evaluate(Platform::Ios, &local_version, &local_build),
        )
        .await;

        let mut result = ComparisonResult::new(&local_version, &local_build);
        for evaluation in [android, ios].into_iter().flatten() {
            result.warnings.extend(evaluation.warnings);
            result.errors.extend(evaluation.errors);
            result.record(evaluation.info);
        }

        Ok(result)
    }

    async fn evaluate(
        &self,
        platform: Platform,
        local_version: &str,
        local_build: &str,
    ) -> Option<PlatformEvaluation> {
        if !self.project.has_platform(platform) {
            self.observer
                .notify(&ComparisonEvent::PlatformSkipped { platform });
            return None;
        }

        let local_build = self
            .project
            .native_build(platform)
            .map(|code| code.to_string())
            .unwrap_or_else(|| local_build.to_string());
        let query = StoreQuery::new(platform, self.project.app_identifier(platform));

        let outcome = match self.chains.get(&platform) {
            Some(chain) => chain.first_success(&query, self.observer.as_ref()).await,
            None => ChainOutcome::Exhausted {
                error: "No store version sources configured".to_string(),
                warnings: Vec::new(),
            },
        };

        Some(self.assess(platform, local_version, &local_build, outcome))
    }

    fn assess(
        &self,
        platform: Platform,
        local_version: &str,
        local_build: &str,
        outcome: ChainOutcome,
    ) -> PlatformEvaluation {
        match outcome {
            ChainOutcome::Resolved {
                store,
                tier,
                mut warnings,
            } => {
                let mut errors = Vec::new();
                let is_newer = is_newer(local_version, local_build, &store.version, &store.build);

                if compare_versions(local_version, &store.version).is_eq()
                    && build_ordering(local_build, &store.build).is_none()
                {
                    warnings.push(format!(
                        "{} builds {:?} and {:?} are not comparable; assuming local is newer",
                        platform, local_build, store.build
                    ));
                }
                if !is_newer {
                    errors.push(format!(
                        "{} version {} ({}) is not newer than store version {} ({})",
                        platform, local_version, local_build, store.version, store.build
                    ));
                }

                PlatformEvaluation {
                    info: StoreVersionInfo {
                        platform,
                        local_version: local_version.to_string(),
                        local_build: local_build.to_string(),
                        store_version: Some(store.version),
                        store_build: Some(store.build),
                        is_newer,
                        source: Some(tier),
                        error: None,
                    },
                    warnings,
                    errors,
                }
            }
            ChainOutcome::Exhausted {
                error,
                mut warnings,
            } => {
                self.observer.notify(&ComparisonEvent::PlatformFailed {
                    platform,
                    error: error.clone(),
                });
                warnings.push(format!(
                    "Could not fetch {} store version: {}",
                    platform, error
                ));

                PlatformEvaluation {
                    info: StoreVersionInfo {
                        platform,
                        local_version: local_version.to_string(),
                        local_build: local_build.to_string(),
                        store_version: None,
                        store_build: None,
                        is_newer: false,
                        source: None,
                        error: Some(error),
                    },
                    warnings,
                    errors: Vec::new(),
                }
            }
        }
    }
}
