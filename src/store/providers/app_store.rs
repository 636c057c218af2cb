//! iTunes lookup provider (public App Store data)

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ITUNES_BASE_URL;
use crate::project::types::Platform;
use crate::store::error::StoreError;
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::types::{ProviderTier, StoreVersion};

/// Response from the iTunes lookup API
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult {
    version: String,
    track_name: Option<String>,
}

/// Public tier for iOS.
///
/// Looks the app up by bundle id, then by numeric App Store id when one is
/// configured. An app that is not listed yet reports [`StoreVersion::unpublished`].
/// The lookup API exposes no build number, so the version doubles as build.
pub struct AppStoreLookupProvider {
    client: reqwest::Client,
    base_url: String,
    app_store_id: Option<String>,
}

impl AppStoreLookupProvider {
    /// Creates a new AppStoreLookupProvider with a custom base URL
    pub fn new(base_url: &str, app_store_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("cap-version")
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
            app_store_id,
        }
    }

    pub fn with_app_store_id(app_store_id: Option<String>) -> Self {
        Self::new(ITUNES_BASE_URL, app_store_id)
    }

    async fn lookup(&self, key: &str, value: &str) -> Result<Vec<LookupResult>, StoreError> {
        let url = format!("{}/lookup", self.base_url);
        debug!("Fetching App Store listing: {}?{}={}", url, key, value);

        let response = self
            .client
            .get(&url)
            .query(&[(key, value)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("iTunes lookup returned status {} for {}={}", status, key, value);
            return Err(StoreError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        // iTunes serves JSON as text/javascript, so parse the body by hand
        let body = response.text().await?;
        let lookup: LookupResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse iTunes lookup response: {}", e);
            StoreError::InvalidResponse(e.to_string())
        })?;

        Ok(lookup.results)
    }
}

impl Default for AppStoreLookupProvider {
    fn default() -> Self {
        Self::new(ITUNES_BASE_URL, None)
    }
}

#[async_trait::async_trait]
impl StoreProvider for AppStoreLookupProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Public
    }

    fn name(&self) -> &'static str {
        "iTunes lookup"
    }

    async fn fetch_store_version(&self, query: &StoreQuery) -> Result<StoreVersion, StoreError> {
        if query.platform != Platform::Ios {
            return Err(StoreError::Unavailable(format!(
                "no public lookup for {}",
                query.platform
            )));
        }

        if query.app_id.is_none() && self.app_store_id.is_none() {
            return Err(StoreError::MissingAppId(query.platform));
        }

        let mut results = Vec::new();
        if let Some(bundle_id) = &query.app_id {
            results = self.lookup("bundleId", bundle_id).await?;
        }
        if results.is_empty()
            && let Some(app_store_id) = &self.app_store_id
        {
            debug!("Retrying App Store lookup with id {}", app_store_id);
            results = self.lookup("id", app_store_id).await?;
        }

        let Some(app) = results.into_iter().next() else {
            info!("App not found in App Store (might not be published yet)");
            return Ok(StoreVersion::unpublished());
        };

        debug!(
            "Found app {} - version {}",
            app.track_name.as_deref().unwrap_or("<unnamed>"),
            app.version
        );
        Ok(StoreVersion::new(app.version.clone(), app.version))
    }
}
