//! Google Play Developer API provider
//!
//! Reads the production track through an edit session:
//! 1. `POST /androidpublisher/v3/applications/{package}/edits`
//! 2. `GET  .../edits/{editId}/tracks/production`
//!
//! The last release's first version code is the store build. The release
//! name is used as the version name when it is a plain `MAJOR.MINOR.PATCH`,
//! otherwise the name is derived from the version code.
//!
//! Minting OAuth tokens is out of scope: the provider only consumes an access
//! token handed to it through the environment or the credentials file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{
    GOOGLE_APPLICATION_CREDENTIALS_ENV, GOOGLE_PLAY_ACCESS_TOKEN_ENV, GOOGLE_PLAY_BASE_URL,
    GOOGLE_PLAY_CREDENTIALS_FILE,
};
use crate::store::error::StoreError;
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::types::{ProviderTier, StoreVersion};
use crate::version::codec::derive_version_name;
use crate::version::semver::SemanticVersion;

/// What was found when looking for Google Play credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Nothing configured; the tier is skipped
    Absent,
    /// Something is configured but unusable
    Invalid(String),
    Present { access_token: String },
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    access_token: Option<String>,
}

impl Credentials {
    /// Locate credentials from the environment and the project root
    pub fn locate(project_root: &Path) -> Self {
        Self::locate_with_env(
            std::env::var(GOOGLE_PLAY_ACCESS_TOKEN_ENV).ok(),
            std::env::var(GOOGLE_APPLICATION_CREDENTIALS_ENV).ok(),
            project_root,
        )
    }

    fn locate_with_env(
        access_token: Option<String>,
        credentials_path: Option<String>,
        project_root: &Path,
    ) -> Self {
        if let Some(access_token) = access_token.filter(|token| !token.trim().is_empty()) {
            return Credentials::Present { access_token };
        }

        let path = credentials_path
            .map(PathBuf::from)
            .unwrap_or_else(|| project_root.join(GOOGLE_PLAY_CREDENTIALS_FILE));

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Credentials::Absent,
            Err(e) => {
                return Credentials::Invalid(format!("could not read {}: {}", path.display(), e));
            }
        };

        match serde_json::from_str::<CredentialsFile>(&content) {
            Ok(CredentialsFile {
                access_token: Some(access_token),
            }) => Credentials::Present { access_token },
            Ok(_) => Credentials::Invalid(format!(
                "{} has no access_token; set {} to a Google Play access token",
                path.display(),
                GOOGLE_PLAY_ACCESS_TOKEN_ENV
            )),
            Err(e) => Credentials::Invalid(format!("could not parse {}: {}", path.display(), e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    #[serde(default)]
    releases: Vec<TrackRelease>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRelease {
    name: Option<String>,
    #[serde(default)]
    version_codes: Vec<String>,
}

/// Authenticated tier for Android
pub struct GooglePlayProvider {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl GooglePlayProvider {
    /// Creates a new GooglePlayProvider with a custom base URL
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("cap-version")
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
            credentials,
        }
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self::new(GOOGLE_PLAY_BASE_URL, credentials)
    }

    fn check_status(
        response: reqwest::Response,
        package_name: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::InvalidCredentials(format!(
                "Google Play API returned {}",
                status
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("Google Play API returned status {}: {}", status, response.url());
            return Err(StoreError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl StoreProvider for GooglePlayProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Authenticated
    }

    fn name(&self) -> &'static str {
        "Google Play API"
    }

    async fn fetch_store_version(&self, query: &StoreQuery) -> Result<StoreVersion, StoreError> {
        let access_token = match &self.credentials {
            Credentials::Absent => {
                return Err(StoreError::Unavailable(
                    "Google Play credentials not configured".to_string(),
                ));
            }
            Credentials::Invalid(reason) => {
                return Err(StoreError::InvalidCredentials(reason.clone()));
            }
            Credentials::Present { access_token } => access_token,
        };

        let package_name = query
            .app_id
            .as_deref()
            .ok_or(StoreError::MissingAppId(query.platform))?;
        let app_url = format!(
            "{}/androidpublisher/v3/applications/{}",
            self.base_url, package_name
        );

        debug!("Creating Google Play edit for {}", package_name);
        let response = self
            .client
            .post(format!("{}/edits", app_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let edit: EditResponse = Self::check_status(response, package_name)?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let response = self
            .client
            .get(format!("{}/edits/{}/tracks/production", app_url, edit.id))
            .bearer_auth(access_token)
            .send()
            .await?;
        let track: TrackResponse = Self::check_status(response, package_name)?
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let release = track
            .releases
            .last()
            .ok_or_else(|| StoreError::NotFound("no releases in production track".to_string()))?;
        let version_code = release.version_codes.first().ok_or_else(|| {
            StoreError::InvalidResponse("production release has no version codes".to_string())
        })?;

        let version_name = release
            .name
            .as_deref()
            .filter(|name| SemanticVersion::parse(name).is_ok())
            .map(str::to_string)
            .or_else(|| version_code.parse().ok().map(derive_version_name))
            .unwrap_or_else(|| version_code.clone());

        debug!(
            "Found Google Play version {} ({})",
            version_name, version_code
        );
        Ok(StoreVersion::new(version_name, version_code.clone()))
    }
}
