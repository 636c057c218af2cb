//! Manual store baseline from `.store-versions.json`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{STORE_VERSIONS_FILE, StoreVersionsFile};
use crate::project::types::Platform;
use crate::store::error::StoreError;
use crate::store::provider::{StoreProvider, StoreQuery};
use crate::store::types::{ProviderTier, StoreVersion};

/// Read `.store-versions.json`; `Ok(None)` when the file does not exist
pub fn read_store_versions_file(path: &Path) -> Result<Option<StoreVersionsFile>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Config(format!(
                "Could not read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StoreError::Config(format!("Could not parse {}: {}", path.display(), e)))
}

/// Provider serving operator-pinned store versions
pub struct ManualOverrideProvider {
    path: PathBuf,
}

impl ManualOverrideProvider {
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(STORE_VERSIONS_FILE),
        }
    }
}

#[async_trait::async_trait]
impl StoreProvider for ManualOverrideProvider {
    fn tier(&self) -> ProviderTier {
        ProviderTier::Manual
    }

    fn name(&self) -> &'static str {
        "manual override"
    }

    async fn fetch_store_version(&self, query: &StoreQuery) -> Result<StoreVersion, StoreError> {
        let file = read_store_versions_file(&self.path)?
            .ok_or_else(|| StoreError::Unavailable(format!("no {}", STORE_VERSIONS_FILE)))?;

        let pinned = match query.platform {
            Platform::Android => file.store_versions.android,
            Platform::Ios => file.store_versions.ios,
        }
        .ok_or_else(|| {
            StoreError::Unavailable(format!(
                "no {} entry in {}",
                query.platform.as_str(),
                STORE_VERSIONS_FILE
            ))
        })?;

        debug!(
            "Using manual {} store version: {}",
            query.platform, pinned.version
        );
        Ok(StoreVersion::new(pinned.version, pinned.build))
    }
}
