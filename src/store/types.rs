//! Comparison data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::types::Platform;

/// Version/build pair reported by a store source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreVersion {
    pub version: String,
    pub build: String,
}

impl StoreVersion {
    pub fn new(version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build: build.into(),
        }
    }

    /// Baseline of an app that has never been published
    pub fn unpublished() -> Self {
        Self::new("0.0.0", "0")
    }
}

/// Source of store-version truth, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTier {
    /// Operator-pinned values from `.store-versions.json`
    Manual,
    /// Store API that needs credentials
    Authenticated,
    /// Unauthenticated public lookup
    Public,
    /// Injected default policy
    Default,
}

impl ProviderTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTier::Manual => "manual",
            ProviderTier::Authenticated => "authenticated",
            ProviderTier::Public => "public",
            ProviderTier::Default => "default",
        }
    }
}

/// Per-platform comparison entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreVersionInfo {
    pub platform: Platform,
    pub local_version: String,
    pub local_build: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_build: Option<String>,
    pub is_newer: bool,
    /// Tier that produced the store values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate verdict of a store comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub local_version: String,
    pub local_build: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<StoreVersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<StoreVersionInfo>,
    pub can_publish: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

impl ComparisonResult {
    pub fn new(local_version: impl Into<String>, local_build: impl Into<String>) -> Self {
        Self {
            local_version: local_version.into(),
            local_build: local_build.into(),
            android: None,
            ios: None,
            can_publish: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    pub fn platform(&self, platform: Platform) -> Option<&StoreVersionInfo> {
        match platform {
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        }
    }

    /// Store a platform entry; publishing stays allowed only while every
    /// entry is newer than its store.
    pub fn record(&mut self, info: StoreVersionInfo) {
        self.can_publish &= info.is_newer;
        match info.platform {
            Platform::Android => self.android = Some(info),
            Platform::Ios => self.ios = Some(info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(platform: Platform, is_newer: bool) -> StoreVersionInfo {
        StoreVersionInfo {
            platform,
            local_version: "1.0.0".to_string(),
            local_build: "1000000".to_string(),
            store_version: Some("0.9.0".to_string()),
            store_build: Some("900000".to_string()),
            is_newer,
            source: Some(ProviderTier::Manual),
            error: None,
        }
    }

    #[test]
    fn empty_result_can_publish() {
        let result = ComparisonResult::new("1.0.0", "1000000");

        assert!(result.can_publish);
        assert!(result.android.is_none());
        assert!(result.ios.is_none());
    }

    #[test]
    fn record_blocks_publish_when_any_platform_is_not_newer() {
        let mut result = ComparisonResult::new("1.0.0", "1000000");

        result.record(info(Platform::Android, true));
        assert!(result.can_publish);

        result.record(info(Platform::Ios, false));
        assert!(!result.can_publish);
        assert_eq!(result.platform(Platform::Ios).map(|i| i.is_newer), Some(false));
    }

    #[test]
    fn serializes_with_camel_case_and_skips_absent_fields() {
        let mut result = ComparisonResult::new("1.0.0", "1000000");
        result.record(info(Platform::Android, true));

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["localVersion"], "1.0.0");
        assert_eq!(json["canPublish"], true);
        assert_eq!(json["android"]["platform"], "android");
        assert_eq!(json["android"]["storeBuild"], "900000");
        assert_eq!(json["android"]["source"], "manual");
        assert!(json["android"].get("error").is_none());
        assert!(json.get("ios").is_none());
    }
}
