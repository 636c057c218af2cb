use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for a single store lookup in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Project files
// =============================================================================

/// Manual store baseline, read from the project root
pub const STORE_VERSIONS_FILE: &str = ".store-versions.json";

/// Fallback location of Google Play credentials, relative to the project root
pub const GOOGLE_PLAY_CREDENTIALS_FILE: &str = "google-play-credentials.json";

/// Environment variable naming a Google credentials file
pub const GOOGLE_APPLICATION_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable carrying a ready Google Play access token
pub const GOOGLE_PLAY_ACCESS_TOKEN_ENV: &str = "GOOGLE_PLAY_ACCESS_TOKEN";

/// Version written by `reset` and assumed when package.json has none
pub const INITIAL_VERSION: &str = "0.0.1";

// =============================================================================
// Store endpoints
// =============================================================================

pub const GOOGLE_PLAY_BASE_URL: &str = "https://androidpublisher.googleapis.com";
pub const ITUNES_BASE_URL: &str = "https://itunes.apple.com";

/// Contents of `.store-versions.json`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreVersionsFile {
    pub store_versions: StoreVersionOverrides,
    /// Numeric App Store id, tried when the bundle id lookup finds nothing
    pub app_store_id: Option<String>,
}

/// Per-platform manual store baselines
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StoreVersionOverrides {
    pub android: Option<PinnedStoreVersion>,
    pub ios: Option<PinnedStoreVersion>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PinnedStoreVersion {
    pub version: String,
    #[serde(deserialize_with = "string_or_number")]
    pub build: String,
}

/// Builds are written both as `"100"` and `100` in hand-edited files.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Returns the path to the data directory for cap-version.
/// Uses $XDG_DATA_HOME/cap-version if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/cap-version,
/// or ./cap-version if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("cap-version.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("cap-version")
}
