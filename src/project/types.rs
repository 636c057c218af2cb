//! Common types for project inspection

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::codec::BuildCode;
use crate::version::error::VersionError;

/// Native target of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Google Play (android/app/build.gradle)
    Android,
    /// App Store (ios/App)
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Android, Platform::Ios];

    /// Returns the string representation of the platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    /// Human-facing name used in warnings and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            _ => Err(()),
        }
    }
}

/// Fields of package.json this tool cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: String,
}

/// Snapshot of the project's current version state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: Option<String>,
    pub version: String,
    pub build: BuildCode,
    /// Native projects present on disk
    pub platforms: Vec<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_bundle_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Could not find package.json at {0}")]
    ManifestNotFound(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package.json at {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error(transparent)]
    Version(#[from] VersionError),
}
