//! Project layer
//! - types.rs: Platform, PackageManifest, ProjectError
//! - native.rs: build.gradle / project.pbxproj / capacitor.config readers
//!
//! [`Project`] is the only place that touches the app's files on disk for
//! reading; everything above it works on plain values.

pub mod native;
pub mod types;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

pub use native::NativeReader;
pub use types::{PackageManifest, Platform, ProjectError, ProjectInfo};

use crate::config::INITIAL_VERSION;
use crate::version::codec::{BuildCode, encode_str};

/// A Capacitor app project rooted at a directory
pub struct Project {
    root: PathBuf,
    reader: NativeReader,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reader: NativeReader::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_json_path(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn build_gradle_path(&self) -> PathBuf {
        self.root.join("android").join("app").join("build.gradle")
    }

    pub fn pbxproj_path(&self) -> PathBuf {
        self.root
            .join("ios")
            .join("App")
            .join("App.xcodeproj")
            .join("project.pbxproj")
    }

    /// Whether the native project for `platform` has been generated
    pub fn has_platform(&self, platform: Platform) -> bool {
        match platform {
            Platform::Android => self.build_gradle_path().is_file(),
            Platform::Ios => self.root.join("ios").join("App").is_dir(),
        }
    }

    pub fn read_manifest(&self) -> Result<PackageManifest, ProjectError> {
        let path = self.package_json_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProjectError::ManifestNotFound(path));
            }
            Err(source) => return Err(ProjectError::Io { path, source }),
        };

        let raw: RawManifest =
            serde_json::from_str(&content).map_err(|e| ProjectError::InvalidManifest {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(PackageManifest {
            name: raw.name,
            version: raw.version.unwrap_or_else(|| INITIAL_VERSION.to_string()),
        })
    }

    /// Local version string from package.json
    pub fn read_local_version(&self) -> Result<String, ProjectError> {
        self.read_manifest().map(|manifest| manifest.version)
    }

    /// Build code currently written in the native project, if any
    pub fn native_build(&self, platform: Platform) -> Option<BuildCode> {
        let code = match platform {
            Platform::Android => self
                .read_optional(&self.build_gradle_path())
                .and_then(|content| self.reader.version_code(&content)),
            Platform::Ios => self
                .read_optional(&self.pbxproj_path())
                .and_then(|content| self.reader.project_version(&content)),
        };
        code.map(BuildCode)
    }

    /// Current build code of the app.
    ///
    /// Prefers the value written in the native projects (Android first) and
    /// falls back to the build code of `version` with hotfix 0.
    pub fn current_build(&self, version: &str) -> Result<BuildCode, ProjectError> {
        if let Some(code) = Platform::ALL
            .into_iter()
            .find_map(|platform| self.native_build(platform))
        {
            return Ok(code);
        }
        Ok(encode_str(version, 0)?)
    }

    pub fn info(&self) -> Result<ProjectInfo, ProjectError> {
        let manifest = self.read_manifest()?;
        let build = self.current_build(&manifest.version)?;

        Ok(ProjectInfo {
            name: manifest.name,
            version: manifest.version,
            build,
            platforms: Platform::ALL
                .into_iter()
                .filter(|platform| self.has_platform(*platform))
                .collect(),
            android_app_id: self.android_application_id(),
            ios_bundle_id: self.ios_bundle_id(),
        })
    }

    /// Identifier used to look the app up in `platform`'s store
    pub fn app_identifier(&self, platform: Platform) -> Option<String> {
        match platform {
            Platform::Android => self.android_application_id(),
            Platform::Ios => self.ios_bundle_id(),
        }
    }

    pub fn android_application_id(&self) -> Option<String> {
        let content = self.read_optional(&self.build_gradle_path())?;
        let app_id = self.reader.application_id(&content);
        match &app_id {
            Some(id) => debug!("Found Android app id: {}", id),
            None => debug!("Could not find applicationId in build.gradle"),
        }
        app_id
    }

    /// Bundle id from capacitor.config.ts, then capacitor.config.json
    pub fn ios_bundle_id(&self) -> Option<String> {
        let from_ts = self
            .read_optional(&self.root.join("capacitor.config.ts"))
            .and_then(|content| self.reader.capacitor_ts_app_id(&content));
        if from_ts.is_some() {
            return from_ts;
        }

        let from_json = self
            .read_optional(&self.root.join("capacitor.config.json"))
            .and_then(|content| self.reader.capacitor_json_app_id(&content));
        if from_json.is_none() {
            debug!("Could not find iOS bundle id in Capacitor config files");
        }
        from_json
    }

    fn read_optional(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path)
            .inspect_err(|e| {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Failed to read {:?}: {}", path, e);
                }
            })
            .ok()
    }
}
