//! Writing versions into a project
//!
//! A [`VersionUpdate`] is computed from the codec, turned into per-file
//! [`Substitution`]s by [`plan`], and written by [`apply`] through a
//! [`TextSubstitution`] implementation.

pub mod substitution;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub use substitution::{RegexSubstitution, Substitution, TextSubstitution};

use crate::config::INITIAL_VERSION;
use crate::project::Project;
use crate::project::types::{Platform, ProjectError};
use crate::version::codec::{BuildCode, HotfixStep, apply_hotfix_to_version, encode, next_hotfix};
use crate::version::error::VersionError;
use crate::version::semver::{BumpKind, SemanticVersion, increment_semantic};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to update {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid substitution pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Native projects an update is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSelection {
    Android,
    Ios,
    #[default]
    Both,
}

impl PlatformSelection {
    pub fn includes(self, platform: Platform) -> bool {
        match self {
            PlatformSelection::Both => true,
            PlatformSelection::Android => platform == Platform::Android,
            PlatformSelection::Ios => platform == Platform::Ios,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    pub platform: PlatformSelection,
    /// Also rewrite the `version` field of package.json
    pub update_package: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            platform: PlatformSelection::Both,
            update_package: true,
        }
    }
}

/// Version name and build code to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionUpdate {
    pub version: SemanticVersion,
    pub build: BuildCode,
}

impl VersionUpdate {
    /// Update to an explicit version.
    ///
    /// An explicit `build` is written as given. Otherwise `hotfix` (default 0)
    /// is encoded, with every full ten folded into the patch number.
    pub fn explicit(
        version: &str,
        build: Option<u64>,
        hotfix: Option<u64>,
    ) -> Result<Self, VersionError> {
        let version = SemanticVersion::parse(version)?;
        if let Some(build) = build {
            return Ok(Self {
                version,
                build: BuildCode(build),
            });
        }

        let (version, build) = apply_hotfix_to_version(&version, hotfix.unwrap_or(0))?;
        Ok(Self { version, build })
    }

    /// Bump one component of `current` and start at hotfix 0
    pub fn bump(current: &str, kind: BumpKind) -> Result<Self, VersionError> {
        let version = increment_semantic(current, kind)?;
        Ok(Self {
            build: encode(&version, 0)?,
            version,
        })
    }

    /// Next hotfix after `current_build`
    pub fn hotfix(current: &str, current_build: BuildCode) -> Result<(Self, HotfixStep), VersionError> {
        let step = next_hotfix(&SemanticVersion::parse(current)?, current_build)?;
        Ok((
            Self {
                version: step.version,
                build: step.build,
            },
            step,
        ))
    }

    pub fn reset() -> Result<Self, VersionError> {
        Self::explicit(INITIAL_VERSION, None, None)
    }
}

/// Substitutions to perform, grouped per file in write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub update: VersionUpdate,
    pub platform: PlatformSelection,
    pub edits: IndexMap<PathBuf, Vec<Substitution>>,
}

/// Files touched by [`apply`], relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub version: String,
    pub build: BuildCode,
    pub platform: PlatformSelection,
    pub files_changed: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
}

/// Build the substitutions that write `update` into `project`
pub fn plan(project: &Project, update: VersionUpdate, options: &UpdateOptions) -> UpdatePlan {
    let version = update.version.to_string();
    let build = update.build.to_string();
    let mut edits = IndexMap::new();

    if options.platform.includes(Platform::Android) {
        edits.insert(
            project.build_gradle_path(),
            vec![
                Substitution::all(r#"versionName\s+".*""#, format!(r#"versionName "{}""#, version)),
                Substitution::all(r"versionCode\s+\d+", format!("versionCode {}", build)),
                // Kotlin DSL assignments
                Substitution::all(
                    r#"versionName\s*=\s*".*""#,
                    format!(r#"versionName = "{}""#, version),
                ),
                Substitution::all(r"versionCode\s*=\s*\d+", format!("versionCode = {}", build)),
            ],
        );
    }

    if options.platform.includes(Platform::Ios) {
        edits.insert(
            project.pbxproj_path(),
            vec![
                Substitution::all(
                    r"MARKETING_VERSION = .*;",
                    format!("MARKETING_VERSION = {};", version),
                ),
                Substitution::all(
                    r"CURRENT_PROJECT_VERSION = .*;",
                    format!("CURRENT_PROJECT_VERSION = {};", build),
                ),
            ],
        );
    }

    if options.update_package {
        // First match only; nested objects may carry their own "version"
        edits.insert(
            project.package_json_path(),
            vec![Substitution::first(
                r#""version"\s*:\s*"[^"]*""#,
                format!(r#""version": "{}""#, version),
            )],
        );
    }

    UpdatePlan {
        update,
        platform: options.platform,
        edits,
    }
}

/// Write `plan` to disk. Files that do not exist are skipped.
pub fn apply(
    root: &Path,
    plan: &UpdatePlan,
    substitution: &dyn TextSubstitution,
) -> Result<UpdateReport, UpdateError> {
    let mut report = UpdateReport {
        version: plan.update.version.to_string(),
        build: plan.update.build,
        platform: plan.platform,
        files_changed: Vec::new(),
        files_skipped: Vec::new(),
    };

    for (path, edits) in &plan.edits {
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        if !path.is_file() {
            debug!("Skipping {:?}: file not found", relative);
            report.files_skipped.push(relative);
            continue;
        }

        let mut changed = false;
        for edit in edits {
            changed |= substitution.apply(path, edit)?;
        }
        if changed {
            info!("Updated {:?}", relative);
            report.files_changed.push(relative);
        }
    }

    Ok(report)
}
