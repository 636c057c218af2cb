//! Build code encoding
//!
//! A build code packs a version and a hotfix counter into one integer:
//!
//! ```text
//! major * 1_000_000 + minor * 1_000 + patch * 10 + hotfix
//! ```
//!
//! `1.2.5` hotfix 3 becomes `1002053`. Android `versionCode` and iOS
//! `CURRENT_PROJECT_VERSION` both require a strictly increasing integer, so
//! the encoding must stay monotonic in (major, minor, patch, hotfix). Each
//! group owns a fixed decimal width; values that would spill into the
//! neighbouring group are rejected instead of wrapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::error::VersionError;
use crate::version::semver::SemanticVersion;

const MAJOR_FACTOR: u64 = 1_000_000;
const MINOR_FACTOR: u64 = 1_000;
const PATCH_FACTOR: u64 = 10;

/// Highest hotfix that fits in the last digit
pub const MAX_HOTFIX: u64 = 9;

/// Exclusive upper bounds of the minor and patch groups
const MINOR_LIMIT: u64 = 1_000;
const PATCH_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildCode(pub u64);

impl BuildCode {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BuildCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BuildCode {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Components recovered from a build code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildComponents {
    pub version: SemanticVersion,
    pub hotfix: u64,
}

/// Outcome of advancing the hotfix counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotfixStep {
    pub version: SemanticVersion,
    pub build: BuildCode,
    /// True when the hotfix overflowed into a patch bump, so the version
    /// string itself must be rewritten and not just the build number.
    pub version_changed: bool,
    /// Hotfix digit before the step
    pub previous_hotfix: u64,
}

pub fn encode(version: &SemanticVersion, hotfix: u64) -> Result<BuildCode, VersionError> {
    if hotfix > MAX_HOTFIX {
        return Err(VersionError::HotfixOutOfRange(hotfix));
    }
    if version.minor >= MINOR_LIMIT {
        return Err(VersionError::ComponentOutOfRange {
            version: version.to_string(),
            component: "minor",
        });
    }
    if version.patch >= PATCH_LIMIT {
        return Err(VersionError::ComponentOutOfRange {
            version: version.to_string(),
            component: "patch",
        });
    }

    version
        .major
        .checked_mul(MAJOR_FACTOR)
        .and_then(|code| code.checked_add(version.minor * MINOR_FACTOR))
        .and_then(|code| code.checked_add(version.patch * PATCH_FACTOR))
        .and_then(|code| code.checked_add(hotfix))
        .map(BuildCode)
        .ok_or(VersionError::Overflow)
}

/// Parse a version string and encode it
pub fn encode_str(version: &str, hotfix: u64) -> Result<BuildCode, VersionError> {
    encode(&SemanticVersion::parse(version)?, hotfix)
}

pub fn decode(code: BuildCode) -> BuildComponents {
    let code = code.0;
    BuildComponents {
        version: SemanticVersion::new(
            code / MAJOR_FACTOR,
            (code / MINOR_FACTOR) % MINOR_LIMIT,
            (code / PATCH_FACTOR) % PATCH_LIMIT,
        ),
        hotfix: code % PATCH_FACTOR,
    }
}

/// Advance the hotfix counter of `current_build`.
///
/// Hotfix 9 or above rolls over into a patch bump with hotfix reset to 0.
/// Only a build below the version's base code is rejected.
pub fn next_hotfix(
    current_version: &SemanticVersion,
    current_build: BuildCode,
) -> Result<HotfixStep, VersionError> {
    let base = encode(current_version, 0)?;
    let current_hotfix = current_build
        .0
        .checked_sub(base.0)
        .ok_or_else(|| VersionError::BuildCodeMismatch {
            version: current_version.to_string(),
            build: current_build.0,
        })?;

    if current_hotfix >= MAX_HOTFIX {
        let version = SemanticVersion::new(
            current_version.major,
            current_version.minor,
            current_version.patch + 1,
        );
        return Ok(HotfixStep {
            version,
            build: encode(&version, 0)?,
            version_changed: true,
            previous_hotfix: current_hotfix,
        });
    }

    Ok(HotfixStep {
        version: *current_version,
        build: encode(current_version, current_hotfix + 1)?,
        version_changed: false,
        previous_hotfix: current_hotfix,
    })
}

/// Apply an explicit hotfix number, folding every full ten into the patch.
///
/// Hotfix 23 on `1.2.3` yields `1.2.5` hotfix 3.
pub fn apply_hotfix_to_version(
    version: &SemanticVersion,
    hotfix_number: u64,
) -> Result<(SemanticVersion, BuildCode), VersionError> {
    let patch_increments = hotfix_number / (MAX_HOTFIX + 1);
    let remaining_hotfix = hotfix_number % (MAX_HOTFIX + 1);

    let patch = version
        .patch
        .checked_add(patch_increments)
        .ok_or(VersionError::Overflow)?;
    let version = SemanticVersion::new(version.major, version.minor, patch);
    let build = encode(&version, remaining_hotfix)?;

    Ok((version, build))
}

/// Render a build code as a `major.minor.patch` version name.
///
/// Used when a store reports only the numeric code. Codes below 10 carry no
/// version information and are returned verbatim.
pub fn derive_version_name(code: u64) -> String {
    if code < PATCH_FACTOR {
        return code.to_string();
    }
    decode(BuildCode(code)).version.to_string()
}
