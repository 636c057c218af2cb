use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::version::error::VersionError;

/// A strict `MAJOR.MINOR.PATCH` version.
///
/// Pre-release and build metadata suffixes are rejected: store listings and
/// native projects only carry the plain numeric triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Which component a semantic bump targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn parse(version: &str) -> Result<Self, VersionError> {
        version.parse()
    }

    /// Standard semantic bump; lower components reset to zero.
    pub fn bump(self, kind: BumpKind) -> Result<Self, VersionError> {
        let bumped = match kind {
            BumpKind::Major => Self::new(
                self.major.checked_add(1).ok_or(VersionError::Overflow)?,
                0,
                0,
            ),
            BumpKind::Minor => Self::new(
                self.major,
                self.minor.checked_add(1).ok_or(VersionError::Overflow)?,
                0,
            ),
            BumpKind::Patch => Self::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or(VersionError::Overflow)?,
            ),
        };
        Ok(bumped)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidVersionFormat(s.to_string());

        let parsed = Version::parse(s.trim()).map_err(|_| invalid())?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(parsed.major, parsed.minor, parsed.patch))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<SemanticVersion> for Version {
    fn from(value: SemanticVersion) -> Self {
        Version::new(value.major, value.minor, value.patch)
    }
}

/// Parse and bump a version string in one step
pub fn increment_semantic(version: &str, kind: BumpKind) -> Result<SemanticVersion, VersionError> {
    SemanticVersion::parse(version)?.bump(kind)
}

/// Compare two dotted version strings component by component.
///
/// Unlike [`SemanticVersion::parse`] this accepts any arity, since store
/// listings are not always three components ("1.2", "1.2.3.4"). Missing or
/// non-numeric components count as zero.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    fn components(version: &str) -> Vec<u64> {
        version
            .trim()
            .split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect()
    }

    let left = components(left);
    let right = components(right);
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
