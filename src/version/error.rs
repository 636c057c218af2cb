use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format: {0:?} (expected MAJOR.MINOR.PATCH)")]
    InvalidVersionFormat(String),

    #[error("Hotfix {0} is out of range (expected 0-9)")]
    HotfixOutOfRange(u64),

    #[error("{component} component of {version} does not fit in the build code")]
    ComponentOutOfRange {
        version: String,
        component: &'static str,
    },

    #[error("Build code {build} does not belong to version {version}")]
    BuildCodeMismatch { version: String, build: u64 },

    #[error("Version arithmetic overflow")]
    Overflow,
}
