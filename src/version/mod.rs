//! Version codec
//!
//! Converts between semantic version strings and the numeric build codes
//! written into native projects, and computes version/hotfix increments.
//!
//! # Modules
//!
//! - [`semver`]: strict `MAJOR.MINOR.PATCH` parsing, bumps and loose ordering
//! - [`codec`]: build code encoding, decoding and hotfix arithmetic
//! - [`error`]: error type for malformed versions and out-of-range codes

pub mod codec;
pub mod error;
pub mod semver;

pub use codec::{
    BuildCode, BuildComponents, HotfixStep, apply_hotfix_to_version, decode, encode, encode_str,
    next_hotfix,
};
pub use error::VersionError;
pub use semver::{BumpKind, SemanticVersion, compare_versions, increment_semantic};
