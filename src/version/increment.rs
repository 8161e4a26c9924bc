//! Strict base-version parsing and semver incrementing.

use semver::Version;

use crate::error::VersionError;
use crate::version::bump::BumpCategory;

/// Parse a base version string as exactly three dot-separated non-negative
/// integers.
///
/// Stricter than [`Version::parse`]: pre-release identifiers and build
/// metadata are rejected, since the persisted base version must be a plain
/// release triplet. A malformed base version is a data-integrity problem
/// (e.g. a hand-edited version file) and must stop the release process.
pub fn parse_base_version(input: &str) -> Result<Version, VersionError> {
    let mut parts = input.split('.');
    let major = parts.next();
    let minor = parts.next();
    let patch = parts.next();

    if parts.next().is_some() {
        return Err(VersionError::InvalidFormat(input.to_string()));
    }

    match (
        major.and_then(parse_component),
        minor.and_then(parse_component),
        patch.and_then(parse_component),
    ) {
        (Some(major), Some(minor), Some(patch)) => Ok(Version::new(major, minor, patch)),
        _ => Err(VersionError::InvalidFormat(input.to_string())),
    }
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Apply a bump category to an already-parsed base version.
pub fn apply_bump(base: &Version, bump: BumpCategory) -> Version {
    match bump {
        BumpCategory::Major => Version::new(base.major + 1, 0, 0),
        BumpCategory::Minor => Version::new(base.major, base.minor + 1, 0),
        BumpCategory::Patch => Version::new(base.major, base.minor, base.patch + 1),
    }
}

/// Apply a bump category to a base version string, producing the next version.
///
/// Pure function: the base is parsed strictly (see [`parse_base_version`]) and
/// a fresh [`Version`] is returned.
pub fn increment_version(base: &str, bump: BumpCategory) -> Result<Version, VersionError> {
    let base = parse_base_version(base)?;
    Ok(apply_bump(&base, bump))
}
