//! Ecosystem-specific version string formatting.

use semver::Version;

/// Maven-style snapshot coordinate: `X.Y.Z-SNAPSHOT`.
///
/// A mutable pre-release coordinate for consumers that resolve
/// "latest unreleased build".
pub fn snapshot_version(next: &Version) -> String {
    format!("{next}-SNAPSHOT")
}

/// npm-style dev-channel version: `X.Y.Z-next.<hash>`.
///
/// An immutable pre-release identifier embedding the source revision, so one
/// unreleased build is distinguishable from another.
pub fn dev_channel_version(next: &Version, commit_hash: &str) -> String {
    format!("{next}-next.{commit_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_version() {
        let next = Version::new(1, 3, 0);
        assert_eq!(snapshot_version(&next), "1.3.0-SNAPSHOT");
    }

    #[test]
    fn test_dev_channel_version() {
        let next = Version::new(1, 3, 0);
        assert_eq!(dev_channel_version(&next, "abc1234"), "1.3.0-next.abc1234");
    }
}
