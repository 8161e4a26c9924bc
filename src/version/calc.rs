//! Next-version calculation from repository state.

use semver::Version;
use tracing::debug;

use crate::error::VersionError;
use crate::git::SourceControl;
use crate::version::bump::{aggregate_bump, BumpCategory};
use crate::version::format::{dev_channel_version, snapshot_version};
use crate::version::increment::{apply_bump, parse_base_version};

/// Tag assumed as the release baseline when no release tag exists yet.
/// Never created, only used as the lower bound of the commit range.
pub const BASELINE_TAG: &str = "v0.0.0";

/// Everything derived by one next-version calculation.
///
/// Computed fresh per invocation; persisting the chosen version is the
/// caller's concern, never this module's.
#[derive(Debug, Clone)]
pub struct VersionCalculation {
    /// Version read from the persisted version file.
    pub base_version: Version,
    /// Base version after applying the resolved bump.
    pub next_version: Version,
    /// Maven coordinate: `X.Y.Z-SNAPSHOT`.
    pub snapshot_version: String,
    /// npm dev-channel version: `X.Y.Z-next.<hash>`.
    pub dev_version: String,
    /// Commit subjects consumed by the aggregation, in the order supplied.
    pub commits: Vec<String>,
    /// Resolved bump category.
    pub bump: BumpCategory,
    /// Last release tag consulted, if one existed.
    pub last_tag: Option<String>,
}

/// Calculate the next version from conventional commits since the last
/// release tag.
///
/// Source-control faults degrade to `Ok(None)`: "cannot calculate a next
/// version" is a legitimate outcome for the caller to present, not a crash.
/// Only a malformed `base_version` is a hard error, since that indicates a
/// corrupted version file the release process must not paper over.
pub fn calculate_next_version<S: SourceControl>(
    source: &S,
    base_version: &str,
) -> Result<Option<VersionCalculation>, VersionError> {
    let last_tag = match source.last_release_tag() {
        Ok(tag) => tag,
        Err(e) => {
            debug!("Could not query last release tag: {e}");
            return Ok(None);
        }
    };

    let since = last_tag.as_deref().unwrap_or(BASELINE_TAG);
    let commits = match source.commits_since(since) {
        Ok(commits) => commits,
        Err(e) => {
            debug!("Could not list commits since {since}: {e}");
            return Ok(None);
        }
    };

    let bump = aggregate_bump(&commits);

    let base = parse_base_version(base_version)?;
    let next = apply_bump(&base, bump);

    let commit_hash = match source.head_commit_id(true) {
        Ok(Some(hash)) => hash,
        Ok(None) => "unknown".to_string(),
        Err(e) => {
            debug!("Could not read head commit id: {e}");
            "unknown".to_string()
        }
    };

    Ok(Some(VersionCalculation {
        snapshot_version: snapshot_version(&next),
        dev_version: dev_channel_version(&next, &commit_hash),
        base_version: base,
        next_version: next,
        commits,
        bump,
        last_tag,
    }))
}
