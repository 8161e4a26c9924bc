//! Release-tag discovery.

use std::collections::HashMap;

use git2::Repository;
use semver::Version;
use tracing::{debug, warn};

use crate::error::GitError;
use crate::version::parse_base_version;

/// A git tag matching the release-tag naming pattern.
#[derive(Debug, Clone)]
pub struct ReleaseTag {
    pub name: String,
    pub oid: git2::Oid,
    pub version: Version,
}

/// Extract the version triplet from a release tag name.
///
/// Only `v` + exactly three dot-separated integers qualifies; pre-release
/// tags and bare triplets are not release tags in this scheme.
pub fn version_from_tag(tag_name: &str) -> Option<Version> {
    let raw = tag_name.strip_prefix('v')?;
    parse_base_version(raw).ok()
}

/// Get the most recent release tag reachable from HEAD.
///
/// Walks commits reachable from `HEAD` and returns the first commit that has
/// a release tag (`vX.Y.Z`) attached. Reachability matters: a newer tag on an
/// unmerged branch must not become the release baseline.
pub fn last_release_tag(repo: &Repository) -> Result<Option<ReleaseTag>, GitError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => return Ok(None),
    };

    let mut tags_by_commit: HashMap<git2::Oid, Vec<ReleaseTag>> = HashMap::new();
    for tag in collect_release_tags(repo)? {
        tags_by_commit.entry(tag.oid).or_default().push(tag);
    }

    if tags_by_commit.is_empty() {
        debug!("No release tags found in repository");
        return Ok(None);
    }

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push(head_oid).map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    for oid in revwalk {
        let oid = oid.map_err(GitError::RevwalkError)?;
        if let Some(candidates) = tags_by_commit.get(&oid) {
            let latest = candidates
                .iter()
                .max_by(|a, b| a.version.cmp(&b.version))
                .cloned();
            if let Some(tag) = latest {
                debug!(tag = %tag.name, "Found last reachable release tag");
                return Ok(Some(tag));
            }
        }
    }

    Ok(None)
}

/// Check whether a tag with the given name exists.
pub fn tag_exists(repo: &Repository, name: &str) -> Result<bool, GitError> {
    match repo.find_reference(&format!("refs/tags/{name}")) {
        Ok(_) => Ok(true),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
        Err(e) => Err(GitError::ReferenceNotFound(name.to_string(), e)),
    }
}

/// Collect all tags matching the release pattern, resolved to their commits.
fn collect_release_tags(repo: &Repository) -> Result<Vec<ReleaseTag>, GitError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            let name = name_str
                .strip_prefix("refs/tags/")
                .unwrap_or(name_str)
                .to_string();

            if let Some(version) = version_from_tag(&name) {
                // Resolve annotated tags to the commit they point at
                let resolved_oid = match repo.find_tag(oid) {
                    Ok(tag_obj) => tag_obj.target_id(),
                    Err(_) => oid, // lightweight tag
                };

                tags.push(ReleaseTag {
                    name,
                    oid: resolved_oid,
                    version,
                });
            }
        } else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
        }
        true // continue iteration
    })
    .map_err(GitError::RevwalkError)?;

    Ok(tags)
}
