//! Commit subject listing and head identification.

use git2::Repository;
use tracing::debug;

use crate::error::GitError;

/// Abbreviated hash length used for the dev-channel version suffix.
const SHORT_HASH_LEN: usize = 7;

/// List commit subjects between a tag (exclusive) and HEAD (inclusive).
///
/// Returns newest-first, matching `git log`; callers must not depend on the
/// order. If the tag cannot be resolved - the assumed `v0.0.0` baseline of an
/// untagged repository - the walk covers the entire history from HEAD, so the
/// commits of a never-released project still participate in classification.
pub fn commit_subjects_since(repo: &Repository, tag: &str) -> Result<Vec<String>, GitError> {
    let head_oid = repo
        .head()
        .ok()
        .and_then(|head| head.target())
        .ok_or(GitError::UnbornHead)?;

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push(head_oid).map_err(GitError::RevwalkError)?;

    match resolve_tag_commit(repo, tag) {
        Some(tag_oid) => {
            revwalk.hide(tag_oid).map_err(GitError::RevwalkError)?;
        }
        None => {
            debug!(tag, "Tag not found, walking full history from HEAD");
        }
    }

    let mut subjects = Vec::new();
    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ReadCommit)?;
        subjects.push(commit.summary().unwrap_or("").to_string());
    }

    Ok(subjects)
}

/// Get the commit identifier of HEAD, abbreviated to the conventional short
/// form when requested. `None` when the repository has no commits yet.
pub fn head_commit_id(repo: &Repository, short: bool) -> Result<Option<String>, GitError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => return Ok(None),
    };

    let full = head_oid.to_string();
    if short {
        Ok(Some(full[..SHORT_HASH_LEN].to_string()))
    } else {
        Ok(Some(full))
    }
}

/// Resolve a tag name to the commit it points at, peeling annotated tags.
fn resolve_tag_commit(repo: &Repository, tag: &str) -> Option<git2::Oid> {
    let reference = repo.find_reference(&format!("refs/tags/{tag}")).ok()?;
    reference.peel_to_commit().ok().map(|c| c.id())
}
