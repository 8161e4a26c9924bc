//! Git operations using git2-rs, plus the source-control collaborator trait.

pub mod commits;
pub mod push;
pub mod tags;

use std::path::Path;

use git2::Repository;

use crate::error::GitError;

pub use commits::{commit_subjects_since, head_commit_id};
pub use push::{push_branch_and_tag, working_tree_changes};
pub use tags::{last_release_tag, tag_exists, version_from_tag, ReleaseTag};

/// Source-control queries consumed by the version-calculation engine.
///
/// Kept behind a trait so the calculation can be exercised without a real
/// repository.
#[cfg_attr(test, mockall::automock)]
pub trait SourceControl {
    /// Most recent tag matching the release pattern (`vX.Y.Z`) reachable
    /// from HEAD, or `None` if no such tag exists.
    fn last_release_tag(&self) -> Result<Option<String>, GitError>;

    /// Commit subject lines between `tag` (exclusive) and HEAD (inclusive).
    /// Empty when there are no commits in the range.
    fn commits_since(&self, tag: &str) -> Result<Vec<String>, GitError>;

    /// Revision identifier of the current HEAD, abbreviated when `short`.
    fn head_commit_id(&self, short: bool) -> Result<Option<String>, GitError>;
}

/// [`SourceControl`] implementation over a real git repository.
pub struct GitSourceControl {
    repo: Repository,
}

impl GitSourceControl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the repository at `root`.
    pub fn open(root: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(root).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }
}

impl SourceControl for GitSourceControl {
    fn last_release_tag(&self) -> Result<Option<String>, GitError> {
        Ok(tags::last_release_tag(&self.repo)?.map(|tag| tag.name))
    }

    fn commits_since(&self, tag: &str) -> Result<Vec<String>, GitError> {
        commits::commit_subjects_since(&self.repo, tag)
    }

    fn head_commit_id(&self, short: bool) -> Result<Option<String>, GitError> {
        commits::head_commit_id(&self.repo, short)
    }
}
