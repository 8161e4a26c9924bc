//! System git invocations: push and working-tree status.
//!
//! These shell out to the system `git` binary, inheriting the user's existing
//! git config, SSH agent, and credential store.

use std::path::Path;
use std::process::Command;

use crate::error::GitError;

/// Push a branch and a release tag to the remote.
///
/// Pushed separately so a branch push failure is reported before the tag is
/// attempted, mirroring the order CI pipelines observe the refs in.
pub fn push_branch_and_tag(
    root: &Path,
    remote: &str,
    branch: &str,
    tag: &str,
) -> Result<(), GitError> {
    run_git(root, &["push", remote, branch], "push branch")?;
    run_git(root, &["push", remote, tag], "push tag")?;
    Ok(())
}

/// Check whether the working tree is clean.
///
/// Returns `None` when clean, or the `git status --porcelain` output when
/// there are uncommitted changes.
pub fn working_tree_changes(root: &Path) -> Result<Option<String>, GitError> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(root)
        .output()
        .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed {
            operation: "status".to_string(),
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if stdout.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(stdout))
    }
}

/// Run a git command and return success or a descriptive error.
fn run_git(root: &Path, args: &[&str], operation: &str) -> Result<(), GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr,
        });
    }

    Ok(())
}
