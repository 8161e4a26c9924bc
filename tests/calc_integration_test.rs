//! End-to-end version calculation over real git repositories.

mod common;

use relman::version::{calculate_next_version, BumpCategory};
use relman::{GitSourceControl, SourceControl, VersionError};
use semver::Version;
use tempfile::TempDir;

#[test]
fn test_untagged_repo_minor_bump() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, dir.path(), "fix: correct null pointer");
    common::commit(&repo, dir.path(), "docs: update readme");
    common::commit(&repo, dir.path(), "feat(parser): add retry option");

    let source = GitSourceControl::new(repo);
    let calc = calculate_next_version(&source, "0.6.0").unwrap().unwrap();

    assert_eq!(calc.last_tag, None);
    assert_eq!(calc.commits.len(), 3);
    assert_eq!(calc.bump, BumpCategory::Minor);
    assert_eq!(calc.base_version, Version::new(0, 6, 0));
    assert_eq!(calc.next_version, Version::new(0, 7, 0));
    assert_eq!(calc.snapshot_version, "0.7.0-SNAPSHOT");
    assert!(calc.dev_version.starts_with("0.7.0-next."));
    assert_ne!(calc.dev_version, "0.7.0-next.unknown");
}

#[test]
fn test_tagged_repo_breaking_change_major_bump() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    let tagged = common::commit(&repo, dir.path(), "chore: cut release 2.1.4");
    common::tag(&repo, tagged, "v2.1.4");
    common::commit(&repo, dir.path(), "feat!: remove legacy API");
    common::commit(&repo, dir.path(), "fix: patch memory leak");

    let source = GitSourceControl::new(repo);
    let calc = calculate_next_version(&source, "2.1.4").unwrap().unwrap();

    assert_eq!(calc.last_tag.as_deref(), Some("v2.1.4"));
    // The tagged commit is outside the range.
    assert_eq!(calc.commits.len(), 2);
    assert_eq!(calc.bump, BumpCategory::Major);
    assert_eq!(calc.next_version, Version::new(3, 0, 0));
    assert_eq!(calc.snapshot_version, "3.0.0-SNAPSHOT");
}

#[test]
fn test_tagged_repo_with_no_new_commits_patch_bump() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    let tagged = common::commit(&repo, dir.path(), "chore: cut release 1.0.0");
    common::tag(&repo, tagged, "v1.0.0");

    let source = GitSourceControl::new(repo);
    let calc = calculate_next_version(&source, "1.0.0").unwrap().unwrap();

    assert!(calc.commits.is_empty());
    assert_eq!(calc.bump, BumpCategory::Patch);
    assert_eq!(calc.next_version, Version::new(1, 0, 1));
}

#[test]
fn test_only_latest_reachable_release_tag_is_used() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    let first = common::commit(&repo, dir.path(), "chore: cut release 0.1.0");
    common::tag(&repo, first, "v0.1.0");
    let second = common::commit(&repo, dir.path(), "chore: cut release 0.2.0");
    common::tag(&repo, second, "v0.2.0");
    common::commit(&repo, dir.path(), "fix: trailing slash handling");

    let source = GitSourceControl::new(repo);
    let calc = calculate_next_version(&source, "0.2.0").unwrap().unwrap();

    assert_eq!(calc.last_tag.as_deref(), Some("v0.2.0"));
    assert_eq!(calc.commits, vec!["fix: trailing slash handling".to_string()]);
    assert_eq!(calc.next_version, Version::new(0, 2, 1));
}

#[test]
fn test_non_release_tags_are_ignored() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    let oid = common::commit(&repo, dir.path(), "feat: initial import");
    common::tag(&repo, oid, "nightly-2024-01-01");
    common::tag(&repo, oid, "v1.2");
    common::commit(&repo, dir.path(), "fix: typo");

    let source = GitSourceControl::new(repo);
    let calc = calculate_next_version(&source, "0.1.0").unwrap().unwrap();

    // No vX.Y.Z tag, so the whole history is in scope.
    assert_eq!(calc.last_tag, None);
    assert_eq!(calc.commits.len(), 2);
    assert_eq!(calc.bump, BumpCategory::Minor);
}

#[test]
fn test_unborn_head_degrades_to_no_calculation() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());

    let source = GitSourceControl::new(repo);
    let result = calculate_next_version(&source, "1.0.0").unwrap();

    assert!(result.is_none());
}

#[test]
fn test_malformed_base_version_fails_even_with_valid_repo() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, dir.path(), "feat: something");

    let source = GitSourceControl::new(repo);
    let result = calculate_next_version(&source, "1.2.3-beta");

    assert!(matches!(result, Err(VersionError::InvalidFormat(_))));
}

#[test]
fn test_head_commit_id_short_and_full() {
    let dir = TempDir::new().unwrap();
    let repo = common::init_repo(dir.path());
    common::commit(&repo, dir.path(), "feat: initial import");

    let source = GitSourceControl::new(repo);
    let short = source.head_commit_id(true).unwrap().unwrap();
    let full = source.head_commit_id(false).unwrap().unwrap();

    assert_eq!(short.len(), 7);
    assert_eq!(full.len(), 40);
    assert!(full.starts_with(&short));
}
