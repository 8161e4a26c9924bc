//! Release pipeline: validation, versioned build-tool steps, and push.
//!
//! The build tool owns version persistence, version-file generation, and the
//! release commit/tag; this module sequences those steps, tracks what
//! completed, and pushes the result.

use std::path::Path;

use async_trait::async_trait;
use dialoguer::Confirm;
use git2::Repository;
use semver::Version;

use crate::error::{GradleError, ReleaseError};
use crate::git::push::push_branch_and_tag;
use crate::git::push::working_tree_changes;
use crate::git::tags::tag_exists;
use crate::gradle::GradleTool;
use crate::version::parse_base_version;

/// Remote releases are pushed to.
pub const RELEASE_REMOTE: &str = "origin";

/// Branch releases are cut from.
pub const RELEASE_BRANCH: &str = "main";

/// The ordered build-tool steps of a release.
///
/// Behind a trait so the pipeline can be exercised against a mock instead of
/// a real Gradle wrapper.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSteps {
    /// Persist the new version (the build tool owns the version file).
    async fn set_version(&self, version: &Version) -> Result<(), GradleError>;

    /// Upgrade the Kotlin package lock to match the new version.
    async fn upgrade_package_lock(&self) -> Result<(), GradleError>;

    /// Regenerate version-dependent source files.
    async fn generate_version_files(&self, version: &Version) -> Result<(), GradleError>;

    /// Create the release commit and the `vX.Y.Z` tag.
    async fn create_release_commit(&self, version: &Version) -> Result<(), GradleError>;
}

#[async_trait]
impl ReleaseSteps for GradleTool {
    async fn set_version(&self, version: &Version) -> Result<(), GradleError> {
        GradleTool::set_version(self, version).await
    }

    async fn upgrade_package_lock(&self) -> Result<(), GradleError> {
        GradleTool::upgrade_package_lock(self).await
    }

    async fn generate_version_files(&self, version: &Version) -> Result<(), GradleError> {
        GradleTool::generate_version_files(self, version).await
    }

    async fn create_release_commit(&self, version: &Version) -> Result<(), GradleError> {
        GradleTool::create_release_commit(self, version).await
    }
}

/// What a confirmed release will do.
pub struct ReleasePlan {
    pub current_version: String,
    pub version: Version,
    pub no_push: bool,
}

/// Result of an executed release.
pub struct ReleaseOutcome {
    pub version: Version,
    pub steps_completed: Vec<&'static str>,
    pub pushed: bool,
}

/// Validate a requested release version against the repository state.
///
/// Checks, in order: strict `X.Y.Z` format, clean working tree, and that the
/// `vX.Y.Z` tag does not already exist.
pub fn validate_release(
    root: &Path,
    repo: &Repository,
    version: &str,
) -> Result<Version, ReleaseError> {
    let version = parse_base_version(version)?;

    if let Some(changes) = working_tree_changes(root)? {
        return Err(ReleaseError::DirtyWorkingTree(changes));
    }

    let tag = format!("v{version}");
    if tag_exists(repo, &tag)? {
        return Err(ReleaseError::TagAlreadyExists(tag));
    }

    Ok(version)
}

/// Ask the user to confirm the release, listing what will happen.
pub fn confirm_release(plan: &ReleasePlan) -> Result<bool, ReleaseError> {
    println!();
    println!("Current version: {}", plan.current_version);
    println!("New version:     {}", plan.version);
    println!();
    println!("This will:");
    println!("  1. Update VERSION.txt to {}", plan.version);
    println!("  2. Upgrade the Kotlin package lock");
    println!("  3. Regenerate version constants");
    println!("  4. Create the release commit");
    println!("  5. Create git tag v{}", plan.version);
    if plan.no_push {
        println!("  6. [SKIP] Push changes (--no-push). No CI/CD will be triggered.");
    } else {
        println!("  6. Push the branch and tag to trigger CI/CD");
    }
    println!();

    Confirm::new()
        .with_prompt("Proceed with release?")
        .default(false)
        .interact()
        .map_err(|_| ReleaseError::Cancelled)
}

/// Run the four build-tool steps in order, tracking completion.
///
/// A failing step aborts the sequence; the error records which steps already
/// completed so the user knows what state the working tree was left in.
pub async fn run_release_steps<S: ReleaseSteps + Sync>(
    steps: &S,
    version: &Version,
) -> Result<Vec<&'static str>, ReleaseError> {
    let mut completed: Vec<&'static str> = Vec::new();

    steps
        .set_version(version)
        .await
        .map_err(|e| step_failed("set_version", &completed, e))?;
    completed.push("set_version");

    steps
        .upgrade_package_lock()
        .await
        .map_err(|e| step_failed("upgrade_package_lock", &completed, e))?;
    completed.push("upgrade_package_lock");

    steps
        .generate_version_files(version)
        .await
        .map_err(|e| step_failed("generate_version_files", &completed, e))?;
    completed.push("generate_version_files");

    steps
        .create_release_commit(version)
        .await
        .map_err(|e| step_failed("create_release_commit", &completed, e))?;
    completed.push("create_release_commit");

    Ok(completed)
}

fn step_failed(
    step: &'static str,
    completed: &[&'static str],
    source: GradleError,
) -> ReleaseError {
    ReleaseError::StepFailed {
        step,
        completed: completed.to_vec(),
        source,
    }
}

/// Execute a validated, confirmed release: run the steps, then push the
/// branch and tag unless the plan is local-only.
pub async fn execute_release<S: ReleaseSteps + Sync>(
    steps: &S,
    root: &Path,
    plan: &ReleasePlan,
) -> Result<ReleaseOutcome, ReleaseError> {
    let steps_completed = run_release_steps(steps, &plan.version).await?;

    let pushed = if plan.no_push {
        false
    } else {
        let tag = format!("v{}", plan.version);
        push_branch_and_tag(root, RELEASE_REMOTE, RELEASE_BRANCH, &tag)?;
        true
    };

    Ok(ReleaseOutcome {
        version: plan.version.clone(),
        steps_completed,
        pushed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VersionError;
    use git2::Signature;
    use std::path::Path as StdPath;

    fn init_repo_with_commit(dir: &StdPath) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@test.com").unwrap();

            std::fs::write(dir.join("test.txt"), "hello\n").unwrap();
            let mut index = repo.index().unwrap();
            index.add_path(StdPath::new("test.txt")).unwrap();
            index.write().unwrap();

            let sig = Signature::now("Test User", "test@test.com").unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        let result = validate_release(dir.path(), &repo, "1.2");
        assert!(matches!(
            result,
            Err(ReleaseError::InvalidVersion(VersionError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_dirty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());
        std::fs::write(dir.path().join("untracked.txt"), "dirty\n").unwrap();

        let result = validate_release(dir.path(), &repo, "1.0.0");
        assert!(matches!(result, Err(ReleaseError::DirtyWorkingTree(_))));
    }

    #[test]
    fn test_validate_rejects_existing_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());
        let head = repo.head().unwrap().target().unwrap();
        repo.tag_lightweight("v1.0.0", &repo.find_object(head, None).unwrap(), false)
            .unwrap();

        let result = validate_release(dir.path(), &repo, "1.0.0");
        assert!(matches!(result, Err(ReleaseError::TagAlreadyExists(tag)) if tag == "v1.0.0"));
    }

    #[test]
    fn test_validate_accepts_clean_untagged() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());

        let version = validate_release(dir.path(), &repo, "1.0.0").unwrap();
        assert_eq!(version, Version::new(1, 0, 0));
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let mut steps = MockReleaseSteps::new();
        let version = Version::new(1, 2, 3);

        let mut seq = mockall::Sequence::new();
        steps
            .expect_set_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        steps
            .expect_upgrade_package_lock()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        steps
            .expect_generate_version_files()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        steps
            .expect_create_release_commit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let completed = run_release_steps(&steps, &version).await.unwrap();
        assert_eq!(
            completed,
            vec![
                "set_version",
                "upgrade_package_lock",
                "generate_version_files",
                "create_release_commit",
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_step_reports_completed_steps() {
        let mut steps = MockReleaseSteps::new();
        let version = Version::new(1, 2, 3);

        steps.expect_set_version().returning(|_| Ok(()));
        steps
            .expect_upgrade_package_lock()
            .returning(|| Err(GradleError::NotInstalled));
        // Later steps must not run
        steps.expect_generate_version_files().times(0);
        steps.expect_create_release_commit().times(0);

        let result = run_release_steps(&steps, &version).await;
        match result {
            Err(ReleaseError::StepFailed {
                step, completed, ..
            }) => {
                assert_eq!(step, "upgrade_package_lock");
                assert_eq!(completed, vec!["set_version"]);
            }
            _ => panic!("expected StepFailed"),
        }
    }

    #[tokio::test]
    async fn test_execute_release_no_push() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        let mut steps = MockReleaseSteps::new();
        steps.expect_set_version().returning(|_| Ok(()));
        steps.expect_upgrade_package_lock().returning(|| Ok(()));
        steps.expect_generate_version_files().returning(|_| Ok(()));
        steps.expect_create_release_commit().returning(|_| Ok(()));

        let plan = ReleasePlan {
            current_version: "1.2.2".to_string(),
            version: Version::new(1, 2, 3),
            no_push: true,
        };

        let outcome = execute_release(&steps, dir.path(), &plan).await.unwrap();
        assert!(!outcome.pushed);
        assert_eq!(outcome.steps_completed.len(), 4);
        assert_eq!(outcome.version, Version::new(1, 2, 3));
    }
}
