//! Error types for relman modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to resolve reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to read commit: {0}")]
    ReadCommit(#[source] git2::Error),

    #[error("Repository has no HEAD commit")]
    UnbornHead,

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Failed to run git: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Invalid version format '{0}'. Use X.Y.Z (e.g., 0.4.1)")]
    InvalidFormat(String),

    #[error("VERSION.txt not found in {0}")]
    VersionFileMissing(std::path::PathBuf),

    #[error("Failed to read VERSION.txt: {0}")]
    VersionFileUnreadable(#[source] std::io::Error),
}

/// Errors from Gradle wrapper invocations.
#[derive(Error, Debug)]
pub enum GradleError {
    #[error(
        "Gradle wrapper not found or not executable. Ensure gradlew is present in the project root"
    )]
    NotInstalled,

    #[error("Failed to spawn Gradle process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Gradle task '{task}' timed out after {timeout_secs} seconds")]
    Timeout { task: String, timeout_secs: u64 },

    #[error("Gradle task '{task}' exited with code {code}: {stderr}")]
    TaskFailed {
        task: String,
        code: i32,
        stderr: String,
    },
}

/// Errors from npm invocations.
#[derive(Error, Debug)]
pub enum NpmError {
    #[error("npm is not installed or not in PATH. Install Node.js and npm first")]
    NotInstalled,

    #[error("Failed to spawn npm process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("npm {command} timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("npm {command} exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Workspace directory not found: {0}")]
    WorkspaceMissing(std::path::PathBuf),
}

/// Errors from publish orchestration.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("npm publish failed: {0}")]
    Npm(#[from] NpmError),

    #[error("Maven publish failed: {0}")]
    Maven(#[from] GradleError),

    #[error("{failed} of {total} publish targets failed")]
    Partial { failed: usize, total: usize },
}

/// Errors from the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("Git working directory is not clean:\n{0}")]
    DirtyWorkingTree(String),

    #[error("Version {0} already exists as a tag")]
    TagAlreadyExists(String),

    #[error("Release step '{step}' failed (completed: {completed:?}): {source}")]
    StepFailed {
        step: &'static str,
        completed: Vec<&'static str>,
        #[source]
        source: GradleError,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] GitError),

    #[error("Operation cancelled by user")]
    Cancelled,
}

/// Errors from credential resolution.
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Registry access token is required. Pass --token or set GITHUB_TOKEN")]
    TokenMissing,

    #[error("Failed to read token from prompt: {0}")]
    PromptFailed(#[source] dialoguer::Error),
}
