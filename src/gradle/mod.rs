//! Gradle wrapper invocation.
//!
//! All build-tool work goes through the project's `gradlew` so the pinned
//! Gradle version is used. Tasks are opaque pass/fail operations from this
//! tool's point of view.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use semver::Version;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::credentials::RegistryCredentials;
use crate::error::GradleError;

/// Default timeout for Gradle task execution (10 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "RELMAN_GRADLE_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from RELMAN_GRADLE_TIMEOUT (seconds) if set, otherwise uses the
/// default. Logs a warning if the variable holds an invalid value.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Handle to the project's Gradle wrapper.
pub struct GradleTool {
    root: PathBuf,
}

impl GradleTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn wrapper(&self) -> PathBuf {
        self.root.join("gradlew")
    }

    /// Check that the wrapper exists and runs, returning its version banner.
    pub async fn check_available(&self) -> Result<String, GradleError> {
        let wrapper = self.wrapper();
        if !wrapper.exists() {
            return Err(GradleError::NotInstalled);
        }

        let output = Command::new(&wrapper)
            .arg("--version")
            .current_dir(&self.root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(GradleError::SpawnFailed)?;

        if !output.status.success() {
            return Err(GradleError::NotInstalled);
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a Gradle task with additional arguments, under the configured
    /// timeout.
    pub async fn run_task(&self, task: &str, args: &[String]) -> Result<(), GradleError> {
        let timeout_duration = get_timeout();
        let timeout_secs = timeout_duration.as_secs();

        debug!(task, ?args, "Running Gradle task");

        let output = timeout(
            timeout_duration,
            Command::new(self.wrapper())
                .arg(task)
                .args(args)
                .current_dir(&self.root)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| GradleError::Timeout {
            task: task.to_string(),
            timeout_secs,
        })?
        .map_err(GradleError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(GradleError::TaskFailed {
                task: task.to_string(),
                code,
                stderr,
            });
        }

        Ok(())
    }

    /// Write the new version into the project's version file.
    pub async fn set_version(&self, version: &Version) -> Result<(), GradleError> {
        self.run_task("setVersion", &[format!("-PnewVersion={version}")])
            .await
    }

    /// Upgrade the Kotlin package lock after a version change.
    pub async fn upgrade_package_lock(&self) -> Result<(), GradleError> {
        self.run_task("kotlinUpgradePackageLock", &[]).await
    }

    /// Regenerate version-dependent files.
    ///
    /// The version is passed as a project property so plugins that read it at
    /// configuration time see the new value.
    pub async fn generate_version_files(&self, version: &Version) -> Result<(), GradleError> {
        self.run_task("updateVersion", &[format!("-PnewVersion={version}")])
            .await
    }

    /// Create the release commit and the `vX.Y.Z` tag.
    pub async fn create_release_commit(&self, version: &Version) -> Result<(), GradleError> {
        self.run_task("releaseCommit", &[format!("-PnewVersion={version}")])
            .await
    }

    /// Publish every Maven publication to the configured repository.
    pub async fn publish_all_publications(
        &self,
        credentials: &RegistryCredentials,
    ) -> Result<(), GradleError> {
        self.run_task(
            "publishAllPublicationsToMavenRepository",
            &[
                format!("-Puser={}", credentials.user),
                format!("-Paccess_token={}", credentials.token),
            ],
        )
        .await
    }
}
