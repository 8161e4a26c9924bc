//! npm invocation and package discovery.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::credentials::RegistryCredentials;
use crate::error::NpmError;

/// Default timeout for npm command execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "RELMAN_NPM_TIMEOUT";

/// Scope under which the project's packages are published.
pub const PACKAGE_SCOPE: &str = "@zernikalos";

/// Default package published when no filter is given.
const DEFAULT_PACKAGE: &str = "zernikalos";

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

/// Fields read from a package.json manifest.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    version: Option<String>,
}

/// A discovered npm package in the build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmPackage {
    pub name: String,
    pub version: String,
}

/// Handle to npm for the project's JS build output.
pub struct NpmTool {
    root: PathBuf,
}

impl NpmTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Directory the Kotlin/JS build emits scoped packages into.
    fn packages_dir(&self) -> PathBuf {
        self.root
            .join("build")
            .join("js")
            .join("packages")
            .join(PACKAGE_SCOPE)
    }

    /// Workspace root used for publishing.
    fn workspace_dir(&self) -> PathBuf {
        self.root.join("build").join("js")
    }

    /// Check that npm is installed and runs, returning its version.
    pub async fn check_available(&self) -> Result<String, NpmError> {
        if which::which("npm").is_err() {
            return Err(NpmError::NotInstalled);
        }

        let output = Command::new("npm")
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(NpmError::SpawnFailed)?;

        if !output.status.success() {
            return Err(NpmError::NotInstalled);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// List built packages with their versions.
    ///
    /// Scans the scoped packages directory, reading each package.json. Test
    /// packages are excluded; unreadable manifests are skipped rather than
    /// failing the listing.
    pub fn list_packages(&self) -> Vec<NpmPackage> {
        let dir = self.packages_dir();
        let Ok(entries) = std::fs::read_dir(&dir) else {
            debug!(dir = %dir.display(), "Packages directory not readable, no packages listed");
            return Vec::new();
        };

        let mut packages = Vec::new();
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if name.to_lowercase().contains("test") {
                continue;
            }

            let manifest_path = entry.path().join("package.json");
            let Ok(content) = std::fs::read_to_string(&manifest_path) else {
                continue;
            };

            match serde_json::from_str::<PackageManifest>(&content) {
                Ok(manifest) => packages.push(NpmPackage {
                    name,
                    version: manifest.version.unwrap_or_else(|| "unknown".to_string()),
                }),
                Err(e) => {
                    debug!(package = %name, error = %e, "Skipping package with invalid manifest");
                }
            }
        }

        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages
    }

    /// Publish a workspace package from the JS build output.
    ///
    /// The registry token is injected into the child process environment only
    /// (NODE_AUTH_TOKEN), never into this process's environment.
    pub async fn publish_workspace(
        &self,
        credentials: &RegistryCredentials,
        package: Option<&str>,
    ) -> Result<(), NpmError> {
        let workspace_dir = self.workspace_dir();
        if !workspace_dir.exists() {
            return Err(NpmError::WorkspaceMissing(workspace_dir));
        }

        let workspace = format!("{}/{}", PACKAGE_SCOPE, package.unwrap_or(DEFAULT_PACKAGE));
        let timeout_duration = get_timeout();
        let timeout_secs = timeout_duration.as_secs();

        debug!(%workspace, "Publishing npm workspace");

        let output = timeout(
            timeout_duration,
            Command::new("npm")
                .args(["publish", "--workspace", &workspace])
                .current_dir(&workspace_dir)
                .env("NODE_AUTH_TOKEN", &credentials.token)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| NpmError::Timeout {
            command: "publish".to_string(),
            timeout_secs,
        })?
        .map_err(NpmError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(NpmError::CommandFailed {
                command: "publish".to_string(),
                code,
                stderr,
            });
        }

        Ok(())
    }
}
