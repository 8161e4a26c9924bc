//! Publish orchestration, status and package info gathering.
//!
//! Publishers are opaque pass/fail collaborators: availability is checked
//! first, then the tool is invoked once. Failed publishes are not retried.

use std::fmt;
use std::path::Path;

use crate::credentials::{token_in_env, RegistryCredentials};
use crate::error::PublishError;
use crate::gradle::GradleTool;
use crate::npm::{NpmPackage, NpmTool};
use crate::version::read_project_version;

/// Maven group the project's artifacts are published under.
pub const MAVEN_GROUP: &str = "com.zernikalos";

/// Primary Maven artifact name.
pub const MAVEN_ARTIFACT: &str = "zernikalos";

/// A publishing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget {
    Npm,
    Maven,
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishTarget::Npm => write!(f, "npm"),
            PublishTarget::Maven => write!(f, "maven"),
        }
    }
}

/// Outcome of publishing to one target.
pub struct PublishOutcome {
    pub target: PublishTarget,
    pub result: Result<(), PublishError>,
}

/// Publish the npm packages from the JS build output.
pub async fn publish_npm(
    npm: &NpmTool,
    credentials: &RegistryCredentials,
) -> Result<(), PublishError> {
    npm.check_available().await.map_err(PublishError::Npm)?;
    npm.publish_workspace(credentials, None)
        .await
        .map_err(PublishError::Npm)?;
    Ok(())
}

/// Publish all Maven publications through Gradle.
pub async fn publish_maven(
    gradle: &GradleTool,
    credentials: &RegistryCredentials,
) -> Result<(), PublishError> {
    gradle
        .check_available()
        .await
        .map_err(PublishError::Maven)?;
    gradle
        .publish_all_publications(credentials)
        .await
        .map_err(PublishError::Maven)?;
    Ok(())
}

/// Publish to every target, npm first, continuing past failures so each
/// outcome can be reported individually.
pub async fn publish_all(
    gradle: &GradleTool,
    npm: &NpmTool,
    credentials: &RegistryCredentials,
) -> Vec<PublishOutcome> {
    vec![
        PublishOutcome {
            target: PublishTarget::Npm,
            result: publish_npm(npm, credentials).await,
        },
        PublishOutcome {
            target: PublishTarget::Maven,
            result: publish_maven(gradle, credentials).await,
        },
    ]
}

/// Aggregate a batch of outcomes into a single result for exit-code purposes.
pub fn summarize_outcomes(outcomes: &[PublishOutcome]) -> Result<(), PublishError> {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(PublishError::Partial {
            failed,
            total: outcomes.len(),
        })
    }
}

/// Snapshot of the project and tooling state for the `status` command.
pub struct StatusReport {
    pub version: Option<String>,
    pub js_build_exists: bool,
    pub maven_build_exists: bool,
    pub gradle_version: Option<String>,
    pub npm_version: Option<String>,
    pub token_set: bool,
}

/// Gather project status. Never prompts and never fails: unavailable pieces
/// show up as `None`/`false`.
pub async fn gather_status(root: &Path, gradle: &GradleTool, npm: &NpmTool) -> StatusReport {
    let version = read_project_version(root).ok();

    let gradle_version = gradle
        .check_available()
        .await
        .ok()
        .and_then(|banner| extract_gradle_version(&banner));
    let npm_version = npm.check_available().await.ok();

    StatusReport {
        version,
        js_build_exists: root.join("build").join("js").exists(),
        maven_build_exists: root.join("build").exists(),
        gradle_version,
        npm_version,
        token_set: token_in_env(),
    }
}

/// Pull the "Gradle X.Y" line out of the wrapper's version banner.
fn extract_gradle_version(banner: &str) -> Option<String> {
    banner
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("Gradle "))
        .map(str::to_string)
}

/// Detailed package information for the `info` command.
pub struct PackageInfo {
    pub version: Option<String>,
    pub npm_packages: Vec<NpmPackage>,
    pub maven_coordinate: Option<String>,
}

/// Gather package details from the version file and the JS build output.
pub fn gather_info(root: &Path, npm: &NpmTool) -> PackageInfo {
    let version = read_project_version(root).ok();
    let maven_coordinate = version
        .as_ref()
        .map(|v| format!("{MAVEN_GROUP}:{MAVEN_ARTIFACT}:{v}"));

    PackageInfo {
        version,
        npm_packages: npm.list_packages(),
        maven_coordinate,
    }
}
