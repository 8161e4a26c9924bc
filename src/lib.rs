//! relman - release automation for multi-ecosystem projects.
//!
//! # Overview
//!
//! relman calculates the next semantic version from conventional commits
//! since the last release tag, drives the Gradle-owned release steps (version
//! file, package lock, release commit and tag), and publishes the resulting
//! Maven artifacts and npm packages.

pub mod credentials;
pub mod error;
pub mod git;
pub mod gradle;
pub mod npm;
pub mod publish;
pub mod release;
pub mod version;

// Re-export commonly used types
pub use credentials::RegistryCredentials;
pub use error::{
    CredentialsError, GitError, GradleError, NpmError, PublishError, ReleaseError, VersionError,
};
pub use git::{GitSourceControl, SourceControl};
pub use version::{calculate_next_version, BumpCategory, VersionCalculation};
