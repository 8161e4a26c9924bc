//! The persisted project version.

use std::path::Path;

use crate::error::VersionError;

/// Name of the file holding the canonical project version.
pub const VERSION_FILE: &str = "VERSION.txt";

/// Read the project version string from `VERSION.txt` in the project root.
///
/// Returns the trimmed file content without validating its format; strict
/// parsing happens where the version is consumed.
pub fn read_project_version(root: &Path) -> Result<String, VersionError> {
    let path = root.join(VERSION_FILE);
    if !path.exists() {
        return Err(VersionError::VersionFileMissing(root.to_path_buf()));
    }

    let content = std::fs::read_to_string(&path).map_err(VersionError::VersionFileUnreadable)?;
    Ok(content.trim().to_string())
}
