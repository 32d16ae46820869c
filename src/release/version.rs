//! Version file loading
//!
//! The version file is plain text: `#` comment lines and blank lines are
//! skipped, the first remaining line is the release version.

use crate::core::error::{PublishError, PublishResult};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Load the release version from `path`
pub fn load_version(path: &Path) -> PublishResult<String> {
  let content = fs::read_to_string(path).map_err(|e| PublishError::VersionFileInvalid {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })?;

  let version = parse_version(&content).ok_or_else(|| PublishError::VersionFileInvalid {
    path: path.to_path_buf(),
    reason: "no version line found".to_string(),
  })?;

  if semver::Version::parse(version).is_err() {
    warn!("version '{}' in {} is not a semantic version", version, path.display());
  }
  debug!("loaded version {} from {}", version, path.display());

  Ok(version.to_string())
}

/// First line that is neither blank nor a `#` comment, trimmed
pub fn parse_version(content: &str) -> Option<&str> {
  content
    .lines()
    .map(str::trim)
    .find(|line| !line.is_empty() && !line.starts_with('#'))
}
