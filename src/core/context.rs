//! Publish context - build once, pass through every pipeline step
//!
//! Holds everything the pipeline steps share: the parsed options, the loaded
//! configuration, the working directory, the release version and the remote
//! directory derived from it. Steps receive `&PublishContext` instead of
//! reading globals.

use crate::core::config::{ArtifactConfig, PublishConfig};
use std::path::{Path, PathBuf};

/// Options parsed from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
  /// Also point `<remote_root>/latest` at the new version
  pub update_latest: bool,
}

/// Shared state for one publish run.
#[derive(Debug, Clone)]
pub struct PublishContext {
  /// Working directory (artifact and version paths are relative to it)
  pub root: PathBuf,

  pub options: Options,

  pub config: PublishConfig,

  /// Release version, e.g. "1.2.3"
  pub version: String,

  /// Remote directory for this version: `<remote_root>/v<version>`
  pub destination: String,
}

impl PublishContext {
  pub fn new(root: PathBuf, options: Options, config: PublishConfig, version: String) -> Self {
    let destination = remote_join(&config.remote_root, &version_dir_name(&version));
    Self {
      root,
      options,
      config,
      version,
      destination,
    }
  }

  /// Git tag and remote directory name for this version
  pub fn tag_name(&self) -> String {
    version_dir_name(&self.version)
  }

  /// Absolute local path of an artifact
  pub fn artifact_path(&self, artifact: &ArtifactConfig) -> PathBuf {
    self.root.join(&artifact.path)
  }

  /// Remote path an artifact is uploaded to
  pub fn remote_artifact_path(&self, artifact: &ArtifactConfig) -> String {
    remote_join(&self.destination, &artifact.name)
  }

  /// Remote object holding the latest-version pointer
  pub fn latest_pointer_path(&self) -> String {
    remote_join(&self.config.remote_root, "latest")
  }

  /// Get working directory as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}

/// Name used for both the tag and the remote directory of a version
pub fn version_dir_name(version: &str) -> String {
  format!("v{}", version)
}

/// Join remote path segments with exactly one `/` between them
pub fn remote_join(base: &str, name: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}
