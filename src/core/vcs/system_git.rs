//! System git backend
//!
//! Shells out to the `git` binary with an isolated environment. Only tag
//! creation is needed for publishing; pushing the tag stays a manual step.

use super::Vcs;
use crate::core::error::{GitError, PublishError, PublishResult, ResultExt};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// git executable name or path
  program: String,

  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  pub fn new(program: impl Into<String>, repo_path: &Path) -> Self {
    Self {
      program: program.into(),
      repo_path: repo_path.to_path_buf(),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Passes through only PATH, HOME and GIT_CONFIG_GLOBAL, which carry the
  ///   tagger identity
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new(&self.program);

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    for var in ["PATH", "HOME", "GIT_CONFIG_GLOBAL"] {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }

    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

impl Vcs for SystemGit {
  fn create_annotated_tag(&self, tag: &str, message: &str) -> PublishResult<()> {
    debug!("{} tag -a {} -m {}", self.program, tag, message);
    let output = self
      .git_cmd()
      .args(["tag", "-a", tag, "-m", message])
      .output()
      .with_context(|| format!("Failed to run {}", self.program))?;

    if !output.status.success() {
      return Err(PublishError::Git(GitError::CommandFailed {
        command: format!("git tag -a {} -m {}", tag, message),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }
}
