//! Error types for dmod-release with contextual messages and exit codes
//!
//! Every pipeline step returns a `PublishError`. Fatal errors end the run with
//! a diagnostic on stderr and exit code 1; a few variants also carry a help
//! line suggesting how to fix the problem.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Exit codes for dmod-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Any operational failure (missing tool, bad artifact, upload, declined prompt)
  Failure = 1,
  /// Invalid command-line usage
  Usage = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for dmod-release
#[derive(Debug)]
pub enum PublishError {
  /// Configuration errors
  Config(ConfigError),

  /// A required external tool is not on PATH
  ToolMissing { name: String },

  /// Version file unreadable or without a version line
  VersionFileInvalid { path: PathBuf, reason: String },

  /// Artifact validation errors
  Artifact(ArtifactError),

  /// Git operation errors
  Git(GitError),

  /// Remote object store errors
  Remote(RemoteError),

  /// Operator answered "no" at a confirmation prompt
  Declined { consequence: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PublishError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PublishError::Message { message, context, help } => PublishError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PublishError::Io(e) => PublishError::message(format!("{}: {}", ctx_str, e)),
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  ///
  /// Usage errors are reported by the argument parser before any step runs,
  /// so every `PublishError` is an operational failure.
  pub fn exit_code(&self) -> ExitCode {
    ExitCode::Failure
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PublishError::Config(e) => e.help_message(),
      PublishError::ToolMissing { name } => Some(format!(
        "Install `{}` and make sure it is on PATH, or point publish.toml at another binary.",
        name
      )),
      PublishError::VersionFileInvalid { path, .. } => Some(format!(
        "Put the release version (e.g. 1.2.3) on the first non-comment line of {}.",
        path.display()
      )),
      PublishError::Artifact(e) => e.help_message(),
      PublishError::Git(e) => e.help_message(),
      PublishError::Remote(e) => e.help_message(),
      PublishError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::Config(e) => write!(f, "{}", e),
      PublishError::ToolMissing { name } => write!(f, "Required tool not found on PATH: {}", name),
      PublishError::VersionFileInvalid { path, reason } => {
        write!(f, "Invalid version file {}: {}", path.display(), reason)
      }
      PublishError::Artifact(e) => write!(f, "{}", e),
      PublishError::Git(e) => write!(f, "{}", e),
      PublishError::Remote(e) => write!(f, "{}", e),
      PublishError::Declined { consequence } => write!(f, "Aborted: {}", consequence),
      PublishError::Io(e) => write!(f, "I/O error: {}", e),
      PublishError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PublishError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PublishError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PublishError {
  fn from(err: io::Error) -> Self {
    PublishError::Io(err)
  }
}

impl From<ConfigError> for PublishError {
  fn from(err: ConfigError) -> Self {
    PublishError::Config(err)
  }
}

impl From<ArtifactError> for PublishError {
  fn from(err: ArtifactError) -> Self {
    PublishError::Artifact(err)
  }
}

impl From<GitError> for PublishError {
  fn from(err: GitError) -> Self {
    PublishError::Git(err)
  }
}

impl From<RemoteError> for PublishError {
  fn from(err: RemoteError) -> Self {
    PublishError::Remote(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but could not be parsed
  Parse { path: PathBuf, reason: String },

  /// Config parsed but violates a constraint
  Invalid { reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Parse { path, .. } => Some(format!(
        "Fix the TOML syntax in {} or remove it to use the built-in defaults.",
        path.display()
      )),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse config {}: {}", path.display(), reason)
      }
      ConfigError::Invalid { reason } => write!(f, "Invalid configuration: {}", reason),
    }
  }
}

/// Artifact validation errors
#[derive(Debug)]
pub enum ArtifactError {
  /// Built artifact does not exist
  Missing { path: PathBuf },

  /// Artifact carries a tag other than the release marker
  NotReleaseBuild { path: PathBuf, tag: String },

  /// Debugger never signalled that the artifact was loaded
  CheckTimedOut { path: PathBuf, waited: Duration },

  /// Debugger could not be started or queried
  InspectFailed { path: PathBuf, reason: String },
}

impl ArtifactError {
  fn help_message(&self) -> Option<String> {
    match self {
      ArtifactError::Missing { .. } => Some("Build all architectures before publishing.".to_string()),
      ArtifactError::NotReleaseBuild { .. } => {
        Some("Rebuild the module in release mode before publishing.".to_string())
      }
      ArtifactError::CheckTimedOut { .. } => {
        Some("Check that the debugger can load the module by hand.".to_string())
      }
      ArtifactError::InspectFailed { .. } => None,
    }
  }
}

impl fmt::Display for ArtifactError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtifactError::Missing { path } => write!(f, "Artifact not found: {}", path.display()),
      ArtifactError::NotReleaseBuild { path, tag } => {
        write!(f, "{} is not a release build (tag: {:?})", path.display(), tag)
      }
      ArtifactError::CheckTimedOut { path, waited } => write!(
        f,
        "Timed out after {}s waiting for the debugger to load {}",
        waited.as_secs_f32(),
        path.display()
      ),
      ArtifactError::InspectFailed { path, reason } => {
        write!(f, "Failed to inspect {}: {}", path.display(), reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } if stderr.contains("already exists") => {
        Some("Delete the stale tag with `git tag -d <tag>` if it points at the wrong commit.".to_string())
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
    }
  }
}

/// Remote object store errors
#[derive(Debug)]
pub enum RemoteError {
  /// Listing a remote directory failed or returned garbage
  ListFailed { path: String, reason: String },

  /// Creating a directory or uploading a file failed
  UploadFailed { remote: String, reason: String },

  /// Writing the latest pointer failed
  PointerUpdateFailed { remote: String, reason: String },
}

impl RemoteError {
  fn help_message(&self) -> Option<String> {
    match self {
      RemoteError::ListFailed { .. } => {
        Some("Check your object store credentials and that the remote root exists.".to_string())
      }
      RemoteError::UploadFailed { .. } => {
        Some("Partial uploads are not rolled back; re-run once the store is reachable.".to_string())
      }
      RemoteError::PointerUpdateFailed { .. } => None,
    }
  }
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteError::ListFailed { path, reason } => {
        write!(f, "Failed to list remote {}: {}", path, reason.trim_end())
      }
      RemoteError::UploadFailed { remote, reason } => {
        write!(f, "Upload to {} failed: {}", remote, reason.trim_end())
      }
      RemoteError::PointerUpdateFailed { remote, reason } => {
        write!(f, "Failed to update latest pointer {}: {}", remote, reason.trim_end())
      }
    }
  }
}

/// Result type alias for dmod-release
pub type PublishResult<T> = Result<T, PublishError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PublishError>,
{
  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PublishError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
