//! Release marker inspection for built artifacts
//!
//! A module built in release mode embeds a tag symbol whose value is the
//! literal `release`. The publisher refuses to ship anything else.
//!
//! How the tag is read is up to the `ArtifactInspector`; the production
//! implementation loads the artifact into a debugger (see `debugger`).

pub mod debugger;

pub use debugger::DebuggerInspector;

use crate::core::error::{ArtifactError, PublishResult};
use log::info;
use std::path::Path;

/// What an inspector learned about an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
  /// Value of the embedded tag symbol
  pub tag: String,
}

/// Reads the embedded tag of a built artifact
pub trait ArtifactInspector {
  fn inspect(&self, artifact: &Path) -> PublishResult<Inspection>;
}

/// Fail unless `artifact` exists and its embedded tag equals `expected`
///
/// A missing artifact is reported without invoking the inspector.
pub fn check_artifact_is_release(
  inspector: &dyn ArtifactInspector,
  artifact: &Path,
  expected: &str,
) -> PublishResult<()> {
  if !artifact.exists() {
    return Err(
      ArtifactError::Missing {
        path: artifact.to_path_buf(),
      }
      .into(),
    );
  }

  let inspection = inspector.inspect(artifact)?;
  info!("{} reports tag {:?}", artifact.display(), inspection.tag);

  if inspection.tag != expected {
    return Err(
      ArtifactError::NotReleaseBuild {
        path: artifact.to_path_buf(),
        tag: inspection.tag,
      }
      .into(),
    );
  }

  Ok(())
}

/// Extract the tag value from a debugger reply
///
/// The value is the second whitespace-separated token, minus trailing commas:
/// `"mdbv8_vers_tag: release,"` gives `release`.
pub fn parse_tag_reply(reply: &str) -> Option<String> {
  reply
    .split_whitespace()
    .nth(1)
    .map(|token| token.trim_end_matches(',').to_string())
}
