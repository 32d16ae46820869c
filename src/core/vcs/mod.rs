pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::PublishResult;

/// Version control operations the publisher needs
pub trait Vcs {
  /// Create an annotated tag at HEAD
  fn create_annotated_tag(&self, tag: &str, message: &str) -> PublishResult<()>;
}
