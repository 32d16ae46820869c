//! Remote object store access
//!
//! Published layout:
//!
//! ```text
//! <root>/v<version>/<artifact-name>   one object per architecture
//! <root>/latest                       text object naming the newest version dir
//! ```

pub mod cli;

pub use cli::CliStore;

use crate::core::error::PublishResult;
use serde::Deserialize;
use std::path::Path;

/// One entry of a remote directory listing
///
/// Listings carry more fields (type, mtime, size); only the name matters here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
  pub name: String,
}

/// Operations the publisher needs from the object store
pub trait ObjectStore {
  /// List the entries directly under `path`
  fn list(&self, path: &str) -> PublishResult<Vec<RemoteEntry>>;

  /// Create `path` and any missing parents; succeeds if it already exists
  fn mkdirp(&self, path: &str) -> PublishResult<()>;

  /// Upload a local file to `remote`
  fn put_file(&self, local: &Path, remote: &str) -> PublishResult<()>;

  /// Write `content` as the body of `remote`
  fn put_text(&self, content: &str, remote: &str) -> PublishResult<()>;
}

/// Whether `<root>/v<version>` is already published
///
/// Only an exact name match counts: `v1.2.30` is not `v1.2.3`.
pub fn remote_version_exists(store: &dyn ObjectStore, root: &str, version: &str) -> PublishResult<bool> {
  let wanted = crate::core::context::version_dir_name(version);
  let entries = store.list(root)?;
  Ok(entries.iter().any(|entry| entry.name == wanted))
}
