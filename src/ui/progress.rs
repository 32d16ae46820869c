//! Upload progress shown while artifacts go to the object store

use linya::{Bar, Progress};

/// One bar advancing per artifact written under the version directory
pub struct UploadProgress {
  progress: Progress,
  bar: Bar,
}

impl UploadProgress {
  pub fn new(artifacts: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(artifacts, label.into());
    Self { progress, bar }
  }

  /// Record that one more artifact reached the store
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
