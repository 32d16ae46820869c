//! The publish pipeline
//!
//! Steps after the preflight (options, tools, version) run here in order:
//!
//! 1. every artifact must exist and carry the release tag
//! 2. annotated tag `v<version>` (failure asks whether to continue)
//! 3. remote version check (an existing version asks whether to overwrite)
//! 4. upload of every artifact to `<root>/v<version>/`
//! 5. `latest` pointer, only with `--latest`
//!
//! Any error returned from `Publisher::run` is fatal.

use crate::core::context::PublishContext;
use crate::core::error::PublishResult;
use crate::core::vcs::Vcs;
use crate::inspect::{ArtifactInspector, check_artifact_is_release};
use crate::store::{ObjectStore, remote_version_exists};
use crate::ui::progress::UploadProgress;
use crate::ui::prompt::{Prompter, confirm_or_abort};
use log::info;

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
  pub tag: String,
  pub destination: String,
  /// Remote paths written, in upload order
  pub uploaded: Vec<String>,
  pub tag_created: bool,
  pub latest_updated: bool,
}

/// Runs the pipeline against a set of collaborators
pub struct Publisher<'a> {
  vcs: &'a dyn Vcs,
  inspector: &'a dyn ArtifactInspector,
  store: &'a dyn ObjectStore,
  prompter: &'a mut dyn Prompter,
  show_progress: bool,
}

impl<'a> Publisher<'a> {
  pub fn new(
    vcs: &'a dyn Vcs,
    inspector: &'a dyn ArtifactInspector,
    store: &'a dyn ObjectStore,
    prompter: &'a mut dyn Prompter,
  ) -> Self {
    Self {
      vcs,
      inspector,
      store,
      prompter,
      show_progress: true,
    }
  }

  /// Disable the upload progress bar
  pub fn quiet(mut self) -> Self {
    self.show_progress = false;
    self
  }

  pub fn run(&mut self, ctx: &PublishContext) -> PublishResult<PublishOutcome> {
    self.validate_artifacts(ctx)?;
    let tag_created = self.tag_release(ctx)?;
    self.check_remote_version(ctx)?;

    println!("☁️  Uploading to {}", ctx.destination);
    let uploaded = publish_artifacts(self.store, ctx, self.show_progress)?;

    let latest_updated = if ctx.options.update_latest {
      update_latest_pointer(self.store, ctx)?;
      println!("   Updated {} -> {}", ctx.latest_pointer_path(), ctx.destination);
      true
    } else {
      false
    };

    Ok(PublishOutcome {
      tag: ctx.tag_name(),
      destination: ctx.destination.clone(),
      uploaded,
      tag_created,
      latest_updated,
    })
  }

  fn validate_artifacts(&self, ctx: &PublishContext) -> PublishResult<()> {
    for artifact in &ctx.config.artifacts {
      let path = ctx.artifact_path(artifact);
      println!("🔍 Checking {} ({})", artifact.path.display(), artifact.arch);
      check_artifact_is_release(self.inspector, &path, &ctx.config.inspect.expected_tag)?;
      println!("   ✅ {} build", ctx.config.inspect.expected_tag);
    }
    Ok(())
  }

  /// Returns whether the tag was created; a declined prompt is an error
  fn tag_release(&mut self, ctx: &PublishContext) -> PublishResult<bool> {
    let tag = ctx.tag_name();
    println!("🏷️  Creating tag {}", tag);

    match create_version_tag(self.vcs, &ctx.version) {
      Ok(()) => Ok(true),
      Err(e) => {
        println!("⚠️  Could not create tag {}: {}", tag, e);
        confirm_or_abort(
          &mut *self.prompter,
          "Continue publishing anyway?",
          &format!("tag {} could not be created", tag),
        )?;
        Ok(false)
      }
    }
  }

  fn check_remote_version(&mut self, ctx: &PublishContext) -> PublishResult<()> {
    if remote_version_exists(self.store, &ctx.config.remote_root, &ctx.version)? {
      println!("⚠️  {} already exists", ctx.destination);
      confirm_or_abort(
        &mut *self.prompter,
        &format!("Overwrite {}?", ctx.destination),
        &format!("{} already exists and was not overwritten", ctx.destination),
      )?;
    }
    Ok(())
  }
}

/// Create the annotated tag `v<version>` with the tag name as its message
pub fn create_version_tag(vcs: &dyn Vcs, version: &str) -> PublishResult<()> {
  let tag = crate::core::context::version_dir_name(version);
  vcs.create_annotated_tag(&tag, &tag)
}

/// Create the version directory, then upload each artifact into it
///
/// Stops at the first failure; what was already uploaded stays.
pub fn publish_artifacts(store: &dyn ObjectStore, ctx: &PublishContext, show_progress: bool) -> PublishResult<Vec<String>> {
  store.mkdirp(&ctx.destination)?;

  let mut progress = show_progress.then(|| UploadProgress::new(ctx.config.artifacts.len(), "Uploading"));
  let mut uploaded = Vec::with_capacity(ctx.config.artifacts.len());

  for artifact in &ctx.config.artifacts {
    let remote = ctx.remote_artifact_path(artifact);
    store.put_file(&ctx.artifact_path(artifact), &remote)?;
    info!("uploaded {} -> {}", artifact.path.display(), remote);
    if let Some(progress) = progress.as_mut() {
      progress.inc();
    }
    uploaded.push(remote);
  }

  Ok(uploaded)
}

/// Point `<root>/latest` at this version's directory
pub fn update_latest_pointer(store: &dyn ObjectStore, ctx: &PublishContext) -> PublishResult<()> {
  store.put_text(&format!("{}\n", ctx.destination), &ctx.latest_pointer_path())
}

/// Closing message: what happened and what the operator still has to do
pub fn follow_up_text(outcome: &PublishOutcome, version_file: &str) -> String {
  let mut lines = vec![format!("✅ Published {} to {}", outcome.tag, outcome.destination)];

  for remote in &outcome.uploaded {
    lines.push(format!("   {}", remote));
  }

  if outcome.latest_updated {
    lines.push("   Latest pointer updated".to_string());
  } else {
    lines.push("⚠️  Latest pointer NOT updated (re-run with --latest to update it)".to_string());
  }

  if !outcome.tag_created {
    lines.push(format!("⚠️  Tag {} was not created by this run", outcome.tag));
  }

  lines.push(String::new());
  lines.push("Next steps:".to_string());
  lines.push(format!("  1. Push the tag: git push origin {}", outcome.tag));
  lines.push("  2. Clean the build: make clean".to_string());
  lines.push(format!("  3. Bump {} to the next version", version_file));
  lines.push("  4. Commit the version bump".to_string());

  lines.join("\n")
}
