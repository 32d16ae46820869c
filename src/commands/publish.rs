//! `dmod-release` - publish a release of the debugger module
//!
//! Wires the real collaborators (system git, debugger inspector, CLI object
//! store, stdin prompts) into the pipeline and prints the closing checklist.

use crate::checks::check_required_tools;
use crate::core::config::PublishConfig;
use crate::core::context::{Options, PublishContext};
use crate::core::error::PublishResult;
use crate::core::vcs::SystemGit;
use crate::inspect::DebuggerInspector;
use crate::release::{Publisher, follow_up_text, load_version};
use crate::store::CliStore;
use crate::ui::prompt::LinePrompter;
use std::env;

/// Run a full publish from the current directory
pub fn run_publish(options: Options) -> PublishResult<()> {
  let workspace_root = env::current_dir()?;
  let config = PublishConfig::load(&workspace_root)?;

  check_required_tools(&config.tools)?;

  let version = load_version(&workspace_root.join(&config.version_file))?;
  let ctx = PublishContext::new(workspace_root, options, config, version);

  println!("📦 Publishing {} to {}", ctx.tag_name(), ctx.destination);
  println!();

  let tools = &ctx.config.tools;
  let vcs = SystemGit::new(tools.git.as_str(), ctx.workspace_root());
  let inspector = DebuggerInspector::from_config(&tools.debugger, &ctx.config.inspect);
  let store = CliStore::new(tools);
  let mut prompter = LinePrompter::stdio();

  let outcome = Publisher::new(&vcs, &inspector, &store, &mut prompter).run(&ctx)?;

  println!();
  println!(
    "{}",
    follow_up_text(&outcome, &ctx.config.version_file.display().to_string())
  );

  Ok(())
}
