//! Required tool discovery
//!
//! Every external program the publisher shells out to must resolve on PATH
//! before any other step runs.

use crate::core::config::ToolsConfig;
use crate::core::error::{PublishError, PublishResult};
use log::debug;
use std::path::PathBuf;

/// Resolve a tool on PATH, failing with `ToolMissing` if it is not there
pub fn check_tool_available(name: &str) -> PublishResult<PathBuf> {
  match which::which(name) {
    Ok(path) => {
      debug!("found {} at {}", name, path.display());
      Ok(path)
    }
    Err(e) => {
      debug!("lookup of {} failed: {}", name, e);
      Err(PublishError::ToolMissing { name: name.to_string() })
    }
  }
}

/// Check every configured tool, stopping at the first missing one
pub fn check_required_tools(tools: &ToolsConfig) -> PublishResult<()> {
  for name in tools.all() {
    check_tool_available(name)?;
  }
  Ok(())
}
