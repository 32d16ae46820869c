//! Object store backed by command-line clients
//!
//! Expects Manta-style tools:
//! - `<list> -j <dir>` prints one JSON object per entry
//! - `<mkdir> -p <dir>`
//! - `<put> -f <local> <remote>` uploads a file; without `-f` the body is read from stdin

use super::{ObjectStore, RemoteEntry};
use crate::core::config::ToolsConfig;
use crate::core::error::{PublishResult, RemoteError};
use log::debug;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

pub struct CliStore {
  list: String,
  mkdir: String,
  put: String,
}

impl CliStore {
  pub fn new(tools: &ToolsConfig) -> Self {
    Self {
      list: tools.list.clone(),
      mkdir: tools.mkdir.clone(),
      put: tools.put.clone(),
    }
  }
}

/// Run a command to completion, returning stderr (or the spawn error) on failure
fn run(cmd: &mut Command) -> Result<Output, String> {
  debug!("{:?}", cmd);
  let output = cmd.output().map_err(|e| e.to_string())?;
  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(format!("exited with {}: {}", output.status, stderr.trim_end()));
  }
  Ok(output)
}

/// Parse JSON-lines listing output, ignoring blank lines
pub fn parse_listing(stdout: &str) -> Result<Vec<RemoteEntry>, serde_json::Error> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(serde_json::from_str)
    .collect()
}

impl ObjectStore for CliStore {
  fn list(&self, path: &str) -> PublishResult<Vec<RemoteEntry>> {
    let list_failed = |reason: String| RemoteError::ListFailed {
      path: path.to_string(),
      reason,
    };

    let output = run(Command::new(&self.list).args(["-j", path])).map_err(list_failed)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let entries = parse_listing(&stdout).map_err(|e| list_failed(format!("unparsable listing: {}", e)))?;

    debug!("{} entries under {}", entries.len(), path);
    Ok(entries)
  }

  fn mkdirp(&self, path: &str) -> PublishResult<()> {
    run(Command::new(&self.mkdir).args(["-p", path])).map_err(|reason| RemoteError::UploadFailed {
      remote: path.to_string(),
      reason,
    })?;
    Ok(())
  }

  fn put_file(&self, local: &Path, remote: &str) -> PublishResult<()> {
    run(Command::new(&self.put).arg("-f").arg(local).arg(remote)).map_err(|reason| RemoteError::UploadFailed {
      remote: remote.to_string(),
      reason,
    })?;
    Ok(())
  }

  fn put_text(&self, content: &str, remote: &str) -> PublishResult<()> {
    let pointer_failed = |reason: String| RemoteError::PointerUpdateFailed {
      remote: remote.to_string(),
      reason,
    };

    let mut cmd = Command::new(&self.put);
    cmd
      .args(["-H", "content-type: text/plain", remote])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());
    debug!("{:?} <<< {:?}", cmd, content);

    let mut child = cmd.spawn().map_err(|e| pointer_failed(e.to_string()))?;
    // stdin is closed before waiting; a failed write is reported after the child is reaped
    let written = child
      .stdin
      .take()
      .map_or(Ok(()), |mut stdin| stdin.write_all(content.as_bytes()));

    let output = child.wait_with_output().map_err(|e| pointer_failed(e.to_string()))?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(pointer_failed(format!("exited with {}: {}", output.status, stderr.trim_end())).into());
    }
    written.map_err(|e| pointer_failed(format!("body not accepted: {}", e)))?;

    Ok(())
  }
}
