//! Debugger-backed artifact inspection
//!
//! Each check runs one debugger session:
//!
//! 1. spawn the debugger with a script on stdin that loads the artifact,
//!    touches a marker file and then sleeps;
//! 2. poll for the marker (bounded by `PollPolicy`);
//! 3. attach a second debugger invocation to the session's pid and read the
//!    tag symbol;
//! 4. kill the session and remove the marker, whatever happened before.
//!
//! Step 4 lives in `Session::drop`, so every early return cleans up.

use super::{ArtifactInspector, Inspection, parse_tag_reply};
use crate::core::config::InspectConfig;
use crate::core::error::{ArtifactError, PublishError, PublishResult};
use log::{debug, trace, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

/// How long to sleep inside the session once the marker is written
const SESSION_SLEEP_SECS: u64 = 3600;

static MARKER_SEQ: AtomicU32 = AtomicU32::new(0);

/// Bounded wait for the session's ready marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
  pub interval: Duration,
  pub attempts: u32,
}

impl PollPolicy {
  /// Upper bound on time spent waiting, saturating at `Duration::MAX`
  pub fn timeout(&self) -> Duration {
    self.interval.checked_mul(self.attempts).unwrap_or(Duration::MAX)
  }
}

impl Default for PollPolicy {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(1),
      attempts: 30,
    }
  }
}

/// Poll for `marker`, checking once per interval, at most `attempts` intervals
pub fn wait_for_marker(marker: &Path, policy: &PollPolicy) -> bool {
  for attempt in 0..policy.attempts {
    if marker.exists() {
      return true;
    }
    trace!("waiting for {} ({}/{})", marker.display(), attempt + 1, policy.attempts);
    thread::sleep(policy.interval);
  }
  marker.exists()
}

/// Inspector that loads artifacts into a debugger process
pub struct DebuggerInspector {
  program: String,
  symbol: String,
  poll: PollPolicy,
  marker_dir: PathBuf,
}

impl DebuggerInspector {
  pub fn new(program: impl Into<String>, symbol: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      symbol: symbol.into(),
      poll: PollPolicy::default(),
      marker_dir: std::env::temp_dir(),
    }
  }

  /// Build from the `[inspect]` config section
  pub fn from_config(program: &str, config: &InspectConfig) -> Self {
    Self::new(program, config.symbol.as_str()).with_poll(PollPolicy {
      interval: config.poll_interval(),
      attempts: config.poll_attempts,
    })
  }

  pub fn with_poll(mut self, poll: PollPolicy) -> Self {
    self.poll = poll;
    self
  }

  #[cfg(test)]
  pub fn with_marker_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.marker_dir = dir.into();
    self
  }

  fn next_marker(&self) -> PathBuf {
    let seq = MARKER_SEQ.fetch_add(1, Ordering::Relaxed);
    self
      .marker_dir
      .join(format!("dmod-release.{}.{}.ready", std::process::id(), seq))
  }

  /// Script fed to the debugger: load, signal, pause
  fn session_script(artifact: &Path, marker: &Path) -> String {
    format!(
      "::load {}\n!touch {}\n!sleep {}\n",
      artifact.display(),
      marker.display(),
      SESSION_SLEEP_SECS
    )
  }

  fn start_session(&self, artifact: &Path) -> PublishResult<Session> {
    let marker = self.next_marker();
    let _ = fs::remove_file(&marker);

    debug!("{} < load {} (marker {})", self.program, artifact.display(), marker.display());
    let mut child = Command::new(&self.program)
      .stdin(Stdio::piped())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()
      .map_err(|e| inspect_failed(artifact, format!("failed to start {}: {}", self.program, e)))?;

    let script = Self::session_script(artifact, &marker);
    if let Some(mut stdin) = child.stdin.take()
      && let Err(e) = stdin.write_all(script.as_bytes())
    {
      // The session may already be gone; the marker poll reports that as a timeout.
      debug!("writing script to {} failed: {}", self.program, e);
    }

    Ok(Session { child, marker })
  }

  fn query_tag(&self, pid: u32, artifact: &Path) -> PublishResult<String> {
    let expr = format!("{}/s", self.symbol);
    debug!("{} -p {} -e {}", self.program, pid, expr);

    let output = Command::new(&self.program)
      .args(["-p", &pid.to_string(), "-e", &expr])
      .output()
      .map_err(|e| inspect_failed(artifact, format!("failed to run {}: {}", self.program, e)))?;

    if !output.status.success() {
      return Err(inspect_failed(
        artifact,
        format!(
          "{} -p {} exited with {}: {}",
          self.program,
          pid,
          output.status,
          String::from_utf8_lossy(&output.stderr).trim_end()
        ),
      ));
    }

    let reply = String::from_utf8_lossy(&output.stdout);
    parse_tag_reply(&reply)
      .ok_or_else(|| inspect_failed(artifact, format!("unexpected reply for {}: {:?}", self.symbol, reply.trim())))
  }
}

impl ArtifactInspector for DebuggerInspector {
  fn inspect(&self, artifact: &Path) -> PublishResult<Inspection> {
    let session = self.start_session(artifact)?;

    if !wait_for_marker(&session.marker, &self.poll) {
      return Err(
        ArtifactError::CheckTimedOut {
          path: artifact.to_path_buf(),
          waited: self.poll.timeout(),
        }
        .into(),
      );
    }

    let tag = self.query_tag(session.child.id(), artifact)?;
    Ok(Inspection { tag })
  }
}

/// A running debugger session; killed and cleaned up on drop
struct Session {
  child: Child,
  marker: PathBuf,
}

impl Drop for Session {
  fn drop(&mut self) {
    if let Err(e) = self.child.kill() {
      debug!("kill of debugger session {} failed: {}", self.child.id(), e);
    }
    if let Err(e) = self.child.wait() {
      warn!("could not reap debugger session {}: {}", self.child.id(), e);
    }
    let _ = fs::remove_file(&self.marker);
  }
}

fn inspect_failed(artifact: &Path, reason: String) -> PublishError {
  ArtifactError::InspectFailed {
    path: artifact.to_path_buf(),
    reason,
  }
  .into()
}
