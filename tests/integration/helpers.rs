//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const REMOTE_ROOT: &str = "/test/public/mdb_v8";

/// A module checkout with built artifacts, plus fake debugger/store tools
pub struct TestRelease {
  _root: TempDir,
  /// Git working tree the publisher runs in
  pub path: PathBuf,
  /// Directory holding the fake tools (put first on PATH)
  pub bin: PathBuf,
  /// Directory the fake store writes its state to
  pub store: PathBuf,
}

impl TestRelease {
  /// Create a checkout whose artifacts report `tag` when inspected
  pub fn new(version: &str, tag: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("mdb_v8");
    let bin = root.path().join("bin");
    let store = root.path().join("store");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&bin)?;
    std::fs::create_dir_all(&store)?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("version"), format!("# mdb_v8 version\n\n{}\n", version))?;
    std::fs::write(
      path.join("publish.toml"),
      format!(
        r#"remote_root = "{}"

[inspect]
poll_interval_ms = 50
poll_attempts = 200
"#,
        REMOTE_ROOT
      ),
    )?;
    std::fs::write(path.join(".gitignore"), "build/\n")?;
    for arch in ["ia32", "amd64"] {
      let dir = path.join("build").join(arch);
      std::fs::create_dir_all(&dir)?;
      std::fs::write(dir.join("mdb_v8.so"), format!("{} module", arch))?;
    }

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial import"])?;

    let release = Self {
      _root: root,
      path,
      bin,
      store,
    };
    release.install_tools(tag)?;
    release.set_listing(&[])?;
    Ok(release)
  }

  fn install_tools(&self, tag: &str) -> Result<()> {
    let log = self.store.join("log");

    write_script(
      &self.bin.join("mdb"),
      &format!(
        r#"#!/bin/sh
if [ "$1" = "-p" ]; then
  echo "mdbv8_vers_tag: {tag},"
  exit 0
fi
while IFS= read -r line; do
  case "$line" in
    '!touch '*) touch "${{line#!touch }}" ;;
  esac
done
exec sleep 30
"#
      ),
    )?;

    write_script(
      &self.bin.join("mls"),
      &format!(
        r#"#!/bin/sh
[ -f "{store}/list_fail" ] && {{ echo "mls: connection refused" >&2; exit 1; }}
cat "{store}/listing"
"#,
        store = self.store.display()
      ),
    )?;

    write_script(
      &self.bin.join("mmkdir"),
      &format!("#!/bin/sh\necho \"mkdir $2\" >> \"{}\"\n", log.display()),
    )?;

    write_script(
      &self.bin.join("mput"),
      &format!(
        r#"#!/bin/sh
if [ "$1" = "-f" ]; then
  echo "put $(basename "$(dirname "$2")") $3" >> "{log}"
  exit 0
fi
cat > "{store}/latest"
echo "text $3" >> "{log}"
"#,
        log = log.display(),
        store = self.store.display()
      ),
    )?;

    Ok(())
  }

  /// Names the fake store lists under the remote root
  pub fn set_listing(&self, names: &[&str]) -> Result<()> {
    let listing: String = names
      .iter()
      .map(|name| format!("{{\"name\":\"{}\",\"type\":\"directory\"}}\n", name))
      .collect();
    std::fs::write(self.store.join("listing"), listing)?;
    Ok(())
  }

  /// Make the fake listing command fail
  pub fn break_listing(&self) -> Result<()> {
    std::fs::write(self.store.join("list_fail"), "")?;
    Ok(())
  }

  /// Store operations performed so far, one per line
  pub fn store_log(&self) -> Vec<String> {
    std::fs::read_to_string(self.store.join("log"))
      .map(|log| log.lines().map(String::from).collect())
      .unwrap_or_default()
  }

  /// Content written to the latest pointer, if any
  pub fn latest(&self) -> Option<String> {
    std::fs::read_to_string(self.store.join("latest")).ok()
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(path), content)?;
    Ok(())
  }

  pub fn has_tag(&self, tag: &str) -> Result<bool> {
    let output = git(&self.path, &["tag", "-l", tag])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim() == tag)
  }

  /// Run the publisher with `stdin` as the operator's answers
  pub fn publish(&self, args: &[&str], stdin: &str) -> Result<Output> {
    let path = std::env::var("PATH").unwrap_or_default();

    let mut child = Command::new(env!("CARGO_BIN_EXE_dmod-release"))
      .current_dir(&self.path)
      .args(args)
      .env("PATH", format!("{}:{}", self.bin.display(), path))
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .context("Failed to run dmod-release")?;

    if let Some(mut input) = child.stdin.take() {
      // The publisher may exit before reading its answers
      let _ = input.write_all(stdin.as_bytes());
    }

    Ok(child.wait_with_output()?)
  }
}

fn write_script(path: &Path, content: &str) -> Result<()> {
  std::fs::write(path, content)?;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
