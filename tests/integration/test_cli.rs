//! Command-line surface and startup checks

use crate::helpers::{TestRelease, stderr, stdout};
use anyhow::Result;

#[test]
fn test_unknown_flag_is_usage_error() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;

  let output = release.publish(&["--bogus"], "")?;
  assert_eq!(output.status.code(), Some(2));
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_positional_argument_is_usage_error() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;

  let output = release.publish(&["2.0.0"], "")?;
  assert_eq!(output.status.code(), Some(2));
  assert!(!release.has_tag("v2.0.0")?);
  Ok(())
}

#[test]
fn test_help_exits_zero() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;

  let output = release.publish(&["--help"], "")?;
  assert!(output.status.success());
  assert!(stdout(&output).contains("--latest"));
  Ok(())
}

#[test]
fn test_missing_tool_is_reported() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.write_file(
    "publish.toml",
    r#"remote_root = "/test/public/mdb_v8"

[tools]
debugger = "missing-debugger-xyz"
"#,
  )?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Required tool not found"), "stderr: {}", err);
  assert!(err.contains("missing-debugger-xyz"), "stderr: {}", err);
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.write_file("publish.toml", "remote_root = \"relative/path\"\n")?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(release.store_log().is_empty());
  Ok(())
}
