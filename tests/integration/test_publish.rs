//! End-to-end publish runs against the fake debugger and store

use crate::helpers::{REMOTE_ROOT, TestRelease, stderr, stdout};
use anyhow::Result;

fn expected_uploads(version: &str) -> Vec<String> {
  let dest = format!("{}/v{}", REMOTE_ROOT, version);
  vec![
    format!("mkdir {}", dest),
    format!("put ia32 {}/mdb_v8_ia32.so", dest),
    format!("put amd64 {}/mdb_v8_amd64.so", dest),
  ]
}

#[test]
fn test_clean_publish() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;

  let output = release.publish(&[], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert_eq!(release.store_log(), expected_uploads("2.0.0"));
  assert!(release.has_tag("v2.0.0")?);
  assert_eq!(release.latest(), None);

  let out = stdout(&output);
  assert!(out.contains("Latest pointer NOT updated"), "stdout: {}", out);
  assert!(out.contains("git push origin v2.0.0"), "stdout: {}", out);
  Ok(())
}

#[test]
fn test_publish_with_latest() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;

  let output = release.publish(&["--latest"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let mut expected = expected_uploads("2.0.0");
  expected.push(format!("text {}/latest", REMOTE_ROOT));
  assert_eq!(release.store_log(), expected);
  assert_eq!(release.latest().as_deref(), Some("/test/public/mdb_v8/v2.0.0\n"));
  assert!(!stdout(&output).contains("Latest pointer NOT updated"));
  Ok(())
}

#[test]
fn test_short_latest_flag() -> Result<()> {
  let release = TestRelease::new("2.1.0", "release")?;

  let output = release.publish(&["-l"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(release.latest().as_deref(), Some("/test/public/mdb_v8/v2.1.0\n"));
  Ok(())
}

#[test]
fn test_dev_build_is_refused() -> Result<()> {
  let release = TestRelease::new("2.0.0", "dev")?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("not a release build"), "stderr: {}", stderr(&output));

  assert!(!release.has_tag("v2.0.0")?);
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_existing_remote_version_declined() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.set_listing(&["latest", "v1.9.0", "v2.0.0"])?;

  let output = release.publish(&[], "n\n")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Aborted"), "stderr: {}", stderr(&output));
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_existing_remote_version_overwritten() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.set_listing(&["v2.0.0"])?;

  let output = release.publish(&[], "y\n")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(release.store_log(), expected_uploads("2.0.0"));
  Ok(())
}

#[test]
fn test_similar_remote_version_is_not_a_conflict() -> Result<()> {
  let release = TestRelease::new("1.2.3", "release")?;
  release.set_listing(&["v1.2.30"])?;

  // No answer is supplied; a prompt would read EOF and abort.
  let output = release.publish(&[], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(release.store_log(), expected_uploads("1.2.3"));
  Ok(())
}

#[test]
fn test_existing_tag_continue() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  crate::helpers::git(&release.path, &["tag", "-a", "v2.0.0", "-m", "earlier attempt"])?;

  let output = release.publish(&[], "y\n")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(release.store_log(), expected_uploads("2.0.0"));
  assert!(stdout(&output).contains("was not created by this run"));
  Ok(())
}

#[test]
fn test_existing_tag_declined() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  crate::helpers::git(&release.path, &["tag", "-a", "v2.0.0", "-m", "earlier attempt"])?;

  let output = release.publish(&[], "n\n")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_unreachable_store_is_fatal() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.break_listing()?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_version_file_without_version() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  release.write_file("version", "# nothing here yet\n\n")?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(release.store_log().is_empty());
  Ok(())
}

#[test]
fn test_missing_artifact() -> Result<()> {
  let release = TestRelease::new("2.0.0", "release")?;
  std::fs::remove_file(release.path.join("build/amd64/mdb_v8.so"))?;

  let output = release.publish(&[], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("mdb_v8.so"), "stderr: {}", stderr(&output));
  assert!(!release.has_tag("v2.0.0")?);
  assert!(release.store_log().is_empty());
  Ok(())
}
