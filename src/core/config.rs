use crate::core::error::{ConfigError, PublishError, PublishResult, ResultExt};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for dmod-release
/// Searched in order: publish.toml, .publish.toml, .config/publish.toml
///
/// Every field has a default, so running without a config file publishes the
/// standard two-architecture layout.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
  /// File holding the release version (first non-comment line)
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// Remote directory that holds `v<version>/` directories and `latest`
  #[serde(default = "default_remote_root")]
  pub remote_root: String,

  #[serde(default)]
  pub tools: ToolsConfig,

  #[serde(default)]
  pub inspect: InspectConfig,

  #[serde(default = "default_artifacts")]
  pub artifacts: Vec<ArtifactConfig>,
}

/// External programs the publisher shells out to
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_git")]
  pub git: String,

  /// Debugger used to load and inspect each artifact
  #[serde(default = "default_debugger")]
  pub debugger: String,

  /// Store listing command (must support `-j` JSON-lines output)
  #[serde(default = "default_list")]
  pub list: String,

  /// Store directory creation command (must support `-p`)
  #[serde(default = "default_mkdir")]
  pub mkdir: String,

  /// Store upload command
  #[serde(default = "default_put")]
  pub put: String,
}

fn default_git() -> String {
  "git".to_string()
}

fn default_debugger() -> String {
  "mdb".to_string()
}

fn default_list() -> String {
  "mls".to_string()
}

fn default_mkdir() -> String {
  "mmkdir".to_string()
}

fn default_put() -> String {
  "mput".to_string()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      git: default_git(),
      debugger: default_debugger(),
      list: default_list(),
      mkdir: default_mkdir(),
      put: default_put(),
    }
  }
}

impl ToolsConfig {
  /// All configured programs, in the order they are checked
  pub fn all(&self) -> [&str; 5] {
    [&self.git, &self.debugger, &self.list, &self.mkdir, &self.put]
  }
}

/// Release marker inspection settings
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
  /// Symbol embedded in the module that names its build flavor
  #[serde(default = "default_symbol")]
  pub symbol: String,

  /// Value the symbol must hold for a publishable build
  #[serde(default = "default_expected_tag")]
  pub expected_tag: String,

  #[serde(default = "default_poll_interval_ms")]
  pub poll_interval_ms: u64,

  #[serde(default = "default_poll_attempts")]
  pub poll_attempts: u32,
}

fn default_symbol() -> String {
  "mdbv8_vers_tag".to_string()
}

fn default_expected_tag() -> String {
  "release".to_string()
}

fn default_poll_interval_ms() -> u64 {
  1000
}

fn default_poll_attempts() -> u32 {
  30
}

impl Default for InspectConfig {
  fn default() -> Self {
    Self {
      symbol: default_symbol(),
      expected_tag: default_expected_tag(),
      poll_interval_ms: default_poll_interval_ms(),
      poll_attempts: default_poll_attempts(),
    }
  }
}

impl InspectConfig {
  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }
}

/// One built artifact, one per target architecture
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactConfig {
  /// Target architecture label (e.g. "amd64")
  pub arch: String,
  /// Local path, relative to the working directory
  pub path: PathBuf,
  /// File name under the remote version directory
  pub name: String,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("version")
}

fn default_remote_root() -> String {
  "/Joyent_Dev/public/mdb_v8".to_string()
}

fn default_artifacts() -> Vec<ArtifactConfig> {
  ["ia32", "amd64"]
    .into_iter()
    .map(|arch| ArtifactConfig {
      arch: arch.to_string(),
      path: PathBuf::from("build").join(arch).join("mdb_v8.so"),
      name: format!("mdb_v8_{}.so", arch),
    })
    .collect()
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      version_file: default_version_file(),
      remote_root: default_remote_root(),
      tools: ToolsConfig::default(),
      inspect: InspectConfig::default(),
      artifacts: default_artifacts(),
    }
  }
}

impl PublishConfig {
  /// Find config file in search order: publish.toml, .publish.toml, .config/publish.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("publish.toml"),
      path.join(".publish.toml"),
      path.join(".config").join("publish.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to the built-in defaults when no file exists
  pub fn load(path: &Path) -> PublishResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      debug!("no publish.toml under {}, using defaults", path.display());
      return Ok(Self::default());
    };

    debug!("loading config from {}", config_path.display());
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).map_err(|e| {
      PublishError::Config(ConfigError::Parse {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Parse config from TOML text
  pub fn parse(content: &str) -> Result<Self, toml_edit::de::Error> {
    toml_edit::de::from_str(content)
  }

  /// Validate configuration
  pub fn validate(&self) -> PublishResult<()> {
    if self.artifacts.is_empty() {
      return Err(invalid("at least one [[artifacts]] entry is required"));
    }

    let mut names = HashSet::new();
    for artifact in &self.artifacts {
      if !names.insert(artifact.name.as_str()) {
        return Err(invalid(format!("duplicate artifact name '{}'", artifact.name)));
      }
    }

    if self.inspect.poll_attempts == 0 {
      return Err(invalid("inspect.poll_attempts must be at least 1"));
    }

    let total_wait_ms = self
      .inspect
      .poll_interval_ms
      .checked_mul(u64::from(self.inspect.poll_attempts));
    if total_wait_ms.is_none_or(|ms| ms > MAX_POLL_WAIT_MS) {
      return Err(invalid(format!(
        "inspect.poll_interval_ms * inspect.poll_attempts must not exceed {} ms",
        MAX_POLL_WAIT_MS
      )));
    }

    if !self.remote_root.starts_with('/') {
      return Err(invalid(format!(
        "remote_root must be an absolute remote path, got '{}'",
        self.remote_root
      )));
    }

    Ok(())
  }
}

/// A debugger session only pauses for an hour, so polling longer is pointless
const MAX_POLL_WAIT_MS: u64 = 3_600_000;

fn invalid(reason: impl Into<String>) -> PublishError {
  PublishError::Config(ConfigError::Invalid { reason: reason.into() })
}
