use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// SQLite file for the local store (defaults to $XDG_DATA_HOME/tasks/tasks.db)
  pub database_path: Option<PathBuf>,
  #[serde(default)]
  pub remote: RemoteConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Simulated service latency applied to every remote read
  #[serde(default = "default_latency_ms")]
  pub latency_ms: u64,
  /// Seed the remote service with the example tasks at startup
  #[serde(default = "default_true")]
  pub seed: bool,
  /// Start with the remote service unreachable
  #[serde(default)]
  pub offline: bool,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      latency_ms: default_latency_ms(),
      seed: true,
      offline: false,
    }
  }
}

impl RemoteConfig {
  pub fn latency(&self) -> Duration {
    Duration::from_millis(self.latency_ms)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// Tracing filter directive, e.g. "tasks=debug"
  pub filter: Option<String>,
  /// Directory for tasks.log (defaults to the data directory)
  pub directory: Option<PathBuf>,
}

fn default_latency_ms() -> u64 {
  5000
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./tasks.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/tasks/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("tasks.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("tasks").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Directory that receives tasks.log.
  pub fn log_directory(&self) -> Result<PathBuf> {
    match &self.log.directory {
      Some(dir) => Ok(dir.clone()),
      None => data_dir(),
    }
  }
}

/// Application data directory ($XDG_DATA_HOME/tasks).
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("tasks"))
}
