//! Runtime server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file given
//! with `--config` (optional), then `SYMLOG_*` environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("symlog.db") }

impl ServerConfig {
  /// Load from `path` (if it exists) layered under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::from_file_source(config::File::from(path).required(false))
  }

  fn from_file_source<T>(file: T) -> Result<Self, config::ConfigError>
  where
    T: config::Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .add_source(file)
      .add_source(config::Environment::with_prefix("SYMLOG"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/symlog.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("symlog.db"));
  }

  #[test]
  fn toml_overrides_defaults() {
    let toml = "host = \"0.0.0.0\"\nport = 9000\nstore_path = \"/var/lib/symlog.db\"\n";
    let cfg = ServerConfig::from_file_source(File::from_str(toml, FileFormat::Toml)).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/symlog.db"));
  }

  #[test]
  fn absolute_paths_are_not_expanded() {
    let p = Path::new("/tmp/symlog.db");
    assert_eq!(expand_tilde(p), p);
  }
}
