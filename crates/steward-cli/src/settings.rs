//! Runtime configuration for the `steward` binary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Deserialised from `steward.toml` and `STEWARD_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StewardConfig {
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("steward.db") }

impl StewardConfig {
  /// Layer the (optional) config file under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STEWARD"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise StewardConfig")
  }

  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
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
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = StewardConfig::load(Path::new("/nonexistent/steward.toml"));
    assert!(cfg.is_ok());
  }

  #[test]
  fn plain_paths_are_untouched() {
    assert_eq!(
      expand_tilde(Path::new("/var/lib/steward.db")),
      PathBuf::from("/var/lib/steward.db")
    );
    assert_eq!(expand_tilde(Path::new("steward.db")), PathBuf::from("steward.db"));
  }

  #[test]
  fn tilde_is_expanded_when_home_is_set() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/steward.db")),
        PathBuf::from(home).join("steward.db")
      );
    }
  }
}
