//! Runtime configuration, read from `config.toml` and `DIARY_*` variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DiaryConfig {
  /// Folder holding the database and its key file.
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf { PathBuf::from("~/.local/share/contact-diary") }

impl Default for DiaryConfig {
  fn default() -> Self { Self { data_dir: default_data_dir() } }
}

/// Merge the optional config file with the environment. Environment wins.
pub fn load(path: &Path) -> anyhow::Result<DiaryConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("DIARY"))
    .build()
    .context("failed to read config file")?;

  settings.try_deserialize().context("failed to deserialise DiaryConfig")
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
