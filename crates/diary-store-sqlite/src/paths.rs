//! Where the diary lives on disk.

use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::Result;

const DATABASE_FILE: &str = "ContactDiary.sqlite";
const KEY_FILE: &str = "ContactDiary.key";

/// The database file and its key file, both inside one folder.
#[derive(Debug, Clone)]
pub struct DiaryPaths {
  dir: PathBuf,
}

impl DiaryPaths {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn database(&self) -> PathBuf { self.dir.join(DATABASE_FILE) }

  pub fn key(&self) -> PathBuf { self.dir.join(KEY_FILE) }

  /// Create the folder if it does not exist yet.
  pub fn ensure_dir(&self) -> Result<()> {
    fs::create_dir_all(&self.dir)?;
    Ok(())
  }
}
