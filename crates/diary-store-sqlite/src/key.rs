//! Per-install encryption key for the database file.
//!
//! The key is 32 random bytes, kept hex-encoded in a credential file beside
//! the database and handed to SQLCipher as a raw key. Builds without the
//! `sqlcipher` feature accept the key and ignore it.

use std::{
  fmt, fs,
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use rand_core::{OsRng, RngCore as _};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{Error, Result};

const KEY_LEN: usize = 32;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DatabaseKey([u8; KEY_LEN]);

impl DatabaseKey {
  pub const LEN: usize = KEY_LEN;

  /// A fresh key from the operating system RNG.
  pub fn generate() -> Self {
    let mut bytes = [0u8; Self::LEN];
    OsRng.fill_bytes(&mut bytes);
    Self(bytes)
  }

  pub fn from_hex(encoded: &str) -> Result<Self> {
    let bytes = Zeroizing::new(
      hex::decode(encoded.trim()).map_err(|e| Error::Key(format!("invalid key encoding: {e}")))?,
    );
    let array: [u8; Self::LEN] = bytes.as_slice().try_into().map_err(|_| {
      Error::Key(format!("expected {} key bytes, found {}", Self::LEN, bytes.len()))
    })?;
    Ok(Self(array))
  }

  pub fn to_hex(&self) -> Zeroizing<String> { Zeroizing::new(hex::encode(self.0)) }

  /// The statement that unlocks the database; must run before anything else.
  pub(crate) fn pragma(&self) -> Zeroizing<String> {
    Zeroizing::new(format!("PRAGMA key = \"x'{}'\";", self.to_hex().as_str()))
  }
}

impl fmt::Debug for DatabaseKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("DatabaseKey(..)") }
}

/// A secure credential store with get-or-generate semantics.
pub trait KeyStore {
  fn get_or_generate(&self) -> Result<DatabaseKey>;
}

/// Keeps the key in a file readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
  path: PathBuf,
}

impl FileKeyStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl KeyStore for FileKeyStore {
  fn get_or_generate(&self) -> Result<DatabaseKey> {
    match fs::read_to_string(&self.path) {
      Ok(encoded) => DatabaseKey::from_hex(&Zeroizing::new(encoded)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        let key = DatabaseKey::generate();
        write_private(&self.path, key.to_hex().as_bytes())?;
        tracing::info!(path = %self.path.display(), "generated new database key");
        Ok(key)
      }
      Err(e) => Err(e.into()),
    }
  }
}

fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut options = fs::OpenOptions::new();
  options.write(true).create_new(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt as _;
    options.mode(0o600);
  }
  let mut file = options.open(path)?;
  file.write_all(contents)?;
  file.sync_all()
}
