//! Error type for `diary-store-sqlite`.
//!
//! Engine failures are reduced to a closed [`ErrorCode`] taken from SQLite's
//! result code, so callers can branch on them without depending on
//! `rusqlite`.

use std::fmt;

use diary_core::id::EntityKind;
use thiserror::Error;

/// SQLite result codes the store distinguishes. Anything else is
/// [`ErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
  Constraint,
  Busy,
  Locked,
  /// Also what a wrong encryption key looks like.
  NotADatabase,
  Corrupt,
  DiskFull,
  ReadOnly,
  CannotOpen,
  Io,
  Unknown,
}

impl From<rusqlite::ErrorCode> for ErrorCode {
  fn from(code: rusqlite::ErrorCode) -> Self {
    use rusqlite::ErrorCode as E;
    match code {
      E::ConstraintViolation => Self::Constraint,
      E::DatabaseBusy => Self::Busy,
      E::DatabaseLocked => Self::Locked,
      E::NotADatabase => Self::NotADatabase,
      E::DatabaseCorrupt => Self::Corrupt,
      E::DiskFull => Self::DiskFull,
      E::ReadOnly => Self::ReadOnly,
      E::CannotOpen => Self::CannotOpen,
      E::SystemIoFailure => Self::Io,
      _ => Self::Unknown,
    }
  }
}

impl fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Constraint => "constraint",
      Self::Busy => "busy",
      Self::Locked => "locked",
      Self::NotADatabase => "not_a_database",
      Self::Corrupt => "corrupt",
      Self::DiskFull => "disk_full",
      Self::ReadOnly => "read_only",
      Self::CannotOpen => "cannot_open",
      Self::Io => "io",
      Self::Unknown => "unknown",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] diary_core::Error),

  #[error("storage error ({code}): {message}")]
  Storage { code: ErrorCode, message: String },

  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: i64 },

  #[error("database connection is closed")]
  ConnectionClosed,

  #[error("encryption key error: {0}")]
  Key(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("database schema version {found} is newer than supported version {supported}")]
  UnsupportedSchemaVersion { found: i64, supported: i64 },
}

impl Error {
  /// The engine code behind a storage failure, if this is one.
  pub fn code(&self) -> Option<ErrorCode> {
    match self {
      Self::Storage { code, .. } => Some(*code),
      _ => None,
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(err: rusqlite::Error) -> Self {
    match err {
      rusqlite::Error::SqliteFailure(ffi, message) => Self::Storage {
        code:    ffi.code.into(),
        message: message.unwrap_or_else(|| ffi.to_string()),
      },
      other => Self::Storage { code: ErrorCode::Unknown, message: other.to_string() },
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::ConnectionClosed => Self::ConnectionClosed,
      tokio_rusqlite::Error::Close((_, e)) => e.into(),
      tokio_rusqlite::Error::Rusqlite(e) => e.into(),
      tokio_rusqlite::Error::Other(e) => match e.downcast::<Error>() {
        Ok(inner) => *inner,
        Err(e) => Self::Storage { code: ErrorCode::Unknown, message: e.to_string() },
      },
      #[allow(unreachable_patterns)]
      other => Self::Storage { code: ErrorCode::Unknown, message: other.to_string() },
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
