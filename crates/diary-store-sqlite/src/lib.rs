//! SQLite backend for the contact diary.
//!
//! Wraps [`tokio_rusqlite`] so every statement runs on one dedicated
//! connection thread, which serializes all access without blocking the
//! async runtime. The file is unlocked with a per-install key and, with the
//! `sqlcipher` feature, encrypted at rest.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod key;
pub mod lifecycle;
pub mod paths;
pub mod publisher;

pub use error::{Error, ErrorCode, Result};
pub use key::{DatabaseKey, FileKeyStore, KeyStore};
pub use lifecycle::LifecycleEvent;
pub use paths::DiaryPaths;
pub use publisher::{DiaryDayPublisher, DiarySubscription};
pub use schema::SCHEMA_VERSION;
pub use store::SqliteDiaryStore;
