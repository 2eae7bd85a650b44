//! Core types and trait definitions for the contact diary.
//!
//! This crate is free of database and runtime dependencies. The SQLite
//! backend and the `diary` binary both build on it.

pub mod clock;
pub mod diary;
pub mod error;
pub mod export;
pub mod id;
pub mod model;
pub mod projector;
pub mod store;
pub mod window;

pub use error::{Error, Result};
