//! Persisted diary records.
//!
//! People and locations are the things a user can select on a day;
//! encounters and visits record that selection for one calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{EncounterId, LocationId, PersonId, VisitId};

/// Longest name, in characters, the store will persist.
pub const MAX_NAME_LEN: usize = 250;

/// Cut `name` to at most [`MAX_NAME_LEN`] characters.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_name(name: &str) -> String {
  match name.char_indices().nth(MAX_NAME_LEN) {
    Some((byte_idx, _)) => name[..byte_idx].to_owned(),
    None => name.to_owned(),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:   PersonId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub id:   LocationId,
  pub name: String,
}

/// "This person was met on this day."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
  pub id:        EncounterId,
  pub date:      NaiveDate,
  pub person_id: PersonId,
}

/// "This location was visited on this day."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
  pub id:          VisitId,
  pub date:        NaiveDate,
  pub location_id: LocationId,
}
