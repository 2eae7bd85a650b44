//! The diary read model: one [`DiaryDay`] per visible date.
//!
//! Never stored, always derived from the persisted records by
//! [`crate::projector::project`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  id::{EncounterId, VisitId},
  model::{Location, Person},
};

/// A selectable person or location on one day, with the event recorded for
/// that day if there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiaryEntry {
  Person {
    person:       Person,
    encounter_id: Option<EncounterId>,
  },
  Location {
    location: Location,
    visit_id: Option<VisitId>,
  },
}

impl DiaryEntry {
  pub fn name(&self) -> &str {
    match self {
      Self::Person { person, .. } => &person.name,
      Self::Location { location, .. } => &location.name,
    }
  }

  /// Whether an encounter or visit exists for this entry's day.
  pub fn is_selected(&self) -> bool {
    match self {
      Self::Person { encounter_id, .. } => encounter_id.is_some(),
      Self::Location { visit_id, .. } => visit_id.is_some(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryDay {
  pub date:    NaiveDate,
  /// People first, then locations; each group ordered by name, then id.
  pub entries: Vec<DiaryEntry>,
}

impl DiaryDay {
  pub fn selected(&self) -> impl Iterator<Item = &DiaryEntry> {
    self.entries.iter().filter(|e| e.is_selected())
  }

  /// Find an entry by name, the way a user would look it up.
  pub fn entry(&self, name: &str) -> Option<&DiaryEntry> {
    self.entries.iter().find(|e| e.name() == name)
  }
}
