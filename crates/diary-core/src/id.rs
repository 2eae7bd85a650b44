//! Strongly typed row identities.
//!
//! Every id is the SQLite rowid of its table. Distinct newtypes keep a
//! person id from being passed where a location id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four persisted record kinds, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Person,
  Location,
  Encounter,
  Visit,
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Person => "person",
      Self::Location => "location",
      Self::Encounter => "encounter",
      Self::Visit => "visit",
    })
  }
}

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident => $kind:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub const KIND: EntityKind = EntityKind::$kind;

      pub fn get(self) -> i64 { self.0 }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

row_id!(
  /// Identity of a row in `ContactPerson`.
  PersonId => Person
);
row_id!(
  /// Identity of a row in `Location`.
  LocationId => Location
);
row_id!(
  /// Identity of a row in `ContactPersonEncounter`.
  EncounterId => Encounter
);
row_id!(
  /// Identity of a row in `LocationVisit`.
  VisitId => Visit
);
