//! Decoding between SQLite rows and diary domain types.
//!
//! Dates are stored as `YYYY-MM-DD` text; ids are plain rowids.

use diary_core::{
  id::{EncounterId, LocationId, PersonId, VisitId},
  model::{Encounter, Location, Person, Visit},
  window::parse_date,
};
use rusqlite::Row;

use crate::Result;

// ─── People and locations ────────────────────────────────────────────────────

/// Maps `SELECT id, name FROM ContactPerson`.
pub fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person { id: PersonId(row.get(0)?), name: row.get(1)? })
}

/// Maps `SELECT id, name FROM Location`.
pub fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
  Ok(Location { id: LocationId(row.get(0)?), name: row.get(1)? })
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Raw columns of an encounter or visit row, before date parsing.
pub struct RawEvent {
  pub id:        i64,
  pub date:      String,
  pub target_id: i64,
}

impl RawEvent {
  /// Maps `SELECT id, date, <foreign key>`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, date: row.get(1)?, target_id: row.get(2)? })
  }

  pub fn into_encounter(self) -> Result<Encounter> {
    Ok(Encounter {
      id:        EncounterId(self.id),
      date:      parse_date(&self.date)?,
      person_id: PersonId(self.target_id),
    })
  }

  pub fn into_visit(self) -> Result<Visit> {
    Ok(Visit {
      id:          VisitId(self.id),
      date:        parse_date(&self.date)?,
      location_id: LocationId(self.target_id),
    })
  }
}
