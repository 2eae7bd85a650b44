//! SQL schema for the contact diary store.
//!
//! Applied at connection startup. `PRAGMA user_version` records the schema
//! version; future migrations will be gated on it.

use rusqlite::Connection;

use crate::{Error, Result};

/// Version written by [`SCHEMA`].
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// `auto_vacuum` only takes effect before the first table exists, so it
/// comes first.
pub const SCHEMA: &str = "
PRAGMA auto_vacuum = FULL;
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS ContactPerson (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (LENGTH(name) <= 250)
);

CREATE TABLE IF NOT EXISTS Location (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (LENGTH(name) <= 250)
);

-- date is YYYY-MM-DD so text comparison orders by day.
CREATE TABLE IF NOT EXISTS ContactPersonEncounter (
    id              INTEGER PRIMARY KEY,
    date            TEXT NOT NULL,
    contactPersonId INTEGER NOT NULL
                    REFERENCES ContactPerson(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS LocationVisit (
    id         INTEGER PRIMARY KEY,
    date       TEXT NOT NULL,
    locationId INTEGER NOT NULL
               REFERENCES Location(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS encounter_date_idx   ON ContactPersonEncounter(date);
CREATE INDEX IF NOT EXISTS encounter_person_idx ON ContactPersonEncounter(contactPersonId);
CREATE INDEX IF NOT EXISTS visit_date_idx       ON LocationVisit(date);
CREATE INDEX IF NOT EXISTS visit_location_idx   ON LocationVisit(locationId);

PRAGMA user_version = 1;
";

/// Drops every diary table. [`create`] must run afterwards.
pub const DROP_ALL: &str = "
DROP TABLE IF EXISTS ContactPersonEncounter;
DROP TABLE IF EXISTS LocationVisit;
DROP TABLE IF EXISTS ContactPerson;
DROP TABLE IF EXISTS Location;
PRAGMA user_version = 0;
";

/// Create the schema if it is missing. Safe to call on an initialised
/// database.
///
/// Refuses a database written by a newer schema version.
pub fn create(conn: &Connection) -> Result<()> {
  let found = user_version(conn)?;
  if found > SCHEMA_VERSION {
    return Err(Error::UnsupportedSchemaVersion { found, supported: SCHEMA_VERSION });
  }
  conn.execute_batch(SCHEMA)?;
  Ok(())
}

pub fn user_version(conn: &Connection) -> Result<i64> {
  Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
