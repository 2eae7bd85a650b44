//! [`SqliteDiaryStore`] — the SQLite implementation of [`DiaryStore`].

use std::{path::Path, sync::Arc};

use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};

use diary_core::{
  clock::Clock,
  diary::DiaryDay,
  export::render_text,
  id::{EncounterId, EntityKind, LocationId, PersonId, VisitId},
  model::{Location, Person, truncate_name},
  projector::{ProjectionInput, project, sorted_by_name},
  store::{CleanupReport, DiaryStore},
  window::{format_date, retention_cutoff, visible_start},
};

use crate::{
  Error, Result,
  encode::{RawEvent, location_from_row, person_from_row},
  key::{DatabaseKey, KeyStore},
  paths::DiaryPaths,
  publisher::{DiaryDayPublisher, DiarySubscription},
  schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact diary backed by a single SQLite file.
///
/// All statements run on the one connection thread owned by
/// [`tokio_rusqlite::Connection`], which serializes every read and write.
/// Cloning is cheap; clones share the connection and the publisher.
#[derive(Clone)]
pub struct SqliteDiaryStore {
  conn:      tokio_rusqlite::Connection,
  clock:     Arc<dyn Clock>,
  publisher: Arc<DiaryDayPublisher>,
}

impl SqliteDiaryStore {
  /// Open the diary in `paths`, creating the folder and the key if needed.
  pub async fn open(
    paths: &DiaryPaths,
    keys: &impl KeyStore,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    paths.ensure_dir()?;
    let key = keys.get_or_generate()?;
    Self::open_with_key(paths.database(), &key, clock).await
  }

  /// Open (or create) an encrypted store at `path` unlocked with `key`.
  ///
  /// Runs schema creation and one cleanup pass, so the projection is
  /// published before this returns.
  pub async fn open_with_key(
    path: impl AsRef<Path>,
    key: &DatabaseKey,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self::new(conn, clock);
    store.unlock(key).await?;
    store.init().await?;
    tracing::debug!(path = %path.display(), "opened diary store");
    Ok(store)
  }

  /// Open an unencrypted in-memory store for tests.
  pub async fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::new(conn, clock);
    store.init().await?;
    Ok(store)
  }

  fn new(conn: tokio_rusqlite::Connection, clock: Arc<dyn Clock>) -> Self {
    Self { conn, clock, publisher: Arc::new(DiaryDayPublisher::new()) }
  }

  /// Apply the key, then prove it works by reading the schema table.
  ///
  /// With the `sqlcipher` feature a wrong key surfaces here as
  /// [`crate::ErrorCode::NotADatabase`]. Plain SQLite ignores the pragma, so
  /// without the feature any key opens the file and nothing is encrypted.
  async fn unlock(&self, key: &DatabaseKey) -> Result<()> {
    let pragma = key.pragma();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&pragma)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |r| r.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init(&self) -> Result<()> {
    self.create_schema().await?;
    let report = self.cleanup().await?;
    tracing::debug!(?report, "initial cleanup");
    Ok(())
  }

  // ── Schema ────────────────────────────────────────────────────────────────

  /// Create the schema if missing. Idempotent.
  pub async fn create_schema(&self) -> Result<()> {
    self.read(|conn| schema::create(conn)).await
  }

  pub async fn schema_version(&self) -> Result<i64> {
    self.read(|conn| schema::user_version(conn)).await
  }

  // ── Observation ───────────────────────────────────────────────────────────

  /// Observe the diary projection; see [`DiarySubscription`].
  pub fn subscribe(&self) -> DiarySubscription { self.publisher.subscribe() }

  /// The most recently published projection, without touching the database.
  pub fn latest(&self) -> Vec<DiaryDay> { self.publisher.latest() }

  /// Plain-text summary of the visible window for sharing.
  pub async fn export_as_text(&self) -> Result<String> {
    Ok(render_text(&self.diary_days().await?))
  }

  /// Close the connection. Clones of this store fail afterwards with
  /// [`Error::ConnectionClosed`].
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  // ── Connection helpers ────────────────────────────────────────────────────

  /// Run `op` on the connection thread without publishing.
  async fn read<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let value = self.conn.call(move |conn| op(conn).map_err(into_call_error)).await?;
    Ok(value)
  }

  /// Run `op`, then re-project and publish on the same thread.
  ///
  /// Publishing inside the call keeps publications in commit order, and the
  /// new projection is visible before the caller's future completes. Once
  /// `op` has succeeded its write is committed, so a failing re-projection
  /// is logged and the previous publication stays current; the caller still
  /// gets the value.
  async fn mutate<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let clock = Arc::clone(&self.clock);
    let publisher = Arc::clone(&self.publisher);
    self
      .read(move |conn| {
        let value = op(conn)?;
        match load_diary_days(conn, clock.today()) {
          Ok(days) => publisher.publish(days),
          Err(e) => tracing::warn!(error = %e, "re-projection after write failed"),
        }
        Ok(value)
      })
      .await
  }

  /// Run raw SQL on the connection thread.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self.read(move |conn| Ok(conn.execute_batch(sql)?)).await
  }
}

/// Smuggle a store error through `tokio_rusqlite`; [`Error::from`] unwraps
/// it again.
fn into_call_error(err: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err))
}

fn ensure_changed(changes: usize, kind: EntityKind, id: i64) -> Result<()> {
  if changes == 0 {
    return Err(Error::NotFound { kind, id });
  }
  Ok(())
}

// ─── Reads on the connection thread ──────────────────────────────────────────

fn load_people(conn: &Connection) -> Result<Vec<Person>> {
  let mut stmt = conn.prepare_cached("SELECT id, name FROM ContactPerson")?;
  let rows = stmt.query_map([], person_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_locations(conn: &Connection) -> Result<Vec<Location>> {
  let mut stmt = conn.prepare_cached("SELECT id, name FROM Location")?;
  let rows = stmt.query_map([], location_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_events(conn: &Connection, sql: &str, since: NaiveDate) -> Result<Vec<RawEvent>> {
  let mut stmt = conn.prepare_cached(sql)?;
  let rows = stmt
    .query_map(rusqlite::params![format_date(since)], RawEvent::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Gather the rows of the visible window and fold them into diary days.
fn load_diary_days(conn: &Connection, today: NaiveDate) -> Result<Vec<DiaryDay>> {
  let since = visible_start(today);

  let encounters = load_events(
    conn,
    "SELECT id, date, contactPersonId FROM ContactPersonEncounter WHERE date >= ?1",
    since,
  )?
  .into_iter()
  .map(RawEvent::into_encounter)
  .collect::<Result<_>>()?;

  let visits = load_events(
    conn,
    "SELECT id, date, locationId FROM LocationVisit WHERE date >= ?1",
    since,
  )?
  .into_iter()
  .map(RawEvent::into_visit)
  .collect::<Result<_>>()?;

  let input = ProjectionInput {
    people: load_people(conn)?,
    locations: load_locations(conn)?,
    encounters,
    visits,
  };
  Ok(project(today, &input))
}

// ─── DiaryStore impl ─────────────────────────────────────────────────────────

impl DiaryStore for SqliteDiaryStore {
  type Error = Error;

  // ── People and locations ──────────────────────────────────────────────────

  async fn add_person(&self, name: &str) -> Result<PersonId> {
    let name = truncate_name(name);
    let id = self
      .mutate(move |conn| {
        conn.execute("INSERT INTO ContactPerson (name) VALUES (?1)", rusqlite::params![name])?;
        Ok(PersonId(conn.last_insert_rowid()))
      })
      .await?;
    tracing::debug!(%id, "added person");
    Ok(id)
  }

  async fn add_location(&self, name: &str) -> Result<LocationId> {
    let name = truncate_name(name);
    let id = self
      .mutate(move |conn| {
        conn.execute("INSERT INTO Location (name) VALUES (?1)", rusqlite::params![name])?;
        Ok(LocationId(conn.last_insert_rowid()))
      })
      .await?;
    tracing::debug!(%id, "added location");
    Ok(id)
  }

  async fn update_person(&self, id: PersonId, name: &str) -> Result<()> {
    let name = truncate_name(name);
    self
      .mutate(move |conn| {
        let changes = conn.execute(
          "UPDATE ContactPerson SET name = ?1 WHERE id = ?2",
          rusqlite::params![name, id.get()],
        )?;
        ensure_changed(changes, PersonId::KIND, id.get())
      })
      .await
  }

  async fn update_location(&self, id: LocationId, name: &str) -> Result<()> {
    let name = truncate_name(name);
    self
      .mutate(move |conn| {
        let changes = conn.execute(
          "UPDATE Location SET name = ?1 WHERE id = ?2",
          rusqlite::params![name, id.get()],
        )?;
        ensure_changed(changes, LocationId::KIND, id.get())
      })
      .await
  }

  async fn remove_person(&self, id: PersonId) -> Result<()> {
    self
      .mutate(move |conn| {
        // Encounters go with it via ON DELETE CASCADE.
        let changes =
          conn.execute("DELETE FROM ContactPerson WHERE id = ?1", rusqlite::params![id.get()])?;
        ensure_changed(changes, PersonId::KIND, id.get())
      })
      .await?;
    tracing::debug!(%id, "removed person");
    Ok(())
  }

  async fn remove_location(&self, id: LocationId) -> Result<()> {
    self
      .mutate(move |conn| {
        let changes =
          conn.execute("DELETE FROM Location WHERE id = ?1", rusqlite::params![id.get()])?;
        ensure_changed(changes, LocationId::KIND, id.get())
      })
      .await?;
    tracing::debug!(%id, "removed location");
    Ok(())
  }

  async fn remove_all_people(&self) -> Result<()> {
    let removed = self.mutate(|conn| Ok(conn.execute("DELETE FROM ContactPerson", [])?)).await?;
    tracing::debug!(removed, "removed all people");
    Ok(())
  }

  async fn remove_all_locations(&self) -> Result<()> {
    let removed = self.mutate(|conn| Ok(conn.execute("DELETE FROM Location", [])?)).await?;
    tracing::debug!(removed, "removed all locations");
    Ok(())
  }

  async fn people(&self) -> Result<Vec<Person>> {
    let people = self.read(|conn| load_people(conn)).await?;
    Ok(sorted_by_name(&people, |p| (&p.name, p.id)).into_iter().cloned().collect())
  }

  async fn locations(&self) -> Result<Vec<Location>> {
    let locations = self.read(|conn| load_locations(conn)).await?;
    Ok(sorted_by_name(&locations, |l| (&l.name, l.id)).into_iter().cloned().collect())
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn add_encounter(&self, person_id: PersonId, date: NaiveDate) -> Result<EncounterId> {
    let date_str = format_date(date);
    let id = self
      .mutate(move |conn| {
        conn.execute(
          "INSERT INTO ContactPersonEncounter (date, contactPersonId) VALUES (?1, ?2)",
          rusqlite::params![date_str, person_id.get()],
        )?;
        Ok(EncounterId(conn.last_insert_rowid()))
      })
      .await?;
    tracing::debug!(%id, %person_id, %date, "added encounter");
    Ok(id)
  }

  async fn add_visit(&self, location_id: LocationId, date: NaiveDate) -> Result<VisitId> {
    let date_str = format_date(date);
    let id = self
      .mutate(move |conn| {
        conn.execute(
          "INSERT INTO LocationVisit (date, locationId) VALUES (?1, ?2)",
          rusqlite::params![date_str, location_id.get()],
        )?;
        Ok(VisitId(conn.last_insert_rowid()))
      })
      .await?;
    tracing::debug!(%id, %location_id, %date, "added visit");
    Ok(id)
  }

  async fn remove_encounter(&self, id: EncounterId) -> Result<()> {
    self
      .mutate(move |conn| {
        let changes = conn.execute(
          "DELETE FROM ContactPersonEncounter WHERE id = ?1",
          rusqlite::params![id.get()],
        )?;
        ensure_changed(changes, EncounterId::KIND, id.get())
      })
      .await
  }

  async fn remove_visit(&self, id: VisitId) -> Result<()> {
    self
      .mutate(move |conn| {
        let changes =
          conn.execute("DELETE FROM LocationVisit WHERE id = ?1", rusqlite::params![id.get()])?;
        ensure_changed(changes, VisitId::KIND, id.get())
      })
      .await
  }

  // ── Maintenance and reads ─────────────────────────────────────────────────

  async fn cleanup(&self) -> Result<CleanupReport> {
    let cutoff = retention_cutoff(self.clock.today());
    let cutoff_str = format_date(cutoff);

    let report = self
      .mutate(move |conn| {
        // Dropping an uncommitted transaction rolls it back, so an error in
        // any step leaves both tables untouched.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;
        let encounters = tx.execute(
          "DELETE FROM ContactPersonEncounter WHERE date < ?1",
          rusqlite::params![cutoff_str],
        )?;
        let visits =
          tx.execute("DELETE FROM LocationVisit WHERE date < ?1", rusqlite::params![cutoff_str])?;
        tx.commit()?;
        Ok(CleanupReport { encounters, visits })
      })
      .await?;

    tracing::info!(
      %cutoff,
      encounters = report.encounters,
      visits = report.visits,
      "diary cleanup finished"
    );
    Ok(report)
  }

  async fn reset(&self) -> Result<()> {
    self
      .mutate(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(schema::DROP_ALL)?;
        tx.commit()?;
        schema::create(conn)
      })
      .await?;
    tracing::info!("diary reset");
    Ok(())
  }

  async fn diary_days(&self) -> Result<Vec<DiaryDay>> {
    let clock = Arc::clone(&self.clock);
    self.read(move |conn| load_diary_days(conn, clock.today())).await
  }
}
