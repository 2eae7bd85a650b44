//! The `DiaryStore` trait.
//!
//! Implemented by storage backends (e.g. `diary-store-sqlite`). The `diary`
//! binary depends on this abstraction, not on a concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  diary::DiaryDay,
  id::{EncounterId, LocationId, PersonId, VisitId},
  model::{Location, Person},
};

/// Rows removed by one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
  pub encounters: usize,
  pub visits:     usize,
}

/// Abstraction over a contact diary backend.
///
/// Every successful mutation leaves the backend's published
/// [`DiaryDay`] projection up to date before the returned future completes.
/// Names longer than [`crate::model::MAX_NAME_LEN`] are truncated.
pub trait DiaryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People and locations ──────────────────────────────────────────────

  fn add_person<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + 'a;

  fn add_location<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<LocationId, Self::Error>> + Send + 'a;

  /// Rename a person. Fails if `id` does not exist.
  fn update_person<'a>(
    &'a self,
    id: PersonId,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Rename a location. Fails if `id` does not exist.
  fn update_location<'a>(
    &'a self,
    id: LocationId,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a person together with all of their encounters.
  fn remove_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a location together with all of its visits.
  fn remove_location(
    &self,
    id: LocationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_all_people(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_all_locations(&self)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn people(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn locations(&self) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  /// Record that `person_id` was met on `date`.
  fn add_encounter(
    &self,
    person_id: PersonId,
    date: NaiveDate,
  ) -> impl Future<Output = Result<EncounterId, Self::Error>> + Send + '_;

  /// Record that `location_id` was visited on `date`.
  fn add_visit(
    &self,
    location_id: LocationId,
    date: NaiveDate,
  ) -> impl Future<Output = Result<VisitId, Self::Error>> + Send + '_;

  fn remove_encounter(
    &self,
    id: EncounterId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_visit(&self, id: VisitId)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Maintenance and reads ─────────────────────────────────────────────

  /// Delete every event older than the retention window, atomically.
  fn cleanup(&self) -> impl Future<Output = Result<CleanupReport, Self::Error>> + Send + '_;

  /// Delete all diary data and start over with an empty schema.
  fn reset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Recompute the diary projection for the visible window, today first.
  fn diary_days(&self) -> impl Future<Output = Result<Vec<DiaryDay>, Self::Error>> + Send + '_;
}
