//! Folds raw diary rows into the [`DiaryDay`] read model.
//!
//! The projection is recomputed from source on every write instead of being
//! patched incrementally. The window is a fixed 14 days, so the cost stays
//! bounded by the number of people and locations.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
  diary::{DiaryDay, DiaryEntry},
  id::{EncounterId, LocationId, PersonId, VisitId},
  model::{Encounter, Location, Person, Visit},
  window::visible_dates,
};

/// Everything the projector reads. Events outside the visible window may be
/// included; they are ignored.
#[derive(Debug, Clone, Default)]
pub struct ProjectionInput {
  pub people:     Vec<Person>,
  pub locations:  Vec<Location>,
  pub encounters: Vec<Encounter>,
  pub visits:     Vec<Visit>,
}

/// Build one [`DiaryDay`] per visible date, today first.
///
/// Every person and location appears on every day so the reader can offer
/// "add for this day"; entries without an event carry `None`. When the same
/// person or location has more than one event on a day, the lowest id wins.
pub fn project(today: NaiveDate, input: &ProjectionInput) -> Vec<DiaryDay> {
  let people = sorted_by_name(&input.people, |p| (&p.name, p.id));
  let locations = sorted_by_name(&input.locations, |l| (&l.name, l.id));

  let mut encounters: HashMap<(NaiveDate, PersonId), EncounterId> = HashMap::new();
  for e in &input.encounters {
    encounters
      .entry((e.date, e.person_id))
      .and_modify(|id| *id = (*id).min(e.id))
      .or_insert(e.id);
  }

  let mut visits: HashMap<(NaiveDate, LocationId), VisitId> = HashMap::new();
  for v in &input.visits {
    visits
      .entry((v.date, v.location_id))
      .and_modify(|id| *id = (*id).min(v.id))
      .or_insert(v.id);
  }

  visible_dates(today)
    .map(|date| {
      let person_entries = people.iter().map(|person| DiaryEntry::Person {
        person:       (*person).clone(),
        encounter_id: encounters.get(&(date, person.id)).copied(),
      });
      let location_entries = locations.iter().map(|location| DiaryEntry::Location {
        location: (*location).clone(),
        visit_id: visits.get(&(date, location.id)).copied(),
      });
      DiaryDay { date, entries: person_entries.chain(location_entries).collect() }
    })
    .collect()
}

/// Case-insensitive by name, then by id for ties.
pub fn sorted_by_name<'a, T, K>(
  items: &'a [T],
  key: impl Fn(&'a T) -> (&'a String, K),
) -> Vec<&'a T>
where
  K: Ord,
{
  let mut sorted: Vec<&T> = items.iter().collect();
  sorted.sort_by_cached_key(|item| {
    let (name, id) = key(*item);
    (name.to_lowercase(), id)
  });
  sorted
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn person(id: i64, name: &str) -> Person { Person { id: PersonId(id), name: name.into() } }

  fn location(id: i64, name: &str) -> Location {
    Location { id: LocationId(id), name: name.into() }
  }

  #[test]
  fn empty_input_still_yields_the_full_window() {
    let days = project(day(2026, 5, 10), &ProjectionInput::default());
    assert_eq!(days.len(), 14);
    assert!(days.iter().all(|d| d.entries.is_empty()));
    assert_eq!(days[0].date, day(2026, 5, 10));
    assert_eq!(days[13].date, day(2026, 4, 27));
  }

  #[test]
  fn encounter_marks_only_its_own_day() {
    let today = day(2026, 5, 10);
    let input = ProjectionInput {
      people: vec![person(1, "Alice")],
      encounters: vec![Encounter { id: EncounterId(9), date: today, person_id: PersonId(1) }],
      ..Default::default()
    };

    let days = project(today, &input);
    let Some(DiaryEntry::Person { encounter_id, .. }) = days[0].entry("Alice") else {
      panic!("Alice missing today");
    };
    assert_eq!(*encounter_id, Some(EncounterId(9)));

    let yesterday = days[1].entry("Alice").unwrap();
    assert!(!yesterday.is_selected());
  }

  #[test]
  fn people_precede_locations_and_sort_case_insensitively() {
    let input = ProjectionInput {
      people: vec![person(3, "bob"), person(1, "Carol"), person(2, "Bob")],
      locations: vec![location(2, "cafe"), location(1, "Apothecary")],
      ..Default::default()
    };

    let days = project(day(2026, 5, 10), &input);
    let names: Vec<_> = days[0].entries.iter().map(DiaryEntry::name).collect();
    assert_eq!(names, ["Bob", "bob", "Carol", "Apothecary", "cafe"]);
  }

  #[test]
  fn duplicate_events_on_one_day_resolve_to_lowest_id() {
    let today = day(2026, 5, 10);
    let input = ProjectionInput {
      locations: vec![location(1, "Gym")],
      visits: vec![
        Visit { id: VisitId(8), date: today, location_id: LocationId(1) },
        Visit { id: VisitId(4), date: today, location_id: LocationId(1) },
      ],
      ..Default::default()
    };

    let days = project(today, &input);
    assert_eq!(
      days[0].entries[0],
      DiaryEntry::Location { location: location(1, "Gym"), visit_id: Some(VisitId(4)) }
    );
  }

  #[test]
  fn events_outside_the_window_are_ignored() {
    let today = day(2026, 5, 10);
    let input = ProjectionInput {
      people: vec![person(1, "Alice")],
      encounters: vec![
        Encounter { id: EncounterId(1), date: day(2026, 4, 26), person_id: PersonId(1) },
        Encounter { id: EncounterId(2), date: day(2026, 5, 11), person_id: PersonId(1) },
      ],
      ..Default::default()
    };

    let days = project(today, &input);
    assert_eq!(days.iter().map(|d| d.selected().count()).sum::<usize>(), 0);
  }
}
