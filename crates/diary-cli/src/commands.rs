//! Subcommands and their execution against any [`DiaryStore`].

use std::io::Write;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Subcommand;
use diary_core::{
  diary::{DiaryDay, DiaryEntry},
  export::render_text,
  id::{EncounterId, LocationId, PersonId, VisitId},
  store::DiaryStore,
  window::{format_date, parse_date},
};

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
  /// Add a person to choose from.
  AddPerson { name: String },
  /// Add a location to choose from.
  AddLocation { name: String },
  /// Record meeting a person (today unless --date is given).
  Meet {
    person: i64,
    #[arg(long, value_parser = date_arg)]
    date:   Option<NaiveDate>,
  },
  /// Record visiting a location (today unless --date is given).
  Visit {
    location: i64,
    #[arg(long, value_parser = date_arg)]
    date:     Option<NaiveDate>,
  },
  RenamePerson { id: i64, name: String },
  RenameLocation { id: i64, name: String },
  /// Delete a person and all of their encounters.
  RemovePerson { id: i64 },
  /// Delete a location and all of its visits.
  RemoveLocation { id: i64 },
  RemoveEncounter { id: i64 },
  RemoveVisit { id: i64 },
  RemoveAllPeople,
  RemoveAllLocations,
  /// List people.
  People,
  /// List locations.
  Locations,
  /// Print the diary for the visible window.
  Show {
    #[arg(long)]
    json: bool,
  },
  /// Print the shareable plain-text summary.
  Export,
  /// Apply the retention window now.
  Cleanup,
  /// Delete all diary data.
  Reset,
}

fn date_arg(s: &str) -> Result<NaiveDate, String> { parse_date(s).map_err(|e| e.to_string()) }

/// Run one command against any backend.
pub async fn run<S>(
  store: &S,
  command: Command,
  today: NaiveDate,
  out: &mut impl Write,
) -> anyhow::Result<()>
where
  S: DiaryStore,
{
  match command {
    Command::AddPerson { name } => {
      let id = store.add_person(&name).await.context("adding person")?;
      writeln!(out, "person {id}")?;
    }
    Command::AddLocation { name } => {
      let id = store.add_location(&name).await.context("adding location")?;
      writeln!(out, "location {id}")?;
    }
    Command::Meet { person, date } => {
      let id = store
        .add_encounter(PersonId(person), date.unwrap_or(today))
        .await
        .with_context(|| format!("recording encounter with person {person}"))?;
      writeln!(out, "encounter {id}")?;
    }
    Command::Visit { location, date } => {
      let id = store
        .add_visit(LocationId(location), date.unwrap_or(today))
        .await
        .with_context(|| format!("recording visit to location {location}"))?;
      writeln!(out, "visit {id}")?;
    }
    Command::RenamePerson { id, name } => {
      store.update_person(PersonId(id), &name).await.context("renaming person")?;
    }
    Command::RenameLocation { id, name } => {
      store.update_location(LocationId(id), &name).await.context("renaming location")?;
    }
    Command::RemovePerson { id } => {
      store.remove_person(PersonId(id)).await.context("removing person")?;
    }
    Command::RemoveLocation { id } => {
      store.remove_location(LocationId(id)).await.context("removing location")?;
    }
    Command::RemoveEncounter { id } => {
      store.remove_encounter(EncounterId(id)).await.context("removing encounter")?;
    }
    Command::RemoveVisit { id } => {
      store.remove_visit(VisitId(id)).await.context("removing visit")?;
    }
    Command::RemoveAllPeople => store.remove_all_people().await.context("removing people")?,
    Command::RemoveAllLocations => {
      store.remove_all_locations().await.context("removing locations")?
    }
    Command::People => {
      for p in store.people().await.context("listing people")? {
        writeln!(out, "{}\t{}", p.id, p.name)?;
      }
    }
    Command::Locations => {
      for l in store.locations().await.context("listing locations")? {
        writeln!(out, "{}\t{}", l.id, l.name)?;
      }
    }
    Command::Show { json } => {
      let days = store.diary_days().await.context("projecting diary")?;
      if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&days)?)?;
      } else {
        write_days(out, &days)?;
      }
    }
    Command::Export => {
      let days = store.diary_days().await.context("projecting diary")?;
      write!(out, "{}", render_text(&days))?;
    }
    Command::Cleanup => {
      let report = store.cleanup().await.context("cleaning up")?;
      writeln!(out, "removed {} encounters, {} visits", report.encounters, report.visits)?;
    }
    Command::Reset => store.reset().await.context("resetting diary")?,
  }
  Ok(())
}

fn write_days(out: &mut impl Write, days: &[DiaryDay]) -> std::io::Result<()> {
  for day in days {
    writeln!(out, "{}", format_date(day.date))?;
    for entry in &day.entries {
      let mark = if entry.is_selected() { "x" } else { " " };
      let detail = match entry {
        DiaryEntry::Person { person, encounter_id: Some(e) } => {
          format!("person {}, encounter {e}", person.id)
        }
        DiaryEntry::Person { person, encounter_id: None } => format!("person {}", person.id),
        DiaryEntry::Location { location, visit_id: Some(v) } => {
          format!("location {}, visit {v}", location.id)
        }
        DiaryEntry::Location { location, visit_id: None } => format!("location {}", location.id),
      };
      writeln!(out, "  [{mark}] {} ({detail})", entry.name())?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use diary_core::clock::FixedClock;
  use diary_store_sqlite::SqliteDiaryStore;

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 16).unwrap() }

  async fn exec(store: &SqliteDiaryStore, command: Command) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(store, command, today(), &mut out).await?;
    Ok(String::from_utf8(out)?)
  }

  #[tokio::test]
  async fn meet_then_show_marks_the_day() {
    let store = SqliteDiaryStore::open_in_memory(Arc::new(FixedClock::new(today())))
      .await
      .unwrap();

    assert_eq!(
      exec(&store, Command::AddPerson { name: "Alice".into() }).await.unwrap(),
      "person 1\n"
    );
    assert_eq!(
      exec(&store, Command::Meet { person: 1, date: None }).await.unwrap(),
      "encounter 1\n"
    );

    let shown = exec(&store, Command::Show { json: false }).await.unwrap();
    let mut lines = shown.lines();
    assert_eq!(lines.next(), Some("2026-10-16"));
    assert_eq!(lines.next(), Some("  [x] Alice (person 1, encounter 1)"));
    assert_eq!(lines.next(), Some("2026-10-15"));
    assert_eq!(lines.next(), Some("  [ ] Alice (person 1)"));
  }

  #[tokio::test]
  async fn json_output_is_the_projection() {
    let store = SqliteDiaryStore::open_in_memory(Arc::new(FixedClock::new(today())))
      .await
      .unwrap();
    exec(&store, Command::AddLocation { name: "Cafe".into() }).await.unwrap();

    let json = exec(&store, Command::Show { json: true }).await.unwrap();
    let days: Vec<DiaryDay> = serde_json::from_str(&json).unwrap();
    assert_eq!(days.len(), 14);
    assert_eq!(days[0].entries[0].name(), "Cafe");
  }

  #[tokio::test]
  async fn removing_unknown_ids_fails() {
    let store = SqliteDiaryStore::open_in_memory(Arc::new(FixedClock::new(today())))
      .await
      .unwrap();
    assert!(exec(&store, Command::RemoveLocation { id: 5 }).await.is_err());
    assert!(exec(&store, Command::Meet { person: 5, date: None }).await.is_err());
  }
}
