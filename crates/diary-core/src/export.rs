//! Plain-text export of the diary, suitable for handing to a health
//! authority.

use crate::{diary::DiaryDay, window::format_date};

/// Render the selected entries of `days`, oldest day first.
///
/// Within a day the entries keep their projection order.
pub fn render_text(days: &[DiaryDay]) -> String {
  let mut lines = Vec::new();

  let first = days.iter().map(|d| d.date).min();
  let last = days.iter().map(|d| d.date).max();
  lines.push(match first.zip(last) {
    Some((first, last)) => format!(
      "Contacts of the last {} days ({} to {})",
      days.len(),
      format_date(first),
      format_date(last),
    ),
    None => "Contacts of the last 0 days".to_owned(),
  });
  lines.push(
    "The following list is intended for the responsible health authority to trace contacts."
      .to_owned(),
  );
  lines.push(String::new());

  let mut ordered: Vec<&DiaryDay> = days.iter().collect();
  ordered.sort_by_key(|d| d.date);
  for day in ordered {
    let date = format_date(day.date);
    lines.extend(day.selected().map(|entry| format!("{date} {}", entry.name())));
  }

  let mut text = lines.join("\n");
  text.push('\n');
  text
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    diary::DiaryEntry,
    id::{EncounterId, LocationId, PersonId, VisitId},
    model::{Location, Person},
  };

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2026, 7, d).unwrap() }

  #[test]
  fn lists_only_selected_entries_oldest_first() {
    let alice = Person { id: PersonId(1), name: "Alice".into() };
    let cafe = Location { id: LocationId(1), name: "Cafe".into() };
    let days = vec![
      DiaryDay {
        date:    day(2),
        entries: vec![
          DiaryEntry::Person { person: alice.clone(), encounter_id: Some(EncounterId(5)) },
          DiaryEntry::Location { location: cafe.clone(), visit_id: None },
        ],
      },
      DiaryDay {
        date:    day(1),
        entries: vec![
          DiaryEntry::Person { person: alice, encounter_id: None },
          DiaryEntry::Location { location: cafe, visit_id: Some(VisitId(3)) },
        ],
      },
    ];

    let text = render_text(&days);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Contacts of the last 2 days (2026-07-01 to 2026-07-02)");
    assert_eq!(&lines[3..], ["2026-07-01 Cafe", "2026-07-02 Alice"]);
  }

  #[test]
  fn empty_diary_renders_header_only() {
    let text = render_text(&[]);
    assert!(text.starts_with("Contacts of the last 0 days\n"));
    assert_eq!(text.lines().count(), 3);
  }
}
