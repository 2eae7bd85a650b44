//! Retention and visible windows, and the on-disk date format.

use chrono::{Days, NaiveDate};

use crate::{Error, Result};

/// Days of events kept on disk, today included.
pub const RETENTION_DAYS: u64 = 16;

/// Days exposed through the diary read model, today included.
///
/// Shorter than [`RETENTION_DAYS`] to leave a buffer for clock and
/// timezone skew.
pub const VISIBLE_DAYS: u64 = 14;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Oldest date that survives a cleanup pass. Anything before it is deleted.
pub fn retention_cutoff(today: NaiveDate) -> NaiveDate {
  today
    .checked_sub_days(Days::new(RETENTION_DAYS - 1))
    .unwrap_or(NaiveDate::MIN)
}

/// Oldest date shown in the diary.
pub fn visible_start(today: NaiveDate) -> NaiveDate {
  today
    .checked_sub_days(Days::new(VISIBLE_DAYS - 1))
    .unwrap_or(NaiveDate::MIN)
}

/// The visible window, most recent day first.
pub fn visible_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
  (0..VISIBLE_DAYS).filter_map(move |offset| today.checked_sub_days(Days::new(offset)))
}

/// `YYYY-MM-DD`, which also sorts correctly as text inside SQLite.
pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn retention_keeps_sixteen_days_including_today() {
    assert_eq!(retention_cutoff(day(2026, 3, 20)), day(2026, 3, 5));
  }

  #[test]
  fn visible_window_is_fourteen_days_descending() {
    let dates: Vec<_> = visible_dates(day(2026, 3, 1)).collect();
    assert_eq!(dates.len(), 14);
    assert_eq!(dates[0], day(2026, 3, 1));
    assert_eq!(dates[13], day(2026, 2, 16));
    assert_eq!(visible_start(day(2026, 3, 1)), day(2026, 2, 16));
    assert!(dates.windows(2).all(|w| w[0] > w[1]));
  }

  #[test]
  fn visible_window_lies_inside_retention() {
    let today = day(2026, 1, 2);
    assert!(visible_start(today) > retention_cutoff(today));
  }

  #[test]
  fn dates_round_trip_through_text() {
    let d = day(2026, 10, 4);
    assert_eq!(format_date(d), "2026-10-04");
    assert_eq!(parse_date("2026-10-04").unwrap(), d);
    assert!(matches!(parse_date("04.10.2026"), Err(Error::InvalidDate(_))));
  }
}
