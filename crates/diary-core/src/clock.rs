//! Source of "today" for retention and projection.

use std::sync::{Mutex, PoisonError};

use chrono::{Days, Local, NaiveDate};

pub trait Clock: Send + Sync {
  /// The current calendar day.
  fn today(&self) -> NaiveDate;
}

/// The local calendar day of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
  today: Mutex<NaiveDate>,
}

impl FixedClock {
  pub fn new(today: NaiveDate) -> Self { Self { today: Mutex::new(today) } }

  pub fn set(&self, today: NaiveDate) {
    *self.today.lock().unwrap_or_else(PoisonError::into_inner) = today;
  }

  /// Move the clock forward by `days`.
  pub fn advance(&self, days: u64) {
    let mut today = self.today.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(next) = today.checked_add_days(Days::new(days)) {
      *today = next;
    }
  }
}

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { *self.today.lock().unwrap_or_else(PoisonError::into_inner) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixed_clock_moves_only_on_request() {
    let start = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
    let clock = FixedClock::new(start);
    assert_eq!(clock.today(), start);

    clock.advance(3);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());

    clock.set(start);
    assert_eq!(clock.today(), start);
  }
}
