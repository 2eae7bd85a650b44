//! Broadcast of the diary projection to observers.
//!
//! Backed by a [`tokio::sync::watch`] channel: there is always a latest
//! value, and a new subscriber sees it straight away.

use diary_core::diary::DiaryDay;
use tokio::sync::watch;

/// Owned by the store; holds the most recently published projection.
#[derive(Debug)]
pub struct DiaryDayPublisher {
  tx: watch::Sender<Vec<DiaryDay>>,
}

impl DiaryDayPublisher {
  pub fn new() -> Self {
    let (tx, _) = watch::channel(Vec::new());
    Self { tx }
  }

  /// Replace the current projection and wake every subscriber.
  pub fn publish(&self, days: Vec<DiaryDay>) {
    self.tx.send_replace(days);
  }

  pub fn latest(&self) -> Vec<DiaryDay> { self.tx.borrow().clone() }

  /// Start observing. The first [`DiarySubscription::changed`] resolves
  /// immediately with the latest projection.
  pub fn subscribe(&self) -> DiarySubscription {
    let mut rx = self.tx.subscribe();
    rx.mark_changed();
    DiarySubscription { rx }
  }

  pub fn subscriber_count(&self) -> usize { self.tx.receiver_count() }
}

impl Default for DiaryDayPublisher {
  fn default() -> Self { Self::new() }
}

/// A live view of the published projection. Dropping it unsubscribes.
#[derive(Debug)]
pub struct DiarySubscription {
  rx: watch::Receiver<Vec<DiaryDay>>,
}

impl DiarySubscription {
  pub fn current(&self) -> Vec<DiaryDay> { self.rx.borrow().clone() }

  /// Wait for the next publication not yet seen by this subscription.
  ///
  /// Returns `None` once the publisher is gone.
  pub async fn changed(&mut self) -> Option<Vec<DiaryDay>> {
    self.rx.changed().await.ok()?;
    Some(self.rx.borrow_and_update().clone())
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn days(n: u32) -> Vec<DiaryDay> {
    (1..=n)
      .map(|d| DiaryDay { date: NaiveDate::from_ymd_opt(2026, 1, d).unwrap(), entries: vec![] })
      .collect()
  }

  #[tokio::test]
  async fn late_subscriber_receives_latest_value() {
    let publisher = DiaryDayPublisher::new();
    publisher.publish(days(1));
    publisher.publish(days(3));

    let mut sub = publisher.subscribe();
    assert_eq!(sub.changed().await, Some(days(3)));
  }

  #[tokio::test]
  async fn subscriber_sees_subsequent_publications() {
    let publisher = DiaryDayPublisher::new();
    let mut sub = publisher.subscribe();
    assert_eq!(sub.changed().await, Some(vec![]));

    publisher.publish(days(2));
    assert_eq!(sub.changed().await, Some(days(2)));
    assert_eq!(sub.current(), days(2));
  }

  #[test]
  fn dropping_the_handle_unsubscribes() {
    let publisher = DiaryDayPublisher::new();
    let a = publisher.subscribe();
    let b = publisher.subscribe();
    assert_eq!(publisher.subscriber_count(), 2);
    drop(a);
    assert_eq!(publisher.subscriber_count(), 1);
    drop(b);
    assert_eq!(publisher.subscriber_count(), 0);
  }

  #[tokio::test]
  async fn changed_ends_when_publisher_is_dropped() {
    let publisher = DiaryDayPublisher::new();
    let mut sub = publisher.subscribe();
    let _ = sub.changed().await;
    drop(publisher);
    assert_eq!(sub.changed().await, None);
  }
}
