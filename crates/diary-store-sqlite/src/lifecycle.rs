//! Host lifecycle signals.
//!
//! Retention must hold even on days the host never ran, so every time the
//! host becomes active the store runs a cleanup pass, which also rolls the
//! published window over to the new day.

use diary_core::store::DiaryStore as _;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{Result, SqliteDiaryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
  /// The host process came to the foreground.
  BecameActive,
}

impl SqliteDiaryStore {
  pub async fn handle_lifecycle(&self, event: LifecycleEvent) -> Result<()> {
    match event {
      LifecycleEvent::BecameActive => {
        self.cleanup().await?;
      }
    }
    Ok(())
  }

  /// Consume lifecycle events until the sender side is dropped.
  ///
  /// Failures are logged and the task keeps listening.
  pub fn watch_lifecycle(&self, mut events: mpsc::Receiver<LifecycleEvent>) -> JoinHandle<()> {
    let store = self.clone();
    tokio::spawn(async move {
      while let Some(event) = events.recv().await {
        if let Err(e) = store.handle_lifecycle(event).await {
          tracing::warn!(?event, error = %e, "lifecycle cleanup failed");
        }
      }
      tracing::debug!("lifecycle channel closed");
    })
  }
}
