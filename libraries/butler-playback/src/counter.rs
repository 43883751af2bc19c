//! Change counter
//!
//! A version number that only goes up, plus a way to wait for it to move.
//! Long-poll clients remember the last version they saw and wait for a newer
//! one; a single bump releases every waiter at once.

use crate::error::{PlayerError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Monotonic version with broadcast wake-up
///
/// Clones share the same counter. Each waiter holds its own `watch`
/// receiver, which is dropped when the wait finishes, times out or is
/// cancelled, so abandoned waits leave nothing behind.
#[derive(Debug, Clone)]
pub struct ChangeCounter {
    sender: Arc<watch::Sender<u64>>,
}

impl ChangeCounter {
    /// Counter starting at zero
    pub fn new() -> Self {
        Self::with_value(0)
    }

    /// Counter starting at `value`
    pub fn with_value(value: u64) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current value, without waiting
    pub fn value(&self) -> u64 {
        *self.sender.borrow()
    }

    /// Advance by one and wake all waiters; returns the new value
    pub fn bump(&self) -> u64 {
        let mut bumped = 0;
        self.sender.send_modify(|value| {
            *value += 1;
            bumped = *value;
        });
        bumped
    }

    /// Wait until the value exceeds `known`
    ///
    /// With no `known` value the current one is returned immediately, as it
    /// is when `known` is already behind. Otherwise this resolves on the
    /// next bump, or fails with [`PlayerError::WaitTimeout`] once `timeout`
    /// elapses.
    pub async fn wait(&self, known: Option<u64>, timeout: Option<Duration>) -> Result<u64> {
        let Some(known) = known else {
            return Ok(self.value());
        };

        // Subscribing marks the current value as seen; `wait_for` checks it
        // before sleeping so a bump between here and the await is not lost.
        let mut receiver = self.sender.subscribe();
        let advanced = async move {
            receiver
                .wait_for(|value| *value > known)
                .await
                .map(|value| *value)
        };

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, advanced)
                .await
                .map_err(|_| PlayerError::WaitTimeout { known })?,
            None => advanced.await,
        };

        // The sender lives in `self`, so the channel cannot close mid-wait
        outcome.map_err(|_| PlayerError::ServiceClosed)
    }

    /// Number of waits in progress
    pub fn waiters(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeCounter {
    fn default() -> Self {
        Self::new()
    }
}
