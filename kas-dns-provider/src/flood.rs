//! KAS flood control
//!
//! Every KAS response declares `KasFloodDelay`, the number of seconds the
//! server wants the client to wait before its next request. Requests issued
//! earlier are rejected by the server, so the client paces itself.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{KasError, Result};

/// Shared "earliest next request" deadline of one client.
///
/// The deadline never moves backward. Waiters are served in arrival order:
/// the lock is held for the whole wait, so a caller starts its own wait only
/// once the previous one has finished.
#[derive(Debug)]
pub struct FloodControl {
    deadline: Mutex<Instant>,
}

impl Default for FloodControl {
    fn default() -> Self {
        Self::new()
    }
}

impl FloodControl {
    pub fn new() -> Self {
        Self {
            deadline: Mutex::new(Instant::now()),
        }
    }

    /// Waits until the deadline has passed.
    ///
    /// # Errors
    /// Returns [`KasError::Cancelled`] if `cancel` fires first, including
    /// while queued behind another waiter.
    pub async fn await_ready(&self, cancel: &CancellationToken) -> Result<()> {
        let deadline = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(KasError::Cancelled),
            guard = self.deadline.lock() => guard,
        };

        if *deadline > Instant::now() {
            log::debug!(
                "[kas] Flood control: waiting {:.2}s",
                deadline.saturating_duration_since(Instant::now()).as_secs_f32()
            );
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(KasError::Cancelled),
            () = tokio::time::sleep_until(*deadline) => Ok(()),
        }
    }

    /// Pushes the deadline to `now + seconds` unless it is already later.
    ///
    /// Negative, NaN and infinite delays count as zero.
    pub async fn record_delay(&self, seconds: f64) {
        let delay = if seconds.is_finite() && seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };

        let mut deadline = self.deadline.lock().await;
        match Instant::now().checked_add(delay) {
            Some(next) if next > *deadline => *deadline = next,
            _ => {}
        }
    }

    /// Current deadline.
    pub async fn deadline(&self) -> Instant {
        *self.deadline.lock().await
    }
}
