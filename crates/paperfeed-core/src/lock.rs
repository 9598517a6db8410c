//! Short debounce gate shared by the controller and the input layer.
//!
//! There is a single source of truth, the expiry instant. The renderer and a
//! raw key handler both read it through [`InteractionLock::is_active`], so
//! they can never disagree. The lock releases itself once the instant passes;
//! no timer task is involved.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Default)]
pub struct InteractionLock {
    expires_at: Mutex<Option<Instant>>,
}

impl InteractionLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Instant>> {
        self.expires_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Hold the lock for `duration`. Returns `false` without touching the
    /// expiry if it is already held; re-entrant calls are dropped, not queued.
    pub fn try_acquire(&self, duration: Duration) -> bool {
        let now = Instant::now();
        let mut slot = self.slot();
        if slot.is_some_and(|t| now < t) {
            return false;
        }
        *slot = Some(now + duration);
        true
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some_and(|t| Instant::now() < t)
    }

    /// When the current hold ends, if one is in effect.
    pub fn expires_at(&self) -> Option<Instant> {
        self.slot().filter(|t| Instant::now() < *t)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at()
            .map(|t| t.saturating_duration_since(Instant::now()))
    }

    /// Drop any hold immediately.
    pub fn release(&self) {
        *self.slot() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn starts_inactive() {
        let lock = InteractionLock::new();
        assert!(!lock.is_active());
        assert!(lock.expires_at().is_none());
        assert!(lock.remaining().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_then_expire() {
        let lock = InteractionLock::new();
        assert!(lock.try_acquire(HOLD));
        assert!(lock.is_active());
        assert_eq!(lock.remaining(), Some(HOLD));

        tokio::time::advance(Duration::from_millis(499)).await;
        assert!(lock.is_active());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!lock.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn reacquire_while_held_is_ignored() {
        let lock = InteractionLock::new();
        assert!(lock.try_acquire(HOLD));
        let first_expiry = lock.expires_at();

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(!lock.try_acquire(HOLD));
        // The original window is not extended.
        assert_eq!(lock.expires_at(), first_expiry);

        tokio::time::advance(Duration::from_millis(300)).await;
        assert!(lock.try_acquire(HOLD));
    }

    #[tokio::test(start_paused = true)]
    async fn release_clears_hold() {
        let lock = InteractionLock::new();
        assert!(lock.try_acquire(HOLD));
        lock.release();
        assert!(!lock.is_active());
        assert!(lock.try_acquire(HOLD));
    }
}
