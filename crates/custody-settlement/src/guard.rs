//! Per-engine reentrancy guard.
//!
//! The guard is held for the whole of a settlement, including the value
//! handoff. While it is held, every custody-mutating entry point of the
//! same engine fails with [`CustodyError::ReentrantCall`]: a nested
//! `settle` through [`enter`](ReentrancyGuard::enter), everything else
//! through [`ensure_idle`](ReentrancyGuard::ensure_idle).

use custody_types::{CustodyError, Result};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    locked: bool,
    blocked: u64,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard for a settlement.
    ///
    /// # Errors
    /// [`CustodyError::ReentrantCall`] if a settlement is already running.
    pub fn enter(&mut self) -> Result<()> {
        if self.locked {
            self.blocked += 1;
            warn!(blocked = self.blocked, "reentrant settlement blocked");
            return Err(CustodyError::ReentrantCall);
        }
        self.locked = true;
        Ok(())
    }

    /// Release the guard.
    pub fn exit(&mut self) {
        self.locked = false;
    }

    /// Fail if a settlement is running.
    pub fn ensure_idle(&self) -> Result<()> {
        if self.locked {
            warn!("custody mutation attempted during settlement handoff");
            return Err(CustodyError::ReentrantCall);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Nested settlements refused so far.
    #[must_use]
    pub fn blocked_count(&self) -> u64 {
        self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_then_exit() {
        let mut guard = ReentrancyGuard::new();
        guard.enter().unwrap();
        assert!(guard.is_locked());
        guard.exit();
        assert!(!guard.is_locked());
        guard.enter().unwrap();
    }

    #[test]
    fn nested_enter_is_reentrant_call() {
        let mut guard = ReentrancyGuard::new();
        guard.enter().unwrap();
        assert_eq!(guard.enter(), Err(CustodyError::ReentrantCall));
        assert_eq!(guard.blocked_count(), 1);
        // The outer holder still owns it.
        assert!(guard.is_locked());
    }

    #[test]
    fn ensure_idle_tracks_lock() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.ensure_idle().is_ok());
        guard.enter().unwrap();
        assert_eq!(guard.ensure_idle(), Err(CustodyError::ReentrantCall));
    }
}
