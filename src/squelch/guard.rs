//! Per-match attempt guard.
//!
//! The at-most-once guarantee is a compare-and-swap rather than a plain
//! flag, so rapid or concurrent turn-start events cannot start two attempts
//! in one match.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No attempt has run this match; a qualifying turn-start may begin one.
    Idle,
    /// An attempt is in flight, or ended in a way that spends the match.
    Attempting,
    /// An attempt ran to completion this match.
    Settled,
}

const IDLE: u8 = 0;
const ATTEMPTING: u8 = 1;
const SETTLED: u8 = 2;

/// One guard per match lifetime, reset by the match-start event.
#[derive(Debug)]
pub struct SquelchGuard {
    state: AtomicU8,
}

impl SquelchGuard {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    /// Called exactly once per match, on the match-start event.
    pub fn reset(&self) {
        self.state.store(IDLE, Ordering::Release);
    }

    /// Check-and-set from `Idle` to `Attempting`. Returns whether the caller
    /// won the transition. This must happen before any side-effecting action
    /// of the attempt.
    pub fn try_begin_attempt(&self) -> bool {
        self.state
            .compare_exchange(IDLE, ATTEMPTING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Cooperative-cancellation path: give a later turn-start event in the
    /// same match another chance.
    pub fn abort_to_idle(&self) {
        self.state.store(IDLE, Ordering::Release);
    }

    /// Normal completion: no further attempts until the next match start.
    pub fn settle(&self) {
        let _ = self.state.compare_exchange(
            ATTEMPTING,
            SETTLED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn state(&self) -> GuardState {
        match self.state.load(Ordering::Acquire) {
            IDLE => GuardState::Idle,
            ATTEMPTING => GuardState::Attempting,
            _ => GuardState::Settled,
        }
    }
}

impl Default for SquelchGuard {
    fn default() -> Self {
        Self::new()
    }
}
