//! Session lifecycle status and its atomic cell.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one attempt.
///
/// Transitions only move forward:
/// `Active -> Submitting -> {Completed | Aborted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionStatus {
    Active = 0,
    Submitting = 1,
    Completed = 2,
    Aborted = 3,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Submitting => "submitting",
            SessionStatus::Completed => "completed",
            SessionStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Aborted)
    }

    /// Whether `self -> next` is an edge of the lifecycle.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Active, SessionStatus::Submitting)
                | (SessionStatus::Submitting, SessionStatus::Completed)
                | (SessionStatus::Submitting, SessionStatus::Aborted)
        )
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionStatus::Active,
            1 => SessionStatus::Submitting,
            2 => SessionStatus::Completed,
            _ => SessionStatus::Aborted,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status readable without locking the engine.
///
/// Every change is a compare-and-set along a lifecycle edge, so when a
/// manual submit races the clock exactly one of them wins
/// `Active -> Submitting`.
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl StatusCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(SessionStatus::Active as u8))
    }

    pub fn get(&self) -> SessionStatus {
        SessionStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move `from -> to` if the cell still holds `from` and the edge exists.
    pub fn transition(&self, from: SessionStatus, to: SessionStatus) -> bool {
        if !from.can_transition_to(to) {
            return false;
        }
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}
