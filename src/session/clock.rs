//! Countdown for one attempt, driven by explicit ticks.

use std::time::Duration;

/// Remaining time in whole seconds.
///
/// The clock never counts up and never goes below zero. Nothing here knows
/// about wall time; a scheduler calls [`SessionClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    total_seconds: u64,
    remaining_seconds: u64,
}

impl SessionClock {
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_seconds(u64::from(minutes) * 60)
    }

    /// Clock that started at `total_seconds` and has `remaining_seconds` left.
    pub fn resumed(total_seconds: u64, remaining_seconds: u64) -> Self {
        Self {
            total_seconds,
            remaining_seconds: remaining_seconds.min(total_seconds),
        }
    }

    /// One second passes.
    pub fn tick(&mut self) -> u64 {
        self.advance(1)
    }

    /// `seconds` pass at once, e.g. after missed ticks.
    pub fn advance(&mut self, seconds: u64) -> u64 {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(seconds);
        self.remaining_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.remaining_seconds)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.total_seconds - self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// `MM:SS`, or `H:MM:SS` past an hour.
    pub fn display(&self) -> String {
        let secs = self.remaining_seconds;
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{:02}:{:02}", m, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_decrements_to_zero_and_stays() {
        let mut clock = SessionClock::from_seconds(2);
        assert_eq!(clock.tick(), 1);
        assert!(!clock.is_expired());
        assert_eq!(clock.tick(), 0);
        assert!(clock.is_expired());
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed_seconds(), 2);
    }

    #[test]
    fn test_advance_saturates() {
        let mut clock = SessionClock::from_minutes(1);
        assert_eq!(clock.advance(45), 15);
        assert_eq!(clock.advance(1000), 0);
    }

    #[test]
    fn test_resumed_caps_remaining() {
        let clock = SessionClock::resumed(60, 90);
        assert_eq!(clock.remaining_seconds(), 60);
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionClock::from_seconds(65).display(), "01:05");
        assert_eq!(SessionClock::from_seconds(3725).display(), "1:02:05");
        assert_eq!(SessionClock::from_seconds(0).display(), "00:00");
    }
}
