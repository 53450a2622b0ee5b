use serde::{Deserialize, Serialize};

/// Days per in-game week.
pub const DAYS_PER_WEEK: u8 = 7;

/// Logical game clock: a week/day pair.
///
/// The clock is the sequence context carried by every fact. Handlers read
/// it from replayed state rather than from wall-clock time, so replaying
/// the same fact history always reproduces the same day-dependent
/// decisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GameClock {
    /// Week counter, starting at 1.
    pub week: u32,

    /// Day within the week, 1 through [`DAYS_PER_WEEK`].
    pub day: u8,
}

impl GameClock {
    /// Creates a clock at a specific week and day.
    pub fn new(week: u32, day: u8) -> Self {
        Self { week, day }
    }

    /// Returns the opening clock: week 1, day 1.
    pub fn genesis() -> Self {
        Self { week: 1, day: 1 }
    }

    /// Returns the clock advanced by one day, rolling into the next week
    /// after day [`DAYS_PER_WEEK`].
    pub fn next_day(&self) -> Self {
        if self.day >= DAYS_PER_WEEK {
            Self {
                week: self.week + 1,
                day: 1,
            }
        } else {
            Self {
                week: self.week,
                day: self.day + 1,
            }
        }
    }

    /// Total days elapsed since genesis.
    pub fn days_elapsed(&self) -> u64 {
        (self.week as u64 - 1) * DAYS_PER_WEEK as u64 + (self.day as u64 - 1)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::genesis()
    }
}

impl std::fmt::Display for GameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "week {} day {}", self.week, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_week_one_day_one() {
        let clock = GameClock::genesis();
        assert_eq!(clock.week, 1);
        assert_eq!(clock.day, 1);
        assert_eq!(clock.days_elapsed(), 0);
    }

    #[test]
    fn next_day_advances_within_week() {
        let clock = GameClock::new(2, 3).next_day();
        assert_eq!(clock, GameClock::new(2, 4));
    }

    #[test]
    fn next_day_rolls_week_after_day_seven() {
        let clock = GameClock::new(1, 7).next_day();
        assert_eq!(clock, GameClock::new(2, 1));
    }

    #[test]
    fn clock_ordering_follows_time() {
        assert!(GameClock::new(1, 7) < GameClock::new(2, 1));
        assert!(GameClock::new(3, 2) < GameClock::new(3, 3));
    }

    #[test]
    fn days_elapsed_counts_across_weeks() {
        assert_eq!(GameClock::new(2, 1).days_elapsed(), 7);
        assert_eq!(GameClock::new(3, 4).days_elapsed(), 17);
    }

    #[test]
    fn serialization_roundtrip() {
        let clock = GameClock::new(4, 6);
        let json = serde_json::to_string(&clock).unwrap();
        let back: GameClock = serde_json::from_str(&json).unwrap();
        assert_eq!(clock, back);
    }
}
