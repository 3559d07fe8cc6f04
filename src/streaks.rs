//! Workout streak computation
//!
//! Counts consecutive training days over an irregular log, tolerating a
//! single rest day between workouts. The current streak only counts when the
//! latest workout is today or yesterday; older activity still contributes to
//! the longest streak ever observed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Streak calculation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Max gap (days) between workout days before a streak breaks.
    /// 2 tolerates one rest day.
    pub max_gap_days: i64,

    /// How recent (days from today) the latest workout must be for the
    /// current streak to count
    pub active_window_days: i64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        StreakConfig {
            max_gap_days: 2,
            active_window_days: 1,
        }
    }
}

/// Current and longest streaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Streak calculation engine
pub struct StreakCalculator {
    config: StreakConfig,
}

impl StreakCalculator {
    /// Create a calculator with default settings
    pub fn new() -> Self {
        StreakCalculator {
            config: StreakConfig::default(),
        }
    }

    /// Create a calculator with custom settings
    pub fn with_config(config: StreakConfig) -> Self {
        StreakCalculator { config }
    }

    /// Compute streaks from completed-workout timestamps. Input order does
    /// not matter; timestamps are normalized to calendar days, deduplicated,
    /// and walked newest-first. `today` is passed explicitly so the "still
    /// active" check does not read the wall clock.
    pub fn compute(&self, completed_at: &[NaiveDateTime], today: NaiveDate) -> StreakSummary {
        let mut days: Vec<NaiveDate> = completed_at.iter().map(|t| t.date()).collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.dedup();

        if days.is_empty() {
            return StreakSummary {
                current: 0,
                longest: 0,
            };
        }

        // Current streak: only counts while the latest workout is recent
        let mut current = 0u32;
        if (today - days[0]).num_days() <= self.config.active_window_days {
            current = 1;
            for pair in days.windows(2) {
                if (pair[0] - pair[1]).num_days() <= self.config.max_gap_days {
                    current += 1;
                } else {
                    break;
                }
            }
        }

        // Longest streak ever, active or not
        let mut longest = 1u32;
        let mut run = 1u32;
        for pair in days.windows(2) {
            if (pair[0] - pair[1]).num_days() <= self.config.max_gap_days {
                run += 1;
            } else {
                run = 1;
            }
            longest = longest.max(run);
        }

        StreakSummary { current, longest }
    }
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::new()
    }
}
