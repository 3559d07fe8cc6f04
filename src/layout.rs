//! Day-grid pixel layout for schedule events
//!
//! Maps time-of-day intervals onto a vertical grid that starts at a
//! configurable early-morning hour, then assigns overlap columns so
//! concurrent events render side by side instead of stacked.

use serde::{Deserialize, Serialize};

use crate::models::{EventPosition, ScheduleEvent};

/// Layout grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Pixels per hour on the grid
    pub hour_height: f64,

    /// Hour the grid starts at; late-night events wrap past midnight so a
    /// schedule spanning into early morning renders contiguously
    pub day_start_hour: u32,

    /// Minimum event height in hours, so very short events stay tappable
    pub min_event_hours: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            hour_height: 80.0,
            day_start_hour: 5,
            min_event_hours: 0.25,
        }
    }
}

/// Core layout engine
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create a layout engine with default grid settings
    pub fn new() -> Self {
        LayoutEngine {
            config: LayoutConfig::default(),
        }
    }

    /// Create a layout engine with custom grid settings
    pub fn with_config(config: LayoutConfig) -> Self {
        LayoutEngine { config }
    }

    /// Map an event's time interval to a pixel box on the grid.
    ///
    /// Hours are reckoned from the configured day start, and a negative
    /// duration (an event crossing midnight) gains 24 hours.
    pub fn position(&self, event: &ScheduleEvent) -> EventPosition {
        use chrono::Timelike;

        let hh = self.config.hour_height;
        let start_hour = event.start_time.hour();
        let start_minute = event.start_time.minute();
        let end_hour = event.end_time.hour();
        let end_minute = event.end_time.minute();

        // day_start_hour comes from user config; reduce it mod 24 so an
        // out-of-range value cannot underflow the grid offset
        let day_start = i64::from(self.config.day_start_hour % 24);
        let grid_hour = (i64::from(start_hour) - day_start).rem_euclid(24);
        let top = grid_hour as f64 * hh + f64::from(start_minute) / 60.0 * hh;

        let mut duration_hours = (f64::from(end_hour) - f64::from(start_hour))
            + (f64::from(end_minute) - f64::from(start_minute)) / 60.0;
        if duration_hours < 0.0 {
            duration_hours += 24.0;
        }

        let height = (duration_hours * hh).max(self.config.min_event_hours * hh);

        EventPosition {
            event_id: event.id.clone(),
            top,
            height,
            column: 0,
            total_columns: 1,
        }
    }

    /// Position every event and assign overlap columns.
    ///
    /// Positions are sorted ascending by `top`, then swept: a run grows while
    /// the next event starts before the most recently admitted event ends.
    /// The admission check uses the running "current" event's extent, not the
    /// run opener's, so overlap chains group transitively. That chaining
    /// semantic is what the rendered calendar expects; do not replace it with
    /// pairwise-overlap clustering.
    ///
    /// Total over any input, including empty and single-element slices.
    pub fn assign_columns(&self, events: &[ScheduleEvent]) -> Vec<EventPosition> {
        let mut positions: Vec<EventPosition> =
            events.iter().map(|e| self.position(e)).collect();
        positions.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));

        let mut i = 0;
        while i < positions.len() {
            let mut run_len = 1;
            let mut current_top = positions[i].top;
            let mut current_height = positions[i].height;

            while i + run_len < positions.len()
                && positions[i + run_len].top < current_top + current_height
            {
                current_top = positions[i + run_len].top;
                current_height = positions[i + run_len].height;
                run_len += 1;
            }

            if run_len > 1 {
                for (column, pos) in positions[i..i + run_len].iter_mut().enumerate() {
                    pos.column = column;
                    pos.total_columns = run_len;
                }
            }

            i += run_len;
        }

        positions
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::NaiveTime;

    fn timed_event(id: &str, start: (u32, u32), end: (u32, u32)) -> ScheduleEvent {
        ScheduleEvent {
            id: id.to_string(),
            title: id.to_string(),
            category_id: None,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            date: None,
            is_recurring: true,
            recurrence_days: None,
            status: EventStatus::Pending,
        }
    }

    #[test]
    fn test_position_basic_grid_math() {
        let engine = LayoutEngine::new();
        let pos = engine.position(&timed_event("a", (6, 30), (8, 0)));

        // 06:30 is 1.5h past the 05:00 grid start
        assert_eq!(pos.top, 120.0);
        assert_eq!(pos.height, 120.0);
    }

    #[test]
    fn test_position_wraps_early_morning_past_midnight() {
        let engine = LayoutEngine::new();
        // 02:00 renders after the late-night hours, 21h down the grid
        let pos = engine.position(&timed_event("a", (2, 0), (3, 0)));
        assert_eq!(pos.top, 21.0 * 80.0);
    }

    #[test]
    fn test_position_midnight_crossing_duration() {
        let engine = LayoutEngine::new();
        // 23:00 -> 01:00 is two hours, not minus 22
        let pos = engine.position(&timed_event("a", (23, 0), (1, 0)));
        assert_eq!(pos.height, 160.0);
    }

    #[test]
    fn test_position_minimum_height_floor() {
        let engine = LayoutEngine::new();
        // 5-minute event still renders at the 15-minute floor
        let pos = engine.position(&timed_event("a", (9, 0), (9, 5)));
        assert_eq!(pos.height, 0.25 * 80.0);

        // Zero-length event as well
        let pos = engine.position(&timed_event("b", (9, 0), (9, 0)));
        assert_eq!(pos.height, 0.25 * 80.0);
    }

    #[test]
    fn test_assign_columns_empty_and_singleton() {
        let engine = LayoutEngine::new();
        assert!(engine.assign_columns(&[]).is_empty());

        let positions = engine.assign_columns(&[timed_event("a", (9, 0), (10, 0))]);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].column, 0);
        assert_eq!(positions[0].total_columns, 1);
    }

    #[test]
    fn test_assign_columns_overlapping_pair() {
        let engine = LayoutEngine::new();
        let positions = engine.assign_columns(&[
            timed_event("a", (9, 0), (10, 0)),
            timed_event("b", (9, 30), (10, 30)),
        ]);

        assert_eq!(positions[0].event_id, "a");
        assert_eq!(positions[0].column, 0);
        assert_eq!(positions[0].total_columns, 2);
        assert_eq!(positions[1].event_id, "b");
        assert_eq!(positions[1].column, 1);
        assert_eq!(positions[1].total_columns, 2);
    }

    #[test]
    fn test_disjoint_events_keep_single_column() {
        let engine = LayoutEngine::new();
        let positions = engine.assign_columns(&[
            timed_event("a", (9, 0), (10, 0)),
            timed_event("b", (10, 0), (11, 0)),
            timed_event("c", (14, 0), (15, 0)),
        ]);

        for pos in &positions {
            assert_eq!(pos.column, 0);
            assert_eq!(pos.total_columns, 1);
        }
    }

    #[test]
    fn test_chained_overlap_groups_transitively() {
        let engine = LayoutEngine::new();
        // a overlaps b, b overlaps c, but a and c do not intersect. The sweep
        // chains through b's extent, so all three share one group.
        let positions = engine.assign_columns(&[
            timed_event("a", (9, 0), (10, 0)),
            timed_event("b", (9, 45), (11, 0)),
            timed_event("c", (10, 30), (11, 30)),
        ]);

        assert_eq!(positions.len(), 3);
        for (idx, pos) in positions.iter().enumerate() {
            assert_eq!(pos.column, idx);
            assert_eq!(pos.total_columns, 3);
        }
    }

    #[test]
    fn test_chain_stops_at_current_extent_not_run_maximum() {
        let engine = LayoutEngine::new();
        // b is short and ends before a does. c starts after b ends (breaking
        // the chain at the current event) even though it still overlaps a.
        let positions = engine.assign_columns(&[
            timed_event("a", (9, 0), (12, 0)),
            timed_event("b", (9, 15), (9, 45)),
            timed_event("c", (10, 0), (10, 30)),
        ]);

        assert_eq!(positions[0].event_id, "a");
        assert_eq!(positions[0].total_columns, 2);
        assert_eq!(positions[1].event_id, "b");
        assert_eq!(positions[1].total_columns, 2);
        assert_eq!(positions[2].event_id, "c");
        assert_eq!(positions[2].column, 0);
        assert_eq!(positions[2].total_columns, 1);
    }

    #[test]
    fn test_two_separate_overlap_groups() {
        let engine = LayoutEngine::new();
        let positions = engine.assign_columns(&[
            timed_event("a", (9, 0), (10, 0)),
            timed_event("b", (9, 30), (10, 30)),
            timed_event("c", (13, 0), (14, 0)),
            timed_event("d", (13, 15), (14, 15)),
        ]);

        assert_eq!(positions[0].total_columns, 2);
        assert_eq!(positions[1].total_columns, 2);
        assert_eq!(positions[2].total_columns, 2);
        assert_eq!(positions[2].column, 0);
        assert_eq!(positions[3].column, 1);
    }

    #[test]
    fn test_oversized_day_start_hour_wraps_instead_of_panicking() {
        let engine = LayoutEngine::with_config(LayoutConfig {
            day_start_hour: 29,
            ..LayoutConfig::default()
        });

        // 29 reduces to a 5:00 grid start
        let pos = engine.position(&timed_event("a", (6, 0), (7, 0)));
        assert_eq!(pos.top, 80.0);

        // Start hour before the reduced origin still wraps forward
        let pos = engine.position(&timed_event("b", (2, 0), (3, 0)));
        assert_eq!(pos.top, 21.0 * 80.0);
    }

    #[test]
    fn test_custom_grid_config() {
        let engine = LayoutEngine::with_config(LayoutConfig {
            hour_height: 60.0,
            day_start_hour: 0,
            min_event_hours: 0.5,
        });

        let pos = engine.position(&timed_event("a", (1, 0), (1, 10)));
        assert_eq!(pos.top, 60.0);
        assert_eq!(pos.height, 30.0);
    }
}
