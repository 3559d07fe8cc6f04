//! Two-window trend classification and weight-progress statistics
//!
//! Compares the mean of an earlier window against a later one and classifies
//! the series as increasing, decreasing, or stable. Two variants exist with
//! deliberately different sensitivities: the half-split used for weight,
//! calorie, and protein series (5% band), and the session-based variant used
//! for estimated-1RM progressions (recent 3 vs prior 3, 2% band). The
//! thresholds are not unified; each metric keeps the sensitivity the product
//! expects.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::WeightEntry;

/// Direction of a classified trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Trend classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Minimum points for the half-split variant to leave "stable"
    pub min_points: usize,

    /// Upper/lower ratio bands for the half-split variant
    pub increase_ratio: Decimal,
    pub decrease_ratio: Decimal,

    /// Minimum values for the session variant (two full windows of 3)
    pub min_sessions: usize,

    /// Tighter ratio bands for the session variant
    pub session_increase_ratio: Decimal,
    pub session_decrease_ratio: Decimal,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            min_points: 4,
            increase_ratio: Decimal::new(105, 2),
            decrease_ratio: Decimal::new(95, 2),
            min_sessions: 6,
            session_increase_ratio: Decimal::new(102, 2),
            session_decrease_ratio: Decimal::new(98, 2),
        }
    }
}

/// Summary statistics over a weight history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightStats {
    pub start_weight: Decimal,
    pub start_date: NaiveDate,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub trend: TrendDirection,
    pub avg_weekly_change: Decimal,
}

/// Goal state with an estimate only when the trend approaches the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub target: Decimal,
    pub remaining: Decimal,
    pub estimated_date: Option<NaiveDate>,
}

/// Trend analysis engine
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        TrendAnalyzer {
            config: TrendConfig::default(),
        }
    }

    /// Create an analyzer with custom thresholds
    pub fn with_config(config: TrendConfig) -> Self {
        TrendAnalyzer { config }
    }

    /// Classify a chronological `(date, value)` series by comparing
    /// first-half and second-half means. Below the minimum point count the
    /// verdict is always stable.
    pub fn classify_trend(&self, points: &[(NaiveDate, Decimal)]) -> TrendDirection {
        if points.len() < self.config.min_points {
            return TrendDirection::Stable;
        }

        let mid = points.len() / 2;
        let first = Self::mean(points[..mid].iter().map(|(_, v)| *v));
        let second = Self::mean(points[mid..].iter().map(|(_, v)| *v));

        if second > first * self.config.increase_ratio {
            TrendDirection::Increasing
        } else if second < first * self.config.decrease_ratio {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Classify a chronological per-session series by comparing the most
    /// recent three values against the prior three, with the tighter band.
    pub fn classify_session_trend(&self, values: &[Decimal]) -> TrendDirection {
        if values.len() < self.config.min_sessions {
            return TrendDirection::Stable;
        }

        let recent = Self::mean(values[values.len() - 3..].iter().copied());
        let prior = Self::mean(values[values.len() - 6..values.len() - 3].iter().copied());

        if recent > prior * self.config.session_increase_ratio {
            TrendDirection::Increasing
        } else if recent < prior * self.config.session_decrease_ratio {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Derive progress statistics from a weight history sorted ascending by
    /// date. Fewer than two entries yields no stats.
    pub fn weight_stats(&self, history: &[WeightEntry]) -> Option<WeightStats> {
        if history.len() < 2 {
            return None;
        }

        let first = &history[0];
        let last = &history[history.len() - 1];

        let change = last.weight - first.weight;
        let change_percent = if first.weight.is_zero() {
            Decimal::ZERO
        } else {
            (change / first.weight * Decimal::from(100))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        };

        let elapsed_days = (last.date - first.date).num_days();
        let avg_weekly_change = if elapsed_days > 0 {
            change / (Decimal::from(elapsed_days) / Decimal::from(7))
        } else {
            Decimal::ZERO
        };

        let points: Vec<(NaiveDate, Decimal)> =
            history.iter().map(|e| (e.date, e.weight)).collect();

        Some(WeightStats {
            start_weight: first.weight,
            start_date: first.date,
            change,
            change_percent,
            trend: self.classify_trend(&points),
            avg_weekly_change,
        })
    }

    /// Project when a goal weight will be reached at the current linear
    /// rate. The estimate exists only when `remaining` (current − target)
    /// and the weekly rate carry opposite signs, i.e. the trend actually
    /// moves toward the goal; otherwise it stays `None`.
    pub fn project_goal(
        &self,
        current: Decimal,
        target: Decimal,
        avg_weekly_change: Decimal,
        today: NaiveDate,
    ) -> GoalProjection {
        let remaining = current - target;

        let approaching = !remaining.is_zero()
            && !avg_weekly_change.is_zero()
            && (remaining.is_sign_positive() != avg_weekly_change.is_sign_positive());

        let estimated_date = if approaching {
            let weeks = (remaining / avg_weekly_change).abs();
            (weeks * Decimal::from(7))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .map(|days| today + Duration::days(days))
        } else {
            None
        };

        GoalProjection {
            target,
            remaining,
            estimated_date,
        }
    }

    fn mean<I: Iterator<Item = Decimal>>(values: I) -> Decimal {
        let mut sum = Decimal::ZERO;
        let mut count = 0u32;
        for v in values {
            sum += v;
            count += 1;
        }
        if count == 0 {
            Decimal::ZERO
        } else {
            sum / Decimal::from(count)
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
