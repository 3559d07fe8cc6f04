//! Report shaping for the derived-statistics endpoints
//!
//! Builds the JSON response bodies the API routes return: the PR report,
//! weight progress, and the stats summary. Builders take plain slices so the
//! engines stay store-agnostic; every report degrades to documented defaults
//! when data is missing.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{EventStatus, SleepEntry, WeightEntry, WorkoutInstance};
use crate::streaks::{StreakCalculator, StreakSummary};
use crate::strength::{ExerciseRecords, ExerciseSession, RecentPr, RecordTracker};
use crate::trends::{GoalProjection, TrendAnalyzer, TrendDirection, WeightStats};

/// Report caps and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Max exercises in the PR report
    pub max_prs: usize,

    /// Max recent-PR entries in the PR report
    pub max_recent_prs: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            max_prs: 20,
            max_recent_prs: 10,
        }
    }
}

/// One exercise's history, as loaded from the store
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistory {
    pub exercise_id: String,
    pub name: String,
    pub sessions: Vec<ExerciseSession>,
}

/// Records for one exercise in the PR report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePrEntry {
    pub exercise: String,
    pub exercise_id: String,
    pub records: ExerciseRecords,
}

/// A recent PR attributed to its exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPrEntry {
    pub exercise: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Decimal,
    pub date: NaiveDate,
    pub improvement: String,
}

/// The PR endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrReport {
    pub prs: Vec<ExercisePrEntry>,
    pub recent_prs: Vec<RecentPrEntry>,
}

/// The weight-progress endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProgress {
    pub current: Option<Decimal>,
    pub history: Vec<WeightEntry>,
    pub stats: Option<WeightStats>,
    pub goal: Option<GoalProjection>,
}

/// Workout counts for the stats summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTotals {
    pub completed: usize,
    pub scheduled: usize,
    /// Completed/scheduled as a rounded percent; 0 when nothing scheduled
    pub consistency: Decimal,
}

/// Volume totals for the stats summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeTotals {
    pub total: Decimal,
    pub avg_per_workout: Decimal,
}

/// The stats-summary endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub workouts: WorkoutTotals,
    pub volume: VolumeTotals,
    pub streak: StreakSummary,
}

/// Build the PR report across exercise histories: per-exercise records
/// sorted descending by estimated 1RM (capped), recent PRs sorted descending
/// by date (capped).
pub fn pr_report(
    histories: &[ExerciseHistory],
    tracker: &RecordTracker,
    config: &ReportConfig,
) -> PrReport {
    let mut prs = Vec::new();
    let mut recent_prs = Vec::new();

    for history in histories {
        let (records, recent) = tracker.analyze(&history.sessions);

        if records.estimated_one_rm.is_some()
            || records.max_weight.is_some()
            || records.max_reps.is_some()
            || records.max_volume.is_some()
        {
            prs.push(ExercisePrEntry {
                exercise: history.name.clone(),
                exercise_id: history.exercise_id.clone(),
                records,
            });
        }

        recent_prs.extend(recent.into_iter().map(|pr: RecentPr| RecentPrEntry {
            exercise: history.name.clone(),
            kind: pr.kind.label().to_string(),
            value: pr.value,
            date: pr.date,
            improvement: pr.improvement,
        }));
    }

    prs.sort_by(|a, b| {
        let a_val = a.records.estimated_one_rm.as_ref().map(|r| r.value);
        let b_val = b.records.estimated_one_rm.as_ref().map(|r| r.value);
        b_val.cmp(&a_val)
    });
    prs.truncate(config.max_prs);

    recent_prs.sort_by(|a, b| b.date.cmp(&a.date));
    recent_prs.truncate(config.max_recent_prs);

    PrReport { prs, recent_prs }
}

/// Build the weight-progress report from a history sorted ascending by date.
/// `target` comes from the user's goal settings when present.
pub fn weight_progress(
    history: &[WeightEntry],
    target: Option<Decimal>,
    analyzer: &TrendAnalyzer,
    today: NaiveDate,
) -> WeightProgress {
    let current = history.last().map(|e| e.weight);
    let stats = analyzer.weight_stats(history);

    let goal = match (current, target) {
        (Some(current), Some(target)) => {
            let rate = stats
                .as_ref()
                .map(|s| s.avg_weekly_change)
                .unwrap_or(Decimal::ZERO);
            Some(analyzer.project_goal(current, target, rate, today))
        }
        _ => None,
    };

    WeightProgress {
        current,
        history: history.to_vec(),
        stats,
        goal,
    }
}

/// Build the stats summary over a period's workouts. `scheduled` counts every
/// workout instance in the period; `completed` those with completed status.
pub fn stats_summary(
    workouts: &[WorkoutInstance],
    streaks: &StreakCalculator,
    today: NaiveDate,
) -> StatsSummary {
    let scheduled = workouts.len();
    let completed_workouts: Vec<&WorkoutInstance> = workouts
        .iter()
        .filter(|w| w.status == EventStatus::Completed)
        .collect();
    let completed = completed_workouts.len();

    let consistency = if scheduled == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(completed as u64) / Decimal::from(scheduled as u64)
            * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };

    let total: Decimal = completed_workouts.iter().map(|w| w.total_volume()).sum();
    let avg_per_workout = if completed == 0 {
        Decimal::ZERO
    } else {
        (total / Decimal::from(completed as u64))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };

    let stamps: Vec<chrono::NaiveDateTime> = completed_workouts
        .iter()
        .filter_map(|w| w.completed_at)
        .collect();
    let streak = streaks.compute(&stamps, today);

    StatsSummary {
        workouts: WorkoutTotals {
            completed,
            scheduled,
            consistency,
        },
        volume: VolumeTotals {
            total,
            avg_per_workout,
        },
        streak,
    }
}

/// The sleep endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub nights: usize,
    pub avg_hours: Decimal,
    pub trend: TrendDirection,
}

/// Summarize a sleep history sorted ascending by date: nightly average
/// rounded to one decimal, plus the half-split trend verdict. An empty
/// history yields no summary.
pub fn sleep_summary(entries: &[SleepEntry], analyzer: &TrendAnalyzer) -> Option<SleepSummary> {
    if entries.is_empty() {
        return None;
    }

    let total: Decimal = entries.iter().map(|e| e.hours).sum();
    let avg_hours = (total / Decimal::from(entries.len() as u64))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    let points: Vec<(NaiveDate, Decimal)> =
        entries.iter().map(|e| (e.date, e.hours)).collect();

    Some(SleepSummary {
        nights: entries.len(),
        avg_hours,
        trend: analyzer.classify_trend(&points),
    })
}

/// Per-session estimated-1RM progression for an exercise, used by the 1RM
/// trend endpoint: the best working-set estimate per session, chronological.
pub fn one_rm_progression(sessions: &[ExerciseSession]) -> Vec<(NaiveDate, Decimal)> {
    let mut ordered: Vec<&ExerciseSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.date);

    ordered
        .iter()
        .filter_map(|session| {
            session
                .sets
                .iter()
                .filter(|s| s.is_working())
                .filter_map(|s| s.weight.map(|w| crate::strength::estimate_one_rm(w, s.reps)))
                .max()
                .map(|best| (session.date, best))
        })
        .collect()
}
