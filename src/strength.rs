//! Strength metrics: estimated 1RM and personal-record detection
//!
//! Tracks four independent record kinds per exercise over logged sessions
//! (estimated 1RM, max weight, max reps at maintained weight, max session
//! volume) and emits "recent PR" entries when a record falls inside a
//! trailing 30-day window of its replacement.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{SetInstance, WeightUnit};

/// Estimate a one-rep max with the Epley formula.
///
/// `reps == 1` returns the weight unchanged; otherwise the result is
/// `weight × (1 + reps/30)` rounded half-away-from-zero to an integer value.
/// Callers validate reps ≥ 1; zero saturates to the single-rep case.
pub fn estimate_one_rm(weight: Decimal, reps: u32) -> Decimal {
    if reps <= 1 {
        return weight;
    }

    let factor = Decimal::ONE + Decimal::from(reps) / Decimal::from(30);
    (weight * factor).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// One exercise occurrence as the record tracker consumes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    /// Date the session was completed
    pub date: NaiveDate,

    /// Sets in logged order
    pub sets: Vec<SetInstance>,
}

/// Estimated-1RM record with the set it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneRmRecord {
    pub value: Decimal,
    pub date: NaiveDate,
    /// Human-readable source set, e.g. "200 x 10"
    pub based_on: String,
}

/// Heaviest-weight record with the reps performed at that weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub weight: Decimal,
    pub reps: u32,
    pub date: NaiveDate,
}

/// Most-reps record with the weight it was performed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepsRecord {
    pub reps: u32,
    pub weight: Decimal,
    pub date: NaiveDate,
}

/// Largest single-session working volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub volume: Decimal,
    pub date: NaiveDate,
}

/// The four record kinds tracked per exercise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecords {
    pub estimated_one_rm: Option<OneRmRecord>,
    pub max_weight: Option<WeightRecord>,
    pub max_reps: Option<RepsRecord>,
    pub max_volume: Option<VolumeRecord>,
}

/// Which record kind a recent PR belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Estimated1Rm,
    MaxWeight,
    MaxReps,
    SessionVolume,
}

impl RecordKind {
    /// Display label for reports
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Estimated1Rm => "Estimated 1RM",
            RecordKind::MaxWeight => "Max Weight",
            RecordKind::MaxReps => "Max Reps",
            RecordKind::SessionVolume => "Session Volume",
        }
    }
}

/// A record broken within the trailing 30 days of its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPr {
    pub kind: RecordKind,
    pub value: Decimal,
    pub date: NaiveDate,
    /// Human-readable delta over the displaced record, e.g. "+15 lbs"
    pub improvement: String,
}

/// Record tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Window (days) within which a displaced record counts as "recent"
    pub recent_window_days: i64,

    /// Unit label for improvement strings
    pub unit: WeightUnit,
}

impl Default for RecordConfig {
    fn default() -> Self {
        RecordConfig {
            recent_window_days: 30,
            unit: WeightUnit::Lbs,
        }
    }
}

/// Per-exercise personal-record tracker
pub struct RecordTracker {
    config: RecordConfig,
}

impl RecordTracker {
    /// Create a tracker with default settings
    pub fn new() -> Self {
        RecordTracker {
            config: RecordConfig::default(),
        }
    }

    /// Create a tracker with custom settings
    pub fn with_config(config: RecordConfig) -> Self {
        RecordTracker { config }
    }

    /// Scan sessions chronologically and return the final records plus any
    /// recent-PR entries emitted along the way.
    ///
    /// All four maxima use strict `>` comparison: a tie never replaces a
    /// record. Max-reps additionally requires the weight to be maintained or
    /// increased; a rep PR at a lighter weight does not count.
    pub fn analyze(&self, sessions: &[ExerciseSession]) -> (ExerciseRecords, Vec<RecentPr>) {
        let mut ordered: Vec<&ExerciseSession> = sessions.iter().collect();
        ordered.sort_by_key(|s| s.date);

        let mut records = ExerciseRecords::default();
        let mut recent = Vec::new();

        for session in ordered {
            let mut session_volume = Decimal::ZERO;

            for set in &session.sets {
                if !set.is_working() {
                    continue;
                }
                let weight = match set.weight {
                    Some(w) => w,
                    None => continue,
                };

                session_volume += weight * Decimal::from(set.reps);

                self.update_one_rm(&mut records, &mut recent, weight, set.reps, session.date);
                self.update_max_weight(&mut records, &mut recent, weight, set.reps, session.date);
                self.update_max_reps(&mut records, &mut recent, weight, set.reps, session.date);
            }

            self.update_max_volume(&mut records, &mut recent, session_volume, session.date);
        }

        (records, recent)
    }

    fn update_one_rm(
        &self,
        records: &mut ExerciseRecords,
        recent: &mut Vec<RecentPr>,
        weight: Decimal,
        reps: u32,
        date: NaiveDate,
    ) {
        let value = estimate_one_rm(weight, reps);
        let based_on = format!("{} x {}", weight, reps);

        match &records.estimated_one_rm {
            Some(prev) if value <= prev.value => {}
            Some(prev) => {
                if self.is_recent(prev.date, date) {
                    recent.push(RecentPr {
                        kind: RecordKind::Estimated1Rm,
                        value,
                        date,
                        improvement: self.weight_delta(value - prev.value),
                    });
                }
                records.estimated_one_rm = Some(OneRmRecord { value, date, based_on });
            }
            None => {
                records.estimated_one_rm = Some(OneRmRecord { value, date, based_on });
            }
        }
    }

    fn update_max_weight(
        &self,
        records: &mut ExerciseRecords,
        recent: &mut Vec<RecentPr>,
        weight: Decimal,
        reps: u32,
        date: NaiveDate,
    ) {
        match &records.max_weight {
            Some(prev) if weight <= prev.weight => {}
            Some(prev) => {
                if self.is_recent(prev.date, date) {
                    recent.push(RecentPr {
                        kind: RecordKind::MaxWeight,
                        value: weight,
                        date,
                        improvement: self.weight_delta(weight - prev.weight),
                    });
                }
                records.max_weight = Some(WeightRecord { weight, reps, date });
            }
            None => {
                records.max_weight = Some(WeightRecord { weight, reps, date });
            }
        }
    }

    fn update_max_reps(
        &self,
        records: &mut ExerciseRecords,
        recent: &mut Vec<RecentPr>,
        weight: Decimal,
        reps: u32,
        date: NaiveDate,
    ) {
        match &records.max_reps {
            // A rep PR only counts at maintained-or-increased load
            Some(prev) if reps <= prev.reps || weight < prev.weight => {}
            Some(prev) => {
                if self.is_recent(prev.date, date) {
                    recent.push(RecentPr {
                        kind: RecordKind::MaxReps,
                        value: Decimal::from(reps),
                        date,
                        improvement: format!("+{} reps", reps - prev.reps),
                    });
                }
                records.max_reps = Some(RepsRecord { reps, weight, date });
            }
            None => {
                records.max_reps = Some(RepsRecord { reps, weight, date });
            }
        }
    }

    fn update_max_volume(
        &self,
        records: &mut ExerciseRecords,
        recent: &mut Vec<RecentPr>,
        volume: Decimal,
        date: NaiveDate,
    ) {
        if volume <= Decimal::ZERO {
            return;
        }

        match &records.max_volume {
            Some(prev) if volume <= prev.volume => {}
            Some(prev) => {
                if self.is_recent(prev.date, date) {
                    recent.push(RecentPr {
                        kind: RecordKind::SessionVolume,
                        value: volume,
                        date,
                        improvement: self.weight_delta(volume - prev.volume),
                    });
                }
                records.max_volume = Some(VolumeRecord { volume, date });
            }
            None => {
                records.max_volume = Some(VolumeRecord { volume, date });
            }
        }
    }

    fn is_recent(&self, displaced: NaiveDate, new: NaiveDate) -> bool {
        (new - displaced).num_days() <= self.config.recent_window_days
    }

    fn weight_delta(&self, delta: Decimal) -> String {
        format!("+{} {}", delta.normalize(), self.config.unit.label())
    }
}

impl Default for RecordTracker {
    fn default() -> Self {
        Self::new()
    }
}
