use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status shared by schedule events and workout instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Weight unit used consistently across a user's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Label used when formatting improvement deltas ("+15 lbs")
    pub fn label(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::Lbs
    }
}

/// A calendar event, one-time or recurring by weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Unique identifier for the event
    pub id: String,

    /// Display title
    pub title: String,

    /// Optional category reference
    pub category_id: Option<String>,

    /// Time of day the event starts (no date component)
    pub start_time: NaiveTime,

    /// Time of day the event ends; earlier than start_time means the event
    /// crosses midnight
    pub end_time: NaiveTime,

    /// Calendar date for one-time events; ignored for recurring events
    pub date: Option<NaiveDate>,

    /// Whether the event repeats
    pub is_recurring: bool,

    /// Weekday indices the event repeats on (0=Sunday..6=Saturday).
    /// Empty or None means every day.
    pub recurrence_days: Option<Vec<u8>>,

    /// Current lifecycle status
    pub status: EventStatus,
}

impl ScheduleEvent {
    /// Check the one-time/recurring invariant: a non-recurring event must
    /// carry a concrete date.
    pub fn validate(&self) -> Result<(), crate::error::FitrsError> {
        if !self.is_recurring && self.date.is_none() {
            return Err(crate::error::FitrsError::Validation(format!(
                "Non-recurring event '{}' has no date",
                self.id
            )));
        }
        Ok(())
    }
}

/// Pixel placement of an event on the day grid. Derived per render,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPosition {
    /// The event this position belongs to
    pub event_id: String,

    /// Pixel offset from the top of the grid
    pub top: f64,

    /// Pixel height of the event box
    pub height: f64,

    /// 0-indexed column among mutually overlapping events
    pub column: usize,

    /// Number of columns in the overlap group
    pub total_columns: usize,
}

/// One logged set within an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetInstance {
    /// Weight lifted; None for bodyweight or unlogged sets
    pub weight: Option<Decimal>,

    /// Repetitions performed
    pub reps: u32,

    /// Warmup sets are excluded from PR and volume calculations
    pub is_warmup: bool,
}

impl SetInstance {
    /// A working set is non-warmup with a logged weight; only these count
    /// toward statistics.
    pub fn is_working(&self) -> bool {
        !self.is_warmup && self.weight.is_some()
    }
}

/// A completed exercise occurrence within a workout, with its ordered sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInstance {
    /// Unique identifier for this occurrence
    pub id: String,

    /// Identifier of the exercise definition
    pub exercise_id: String,

    /// Exercise display name
    pub name: String,

    /// Sets in logged order
    pub sets: Vec<SetInstance>,
}

impl ExerciseInstance {
    /// Total working volume for this occurrence (Σ weight × reps)
    pub fn working_volume(&self) -> Decimal {
        self.sets
            .iter()
            .filter(|s| s.is_working())
            .map(|s| s.weight.unwrap_or(Decimal::ZERO) * Decimal::from(s.reps))
            .sum()
    }
}

/// A logged workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutInstance {
    /// Unique identifier for the workout
    pub id: String,

    /// Date of the workout
    pub date: NaiveDate,

    /// Completion timestamp, set when the workout is finished
    pub completed_at: Option<NaiveDateTime>,

    /// Lifecycle status
    pub status: EventStatus,

    /// Exercises performed, in order
    pub exercises: Vec<ExerciseInstance>,
}

impl WorkoutInstance {
    /// Total working volume across all exercises
    pub fn total_volume(&self) -> Decimal {
        self.exercises.iter().map(|e| e.working_volume()).sum()
    }
}

/// One body-weight log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: Decimal,
}

/// One nutrition log entry (a meal or a daily total)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    pub date: NaiveDate,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// One sleep log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub date: NaiveDate,
    pub hours: Decimal,
}

/// Daily nutrition targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

impl Default for NutritionTargets {
    fn default() -> Self {
        NutritionTargets {
            calories: Decimal::from(2400),
            protein: Decimal::from(180),
            carbs: Decimal::from(250),
            fat: Decimal::from(80),
        }
    }
}

/// Prescription scaling levels for a programmed exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingLevel {
    /// As prescribed
    Rx,
    /// First scaled level
    L2,
    /// Second scaled level
    L1,
}

/// Rep/weight scheme prescribed at one scaling level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetScheme {
    pub reps: u32,
    pub weight: Option<Decimal>,
}

/// Programmed exercise prescription with one scheme per scaling level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
    pub rx: SetScheme,
    pub l2: SetScheme,
    pub l1: SetScheme,
}

impl ExercisePrescription {
    /// Look up the scheme for a scaling level
    pub fn scheme(&self, level: ScalingLevel) -> &SetScheme {
        match level {
            ScalingLevel::Rx => &self.rx,
            ScalingLevel::L2 => &self.l2,
            ScalingLevel::L1 => &self.l1,
        }
    }
}
