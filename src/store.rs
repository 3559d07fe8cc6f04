//! SQLite-backed store for the fitness data model
//!
//! Provides the filtered, sorted reads the statistics engines need and
//! simple single-row writes. Decimal values are persisted as TEXT to avoid
//! float drift; calendar dates are persisted as `YYYY-MM-DD` strings and
//! re-parsed from components on the way out.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    EventStatus, ExerciseInstance, NutritionEntry, ScheduleEvent, SetInstance, SleepEntry,
    WeightEntry, WorkoutInstance,
};
use crate::schedule::{parse_local_date, parse_local_time};
use crate::stats::ExerciseHistory;
use crate::strength::ExerciseSession;

/// Store connection and schema management
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Create or open a store at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS schedule_events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                category_id TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                date TEXT,
                is_recurring INTEGER NOT NULL,
                recurrence_days TEXT,
                status TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                completed_at TEXT,
                status TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS workout_exercises (
                id TEXT PRIMARY KEY,
                workout_id TEXT NOT NULL,
                exercise_id TEXT NOT NULL,
                name TEXT NOT NULL,
                position INTEGER NOT NULL,
                FOREIGN KEY (workout_id) REFERENCES workouts (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS exercise_sets (
                id TEXT PRIMARY KEY,
                workout_exercise_id TEXT NOT NULL,
                weight TEXT,
                reps INTEGER NOT NULL,
                is_warmup INTEGER NOT NULL,
                position INTEGER NOT NULL,
                FOREIGN KEY (workout_exercise_id) REFERENCES workout_exercises (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS weight_logs (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                weight TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS nutrition_logs (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                calories TEXT NOT NULL,
                protein TEXT NOT NULL,
                carbs TEXT NOT NULL,
                fat TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sleep_logs (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                hours TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_date ON schedule_events (date);
            CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts (date);
            CREATE INDEX IF NOT EXISTS idx_exercises_workout ON workout_exercises (workout_id);
            CREATE INDEX IF NOT EXISTS idx_exercises_exercise ON workout_exercises (exercise_id);
            CREATE INDEX IF NOT EXISTS idx_sets_exercise ON exercise_sets (workout_exercise_id);
            CREATE INDEX IF NOT EXISTS idx_weight_date ON weight_logs (date);
            CREATE INDEX IF NOT EXISTS idx_nutrition_date ON nutrition_logs (date);
            CREATE INDEX IF NOT EXISTS idx_sleep_date ON sleep_logs (date);
            "#,
        )?;
        Ok(())
    }

    // ---- schedule events ----

    /// Insert an event, assigning an id when the caller left it empty.
    /// Returns the stored id.
    pub fn insert_event(&self, event: &ScheduleEvent) -> Result<String, StoreError> {
        let id = ensure_id(&event.id);
        let recurrence_days = event
            .recurrence_days
            .as_ref()
            .map(|days| serde_json::to_string(days).unwrap_or_else(|_| "[]".to_string()));

        self.conn.execute(
            r#"
            INSERT INTO schedule_events
                (id, title, category_id, start_time, end_time, date, is_recurring, recurrence_days, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                id,
                event.title,
                event.category_id,
                event.start_time.format("%H:%M:%S").to_string(),
                event.end_time.format("%H:%M:%S").to_string(),
                event.date.map(|d| d.format("%Y-%m-%d").to_string()),
                event.is_recurring,
                recurrence_days,
                status_to_str(event.status),
            ],
        )?;

        Ok(id)
    }

    /// Update an event's status
    pub fn update_event_status(&self, id: &str, status: EventStatus) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE schedule_events SET status = ?1 WHERE id = ?2",
            params![status_to_str(status), id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                table: "schedule_events".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete an event
    pub fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM schedule_events WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                table: "schedule_events".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Load all schedule events, sorted by start time
    pub fn all_events(&self) -> Result<Vec<ScheduleEvent>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, title, category_id, start_time, end_time, date,
                   is_recurring, recurrence_days, status
            FROM schedule_events
            ORDER BY start_time
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, bool>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, title, category_id, start, end, date, is_recurring, days, status) = row?;

            let recurrence_days = match days {
                Some(json) => Some(serde_json::from_str(&json).map_err(|e| {
                    corrupt("schedule_events", format!("recurrence_days: {}", e))
                })?),
                None => None,
            };

            events.push(ScheduleEvent {
                id,
                title,
                category_id,
                start_time: parse_local_time(&start)
                    .map_err(|e| corrupt("schedule_events", e.to_string()))?,
                end_time: parse_local_time(&end)
                    .map_err(|e| corrupt("schedule_events", e.to_string()))?,
                date: date
                    .map(|d| parse_local_date(&d))
                    .transpose()
                    .map_err(|e| corrupt("schedule_events", e.to_string()))?,
                is_recurring,
                recurrence_days,
                status: status_from_str(&status)?,
            });
        }

        Ok(events)
    }

    // ---- workouts ----

    /// Insert a workout with its exercises and sets. Returns the workout id.
    pub fn insert_workout(&mut self, workout: &WorkoutInstance) -> Result<String, StoreError> {
        let tx = self.conn.transaction()?;
        let workout_id = ensure_id(&workout.id);

        tx.execute(
            "INSERT INTO workouts (id, date, completed_at, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                workout_id,
                workout.date.format("%Y-%m-%d").to_string(),
                workout
                    .completed_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
                status_to_str(workout.status),
            ],
        )?;

        for (ex_pos, exercise) in workout.exercises.iter().enumerate() {
            let exercise_row_id = ensure_id(&exercise.id);
            tx.execute(
                r#"
                INSERT INTO workout_exercises (id, workout_id, exercise_id, name, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    exercise_row_id,
                    workout_id,
                    exercise.exercise_id,
                    exercise.name,
                    ex_pos as i64,
                ],
            )?;

            for (set_pos, set) in exercise.sets.iter().enumerate() {
                tx.execute(
                    r#"
                    INSERT INTO exercise_sets
                        (id, workout_exercise_id, weight, reps, is_warmup, position)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        Uuid::new_v4().to_string(),
                        exercise_row_id,
                        set.weight.map(|w| w.to_string()),
                        set.reps as i64,
                        set.is_warmup,
                        set_pos as i64,
                    ],
                )?;
            }
        }

        tx.commit()?;
        Ok(workout_id)
    }

    /// Delete a workout; exercises and sets cascade
    pub fn delete_workout(&self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                table: "workouts".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Load workouts in a date range (inclusive), nested exercises and sets
    /// in stored order
    pub fn workouts_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutInstance>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, date, completed_at, status
            FROM workouts
            WHERE date >= ?1 AND date <= ?2
            ORDER BY date
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let mut workouts = Vec::new();
        for row in rows {
            let (id, date, completed_at, status) = row?;
            let exercises = self.load_exercises(&id)?;
            workouts.push(WorkoutInstance {
                date: parse_local_date(&date).map_err(|e| corrupt("workouts", e.to_string()))?,
                completed_at: completed_at
                    .map(|t| {
                        NaiveDateTime::parse_from_str(&t, "%Y-%m-%d %H:%M:%S")
                            .map_err(|e| corrupt("workouts", format!("completed_at: {}", e)))
                    })
                    .transpose()?,
                status: status_from_str(&status)?,
                exercises,
                id,
            });
        }

        Ok(workouts)
    }

    fn load_exercises(&self, workout_id: &str) -> Result<Vec<ExerciseInstance>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, exercise_id, name
            FROM workout_exercises
            WHERE workout_id = ?1
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map(params![workout_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut exercises = Vec::new();
        for row in rows {
            let (id, exercise_id, name) = row?;
            let sets = self.load_sets(&id)?;
            exercises.push(ExerciseInstance {
                id,
                exercise_id,
                name,
                sets,
            });
        }

        Ok(exercises)
    }

    fn load_sets(&self, workout_exercise_id: &str) -> Result<Vec<SetInstance>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT weight, reps, is_warmup
            FROM exercise_sets
            WHERE workout_exercise_id = ?1
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map(params![workout_exercise_id], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?;

        let mut sets = Vec::new();
        for row in rows {
            let (weight, reps, is_warmup) = row?;
            sets.push(SetInstance {
                weight: weight
                    .map(|w| parse_decimal(&w, "exercise_sets"))
                    .transpose()?,
                reps: reps as u32,
                is_warmup,
            });
        }

        Ok(sets)
    }

    /// Completion timestamps of all completed workouts, for streaks
    pub fn completed_timestamps(&self) -> Result<Vec<NaiveDateTime>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM workouts WHERE status = 'completed' AND completed_at IS NOT NULL",
        )?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut stamps = Vec::new();
        for row in rows {
            let raw = row?;
            stamps.push(
                NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
                    .map_err(|e| corrupt("workouts", format!("completed_at: {}", e)))?,
            );
        }

        Ok(stamps)
    }

    /// Working-set history for one exercise across completed workouts, one
    /// session per workout instance. Two workouts on the same day stay
    /// separate sessions so per-session volume records are not inflated.
    /// Warmup and weightless sets are filtered at the query.
    pub fn exercise_history(&self, exercise_id: &str) -> Result<Vec<ExerciseSession>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT w.id, w.date, s.weight, s.reps
            FROM exercise_sets s
            JOIN workout_exercises e ON s.workout_exercise_id = e.id
            JOIN workouts w ON e.workout_id = w.id
            WHERE e.exercise_id = ?1
              AND w.status = 'completed'
              AND s.is_warmup = 0
              AND s.weight IS NOT NULL
            ORDER BY w.date, w.completed_at, w.id, e.position, s.position
            "#,
        )?;

        let rows = stmt.query_map(params![exercise_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut sessions: Vec<ExerciseSession> = Vec::new();
        let mut last_workout: Option<String> = None;
        for row in rows {
            let (workout_id, date, weight, reps) = row?;
            let date = parse_local_date(&date).map_err(|e| corrupt("workouts", e.to_string()))?;
            let set = SetInstance {
                weight: Some(parse_decimal(&weight, "exercise_sets")?),
                reps: reps as u32,
                is_warmup: false,
            };

            match sessions.last_mut() {
                Some(last) if last_workout.as_deref() == Some(workout_id.as_str()) => {
                    last.sets.push(set)
                }
                _ => {
                    sessions.push(ExerciseSession {
                        date,
                        sets: vec![set],
                    });
                    last_workout = Some(workout_id);
                }
            }
        }

        Ok(sessions)
    }

    /// Working-set histories for every exercise that has completed sessions
    pub fn exercise_histories(&self) -> Result<Vec<ExerciseHistory>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT e.exercise_id, e.name
            FROM workout_exercises e
            JOIN workouts w ON e.workout_id = w.id
            WHERE w.status = 'completed'
            ORDER BY e.exercise_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let pairs: Vec<(String, String)> = rows.collect::<Result<_, _>>()?;

        let mut histories = Vec::new();
        for (exercise_id, name) in pairs {
            let sessions = self.exercise_history(&exercise_id)?;
            if !sessions.is_empty() {
                histories.push(ExerciseHistory {
                    exercise_id,
                    name,
                    sessions,
                });
            }
        }

        Ok(histories)
    }

    // ---- time-series logs ----

    /// Insert a weight log entry. Returns the row id.
    pub fn insert_weight(&self, entry: &WeightEntry) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO weight_logs (id, date, weight) VALUES (?1, ?2, ?3)",
            params![
                id,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.weight.to_string()
            ],
        )?;
        Ok(id)
    }

    /// Weight history sorted ascending by date, optionally range-bounded
    pub fn weight_history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<WeightEntry>, StoreError> {
        let from = from
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "0000-01-01".to_string());
        let to = to
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "9999-12-31".to_string());

        let mut stmt = self.conn.prepare(
            "SELECT date, weight FROM weight_logs WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![from, to], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, weight) = row?;
            entries.push(WeightEntry {
                date: parse_local_date(&date)
                    .map_err(|e| corrupt("weight_logs", e.to_string()))?,
                weight: parse_decimal(&weight, "weight_logs")?,
            });
        }

        Ok(entries)
    }

    /// Insert a nutrition log entry. Returns the row id.
    pub fn insert_nutrition(&self, entry: &NutritionEntry) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            r#"
            INSERT INTO nutrition_logs (id, date, calories, protein, carbs, fat)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.calories.to_string(),
                entry.protein.to_string(),
                entry.carbs.to_string(),
                entry.fat.to_string(),
            ],
        )?;
        Ok(id)
    }

    /// All nutrition entries logged on one date
    pub fn nutrition_for_date(&self, date: NaiveDate) -> Result<Vec<NutritionEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, calories, protein, carbs, fat FROM nutrition_logs WHERE date = ?1",
        )?;
        let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, calories, protein, carbs, fat) = row?;
            entries.push(NutritionEntry {
                date: parse_local_date(&date)
                    .map_err(|e| corrupt("nutrition_logs", e.to_string()))?,
                calories: parse_decimal(&calories, "nutrition_logs")?,
                protein: parse_decimal(&protein, "nutrition_logs")?,
                carbs: parse_decimal(&carbs, "nutrition_logs")?,
                fat: parse_decimal(&fat, "nutrition_logs")?,
            });
        }

        Ok(entries)
    }

    /// Insert a sleep log entry. Returns the row id.
    pub fn insert_sleep(&self, entry: &SleepEntry) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO sleep_logs (id, date, hours) VALUES (?1, ?2, ?3)",
            params![
                id,
                entry.date.format("%Y-%m-%d").to_string(),
                entry.hours.to_string()
            ],
        )?;
        Ok(id)
    }

    /// Sleep history sorted ascending by date within a range (inclusive)
    pub fn sleep_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SleepEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, hours FROM sleep_logs WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(
            params![
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, hours) = row?;
            entries.push(SleepEntry {
                date: parse_local_date(&date)
                    .map_err(|e| corrupt("sleep_logs", e.to_string()))?,
                hours: parse_decimal(&hours, "sleep_logs")?,
            });
        }

        Ok(entries)
    }

    /// Look up a single event by id
    pub fn event(&self, id: &str) -> Result<ScheduleEvent, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT id FROM schedule_events WHERE id = ?1",
                params![id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        if found.is_none() {
            return Err(StoreError::NotFound {
                table: "schedule_events".to_string(),
                id: id.to_string(),
            });
        }

        // Small table; reuse the full loader rather than a second row mapper
        self.all_events()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound {
                table: "schedule_events".to_string(),
                id: id.to_string(),
            })
    }
}

fn ensure_id(id: &str) -> String {
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

fn status_to_str(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Pending => "pending",
        EventStatus::InProgress => "in_progress",
        EventStatus::Completed => "completed",
        EventStatus::Cancelled => "cancelled",
    }
}

fn status_from_str(s: &str) -> Result<EventStatus, StoreError> {
    match s {
        "pending" => Ok(EventStatus::Pending),
        "in_progress" => Ok(EventStatus::InProgress),
        "completed" => Ok(EventStatus::Completed),
        "cancelled" => Ok(EventStatus::Cancelled),
        other => Err(corrupt("status", format!("unknown status '{}'", other))),
    }
}

fn parse_decimal(raw: &str, table: &str) -> Result<Decimal, StoreError> {
    raw.parse::<Decimal>()
        .map_err(|e| corrupt(table, format!("decimal '{}': {}", raw, e)))
}

fn corrupt(table: &str, reason: String) -> StoreError {
    StoreError::CorruptRow {
        table: table.to_string(),
        reason,
    }
}
