// Library interface for the fitrs modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod models;
pub mod nutrition;
pub mod schedule;
pub mod stats;
pub mod store;
pub mod streaks;
pub mod strength;
pub mod trends;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{FitrsError, Result};
pub use layout::{LayoutConfig, LayoutEngine};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use nutrition::{daily_summary, MacroTotals, NutritionSummary};
pub use schedule::{events_for_date, occurs_on, parse_local_date, parse_local_time};
pub use stats::{
    pr_report, sleep_summary, stats_summary, weight_progress, PrReport, SleepSummary,
    StatsSummary, WeightProgress,
};
pub use store::Store;
pub use streaks::{StreakCalculator, StreakConfig, StreakSummary};
pub use strength::{estimate_one_rm, ExerciseSession, RecordConfig, RecordTracker};
pub use trends::{TrendAnalyzer, TrendConfig, TrendDirection};
