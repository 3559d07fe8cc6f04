//! Unified error hierarchy for fitrs
//!
//! Structured error types with context preservation and integration with
//! the tracing system. The statistics engines themselves are total and
//! degrade to documented defaults; errors surface at the parsing, storage,
//! and configuration boundaries.

use thiserror::Error;

/// Top-level error type for all fitrs operations
#[derive(Debug, Error)]
pub enum FitrsError {
    /// Schedule parsing/resolution errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Store operation errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Statistics calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while parsing or resolving schedule data
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Date string not in YYYY-MM-DD form
    #[error("Invalid date string: {value}")]
    InvalidDate { value: String },

    /// Time string not in HH:MM or HH:MM:SS form
    #[error("Invalid time string: {value}")]
    InvalidTime { value: String },

    /// Weekday index outside 0..=6
    #[error("Invalid weekday index: {index}")]
    InvalidWeekday { index: u8 },
}

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Row data that cannot be decoded into a model value
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: String, reason: String },

    /// Record not found
    #[error("Record not found: {table}.{id}")]
    NotFound { table: String, id: String },
}

/// Statistics calculation errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Insufficient data for a calculation that cannot default
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },

    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },
}

/// Result type alias for fitrs operations
pub type Result<T> = std::result::Result<T, FitrsError>;

impl FitrsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FitrsError::Schedule(_) => ErrorSeverity::Warning,
            FitrsError::Validation(_) => ErrorSeverity::Warning,
            FitrsError::Store(StoreError::NotFound { .. }) => ErrorSeverity::Warning,
            FitrsError::Store(_) => ErrorSeverity::Error,
            FitrsError::Calculation(_) => ErrorSeverity::Warning,
            FitrsError::Configuration(_) => ErrorSeverity::Error,
            FitrsError::Io(_) => ErrorSeverity::Error,
            FitrsError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitrsError::Schedule(ScheduleError::InvalidDate { value }) => {
                format!("'{}' is not a valid date. Expected YYYY-MM-DD.", value)
            }
            FitrsError::Schedule(ScheduleError::InvalidTime { value }) => {
                format!("'{}' is not a valid time. Expected HH:MM or HH:MM:SS.", value)
            }
            FitrsError::Store(StoreError::NotFound { table, id }) => {
                format!("Could not find {} record '{}'.", table, id)
            }
            FitrsError::Calculation(CalculationError::InsufficientData { calculation, .. }) => {
                format!("Not enough logged data to calculate {}.", calculation)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
