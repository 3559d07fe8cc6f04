//! Application configuration
//!
//! Every engine takes its settings explicitly through this struct; no module
//! reads environment state or process-wide singletons. Persisted as TOML
//! under the platform config directory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::LayoutConfig;
use crate::models::{NutritionTargets, WeightUnit};
use crate::stats::ReportConfig;
use crate::streaks::StreakConfig;
use crate::strength::RecordConfig;
use crate::trends::TrendConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Day-grid layout settings
    pub layout: LayoutConfig,

    /// Trend classification thresholds
    pub trends: TrendConfig,

    /// Streak calculation settings
    pub streak: StreakConfig,

    /// Personal-record tracking settings
    pub records: RecordConfig,

    /// Report caps
    pub report: ReportConfig,

    /// Daily nutrition targets
    pub targets: NutritionTargets,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory path (database lives here)
    pub data_dir: PathBuf,

    /// Weight unit used across the user's history
    pub weight_unit: WeightUnit,

    /// Goal body weight, if the user has set one
    pub weight_target: Option<Decimal>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings {
                data_dir: default_data_dir(),
                weight_unit: WeightUnit::default(),
                weight_target: None,
            },
            layout: LayoutConfig::default(),
            trends: TrendConfig::default(),
            streak: StreakConfig::default(),
            records: RecordConfig::default(),
            report: ReportConfig::default(),
            targets: NutritionTargets::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Load from the given path, or the default location, creating a default
    /// config file on first run
    pub fn load_or_create(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => default_config_path()?,
        };

        if path.exists() {
            Self::load(&path)
        } else {
            let mut config = AppConfig::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Path of the SQLite database under the data directory
    pub fn database_path(&self) -> PathBuf {
        self.settings.data_dir.join("fitrs.db")
    }
}

/// Default config file location under the platform config directory
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("fitrs").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fitrs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.metadata.version, "1.0");
        assert_eq!(config.layout.hour_height, 80.0);
        assert_eq!(config.layout.day_start_hour, 5);
        assert_eq!(config.streak.max_gap_days, 2);
        assert_eq!(config.report.max_prs, 20);
        assert!(config.settings.weight_target.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.settings.weight_target = Some(dec!(170));
        config.targets.calories = dec!(2200);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.settings.weight_target, Some(dec!(170)));
        assert_eq!(loaded.targets.calories, dec!(2200));
        assert_eq!(loaded.trends.min_points, 4);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig::load_or_create(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(config.report.max_recent_prs, 10);

        // Second call loads the file instead of recreating it
        let again = AppConfig::load_or_create(Some(path)).unwrap();
        assert_eq!(again.metadata.version, config.metadata.version);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load("/nonexistent/config.toml").is_err());
    }
}
