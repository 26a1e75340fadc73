//! Runtime configuration read from the environment.

use crate::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "FOOD_RESCUE_DB_PATH";
pub const ENV_DATA_DIR: &str = "FOOD_RESCUE_DATA_DIR";
pub const ENV_REPORT_TIMEOUT_MS: &str = "FOOD_RESCUE_REPORT_TIMEOUT_MS";

pub const DB_FILE_NAME: &str = "food_waste_management.db";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Directory holding `<table>_data.csv` files for the one-time bulk load.
    pub data_dir: Option<PathBuf>,
    pub report_timeout: Duration,
}

fn app_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("food-rescue")
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            db_path: app_data_dir().join(DB_FILE_NAME),
            data_dir: data_dir.is_dir().then_some(data_dir),
            report_timeout: DEFAULT_REPORT_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|s| !s.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            let dir = dir.trim();
            config.data_dir = if dir.is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }

        if let Some(raw) = lookup(ENV_REPORT_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a whole number of ms, got {:?}", ENV_REPORT_TIMEOUT_MS, raw))
            })?;
            if ms == 0 {
                return Err(AppError::Config(format!("{} must be positive", ENV_REPORT_TIMEOUT_MS)));
            }
            config.report_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}
