use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::FixedOffset;
use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::analytics::ranking::DEFAULT_TOP_EXPENSES;
use crate::currency::{CurrencyCode, LocaleConfig, MoneyFormatter};
use crate::errors::{AnalyticsError, Result};

const DEFAULT_DIR_NAME: &str = ".expense_analytics";
const HOME_ENV: &str = "EXPENSE_ANALYTICS_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Reporting preferences shared by every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub locale: String,
    pub currency: String,
    /// Offset of the user's local calendar from UTC, in minutes.
    pub utc_offset_minutes: i32,
    pub top_expenses_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            utc_offset_minutes: 0,
            top_expenses_limit: DEFAULT_TOP_EXPENSES,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        self.zone()?;
        if self.top_expenses_limit == 0 {
            return Err(AnalyticsError::Config(
                "top_expenses_limit must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(AnalyticsError::Config("currency must not be empty".into()));
        }
        Ok(())
    }

    pub fn zone(&self) -> Result<FixedOffset> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(AnalyticsError::Config(format!(
                "utc_offset_minutes {} is outside ±{MAX_OFFSET_MINUTES}",
                self.utc_offset_minutes
            )));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AnalyticsError::Config(format!(
                "utc_offset_minutes {} is not a valid offset",
                self.utc_offset_minutes
            ))
        })
    }

    pub fn money_formatter(&self) -> MoneyFormatter {
        MoneyFormatter::new(
            CurrencyCode::new(&self.currency),
            LocaleConfig::for_tag(&self.locale),
        )
    }
}

/// Returns the application data directory, defaulting to `~/.expense_analytics`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Handles persistence for [`AnalyticsConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager rooted at [`app_data_dir`].
    pub fn from_env() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self::new(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> Result<AnalyticsConfig> {
        if !self.config_path.exists() {
            return Ok(AnalyticsConfig::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: AnalyticsConfig = serde_json::from_str(&data).map_err(|err| {
            AnalyticsError::Config(format!("{}: {err}", self.config_path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &AnalyticsConfig) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
