use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::intake::{QUICK_ADD_AMOUNTS_ML, REMINDER_CONFIRM_AMOUNT_ML};
use crate::logging::LogConfig;
use crate::reminder::DEFAULT_SNOOZE_MINUTES;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Where records are stored
    pub storage: StorageSettings,

    /// Reminder interaction defaults
    pub reminders: ReminderDefaults,

    /// Logging setup
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database holding the key-value records
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDefaults {
    /// Delay for "remind me later"
    pub snooze_minutes: u32,

    /// Amount credited when a reminder is confirmed
    pub confirm_amount_ml: u32,

    /// One-tap amounts
    pub quick_add_ml: Vec<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                updated_at: Utc::now(),
            },
            storage: StorageSettings::default(),
            reminders: ReminderDefaults::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("aquatrack")
                .join("aquatrack.db"),
        }
    }
}

impl Default for ReminderDefaults {
    fn default() -> Self {
        ReminderDefaults {
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            confirm_amount_ml: REMINDER_CONFIRM_AMOUNT_ML,
            quick_add_ml: QUICK_ADD_AMOUNTS_ML.to_vec(),
        }
    }
}

impl ReminderDefaults {
    /// Amount for a drink command: explicit amount, else the 1-based quick-add
    /// choice, else the reminder confirmation amount
    pub fn drink_amount(&self, amount: Option<u32>, quick: Option<usize>) -> Result<u32> {
        match (amount, quick) {
            (Some(amount), _) => Ok(amount),
            (None, Some(choice)) => choice
                .checked_sub(1)
                .and_then(|i| self.quick_add_ml.get(i))
                .copied()
                .with_context(|| {
                    format!(
                        "Quick-add choice {} is out of range, pick 1-{} ({:?} ml)",
                        choice,
                        self.quick_add_ml.len(),
                        self.quick_add_ml
                    )
                }),
            (None, None) => Ok(self.confirm_amount_ml),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aquatrack")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %config_path.display(), error = %e, "Using default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.reminders, deserialized.reminders);
        assert_eq!(deserialized.reminders.quick_add_ml, vec![100, 200, 300]);
    }

    #[test]
    fn test_drink_amount_choice() {
        let reminders = ReminderDefaults::default();
        assert_eq!(reminders.drink_amount(Some(450), Some(1)).unwrap(), 450);
        assert_eq!(reminders.drink_amount(None, Some(1)).unwrap(), 100);
        assert_eq!(reminders.drink_amount(None, Some(3)).unwrap(), 300);
        assert_eq!(reminders.drink_amount(None, None).unwrap(), 200);
        assert!(reminders.drink_amount(None, Some(0)).is_err());
        assert!(reminders.drink_amount(None, Some(4)).is_err());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.reminders.snooze_minutes = 30;
        original.storage.database_path = temp_dir.path().join("water.db");
        original.save_to_file(&config_path).unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.reminders.snooze_minutes, 30);
        assert_eq!(loaded.storage.database_path, temp_dir.path().join("water.db"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(Some(&temp_dir.path().join("absent.toml")));
        assert_eq!(config.reminders, ReminderDefaults::default());
    }
}
