use crate::settings::{SettingKey, Settings};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_stage_delay")]
    pub stage_delay_ms: u64,
    #[serde(default = "default_processing")]
    pub processing_ms: u64,
    #[serde(default = "default_max_finished")]
    pub max_finished_entries: usize,
}

fn default_stage_delay() -> u64 {
    1000
}

fn default_processing() -> u64 {
    2000
}

fn default_max_finished() -> usize {
    500
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: default_stage_delay(),
            processing_ms: default_processing(),
            max_finished_entries: default_max_finished(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_high_cache")]
    pub high_cache_threshold_mb: u64,
}

fn default_high_cache() -> u64 {
    100
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            high_cache_threshold_mb: default_high_cache(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_modal_secs")]
    pub processing_modal_secs: u64,
    #[serde(default = "default_true")]
    pub color_output: bool,
}

fn default_modal_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            processing_modal_secs: default_modal_secs(),
            color_output: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("apptools")
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("apptools")
    }

    /// Keys accepted by [`Config::set_value`], besides the boolean settings.
    pub const KEYS: [&'static str; 9] = [
        "stage_delay_ms",
        "processing_ms",
        "max_finished_entries",
        "high_cache_threshold_mb",
        "processing_modal_secs",
        "catalog",
        "log_level",
        "clean_interval_hours",
        "max_cache_size_mb",
    ];

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "stage_delay_ms" => self.queue.stage_delay_ms = value.parse()?,
            "processing_ms" => self.queue.processing_ms = value.parse()?,
            "max_finished_entries" => {
                let max: usize = value.parse()?;
                if max == 0 {
                    bail!("max_finished_entries must be at least 1");
                }
                self.queue.max_finished_entries = max;
            }
            "high_cache_threshold_mb" => self.selection.high_cache_threshold_mb = value.parse()?,
            "processing_modal_secs" => self.ui.processing_modal_secs = value.parse()?,
            "catalog" => {
                self.catalog.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "log_level" => self.log.level = value.to_string(),
            "clean_interval_hours" => self.settings.set_interval(value.parse()?),
            "max_cache_size_mb" => self.settings.set_max_cache(value.parse()?),
            other => match SettingKey::from_config_key(other) {
                Some(setting) => self.settings.set(setting, value.parse()?),
                None => bail!("unknown config key: {}", other),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse(
            r#"
            [queue]
            processing_ms = 500

            [settings]
            deep_scan = true
            "#,
        )
        .unwrap();

        assert_eq!(config.queue.processing_ms, 500);
        assert_eq!(config.queue.stage_delay_ms, 1000);
        assert_eq!(config.queue.max_finished_entries, 500);
        assert_eq!(config.selection.high_cache_threshold_mb, 100);
        assert_eq!(config.ui.processing_modal_secs, 5);
        assert!(config.settings.deep_scan);
        assert!(config.settings.safe_mode);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/tmp/apps.json"));
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::parse(&text).unwrap();
        assert_eq!(back.catalog.path, config.catalog.path);
        assert_eq!(back.settings, config.settings);
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("processing_ms", "250").unwrap();
        config.set_value("notifications", "false").unwrap();
        config.set_value("clean_interval_hours", "48").unwrap();
        config.set_value("max_cache_size_mb", "10").unwrap();

        assert_eq!(config.queue.processing_ms, 250);
        assert!(!config.settings.notifications);
        assert_eq!(config.settings.clean_interval_hours, 24);
        assert_eq!(config.settings.max_cache_size_mb, 50);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("nope", "1").is_err());
        assert!(config.set_value("processing_ms", "soon").is_err());
        assert!(config.set_value("max_finished_entries", "0").is_err());
        assert_eq!(config.queue.max_finished_entries, 500);
    }
}
