use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const INTERVAL_HOURS_RANGE: (u32, u32) = (1, 24);
pub const MAX_CACHE_RANGE: (u32, u32) = (50, 500);
pub const MAX_CACHE_STEP: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    AutoClean,
    AutoConnectAdb,
    AutoKillApps,
    SafeMode,
    DeepScan,
    LowBatteryMode,
    Notifications,
    DebugMode,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::AutoClean,
        SettingKey::AutoConnectAdb,
        SettingKey::AutoKillApps,
        SettingKey::SafeMode,
        SettingKey::DeepScan,
        SettingKey::LowBatteryMode,
        SettingKey::Notifications,
        SettingKey::DebugMode,
    ];

    pub fn config_key(self) -> &'static str {
        match self {
            SettingKey::AutoClean => "auto_clean",
            SettingKey::AutoConnectAdb => "auto_connect_adb",
            SettingKey::AutoKillApps => "auto_kill_apps",
            SettingKey::SafeMode => "safe_mode",
            SettingKey::DeepScan => "deep_scan",
            SettingKey::LowBatteryMode => "low_battery_mode",
            SettingKey::Notifications => "notifications",
            SettingKey::DebugMode => "debug_mode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingKey::AutoClean => "Automatic cleaning",
            SettingKey::AutoConnectAdb => "Auto-connect ADB",
            SettingKey::AutoKillApps => "Auto-kill background apps",
            SettingKey::SafeMode => "Safe mode",
            SettingKey::DeepScan => "Deep scan",
            SettingKey::LowBatteryMode => "Low battery mode",
            SettingKey::Notifications => "Notifications",
            SettingKey::DebugMode => "Debug mode",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingKey::AutoClean => "Run cleanups on the configured interval",
            SettingKey::AutoConnectAdb => "Reconnect to the device on startup",
            SettingKey::AutoKillApps => "Stop idle apps automatically",
            SettingKey::SafeMode => "Skip system apps",
            SettingKey::DeepScan => "Include app data folders when scanning",
            SettingKey::LowBatteryMode => "Pause work below 20% battery",
            SettingKey::Notifications => "Notify when a cleanup finishes",
            SettingKey::DebugMode => "Show raw adb output",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        SettingKey::ALL.into_iter().find(|k| k.config_key() == key)
    }
}

/// Local dashboard preferences. None of them change queue behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub auto_clean: bool,
    #[serde(default = "default_true")]
    pub auto_connect_adb: bool,
    #[serde(default)]
    pub auto_kill_apps: bool,
    #[serde(default = "default_true")]
    pub safe_mode: bool,
    #[serde(default)]
    pub deep_scan: bool,
    #[serde(default)]
    pub low_battery_mode: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_interval")]
    pub clean_interval_hours: u32,
    #[serde(default = "default_max_cache")]
    pub max_cache_size_mb: u32,
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u32 {
    6
}

fn default_max_cache() -> u32 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_clean: true,
            auto_connect_adb: true,
            auto_kill_apps: false,
            safe_mode: true,
            deep_scan: false,
            low_battery_mode: false,
            notifications: true,
            debug_mode: false,
            clean_interval_hours: default_interval(),
            max_cache_size_mb: default_max_cache(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsExport<'a> {
    settings: &'a Settings,
    export_date: String,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::AutoClean => self.auto_clean,
            SettingKey::AutoConnectAdb => self.auto_connect_adb,
            SettingKey::AutoKillApps => self.auto_kill_apps,
            SettingKey::SafeMode => self.safe_mode,
            SettingKey::DeepScan => self.deep_scan,
            SettingKey::LowBatteryMode => self.low_battery_mode,
            SettingKey::Notifications => self.notifications,
            SettingKey::DebugMode => self.debug_mode,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        let slot = match key {
            SettingKey::AutoClean => &mut self.auto_clean,
            SettingKey::AutoConnectAdb => &mut self.auto_connect_adb,
            SettingKey::AutoKillApps => &mut self.auto_kill_apps,
            SettingKey::SafeMode => &mut self.safe_mode,
            SettingKey::DeepScan => &mut self.deep_scan,
            SettingKey::LowBatteryMode => &mut self.low_battery_mode,
            SettingKey::Notifications => &mut self.notifications,
            SettingKey::DebugMode => &mut self.debug_mode,
        };
        *slot = value;
    }

    pub fn toggle(&mut self, key: SettingKey) {
        self.set(key, !self.get(key));
    }

    pub fn set_interval(&mut self, hours: i64) {
        let (min, max) = INTERVAL_HOURS_RANGE;
        self.clean_interval_hours = hours.clamp(min as i64, max as i64) as u32;
    }

    pub fn set_max_cache(&mut self, mb: i64) {
        let (min, max) = MAX_CACHE_RANGE;
        self.max_cache_size_mb = mb.clamp(min as i64, max as i64) as u32;
    }

    /// Moves the interval by `delta` hours, clamped to 1..=24.
    pub fn step_interval(&mut self, delta: i32) {
        self.set_interval(self.clean_interval_hours as i64 + delta as i64);
    }

    /// Moves the cache limit by `steps` slider notches, clamped to 50..=500.
    pub fn step_max_cache(&mut self, steps: i32) {
        self.set_max_cache(self.max_cache_size_mb as i64 + steps as i64 * MAX_CACHE_STEP as i64);
    }

    pub fn reset(&mut self) {
        *self = Settings::default();
    }

    pub fn export_json(&self) -> Result<String> {
        let export = SettingsExport {
            settings: self,
            export_date: Utc::now().to_rfc3339(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}
