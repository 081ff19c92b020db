use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application settings, persisted as settings.json.
///
/// Serde defaults keep settings files from older builds loadable when new
/// fields appear.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Publisher page the schedule is scraped from.
    pub schedule_url: String,
    /// Minutes before an event at which the alert window opens.
    #[serde(default = "default_pre_alarm_minutes")]
    pub pre_alarm_minutes: u32,
    /// Normal wait between polling cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Wait after a failed or empty fetch.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Tolerance past the event time before the window closes.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
    /// Sound played when an alert fires.
    pub alert_asset_path: PathBuf,
    /// Playback volume, 0.0 to 1.0.
    #[serde(default = "default_alert_volume")]
    pub alert_volume: f32,
}

fn default_pre_alarm_minutes() -> u32 {
    5
}

fn default_poll_interval_secs() -> u64 {
    8
}

fn default_backoff_secs() -> u64 {
    8
}

fn default_grace_secs() -> u64 {
    60
}

fn default_alert_volume() -> f32 {
    0.85
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule_url: "https://timesprayer.com/en/prayer-times-in-cairo.html".to_string(),
            pre_alarm_minutes: default_pre_alarm_minutes(),
            poll_interval_secs: default_poll_interval_secs(),
            backoff_secs: default_backoff_secs(),
            grace_secs: default_grace_secs(),
            alert_asset_path: PathBuf::from("sound/prayer_notifier.mp3"),
            alert_volume: default_alert_volume(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
