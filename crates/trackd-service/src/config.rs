//! Settings parser for .trackd/config.toml

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use trackd_core::prelude::*;
use trackd_core::{ChannelConfig, Importance, PersistentNotification};

const CONFIG_FILENAME: &str = "config.toml";
const TRACKD_DIR: &str = ".trackd";

/// Application settings (.trackd/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub channel: ChannelSettings,

    #[serde(default)]
    pub notification: NotificationSettings,

    #[serde(default)]
    pub service: ServiceSettings,
}

/// Notification channel settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelSettings {
    #[serde(default = "default_channel_id")]
    pub id: String,

    #[serde(default = "default_channel_name")]
    pub name: String,

    #[serde(default = "default_channel_description")]
    pub description: String,

    #[serde(default)]
    pub importance: Importance,

    #[serde(default)]
    pub show_badge: bool,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            id: default_channel_id(),
            name: default_channel_name(),
            description: default_channel_description(),
            importance: Importance::Low,
            show_badge: false,
        }
    }
}

fn default_channel_id() -> String {
    "location_tracker".to_string()
}

fn default_channel_name() -> String {
    "Location Tracker".to_string()
}

fn default_channel_description() -> String {
    "Background location tracking service".to_string()
}

/// Persistent notification text
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_notification_title")]
    pub title: String,

    #[serde(default = "default_notification_body")]
    pub body: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            title: default_notification_title(),
            body: default_notification_body(),
        }
    }
}

fn default_notification_title() -> String {
    "Location Tracking".to_string()
}

fn default_notification_body() -> String {
    "Tracking your location in background".to_string()
}

/// Service behavior settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    /// Bound on a single start/stop round trip, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

fn default_command_timeout_secs() -> u64 {
    10
}

impl TrackerConfig {
    /// Load settings from `<dir>/.trackd/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(TRACKD_DIR).join(CONFIG_FILENAME);
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Load settings from an explicit file path; the file must exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;

        let config: TrackerConfig = toml::from_str(&content).map_err(|e| Error::ConfigInvalid {
            message: format!("{}: {}", path.display(), e),
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The immutable channel value used for registration
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            id: self.channel.id.clone(),
            display_name: self.channel.name.clone(),
            importance: self.channel.importance,
            description: self.channel.description.clone(),
            show_badge: self.channel.show_badge,
        }
    }

    /// The notification posted while the service runs
    pub fn persistent_notification(&self) -> PersistentNotification {
        PersistentNotification::for_channel(
            &self.channel_config(),
            &self.notification.title,
            &self.notification.body,
        )
    }

    /// Bound on a single start/stop round trip
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.service.command_timeout_secs)
    }
}
