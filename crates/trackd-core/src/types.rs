//! Core domain types for the tracking service lifecycle

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Service State
// ─────────────────────────────────────────────────────────

/// Lifecycle state of the background tracking service
///
/// A controller always begins at `Stopped`; the state is never persisted
/// across host-process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[default]
    Stopped,
    Running,
}

impl ServiceState {
    pub fn is_running(&self) -> bool {
        matches!(self, ServiceState::Running)
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Stopped => write!(f, "stopped"),
            ServiceState::Running => write!(f, "running"),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Notification Channel
// ─────────────────────────────────────────────────────────

/// Notification channel importance level
///
/// Maps onto the platform's importance scale. The tracking channel uses
/// `Low` so the persistent notification never alerts audibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[default]
    Low,
    Default,
    High,
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Importance::Low => write!(f, "low"),
            Importance::Default => write!(f, "default"),
            Importance::High => write!(f, "high"),
        }
    }
}

/// Immutable notification channel metadata
///
/// Created once at startup configuration time. Registration is idempotent
/// by `id`: re-registering updates metadata without duplicating channels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub id: String,
    pub display_name: String,
    pub importance: Importance,
    pub description: String,
    pub show_badge: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: "location_tracker".to_string(),
            display_name: "Location Tracker".to_string(),
            importance: Importance::Low,
            description: "Background location tracking service".to_string(),
            show_badge: false,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Persistent Notification
// ─────────────────────────────────────────────────────────

/// The ongoing notification that accompanies the running service
///
/// Exists only while the service is `Running`; its lifetime is entirely
/// governed by the service state. Always ongoing (non-dismissible) and
/// silent (alerts at most once).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentNotification {
    pub title: String,
    pub body: String,
    pub channel_id: String,
    pub ongoing: bool,
    pub silent: bool,
}

impl PersistentNotification {
    /// Build the notification for a channel with the given text
    pub fn for_channel(
        channel: &ChannelConfig,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            channel_id: channel.id.clone(),
            ongoing: true,
            silent: true,
        }
    }
}

impl Default for PersistentNotification {
    fn default() -> Self {
        Self::for_channel(
            &ChannelConfig::default(),
            "Location Tracking",
            "Tracking your location in background",
        )
    }
}

// ─────────────────────────────────────────────────────────
// Permission Snapshot
// ─────────────────────────────────────────────────────────

/// Point-in-time view of the location permissions
///
/// Ephemeral and read-only: a new snapshot is computed per query, never
/// cached, since permissions can change between calls (the user can
/// revoke in system settings while the app is backgrounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSnapshot {
    pub foreground_granted: bool,
    pub background_granted: bool,
}

impl PermissionSnapshot {
    pub fn new(foreground_granted: bool, background_granted: bool) -> Self {
        Self {
            foreground_granted,
            background_granted,
        }
    }

    /// True iff both foreground and background location access are granted
    pub fn granted(&self) -> bool {
        self.foreground_granted && self.background_granted
    }
}
