//! Domain event definitions

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Event Structs
// ─────────────────────────────────────────────────────────

/// Service entered the running state
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStarted {
    /// Channel id the persistent notification was posted on
    pub channel_id: String,
    /// False when channel registration failed and the service degraded to
    /// running without channel metadata
    pub channel_registered: bool,
}

/// A start transition was rejected by the host runtime
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStartFailed {
    pub reason: String,
}

/// Service returned to the stopped state
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStopped {
    /// True when the notification withdrawal call errored and Stop
    /// proceeded fail-open
    #[serde(default)]
    pub withdrawal_failed: bool,
}

// ─────────────────────────────────────────────────────────
// ServiceEvent Enum
// ─────────────────────────────────────────────────────────

/// Lifecycle events emitted by the controller
///
/// Consumed by the command loop, which surfaces them as unsolicited
/// protocol events on stdout.
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    Started(ServiceStarted),
    StartFailed(ServiceStartFailed),
    Stopped(ServiceStopped),
}

impl ServiceEvent {
    /// Wire event name for the machine protocol
    pub fn name(&self) -> &'static str {
        match self {
            ServiceEvent::Started(_) => "service.started",
            ServiceEvent::StartFailed(_) => "service.startFailed",
            ServiceEvent::Stopped(_) => "service.stopped",
        }
    }

    /// Wire event parameters
    pub fn params(&self) -> serde_json::Value {
        match self {
            ServiceEvent::Started(e) => serde_json::to_value(e),
            ServiceEvent::StartFailed(e) => serde_json::to_value(e),
            ServiceEvent::Stopped(e) => serde_json::to_value(e),
        }
        .unwrap_or(serde_json::Value::Null)
    }

    /// Check if this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, ServiceEvent::StartFailed(_))
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        match self {
            ServiceEvent::Started(e) => {
                format!("Service started (channel: {})", e.channel_id)
            }
            ServiceEvent::StartFailed(e) => format!("Service start failed: {}", e.reason),
            ServiceEvent::Stopped(e) => {
                if e.withdrawal_failed {
                    "Service stopped (notification withdrawal failed)".to_string()
                } else {
                    "Service stopped".to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let started = ServiceEvent::Started(ServiceStarted {
            channel_id: "location_tracker".to_string(),
            channel_registered: true,
        });
        assert_eq!(started.name(), "service.started");

        let failed = ServiceEvent::StartFailed(ServiceStartFailed {
            reason: "restricted".to_string(),
        });
        assert_eq!(failed.name(), "service.startFailed");

        let stopped = ServiceEvent::Stopped(ServiceStopped {
            withdrawal_failed: false,
        });
        assert_eq!(stopped.name(), "service.stopped");
    }

    #[test]
    fn test_event_params_camel_case() {
        let started = ServiceEvent::Started(ServiceStarted {
            channel_id: "location_tracker".to_string(),
            channel_registered: false,
        });

        let params = started.params();
        assert_eq!(params["channelId"], "location_tracker");
        assert_eq!(params["channelRegistered"], false);
    }

    #[test]
    fn test_is_error() {
        let failed = ServiceEvent::StartFailed(ServiceStartFailed {
            reason: "restricted".to_string(),
        });
        assert!(failed.is_error());

        let stopped = ServiceEvent::Stopped(ServiceStopped {
            withdrawal_failed: true,
        });
        assert!(!stopped.is_error());
    }

    #[test]
    fn test_summary_mentions_reason() {
        let failed = ServiceEvent::StartFailed(ServiceStartFailed {
            reason: "background-start restriction".to_string(),
        });
        assert!(failed.summary().contains("background-start restriction"));
    }
}
