//! Test utilities for service types
//!
//! Provides a scripted platform shim that records every call and can be
//! told to fail specific operations.

use std::io;
use std::sync::Mutex;

use trackd_core::{ChannelConfig, PermissionSnapshot, PersistentNotification};

use crate::platform::{PlatformShim, ShimResult};

/// One recorded shim invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimCall {
    /// Channel registration, tagged with the channel id
    CreateChannel(String),
    /// Foreground promotion, tagged with the notification's channel id
    Promote(String),
    Demote,
    OpenBatterySettings,
}

#[derive(Default)]
struct Failures {
    create_channel: Option<String>,
    promote: Option<String>,
    demote: Option<String>,
    battery_settings: Option<String>,
}

/// Scripted in-memory platform shim
///
/// Defaults to every call succeeding and both permissions denied.
#[derive(Default)]
pub struct FakeShim {
    calls: Mutex<Vec<ShimCall>>,
    failures: Mutex<Failures>,
    permissions: Mutex<PermissionSnapshot>,
}

impl FakeShim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything the controller asked the host runtime to do, in order
    pub fn calls(&self) -> Vec<ShimCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn promote_count(&self) -> usize {
        self.count(|c| matches!(c, ShimCall::Promote(_)))
    }

    pub fn demote_count(&self) -> usize {
        self.count(|c| matches!(c, ShimCall::Demote))
    }

    pub fn battery_settings_count(&self) -> usize {
        self.count(|c| matches!(c, ShimCall::OpenBatterySettings))
    }

    fn count(&self, predicate: impl Fn(&ShimCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|&c| predicate(c))
            .count()
    }

    /// Make subsequent channel registrations fail with the given reason
    pub fn fail_create_channel(&self, reason: &str) {
        self.failures.lock().unwrap().create_channel = Some(reason.to_string());
    }

    /// Make subsequent promotions fail with the given reason
    pub fn fail_promote(&self, reason: &str) {
        self.failures.lock().unwrap().promote = Some(reason.to_string());
    }

    /// Make subsequent demotions fail with the given reason
    pub fn fail_demote(&self, reason: &str) {
        self.failures.lock().unwrap().demote = Some(reason.to_string());
    }

    /// Make subsequent settings navigation fail with the given reason
    pub fn fail_battery_settings(&self, reason: &str) {
        self.failures.lock().unwrap().battery_settings = Some(reason.to_string());
    }

    /// Set the permission state reported by subsequent queries
    pub fn set_permissions(&self, snapshot: PermissionSnapshot) {
        *self.permissions.lock().unwrap() = snapshot;
    }

    fn record(&self, call: ShimCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(reason: &Option<String>) -> ShimResult {
        match reason {
            Some(message) => Err(io::Error::other(message.clone())),
            None => Ok(()),
        }
    }
}

impl PlatformShim for FakeShim {
    fn create_channel(&self, channel: &ChannelConfig) -> ShimResult {
        let outcome = Self::failure(&self.failures.lock().unwrap().create_channel);
        if outcome.is_ok() {
            self.record(ShimCall::CreateChannel(channel.id.clone()));
        }
        outcome
    }

    fn promote(&self, notification: &PersistentNotification) -> ShimResult {
        let outcome = Self::failure(&self.failures.lock().unwrap().promote);
        if outcome.is_ok() {
            self.record(ShimCall::Promote(notification.channel_id.clone()));
        }
        outcome
    }

    fn demote(&self) -> ShimResult {
        let outcome = Self::failure(&self.failures.lock().unwrap().demote);
        if outcome.is_ok() {
            self.record(ShimCall::Demote);
        }
        outcome
    }

    fn permissions(&self) -> PermissionSnapshot {
        *self.permissions.lock().unwrap()
    }

    fn open_battery_settings(&self) -> ShimResult {
        let outcome = Self::failure(&self.failures.lock().unwrap().battery_settings);
        if outcome.is_ok() {
            self.record(ShimCall::OpenBatterySettings);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_shim_records_calls_in_order() {
        let shim = FakeShim::new();

        shim.create_channel(&ChannelConfig::default()).unwrap();
        shim.promote(&PersistentNotification::default()).unwrap();
        shim.demote().unwrap();

        assert_eq!(
            shim.calls(),
            vec![
                ShimCall::CreateChannel("location_tracker".to_string()),
                ShimCall::Promote("location_tracker".to_string()),
                ShimCall::Demote,
            ]
        );
    }

    #[test]
    fn test_fake_shim_failure_injection() {
        let shim = FakeShim::new();
        shim.fail_promote("nope");

        let err = shim.promote(&PersistentNotification::default()).unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert_eq!(shim.promote_count(), 0);
    }

    #[test]
    fn test_fake_shim_permissions_default_denied() {
        let shim = FakeShim::new();
        assert!(!shim.permissions().granted());

        shim.set_permissions(PermissionSnapshot::new(true, true));
        assert!(shim.permissions().granted());
    }
}
