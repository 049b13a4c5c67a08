//! Location permission queries and the battery-exemption advisory
//!
//! Permission checks are pure reads: a fresh snapshot per call, no
//! caching, no prompting, no state mutation.

use std::sync::Arc;

use trackd_core::prelude::*;
use trackd_core::PermissionSnapshot;

use crate::platform::PlatformShim;

/// Read-only gate over the host's location permission state
pub struct PermissionGate<S> {
    shim: Arc<S>,
}

impl<S: PlatformShim> PermissionGate<S> {
    pub fn new(shim: Arc<S>) -> Self {
        Self { shim }
    }

    /// Compute a fresh permission snapshot
    ///
    /// Synchronous and side-effect free. Never cached: the user can
    /// revoke permissions in system settings between calls.
    pub fn check(&self) -> PermissionSnapshot {
        let snapshot = self.shim.permissions();
        trace!(
            "Permission snapshot: foreground={} background={}",
            snapshot.foreground_granted,
            snapshot.background_granted
        );
        snapshot
    }

    /// Open the OS battery-optimization settings surface
    ///
    /// Advisory hand-off only: it neither grants nor denies anything and
    /// must not assume a particular outcome. An unavailable settings
    /// surface is reported as [`Error::Navigation`], never propagated as
    /// an unhandled fault.
    pub fn request_battery_exemption(&self) -> Result<()> {
        self.shim.open_battery_settings().map_err(|e| {
            warn!("Battery settings surface unavailable: {}", e);
            Error::navigation(e.to_string())
        })?;

        info!("Opened battery-optimization settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeShim;

    #[test]
    fn test_check_reflects_shim_state() {
        let shim = Arc::new(FakeShim::new());
        let gate = PermissionGate::new(shim.clone());

        assert!(!gate.check().granted());

        shim.set_permissions(PermissionSnapshot::new(true, true));
        assert!(gate.check().granted());
    }

    #[test]
    fn test_check_is_never_cached() {
        let shim = Arc::new(FakeShim::new());
        let gate = PermissionGate::new(shim.clone());

        shim.set_permissions(PermissionSnapshot::new(true, false));
        let first = gate.check();

        // Revocation between calls must be visible immediately.
        shim.set_permissions(PermissionSnapshot::new(false, false));
        let second = gate.check();

        assert!(first.foreground_granted);
        assert!(!second.foreground_granted);
    }

    #[test]
    fn test_consecutive_checks_identical_without_change() {
        let shim = Arc::new(FakeShim::new());
        let gate = PermissionGate::new(shim);

        assert_eq!(gate.check(), gate.check());
    }

    #[test]
    fn test_battery_exemption_success() {
        let shim = Arc::new(FakeShim::new());
        let gate = PermissionGate::new(shim.clone());

        gate.request_battery_exemption().unwrap();
        assert_eq!(shim.battery_settings_count(), 1);
    }

    #[test]
    fn test_battery_exemption_maps_to_navigation_error() {
        let shim = Arc::new(FakeShim::new());
        shim.fail_battery_settings("no such settings surface");
        let gate = PermissionGate::new(shim);

        let err = gate.request_battery_exemption().unwrap_err();
        assert!(matches!(err, Error::Navigation { .. }));
        assert!(err.is_recoverable());
    }
}
