//! Command bridge between the application layer and the service
//!
//! Translates incoming commands into controller/gate calls and converts
//! every outcome into a structured reply. Dispatch is synchronous from
//! the caller's point of view: one command in, one terminal result out,
//! under a bounded timeout.

use std::sync::Arc;
use std::time::Duration;

use trackd_core::prelude::*;
use trackd_core::PermissionSnapshot;

use crate::controller::ServiceController;
use crate::permissions::PermissionGate;
use crate::platform::PlatformShim;

/// Default bound on a single Start/Stop round trip
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Commands accepted from the application layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the background service
    Start,
    /// Stop the background service
    Stop,
    /// Query the current location permission state
    CheckPermissions,
    /// Open the battery-optimization settings surface
    RequestBatteryExemption,
}

impl Command {
    /// Wire method name as invoked by the application layer
    pub fn method(&self) -> &'static str {
        match self {
            Command::Start => "startBackgroundService",
            Command::Stop => "stopBackgroundService",
            Command::CheckPermissions => "checkLocationPermissions",
            Command::RequestBatteryExemption => "openBatteryOptimizationSettings",
        }
    }

    /// Resolve a wire method name; `None` signals a protocol/version skew
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "startBackgroundService" => Some(Command::Start),
            "stopBackgroundService" => Some(Command::Stop),
            "checkLocationPermissions" => Some(Command::CheckPermissions),
            "openBatteryOptimizationSettings" => Some(Command::RequestBatteryExemption),
            _ => None,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "start background service",
            Command::Stop => "stop background service",
            Command::CheckPermissions => "check location permissions",
            Command::RequestBatteryExemption => "open battery settings",
        }
    }
}

/// Successful dispatch payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Unit,
    /// Acknowledgement with no result value (fire-and-forget navigation)
    Null,
    Permissions(PermissionSnapshot),
}

/// Terminal outcome of a dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Success { payload: Payload },
    Error { kind: &'static str, message: String },
    Unimplemented { method: String },
}

impl CommandReply {
    /// Create a unit success reply
    pub fn ok() -> Self {
        Self::Success {
            payload: Payload::Unit,
        }
    }

    /// Create a null acknowledgement reply
    pub fn acknowledged() -> Self {
        Self::Success {
            payload: Payload::Null,
        }
    }

    /// Create a permission-snapshot success reply
    pub fn permissions(snapshot: PermissionSnapshot) -> Self {
        Self::Success {
            payload: Payload::Permissions(snapshot),
        }
    }

    /// Wrap a typed error into an error reply
    pub fn from_error(error: &Error) -> Self {
        Self::Error {
            kind: error.wire_code(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandReply::Success { .. })
    }
}

/// Dispatches commands onto the controller and permission gate
pub struct CommandBridge<S> {
    controller: Arc<ServiceController<S>>,
    gate: PermissionGate<S>,
    command_timeout: Duration,
}

impl<S: PlatformShim> CommandBridge<S> {
    pub fn new(controller: Arc<ServiceController<S>>, gate: PermissionGate<S>) -> Self {
        Self {
            controller,
            gate,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override the Start/Stop round-trip bound
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// The controller this bridge drives
    pub fn controller(&self) -> &Arc<ServiceController<S>> {
        &self.controller
    }

    /// Dispatch a wire method by name
    ///
    /// Unrecognized methods yield a distinguished `Unimplemented` reply
    /// so the application layer can detect version skew immediately.
    pub async fn dispatch_method(&self, method: &str) -> CommandReply {
        match Command::from_method(method) {
            Some(command) => self.dispatch(command).await,
            None => {
                warn!("Unrecognized command method: {}", method);
                CommandReply::Unimplemented {
                    method: method.to_string(),
                }
            }
        }
    }

    /// Dispatch a command and wait for its terminal outcome
    pub async fn dispatch(&self, command: Command) -> CommandReply {
        debug!("Dispatching: {}", command.description());

        match command {
            Command::Start => {
                let result =
                    tokio::time::timeout(self.command_timeout, self.controller.start()).await;
                match result {
                    Ok(Ok(())) => CommandReply::ok(),
                    Ok(Err(e)) => CommandReply::from_error(&e),
                    Err(_) => CommandReply::from_error(&Error::start_failed(format!(
                        "timed out after {:?}",
                        self.command_timeout
                    ))),
                }
            }
            Command::Stop => {
                let result =
                    tokio::time::timeout(self.command_timeout, self.controller.stop()).await;
                match result {
                    Ok(Ok(())) => CommandReply::ok(),
                    Ok(Err(e)) => CommandReply::from_error(&e),
                    Err(_) => CommandReply::from_error(&Error::stop_failed(format!(
                        "timed out after {:?}",
                        self.command_timeout
                    ))),
                }
            }
            // Pure read: never touches the transition lock, never blocks.
            Command::CheckPermissions => CommandReply::permissions(self.gate.check()),
            Command::RequestBatteryExemption => match self.gate.request_battery_exemption() {
                Ok(()) => CommandReply::acknowledged(),
                Err(e) => CommandReply::from_error(&e),
            },
        }
    }
}
