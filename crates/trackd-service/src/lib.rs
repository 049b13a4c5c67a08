//! # trackd-service - Service Lifecycle Management
//!
//! Manages the background tracking service: lifecycle transitions, the
//! persistent notification channel, permission queries, and the command
//! bridge the application layer drives.
//!
//! Depends on [`trackd_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Lifecycle
//! - [`ServiceController`] - Serialized Stopped/Running transitions with
//!   fail-open stop semantics
//! - [`ChannelRegistrar`] - Idempotent notification channel registration
//!
//! ### Permissions
//! - [`PermissionGate`] - Per-call permission snapshots and the
//!   battery-exemption advisory
//!
//! ### Command Bridge
//! - [`CommandBridge`] - Dispatches [`Command`]s, returns [`CommandReply`]s
//! - [`Command`], [`CommandReply`], [`Payload`] - The command surface
//!
//! ### Protocol
//! - [`parse_line()`] - Parse inbound requests and `START`/`STOP` intents
//! - [`format_reply()`], [`format_event()`] - Outbound wire formatting
//!
//! ### Platform
//! - [`PlatformShim`] - Black-box seam over the host OS service runtime
//! - [`NoopShim`] - Trivially-succeeding shim for no-op-capable targets
//!
//! ### Configuration
//! - [`TrackerConfig`] - `.trackd/config.toml` settings with defaults

pub mod bridge;
pub mod config;
pub mod controller;
pub mod permissions;
pub mod platform;
pub mod protocol;
pub mod registrar;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use bridge::{Command, CommandBridge, CommandReply, Payload, DEFAULT_COMMAND_TIMEOUT};
pub use config::TrackerConfig;
pub use controller::ServiceController;
pub use permissions::PermissionGate;
pub use platform::{NoopShim, PlatformShim, ShimResult};
pub use protocol::{format_event, format_reply, parse_line, Inbound, Intent};
pub use registrar::ChannelRegistrar;
/// Re-exported from `trackd_core` for convenience. Canonical import: `trackd_core::ServiceEvent`.
pub use trackd_core::ServiceEvent;
