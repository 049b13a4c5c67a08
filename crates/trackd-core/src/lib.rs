//! # trackd-core - Core Domain Types
//!
//! Foundation crate for trackerd. Provides domain types, error handling,
//! and lifecycle event definitions for the background tracking service.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ServiceState`] - Lifecycle state of the background service (Stopped, Running)
//! - [`ChannelConfig`] - Immutable notification channel metadata
//! - [`PersistentNotification`] - The ongoing notification shown while running
//! - [`PermissionSnapshot`] - Point-in-time location permission state
//! - [`Importance`] - Notification channel importance level
//!
//! ### Events (`events`)
//! - [`ServiceEvent`] - Lifecycle events (started, startFailed, stopped)
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use trackd_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all trackerd crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{ServiceEvent, ServiceStartFailed, ServiceStarted, ServiceStopped};
pub use types::{
    ChannelConfig, Importance, PermissionSnapshot, PersistentNotification, ServiceState,
};
