//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Service Lifecycle Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to register notification channel: {message}")]
    Registration { message: String },

    #[error("Failed to start foreground service: {reason}")]
    StartFailed { reason: String },

    #[error("Failed to stop foreground service: {message}")]
    StopFailed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Permission/Navigation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Settings surface unavailable: {message}")]
    Navigation { message: String },

    // ─────────────────────────────────────────────────────────────
    // Bridge/Protocol Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Unrecognized command method: {method}")]
    Unimplemented { method: String },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    pub fn start_failed(reason: impl Into<String>) -> Self {
        Self::StartFailed {
            reason: reason.into(),
        }
    }

    pub fn stop_failed(message: impl Into<String>) -> Self {
        Self::StopFailed {
            message: message.into(),
        }
    }

    pub fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation {
            message: message.into(),
        }
    }

    pub fn unimplemented(method: impl Into<String>) -> Self {
        Self::Unimplemented {
            method: method.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors degrade a single command; the controller keeps
    /// serving subsequent commands.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Registration { .. }
                | Error::StartFailed { .. }
                | Error::StopFailed { .. }
                | Error::Navigation { .. }
                | Error::Unimplemented { .. }
                | Error::Protocol { .. }
        )
    }

    /// Check if this error should trigger host-process exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ChannelClosed | Error::ConfigInvalid { .. })
    }

    /// The wire error code reported through the command bridge
    ///
    /// Start/stop/registration failures share `SERVICE_ERROR` so the
    /// application layer can surface them with one guidance path
    /// ("please disable battery optimization").
    pub fn wire_code(&self) -> &'static str {
        match self {
            Error::Registration { .. } | Error::StartFailed { .. } | Error::StopFailed { .. } => {
                "SERVICE_ERROR"
            }
            Error::Navigation { .. } => "NAVIGATION_ERROR",
            Error::Unimplemented { .. } => "UNIMPLEMENTED",
            Error::Protocol { .. } => "PROTOCOL_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::start_failed("background start restriction");
        assert_eq!(
            err.to_string(),
            "Failed to start foreground service: background start restriction"
        );

        let err = Error::registration("notification subsystem unavailable");
        assert!(err.to_string().contains("notification channel"));

        let err = Error::unimplemented("fooBar");
        assert!(err.to_string().contains("fooBar"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::registration("test").is_recoverable());
        assert!(Error::start_failed("test").is_recoverable());
        assert!(Error::stop_failed("test").is_recoverable());
        assert!(Error::navigation("test").is_recoverable());
        assert!(Error::unimplemented("test").is_recoverable());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::ChannelClosed.is_fatal());
        assert!(Error::ConfigInvalid {
            message: "bad importance".to_string()
        }
        .is_fatal());
        assert!(!Error::start_failed("test").is_fatal());
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(Error::start_failed("x").wire_code(), "SERVICE_ERROR");
        assert_eq!(Error::stop_failed("x").wire_code(), "SERVICE_ERROR");
        assert_eq!(Error::registration("x").wire_code(), "SERVICE_ERROR");
        assert_eq!(Error::navigation("x").wire_code(), "NAVIGATION_ERROR");
        assert_eq!(Error::unimplemented("x").wire_code(), "UNIMPLEMENTED");
        assert_eq!(Error::ChannelClosed.wire_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::registration("test");
        let _ = Error::start_failed("test");
        let _ = Error::stop_failed("test");
        let _ = Error::navigation("test");
        let _ = Error::protocol("test");
        let _ = Error::config("test");
        let _ = Error::channel_send("test");
    }
}
