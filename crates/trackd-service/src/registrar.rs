//! Notification channel registration
//!
//! The channel must exist before any notification tagged with it can be
//! shown. Registration is idempotent by channel id and safe to repeat on
//! every start.

use std::sync::Arc;

use trackd_core::prelude::*;
use trackd_core::ChannelConfig;

use crate::platform::PlatformShim;

/// Idempotently registers the notification channel with the host runtime
pub struct ChannelRegistrar<S> {
    shim: Arc<S>,
    channel: ChannelConfig,
}

impl<S: PlatformShim> ChannelRegistrar<S> {
    pub fn new(shim: Arc<S>, channel: ChannelConfig) -> Self {
        Self { shim, channel }
    }

    /// The channel metadata this registrar manages
    pub fn channel(&self) -> &ChannelConfig {
        &self.channel
    }

    /// Register the channel, updating metadata if it already exists
    ///
    /// Failure means the notification subsystem is unavailable. Callers
    /// must treat it as "cannot show persistent notification", not as a
    /// process-fatal condition.
    pub fn register(&self) -> Result<()> {
        if self.channel.id.is_empty() {
            return Err(Error::registration("channel id must be non-empty"));
        }

        self.shim
            .create_channel(&self.channel)
            .map_err(|e| Error::registration(e.to_string()))?;

        debug!(
            "Notification channel '{}' registered ({} importance)",
            self.channel.id, self.channel.importance
        );
        Ok(())
    }
}
