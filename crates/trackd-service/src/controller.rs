//! Foreground service lifecycle controller
//!
//! Owns the service state and the persistent notification derived from
//! it. All transitions are serialized under one mutex so concurrent
//! Start/Stop requests apply in arrival order and can never leave the
//! state and the notification inconsistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use trackd_core::events::{ServiceStartFailed, ServiceStarted, ServiceStopped};
use trackd_core::prelude::*;
use trackd_core::{ChannelConfig, PersistentNotification, ServiceEvent, ServiceState};

use crate::platform::PlatformShim;
use crate::registrar::ChannelRegistrar;

/// Controls the stopped/running lifecycle of the background service.
///
/// State is owned by the controller instance, not by process-wide
/// globals, so tests can build as many independent controllers as they
/// need. The transition mutex guards `state`; the separate `running`
/// atomic mirrors it for non-blocking queries, maintained inside the
/// transitions (stored with `Release`, read with `Acquire`).
pub struct ServiceController<S> {
    shim: Arc<S>,
    registrar: ChannelRegistrar<S>,
    /// Transition lock. At most one Start/Stop executes at a time;
    /// queued transitions apply in arrival order.
    state: Mutex<ServiceState>,
    /// Mirror of `state` for synchronous `is_running()` checks.
    running: AtomicBool,
    notification: PersistentNotification,
    /// Lifecycle event sink, surfaced by the command loop as protocol
    /// events. Optional: headless library use needs no event stream.
    event_tx: Option<mpsc::Sender<ServiceEvent>>,
}

impl<S: PlatformShim> ServiceController<S> {
    pub fn new(shim: Arc<S>, channel: ChannelConfig, notification: PersistentNotification) -> Self {
        let registrar = ChannelRegistrar::new(Arc::clone(&shim), channel);
        Self {
            shim,
            registrar,
            state: Mutex::new(ServiceState::Stopped),
            running: AtomicBool::new(false),
            notification,
            event_tx: None,
        }
    }

    /// Attach a lifecycle event sink
    pub fn with_events(mut self, event_tx: mpsc::Sender<ServiceEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Start the background service.
    ///
    /// Ensures the notification channel exists, then asks the host
    /// runtime to promote the process with the persistent notification
    /// attached. A rejected promotion (background-start restriction,
    /// missing permission) is reported as [`Error::StartFailed`] and
    /// leaves the state unchanged -- no partial transition.
    ///
    /// Starting while already running re-issues the promotion, so the
    /// notification is re-asserted without duplicating it.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        // Channel registration failure degrades to "no channel metadata";
        // the service still starts. The original platform only has
        // channels on newer OS versions and starts regardless.
        let channel_registered = match self.registrar.register() {
            Ok(()) => true,
            Err(e) => {
                warn!("Proceeding without notification channel: {}", e);
                false
            }
        };

        if let Err(e) = self.shim.promote(&self.notification) {
            let reason = e.to_string();
            error!("Foreground promotion rejected: {}", reason);
            self.emit(ServiceEvent::StartFailed(ServiceStartFailed {
                reason: reason.clone(),
            }));
            return Err(Error::start_failed(reason));
        }

        let was_running = state.is_running();
        *state = ServiceState::Running;
        self.running.store(true, Ordering::Release);

        if was_running {
            debug!("Start while running: persistent notification re-asserted");
        } else {
            info!(
                "Background service running (channel: {})",
                self.registrar.channel().id
            );
        }

        self.emit(ServiceEvent::Started(ServiceStarted {
            channel_id: self.registrar.channel().id.clone(),
            channel_registered,
        }));
        Ok(())
    }

    /// Stop the background service.
    ///
    /// Fail-open: the point of Stop is to free the user from the
    /// persistent notification, so the state is set to Stopped even when
    /// the underlying withdrawal call errors. Stopping an already-stopped
    /// controller is a no-op that still succeeds.
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if !state.is_running() {
            debug!("Stop while stopped: nothing to do");
            return Ok(());
        }

        let withdrawal_failed = match self.shim.demote() {
            Ok(()) => false,
            Err(e) => {
                warn!("Notification withdrawal failed, stopping anyway: {}", e);
                true
            }
        };

        *state = ServiceState::Stopped;
        self.running.store(false, Ordering::Release);
        info!("Background service stopped");

        self.emit(ServiceEvent::Stopped(ServiceStopped { withdrawal_failed }));
        Ok(())
    }

    /// Current state without waiting on an in-flight transition
    pub fn state(&self) -> ServiceState {
        if self.is_running() {
            ServiceState::Running
        } else {
            ServiceState::Stopped
        }
    }

    /// Non-blocking running check backed by the atomic mirror
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The notification posted while running
    pub fn notification(&self) -> &PersistentNotification {
        &self.notification
    }

    /// Transitions must not block on a slow event consumer, so emission
    /// never awaits channel capacity.
    fn emit(&self, event: ServiceEvent) {
        if let Some(tx) = &self.event_tx {
            if let Err(e) = tx.try_send(event) {
                debug!("Dropping lifecycle event: {}", e);
            }
        }
    }
}
