// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The connection engine.
//!
//! [`LightController`] owns the connection lifecycle: it opens the transport
//! on a one-shot connect task, hands the open handle to a long-lived polling
//! loop task, and lets callers enqueue commands and observe events without
//! ever blocking on I/O themselves.

mod poll;
mod slot;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::event::{EventBus, LightEvent};
use crate::transport::{Connect, SerialConnector};
use crate::types::LightCommand;

use slot::CommandSlot;

/// Idle delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Connection phase of the engine.
///
/// `Connecting` closes the window in which a second `connect()` call could
/// open a second transport while the first open is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Disconnected,
    Connecting,
    Connected,
}

/// Mutable engine state, guarded by the inner `RwLock`.
///
/// Every public getter takes a read lock and every mutation a write lock;
/// this is the only path to the shared state. The transport handle itself is
/// not here: it is moved into the polling loop task on connect and owned by
/// that task until teardown.
struct EngineState {
    endpoint: String,
    phase: Phase,
    /// Cooperative cancellation flag for the running polling loop.
    cancel: Option<Arc<AtomicBool>>,
    /// Handle of the running (or last) polling loop task, joinable via
    /// [`LightController::shutdown`].
    loop_task: Option<JoinHandle<()>>,
}

/// State shared between the controller handle, the connect task, and the
/// polling loop task.
pub(crate) struct Inner<C: Connect> {
    connector: C,
    state: RwLock<EngineState>,
    pending: CommandSlot,
    events: EventBus,
    poll_interval: Duration,
}

impl<C: Connect> Inner<C> {
    /// One-shot connect task body.
    async fn establish(self: Arc<Self>) {
        let endpoint = self.state.read().endpoint.clone();

        match self.connector.open(&endpoint).await {
            Ok(transport) => {
                let cancel = Arc::new(AtomicBool::new(false));
                {
                    let mut state = self.state.write();
                    state.phase = Phase::Connected;
                    state.cancel = Some(Arc::clone(&cancel));
                }
                tracing::info!(endpoint = %endpoint, "Connected, starting polling loop");
                self.events.publish(LightEvent::connected());

                let handle = tokio::spawn(poll::run(Arc::clone(&self), transport, cancel));
                self.state.write().loop_task = Some(handle);
            }
            Err(e) => {
                tracing::error!(endpoint = %endpoint, error = %e, "Error connecting");
                self.state.write().phase = Phase::Disconnected;
                self.events.publish(LightEvent::disconnected());
                self.events.publish(LightEvent::ConnectFailed {
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Drives a single light over a byte-oriented serial link.
///
/// The controller never blocks its caller on I/O: [`connect`] and
/// [`disconnect`] return immediately and their outcome is observed through
/// the event stream, [`send_command`] only stores the command for the
/// polling loop to pick up.
///
/// Cloning the controller is cheap and every clone drives the same engine.
///
/// # Examples
///
/// ```no_run
/// use lumicom::{LightCommand, LightController};
///
/// #[tokio::main]
/// async fn main() -> lumicom::Result<()> {
///     let controller = LightController::serial("/dev/ttyUSB0");
///     let mut events = controller.subscribe();
///
///     controller.connect();
///
///     // Wait for the connection before issuing commands.
///     let _ = events.recv().await;
///     if controller.is_connected() {
///         controller.send_command(LightCommand::TurnOn)?;
///     }
///
///     controller.shutdown().await;
///     Ok(())
/// }
/// ```
///
/// [`connect`]: LightController::connect
/// [`disconnect`]: LightController::disconnect
/// [`send_command`]: LightController::send_command
#[derive(Debug)]
pub struct LightController<C: Connect> {
    inner: Arc<Inner<C>>,
}

impl LightController<SerialConnector> {
    /// Creates a controller for a serial port with default settings.
    #[must_use]
    pub fn serial(port: impl Into<String>) -> Self {
        Self::builder(port).build()
    }

    /// Creates a builder for a serial-port controller.
    #[must_use]
    pub fn builder(port: impl Into<String>) -> LightControllerBuilder<SerialConnector> {
        LightControllerBuilder::new(SerialConnector::default(), port)
    }
}

impl<C: Connect> LightController<C> {
    /// Creates a controller with a custom connector.
    #[must_use]
    pub fn with_connector(connector: C, endpoint: impl Into<String>) -> Self {
        LightControllerBuilder::new(connector, endpoint).build()
    }

    /// Starts connecting to the configured endpoint.
    ///
    /// No-op if a connection exists or is being established. Otherwise the
    /// open happens on a background task; the outcome arrives on the event
    /// stream as `ConnectionChanged(true)`, or `ConnectionChanged(false)`
    /// followed by `ConnectFailed`.
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(&self) {
        {
            let mut state = self.inner.state.write();
            if state.phase != Phase::Disconnected {
                tracing::debug!("Already connected, nothing to do");
                return;
            }
            state.phase = Phase::Connecting;
        }

        tracing::debug!("Spawning connect task");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(inner.establish());
    }

    /// Requests a disconnect.
    ///
    /// No-op if not connected. Otherwise the polling loop observes the
    /// cancellation at the top of its next iteration, closes the transport,
    /// and publishes `ConnectionChanged(false)`. This method does not wait
    /// for that teardown; use [`shutdown`](Self::shutdown) to join it.
    pub fn disconnect(&self) {
        let state = self.inner.state.read();
        if state.phase != Phase::Connected {
            tracing::debug!("Already disconnected, nothing to do");
            return;
        }

        tracing::info!("Requesting cancellation of polling loop");
        if let Some(cancel) = &state.cancel {
            cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Disconnects and waits for the polling loop task to finish.
    ///
    /// Unlike [`disconnect`](Self::disconnect) this propagates a panicked
    /// loop task into a log entry instead of losing it.
    pub async fn shutdown(&self) {
        self.disconnect();

        let task = self.inner.state.write().loop_task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Polling loop task failed");
            }
        }
    }

    /// Enqueues a command for the polling loop to transmit.
    ///
    /// At most one command is pending at a time: a newer command silently
    /// replaces an older one that has not been sent yet.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` while no connection exists; there is no
    /// loop to drain the slot, so accepting the command would only leave it
    /// stale.
    pub fn send_command(&self, command: LightCommand) -> Result<()> {
        // The read lock is held across the store so the connected check and
        // the store serialize with the loop's teardown, which clears the
        // slot under the write lock. A command can therefore never land in
        // the slot after teardown emptied it.
        let state = self.inner.state.read();
        if state.phase != Phase::Connected {
            return Err(Error::NotConnected);
        }

        tracing::debug!(command = %command, "Enqueueing command");
        if let Some(displaced) = self.inner.pending.store(command) {
            tracing::debug!(displaced = %displaced, "Replacing pending command");
        }
        Ok(())
    }

    /// Returns `true` iff a transport is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.state.read().phase == Phase::Connected
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.inner.state.read().endpoint.clone()
    }

    /// Changes the endpoint to connect to.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyConnected` unless the controller is fully
    /// disconnected; the endpoint of a live connection cannot change.
    pub fn set_endpoint(&self, endpoint: impl Into<String>) -> Result<()> {
        let mut state = self.inner.state.write();
        if state.phase != Phase::Disconnected {
            return Err(Error::AlreadyConnected);
        }
        state.endpoint = endpoint.into();
        Ok(())
    }

    /// Subscribes to controller events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LightEvent> {
        self.inner.events.subscribe()
    }
}

impl<C: Connect> Clone for LightController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connect> std::fmt::Debug for Inner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Inner")
            .field("endpoint", &state.endpoint)
            .field("phase", &state.phase)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LightController`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lumicom::LightController;
///
/// let controller = LightController::builder("/dev/ttyACM0")
///     .poll_interval(Duration::from_millis(250))
///     .build();
///
/// assert_eq!(controller.endpoint(), "/dev/ttyACM0");
/// ```
#[derive(Debug)]
pub struct LightControllerBuilder<C: Connect> {
    connector: C,
    endpoint: String,
    poll_interval: Duration,
}

impl<C: Connect> LightControllerBuilder<C> {
    fn new(connector: C, endpoint: impl Into<String>) -> Self {
        Self {
            connector,
            endpoint: endpoint.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Replaces the connector, keeping the other settings.
    #[must_use]
    pub fn connector<C2: Connect>(self, connector: C2) -> LightControllerBuilder<C2> {
        LightControllerBuilder {
            connector,
            endpoint: self.endpoint,
            poll_interval: self.poll_interval,
        }
    }

    /// Sets the idle delay between status polls.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builds the controller. Does not connect.
    #[must_use]
    pub fn build(self) -> LightController<C> {
        LightController {
            inner: Arc::new(Inner {
                connector: self.connector,
                state: RwLock::new(EngineState {
                    endpoint: self.endpoint,
                    phase: Phase::Disconnected,
                    cancel: None,
                    loop_task: None,
                }),
                pending: CommandSlot::new(),
                events: EventBus::new(),
                poll_interval: self.poll_interval,
            }),
        }
    }
}
