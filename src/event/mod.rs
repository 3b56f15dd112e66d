// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller events and the bus that broadcasts them.

mod event_bus;

pub use event_bus::EventBus;

use crate::types::LightStatus;

/// Events emitted by the controller.
///
/// These notify subscribers about connection lifecycle changes and status
/// updates from the device's status feed. Within one subscription, events
/// arrive in the order the controller published them, so a reconnect is
/// always observed as a connection change before the statuses that follow it.
///
/// # Examples
///
/// ```
/// use lumicom::event::LightEvent;
/// use lumicom::types::LightStatus;
///
/// let connected = LightEvent::connected();
/// assert!(connected.is_connection());
///
/// let update = LightEvent::StatusUpdate { status: LightStatus::On };
/// assert!(!update.is_connection());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightEvent {
    /// The connection state changed.
    ConnectionChanged {
        /// Whether the controller is now connected.
        connected: bool,
        /// Error message if the disconnect was caused by a failure.
        error: Option<String>,
    },

    /// A connection attempt failed; the controller stays disconnected.
    ConnectFailed {
        /// Description of the failure.
        error: String,
    },

    /// The device reported its light state.
    StatusUpdate {
        /// The reported state.
        status: LightStatus,
    },

    /// The device rejected a command frame's magic prefix (answered `403`).
    ///
    /// The command is not retried; the pending slot is already clear when
    /// this event is published.
    CommandRejected,
}

impl LightEvent {
    /// Creates a connected event.
    #[must_use]
    pub fn connected() -> Self {
        Self::ConnectionChanged {
            connected: true,
            error: None,
        }
    }

    /// Creates a clean disconnected event.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::ConnectionChanged {
            connected: false,
            error: None,
        }
    }

    /// Creates a disconnected event caused by an error.
    #[must_use]
    pub fn disconnected_with_error(error: impl Into<String>) -> Self {
        Self::ConnectionChanged {
            connected: false,
            error: Some(error.into()),
        }
    }

    /// Creates a status update event.
    #[must_use]
    pub fn status(status: LightStatus) -> Self {
        Self::StatusUpdate { status }
    }

    /// Returns `true` if this is a connection lifecycle event.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::ConnectionChanged { .. } | Self::ConnectFailed { .. }
        )
    }
}
