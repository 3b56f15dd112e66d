// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction over the byte-oriented link to the device.
//!
//! The controller is generic over a [`Connect`] implementation, which opens
//! a [`Transport`] for a named endpoint. In production this is a serial port
//! ([`SerialConnector`]); tests inject scripted transports instead.

mod serial;

pub use serial::{SerialConfig, SerialConnector, SerialTransport};

use async_trait::async_trait;

use crate::error::ProtocolError;

/// An open duplex byte stream to the device.
///
/// Exactly one task owns a transport at a time; the controller moves it into
/// the polling loop on a successful connect.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Writes a complete wire frame and flushes it.
    ///
    /// # Errors
    ///
    /// Returns error if the write or flush fails.
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError>;

    /// Reads one ASCII line, blocking until the `\n` delimiter.
    ///
    /// The returned string does not include the delimiter.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails or the link closes mid-line.
    async fn read_line(&mut self) -> Result<String, ProtocolError>;

    /// Reads exactly one byte, blocking until it arrives.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn read_byte(&mut self) -> Result<u8, ProtocolError>;

    /// Closes the transport, flushing pending output.
    ///
    /// # Errors
    ///
    /// Returns error if the flush fails; the handle is unusable afterwards
    /// either way.
    async fn close(&mut self) -> Result<(), ProtocolError>;
}

/// Opens transports for a named endpoint.
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    /// The transport type this connector produces.
    type Transport: Transport;

    /// Opens a transport at the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint cannot be opened (bad name, device
    /// absent, permissions).
    async fn open(&self, endpoint: &str) -> Result<Self::Transport, ProtocolError>;
}
