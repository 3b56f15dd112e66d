// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lumicom` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! transport communication, wire decoding, and controller state misuse.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when driving
/// a light over its serial link.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred on the transport or wire protocol.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a byte read from the device.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The controller is not connected.
    #[error("controller is not connected")]
    NotConnected,

    /// The operation requires a disconnected controller.
    #[error("controller is already connected")]
    AlreadyConnected,
}

/// Errors related to transport communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Opening or configuring the serial port failed.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// An I/O operation on the open transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The device answered `403`: it rejected the frame's magic prefix.
    #[error("device rejected the command frame prefix")]
    PrefixRejected,
}

/// Errors related to decoding device bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A status byte outside the defined set was received.
    #[error("invalid status byte: {0:#04x}")]
    InvalidStatusByte(u8),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::InvalidStatusByte(0x07);
        assert_eq!(err.to_string(), "invalid status byte: 0x07");
    }

    #[test]
    fn error_from_decode_error() {
        let err: Error = DecodeError::InvalidStatusByte(0).into();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::InvalidStatusByte(0))
        ));
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::ConnectionFailed("device absent".to_string());
        assert_eq!(err.to_string(), "connection failed: device absent");

        assert_eq!(
            ProtocolError::PrefixRejected.to_string(),
            "device rejected the command frame prefix"
        );
    }

    #[test]
    fn not_connected_display() {
        assert_eq!(
            Error::NotConnected.to_string(),
            "controller is not connected"
        );
    }
}
