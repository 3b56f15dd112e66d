// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial port transport.
//!
//! The device presents as a USB virtual COM port (or a physical RS-232
//! port). The firmware talks at 9600 baud, 8 data bits, 1 stop bit, no
//! parity, which is what [`SerialConfig::default`] configures.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use super::{Connect, Transport};
use crate::error::ProtocolError;

/// Serial port configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate. The stock firmware runs at 9600.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

/// An open serial connection to the device.
///
/// Reads go through a [`BufReader`] so line reads do not consume bytes one
/// syscall at a time.
pub struct SerialTransport {
    stream: BufReader<SerialStream>,
    port_name: String,
}

impl SerialTransport {
    /// Opens a serial port with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g., `/dev/ttyUSB0` on Linux, `COM3` on
    ///   Windows)
    /// * `config` - Baud rate and line settings
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be opened.
    pub async fn open(port: &str, config: &SerialConfig) -> Result<Self, ProtocolError> {
        tracing::debug!(port = %port, baud_rate = config.baud_rate, "Opening serial port");

        let stream = tokio_serial::new(port, config.baud_rate)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "Failed to open serial port");
                ProtocolError::Serial(e)
            })?;

        tracing::info!(port = %port, baud_rate = config.baud_rate, "Serial port opened");

        Ok(Self {
            stream: BufReader::new(stream),
            port_name: port.to_string(),
        })
    }

    /// Returns the name of the open port.
    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        tracing::trace!(port = %self.port_name, bytes = frame.len(), data = ?frame, "Writing frame");

        let stream = self.stream.get_mut();
        stream.write_all(frame).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, ProtocolError> {
        let mut buf = Vec::new();
        let n = self.stream.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Err(ProtocolError::ConnectionFailed(format!(
                "serial port {} closed while waiting for a line",
                self.port_name
            )));
        }

        // Strip the delimiter and a CR if the firmware sent CRLF.
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        let line = String::from_utf8_lossy(&buf).into_owned();
        tracing::trace!(port = %self.port_name, line = %line, "Read line");
        Ok(line)
    }

    async fn read_byte(&mut self) -> Result<u8, ProtocolError> {
        let byte = self.stream.read_u8().await?;
        tracing::trace!(port = %self.port_name, byte = byte, "Read byte");
        Ok(byte)
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        tracing::debug!(port = %self.port_name, "Closing serial port");
        self.stream.get_mut().flush().await?;
        Ok(())
    }
}

/// Opens [`SerialTransport`] connections with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    /// Creates a connector with the given serial configuration.
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connect for SerialConnector {
    type Transport = SerialTransport;

    async fn open(&self, endpoint: &str) -> Result<SerialTransport, ProtocolError> {
        SerialTransport::open(endpoint, &self.config).await
    }
}
