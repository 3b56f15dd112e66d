// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted in-memory transport for integration tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use lumicom::error::ProtocolError;
use lumicom::event::LightEvent;
use lumicom::transport::{Connect, Transport};

/// Shared script and recording for a mock link.
#[derive(Debug)]
pub struct MockState {
    /// When `true`, `open` fails.
    pub fail_open: AtomicBool,
    /// Number of `open` calls observed.
    pub open_count: AtomicUsize,
    /// Number of `close` calls observed.
    pub close_count: AtomicUsize,
    /// Frames written by the controller, in order.
    pub written: Mutex<Vec<Vec<u8>>>,
    /// Scripted status bytes, consumed front to back.
    pub status_bytes: Mutex<VecDeque<u8>>,
    /// Scripted acknowledgement lines, consumed front to back.
    pub acks: Mutex<VecDeque<String>>,
    /// Status byte repeated once the script runs out. `None` makes further
    /// status reads block forever, like a silent device.
    pub idle_status: Mutex<Option<u8>>,
    /// Error injected into the next status read, once.
    pub read_error: Mutex<Option<String>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            fail_open: AtomicBool::new(false),
            open_count: AtomicUsize::new(0),
            close_count: AtomicUsize::new(0),
            written: Mutex::new(Vec::new()),
            status_bytes: Mutex::new(VecDeque::new()),
            acks: Mutex::new(VecDeque::new()),
            idle_status: Mutex::new(Some(1)),
            read_error: Mutex::new(None),
        }
    }
}

impl MockState {
    pub fn push_status(&self, byte: u8) {
        self.status_bytes.lock().push_back(byte);
    }

    pub fn push_ack(&self, line: &str) {
        self.acks.lock().push_back(line.to_string());
    }

    pub fn set_idle_status(&self, byte: Option<u8>) {
        *self.idle_status.lock() = byte;
    }

    pub fn inject_read_error(&self, message: &str) {
        *self.read_error.lock() = Some(message.to_string());
    }

    pub fn written_frames(&self) -> Vec<Vec<u8>> {
        self.written.lock().clone()
    }

    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

/// Connector handing out [`MockTransport`]s that all share one [`MockState`].
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    pub state: Arc<MockState>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let connector = Self::default();
        connector.state.fail_open.store(true, Ordering::SeqCst);
        connector
    }
}

#[async_trait]
impl Connect for MockConnector {
    type Transport = MockTransport;

    async fn open(&self, endpoint: &str) -> Result<MockTransport, ProtocolError> {
        self.state.open_count.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_open.load(Ordering::SeqCst) {
            return Err(ProtocolError::ConnectionFailed(format!(
                "cannot open {endpoint}"
            )));
        }
        Ok(MockTransport {
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct MockTransport {
    state: Arc<MockState>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        self.state.written.lock().push(frame.to_vec());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, ProtocolError> {
        Ok(self
            .state
            .acks
            .lock()
            .pop_front()
            .unwrap_or_else(|| "ok".to_string()))
    }

    async fn read_byte(&mut self) -> Result<u8, ProtocolError> {
        if let Some(message) = self.state.read_error.lock().take() {
            return Err(ProtocolError::ConnectionFailed(message));
        }
        if let Some(byte) = self.state.status_bytes.lock().pop_front() {
            return Ok(byte);
        }
        if let Some(byte) = *self.state.idle_status.lock() {
            return Ok(byte);
        }
        // Silent device: block like a real serial read with no data.
        std::future::pending::<()>().await;
        unreachable!()
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        self.state.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Receives events until `pred` matches one, panicking after `timeout`.
pub async fn wait_for_event(
    rx: &mut broadcast::Receiver<LightEvent>,
    timeout: Duration,
    mut pred: impl FnMut(&LightEvent) -> bool,
) -> LightEvent {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if pred(&event) {
            return event;
        }
    }
}
