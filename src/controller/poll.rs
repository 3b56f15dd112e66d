// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The background polling loop.
//!
//! One loop task runs per successful connection. It owns the transport
//! exclusively for its whole life and terminates exactly once, either on
//! cooperative cancellation or on a fatal I/O / decode error. Iterations are
//! strictly sequential: each one handles cancellation, or one pending
//! command, or one status read, never more.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::codec;
use crate::event::LightEvent;
use crate::transport::{Connect, Transport};

use super::{Inner, Phase};

/// Runs the polling loop until cancellation or a fatal error.
pub(super) async fn run<C: Connect>(
    inner: Arc<Inner<C>>,
    mut transport: C::Transport,
    cancel: Arc<AtomicBool>,
) {
    loop {
        // Cancellation is checked first, so an in-flight read that was
        // already blocked finishes before the flag is honored.
        if cancel.load(Ordering::SeqCst) {
            tracing::info!("Cancellation requested, closing transport");
            if let Err(e) = transport.close().await {
                // Close failures do not block the disconnect.
                tracing::warn!(error = %e, "Error closing transport");
            }
            finish(&inner, None);
            return;
        }

        // Commands and status reads are mutually exclusive per iteration.
        if let Some(command) = inner.pending.take() {
            tracing::debug!(command = %command, "Sending command frame");
            let frame = codec::encode_frame(command);

            if let Err(e) = transport.write_frame(&frame).await {
                fail(&inner, transport, e).await;
                return;
            }

            let ack = match transport.read_line().await {
                Ok(line) => line,
                Err(e) => {
                    fail(&inner, transport, e).await;
                    return;
                }
            };

            // The slot is already clear; the ack content does not change that.
            if codec::parse_ack(&ack).is_err() {
                tracing::warn!("Device rejected the magic prefix");
                inner.events.publish(LightEvent::CommandRejected);
            } else {
                tracing::debug!(ack = %ack, "Command acknowledged");
            }

            // Skip the idle delay so command delivery is never throttled.
            continue;
        }

        let byte = match transport.read_byte().await {
            Ok(byte) => byte,
            Err(e) => {
                fail(&inner, transport, e).await;
                return;
            }
        };

        match codec::decode_status(byte) {
            Ok(status) => {
                tracing::debug!(status = %status, "Status received");
                inner.events.publish(LightEvent::status(status));
            }
            Err(e) => {
                fail(&inner, transport, e).await;
                return;
            }
        }

        // Throttle status polling while idle.
        tokio::time::sleep(inner.poll_interval).await;
    }
}

/// Tears down after a fatal mid-loop error: close best-effort, then
/// transition to disconnected with the error attached.
///
/// Takes the error by value so the loop future stays `Send` across the
/// close await.
async fn fail<C: Connect, E: fmt::Display + Send>(
    inner: &Inner<C>,
    mut transport: C::Transport,
    error: E,
) {
    tracing::error!(error = %error, "Fatal error in polling loop, disconnecting");
    if let Err(e) = transport.close().await {
        tracing::warn!(error = %e, "Error closing transport");
    }
    finish(inner, Some(error.to_string()));
}

/// Final transition out of the loop: the transport handle is gone, the
/// pending slot is emptied, and subscribers observe the disconnect.
///
/// The slot is cleared while the write lock is held: `send_command` stores
/// under the same lock, so no command can slip in after the clear but
/// before the phase flips to disconnected.
fn finish<C: Connect>(inner: &Inner<C>, error: Option<String>) {
    {
        let mut state = inner.state.write();
        inner.pending.clear();
        state.phase = Phase::Disconnected;
        state.cancel = None;
    }

    let event = match error {
        Some(error) => LightEvent::disconnected_with_error(error),
        None => LightEvent::disconnected(),
    };
    inner.events.publish(event);
}
