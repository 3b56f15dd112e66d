// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `lumicom` - A Rust library to drive a microcontroller-attached light over
//! a serial link.
//!
//! The library centers on [`LightController`], an async connection engine
//! that owns the serial transport exclusively. A background polling loop
//! interleaves command transmission with status reads, while the public API
//! stays non-blocking: commands are enqueued into a single pending slot and
//! outcomes arrive on a broadcast event stream.
//!
//! # Wire protocol
//!
//! - Command frame: 10 bytes, the ASCII magic prefix `f347ur323` plus one
//!   command byte (`1` = on, `2` = off)
//! - Command acknowledgement: one ASCII line; `403` means the device
//!   rejected the prefix
//! - Status feed: one raw byte per poll (`1` = on, `2` = off)
//!
//! # Quick start
//!
//! ```no_run
//! use lumicom::{LightCommand, LightController, LightEvent};
//!
//! #[tokio::main]
//! async fn main() -> lumicom::Result<()> {
//!     let controller = LightController::serial("/dev/ttyUSB0");
//!     let mut events = controller.subscribe();
//!
//!     controller.connect();
//!
//!     loop {
//!         match events.recv().await {
//!             Ok(LightEvent::ConnectionChanged { connected: true, .. }) => {
//!                 controller.send_command(LightCommand::TurnOn)?;
//!             }
//!             Ok(LightEvent::StatusUpdate { status }) => {
//!                 println!("light is {status}");
//!             }
//!             Ok(LightEvent::ConnectFailed { error }) => {
//!                 eprintln!("connect failed: {error}");
//!                 break;
//!             }
//!             Ok(_) => {}
//!             Err(_) => break,
//!         }
//!     }
//!
//!     controller.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Custom transports
//!
//! The controller is generic over a [`transport::Connect`] implementation,
//! so tests (or non-serial links) can substitute their own transport while
//! keeping the engine's semantics.

pub mod codec;
mod controller;
pub mod error;
pub mod event;
pub mod transport;
pub mod types;

pub use controller::{DEFAULT_POLL_INTERVAL, LightController, LightControllerBuilder};
pub use error::{DecodeError, Error, ProtocolError, Result};
pub use event::{EventBus, LightEvent};
pub use transport::{SerialConfig, SerialConnector, SerialTransport};
pub use types::{LightCommand, LightStatus};
