// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol codec.
//!
//! The device speaks a minimal framed protocol over the serial link:
//!
//! - **Command frame**: a fixed 9-byte ASCII magic prefix followed by exactly
//!   one command byte, 10 bytes total. No checksum, no length prefix; framing
//!   relies entirely on the fixed prefix and fixed length.
//! - **Command acknowledgement**: one ASCII line terminated by `\n`. The
//!   distinguished line `403` means the device rejected the magic prefix.
//! - **Status feed**: a single raw byte per poll, decoded as [`LightStatus`].

use crate::error::{DecodeError, ProtocolError};
use crate::types::{LightCommand, LightStatus};

/// Magic prefix validating that incoming bytes are a genuine command frame.
pub const MAGIC_PREFIX: &[u8; 9] = b"f347ur323";

/// Total length of a command frame: prefix plus one command byte.
pub const FRAME_LEN: usize = MAGIC_PREFIX.len() + 1;

/// Acknowledgement line the device sends when it rejects the magic prefix.
pub const REJECTED_ACK: &str = "403";

/// Encodes a command into its 10-byte wire frame.
///
/// # Examples
///
/// ```
/// use lumicom::codec::encode_frame;
/// use lumicom::types::LightCommand;
///
/// let frame = encode_frame(LightCommand::TurnOn);
/// assert_eq!(&frame[..9], b"f347ur323");
/// assert_eq!(frame[9], 1);
/// ```
#[must_use]
pub fn encode_frame(command: LightCommand) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[..MAGIC_PREFIX.len()].copy_from_slice(MAGIC_PREFIX);
    frame[FRAME_LEN - 1] = command.as_byte();
    frame
}

/// Decodes a status byte from the device's status feed.
///
/// # Errors
///
/// Returns `DecodeError::InvalidStatusByte` for any byte outside `{1, 2}`.
pub fn decode_status(byte: u8) -> Result<LightStatus, DecodeError> {
    LightStatus::try_from(byte)
}

/// Interprets a command acknowledgement line.
///
/// Returns the acknowledgement text on success. The content of an accepted
/// acknowledgement is implementation-defined on the device side and is
/// passed through untouched.
///
/// # Errors
///
/// Returns `ProtocolError::PrefixRejected` if the device answered
/// [`REJECTED_ACK`], meaning it did not recognize the frame's magic prefix.
pub fn parse_ack(line: &str) -> Result<&str, ProtocolError> {
    if line == REJECTED_ACK {
        return Err(ProtocolError::PrefixRejected);
    }
    Ok(line)
}
