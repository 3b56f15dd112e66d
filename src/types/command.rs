// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands accepted by the device.

use std::fmt;

/// A command to send to the light.
///
/// Exactly one command travels per wire frame; the controller keeps at most
/// one command pending at a time and a newer command replaces an older one
/// that has not been transmitted yet.
///
/// # Examples
///
/// ```
/// use lumicom::types::LightCommand;
///
/// assert_eq!(LightCommand::TurnOn.as_byte(), 1);
/// assert_eq!(LightCommand::TurnOff.as_byte(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightCommand {
    /// Turn the light on.
    TurnOn,
    /// Turn the light off.
    TurnOff,
}

impl LightCommand {
    /// Returns the wire byte for this command.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Self::TurnOn => 1,
            Self::TurnOff => 2,
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TurnOn => "TurnOn",
            Self::TurnOff => "TurnOff",
        }
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
