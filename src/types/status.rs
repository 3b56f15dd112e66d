// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light status as reported by the device.

use std::fmt;

use crate::error::DecodeError;

/// The light state reported by the device in its status feed.
///
/// The device encodes status as a single raw byte; only `1` and `2` are
/// defined. Any other byte is a decode error, never a silent mapping.
///
/// # Examples
///
/// ```
/// use lumicom::types::LightStatus;
///
/// assert_eq!(LightStatus::try_from(1u8).unwrap(), LightStatus::On);
/// assert_eq!(LightStatus::try_from(2u8).unwrap(), LightStatus::Off);
/// assert!(LightStatus::try_from(0u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightStatus {
    /// The light is on.
    On,
    /// The light is off.
    Off,
}

impl LightStatus {
    /// Returns the wire byte for this status.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 2,
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Returns `true` if the light is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl TryFrom<u8> for LightStatus {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            1 => Ok(Self::On),
            2 => Ok(Self::Off),
            other => Err(DecodeError::InvalidStatusByte(other)),
        }
    }
}

impl From<bool> for LightStatus {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
