// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-slot holding area for the next command to transmit.

use parking_lot::Mutex;

use crate::types::LightCommand;

/// Holds at most one outstanding command.
///
/// A newer command replaces an older one that has not been transmitted yet
/// (last write wins, no queueing). The polling loop drains the slot with an
/// atomic swap-and-clear, so there is no window between observing a command
/// and clearing it.
///
/// Locking invariant: `store` and the teardown `clear` are only called
/// while holding the engine state lock (read and write respectively), so a
/// store racing a teardown either lands before the clear or is rejected by
/// the phase check. The loop's `take` needs no such guard; it is the sole
/// consumer.
#[derive(Debug, Default)]
pub(crate) struct CommandSlot {
    slot: Mutex<Option<LightCommand>>,
}

impl CommandSlot {
    /// Creates an empty slot.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a command, returning the command it displaced, if any.
    pub(crate) fn store(&self, command: LightCommand) -> Option<LightCommand> {
        self.slot.lock().replace(command)
    }

    /// Takes the pending command, leaving the slot empty.
    pub(crate) fn take(&self) -> Option<LightCommand> {
        self.slot.lock().take()
    }

    /// Empties the slot, discarding any pending command.
    pub(crate) fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Returns `true` if no command is pending.
    pub(crate) fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_empty() {
        let slot = CommandSlot::new();
        assert!(slot.is_empty());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn store_then_take_drains_the_slot() {
        let slot = CommandSlot::new();

        assert_eq!(slot.store(LightCommand::TurnOn), None);
        assert_eq!(slot.take(), Some(LightCommand::TurnOn));
        assert!(slot.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let slot = CommandSlot::new();

        slot.store(LightCommand::TurnOn);
        let displaced = slot.store(LightCommand::TurnOff);

        assert_eq!(displaced, Some(LightCommand::TurnOn));
        assert_eq!(slot.take(), Some(LightCommand::TurnOff));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn clear_discards_pending_command() {
        let slot = CommandSlot::new();

        slot.store(LightCommand::TurnOff);
        slot.clear();

        assert!(slot.is_empty());
    }
}
