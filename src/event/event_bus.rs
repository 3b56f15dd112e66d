// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting controller events.

use tokio::sync::broadcast;

use super::LightEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Event bus broadcasting [`LightEvent`]s to multiple subscribers.
///
/// Built on tokio's broadcast channel: every subscriber receives its own
/// copy of each event, in publication order. A subscriber that falls more
/// than the channel capacity behind loses its oldest events and observes a
/// `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use lumicom::event::{EventBus, LightEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(LightEvent::connected());
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<LightEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to controller events.
    ///
    /// The receiver sees all events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LightEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: LightEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LightStatus;

    #[tokio::test]
    async fn every_subscriber_gets_its_own_copy() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(LightEvent::status(LightStatus::On));

        for rx in [&mut rx1, &mut rx2] {
            let event = rx.recv().await.unwrap();
            assert!(matches!(
                event,
                LightEvent::StatusUpdate {
                    status: LightStatus::On,
                }
            ));
        }
    }

    #[tokio::test]
    async fn publish_preserves_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(LightEvent::connected());
        bus.publish(LightEvent::status(LightStatus::Off));

        assert!(rx.recv().await.unwrap().is_connection());
        assert!(!rx.recv().await.unwrap().is_connection());
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(LightEvent::connected());

        let mut rx = bus.subscribe();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn slow_subscriber_lags_past_capacity() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for _ in 0..4 {
            bus.publish(LightEvent::status(LightStatus::On));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(LightEvent::disconnected());
    }

    #[tokio::test]
    async fn cloned_bus_reaches_original_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.clone().publish(LightEvent::connected());
        assert!(rx.recv().await.unwrap().is_connection());
    }
}
