//! Named-channel notification fan-out
//!
//! The notifier owns all subscriber bookkeeping for a session: subscribers
//! register against a channel name and receive every notification published
//! there, in registration order. Persistent subscriptions are backed by
//! unbounded channels so publishing never blocks the polling loop; one-time
//! subscriptions resolve on the first notification and are then dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};

use taskboard_api::{ApiError, BoardId};

use crate::event::BoardEvent;

/// Unique identifier for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Create a new SubscriberId with the given value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A single notification delivered to subscribers
///
/// The payload depends on the channel: `debug` carries trace strings,
/// `polling` carries the board and version about to be fetched, `error`
/// carries the failure, and every event channel carries the event itself.
/// Events and errors are shared behind `Arc` so fan-out never deep-copies.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Diagnostic trace from the polling engine
    Debug(String),
    /// A poll is about to run for this board and version
    Polling { board_id: BoardId, version: u64 },
    /// A fetch or discovery failed
    Error(Arc<ApiError>),
    /// A normalized board event
    Event(Arc<BoardEvent>),
}

impl Notification {
    /// The event payload, if this notification carries one
    pub fn as_event(&self) -> Option<&BoardEvent> {
        match self {
            Notification::Event(event) => Some(event),
            _ => None,
        }
    }

    /// The error payload, if this notification carries one
    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            Notification::Error(error) => Some(error),
            _ => None,
        }
    }
}

enum SubscriberSink {
    Persistent(mpsc::UnboundedSender<Notification>),
    // Consumed on first delivery; the slot is pruned afterwards.
    Once(Option<oneshot::Sender<Notification>>),
}

struct SubscriberSlot {
    id: SubscriberId,
    sink: SubscriberSink,
}

/// Channel-keyed notification dispatcher
///
/// All state is owned by the instance; two sessions never share subscribers
/// unless handed the same `Arc<Notifier>`.
#[derive(Default)]
pub struct Notifier {
    channels: DashMap<String, Vec<SubscriberSlot>>,
    next_id: AtomicU64,
}

impl Notifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a persistent subscription on a channel
    ///
    /// The returned stream yields every notification published on the
    /// channel from this point on. Dropping the stream ends the
    /// subscription; the slot is pruned on the next publish.
    pub fn subscribe(&self, channel: impl Into<String>) -> NotificationStream {
        let channel = channel.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.allocate_id();

        self.channels.entry(channel.clone()).or_default().push(SubscriberSlot {
            id,
            sink: SubscriberSink::Persistent(tx),
        });

        tracing::debug!("subscriber {} registered on channel {}", id, channel);
        NotificationStream { id, rx }
    }

    /// Register a one-time subscription on a channel
    ///
    /// Resolves with the next notification published on the channel, then
    /// the subscription is gone.
    pub fn subscribe_once(&self, channel: impl Into<String>) -> OnceNotification {
        let channel = channel.into();
        let (tx, rx) = oneshot::channel();
        let id = self.allocate_id();

        self.channels.entry(channel).or_default().push(SubscriberSlot {
            id,
            sink: SubscriberSink::Once(Some(tx)),
        });

        OnceNotification { id, rx }
    }

    /// Remove a subscription from a channel
    ///
    /// Returns true if the subscriber was registered there.
    pub fn unsubscribe(&self, channel: &str, id: SubscriberId) -> bool {
        let Some(mut slots) = self.channels.get_mut(channel) else {
            return false;
        };

        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        let removed = slots.len() < before;

        if removed {
            tracing::debug!("subscriber {} removed from channel {}", id, channel);
        }
        removed
    }

    /// Publish a notification to every subscriber of a channel
    ///
    /// Delivery happens in registration order. Subscribers whose receivers
    /// are gone, and one-time subscribers, are pruned here. Returns how many
    /// subscribers were handed the notification.
    pub fn publish(&self, channel: &str, notification: Notification) -> usize {
        let Some(mut slots) = self.channels.get_mut(channel) else {
            return 0;
        };

        let mut delivered = 0;
        slots.retain_mut(|slot| match &mut slot.sink {
            SubscriberSink::Persistent(sender) => {
                if sender.send(notification.clone()).is_ok() {
                    delivered += 1;
                    true
                } else {
                    false
                }
            }
            SubscriberSink::Once(sender) => {
                if let Some(tx) = sender.take() {
                    if tx.send(notification.clone()).is_ok() {
                        delivered += 1;
                    }
                }
                false
            }
        });

        delivered
    }

    /// Number of live subscriptions on a channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|slots| slots.len())
            .unwrap_or(0)
    }

    fn allocate_id(&self) -> SubscriberId {
        SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Receiving end of a persistent subscription
pub struct NotificationStream {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationStream {
    /// The subscription's identifier, usable with
    /// [`Notifier::unsubscribe`]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next notification
    ///
    /// Returns `None` once the publishing side is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Take a notification if one is already queued
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next notification, up to a timeout
    ///
    /// Returns `None` if the timeout expires or the publishing side is gone.
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<Notification> {
        tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()
    }
}

/// Receiving end of a one-time subscription
pub struct OnceNotification {
    id: SubscriberId,
    rx: oneshot::Receiver<Notification>,
}

impl OnceNotification {
    /// The subscription's identifier
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the notification
    ///
    /// Returns `None` if the notifier is dropped before anything is
    /// published on the channel.
    pub async fn wait(self) -> Option<Notification> {
        self.rx.await.ok()
    }
}
