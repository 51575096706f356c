//! Publish/subscribe notification buses.
//!
//! A [`NotificationBus`] is an explicit object owned by whoever produces
//! the notifications. Subscribers hold a [`Subscription`] and end it either
//! by passing it to [`NotificationBus::unsubscribe`] or by dropping it.
//!
//! Publishing never blocks and never fails: with no subscribers the value
//! is discarded, and a subscriber that falls more than the bus capacity
//! behind skips ahead to the oldest retained value.

use skyswarm_types::{NotableEvent, PublishReceipt, SubscriptionId};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

/// Default number of values retained for slow subscribers.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Bus carrying the engine's notable events.
pub type EventBus = NotificationBus<NotableEvent>;

/// Bus carrying publish receipts back to the UI.
pub type ReceiptBus = NotificationBus<PublishReceipt>;

/// A subscription to an [`EventBus`].
pub type NotableEventSubscription = Subscription<NotableEvent>;

/// A subscription to a [`ReceiptBus`].
pub type ReceiptSubscription = Subscription<PublishReceipt>;

/// Fan-out notification channel.
#[derive(Debug, Clone)]
pub struct NotificationBus<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> NotificationBus<T> {
    /// Create a bus retaining up to `capacity` values per lagging subscriber.
    ///
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Register a new subscriber. It sees only values published after this call.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = SubscriptionId::new();
        debug!(subscription_id = %id, "subscriber registered");
        Subscription {
            id,
            rx: self.tx.subscribe(),
        }
    }

    /// End a subscription explicitly.
    pub fn unsubscribe(&self, subscription: Subscription<T>) {
        debug!(subscription_id = %subscription.id, "subscriber removed");
        drop(subscription);
    }

    /// Deliver `value` to every current subscriber.
    ///
    /// Returns how many subscribers were notified; zero is not an error.
    pub fn publish(&self, value: T) -> usize {
        self.tx.send(value).unwrap_or(0)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> Default for NotificationBus<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// A live registration on a [`NotificationBus`].
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Identifier of this subscription.
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next value.
    ///
    /// Returns `None` once every bus handle has been dropped and the
    /// backlog is drained.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(subscription_id = %self.id, skipped, "subscriber lagged, skipping ahead");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next value if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(subscription_id = %self.id, skipped, "subscriber lagged, skipping ahead");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
