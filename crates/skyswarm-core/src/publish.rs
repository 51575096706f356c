//! Bridge between the event bus and an external publishing collaborator.
//!
//! The engine never talks to a publisher directly. [`spawn_publisher`]
//! subscribes on the engine's side, hands each event to an
//! [`EventPublisher`] on its own task, and forwards the resulting receipts
//! onto a [`ReceiptBus`]. Publisher failures are logged and counted; they
//! never reach the engine.

use std::future::Future;
use std::sync::Arc;

use skyswarm_types::{NotableEvent, PublishReceipt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::{ReceiptBus, Subscription};

/// Errors reported by a publishing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The event schema could not be registered or looked up.
    #[error("schema unavailable: {reason}")]
    SchemaUnavailable {
        /// Why the schema is unavailable.
        reason: String,
    },

    /// The event could not be encoded for transmission.
    #[error("failed to encode event: {reason}")]
    Encode {
        /// Why encoding failed.
        reason: String,
    },

    /// The transport rejected or dropped the event.
    #[error("transport error: {reason}")]
    Transport {
        /// What the transport reported.
        reason: String,
    },
}

/// An external sink for notable events.
pub trait EventPublisher: Send + Sync + 'static {
    /// Make the event schema available. The engine should only be marked
    /// schema-ready after this succeeds.
    fn prepare(&self) -> impl Future<Output = Result<(), PublishError>> + Send;

    /// Transmit one event and report its transaction identifier.
    fn publish(
        &self,
        event: &NotableEvent,
    ) -> impl Future<Output = Result<PublishReceipt, PublishError>> + Send;
}

/// Outcome counts of a publisher task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    /// Events the publisher accepted.
    pub published: u64,
    /// Events the publisher rejected.
    pub failed: u64,
}

/// Feed every event from `events` to `publisher` until the event bus closes.
///
/// Receipts are published on `receipts`. The returned handle resolves to
/// the final counts.
pub fn spawn_publisher<P: EventPublisher>(
    publisher: Arc<P>,
    mut events: Subscription<NotableEvent>,
    receipts: ReceiptBus,
) -> JoinHandle<PublishStats> {
    tokio::spawn(async move {
        let mut stats = PublishStats::default();
        info!(subscription_id = %events.id(), "Publisher bridge started");
        while let Some(event) = events.recv().await {
            match publisher.publish(&event).await {
                Ok(receipt) => {
                    stats.published = stats.published.saturating_add(1);
                    debug!(
                        drone_id = %receipt.drone_id,
                        hash = %receipt.hash,
                        "Event published"
                    );
                    receipts.publish(receipt);
                }
                Err(e) => {
                    stats.failed = stats.failed.saturating_add(1);
                    warn!(
                        drone_id = %event.drone_id,
                        event_type = %event.event_type,
                        error = %e,
                        "Failed to publish event"
                    );
                }
            }
        }
        info!(
            published = stats.published,
            failed = stats.failed,
            "Publisher bridge stopped"
        );
        stats
    })
}
