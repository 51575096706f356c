//! A publisher that accepts every event without leaving the process.
//!
//! Stands in for the streaming service so the full pipeline (schema
//! handshake, bridge, receipts, UI log) runs locally.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use skyswarm_core::{EventPublisher, PublishError};
use skyswarm_types::{DRONE_EVENT_SCHEMA, NotableEvent, PublishReceipt};
use tracing::{debug, info};
use uuid::Uuid;

/// Logs events instead of transmitting them.
#[derive(Debug, Default)]
pub struct DryRunPublisher {
    prepared: AtomicBool,
    published: AtomicU64,
}

impl DryRunPublisher {
    /// A publisher that has not yet registered its schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events accepted so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

impl EventPublisher for DryRunPublisher {
    async fn prepare(&self) -> Result<(), PublishError> {
        self.prepared.store(true, Ordering::Release);
        info!(schema = DRONE_EVENT_SCHEMA, "Dry-run schema registered");
        Ok(())
    }

    async fn publish(&self, event: &NotableEvent) -> Result<PublishReceipt, PublishError> {
        if !self.prepared.load(Ordering::Acquire) {
            return Err(PublishError::SchemaUnavailable {
                reason: "prepare() has not completed".to_owned(),
            });
        }
        let hash = format!("0x{}", Uuid::new_v4().simple());
        self.published.fetch_add(1, Ordering::AcqRel);
        debug!(
            drone_id = %event.drone_id,
            event_type = %event.event_type,
            nonce = event.nonce,
            hash,
            "Dry-run publish"
        );
        Ok(PublishReceipt {
            hash,
            event_type: event.event_type,
            drone_id: event.drone_id.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use skyswarm_types::{DroneId, NotableEventKind};

    fn event() -> NotableEvent {
        NotableEvent {
            event_type: NotableEventKind::NetworkLatency,
            message: "Latency spike detected: 80ms".to_owned(),
            timestamp: 0,
            drone_id: DroneId::from_index(9),
            nonce: 5,
        }
    }

    #[tokio::test]
    async fn rejects_before_prepare() {
        let publisher = DryRunPublisher::new();
        let err = publisher.publish(&event()).await.err();
        assert!(matches!(err, Some(PublishError::SchemaUnavailable { .. })));
        assert_eq!(publisher.published(), 0);
    }

    #[tokio::test]
    async fn receipt_echoes_event_identity() {
        let publisher = DryRunPublisher::new();
        publisher.prepare().await.unwrap();
        let receipt = publisher.publish(&event()).await.unwrap();
        assert_eq!(receipt.drone_id, DroneId::from_index(9));
        assert_eq!(receipt.event_type, NotableEventKind::NetworkLatency);
        assert!(receipt.hash.starts_with("0x"));
        assert_eq!(receipt.hash.len(), 34);
        assert_eq!(publisher.published(), 1);
    }
}
