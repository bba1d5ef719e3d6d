//! In-process notification hub for presentation consumers.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use crate::errors::domain::DomainError;
use crate::events::outbound::OutboundEvent;
use crate::events::publisher::EventPublisher;

const HUB_CAPACITY: usize = 256;

/// Fan-out of outbound events to any number of local subscribers. Slow
/// subscribers lag and lose the oldest events rather than blocking writers.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    tx: broadcast::Sender<OutboundEvent>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutboundEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for BroadcastHub {
    async fn publish(&self, event: &OutboundEvent) -> Result<(), DomainError> {
        // No subscribers is not a failure.
        let delivered = self.tx.send(event.clone()).unwrap_or(0);
        trace!(player_id = %event.player_id(), delivered, "hub publish");
        Ok(())
    }
}
