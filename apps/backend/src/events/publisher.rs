use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::domain::DomainError;
use crate::events::outbound::OutboundEvent;

/// Delivery seam for state-change notifications.
///
/// Delivery is at-least-once: the workflow retries `publish` on transient
/// errors, so consumers must tolerate duplicates.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &OutboundEvent) -> Result<(), DomainError>;
}

/// Publishes to every sink in order, stopping at the first failure.
pub struct FanoutPublisher {
    sinks: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    pub fn new(sinks: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn publish(&self, event: &OutboundEvent) -> Result<(), DomainError> {
        for sink in &self.sinks {
            sink.publish(event).await?;
        }
        Ok(())
    }
}
