//! Redis pub/sub publisher. Each event goes to `player:{id}` as JSON.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::events::outbound::OutboundEvent;
use crate::events::publisher::EventPublisher;
use crate::logging::pii::Redacted;

pub struct RedisPublisher {
    publisher: Mutex<ConnectionManager>,
}

impl RedisPublisher {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client).await.map_err(|err| {
            AppError::config(format!("Unable to initialize Redis connection manager: {err}"))
        })?;

        info!("Redis publisher connected");
        Ok(Self {
            publisher: Mutex::new(manager),
        })
    }
}

/// Whether a failed publish may succeed if tried again.
fn is_transient(err: &RedisError) -> bool {
    let msg = err.to_string().to_lowercase();

    if msg.contains("authentication")
        || msg.contains("noauth")
        || msg.contains("invalid client config")
        || msg.contains("unsupported")
    {
        return false;
    }

    if let Some(io_err) = std::error::Error::source(err).and_then(|s| s.downcast_ref::<std::io::Error>())
    {
        return !matches!(
            io_err.kind(),
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::Unsupported
        );
    }

    true
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, event: &OutboundEvent) -> Result<(), DomainError> {
        let channel = event.channel();
        let encoded = serde_json::to_string(event).map_err(|err| {
            DomainError::infra(
                InfraErrorKind::Misconfigured,
                format!("Failed to serialize outbound event: {err}"),
            )
        })?;

        let result = {
            let mut publisher = self.publisher.lock().await;
            publisher
                .publish::<_, _, ()>(channel.as_str(), encoded)
                .await
        };

        match result {
            Ok(()) => {
                debug!(channel = %channel, "published to redis");
                Ok(())
            }
            Err(err) => {
                let detail = err.to_string();
                warn!(channel = %channel, error = %Redacted(&detail), "Redis publish failed");
                let kind = if is_transient(&err) {
                    InfraErrorKind::Publish
                } else {
                    InfraErrorKind::Misconfigured
                };
                Err(DomainError::infra(kind, format!("Redis publish failed: {detail}")))
            }
        }
    }
}
