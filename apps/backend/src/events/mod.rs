//! Event boundary: inbound validation and outbound notification.

pub mod hub;
pub mod inbound;
pub mod outbound;
pub mod publisher;
pub mod redis_publisher;

pub use hub::BroadcastHub;
pub use inbound::{Command, InboundEvent, PlayerInit, ReportSubmission, RollEvent};
pub use outbound::{OutboundEvent, UpdatedFields};
pub use publisher::{EventPublisher, FanoutPublisher};
pub use redis_publisher::RedisPublisher;
