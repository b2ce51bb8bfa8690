use async_trait::async_trait;

use crate::error::PublishError;
use crate::modules::compressor::events::CompletionEvent;

pub mod rabbitmq;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &CompletionEvent) -> Result<(), PublishError>;
}
