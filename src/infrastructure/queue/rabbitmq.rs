use async_trait::async_trait;
use lapin::{
    options::*,
    types::{AMQPValue, FieldTable, LongString, ShortString},
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::{info, warn};

use super::EventPublisher;
use crate::config::settings::EventSettings;
use crate::error::PublishError;
use crate::modules::compressor::events::CompletionEvent;

/// Publishes completion events to a durable topic queue.
///
/// A connection is opened for each publish and closed afterwards; the process
/// publishes at most once per job.
#[derive(Clone)]
pub struct RabbitMqPublisher {
    settings: EventSettings,
}

impl RabbitMqPublisher {
    pub fn new(settings: EventSettings) -> Self {
        Self { settings }
    }

    async fn connect(&self) -> Result<(Connection, Channel), PublishError> {
        info!(topic = %self.settings.topic, "Connecting to RabbitMQ");
        let conn = Connection::connect(&self.settings.amqp_url, ConnectionProperties::default())
            .await
            .map_err(|e| PublishError::Connection(format!("Failed to connect to RabbitMQ: {}", e)))?;

        let channel = conn
            .create_channel()
            .await
            .map_err(|e| PublishError::Connection(format!("Failed to create channel: {}", e)))?;

        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| PublishError::Connection(format!("Failed to enable confirms: {}", e)))?;

        Ok((conn, channel))
    }

    fn headers(&self) -> FieldTable {
        let mut table = FieldTable::default();
        for (name, value) in &self.settings.headers {
            table.insert(
                ShortString::from(name.clone()),
                AMQPValue::LongString(LongString::from(value.clone())),
            );
        }
        table
    }

    async fn publish_on(&self, channel: &Channel, payload: &[u8]) -> Result<(), PublishError> {
        let topic = self.settings.topic.as_str();

        channel
            .queue_declare(
                topic,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| PublishError::Publish(format!("Failed to declare queue: {}", e)))?;

        let properties = BasicProperties::default()
            .with_delivery_mode(2) // Persistent
            .with_content_type(ShortString::from("application/json"))
            .with_app_id(ShortString::from(self.settings.producer.clone()))
            .with_headers(self.headers());

        let confirmation = channel
            .basic_publish("", topic, BasicPublishOptions::default(), payload, properties)
            .await
            .map_err(|e| PublishError::Publish(format!("Failed to publish message: {}", e)))?
            .await
            .map_err(|e| PublishError::Publish(format!("Failed to confirm publication: {}", e)))?;

        if confirmation.is_nack() {
            return Err(PublishError::Publish(format!(
                "Broker rejected message on {}",
                topic
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for RabbitMqPublisher {
    async fn publish(&self, event: &CompletionEvent) -> Result<(), PublishError> {
        let payload = event.to_payload()?;
        let (conn, channel) = self.connect().await?;

        let result = self.publish_on(&channel, &payload).await;

        if let Err(e) = conn.close(200, "OK".into()).await {
            warn!("Failed to close RabbitMQ connection: {}", e);
        }

        if result.is_ok() {
            info!(
                topic = %self.settings.topic,
                producer = %self.settings.producer,
                original = %event.original_file_name,
                "📨 Published completion event"
            );
        }
        result
    }
}
