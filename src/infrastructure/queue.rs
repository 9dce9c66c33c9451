//! AMQP implementation of the queue publish sink

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::info;

use crate::domain::{DomainError, QueuePublisher};

/// Publishes fully materialized stream output to a RabbitMQ queue via the
/// default exchange. One connection and channel, opened at startup.
pub struct AmqpQueuePublisher {
    // Closing the connection closes the channel; keep it alive.
    _connection: Connection,
    channel: Channel,
}

impl AmqpQueuePublisher {
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| DomainError::queue(format!("Failed to connect to broker: {}", e)))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| DomainError::queue(format!("Failed to open channel: {}", e)))?;

        info!("AMQP queue publisher connected");

        Ok(Self {
            _connection: connection,
            channel,
        })
    }
}

#[async_trait]
impl QueuePublisher for AmqpQueuePublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), DomainError> {
        self.channel
            .queue_declare(
                topic,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| DomainError::queue(format!("Failed to declare queue: {}", e)))?;

        self.channel
            .basic_publish(
                "",
                topic,
                BasicPublishOptions::default(),
                payload.as_bytes(),
                BasicProperties::default(),
            )
            .await
            .map_err(|e| DomainError::queue(format!("Failed to publish: {}", e)))?
            .await
            .map_err(|e| DomainError::queue(format!("Publish not confirmed: {}", e)))?;

        Ok(())
    }
}
