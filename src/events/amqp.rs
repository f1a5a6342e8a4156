use async_trait::async_trait;
use error_stack::{Result, ResultExt};
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use thiserror::Error;

use super::{PublishError, UserEvent, UserEventPublisher};
use crate::config;

#[derive(Debug, Error)]
#[error("Failed to connect to the message broker")]
pub struct BrokerConnectError;

/// Publishes user events on a durable fan-out exchange. No routing key
/// is used, so every bound queue receives every event.
pub struct AmqpUserEventPublisher {
    // kept alive for as long as the channel is in use
    _connection: Connection,
    channel: Channel,
    exchange: String,
}

impl std::fmt::Debug for AmqpUserEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmqpUserEventPublisher")
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

impl AmqpUserEventPublisher {
    #[tracing::instrument(skip_all, fields(exchange = %cfg.user_event_exchange))]
    pub async fn connect(cfg: &config::Broker) -> Result<Self, BrokerConnectError> {
        let connection = Connection::connect(cfg.url.as_str(), ConnectionProperties::default())
            .await
            .change_context(BrokerConnectError)?;

        let channel = connection
            .create_channel()
            .await
            .change_context(BrokerConnectError)
            .attach_printable("could not open channel")?;

        let options = ExchangeDeclareOptions {
            durable: true,
            ..Default::default()
        };

        channel
            .exchange_declare(
                &cfg.user_event_exchange,
                ExchangeKind::Fanout,
                options,
                FieldTable::default(),
            )
            .await
            .change_context(BrokerConnectError)
            .attach_printable_lazy(|| {
                format!("could not declare exchange {:?}", cfg.user_event_exchange)
            })?;

        tracing::info!("connected to message broker");
        Ok(Self {
            _connection: connection,
            channel,
            exchange: cfg.user_event_exchange.clone(),
        })
    }
}

#[async_trait]
impl UserEventPublisher for AmqpUserEventPublisher {
    #[tracing::instrument(skip_all, fields(user.id = %event.user_id, action = ?event.action_type))]
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event).change_context(PublishError)?;
        let properties = BasicProperties::default()
            .with_content_type(mime::APPLICATION_JSON.as_ref().into());

        // publisher confirms are never awaited
        let _confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                "",
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await
            .change_context(PublishError)?;

        tracing::debug!("published user event");
        Ok(())
    }
}
