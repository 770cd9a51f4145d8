//! MQTT message bus
//!
//! Thin wrapper around rumqttc: `connect` spawns the event-loop task and
//! hands back a channel of incoming messages; `publish` and `subscribe`
//! delegate to the async client. The smart-home side (OpenHAB) lives on
//! the other end of the broker.

use crate::config::BusConfig;
use crate::error::BusError;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;

/// Incoming messages buffered before the event loop drops them
const MESSAGE_CHANNEL_CAPACITY: usize = 32;

/// An incoming bus message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub payload: String,
}

/// Handle to the broker connection
#[derive(Clone)]
pub struct MessageBus {
    client: AsyncClient,
}

impl MessageBus {
    /// Connect to the broker and spawn the event-loop task
    ///
    /// The returned receiver carries every publish arriving on subscribed
    /// topics. Connection losses are logged; rumqttc reconnects on the
    /// next poll.
    pub async fn connect(config: &BusConfig) -> Result<(Self, mpsc::Receiver<BusMessage>), BusError> {
        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keepalive_secs));

        tracing::info!("Connecting to broker at {}:{}", config.host, config.port);
        let (client, mut event_loop) = AsyncClient::new(options, 16);
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let message = BusMessage {
                            topic: publish.topic.clone(),
                            payload: String::from_utf8_lossy(&publish.payload).into_owned(),
                        };
                        if tx.send(message).await.is_err() {
                            // Receiver gone: the daemon is shutting down
                            return;
                        }
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("Broker connection established");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Broker connection error: {}", e);
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });

        Ok((Self { client }, rx))
    }

    /// Publish a message (QoS 0, not retained)
    pub async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        tracing::debug!("Publishing {:?} to {}", payload, topic);
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .await
            .map_err(|e| BusError::Publish(topic.to_string(), e.to_string()))
    }

    /// Subscribe to a topic filter
    pub async fn subscribe(&self, filter: &str) -> Result<(), BusError> {
        tracing::debug!("Subscribing to {}", filter);
        self.client
            .subscribe(filter, QoS::AtMostOnce)
            .await
            .map_err(|e| BusError::Subscribe(filter.to_string(), e.to_string()))
    }
}
