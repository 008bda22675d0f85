// src/services/publisher.rs

//! Notification publisher.
//!
//! Serializes the mail payload to UTF-8 JSON and hands it to the queue.
//! A run counts as notified only once the queue returns a message id.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, ErrorKind, Result};
use crate::models::{Notification, NotificationPayload, NotifyConfig};
use crate::queue::{Attributes, QueueClient, payload_digest};

/// Service publishing notifications to a queue topic.
pub struct Publisher {
    client: Arc<dyn QueueClient>,
    topic: String,
    encoding: String,
    attempts: u32,
    retry_delay: Duration,
}

impl Publisher {
    pub fn new(client: Arc<dyn QueueClient>, config: &NotifyConfig) -> Self {
        Self {
            client,
            topic: config.topic.clone(),
            encoding: config.encoding.clone(),
            attempts: config.publish_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish a notification, returning the queue's message id.
    pub async fn publish(
        &self,
        mail_server: &str,
        sender: &str,
        recipients: &[String],
        notification: &Notification,
    ) -> Result<String> {
        let payload = NotificationPayload::plaintext(mail_server, sender, recipients, notification);
        let data = serde_json::to_vec(&payload)?;

        let mut attributes = Attributes::new();
        attributes.insert("encoding".to_string(), self.encoding.clone());
        attributes.insert("digest".to_string(), payload_digest(&data));

        let mut attempt = 1;
        loop {
            match self.client.publish(&self.topic, &data, &attributes).await {
                Ok(message_id) => {
                    log::info!(
                        "Notification queued on '{}' as {} ({} recipient(s))",
                        self.topic,
                        message_id,
                        recipients.len()
                    );
                    return Ok(message_id);
                }
                Err(e) if attempt < self.attempts && e.kind() != ErrorKind::Configuration => {
                    log::warn!(
                        "Publish attempt {}/{} failed: {}. Retrying in {}ms",
                        attempt,
                        self.attempts,
                        e,
                        self.retry_delay.as_millis()
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::error!("Publishing to '{}' failed: {}", self.topic, e);
                    return Err(match e {
                        AppError::Publish(_) | AppError::Config(_) => e,
                        other => AppError::publish(other),
                    });
                }
            }
        }
    }
}
