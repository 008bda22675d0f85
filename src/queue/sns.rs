//! AWS SNS queue client.
//!
//! Topics are given either as full ARNs or as bare names resolved against
//! an ARN prefix (`arn:aws:sns:<region>:<account>:`). FIFO topics get the
//! payload digest as deduplication id.

use async_trait::async_trait;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;

use crate::error::{AppError, Result};
use crate::queue::{Attributes, QueueClient, payload_digest};

const MESSAGE_GROUP: &str = "notifications";

/// SNS-backed queue client.
#[derive(Clone)]
pub struct SnsQueue {
    client: Client,
    arn_prefix: Option<String>,
}

impl SnsQueue {
    /// Create a new SNS queue client.
    pub fn new(client: Client, arn_prefix: Option<String>) -> Self {
        Self { client, arn_prefix }
    }

    /// Create the client from the ambient AWS configuration.
    ///
    /// `SNS_TOPIC_ARN_PREFIX` resolves bare topic names.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        let arn_prefix = std::env::var("SNS_TOPIC_ARN_PREFIX")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Ok(Self::new(client, arn_prefix))
    }

    /// Full ARN for a topic name or ARN.
    pub fn topic_arn(&self, topic: &str) -> Result<String> {
        if topic.starts_with("arn:") {
            return Ok(topic.to_string());
        }
        match &self.arn_prefix {
            Some(prefix) => Ok(format!("{}{}", prefix, topic)),
            None => Err(AppError::config(format!(
                "topic '{topic}' is not an ARN and SNS_TOPIC_ARN_PREFIX is not set"
            ))),
        }
    }

    fn attribute(value: &str) -> Result<MessageAttributeValue> {
        MessageAttributeValue::builder()
            .data_type("String")
            .string_value(value)
            .build()
            .map_err(|e| AppError::publish(format!("invalid message attribute: {e}")))
    }
}

#[async_trait]
impl QueueClient for SnsQueue {
    async fn publish(&self, topic: &str, data: &[u8], attributes: &Attributes) -> Result<String> {
        let arn = self.topic_arn(topic)?;
        let message = std::str::from_utf8(data)
            .map_err(|e| AppError::publish(format!("payload is not UTF-8: {e}")))?;

        let mut request = self.client.publish().topic_arn(&arn).message(message);
        for (name, value) in attributes {
            request = request.message_attributes(name, Self::attribute(value)?);
        }
        if arn.ends_with(".fifo") {
            request = request
                .message_group_id(MESSAGE_GROUP)
                .message_deduplication_id(payload_digest(data));
        }

        let output = request
            .send()
            .await
            .map_err(|e| AppError::publish(DisplayErrorContext(&e)))?;
        let message_id = output
            .message_id()
            .map(str::to_string)
            .ok_or_else(|| AppError::publish(format!("no message id returned by {arn}")))?;

        log::info!("Published message {} to {}", message_id, arn);
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sns::config::{BehaviorVersion, Region};

    fn queue(prefix: Option<&str>) -> SnsQueue {
        let config = aws_sdk_sns::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-2"))
            .build();
        SnsQueue::new(Client::from_conf(config), prefix.map(str::to_string))
    }

    #[test]
    fn test_topic_arn_passthrough() {
        let arn = "arn:aws:sns:eu-west-2:123456789012:emails";
        assert_eq!(queue(None).topic_arn(arn).unwrap(), arn);
    }

    #[test]
    fn test_topic_arn_from_prefix() {
        let q = queue(Some("arn:aws:sns:eu-west-2:123456789012:"));
        assert_eq!(
            q.topic_arn("emails").unwrap(),
            "arn:aws:sns:eu-west-2:123456789012:emails"
        );
    }

    #[test]
    fn test_topic_name_without_prefix_is_config_error() {
        let err = queue(None).topic_arn("emails").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
