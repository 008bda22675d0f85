//! Message queue clients.
//!
//! The notifier hands one serialized payload per run to a [`QueueClient`]:
//! - [`LocalOutbox`]: writes messages under a local directory
//! - `SnsQueue`: publishes to an AWS SNS topic (feature `sns`)

pub mod local;
#[cfg(feature = "sns")]
pub mod sns;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::Result;

pub use local::LocalOutbox;
#[cfg(feature = "sns")]
pub use sns::SnsQueue;

/// String attributes sent alongside a message.
pub type Attributes = BTreeMap<String, String>;

/// Fire-and-forget publishing with an acknowledgment.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Publish `data` to `topic`, returning the message id assigned on receipt.
    async fn publish(&self, topic: &str, data: &[u8], attributes: &Attributes) -> Result<String>;
}

/// Hex SHA-256 of a payload, used to spot redelivered duplicates.
pub fn payload_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
