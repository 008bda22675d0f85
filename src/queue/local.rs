//! Local filesystem outbox.
//!
//! Stands in for a real queue during local runs. Every message becomes one
//! JSON envelope file:
//!
//! ```text
//! {root}/
//! └── emails/                        # topic
//!     └── 20261019T061500123-3f2a9c0d1e4b.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::queue::{Attributes, QueueClient, payload_digest};

/// Envelope stored for each published message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub id: String,
    pub topic: String,
    pub published_at: DateTime<Utc>,
    pub attributes: Attributes,
    pub data: serde_json::Value,
}

/// Queue client writing messages to a local directory.
#[derive(Debug, Clone)]
pub struct LocalOutbox {
    root_dir: PathBuf,
}

impl LocalOutbox {
    /// Create an outbox rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn topic_dir(&self, topic: &str) -> Result<PathBuf> {
        if topic.is_empty() || topic.contains(['/', '\\']) || topic == "." || topic == ".." {
            return Err(AppError::publish(format!("invalid topic name '{topic}'")));
        }
        Ok(self.root_dir.join(topic))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read every message stored for `topic`, oldest first.
    pub async fn messages(&self, topic: &str) -> Result<Vec<OutboxMessage>> {
        let dir = self.topic_dir(topic)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut messages = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path).await?;
            messages.push(serde_json::from_slice(&bytes)?);
        }
        Ok(messages)
    }
}

#[async_trait]
impl QueueClient for LocalOutbox {
    async fn publish(&self, topic: &str, data: &[u8], attributes: &Attributes) -> Result<String> {
        let dir = self.topic_dir(topic)?;
        let now = Utc::now();
        let digest = payload_digest(data);
        let id = format!("{}-{}", now.format("%Y%m%dT%H%M%S%3f"), &digest[..12]);

        let data = serde_json::from_slice(data).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(data).into_owned())
        });
        let message = OutboxMessage {
            id: id.clone(),
            topic: topic.to_string(),
            published_at: now,
            attributes: attributes.clone(),
            data,
        };

        let path = dir.join(format!("{id}.json"));
        self.write_bytes(&path, &serde_json::to_vec_pretty(&message)?)
            .await
            .map_err(|e| {
                AppError::publish(format!("outbox write to {} failed: {e}", path.display()))
            })?;

        log::debug!("Outbox message written to {}", path.display());
        Ok(id)
    }
}
