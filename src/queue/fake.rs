//! Recording queue client for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::queue::{Attributes, QueueClient};

#[derive(Debug, Clone)]
pub struct Published {
    pub topic: String,
    pub data: Vec<u8>,
    pub attributes: Attributes,
}

/// Acknowledges every message after `failures` rejections.
#[derive(Default)]
pub struct RecordingQueue {
    failures: Mutex<usize>,
    misconfigured: bool,
    attempts: Mutex<usize>,
    published: Mutex<Vec<Published>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures: Mutex::new(failures),
            ..Self::default()
        }
    }

    /// Rejects every message as if the topic could not be resolved.
    pub fn misconfigured() -> Self {
        Self {
            misconfigured: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn publish(&self, topic: &str, data: &[u8], attributes: &Attributes) -> Result<String> {
        *self.attempts.lock().unwrap() += 1;
        if self.misconfigured {
            return Err(AppError::config(format!("unknown topic '{topic}'")));
        }
        {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AppError::publish("topic unavailable"));
            }
        }

        let mut published = self.published.lock().unwrap();
        published.push(Published {
            topic: topic.to_string(),
            data: data.to_vec(),
            attributes: attributes.clone(),
        });
        Ok(format!("msg-{}", published.len()))
    }
}
