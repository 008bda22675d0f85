//! AWS Lambda entry point for Court Notifier
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! Invoke with AWS Lambda using the generated binary.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use serde_json::Value;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use court_notifier::{
    config,
    models::RunTimestamp,
    pipeline::{Notifier, RunReport},
    queue::SnsQueue,
    services::Publisher,
    session::HttpBrowser,
    trigger,
};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Court Notifier Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for AWS Lambda events.
///
/// A failed run is returned as an error so the platform records the
/// invocation as failed.
#[instrument(skip(event), fields(request_id = %event.context.request_id))]
async fn handler(event: LambdaEvent<Value>) -> Result<Value, LambdaError> {
    let timestamp = RunTimestamp::now();
    info!("Received event: {}", event.payload);

    match run_notifier(&event.payload, &timestamp).await {
        Ok(report) => {
            info!(
                listed = report.listed,
                available = report.available,
                "Notifier run successful"
            );
            Ok(serde_json::json!({
                "status": "success",
                "listed": report.listed,
                "available": report.available,
                "message_id": report.message_id,
            }))
        }
        Err(e) => {
            error!(kind = ?e.kind(), "Notifier run failed: {}", e);
            Err(e.into())
        }
    }
}

async fn run_notifier(
    payload: &Value,
    timestamp: &RunTimestamp,
) -> court_notifier::error::Result<RunReport> {
    let config = config::from_env()?;
    let params = trigger::resolve(trigger::from_event(payload)?, &config.defaults);

    let queue = SnsQueue::from_env().await?;
    let topic_arn = queue.topic_arn(&config.notify.topic)?;
    info!(topic = %topic_arn, "Publishing to SNS topic");

    let queue = Arc::new(queue);
    let browser = Arc::new(HttpBrowser::new(&config.crawler)?);
    let publisher = Publisher::new(queue, &config.notify);

    Notifier::new(&config, browser, publisher)
        .run(&params, timestamp)
        .await
}
