// src/trigger.rs

//! Inbound trigger decoding.
//!
//! A trigger carries the run parameters as JSON, either raw or base64
//! encoded, possibly wrapped in a push (`data`) or queue (`Records`)
//! envelope. An empty trigger means "use the configured defaults".

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::CrawlParameters;

/// Decode raw trigger bytes; `None` when the payload is empty.
pub fn decode(raw: &[u8]) -> Result<Option<CrawlParameters>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| AppError::config(format!("trigger payload is not UTF-8: {e}")))?
        .trim();
    if text.is_empty() {
        return Ok(None);
    }

    if text.starts_with('{') {
        return parse(text.as_bytes()).map(Some);
    }

    let decoded = STANDARD
        .decode(text)
        .map_err(|e| AppError::config(format!("trigger payload is neither JSON nor base64: {e}")))?;
    if decoded.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    parse(&decoded).map(Some)
}

/// Extract parameters from an invocation event.
pub fn from_event(event: &Value) -> Result<Option<CrawlParameters>> {
    match event {
        Value::Null => Ok(None),
        Value::String(s) => decode(s.as_bytes()),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => {
            if let Some(data) = map.get("data") {
                return from_event(data);
            }
            if let Some(record) = map
                .get("Records")
                .and_then(Value::as_array)
                .and_then(|records| records.first())
            {
                let body = record
                    .get("body")
                    .or_else(|| record.get("Sns").and_then(|sns| sns.get("Message")))
                    .ok_or_else(|| AppError::config("queue record has no body"))?;
                return from_event(body);
            }
            Ok(Some(serde_json::from_value(event.clone()).map_err(invalid)?))
        }
        other => Err(AppError::config(format!(
            "unsupported trigger payload: {other}"
        ))),
    }
}

/// Use the trigger's parameters, or the embedding application's defaults.
pub fn resolve(params: Option<CrawlParameters>, fallback: &CrawlParameters) -> CrawlParameters {
    match params {
        Some(params) => {
            log::info!("Received parameters for {}", params.base_url);
            params
        }
        None => {
            log::info!(
                "Empty trigger payload; using default parameters for {}",
                fallback.base_url
            );
            fallback.clone()
        }
    }
}

fn parse(bytes: &[u8]) -> Result<CrawlParameters> {
    serde_json::from_slice(bytes).map_err(invalid)
}

fn invalid(e: serde_json::Error) -> AppError {
    AppError::config(format!("invalid trigger parameters: {e}"))
}
