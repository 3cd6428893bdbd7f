/// Completion client: the single point of entry for calls to the remote completion API.
///
/// No other module may call the completion API directly. The Generation Service
/// only sees the `CompletionClient` trait, so it can run against a stub in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A successful completion. `text` is `None` when the payload had no text at the
/// expected `output[0].content[0].text` path (or was not JSON at all).
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub status: Option<String>,
    pub text: Option<String>,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, input: &str) -> Result<Completion, CompletionError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    mission_id: u64,
    input: &'a str,
}

/// HTTP client for the mission-based completion API.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    mission_id: u64,
}

impl HttpCompletionClient {
    pub fn new(
        base_url: String,
        api_key: String,
        mission_id: u64,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            mission_id,
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    /// Sends one completion request. Never retries; failures surface to the caller.
    async fn complete(&self, input: &str) -> Result<Completion, CompletionError> {
        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .header("MATCHA-API-KEY", &self.api_key)
            .json(&CompletionRequest {
                mission_id: self.mission_id,
                input,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(
            "Completion call succeeded: status={}, bytes={}",
            status,
            body.len()
        );

        Ok(parse_completion(&body))
    }
}

/// Parses a success body. Shapes that cannot be understood produce an empty completion
/// rather than an error.
pub fn parse_completion(body: &str) -> Completion {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Completion {
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string),
            text: value
                .pointer("/output/0/content/0/text")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        Err(e) => {
            warn!("Completion response was not valid JSON: {e}");
            Completion {
                status: None,
                text: None,
            }
        }
    }
}
