// src/llm/http_client.rs
// Shared HTTP execution for generation backends
//
// One attempt per call. Tier fallback is the only retry in the system and
// lives in `FallbackInvoker`.

use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

use crate::{Result, StudioError};

/// Header carrying the credential, so it never appears in URLs or error text
pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

pub struct LlmHttpClient {
    client: Client,
}

impl LlmHttpClient {
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Send one request and return the body text on 2xx.
    ///
    /// Non-2xx responses become `StudioError::Api` with the provider's error
    /// message (and status string, e.g. `NOT_FOUND`) when the body has one.
    pub async fn execute<F>(&self, request_id: &str, build_request: F) -> Result<String>
    where
        F: FnOnce(&Client) -> reqwest::RequestBuilder,
    {
        let start = Instant::now();
        let response = build_request(&self.client)
            .send()
            .await
            .map_err(|e| StudioError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudioError::Http(e.without_url()))?;

        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            body_len = body.len(),
            "HTTP exchange complete"
        );

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!(request_id = %request_id, status = %status, error = %message, "API error");
            return Err(StudioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// Pull a readable message out of an error body, falling back to the raw text
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) if !status.is_empty() => {
                format!("{} ({})", envelope.error.message, status)
            }
            _ => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}
