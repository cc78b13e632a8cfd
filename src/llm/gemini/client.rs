// src/llm/gemini/client.rs
// Google Gemini API client (generateContent + long-running video operations)
// The credential travels in a header, never in the URL or in log fields.

use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

use crate::http::create_shared_client;
use crate::llm::gemini::conversion::{build_request, build_video_request};
use crate::llm::gemini::extraction::{convert_operation, convert_response};
use crate::llm::gemini::types::{GeminiResponse, OperationResponse};
use crate::llm::http_client::{API_KEY_HEADER, LlmHttpClient};
use crate::llm::logging;
use crate::llm::provider::{GenerationBackend, OperationBackend, VideoJob};
use crate::llm::types::{GenerationRequest, GenerationResponse, LongRunningOperation};
use crate::{Result, StudioError};

pub const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    api_root: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_http_client(api_key, create_shared_client())
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            api_root: GEMINI_API_ROOT.to_string(),
            http: LlmHttpClient::from_client(client),
        }
    }

    /// Point the client at a different API root (proxies, regional endpoints)
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_root, model, method)
    }

    fn operation_url(&self, operation_id: &str) -> String {
        format!("{}/{}", self.api_root, operation_id.trim_start_matches('/'))
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        request_id: &str,
        url: &str,
        body: &B,
    ) -> Result<String> {
        let body = serde_json::to_string(body)?;
        self.http
            .execute(request_id, |client| {
                client
                    .post(url)
                    .header(API_KEY_HEADER, &self.api_key)
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    #[instrument(skip(self, request), fields(request_id, model = %model, part_count = request.parts.len()))]
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %model,
            search = request.options.enable_search,
            schema = request.options.response_schema.is_some(),
            thinking_budget = ?request.options.thinking_budget,
            history = request.history.len(),
            "Starting Gemini generateContent request"
        );

        let body = build_request(request);
        let url = self.model_url(model, "generateContent");
        let response_body = self.post_json(&request_id, &url, &body).await?;

        let data: GeminiResponse = serde_json::from_str(&response_body).map_err(|e| {
            StudioError::UnusableContent(format!("failed to parse Gemini response: {}", e))
        })?;
        if let Some(reason) = data
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|r| *r != "STOP")
        {
            warn!(request_id = %request_id, finish_reason = %reason, "Generation stopped early");
        }
        let response = convert_response(data);

        if let Some(ref usage) = response.usage {
            logging::log_usage(&request_id, model, usage);
        }
        logging::log_completion(
            &request_id,
            model,
            start_time.elapsed().as_millis() as u64,
            response.text.len(),
            response.citations.len(),
        );

        Ok(response)
    }
}

#[async_trait]
impl OperationBackend for GeminiClient {
    #[instrument(skip(self, job), fields(model = %model, aspect_ratio = job.aspect_ratio.as_str()))]
    async fn submit(&self, model: &str, job: &VideoJob) -> Result<LongRunningOperation> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.model_url(model, "predictLongRunning");
        let body = build_video_request(job);
        let response_body = self.post_json(&request_id, &url, &body).await?;

        let op: OperationResponse = serde_json::from_str(&response_body)?;
        info!(request_id = %request_id, operation = %op.name, "Video operation submitted");
        convert_operation(op)
    }

    async fn fetch(&self, operation_id: &str) -> Result<LongRunningOperation> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.operation_url(operation_id);
        let response_body = self
            .http
            .execute(&request_id, |client| {
                client.get(&url).header(API_KEY_HEADER, &self.api_key)
            })
            .await?;

        let op: OperationResponse = serde_json::from_str(&response_body)?;
        debug!(operation = %op.name, done = op.done, "Polled video operation");
        convert_operation(op)
    }
}
