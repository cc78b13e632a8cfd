// src/llm/logging.rs
// Shared generation logging helpers

use super::types::Usage;
use tracing::info;

/// Log token usage for a generation call.
pub fn log_usage(request_id: &str, model: &str, usage: &Usage) {
    info!(
        request_id = %request_id,
        model = %model,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "Generation usage stats"
    );
}

/// Log completion summary for a generation call.
pub fn log_completion(
    request_id: &str,
    model: &str,
    duration_ms: u64,
    content_len: usize,
    citation_count: usize,
) {
    info!(
        request_id = %request_id,
        model = %model,
        duration_ms = duration_ms,
        content_len = content_len,
        citations = citation_count,
        "Generation complete"
    );
}
