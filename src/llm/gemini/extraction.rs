// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::gemini::types::{GeminiCandidate, GeminiPart, GeminiResponse, OperationResponse};
use crate::llm::types::{
    Citation, GenerationResponse, LongRunningOperation, OperationStatus, ResponsePart, Usage,
};
use crate::{Result, StudioError};

/// Text content of a candidate (non-thought parts only, concatenated)
pub fn extract_text(candidate: &GeminiCandidate) -> String {
    let Some(content) = &candidate.content else {
        return String::new();
    };
    content
        .parts
        .iter()
        .filter_map(|part| match part {
            GeminiPart::Text { text, thought: false } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn extract_parts(candidate: &GeminiCandidate) -> Vec<ResponsePart> {
    let Some(content) = &candidate.content else {
        return Vec::new();
    };
    content
        .parts
        .iter()
        .filter_map(|part| match part {
            GeminiPart::Text { thought: false, .. } => Some(ResponsePart::Text),
            GeminiPart::InlineData { inline_data } => Some(ResponsePart::InlineBinary {
                mime_type: inline_data.mime_type.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Web grounding chunks as citations; chunks without a URI are skipped
pub fn extract_citations(candidate: &GeminiCandidate) -> Vec<Citation> {
    let Some(metadata) = &candidate.grounding_metadata else {
        return Vec::new();
    };
    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.clone().filter(|u| !u.trim().is_empty())?;
            Some(Citation {
                title: web.title.clone().unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect()
}

pub fn convert_response(data: GeminiResponse) -> GenerationResponse {
    let usage = data.usage_metadata.map(|u| Usage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count.unwrap_or(0),
        total_tokens: u.total_token_count,
    });

    let Some(candidate) = data.candidates.as_ref().and_then(|c| c.first()) else {
        return GenerationResponse {
            usage,
            ..Default::default()
        };
    };

    GenerationResponse {
        text: extract_text(candidate),
        parts: extract_parts(candidate),
        citations: extract_citations(candidate),
        usage,
    }
}

/// Map an operation snapshot; an operation that finished with an error is
/// reported as an API error
pub fn convert_operation(op: OperationResponse) -> Result<LongRunningOperation> {
    if let Some(error) = op.error {
        return Err(StudioError::Api {
            status: error.code,
            message: error.message,
        });
    }

    let result_locator = op
        .response
        .and_then(|r| r.generate_video_response)
        .and_then(|v| v.generated_samples.into_iter().next())
        .and_then(|s| s.video)
        .and_then(|v| v.uri)
        .filter(|uri| !uri.trim().is_empty());

    Ok(LongRunningOperation {
        id: op.name,
        status: if op.done {
            OperationStatus::Done
        } else {
            OperationStatus::Pending
        },
        result_locator,
    })
}
