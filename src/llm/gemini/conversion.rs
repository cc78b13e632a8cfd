// src/llm/gemini/conversion.rs
// Request conversion from studyforge values to Gemini wire format

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::llm::gemini::types::{
    GeminiBlob, GeminiContent, GeminiPart, GeminiRequest, GeminiTool, GenerationConfig,
    GoogleSearchConfig, PredictRequest, ThinkingConfig, VideoImage, VideoInstance,
    VideoParameters,
};
use crate::llm::provider::VideoJob;
use crate::llm::types::{GenerationRequest, HistoryEntry, Part, Role};

pub fn convert_part(part: &Part) -> GeminiPart {
    match part {
        Part::Text(text) => GeminiPart::Text {
            text: text.clone(),
            thought: false,
        },
        Part::InlineData { mime_type, data } => GeminiPart::InlineData {
            inline_data: GeminiBlob {
                mime_type: mime_type.clone(),
                data: STANDARD.encode(data),
            },
        },
    }
}

fn convert_history(entry: &HistoryEntry) -> GeminiContent {
    let role = match entry.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart::Text {
            text: entry.text.clone(),
            thought: false,
        }],
    }
}

/// Create Google Search tool
pub fn google_search_tool() -> GeminiTool {
    GeminiTool::GoogleSearch {
        google_search: GoogleSearchConfig {},
    }
}

/// Build the generateContent body.
///
/// Search grounding and a response schema cannot be combined by the API;
/// when both are asked for, the schema is dropped and JSON must be requested
/// in the prompt text instead.
pub fn build_request(request: &GenerationRequest) -> GeminiRequest {
    let options = &request.options;

    let mut contents: Vec<GeminiContent> = request.history.iter().map(convert_history).collect();
    contents.push(GeminiContent {
        role: Some("user".to_string()),
        parts: request.parts.iter().map(convert_part).collect(),
    });

    let system_instruction = options.system_instruction.as_ref().map(|s| GeminiContent {
        role: None,
        parts: vec![GeminiPart::Text {
            text: s.clone(),
            thought: false,
        }],
    });

    let tools = options.enable_search.then(|| vec![google_search_tool()]);

    let response_schema = if options.enable_search {
        None
    } else {
        options.response_schema.clone()
    };

    let generation_config = GenerationConfig {
        response_mime_type: response_schema
            .as_ref()
            .map(|_| "application/json".to_string()),
        response_schema,
        thinking_config: options.thinking_budget.map(|thinking_budget| ThinkingConfig {
            thinking_budget,
        }),
    };
    let has_config = generation_config.response_schema.is_some()
        || generation_config.thinking_config.is_some();

    GeminiRequest {
        contents,
        system_instruction,
        tools,
        generation_config: has_config.then_some(generation_config),
    }
}

/// Build the predictLongRunning body for a video job
pub fn build_video_request(job: &VideoJob) -> PredictRequest {
    PredictRequest {
        instances: vec![VideoInstance {
            prompt: job.prompt.clone(),
            image: job.image.as_ref().map(|img| VideoImage {
                bytes_base64_encoded: STANDARD.encode(&img.data),
                mime_type: img.mime_type.clone(),
            }),
        }],
        parameters: VideoParameters {
            aspect_ratio: job.aspect_ratio.as_str().to_string(),
        },
    }
}
