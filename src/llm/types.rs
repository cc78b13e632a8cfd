// src/llm/types.rs
// Provider-neutral request/response values for the generation endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability level a request is addressed to.
///
/// `Primary` falls back to `Secondary` on capability-unavailable errors.
/// `Fast` is the search-capable quick tier and has no fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Primary,
    Secondary,
    Fast,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

/// One input part: text or inline binary media
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Speaker of a prior conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A prior turn sent ahead of the request parts (chat history)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Attach the web-search grounding tool
    pub enable_search: bool,
    /// JSON schema the response must conform to (implies JSON output)
    pub response_schema: Option<serde_json::Value>,
    /// Thinking token budget hint
    pub thinking_budget: Option<u32>,
    pub system_instruction: Option<String>,
}

/// A complete request. Never mutated once built; the invoker and backends
/// only borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub history: Vec<HistoryEntry>,
    pub parts: Vec<Part>,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(tier: ModelTier, parts: Vec<Part>) -> Self {
        Self {
            tier,
            history: Vec::new(),
            parts,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_search(mut self, enabled: bool) -> Self {
        self.options.enable_search = enabled;
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.options.response_schema = Some(schema);
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.options.thinking_budget = Some(budget);
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.options.system_instruction = Some(system.into());
        self
    }
}

/// Kind of a returned content part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text,
    InlineBinary { mime_type: String },
}

/// Grounding source attached to a search-augmented response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub parts: Vec<ResponsePart>,
    pub citations: Vec<Citation>,
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    /// Response carrying only text, used by backends and tests
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parts: vec![ResponsePart::Text],
            ..Default::default()
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

/// Status of a long-running generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRunningOperation {
    pub id: String,
    pub status: OperationStatus,
    pub result_locator: Option<String>,
}

impl LongRunningOperation {
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: OperationStatus::Pending,
            result_locator: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Fold a freshly polled snapshot into this one.
    ///
    /// `Done` is terminal: a later snapshot reporting `Pending` is ignored.
    pub fn advance(&mut self, polled: LongRunningOperation) {
        if self.is_done() {
            return;
        }
        self.status = polled.status;
        if polled.result_locator.is_some() {
            self.result_locator = polled.result_locator;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_options() {
        let req = GenerationRequest::new(ModelTier::Primary, vec![Part::text("hi")])
            .with_search(true)
            .with_thinking_budget(1024)
            .with_system("be brief");
        assert!(req.options.enable_search);
        assert_eq!(req.options.thinking_budget, Some(1024));
        assert_eq!(req.options.system_instruction.as_deref(), Some("be brief"));
        assert!(req.options.response_schema.is_none());
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(ModelTier::Primary.to_string(), "primary");
        assert_eq!(ModelTier::Fast.to_string(), "fast");
    }

    #[test]
    fn test_operation_advance_to_done() {
        let mut op = LongRunningOperation::pending("ops/1");
        op.advance(LongRunningOperation {
            id: "ops/1".into(),
            status: OperationStatus::Done,
            result_locator: Some("https://example.com/v.mp4".into()),
        });
        assert!(op.is_done());
        assert_eq!(op.result_locator.as_deref(), Some("https://example.com/v.mp4"));
    }

    #[test]
    fn test_operation_done_never_regresses() {
        let mut op = LongRunningOperation {
            id: "ops/1".into(),
            status: OperationStatus::Done,
            result_locator: Some("https://example.com/v.mp4".into()),
        };
        op.advance(LongRunningOperation::pending("ops/1"));
        assert_eq!(op.status, OperationStatus::Done);
        assert!(op.result_locator.is_some());
    }
}
