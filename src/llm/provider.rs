// src/llm/provider.rs
// Generation backend abstraction layer

use async_trait::async_trait;

use super::types::{GenerationRequest, GenerationResponse, LongRunningOperation, ModelTier};
use crate::Result;

pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_SECONDARY_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Concrete model identifiers behind each tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoster {
    pub primary: String,
    pub secondary: String,
    pub fast: String,
    pub video: String,
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_MODEL.to_string(),
            secondary: DEFAULT_SECONDARY_MODEL.to_string(),
            fast: DEFAULT_FAST_MODEL.to_string(),
            video: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }
}

impl ModelRoster {
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Primary => &self.primary,
            ModelTier::Secondary => &self.secondary,
            ModelTier::Fast => &self.fast,
        }
    }
}

/// Parameters of a video synthesis job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJob {
    pub prompt: String,
    pub image: Option<InlineMedia>,
    pub aspect_ratio: AspectRatio,
}

/// Binary media sent inline with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "16:9" | "landscape" => Some(Self::Landscape),
            "9:16" | "portrait" => Some(Self::Portrait),
            _ => None,
        }
    }
}

/// Synchronous text/image generation against a named model
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, model: &str, request: &GenerationRequest)
    -> Result<GenerationResponse>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Asynchronous submit + poll job API (video synthesis)
#[async_trait]
pub trait OperationBackend: Send + Sync {
    async fn submit(&self, model: &str, job: &VideoJob) -> Result<LongRunningOperation>;

    async fn fetch(&self, operation_id: &str) -> Result<LongRunningOperation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_defaults() {
        let roster = ModelRoster::default();
        assert_eq!(roster.model_for(ModelTier::Primary), DEFAULT_PRIMARY_MODEL);
        assert_eq!(roster.model_for(ModelTier::Secondary), DEFAULT_SECONDARY_MODEL);
        assert_eq!(roster.model_for(ModelTier::Fast), DEFAULT_FAST_MODEL);
        assert_ne!(roster.primary, roster.secondary);
    }

    #[test]
    fn test_aspect_ratio_round_trip() {
        assert_eq!(AspectRatio::parse("16:9"), Some(AspectRatio::Landscape));
        assert_eq!(AspectRatio::parse("portrait"), Some(AspectRatio::Portrait));
        assert_eq!(AspectRatio::parse("4:3"), None);
        assert_eq!(AspectRatio::Portrait.as_str(), "9:16");
        assert_eq!(AspectRatio::default(), AspectRatio::Landscape);
    }
}
