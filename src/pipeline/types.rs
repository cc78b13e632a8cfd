// src/pipeline/types.rs
// Values produced and consumed by the study pipeline phases

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llm::{Citation, Part};

/// Maximum number of facts kept from context retrieval
pub const MAX_FACTS: usize = 20;

/// Facts used when context retrieval fails for any reason
pub const DEFAULT_FACTS: [&str; 3] = [
    "Live research for this topic was unavailable.",
    "The study plan relies on the model's built-in knowledge of the subject.",
    "Check key claims against a textbook or primary source.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Single optional media input attached to a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaAttachment {
    /// Infer the kind from the MIME type (`video/*` is video, anything else image)
    pub fn from_mime(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        let mime_type = mime_type.into();
        let kind = if mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        Self {
            kind,
            mime_type,
            data,
        }
    }

    pub fn to_part(&self) -> Part {
        Part::InlineData {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }
}

/// What the user wants to learn about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInput {
    pub topic: String,
    pub media: Option<MediaAttachment>,
}

impl TopicInput {
    pub fn text(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            media: None,
        }
    }

    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(media);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.topic.trim().is_empty() && self.media.is_none()
    }

    /// Topic wording for prompts; media-only inputs refer to the attachment
    pub fn label(&self) -> String {
        let topic = self.topic.trim();
        if !topic.is_empty() {
            return topic.to_string();
        }
        match self.media.as_ref().map(|m| m.kind) {
            Some(MediaKind::Video) => "the concept shown in the attached video".to_string(),
            Some(MediaKind::Image) => "the concept shown in the attached image".to_string(),
            None => String::new(),
        }
    }
}

/// Result of context retrieval, computed once per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContext {
    pub facts: Vec<String>,
    pub search_summary: String,
}

impl TopicContext {
    pub fn fallback() -> Self {
        Self {
            facts: DEFAULT_FACTS.iter().map(|f| f.to_string()).collect(),
            search_summary: String::new(),
        }
    }

    pub fn has_summary(&self) -> bool {
        !self.search_summary.trim().is_empty()
    }
}

/// Research-backed plan: markdown narrative plus grounding sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub narrative: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPackage {
    pub notes_markdown: String,
    pub simulator_source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    FetchingContext,
    Analyzing,
    Authoring,
    Ready,
    SynthesizingSimulator,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FetchingContext => "fetching-context",
            Self::Analyzing => "analyzing",
            Self::Authoring => "authoring",
            Self::Ready => "ready",
            Self::SynthesizingSimulator => "synthesizing-simulator",
        };
        write!(f, "{}", name)
    }
}
