// src/llm/mod.rs
// Generation endpoint clients, tier fallback and failure classification

pub mod classify;
mod fallback;
mod gemini;
mod http_client;
mod logging;
mod provider;
pub mod types;

pub use classify::{FailureClass, classify};
pub use fallback::FallbackInvoker;
pub use gemini::{GEMINI_API_ROOT, GeminiClient};
pub use provider::{
    AspectRatio, GenerationBackend, InlineMedia, ModelRoster, OperationBackend, VideoJob,
};
pub use types::{
    Citation, GenerationOptions, GenerationRequest, GenerationResponse, HistoryEntry,
    LongRunningOperation, ModelTier, OperationStatus, Part, ResponsePart, Role, Usage,
};
