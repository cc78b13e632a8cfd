// src/error.rs
// Standardized error types for studyforge

use thiserror::Error;

/// User-facing failure classes.
///
/// The presentation layer only needs to tell these three apart; every
/// `StudioError` maps onto exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested model or capability is not available for this credential
    CapabilityUnavailable,
    /// The remote call failed (network, quota, server error, cancellation)
    GenerationFailed,
    /// The call succeeded but the output could not be used
    UnusableContent,
}

/// Main error type for the studyforge library
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("capability unavailable for this entitlement: {0}")]
    CapabilityUnavailable(String),

    #[error("unusable content: {0}")]
    UnusableContent(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid pipeline state: {0}")]
    InvalidState(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation did not finish within {0:?}")]
    DeadlineExceeded(std::time::Duration),
}

/// Convenience type alias for Result using StudioError
pub type Result<T> = std::result::Result<T, StudioError>;

impl StudioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapabilityUnavailable(_) => ErrorKind::CapabilityUnavailable,
            Self::UnusableContent(_) | Self::Json(_) => ErrorKind::UnusableContent,
            Self::Api { .. }
            | Self::InvalidInput(_)
            | Self::InvalidState(_)
            | Self::Http(_)
            | Self::Io(_)
            | Self::Config(_)
            | Self::Cancelled
            | Self::DeadlineExceeded(_) => ErrorKind::GenerationFailed,
        }
    }

    /// Human-readable message for the presentation layer
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::CapabilityUnavailable => format!(
                "This capability is not available for your API key or plan. ({})",
                self
            ),
            ErrorKind::GenerationFailed => format!("Generation failed: {}", self),
            ErrorKind::UnusableContent => format!(
                "The model produced content that could not be used: {}",
                self
            ),
        }
    }
}

impl From<StudioError> for String {
    fn from(err: StudioError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Display tests
    // ============================================================================

    #[test]
    fn test_api_error_display() {
        let err = StudioError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_capability_unavailable_display() {
        let err = StudioError::CapabilityUnavailable("veo".to_string());
        assert!(err.to_string().contains("capability unavailable"));
    }

    #[test]
    fn test_deadline_display() {
        let err = StudioError::DeadlineExceeded(std::time::Duration::from_secs(60));
        assert!(err.to_string().contains("60s"));
    }

    // ============================================================================
    // Classification tests
    // ============================================================================

    #[test]
    fn test_kinds_are_distinct() {
        assert_eq!(
            StudioError::CapabilityUnavailable("x".into()).kind(),
            ErrorKind::CapabilityUnavailable
        );
        assert_eq!(
            StudioError::UnusableContent("x".into()).kind(),
            ErrorKind::UnusableContent
        );
        assert_eq!(
            StudioError::Api {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::GenerationFailed
        );
        assert_eq!(StudioError::Cancelled.kind(), ErrorKind::GenerationFailed);
    }

    #[test]
    fn test_json_error_is_unusable_content() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: StudioError = json_err.into();
        assert_eq!(err.kind(), ErrorKind::UnusableContent);
    }

    #[test]
    fn test_user_messages_differ_by_kind() {
        let unavailable = StudioError::CapabilityUnavailable("veo".into()).user_message();
        let failed = StudioError::Cancelled.user_message();
        let unusable = StudioError::UnusableContent("empty".into()).user_message();
        assert!(unavailable.contains("not available"));
        assert!(failed.starts_with("Generation failed"));
        assert!(unusable.contains("could not be used"));
    }

    #[test]
    fn test_into_string() {
        let s: String = StudioError::InvalidInput("empty topic".into()).into();
        assert!(s.contains("invalid input"));
    }
}
