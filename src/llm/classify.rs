// src/llm/classify.rs
// Failure classification for remote generation errors
//
// The endpoint does not expose a typed taxonomy, so classification inspects
// the status code and error text. Keep all matching here.

use crate::StudioError;

/// Substrings (lowercase) that mark a model/tier as missing or not entitled
pub const NOT_FOUND_SIGNALS: &[&str] = &[
    "404",
    "not found",
    "not_found",
    "is not supported",
    "unsupported model",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Model or capability unavailable for this credential; a lower tier may work
    NotFoundOrUnsupported,
    /// Anything else: propagate to the caller
    Fatal,
}

pub fn classify(err: &StudioError) -> FailureClass {
    match err {
        StudioError::Api { status: 404, .. } => FailureClass::NotFoundOrUnsupported,
        StudioError::Api { message, .. } if matches_not_found(message) => {
            FailureClass::NotFoundOrUnsupported
        }
        StudioError::CapabilityUnavailable(_) => FailureClass::NotFoundOrUnsupported,
        _ => FailureClass::Fatal,
    }
}

fn matches_not_found(message: &str) -> bool {
    let lower = message.to_lowercase();
    NOT_FOUND_SIGNALS.iter().any(|signal| lower.contains(signal))
}
