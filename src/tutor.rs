// src/tutor.rs
// Deep-dive chat grounded in the study notes

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::llm::{FallbackInvoker, GenerationRequest, HistoryEntry, ModelTier, Part, Role};
use crate::utils::prefix_chars;
use crate::{Result, StudioError};

/// Notes beyond this many characters are left out of the system instruction
pub const MAX_GROUNDING_CHARS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDiveTurn {
    pub role: Role,
    pub content: String,
}

impl DeepDiveTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

fn system_instruction(notes: &str) -> String {
    format!(
        "You are a patient tutor helping a learner go deeper into their study notes. \
         Answer follow-up questions using the notes as your primary source and say so when a \
         question goes beyond them.\n\n\
         Formatting: block math between $$ and $$, inline math between single $ signs, and \
         definitions as blockquotes starting with \"> **Definition:**\".\n\n\
         Study notes:\n{}",
        prefix_chars(notes, MAX_GROUNDING_CHARS)
    )
}

pub fn deep_dive_request(notes: &str, history: &[DeepDiveTurn], question: &str) -> GenerationRequest {
    let history = history
        .iter()
        .map(|turn| HistoryEntry {
            role: turn.role,
            text: turn.content.clone(),
        })
        .collect();

    GenerationRequest::new(ModelTier::Fast, vec![Part::text(question)])
        .with_history(history)
        .with_system(system_instruction(notes))
}

/// One chat turn. The reply text is returned verbatim.
#[instrument(skip_all, fields(history = history.len()))]
pub async fn deep_dive_turn(
    invoker: &FallbackInvoker,
    notes: &str,
    history: &[DeepDiveTurn],
    question: &str,
) -> Result<String> {
    if question.trim().is_empty() {
        return Err(StudioError::InvalidInput("question must not be empty".into()));
    }

    let response = invoker
        .invoke(&deep_dive_request(notes, history, question))
        .await?;
    if response.text.trim().is_empty() {
        return Err(StudioError::UnusableContent("tutor returned an empty reply".into()));
    }
    debug!(chars = response.text.len(), "Tutor replied");
    Ok(response.text)
}

/// Append-only conversation over one set of notes
pub struct DeepDiveSession {
    invoker: FallbackInvoker,
    notes: String,
    history: Vec<DeepDiveTurn>,
}

impl DeepDiveSession {
    pub fn new(invoker: FallbackInvoker, notes: impl Into<String>) -> Self {
        Self {
            invoker,
            notes: notes.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[DeepDiveTurn] {
        &self.history
    }

    /// Ask a question. History only grows when the call succeeds.
    pub async fn ask(&mut self, question: &str) -> Result<&str> {
        let reply = deep_dive_turn(&self.invoker, &self.notes, &self.history, question).await?;
        self.history.push(DeepDiveTurn::user(question));
        self.history.push(DeepDiveTurn::assistant(reply));
        Ok(self
            .history
            .last()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default())
    }
}
