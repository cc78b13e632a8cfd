// src/quiz.rs
// Schema-constrained multiple choice quiz from study notes

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::Result;
use crate::extract::extract_json;
use crate::llm::{FallbackInvoker, GenerationRequest, ModelTier, Part};
use crate::utils::prefix_chars;

/// Items produced per quiz
pub const QUIZ_LENGTH: usize = 5;

/// Options per item
pub const OPTION_COUNT: usize = 4;

/// Notes beyond this many characters are not sent
pub const MAX_NOTES_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub id: u32,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default, alias = "explanation")]
    pub rationale: String,
}

impl QuizItem {
    fn is_valid(&self) -> bool {
        self.options.len() == OPTION_COUNT
            && self.correct_index < self.options.len()
            && !self.prompt.trim().is_empty()
            && self.options.iter().all(|o| !o.trim().is_empty())
    }
}

/// Response schema: an array of quiz item objects
pub fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER" },
                "prompt": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": OPTION_COUNT,
                    "maxItems": OPTION_COUNT
                },
                "correctIndex": { "type": "INTEGER" },
                "rationale": { "type": "STRING" }
            },
            "required": ["id", "prompt", "options", "correctIndex", "rationale"]
        }
    })
}

pub fn quiz_request(notes: &str) -> GenerationRequest {
    let prompt = format!(
        "Create a quiz of exactly {count} multiple choice questions that test understanding of \
         the study notes below. Each question has exactly {options} options and one correct \
         answer; correctIndex is the zero-based index of that answer. Give a one or two \
         sentence rationale for each.\n\nStudy notes:\n{notes}",
        count = QUIZ_LENGTH,
        options = OPTION_COUNT,
        notes = prefix_chars(notes, MAX_NOTES_CHARS),
    );
    GenerationRequest::new(ModelTier::Fast, vec![Part::text(prompt)]).with_schema(quiz_schema())
}

/// Accept the whole quiz or nothing: exactly five items, each well formed
fn validate(items: Vec<QuizItem>) -> Vec<QuizItem> {
    if items.len() != QUIZ_LENGTH {
        warn!(count = items.len(), "Quiz has the wrong number of items, discarding");
        return Vec::new();
    }
    if let Some(bad) = items.iter().find(|item| !item.is_valid()) {
        warn!(
            id = bad.id,
            options = bad.options.len(),
            correct_index = bad.correct_index,
            "Quiz item failed validation, discarding quiz"
        );
        return Vec::new();
    }
    items
}

/// Generate a quiz for the notes.
///
/// Best effort: output that fails to parse or validate yields an empty list.
/// Remote failures are still returned as errors.
#[instrument(skip_all, fields(notes_chars = notes.chars().count()))]
pub async fn generate_quiz(invoker: &FallbackInvoker, notes: &str) -> Result<Vec<QuizItem>> {
    let response = invoker.invoke(&quiz_request(notes)).await?;

    let items = match extract_json::<Vec<QuizItem>>(&response.text) {
        Ok(items) => validate(items),
        Err(e) => {
            warn!(error = %e, "Quiz response did not parse");
            Vec::new()
        }
    };
    info!(items = items.len(), "Quiz generated");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StudioError;
    use crate::llm::{GenerationBackend, GenerationResponse, ModelRoster};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Canned {
        reply: std::result::Result<String, u16>,
        seen: Mutex<Option<GenerationRequest>>,
    }

    #[async_trait]
    impl GenerationBackend for Canned {
        async fn generate(
            &self,
            _model: &str,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse> {
            *self.seen.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(GenerationResponse::from_text(text.clone())),
                Err(status) => Err(StudioError::Api {
                    status: *status,
                    message: "failed".into(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn setup(reply: std::result::Result<String, u16>) -> (Arc<Canned>, FallbackInvoker) {
        let backend = Arc::new(Canned {
            reply,
            seen: Mutex::new(None),
        });
        (
            backend.clone(),
            FallbackInvoker::new(backend, ModelRoster::default()),
        )
    }

    fn item(id: u32, correct_index: usize) -> Value {
        json!({
            "id": id,
            "prompt": format!("Question {}", id),
            "options": ["a", "b", "c", "d"],
            "correctIndex": correct_index,
            "rationale": "because"
        })
    }

    fn quiz(items: Vec<Value>) -> String {
        Value::Array(items).to_string()
    }

    #[tokio::test]
    async fn test_valid_quiz_accepted() {
        let raw = quiz((1..=5).map(|i| item(i, (i as usize) % 4)).collect());
        let (backend, invoker) = setup(Ok(raw));

        let items = generate_quiz(&invoker, "Photosynthesis notes").await.unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.correct_index < i.options.len()));

        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.tier, ModelTier::Fast);
        assert!(seen.options.response_schema.is_some());
        assert!(!seen.options.enable_search);
    }

    #[tokio::test]
    async fn test_out_of_range_index_rejects_quiz() {
        let mut items: Vec<Value> = (1..=4).map(|i| item(i, 0)).collect();
        items.push(item(5, 4));
        let (_, invoker) = setup(Ok(quiz(items)));
        assert!(generate_quiz(&invoker, "notes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_count_rejects_quiz() {
        let (_, invoker) = setup(Ok(quiz((1..=3).map(|i| item(i, 1)).collect())));
        assert!(generate_quiz(&invoker, "notes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_three_options_rejects_quiz() {
        let mut items: Vec<Value> = (1..=4).map(|i| item(i, 0)).collect();
        items.push(json!({
            "id": 5, "prompt": "Q", "options": ["a", "b", "c"], "correctIndex": 0, "rationale": ""
        }));
        let (_, invoker) = setup(Ok(quiz(items)));
        assert!(generate_quiz(&invoker, "notes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_output_is_empty() {
        let (_, invoker) = setup(Ok("Here are some questions: 1) ...".into()));
        assert!(generate_quiz(&invoker, "notes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let (_, invoker) = setup(Err(429));
        assert!(generate_quiz(&invoker, "notes").await.is_err());
    }

    #[test]
    fn test_notes_truncated_to_prefix() {
        let notes = "x".repeat(MAX_NOTES_CHARS + 500);
        let request = quiz_request(&notes);
        let Part::Text(prompt) = &request.parts[0] else {
            panic!("expected text part");
        };
        let xs = prompt.chars().filter(|c| *c == 'x').count();
        // prompt wording itself contains a few 'x' characters
        assert!(xs >= MAX_NOTES_CHARS && xs < MAX_NOTES_CHARS + 50);
    }

    #[test]
    fn test_item_aliases() {
        let item: QuizItem = serde_json::from_str(
            r#"{"id": 1, "question": "Q?", "options": ["a","b","c","d"], "correctIndex": 2, "explanation": "e"}"#,
        )
        .unwrap();
        assert_eq!(item.prompt, "Q?");
        assert_eq!(item.rationale, "e");
    }
}
