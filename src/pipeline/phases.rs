// src/pipeline/phases.rs
// One remote call per phase; each phase is a free function over the invoker

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::prompts::{analysis_request, authoring_request, context_request, simulator_request};
use super::types::{MAX_FACTS, StudyPlan, TopicContext, TopicInput};
use crate::extract::{extract_fenced_block, extract_json};
use crate::llm::{Citation, FallbackInvoker};
use crate::{Result, StudioError};

/// Shape the fact retrieval prompt asks for
#[derive(Debug, Deserialize)]
struct FactSheet {
    facts: Vec<String>,
    #[serde(default, alias = "searchSummary", alias = "search_summary")]
    summary: String,
}

impl FactSheet {
    /// `None` when no non-blank fact survives
    fn into_context(self) -> Option<TopicContext> {
        let facts: Vec<String> = self
            .facts
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .take(MAX_FACTS)
            .collect();
        if facts.is_empty() {
            return None;
        }

        Some(TopicContext {
            facts,
            search_summary: self.summary.trim().to_string(),
        })
    }
}

/// Retrieve facts and a summary for the topic. Never fails: any remote or
/// parse failure yields [`TopicContext::fallback`].
#[instrument(skip_all, fields(topic = %input.label()))]
pub async fn fetch_context(invoker: &FallbackInvoker, input: &TopicInput) -> TopicContext {
    let response = match invoker.invoke(&context_request(input)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Context retrieval failed, using default facts");
            return TopicContext::fallback();
        }
    };

    let sheet = match extract_json::<FactSheet>(&response.text) {
        Ok(sheet) => sheet,
        Err(e) => {
            warn!(error = %e, "Unparsable fact sheet, using default facts");
            return TopicContext::fallback();
        }
    };

    match sheet.into_context() {
        Some(context) => {
            info!(
                facts = context.facts.len(),
                has_summary = context.has_summary(),
                "Context retrieved"
            );
            context
        }
        None => {
            warn!("Fact sheet held no facts, using default facts");
            TopicContext::fallback()
        }
    }
}

/// Keep citations whose URI is an absolute http(s) URL, dropping duplicates
pub fn usable_citations(citations: Vec<Citation>) -> Vec<Citation> {
    let mut kept: Vec<Citation> = Vec::with_capacity(citations.len());
    for citation in citations {
        let valid = Url::parse(&citation.uri)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            debug!(uri = %citation.uri, "Dropping citation with unusable URI");
            continue;
        }
        if kept.iter().any(|c| c.uri == citation.uri) {
            continue;
        }
        kept.push(citation);
    }
    kept
}

/// Produce the study plan narrative and its grounding sources
#[instrument(skip_all, fields(topic = %input.label()))]
pub async fn analyze(
    invoker: &FallbackInvoker,
    input: &TopicInput,
    context: &TopicContext,
) -> Result<StudyPlan> {
    let response = invoker.invoke(&analysis_request(input, context)).await?;

    let narrative = response.text.trim().to_string();
    if narrative.is_empty() {
        return Err(StudioError::UnusableContent(
            "analysis returned an empty plan".into(),
        ));
    }

    let citations = usable_citations(response.citations);
    info!(
        chars = narrative.len(),
        citations = citations.len(),
        "Study plan ready"
    );
    Ok(StudyPlan {
        narrative,
        citations,
    })
}

/// Write the study notes for an approved plan
#[instrument(skip_all, fields(topic = %input.label()))]
pub async fn author(
    invoker: &FallbackInvoker,
    input: &TopicInput,
    plan: &StudyPlan,
) -> Result<String> {
    let response = invoker.invoke(&authoring_request(input, plan)).await?;

    if response.text.trim().is_empty() {
        return Err(StudioError::UnusableContent(
            "authoring returned empty notes".into(),
        ));
    }
    info!(chars = response.text.len(), "Study notes written");
    Ok(response.text)
}

/// Generate the interactive simulator. `Ok(None)` means the model answered
/// without a complete, non-empty `html` block.
#[instrument(skip_all, fields(topic = %input.label()))]
pub async fn synthesize_simulator(
    invoker: &FallbackInvoker,
    input: &TopicInput,
    plan: &StudyPlan,
    notes: &str,
) -> Result<Option<String>> {
    let response = invoker
        .invoke(&simulator_request(input, plan, notes))
        .await?;

    let source =
        extract_fenced_block(&response.text, "html").filter(|html| !html.trim().is_empty());
    match &source {
        Some(html) => info!(chars = html.len(), "Simulator source extracted"),
        None => warn!("Simulator response contained no html block"),
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GenerationBackend, GenerationRequest, GenerationResponse, ModelRoster};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Answers every call with the same text
    struct Fixed(std::result::Result<GenerationResponse, u16>);

    #[async_trait]
    impl GenerationBackend for Fixed {
        async fn generate(
            &self,
            _model: &str,
            _request: &GenerationRequest,
        ) -> Result<GenerationResponse> {
            match &self.0 {
                Ok(r) => Ok(r.clone()),
                Err(status) => Err(StudioError::Api {
                    status: *status,
                    message: "boom".into(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn invoker(answer: std::result::Result<GenerationResponse, u16>) -> FallbackInvoker {
        FallbackInvoker::new(Arc::new(Fixed(answer)), ModelRoster::default())
    }

    fn topic() -> TopicInput {
        TopicInput::text("Photosynthesis")
    }

    #[tokio::test]
    async fn test_fetch_context_parses_fact_sheet() {
        let raw = r#"```json
{"facts": ["Light reactions occur in the thylakoid", "  ", "The Calvin cycle fixes CO2"], "summary": "Plants turn light into sugar."}
```"#;
        let ctx = fetch_context(&invoker(Ok(GenerationResponse::from_text(raw))), &topic()).await;
        assert_eq!(ctx.facts.len(), 2);
        assert_eq!(ctx.search_summary, "Plants turn light into sugar.");
    }

    #[tokio::test]
    async fn test_fetch_context_truncates_to_twenty() {
        let facts: Vec<String> = (0..35).map(|i| format!("fact {}", i)).collect();
        let raw = serde_json::json!({"facts": facts, "summary": "s"}).to_string();
        let ctx = fetch_context(&invoker(Ok(GenerationResponse::from_text(raw))), &topic()).await;
        assert_eq!(ctx.facts.len(), MAX_FACTS);
        assert_eq!(ctx.facts[19], "fact 19");
    }

    #[tokio::test]
    async fn test_fetch_context_malformed_json_uses_defaults() {
        let ctx = fetch_context(
            &invoker(Ok(GenerationResponse::from_text("{\"facts\": [\"a\","))),
            &topic(),
        )
        .await;
        assert_eq!(ctx, TopicContext::fallback());
        assert_eq!(ctx.facts.len(), 3);
        assert!(ctx.search_summary.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_context_wrong_shape_uses_defaults() {
        for raw in [
            r#"{"error": "search unavailable"}"#,
            "[]",
            r#"{"facts": [], "summary": "nothing found"}"#,
            r#"{"facts": ["  ", ""]}"#,
        ] {
            let ctx =
                fetch_context(&invoker(Ok(GenerationResponse::from_text(raw))), &topic()).await;
            assert_eq!(ctx, TopicContext::fallback(), "payload {}", raw);
        }
    }

    #[tokio::test]
    async fn test_fetch_context_remote_failure_uses_defaults() {
        let ctx = fetch_context(&invoker(Err(503)), &topic()).await;
        assert_eq!(ctx, TopicContext::fallback());
    }

    #[test]
    fn test_usable_citations_filters_and_dedups() {
        let cite = |uri: &str| Citation {
            title: "t".into(),
            uri: uri.into(),
        };
        let kept = usable_citations(vec![
            cite("https://en.wikipedia.org/wiki/Photosynthesis"),
            cite("not a url"),
            cite("ftp://example.com/file"),
            cite("https://en.wikipedia.org/wiki/Photosynthesis"),
            cite("http://example.org/chlorophyll"),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].uri, "http://example.org/chlorophyll");
    }

    #[tokio::test]
    async fn test_analyze_empty_output_is_unusable() {
        let err = analyze(
            &invoker(Ok(GenerationResponse::from_text("  \n"))),
            &topic(),
            &TopicContext::fallback(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StudioError::UnusableContent(_)));
    }

    #[tokio::test]
    async fn test_synthesize_without_fence_is_none() {
        let plan = StudyPlan {
            narrative: "plan".into(),
            citations: vec![],
        };
        let out = synthesize_simulator(
            &invoker(Ok(GenerationResponse::from_text("I cannot build that."))),
            &topic(),
            &plan,
            "notes",
        )
        .await
        .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_synthesize_empty_fence_is_none() {
        let plan = StudyPlan {
            narrative: "plan".into(),
            citations: vec![],
        };
        for raw in ["```html\n```", "Here it is:\n```html\n   \n\n```\n"] {
            let out = synthesize_simulator(
                &invoker(Ok(GenerationResponse::from_text(raw))),
                &topic(),
                &plan,
                "notes",
            )
            .await
            .unwrap();
            assert!(out.is_none(), "payload {:?}", raw);
        }
    }
}
