// src/pipeline/prompts.rs
// Request construction for each pipeline phase

use super::types::{MAX_FACTS, MediaKind, StudyPlan, TopicContext, TopicInput};
use crate::llm::{GenerationRequest, ModelTier, Part};

/// Thinking budget for plan analysis (several silent self-review passes)
pub const ANALYSIS_THINKING_BUDGET: u32 = 16_384;

/// Thinking budget for simulator synthesis, the largest in the pipeline
pub const SIMULATOR_THINKING_BUDGET: u32 = 32_768;

/// Headings the plan narrative is organised under
pub const PLAN_SECTIONS: [&str; 4] = [
    "## 1. Concept Analysis",
    "## 2. Simulator Concept",
    "## 3. Visual Identity",
    "## 4. Sources",
];

const NOTATION_RULES: &str = r#"Formatting conventions:
- Block math goes between $$ and $$ on their own lines; inline math between single $ signs.
- Every definition is a blockquote callout starting with "> **Definition:**".
- Use a single # title, ## for major sections and ### for subsections."#;

/// How the analysis call is grounded.
///
/// A non-empty cached summary replaces live search entirely; search is only
/// switched on when there is no summary to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisGrounding {
    CachedContext,
    LiveSearch,
}

impl AnalysisGrounding {
    pub fn for_context(context: &TopicContext) -> Self {
        if context.has_summary() {
            Self::CachedContext
        } else {
            Self::LiveSearch
        }
    }

    pub fn search_enabled(&self) -> bool {
        matches!(self, Self::LiveSearch)
    }
}

/// Fast-tier search call for facts + summary. JSON is requested in the prompt
/// text because search grounding cannot be combined with a response schema.
pub fn context_request(input: &TopicInput) -> GenerationRequest {
    let prompt = format!(
        r#"Research the topic "{topic}" using web search.

Return ONLY a raw JSON object, with no prose and no markdown, in exactly this shape:
{{"facts": ["...", "..."], "summary": "..."}}

- "facts": exactly {count} short, verifiable, distinct facts about the topic.
- "summary": one paragraph summarising the current understanding of the topic, including common misconceptions."#,
        topic = input.label(),
        count = MAX_FACTS,
    );

    GenerationRequest::new(ModelTier::Fast, vec![Part::text(prompt)]).with_search(true)
}

fn media_phrase(input: &TopicInput) -> Option<&'static str> {
    input.media.as_ref().map(|m| match m.kind {
        MediaKind::Video => "Watch the attached video carefully; it shows the learner's starting point.",
        MediaKind::Image => "Study the attached image carefully; it shows the learner's starting point.",
    })
}

/// Primary-tier plan analysis request
pub fn analysis_request(input: &TopicInput, context: &TopicContext) -> GenerationRequest {
    let grounding = AnalysisGrounding::for_context(context);
    let mut prompt = format!("Topic: {}\n\n", input.label());

    if let Some(phrase) = media_phrase(input) {
        prompt.push_str(phrase);
        prompt.push_str("\n\n");
    }

    match grounding {
        AnalysisGrounding::CachedContext => {
            prompt.push_str("Research already gathered for this topic (do not search again):\n");
            prompt.push_str(context.search_summary.trim());
            prompt.push_str("\n\nKey facts:\n");
            for fact in &context.facts {
                prompt.push_str("- ");
                prompt.push_str(fact);
                prompt.push('\n');
            }
            prompt.push('\n');
        }
        AnalysisGrounding::LiveSearch => {
            prompt.push_str(
                "No prior research is available. Use web search to ground every claim.\n\n",
            );
        }
    }

    prompt.push_str(&format!(
        r#"Write a study plan in markdown with exactly these four sections, in order:

{analysis}
Identify the flaws, gaps and misconceptions in how this concept is usually presented or understood.

{simulator}
A technical plan for an interactive simulation of the concept. Name at least 3 adjustable parameters, their ranges and units, and the UI control (slider, toggle, dropdown) that drives each one. Describe what the learner should see change.

{visual}
Typography (font families and sizes), an explicit colour palette given as hex values, and the layout of the simulation and its control panel.

{sources}
A list of supporting sources with titles and links.

Before answering, review your plan critically and fix any inaccuracies."#,
        analysis = PLAN_SECTIONS[0],
        simulator = PLAN_SECTIONS[1],
        visual = PLAN_SECTIONS[2],
        sources = PLAN_SECTIONS[3],
    ));

    let mut parts = vec![Part::text(prompt)];
    if let Some(media) = &input.media {
        parts.push(media.to_part());
    }

    GenerationRequest::new(ModelTier::Primary, parts)
        .with_search(grounding.search_enabled())
        .with_thinking_budget(ANALYSIS_THINKING_BUDGET)
}

/// Primary-tier study notes request
pub fn authoring_request(input: &TopicInput, plan: &StudyPlan) -> GenerationRequest {
    let prompt = format!(
        r#"Topic: {topic}

Approved study plan:
{plan}

Write comprehensive study notes for this topic, following the plan's concept analysis.
Write the notes ONLY. Do not write any HTML, JavaScript or simulator code; the simulator is produced separately.

{rules}"#,
        topic = input.label(),
        plan = plan.narrative,
        rules = NOTATION_RULES,
    );

    GenerationRequest::new(ModelTier::Primary, vec![Part::text(prompt)])
}

/// Primary-tier interactive simulator request
pub fn simulator_request(input: &TopicInput, plan: &StudyPlan, notes: &str) -> GenerationRequest {
    let prompt = format!(
        r#"Topic: {topic}

Study plan:
{plan}

Study notes:
{notes}

Build the interactive simulator described in the plan's "Simulator Concept" section, styled exactly as its "Visual Identity" section specifies.

Requirements:
- One self-contained HTML document with inline <style> and <script>; no external files.
- Responsive layout that works from phone to desktop widths.
- A control panel whose controls update the simulation in real time.
- An animation loop driven by requestAnimationFrame.

Return the complete document in a single ```html fenced code block."#,
        topic = input.label(),
        plan = plan.narrative,
        notes = notes,
    );

    GenerationRequest::new(ModelTier::Primary, vec![Part::text(prompt)])
        .with_thinking_budget(SIMULATOR_THINKING_BUDGET)
}
