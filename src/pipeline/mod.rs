// src/pipeline/mod.rs
// Study session state machine: context -> plan -> notes -> (simulator)

mod phases;
pub mod prompts;
mod types;

pub use phases::{analyze, author, fetch_context, synthesize_simulator, usable_citations};
pub use prompts::AnalysisGrounding;
pub use types::{
    DEFAULT_FACTS, MAX_FACTS, MediaAttachment, MediaKind, PipelineState, StudyPackage, StudyPlan,
    TopicContext, TopicInput,
};

use tracing::{info, instrument, warn};

use crate::llm::FallbackInvoker;
use crate::{Result, StudioError};

/// One topic's trip through the pipeline.
///
/// Phases run strictly in order and never retry on their own. Any failure
/// puts the session back in `Idle` with the error returned; earlier outputs
/// stay readable. The topic context is fetched at most once and reused by
/// every later run.
pub struct StudySession {
    invoker: FallbackInvoker,
    input: TopicInput,
    state: PipelineState,
    context: Option<TopicContext>,
    plan: Option<StudyPlan>,
    package: Option<StudyPackage>,
}

impl StudySession {
    pub fn new(invoker: FallbackInvoker, input: TopicInput) -> Result<Self> {
        if input.is_empty() {
            return Err(StudioError::InvalidInput(
                "a topic or a media attachment is required".into(),
            ));
        }
        Ok(Self {
            invoker,
            input,
            state: PipelineState::Idle,
            context: None,
            plan: None,
            package: None,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn input(&self) -> &TopicInput {
        &self.input
    }

    pub fn context(&self) -> Option<&TopicContext> {
        self.context.as_ref()
    }

    pub fn plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn package(&self) -> Option<&StudyPackage> {
        self.package.as_ref()
    }

    /// Drive the forward path from `Idle` to `Ready`
    #[instrument(skip(self), fields(topic = %self.input.label()))]
    pub async fn run(&mut self) -> Result<&StudyPackage> {
        self.expect_state(PipelineState::Idle, "run")?;

        let context = if let Some(cached) = self.context.clone() {
            cached
        } else {
            self.state = PipelineState::FetchingContext;
            let fetched = fetch_context(&self.invoker, &self.input).await;
            self.context = Some(fetched.clone());
            fetched
        };

        self.state = PipelineState::Analyzing;
        let plan = match analyze(&self.invoker, &self.input, &context).await {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e)),
        };
        self.plan = Some(plan.clone());

        self.state = PipelineState::Authoring;
        let notes = match author(&self.invoker, &self.input, &plan).await {
            Ok(notes) => notes,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = PipelineState::Ready;
        info!("Study package ready");
        Ok(self.package.insert(StudyPackage {
            notes_markdown: notes,
            simulator_source: None,
        }))
    }

    /// Re-author the notes from the stored plan. The simulator source, if
    /// any, is kept.
    #[instrument(skip(self))]
    pub async fn regenerate_notes(&mut self) -> Result<&StudyPackage> {
        self.expect_state(PipelineState::Ready, "regenerate notes")?;
        let plan = self.stored_plan()?;

        self.state = PipelineState::Authoring;
        let notes = match author(&self.invoker, &self.input, &plan).await {
            Ok(notes) => notes,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = PipelineState::Ready;
        let simulator_source = self.package.take().and_then(|p| p.simulator_source);
        Ok(self.package.insert(StudyPackage {
            notes_markdown: notes,
            simulator_source,
        }))
    }

    /// Generate the interactive simulator for the ready package.
    ///
    /// Returns `Ok(None)` and leaves the package untouched when the model
    /// produced no usable source; the caller decides whether to ask again.
    #[instrument(skip(self))]
    pub async fn synthesize_simulator(&mut self) -> Result<Option<&str>> {
        self.expect_state(PipelineState::Ready, "synthesize simulator")?;
        let plan = self.stored_plan()?;
        let notes = match &self.package {
            Some(package) => package.notes_markdown.clone(),
            None => return Err(StudioError::InvalidState("no study notes to build on".into())),
        };

        self.state = PipelineState::SynthesizingSimulator;
        let source =
            match synthesize_simulator(&self.invoker, &self.input, &plan, &notes).await {
                Ok(source) => source,
                Err(e) => return Err(self.fail(e)),
            };

        self.state = PipelineState::Ready;
        let Some(package) = self.package.as_mut() else {
            return Ok(None);
        };
        match source {
            Some(html) => {
                package.simulator_source = Some(html);
                Ok(package.simulator_source.as_deref())
            }
            None => Ok(None),
        }
    }

    fn stored_plan(&self) -> Result<StudyPlan> {
        self.plan
            .clone()
            .ok_or_else(|| StudioError::InvalidState("no study plan available".into()))
    }

    fn expect_state(&self, expected: PipelineState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(StudioError::InvalidState(format!(
                "cannot {} while {} (expected {})",
                action, self.state, expected
            )))
        }
    }

    fn fail(&mut self, err: StudioError) -> StudioError {
        warn!(state = %self.state, error = %err, "Pipeline phase failed, returning to idle");
        self.state = PipelineState::Idle;
        err
    }
}
