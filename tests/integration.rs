//! Integration tests for the study pipeline and the ancillary generators
//!
//! The remote model is replaced by an in-process mock; everything above the
//! backend trait runs for real.


use std::sync::Arc;
use studyforge::ErrorKind;
use studyforge::llm::{FallbackInvoker, ModelRoster, ModelTier};
use studyforge::pipeline::{PipelineState, StudySession, TopicInput};
use studyforge::quiz::generate_quiz;
use studyforge::tutor::DeepDiveSession;
use test_utils::{MockModel, Phase};

fn invoker(model: Arc<MockModel>) -> FallbackInvoker {
    FallbackInvoker::new(model, ModelRoster::default())
}

#[tokio::test]
async fn test_photosynthesis_end_to_end() {
    let model = Arc::new(MockModel::new());
    let mut session =
        StudySession::new(invoker(model.clone()), TopicInput::text("Photosynthesis")).unwrap();

    let package = session.run().await.unwrap().clone();
    assert_eq!(session.state(), PipelineState::Ready);

    let context = session.context().unwrap();
    assert_eq!(context.facts.len(), 20);
    assert!(context.has_summary());

    let plan = session.plan().unwrap();
    for heading in ["Concept Analysis", "Simulator Concept", "Visual Identity", "Sources"] {
        assert!(plan.narrative.contains(heading), "missing {}", heading);
    }
    assert!(plan.narrative.matches("slider").count() >= 3);
    // only the citation with a real URL survives
    assert_eq!(plan.citations.len(), 1);

    assert!(package.notes_markdown.contains("$$"));
    assert!(package.notes_markdown.contains("> **Definition:**"));
    assert!(package.simulator_source.is_none());

    let first = session.synthesize_simulator().await.unwrap().unwrap().to_string();
    let second = session.synthesize_simulator().await.unwrap().unwrap().to_string();
    assert!(first.starts_with("<!DOCTYPE html>"));
    assert!(!second.is_empty());
    assert_ne!(first, second);
    assert_eq!(
        session.package().unwrap().simulator_source.as_deref(),
        Some(second.as_str())
    );

    assert_eq!(model.count(Phase::Facts), 1);
    assert_eq!(model.count(Phase::Plan), 1);
    assert_eq!(model.count(Phase::Notes), 1);
    assert_eq!(model.count(Phase::Simulator), 2);
}

#[tokio::test]
async fn test_cached_summary_disables_search_for_analysis() {
    let model = Arc::new(MockModel::new());
    let mut session =
        StudySession::new(invoker(model.clone()), TopicInput::text("Photosynthesis")).unwrap();
    session.run().await.unwrap();

    let calls = model.calls();
    let (_, _, facts) = calls.iter().find(|(_, p, _)| *p == Phase::Facts).unwrap();
    let (_, _, plan) = calls.iter().find(|(_, p, _)| *p == Phase::Plan).unwrap();
    assert!(facts.options.enable_search);
    assert!(!plan.options.enable_search);
    assert!(test_utils::first_text(plan).contains("converts light, water and CO2"));
}

#[tokio::test]
async fn test_unavailable_primary_falls_back_silently() {
    let roster = ModelRoster::default();
    let model = Arc::new(MockModel::new().without_model(&roster.primary));
    let mut session =
        StudySession::new(invoker(model.clone()), TopicInput::text("Photosynthesis")).unwrap();

    session.run().await.unwrap();
    assert_eq!(session.state(), PipelineState::Ready);

    let calls = model.calls();
    let plan_calls: Vec<_> = calls.iter().filter(|(_, p, _)| *p == Phase::Plan).collect();
    assert_eq!(plan_calls.len(), 2);
    assert_eq!(plan_calls[0].0, roster.primary);
    assert_eq!(plan_calls[1].0, roster.secondary);
    assert_eq!(plan_calls[0].2, plan_calls[1].2);
    assert_eq!(plan_calls[1].2.tier, ModelTier::Primary);
}

#[tokio::test]
async fn test_unavailable_fast_tier_uses_default_facts() {
    let roster = ModelRoster::default();
    let model = Arc::new(MockModel::new().without_model(&roster.fast));
    let mut session =
        StudySession::new(invoker(model.clone()), TopicInput::text("Photosynthesis")).unwrap();

    session.run().await.unwrap();
    let context = session.context().unwrap();
    assert_eq!(context.facts.len(), 3);
    assert!(!context.has_summary());

    // no summary to inject, so analysis searches live
    let calls = model.calls();
    let (_, _, plan) = calls.iter().find(|(_, p, _)| *p == Phase::Plan).unwrap();
    assert!(plan.options.enable_search);
    assert_eq!(model.count(Phase::Facts), 1);
}

#[tokio::test]
async fn test_both_text_tiers_unavailable_is_capability_error() {
    let roster = ModelRoster::default();
    let model = Arc::new(
        MockModel::new()
            .without_model(&roster.primary)
            .without_model(&roster.secondary),
    );
    let mut session =
        StudySession::new(invoker(model.clone()), TopicInput::text("Photosynthesis")).unwrap();

    let err = session.run().await.unwrap_err();
    assert_eq!(session.state(), PipelineState::Idle);
    assert_eq!(err.kind(), ErrorKind::CapabilityUnavailable);
    assert!(err.user_message().contains("not available"));
    // one primary attempt and one secondary attempt, no further hops
    assert_eq!(model.count(Phase::Plan), 2);
}

#[tokio::test]
async fn test_quiz_on_short_notes_is_all_or_nothing() {
    let model = Arc::new(MockModel::new());
    let notes = "Photosynthesis turns light into chemical energy...";
    assert_eq!(notes.chars().count(), 50);

    let items = generate_quiz(&invoker(model), notes).await.unwrap();
    assert!(items.is_empty() || items.len() == 5);
    for item in &items {
        assert_eq!(item.options.len(), 4);
        assert!(item.correct_index < item.options.len());
    }
}

#[tokio::test]
async fn test_deep_dive_conversation() {
    let model = Arc::new(MockModel::new());
    let mut chat = DeepDiveSession::new(invoker(model.clone()), test_utils::NOTES);

    let reply = chat.ask("Why is chlorophyll green?").await.unwrap().to_string();
    assert!(reply.contains("chlorophyll"));
    chat.ask("What limits the rate?").await.unwrap();

    assert_eq!(chat.history().len(), 4);
    let calls = model.calls();
    let (_, _, last) = calls.last().unwrap();
    assert_eq!(last.tier, ModelTier::Fast);
    assert_eq!(last.history.len(), 2);
    assert!(
        last.options
            .system_instruction
            .as_deref()
            .unwrap()
            .contains("Definition:")
    );
}
