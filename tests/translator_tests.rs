//! End-to-end translation against the demo dataset with a scripted model

mod common;

use async_trait::async_trait;
use common::{translator, CountingEngine, FakeModel, FixedSchema};
use nlq::application::translate::{EMPTY_QUESTION, NO_QUERY_FOUND, SCHEMA_UNAVAILABLE};
use nlq::domain::error::NlqError;
use nlq::domain::model::{
    TranslateRequest, TranslationOutcome, TranslationRequest, TranslationResponse,
};
use nlq::domain::traits::ReferenceSource;
use nlq::infrastructure::reference::StaticReference;
use nlq::Translator;
use serde_json::json;
use std::sync::Arc;

async fn ask(model: &Arc<FakeModel>, question: &str) -> (TranslationOutcome, Arc<CountingEngine>) {
    let (translator, engine) = translator(model.clone());
    let outcome = translator.translate(&TranslationRequest::new(question)).await;
    (outcome, engine)
}

#[tokio::test]
async fn test_prose_wrapped_query_returns_data() {
    let model = FakeModel::replying("Here you go: { schools { id schoolName } } Hope that helps.");
    let (outcome, engine) = ask(&model, "list schools").await;

    assert_eq!(
        outcome,
        TranslationOutcome::Data(json!({
            "schools": [
                { "id": "1", "schoolName": "University of Illinois Urbana-Champaign" },
                { "id": "2", "schoolName": "University of Michigan" },
                { "id": "3", "schoolName": "Purdue University" }
            ]
        }))
    );
    assert_eq!(model.calls(), 1);
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_unknown_field_returns_engine_errors() {
    let model = FakeModel::replying("{ schools { mascot } }");
    let (outcome, engine) = ask(&model, "what are the school mascots?").await;

    assert_eq!(
        outcome,
        TranslationOutcome::QueryErrors(vec![
            r#"Cannot query field "mascot" on type "School"."#.to_string()
        ])
    );
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_model_failure_becomes_llm_error() {
    let model = FakeModel::failing(|| NlqError::Status {
        status: 429,
        body: "rate limited".to_string(),
    });
    let (outcome, engine) = ask(&model, "thefts at Purdue last week").await;

    let reason = outcome.clone().failure_reason();
    assert!(reason.contains("429"), "unexpected reason: {}", reason);
    assert_eq!(model.calls(), 1);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_empty_question_never_reaches_model() {
    let model = FakeModel::replying("{ schools { id } }");
    for question in ["", "   \n\t "] {
        let (outcome, engine) = ask(&model, question).await;
        assert_eq!(outcome, TranslationOutcome::failure(EMPTY_QUESTION));
        assert_eq!(engine.calls(), 0);
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_refusal_carries_model_reason() {
    let model = FakeModel::replying("ERROR: ambiguous date range\nplease specify a year");
    let (outcome, engine) = ask(&model, "crimes last spring").await;

    assert_eq!(outcome, TranslationOutcome::failure("ambiguous date range"));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_refusal_without_reason() {
    let model = FakeModel::replying("<think>no idea</think>ERROR:");
    let (outcome, _) = ask(&model, "why?").await;
    assert_eq!(outcome, TranslationOutcome::failure("model declined to answer"));
}

#[tokio::test]
async fn test_reasoning_and_fence_are_stripped() {
    let model = FakeModel::replying(
        "<think>The user wants thefts. {not a query}</think>\n```graphql\nquery Thefts {\n  crimeLogs(description_contains: \"theft\") { caseNumber }\n}\n```",
    );
    let (outcome, _) = ask(&model, "show me thefts").await;

    assert_eq!(
        outcome,
        TranslationOutcome::Data(json!({
            "crimeLogs": [{ "caseNumber": "UI25-01234" }, { "caseNumber": "PU25-3321" }]
        }))
    );
}

#[tokio::test]
async fn test_mutation_rejected_before_execution() {
    let model = FakeModel::replying("mutation { deleteSchool(id: \"1\") { id } }");
    let (outcome, engine) = ask(&model, "delete the first school").await;

    assert_eq!(
        outcome,
        TranslationOutcome::failure("only read queries are permitted, model produced a mutation")
    );
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_fenced_mutation_rejected_before_execution() {
    let model = FakeModel::replying("```mutation { deleteSchool(id: 1) { id } }\n```");
    let (outcome, engine) = ask(&model, "delete the first school").await;

    assert_eq!(
        outcome,
        TranslationOutcome::failure("only read queries are permitted, model produced a mutation")
    );
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_deeply_nested_reply_is_llm_error() {
    let reply = format!(
        "{{ schools(state: {}{}) {{ id }} }}",
        "[".repeat(1000),
        "]".repeat(1000)
    );
    let model = FakeModel::replying(&reply);
    let (outcome, engine) = ask(&model, "schools in many states").await;

    let reason = outcome.failure_reason();
    assert!(reason.starts_with("Syntax error: Query nested too deeply"), "{}", reason);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_malformed_query_is_llm_error() {
    let model = FakeModel::replying("{ crimeLogs(schoolCode: $code) { id } }");
    let (outcome, engine) = ask(&model, "crimes at my school").await;

    let reason = outcome.failure_reason();
    assert!(reason.starts_with("Syntax error: Variables are not allowed"), "{}", reason);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_reply_without_query() {
    let model = FakeModel::replying("I would query the schools table for that.");
    let (outcome, engine) = ask(&model, "list schools").await;

    assert_eq!(outcome, TranslationOutcome::failure(NO_QUERY_FOUND));
    assert_eq!(engine.calls(), 0);

    let model = FakeModel::replying("{ schools { id }");
    let (outcome, _) = ask(&model, "list schools").await;
    assert_eq!(outcome, TranslationOutcome::failure(NO_QUERY_FOUND));
}

#[tokio::test]
async fn test_schema_unavailable_skips_model() {
    let model = FakeModel::replying("{ schools { id } }");
    let engine = CountingEngine::new(common::engine());

    let translator = Translator::new(
        model.clone(),
        Arc::new(FixedSchema(Ok("  \n".to_string()))),
        engine.clone(),
    );
    let outcome = translator.translate(&TranslationRequest::new("list schools")).await;
    assert_eq!(outcome, TranslationOutcome::failure(SCHEMA_UNAVAILABLE));

    let translator = Translator::new(
        model.clone(),
        Arc::new(FixedSchema(Err("introspection timed out".to_string()))),
        engine.clone(),
    );
    let reason = translator
        .translate(&TranslationRequest::new("list schools"))
        .await
        .failure_reason();
    assert!(reason.starts_with(SCHEMA_UNAVAILABLE));
    assert!(reason.contains("introspection timed out"));

    assert_eq!(model.calls(), 0);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_prompt_carries_schema_reference_and_trimmed_question() {
    let model = FakeModel::replying("{ schools { id } }");
    let (translator, _) = translator(model.clone());
    let reference = StaticReference::default().with_table(
        "schools",
        [("002325".to_string(), "University of Michigan".to_string())],
    );
    let translator = translator.with_reference(Arc::new(reference));

    translator
        .translate(&TranslationRequest::new("  crimes at Michigan?  \n"))
        .await;

    let (system, user) = model.last_prompt().unwrap();
    assert_eq!(user, "crimes at Michigan?");
    assert!(system.contains("SCHEMA:\nscalar DateTime"));
    assert!(system.contains("crimeLogs("));
    assert!(system.contains("REFERENCE DATA (JSON):"));
    assert!(system.contains(r#""002325": "University of Michigan""#));
    assert!(system.contains("Current time (UTC): "));
}

struct BrokenReference;

#[async_trait]
impl ReferenceSource for BrokenReference {
    async fn reference_text(&self) -> Result<Option<String>, NlqError> {
        Err(NlqError::Config("reference file missing".to_string()))
    }
}

#[tokio::test]
async fn test_reference_failure_is_not_fatal() {
    let model = FakeModel::replying("{ schools(limit: 1) { id } }");
    let (translator, _) = translator(model.clone());
    let translator = translator.with_reference(Arc::new(BrokenReference));

    let outcome = translator.translate(&TranslationRequest::new("one school")).await;
    assert_eq!(outcome, TranslationOutcome::Data(json!({ "schools": [{ "id": "1" }] })));

    let (system, _) = model.last_prompt().unwrap();
    assert!(!system.contains("REFERENCE DATA"));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let model = FakeModel::replying(r#"{ school(schoolCode: "001825") { schoolName } }"#);
    let (translator, engine) = translator(model.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let translator = translator.clone();
            tokio::spawn(async move {
                translator
                    .translate(&TranslationRequest::new(format!("question {}", i)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert_eq!(
            outcome,
            TranslationOutcome::Data(json!({ "school": { "schoolName": "Purdue University" } }))
        );
    }
    assert_eq!(model.calls(), 8);
    assert_eq!(engine.calls(), 8);
}

#[tokio::test]
async fn test_wire_response_has_exactly_one_field() {
    let cases = [
        ("{ schools(limit: 1) { id } }", "data"),
        ("{ schools { mascot } }", "errors"),
        ("no query here", "llmError"),
    ];
    for (reply, expected_key) in cases {
        let model = FakeModel::replying(reply);
        let (outcome, _) = ask(&model, "anything").await;
        let wire = serde_json::to_value(TranslationResponse::from(outcome)).unwrap();
        let keys: Vec<&str> = wire.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![expected_key]);
    }

    let model = FakeModel::replying("{ schools { mascot } }");
    let (outcome, _) = ask(&model, "anything").await;
    assert_eq!(
        serde_json::to_value(TranslationResponse::from(outcome)).unwrap(),
        json!({ "errors": [{ "message": "Cannot query field \"mascot\" on type \"School\"." }] })
    );
}

trait FailureReason {
    fn failure_reason(self) -> String;
}

impl FailureReason for TranslationOutcome {
    fn failure_reason(self) -> String {
        match self {
            TranslationOutcome::TranslationFailure(reason) => reason,
            other => panic!("expected a translation failure, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_inbound_wire_request() {
    let inbound: TranslateRequest =
        serde_json::from_value(json!({ "query": " which schools are in Indiana? " })).unwrap();
    let model = FakeModel::replying(r#"{ schools(state: "IN") { schoolName } }"#);
    let (translator, _) = translator(model.clone());

    let outcome = translator.translate(&inbound.into()).await;
    assert_eq!(
        outcome,
        TranslationOutcome::Data(json!({ "schools": [{ "schoolName": "Purdue University" }] }))
    );
    assert_eq!(model.last_prompt().unwrap().1, "which schools are in Indiana?");
}
