use crate::application::execute;
use crate::application::extract::extract;
use crate::application::sanitize::sanitize;
use crate::domain::model::{Extraction, PromptContext, TranslationOutcome, TranslationRequest};
use crate::domain::traits::{ModelClient, QueryEngine, ReferenceSource, SchemaProvider};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const EMPTY_QUESTION: &str = "question is empty";
pub const SCHEMA_UNAVAILABLE: &str = "schema unavailable";
pub const NO_QUERY_FOUND: &str = "model response did not contain a complete query";
const REFUSED_WITHOUT_REASON: &str = "model declined to answer";

/// Turns a question into exactly one `TranslationOutcome`.
///
/// Holds only read-only collaborators, so one instance can serve any number of
/// concurrent requests.
#[derive(Clone)]
pub struct Translator {
    model: Arc<dyn ModelClient>,
    schema: Arc<dyn SchemaProvider>,
    engine: Arc<dyn QueryEngine>,
    reference: Option<Arc<dyn ReferenceSource>>,
}

impl Translator {
    pub fn new(
        model: Arc<dyn ModelClient>,
        schema: Arc<dyn SchemaProvider>,
        engine: Arc<dyn QueryEngine>,
    ) -> Self {
        Self {
            model,
            schema,
            engine,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: Arc<dyn ReferenceSource>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub async fn translate(&self, request: &TranslationRequest) -> TranslationOutcome {
        let span = info_span!("translate", request_id = %Uuid::new_v4());
        let outcome = self.run_stages(request).instrument(span.clone()).await;
        span.in_scope(|| match &outcome {
            TranslationOutcome::Data(_) => info!("translation succeeded"),
            TranslationOutcome::QueryErrors(errors) => {
                info!(count = errors.len(), "query rejected by engine")
            }
            TranslationOutcome::TranslationFailure(reason) => {
                warn!(reason = %reason, "translation failed")
            }
        });
        outcome
    }

    // Start -> BuildingPrompt -> AwaitingModel -> Sanitizing -> Extracting -> Executing -> Done
    async fn run_stages(&self, request: &TranslationRequest) -> TranslationOutcome {
        let Some(question) = request.trimmed() else {
            return TranslationOutcome::failure(EMPTY_QUESTION);
        };

        debug!(stage = "building_prompt", "advancing");
        let schema_text = match self.schema.schema_text().await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return TranslationOutcome::failure(SCHEMA_UNAVAILABLE),
            Err(e) => {
                return TranslationOutcome::failure(format!("{}: {}", SCHEMA_UNAVAILABLE, e))
            }
        };
        let reference = match &self.reference {
            Some(source) => match source.reference_text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "reference data unavailable, continuing without it");
                    None
                }
            },
            None => None,
        };
        let prompt = PromptContext::build(schema_text, reference, Utc::now());

        debug!(stage = "awaiting_model", "advancing");
        let reply = match self.model.send(&prompt, question).await {
            Ok(reply) => reply,
            Err(e) => return TranslationOutcome::failure(e.to_string()),
        };

        debug!(stage = "sanitizing", raw_len = reply.raw_text.len(), "advancing");
        let cleaned = sanitize(&reply.raw_text);

        debug!(stage = "extracting", cleaned_len = cleaned.len(), "advancing");
        let query = match extract(&cleaned) {
            Extraction::Query(extracted) => extracted.query,
            Extraction::Refusal(reason) if reason.is_empty() => {
                return TranslationOutcome::failure(REFUSED_WITHOUT_REASON)
            }
            Extraction::Refusal(reason) => return TranslationOutcome::TranslationFailure(reason),
            Extraction::NotFound => return TranslationOutcome::failure(NO_QUERY_FOUND),
        };

        debug!(stage = "executing", query = %query, "advancing");
        execute::run(&query, self.engine.as_ref()).await
    }
}
